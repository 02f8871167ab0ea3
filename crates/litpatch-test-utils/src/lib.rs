//! Testing utilities for litpatch workspace
//!
//! Scratch project trees and fixture sources shaped like the files the
//! built-in passes target.

#![allow(missing_docs)]

use litpatch_passes::sidebar01_qa::{OLD_DELETE, OLD_MOBILE, OLD_PERM};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub use litpatch_passes::sidebar01_qa as qa;
pub use litpatch_passes::sidebar01_ts as ts;
pub use litpatch_passes::{AI_ACTIONS, INBOX_LAYOUT, NOTES_ROUTE};

/// Temporary project root, removed on drop
#[derive(Debug)]
pub struct ScratchTree {
    dir: TempDir,
}

impl Default for ScratchTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScratchTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `content` at `rel`, creating parent directories
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).unwrap()
    }

    /// Every file under the root, relative and sorted
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        collect(self.root(), self.root(), &mut files);
        files.sort();
        files
    }
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            out.push(path.strip_prefix(root).unwrap().to_path_buf());
        }
    }
}

/// Tree with all three SIDEBAR-01 targets in their pre-fix state
pub fn sidebar_tree() -> ScratchTree {
    let tree = ScratchTree::new();
    tree.write(NOTES_ROUTE, &notes_route_source());
    tree.write(INBOX_LAYOUT, &inbox_layout_source());
    tree.write(AI_ACTIONS, &ai_actions_source());
    tree
}

pub fn notes_route_source() -> String {
    format!(
        r#"import {{ NextRequest, NextResponse }} from "next/server";
import {{ prisma }} from "@/lib/db";
import {{ createTenantClient }} from "@/lib/db/tenant";
import {{ requireOrgAccess }} from "@/lib/auth/require-org-access";
import {{ handleApiError }} from "@/lib/api/errors";

export async function GET(request: NextRequest) {{
  try {{
    const {{ searchParams }} = new URL(request.url);
    const contactId = searchParams.get("contactId");
    const orgId = searchParams.get("orgId");
    if (!contactId || !orgId) {{
      return NextResponse.json(
        {{ success: false, error: "Parâmetros obrigatórios" }},
        {{ status: 400 }}
      );
    }}

    await requireOrgAccess(orgId);
    const db = createTenantClient(orgId);
    const notes = await db.internalNote.findMany({{
      where: {{ contactId }},
      orderBy: {{ createdAt: "desc" }},
    }});

    return NextResponse.json({{ success: true, data: notes }});
  }} catch (error) {{
    return handleApiError(error);
  }}
}}

export async function POST(request: NextRequest) {{
  try {{
    const {{ orgId, contactId, content }} = await request.json();
    const {{ session }} = await requireOrgAccess(orgId);

    const db = createTenantClient(orgId);
    const note = await db.internalNote.create({{
      data: {{ contactId, content, authorId: session.user.id }},
    }});

    return NextResponse.json({{ success: true, data: note }});
  }} catch (error) {{
    return handleApiError(error);
  }}
}}

export async function DELETE(request: NextRequest) {{
  try {{
    const {{ searchParams }} = new URL(request.url);
    const noteId = searchParams.get("id");
    if (!noteId) {{
      return NextResponse.json(
        {{ success: false, error: "ID da nota é obrigatório" }},
        {{ status: 400 }}
      );
    }}

{OLD_DELETE}
  }} catch (error) {{
    return handleApiError(error);
  }}
}}
"#
    )
}

pub fn inbox_layout_source() -> String {
    inbox_layout_with(OLD_MOBILE)
}

/// Layout whose mobile panel no longer ends the way Fix 2 expects
pub fn inbox_layout_drifted_source() -> String {
    let tail = OLD_MOBILE.replace(
        "                isAiHandling={selectedConversation?.isBusy ?? false}\n",
        "",
    );
    inbox_layout_with(&tail)
}

fn inbox_layout_with(mobile_tail: &str) -> String {
    format!(
        r#""use client";

import {{ useState }} from "react";
import {{ ContactPanel }} from "./contact-panel";
import {{ ConversationList }} from "./conversation-list";
import {{ useIsMobile }} from "@/hooks/use-mobile";

export function InboxLayout({{ conversations }}: InboxLayoutProps) {{
  const isMobile = useIsMobile();
  const [selectedConversation, setSelectedConversation] = useState<Conversation | null>(null);
  const [contact, setContact] = useState<Contact | null>(null);
  const [showContactPanel, setShowContactPanel] = useState(false);

  const handleToggleAutomation = async () => {{
    if (!selectedConversation) return;
    await toggleAutomation(selectedConversation.id);
  }};

  if (isMobile) {{
    return (
      <div className="flex h-full flex-col">
        <ConversationList
          conversations={{conversations}}
          onSelect={{setSelectedConversation}}
        />
        {{showContactPanel && (
          <div className="fixed inset-0 z-50 bg-background">
            <div className="h-full overflow-y-auto">
              <ContactPanel
                contact={{contact}}
                onClose={{() => setShowContactPanel(false)}}
{mobile_tail}

  return (
    <div className="flex h-full">
      <ConversationList
        conversations={{conversations}}
        onSelect={{setSelectedConversation}}
      />
      <ContactPanel
        contact={{contact}}
        onToggleAutomation={{handleToggleAutomation}}
        onContactUpdate={{(updates) => setContact((prev) => prev ? {{ ...prev, ...updates }} : prev)}}
        conversationStatus={{selectedConversation?.status}}
      />
    </div>
  );
}}
"#
    )
}

pub fn ai_actions_source() -> String {
    ai_actions_with(OLD_PERM)
}

/// Actions file whose permission line lost its trailing comment
pub fn ai_actions_uncommented_source() -> String {
    ai_actions_with(r#"  assertMemberPermission(member, "liveChat");"#)
}

fn ai_actions_with(permission_line: &str) -> String {
    format!(
        r#""use server";

import {{ revalidatePath }} from "next/cache";
import {{ requireOrgAccess }} from "@/lib/auth/require-org-access";
import {{ assertMemberPermission }} from "@/lib/auth/check-permission";
import {{ createTenantClient }} from "@/lib/db/tenant";

export async function updateAiSettings(orgId: string, settings: AiSettings) {{
  const {{ member }} = await requireOrgAccess(orgId);
  assertMemberPermission(member, "integrations");

  const db = createTenantClient(orgId);
  await db.aiSettings.update({{ where: {{ organizationId: orgId }}, data: settings }});

  revalidatePath(`/${{orgId}}/ai`);
  return {{ success: true }};
}}

export async function updateJourneyState(
  orgId: string,
  conversationId: string,
  state: JourneyState
) {{
  const {{ member }} = await requireOrgAccess(orgId);
{permission_line}

  const db = createTenantClient(orgId);
  await db.conversation.update({{
    where: {{ id: conversationId }},
    data: {{ journeyState: state }},
  }});

  revalidatePath(`/${{orgId}}/inbox`);
  return {{ success: true }};
}}
"#
    )
}
