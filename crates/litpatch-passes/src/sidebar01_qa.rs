//! SIDEBAR-01 QA fixes
//!
//! - Fix 1 (CRITICAL): AC2, author/admin check on the notes DELETE handler
//! - Fix 2 (MEDIUM): AC3, `onContactUpdate` on the mobile `ContactPanel`
//! - Fix 3 (MEDIUM): AC4, accept `liveChat` or `integrations` permission

use crate::{AI_ACTIONS, INBOX_LAYOUT, NOTES_ROUTE};
use litpatch_core::{
    AnchoredWindow, FragmentPresent, MarkerPresent, PatchError, PatchSpec, Severity,
};
use litpatch_driver::Pass;
use std::path::Path;

/// Pass name
pub const NAME: &str = "sidebar01-qa";

/// Summary line title
pub const TITLE: &str = "SIDEBAR-01 QA fixes";

/// DELETE handler body before Fix 1
pub const OLD_DELETE: &str = r#"    // Look up note to find its org (global client, no tenant scoping)
    const note = await prisma.internalNote.findUnique({
      where: { id: noteId },
      select: { id: true, organizationId: true },
    });

    if (!note) {
      return NextResponse.json(
        { success: false, error: "Nota não encontrada" },
        { status: 404 }
      );
    }

    // Verify user has access to this org
    await requireOrgAccess(note.organizationId);

    // Delete using tenant client (consistent with other handlers)
    const db = createTenantClient(note.organizationId);
    await db.internalNote.delete({ where: { id: noteId } });

    return NextResponse.json({ success: true });"#;

/// DELETE handler body after Fix 1
pub const NEW_DELETE: &str = r#"    // Look up note to find its org and author (global client, no tenant scoping)
    const note = await prisma.internalNote.findUnique({
      where: { id: noteId },
      select: { id: true, organizationId: true, authorId: true },
    });

    if (!note) {
      return NextResponse.json(
        { success: false, error: "Nota não encontrada" },
        { status: 404 }
      );
    }

    // Verify user has access to this org
    const { session, member } = await requireOrgAccess(note.organizationId);

    // AC2: Only author or admin can delete
    const isAuthor = session.user?.id === note.authorId;
    const isAdmin = member.role === "OWNER" || member.role === "ADMIN";
    if (!isAuthor && !isAdmin) {
      return NextResponse.json(
        { success: false, error: "Não autorizado a excluir esta nota" },
        { status: 403 }
      );
    }

    // Delete using tenant client (consistent with other handlers)
    const db = createTenantClient(note.organizationId);
    await db.internalNote.delete({ where: { id: noteId } });

    return NextResponse.json({ success: true });"#;

/// Mobile panel tail before Fix 2
pub const OLD_MOBILE: &str = r"                onToggleAutomation={handleToggleAutomation}
                conversationStatus={selectedConversation?.status}
                isAiHandling={selectedConversation?.isBusy ?? false}
              />
            </div>
          </div>
        )}
      </div>
    );
  }";

/// Mobile panel tail after Fix 2
pub const NEW_MOBILE: &str = r"                onToggleAutomation={handleToggleAutomation}
                onContactUpdate={(updates) => setContact((prev) => prev ? { ...prev, ...updates } : prev)}
                conversationStatus={selectedConversation?.status}
                isAiHandling={selectedConversation?.isBusy ?? false}
              />
            </div>
          </div>
        )}
      </div>
    );
  }";

/// Single-permission line before Fix 3
pub const OLD_PERM: &str = r#"  assertMemberPermission(member, "liveChat")  // Fixed: was "integrations", sidebar users have liveChat;"#;

/// Dual-permission block after Fix 3
pub const NEW_PERM: &str = r#"  // AC4: Accept liveChat OR integrations (agents have liveChat, automations have integrations)
  const hasJourneyPermission = member.permissions?.includes("liveChat") || member.permissions?.includes("integrations");
  if (!hasJourneyPermission) {
    return { success: false, error: "Sem permissão para alterar jornada" };
  }"#;

/// Line searched when the commented variant is gone
pub const PERM_ANCHOR: &str = r#"assertMemberPermission(member, "liveChat")"#;

/// Build the pass with targets under `root`
///
/// # Errors
/// Returns [`PatchError::InvalidSpec`] if a literal is malformed
pub fn pass(root: &Path) -> Result<Pass, PatchError> {
    let author_check = PatchSpec::builder("1")
        .severity(Severity::Critical)
        .summary("AC2 authorId + admin check added to DELETE handler")
        .target(root.join(NOTES_ROUTE))
        .old_text(OLD_DELETE)
        .new_text(NEW_DELETE)
        .fallback(MarkerPresent::new("authorId").after("DELETE"))
        .fallback(FragmentPresent::new(
            "select: { id: true, organizationId: true }",
            "pattern mismatch",
        ))
        .build()?;

    let contact_update = PatchSpec::builder("2")
        .severity(Severity::Medium)
        .summary("AC3 onContactUpdate added to mobile ContactPanel")
        .target(root.join(INBOX_LAYOUT))
        .old_text(OLD_MOBILE)
        .new_text(NEW_MOBILE)
        .build()?;

    let dual_permission = PatchSpec::builder("3")
        .severity(Severity::Medium)
        .summary("AC4 dual permission check (liveChat OR integrations)")
        .target(root.join(AI_ACTIONS))
        .old_text(OLD_PERM)
        .new_text(NEW_PERM)
        .fallback(MarkerPresent::new("hasJourneyPermission"))
        .fallback(AnchoredWindow::new(PERM_ANCHOR, "updateJourneyState", NEW_PERM))
        .build()?;

    Ok(Pass::new(NAME, TITLE)
        .patch(author_check)
        .patch(contact_update)
        .patch(dual_permission))
}
