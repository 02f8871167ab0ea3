//! TypeScript follow-ups to the SIDEBAR-01 QA fixes
//!
//! - `member.permissions` does not exist on the member union type, so the
//!   dual check goes through `memberHasPermission()`
//! - The `Role` enum has no `OWNER`; `ADMIN` already carries the owner bypass

use crate::sidebar01_qa::NEW_PERM;
use crate::{AI_ACTIONS, NOTES_ROUTE};
use litpatch_core::{PatchError, PatchSpec};
use litpatch_driver::{MarkerCheck, Pass};
use std::path::Path;

/// Pass name
pub const NAME: &str = "sidebar01-ts";

/// Summary line title
pub const TITLE: &str = "SIDEBAR-01 TypeScript fixes";

/// Dual check using the permission helper
pub const HELPER_PERM: &str = r#"  // AC4: Accept liveChat OR integrations (agents have liveChat, automations have integrations)
  const hasJourneyPermission = memberHasPermission(member, "liveChat") || memberHasPermission(member, "integrations");
  if (!hasJourneyPermission) {
    return { success: false, error: "Sem permissão para alterar jornada" };
  }"#;

/// Admin check accepting the nonexistent `OWNER` role
pub const OLD_ADMIN: &str = r#"    const isAdmin = member.role === "OWNER" || member.role === "ADMIN";"#;

/// Admin check restricted to `ADMIN`
pub const NEW_ADMIN: &str = r#"    const isAdmin = member.role === "ADMIN";"#;

/// Build the pass with targets under `root`
///
/// # Errors
/// Returns [`PatchError::InvalidSpec`] if a literal is malformed
pub fn pass(root: &Path) -> Result<Pass, PatchError> {
    let actions = root.join(AI_ACTIONS);
    let notes = root.join(NOTES_ROUTE);

    // First occurrence is the import from check-permission.
    let import = PatchSpec::builder("1a")
        .summary("memberHasPermission imported")
        .target(&actions)
        .old_text("assertMemberPermission")
        .new_text("assertMemberPermission, memberHasPermission")
        .skip_if_present("memberHasPermission")
        .build()?;

    let helper = PatchSpec::builder("1")
        .summary("ai/actions.ts uses memberHasPermission instead of raw .permissions")
        .target(&actions)
        .old_text(NEW_PERM)
        .new_text(HELPER_PERM)
        .build()?;

    let admin_only = PatchSpec::builder("2")
        .summary("notes/route.ts checks ADMIN only (no OWNER in Role enum)")
        .target(&notes)
        .old_text(OLD_ADMIN)
        .new_text(NEW_ADMIN)
        .build()?;

    let destructured = MarkerCheck::new("2b", notes, ["{ session, member }", "session, member"])
        .with_summary("member destructured from requireOrgAccess");

    Ok(Pass::new(NAME, TITLE)
        .patch(import)
        .patch(helper)
        .patch(admin_only)
        .check(destructured))
}

#[cfg(test)]
mod tests {
    use super::*;
    use litpatch_core::{PatchOutcome, PatchUnit};
    use litpatch_driver::Step;

    fn spec(pass: &Pass, index: usize) -> &PatchSpec {
        match &pass.steps()[index] {
            Step::Patch(spec) => spec,
            Step::Check(_) => panic!("expected patch step"),
        }
    }

    #[test]
    fn import_widened_once() {
        let pass = pass(Path::new(".")).unwrap();
        let content = "import { assertMemberPermission } from \"@/lib/auth/check-permission\";\nassertMemberPermission(member, \"x\");";
        let (outcome, text) = PatchUnit::preview(spec(&pass, 0), content);
        assert_eq!(outcome, PatchOutcome::applied());
        let text = text.unwrap();
        assert!(text.starts_with("import { assertMemberPermission, memberHasPermission }"));
        assert!(text.ends_with("\nassertMemberPermission(member, \"x\");"));

        let (again, _) = PatchUnit::preview(spec(&pass, 0), &text);
        assert_eq!(again, PatchOutcome::AlreadyApplied);
    }

    #[test]
    fn admin_check_second_run_is_noop() {
        let pass = pass(Path::new(".")).unwrap();
        let (outcome, _) = PatchUnit::preview(spec(&pass, 2), NEW_ADMIN);
        assert_eq!(outcome, PatchOutcome::AlreadyApplied);
    }

    #[test]
    fn ends_with_destructuring_check() {
        let pass = pass(Path::new("/srv")).unwrap();
        assert_eq!(pass.check_count(), 1);
        let Step::Check(check) = &pass.steps()[3] else {
            panic!("expected check step");
        };
        assert_eq!(check.target(), Path::new("/srv/src/app/api/inbox/notes/route.ts"));
    }
}
