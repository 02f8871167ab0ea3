use litpatch_core::{MarkerPresent, PatchOutcome, PatchSpec, PatchUnit};
use litpatch_test_utils::ScratchTree;
use proptest::prelude::*;

const OLD: &str = "@@old block@@";
const NEW: &str = "##new block##";

fn spec(target: std::path::PathBuf) -> PatchSpec {
    PatchSpec::builder("p")
        .target(target)
        .old_text(OLD)
        .new_text(NEW)
        .fallback(MarkerPresent::new("%%marker%%"))
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_only_first_occurrence_replaced(
        prefix in "[a-z \n]{0,64}",
        middle in "[a-z \n]{0,64}",
        suffix in "[a-z \n]{0,64}",
        repeat in proptest::bool::ANY,
    ) {
        let tree = ScratchTree::new();
        let content = if repeat {
            format!("{prefix}{OLD}{middle}{OLD}{suffix}")
        } else {
            format!("{prefix}{OLD}{suffix}")
        };
        let path = tree.write("target.ts", &content);

        let outcome = PatchUnit::apply(&spec(path)).unwrap();

        prop_assert_eq!(outcome, PatchOutcome::applied());
        let expected = if repeat {
            format!("{prefix}{NEW}{middle}{OLD}{suffix}")
        } else {
            format!("{prefix}{NEW}{suffix}")
        };
        prop_assert_eq!(tree.read("target.ts"), expected);
    }

    #[test]
    fn prop_untouched_when_nothing_matches(content in "[a-z \n{}();]{0,256}") {
        let tree = ScratchTree::new();
        let path = tree.write("target.ts", &content);

        let outcome = PatchUnit::apply(&spec(path)).unwrap();

        prop_assert_eq!(outcome, PatchOutcome::NotFound);
        prop_assert_eq!(tree.read("target.ts"), content);
    }

    #[test]
    fn prop_preview_matches_apply(
        prefix in "[a-z \n]{0,64}",
        suffix in "[a-z \n]{0,64}",
        present in proptest::bool::ANY,
    ) {
        let tree = ScratchTree::new();
        let content = if present {
            format!("{prefix}{OLD}{suffix}")
        } else {
            format!("{prefix}{suffix}")
        };
        let path = tree.write("target.ts", &content);
        let spec = spec(path);

        let (previewed, rewritten) = PatchUnit::preview(&spec, &content);
        let applied = PatchUnit::apply(&spec).unwrap();

        prop_assert_eq!(previewed, applied);
        prop_assert_eq!(rewritten.unwrap_or(content), tree.read("target.ts"));
    }
}
