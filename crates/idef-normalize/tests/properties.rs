//! Property tests for normalizers.

use idef_model::{NormalizerId, NormalizerParams};
use idef_normalize::{normalize, transforms};
use proptest::prelude::*;

const IDEOGRAPHIC_SPACE: char = '\u{3000}';
const SPACED: &str = "[a-z \u{3000}\t]{0,40}";

proptest! {
    #[test]
    fn halfwidth_input_is_unchanged(value in "[ -~]{0,40}") {
        prop_assert_eq!(transforms::to_halfwidth(&value), value);
    }

    #[test]
    fn digits_only_output_is_ascii_digits(value in ".{0,40}") {
        let digits = transforms::digits_only(&value);
        prop_assert!(digits.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn collapse_spaces_leaves_no_runs(value in SPACED) {
        let collapsed = transforms::collapse_spaces(&value);
        prop_assert!(!collapsed.contains("  "));
        prop_assert!(!collapsed.starts_with(' '));
        prop_assert!(!collapsed.ends_with(' '));
        prop_assert!(!collapsed.contains(IDEOGRAPHIC_SPACE));
    }

    #[test]
    fn enum_map_without_match_or_default_is_identity(value in "[a-z]{3,10}") {
        let params = NormalizerParams::default().with_alias("male", ["m", "man"]);
        prop_assume!(value != "male" && value != "man");
        prop_assert_eq!(normalize(&value, &[NormalizerId::EnumMap], Some(&params)), value);
    }

    #[test]
    fn empty_pipeline_is_identity(value in ".{0,40}") {
        prop_assert_eq!(normalize(&value, &[], None), value);
    }
}

#[test]
fn enum_alias_resolution_any_case() {
    let params = NormalizerParams::default().with_alias("male", ["m", "man"]);
    for input in ["M", "m", "MAN", "Man", "male", "MALE"] {
        assert_eq!(
            normalize(input, &[NormalizerId::EnumMap], Some(&params)),
            "male",
            "input {input:?}"
        );
    }
    assert_eq!(
        normalize("Unlisted", &[NormalizerId::EnumMap], Some(&params)),
        "Unlisted"
    );
}
