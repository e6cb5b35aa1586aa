//! Individual string transforms.
//!
//! Each function is pure and total: any input string yields an output string.

use idef_model::NormalizerParams;

/// Offset between full-width ASCII forms and their half-width counterparts.
const HALFWIDTH_OFFSET: u32 = 0xFEE0;

/// Dash and hyphen look-alikes folded into `-` by [`normalize_hyphens`].
pub const HYPHEN_LIKE: [char; 9] = [
    '\u{2010}', // hyphen
    '\u{2011}', // non-breaking hyphen
    '\u{2012}', // figure dash
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{2015}', // horizontal bar
    '\u{30FC}', // katakana prolonged sound mark
    '\u{FF0D}', // full-width hyphen-minus
    '\u{2212}', // minus sign
];

/// Whitespace as seen by the transforms: Unicode `White_Space` plus BOM.
pub fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{FEFF}'
}

pub fn trim(value: &str) -> String {
    value.trim_matches(is_space).to_string()
}

pub fn collapse_spaces(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for ch in value.chars() {
        if is_space(ch) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out.trim_matches(' ').to_string()
}

pub fn lower(value: &str) -> String {
    value.to_lowercase()
}

pub fn to_halfwidth(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(ch as u32 - HALFWIDTH_OFFSET).unwrap_or(ch),
            _ => ch,
        })
        .collect()
}

pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn normalize_hyphens(value: &str) -> String {
    value
        .chars()
        .map(|ch| if HYPHEN_LIKE.contains(&ch) { '-' } else { ch })
        .collect()
}

/// Resolve `value` to a canonical enum value.
///
/// The trimmed, lowercased input is compared against each canonical key
/// (lowercased) and its aliases (trimmed and lowercased). Without a match the
/// configured default is returned, or `value` unchanged when there is none.
pub fn enum_map(value: &str, params: Option<&NormalizerParams>) -> String {
    let Some(params) = params else {
        return value.to_string();
    };
    let needle = trim(value).to_lowercase();

    for (canonical, aliases) in &params.enum_map {
        if canonical.to_lowercase() == needle {
            return canonical.clone();
        }
        if aliases.iter().any(|alias| trim(alias).to_lowercase() == needle) {
            return canonical.clone();
        }
    }

    params.default.clone().unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_strips_ideographic_space_and_bom() {
        assert_eq!(trim("\u{3000} a b \u{FEFF}"), "a b");
    }

    #[test]
    fn collapse_spaces_merges_mixed_runs() {
        assert_eq!(collapse_spaces("  Tanaka\u{3000}\u{3000} Taro\t\n"), "Tanaka Taro");
        assert_eq!(collapse_spaces("\u{3000}"), "");
    }

    #[test]
    fn to_halfwidth_maps_fullwidth_block() {
        assert_eq!(to_halfwidth("ＡＢＣ１２３！～"), "ABC123!~");
        // U+3000 and U+FF5F lie outside the block.
        assert_eq!(to_halfwidth("\u{3000}\u{FF5F}"), "\u{3000}\u{FF5F}");
    }

    #[test]
    fn digits_only_keeps_ascii_digits() {
        assert_eq!(digits_only("(03) 1234-5678"), "0312345678");
        assert_eq!(digits_only("０３"), "");
    }

    #[test]
    fn normalize_hyphens_folds_dash_family() {
        assert_eq!(normalize_hyphens("1\u{2212}2\u{30FC}3\u{FF0D}4\u{2014}5"), "1-2-3-4-5");
        assert_eq!(normalize_hyphens("a-b"), "a-b");
    }

    #[test]
    fn enum_map_resolves_aliases_case_insensitively() {
        let params = NormalizerParams::default().with_alias("male", ["m", "man"]);
        assert_eq!(enum_map("M", Some(&params)), "male");
        assert_eq!(enum_map(" MAN ", Some(&params)), "male");
        assert_eq!(enum_map("Male", Some(&params)), "male");
        assert_eq!(enum_map("x", Some(&params)), "x");
    }

    #[test]
    fn enum_map_falls_back_to_default() {
        let params = NormalizerParams::default()
            .with_alias("female", ["f"])
            .with_default("unknown");
        assert_eq!(enum_map("other", Some(&params)), "unknown");
        assert_eq!(enum_map(" Other ", None), " Other ");
    }
}
