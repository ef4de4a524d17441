//! Rewrites emoji sequences in an HTML fragment to Twemoji image
//! references.
//!
//! Only text content is touched; characters inside tags (and therefore
//! inside attribute values) pass through untouched. Recognized sequences
//! cover single pictographs, skin tone modifiers, variation selectors,
//! ZWJ joins, regional-indicator flags and keycaps.

use std::fmt::Write as _;

const TWEMOJI_SVG_BASE: &str = "https://cdn.jsdelivr.net/gh/jdecked/twemoji@15.1.0/assets/svg";

const ZERO_WIDTH_JOINER: char = '\u{200D}';
const VARIATION_SELECTOR: char = '\u{FE0F}';
const COMBINING_KEYCAP: char = '\u{20E3}';

/// Replace every emoji sequence in `html` with an inline `<img>` reference
/// sized by the surrounding CSS. Non-emoji text comes back unchanged.
pub fn replace_emoji(html: &str) -> String {
    let chars: Vec<char> = html.chars().collect();
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_tag {
            out.push(c);
            if c == '>' {
                in_tag = false;
            }
            i += 1;
            continue;
        }
        if c == '<' {
            in_tag = true;
            out.push(c);
            i += 1;
            continue;
        }
        match scan_sequence(&chars, i) {
            Some(end) => {
                push_emoji_image(&mut out, &chars[i..end]);
                i = end;
            }
            None => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Length of the emoji sequence starting at `start`, if any.
fn scan_sequence(chars: &[char], start: usize) -> Option<usize> {
    let first = chars[start];

    // Keycaps: digit, `#` or `*` followed by the combining keycap, with an
    // optional variation selector in between.
    if is_keycap_base(first) {
        let mut i = start + 1;
        if chars.get(i) == Some(&VARIATION_SELECTOR) {
            i += 1;
        }
        if chars.get(i) == Some(&COMBINING_KEYCAP) {
            return Some(i + 1);
        }
        return None;
    }

    // Flags are a pair of regional indicators.
    if is_regional_indicator(first) {
        return match chars.get(start + 1) {
            Some(&second) if is_regional_indicator(second) => Some(start + 2),
            _ => None,
        };
    }

    if !is_pictographic(first) {
        return None;
    }

    let mut i = consume_modifiers(chars, start + 1);
    while chars.get(i) == Some(&ZERO_WIDTH_JOINER) {
        match chars.get(i + 1) {
            Some(&next) if is_pictographic(next) => {
                i = consume_modifiers(chars, i + 2);
            }
            _ => break,
        }
    }
    Some(i)
}

fn consume_modifiers(chars: &[char], mut i: usize) -> usize {
    if matches!(chars.get(i), Some(&c) if is_skin_tone(c)) {
        i += 1;
    }
    if chars.get(i) == Some(&VARIATION_SELECTOR) {
        i += 1;
    }
    i
}

fn push_emoji_image(out: &mut String, sequence: &[char]) {
    out.push_str("<img class=\"emoji\" draggable=\"false\" alt=\"");
    for &c in sequence {
        out.push(c);
    }
    out.push_str("\" src=\"");
    out.push_str(TWEMOJI_SVG_BASE);
    out.push('/');
    out.push_str(&icon_name(sequence));
    out.push_str(".svg\"/>");
}

/// Twemoji asset name: hyphen-joined lowercase codepoints. Variation
/// selectors are dropped unless the sequence carries a ZWJ.
fn icon_name(sequence: &[char]) -> String {
    let keep_selectors = sequence.contains(&ZERO_WIDTH_JOINER);
    let mut name = String::new();
    for &c in sequence {
        if !keep_selectors && c == VARIATION_SELECTOR {
            continue;
        }
        if !name.is_empty() {
            name.push('-');
        }
        let _ = write!(name, "{:x}", u32::from(c));
    }
    name
}

fn is_keycap_base(c: char) -> bool {
    c.is_ascii_digit() || c == '#' || c == '*'
}

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn is_skin_tone(c: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&c)
}

fn is_pictographic(c: char) -> bool {
    matches!(
        u32::from(c),
        0x2600..=0x27BF
            | 0x2B00..=0x2BFF
            | 0x1F300..=0x1F5FF
            | 0x1F600..=0x1F64F
            | 0x1F680..=0x1F6FF
            | 0x1F780..=0x1F7FF
            | 0x1F900..=0x1F9FF
            | 0x1FA00..=0x1FAFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(replace_emoji("just words"), "just words");
        assert_eq!(replace_emoji("<p>just words</p>"), "<p>just words</p>");
    }

    #[test]
    fn single_pictograph_becomes_an_image() {
        let out = replace_emoji("🙂");
        assert!(out.contains("class=\"emoji\""), "{out}");
        assert!(out.contains("/1f642.svg"), "{out}");
        assert!(out.contains("alt=\"🙂\""), "{out}");
    }

    #[test]
    fn variation_selector_is_dropped_from_the_name() {
        let out = replace_emoji("❤\u{FE0F}");
        assert!(out.contains("/2764.svg"), "{out}");
    }

    #[test]
    fn flags_pair_regional_indicators() {
        let out = replace_emoji("🇸🇪");
        assert!(out.contains("/1f1f8-1f1ea.svg"), "{out}");
        // One image, not two.
        assert_eq!(out.matches("<img").count(), 1);
    }

    #[test]
    fn zwj_sequences_stay_joined() {
        let out = replace_emoji("👨\u{200D}👩\u{200D}👧");
        assert!(out.contains("/1f468-200d-1f469-200d-1f467.svg"), "{out}");
        assert_eq!(out.matches("<img").count(), 1);
    }

    #[test]
    fn skin_tone_modifier_joins_its_base() {
        let out = replace_emoji("👍\u{1F3FD}");
        assert!(out.contains("/1f44d-1f3fd.svg"), "{out}");
        assert_eq!(out.matches("<img").count(), 1);
    }

    #[test]
    fn keycap_sequence_is_one_icon() {
        let out = replace_emoji("#\u{FE0F}\u{20E3}");
        assert!(out.contains("/23-20e3.svg"), "{out}");
    }

    #[test]
    fn bare_keycap_base_is_left_alone() {
        assert_eq!(replace_emoji("#1 result"), "#1 result");
    }

    #[test]
    fn emoji_inside_markup_text_is_rewritten() {
        let out = replace_emoji("<em>party</em> 🎉");
        assert!(out.contains("<em>party</em>"));
        assert!(out.contains("/1f389.svg"), "{out}");
    }

    #[test]
    fn attribute_values_are_not_rewritten() {
        let input = "<img alt=\"🙂\" src=\"x\"> 🙂";
        let out = replace_emoji(input);
        assert!(out.starts_with("<img alt=\"🙂\" src=\"x\">"), "{out}");
        assert_eq!(out.matches("1f642.svg").count(), 1);
    }
}
