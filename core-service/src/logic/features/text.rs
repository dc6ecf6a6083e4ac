//! Character classes shared by the extractors

/// Single-digit characters
///
/// Decimal digits of any script plus compatibility digits (superscripts,
/// subscripts, circled 0-9). Number letters such as Roman numerals,
/// vulgar fractions and enclosed numbers from ten up are not digits even
/// though `char::is_numeric` accepts them.
pub fn is_digit(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_digit();
    }
    c.is_numeric() && !is_number_letter(c) && !is_fraction(c) && !is_enclosed_multi_digit(c)
}

/// General category `Nl`
fn is_number_letter(c: char) -> bool {
    matches!(
        c,
        '\u{16EE}'..='\u{16F0}'
            | '\u{2160}'..='\u{2182}'
            | '\u{2185}'..='\u{2188}'
            | '\u{3007}'
            | '\u{3021}'..='\u{3029}'
            | '\u{3038}'..='\u{303A}'
            | '\u{A6E6}'..='\u{A6EF}'
            | '\u{10140}'..='\u{10174}'
            | '\u{10341}'
            | '\u{1034A}'
            | '\u{103D1}'..='\u{103D5}'
            | '\u{12400}'..='\u{1246E}'
    )
}

fn is_fraction(c: char) -> bool {
    matches!(
        c,
        '\u{00BC}'..='\u{00BE}'
            | '\u{09F4}'..='\u{09F9}'
            | '\u{0B72}'..='\u{0B77}'
            | '\u{0D58}'..='\u{0D5E}'
            | '\u{2150}'..='\u{215F}'
            | '\u{2189}'
            | '\u{2CFD}'
            | '\u{A830}'..='\u{A835}'
    )
}

/// Circled, parenthesized and full-stop numbers 10 and above
fn is_enclosed_multi_digit(c: char) -> bool {
    matches!(
        c,
        '\u{2469}'..='\u{2473}'
            | '\u{247D}'..='\u{2487}'
            | '\u{2491}'..='\u{249B}'
            | '\u{24EB}'..='\u{24F4}'
            | '\u{24FE}'
            | '\u{277F}'
            | '\u{2789}'
            | '\u{2793}'
            | '\u{3251}'..='\u{325F}'
            | '\u{3280}'..='\u{3289}'
            | '\u{32B1}'..='\u{32BF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_digits() {
        assert!("0123456789".chars().all(is_digit));
        // Arabic-Indic, Devanagari, fullwidth
        assert!("٠١٢٣".chars().all(is_digit));
        assert!("०९".chars().all(is_digit));
        assert!("０９".chars().all(is_digit));
    }

    #[test]
    fn test_compatibility_digits() {
        assert!(is_digit('²'));
        assert!(is_digit('₃'));
        assert!(is_digit('①'));
        assert!(is_digit('⓪'));
    }

    #[test]
    fn test_numeric_non_digits() {
        for c in ['½', '¼', '⅓', 'Ⅻ', 'ⅰ', '〇', '⑩', '⑳', '㉑'] {
            assert!(c.is_numeric(), "{:?}", c);
            assert!(!is_digit(c), "{:?}", c);
        }
        assert!(!is_digit('a'));
        assert!(!is_digit(' '));
    }
}
