// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.


/// Normalize the numeral of an opcode: digits only, leading zeros ignored.
pub fn parse_code(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match text.trim_start_matches('0') {
        "" => Some(0),
        digits => digits.parse().ok(),
    }
}

/// Check a coordinate value: optional sign followed by at least one digit.
pub fn is_coordinate(text: &str) -> bool {
    let digits = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a Gerber decimal, `[+-]?(d+(.d*)?|.d+)`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (unsigned, ""),
    };
    let valid = int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit())
        && !(int.is_empty() && frac.is_empty());
    if valid {
        text.parse().ok()
    } else {
        None
    }
}

/// Check a macro or template name, `[._a-zA-Z$][._a-zA-Z0-9]*`.
pub fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(ch) if ch.is_ascii_alphabetic() || "._$".contains(ch) =>
            chars.all(|ch| ch.is_ascii_alphanumeric() || "._".contains(ch)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("1"), Some(1));
        assert_eq!(parse_code("0001"), Some(1));
        assert_eq!(parse_code("037"), Some(37));
        assert_eq!(parse_code("000"), Some(0));
        assert_eq!(parse_code(""), None);
        assert_eq!(parse_code("+1"), None);
        assert_eq!(parse_code("1.5"), None);
        assert_eq!(parse_code("99999999999"), None);
        // padding does not count towards the range
        assert_eq!(parse_code("0000000000004294967295"), Some(u32::MAX));
    }

    #[test]
    fn test_is_coordinate() {
        assert!(is_coordinate("01000000"));
        assert!(is_coordinate("-250"));
        assert!(is_coordinate("+0"));
        assert!(!is_coordinate(""));
        assert!(!is_coordinate("-"));
        assert!(!is_coordinate("1.5"));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0.5"), Some(0.5));
        assert_eq!(parse_decimal(".5"), Some(0.5));
        assert_eq!(parse_decimal("1."), Some(1.));
        assert_eq!(parse_decimal("-2"), Some(-2.));
        assert_eq!(parse_decimal("."), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("1e5"), None);
        assert_eq!(parse_decimal("inf"), None);
        assert_eq!(parse_decimal("1.2.3"), None);
    }

    #[test]
    fn test_is_name() {
        assert!(is_name("THERMAL80"));
        assert!(is_name("_box.2"));
        assert!(is_name("$x"));
        assert!(!is_name("8box"));
        assert!(!is_name("a$"));
        assert!(!is_name(""));
    }
}
