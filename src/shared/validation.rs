use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use validator::ValidationError;

lazy_static! {
    /// Person names: letters, whitespace, hyphens and apostrophes
    /// - Valid: "Jo Smith", "Mary-Jane O'Neil"
    /// - Invalid: "R2D2", "<b>Jo</b>", "Jo_Smith"
    pub static ref PERSON_NAME_REGEX: Regex = Regex::new(r"^[a-zA-Z\s\-']+$").unwrap();

    /// Phone numbers: digits, whitespace, parentheses, hyphens, plus and dots
    /// - Valid: "631-555-1212", "(631) 555 1212", "+1.631.555.1212"
    /// - Invalid: "631-555-CALL", "631_555_1212"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^[\d\s()\-+.]+$").unwrap();

    static ref JAVASCRIPT_SCHEME_REGEX: Regex = Regex::new(r"(?i)javascript:").unwrap();

    static ref EVENT_HANDLER_REGEX: Regex = Regex::new(r"(?i)on\w+=").unwrap();
}

/// Minimum number of digits a phone number must contain once punctuation is removed
pub const MIN_PHONE_DIGITS: usize = 10;

/// Count the ASCII digits in a phone number
pub fn phone_digit_count(phone: &str) -> usize {
    phone.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Reject values that are empty once surrounding whitespace is removed
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

/// Strip markup-like content from free text before it is placed in an email.
///
/// Removes angle brackets, `javascript:` schemes and inline `on<event>=`
/// handler prefixes, then trims. Removal is repeated until nothing matches,
/// so nested payloads such as `javajavascript:script:` cannot reassemble and
/// a second pass over the output is a no-op.
pub fn sanitize_input(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let stripped: String = current.chars().filter(|c| *c != '<' && *c != '>').collect();
        let stripped = JAVASCRIPT_SCHEME_REGEX.replace_all(&stripped, "");
        let stripped = EVENT_HANDLER_REGEX.replace_all(&stripped, "").into_owned();

        if stripped == current {
            break;
        }
        current = stripped;
    }
    current.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name_regex() {
        assert!(PERSON_NAME_REGEX.is_match("Jo Smith"));
        assert!(PERSON_NAME_REGEX.is_match("Mary-Jane O'Neil"));
        assert!(!PERSON_NAME_REGEX.is_match("R2D2"));
        assert!(!PERSON_NAME_REGEX.is_match("<b>Jo</b>"));
        assert!(!PERSON_NAME_REGEX.is_match(""));
    }

    #[test]
    fn test_phone_regex() {
        assert!(PHONE_REGEX.is_match("631-555-1212"));
        assert!(PHONE_REGEX.is_match("(631) 555 1212"));
        assert!(PHONE_REGEX.is_match("+1.631.555.1212"));
        assert!(!PHONE_REGEX.is_match("631-555-CALL"));
        assert!(!PHONE_REGEX.is_match("631_555_1212"));
    }

    #[test]
    fn test_phone_digit_count() {
        assert_eq!(phone_digit_count("(631) 555-1212"), 10);
        assert_eq!(phone_digit_count("+1 631 555 1212"), 11);
        assert_eq!(phone_digit_count("--- ---"), 0);
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Patio lights").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_sanitize_strips_markup() {
        assert_eq!(sanitize_input("  <b>hello</b>  "), "bhello/b");
        assert_eq!(sanitize_input("JavaScript:alert(1)"), "alert(1)");
        assert_eq!(sanitize_input("img onerror=steal()"), "img steal()");
        assert_eq!(sanitize_input("1 Main St, Town, NY"), "1 Main St, Town, NY");
    }

    #[test]
    fn test_sanitize_nested_payloads_do_not_reassemble() {
        assert_eq!(sanitize_input("javajavascript:script:go"), "go");
        assert_eq!(sanitize_input("oonclick=nclick=x"), "x");
        assert_eq!(sanitize_input("java<script:x"), "x");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "  <script>alert('x')</script>  ",
            "javajavascript:script:go",
            " < x",
            "onload=onclick=",
            "Call me at (631) 555-1212 > after 5pm",
            "\t plain text \n",
            "",
        ];

        for sample in samples {
            let once = sanitize_input(sample);
            let twice = sanitize_input(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", sample);
            assert!(!once.contains('<') && !once.contains('>'));
        }
    }
}
