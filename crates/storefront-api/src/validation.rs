use crate::error::AppError;

/// Unwrap a required text field, treating blank input as missing.
pub fn required_text(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(message.into()))
}

/// Unwrap a required number that must be greater than zero.
pub fn required_positive(value: Option<f64>, message: &str) -> Result<f64, AppError> {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| AppError::BadRequest(message.into()))
}

/// Minimal syntactic check: one `@` with a non-empty local part and a
/// dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.chars().any(char::is_whitespace)
}

/// Parse an optional numeric query parameter, ignoring blank or malformed
/// input.
pub fn lenient_number<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(Some(" a ".into()), "m").unwrap(), "a");
        assert!(required_text(Some("   ".into()), "m").is_err());
        assert!(required_text(None, "m").is_err());
    }

    #[test]
    fn test_required_positive() {
        assert_eq!(required_positive(Some(2.5), "m").unwrap(), 2.5);
        assert!(required_positive(Some(0.0), "m").is_err());
        assert!(required_positive(Some(-1.0), "m").is_err());
        assert!(required_positive(Some(f64::NAN), "m").is_err());
        assert!(required_positive(None, "m").is_err());
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("a@example.com"));
        assert!(!is_valid_email("a@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@@example.com"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("plain"));
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number::<i64>(Some("3")), Some(3));
        assert_eq!(lenient_number::<f64>(Some("")), None);
        assert_eq!(lenient_number::<f64>(Some("abc")), None);
        assert_eq!(lenient_number::<f64>(None), None);
    }
}
