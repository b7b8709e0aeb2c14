use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Organization code: lowercase alphanumeric segments joined by single hyphens
    /// - Valid: "bfp-region-7", "redcross", "lgu-cebu-city"
    /// - Invalid: "-org", "org-", "org--name", "Org", "org_name"
    pub static ref CODE_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
}

/// `validator` custom rule wrapper around [`CODE_REGEX`]
pub fn validate_code(code: &str) -> Result<(), validator::ValidationError> {
    if CODE_REGEX.is_match(code) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_code"))
    }
}
