/// Country code resolution backed by ISO 3166 data
use isocountry::CountryCode;

/// Resolve a 2-letter country code to its English display name
///
/// Returns `None` when the input is not a valid ISO 3166-1 alpha-2 code.
/// Resolution is case-insensitive; an unknown code is an acceptable search
/// input, so no error is raised here.
pub fn country_name(code: &str) -> Option<&'static str> {
    let normalized = code.trim().to_ascii_uppercase();
    CountryCode::for_alpha2(&normalized)
        .ok()
        .map(|country| country.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_known_codes() {
        assert_eq!(country_name("DE"), Some("Germany"));
        assert_eq!(country_name("de"), Some("Germany"));
        assert_eq!(country_name(" fr "), Some("France"));
    }

    #[test]
    fn test_rejects_invalid_codes() {
        assert_eq!(country_name("ZZZZZ"), None);
        assert_eq!(country_name(""), None);
        assert_eq!(country_name("Germany"), None);
    }
}
