use serde::{Deserialize, Serialize};

/// Name the browser stores the visitor's choices under (local storage key and cookie)
pub const CONSENT_COOKIE: &str = "cookie-consent";

/// Cookie categories a visitor can opt into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookiePreferences {
    #[serde(default = "always")]
    pub necessary: bool,
    #[serde(default)]
    pub analytics: bool,
    #[serde(default)]
    pub marketing: bool,
}

fn always() -> bool {
    true
}

impl CookiePreferences {
    pub fn necessary_only() -> Self {
        Self {
            necessary: true,
            analytics: false,
            marketing: false,
        }
    }

    /// Parse a stored consent value. The value may be percent-encoded when it
    /// arrives as a cookie. Necessary cookies cannot be declined.
    pub fn parse(raw: &str) -> Option<Self> {
        let decoded = urlencoding::decode(raw).ok()?;
        let prefs: CookiePreferences = serde_json::from_str(decoded.trim()).ok()?;
        Some(Self {
            necessary: true,
            ..prefs
        })
    }

    pub fn analytics_allowed(&self) -> bool {
        self.analytics
    }
}

impl Default for CookiePreferences {
    fn default() -> Self {
        Self::necessary_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let prefs =
            CookiePreferences::parse(r#"{"necessary":true,"analytics":true,"marketing":false}"#)
                .unwrap();
        assert!(prefs.analytics_allowed());
        assert!(!prefs.marketing);
    }

    #[test]
    fn test_parse_percent_encoded_cookie() {
        let raw = urlencoding::encode(r#"{"necessary":true,"analytics":false,"marketing":true}"#);
        let prefs = CookiePreferences::parse(&raw).unwrap();
        assert!(!prefs.analytics_allowed());
        assert!(prefs.marketing);
    }

    #[test]
    fn test_necessary_cannot_be_declined() {
        let prefs = CookiePreferences::parse(r#"{"necessary":false,"analytics":false}"#).unwrap();
        assert!(prefs.necessary);
        assert_eq!(prefs, CookiePreferences::necessary_only());
    }

    #[test]
    fn test_malformed_value() {
        assert!(CookiePreferences::parse("yes please").is_none());
        assert!(CookiePreferences::parse("").is_none());
        assert!(CookiePreferences::parse(r#"{"analytics":"maybe"}"#).is_none());
    }

    #[test]
    fn test_default_declines_optional_cookies() {
        let prefs = CookiePreferences::default();
        assert!(prefs.necessary);
        assert!(!prefs.analytics_allowed());
        assert!(!prefs.marketing);
    }
}
