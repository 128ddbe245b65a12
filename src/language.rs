use std::fmt;
use std::str::FromStr;

use crate::error::{PolysubError, Result};

/// Languages the translator accepts on either side of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Korean,
    English,
    Japanese,
    ChineseSimplified,
    ChineseTraditional,
    Spanish,
    French,
    German,
    Russian,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::Korean,
        Language::English,
        Language::Japanese,
        Language::ChineseSimplified,
        Language::ChineseTraditional,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Russian,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::Korean => "ko",
            Self::English => "en",
            Self::Japanese => "ja",
            Self::ChineseSimplified => "zh",
            Self::ChineseTraditional => "zh-tw",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Russian => "ru",
        }
    }

    /// Name used inside prompt text.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Korean => "Korean",
            Self::English => "English",
            Self::Japanese => "Japanese",
            Self::ChineseSimplified => "Chinese (Simplified)",
            Self::ChineseTraditional => "Chinese (Traditional)",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Russian => "Russian",
        }
    }

    /// Look up a language by its exact code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Comma-separated list of every supported code, for error messages and help text.
    pub fn supported_codes() -> String {
        Self::ALL
            .iter()
            .map(|lang| lang.code())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve a code or fail with an error naming the rejected value and the valid set.
    pub fn resolve(role: &'static str, code: &str) -> Result<Self> {
        Self::from_code(code).ok_or_else(|| PolysubError::UnsupportedLanguage {
            role,
            code: code.to_string(),
            supported: Self::supported_codes(),
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = PolysubError;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve("requested", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_lookup() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn test_parse_and_display() {
        let lang: Language = "zh-tw".parse().unwrap();
        assert_eq!(lang, Language::ChineseTraditional);
        assert_eq!(lang.to_string(), "zh-tw");
        assert!("pt".parse::<Language>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Language::ChineseTraditional.display_name(), "Chinese (Traditional)");
        assert_eq!(Language::Korean.display_name(), "Korean");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(Language::from_code("KO"), None);
        assert_eq!(Language::from_code("zh-TW"), None);
    }

    #[test]
    fn test_resolve_names_code_and_valid_set() {
        let err = Language::resolve("target", "xx").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("target"));
        assert!(message.contains("xx"));
        assert!(message.contains("ko, en, ja, zh, zh-tw, es, fr, de, ru"));
    }
}
