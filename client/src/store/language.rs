//! # Language Slice
//!
//! The UI language. Only the code and its native name live here; string
//! tables belong to the front end.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    En,
    Hi,
    Es,
    Fr,
    De,
    It,
    Pt,
    Zh,
    Ja,
    Ko,
    Ar,
    Ru,
}

impl LanguageCode {
    pub fn all() -> &'static [LanguageCode] {
        &[
            LanguageCode::En,
            LanguageCode::Hi,
            LanguageCode::Es,
            LanguageCode::Fr,
            LanguageCode::De,
            LanguageCode::It,
            LanguageCode::Pt,
            LanguageCode::Zh,
            LanguageCode::Ja,
            LanguageCode::Ko,
            LanguageCode::Ar,
            LanguageCode::Ru,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::Hi => "hi",
            LanguageCode::Es => "es",
            LanguageCode::Fr => "fr",
            LanguageCode::De => "de",
            LanguageCode::It => "it",
            LanguageCode::Pt => "pt",
            LanguageCode::Zh => "zh",
            LanguageCode::Ja => "ja",
            LanguageCode::Ko => "ko",
            LanguageCode::Ar => "ar",
            LanguageCode::Ru => "ru",
        }
    }

    /// The language's name in that language.
    pub fn native_name(&self) -> &'static str {
        match self {
            LanguageCode::En => "English",
            LanguageCode::Hi => "हिन्दी",
            LanguageCode::Es => "Español",
            LanguageCode::Fr => "Français",
            LanguageCode::De => "Deutsch",
            LanguageCode::It => "Italiano",
            LanguageCode::Pt => "Português",
            LanguageCode::Zh => "中文",
            LanguageCode::Ja => "日本語",
            LanguageCode::Ko => "한국어",
            LanguageCode::Ar => "العربية",
            LanguageCode::Ru => "Русский",
        }
    }

    /// Supported language of a POSIX locale such as `de_DE.UTF-8` or a tag
    /// such as `pt-BR`.
    pub fn from_locale(locale: &str) -> Option<Self> {
        let primary = locale
            .split(['_', '-', '.', '@'])
            .next()
            .unwrap_or_default();
        primary.parse().ok()
    }
}

impl std::str::FromStr for LanguageCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LanguageCode::all()
            .iter()
            .copied()
            .find(|code| code.code() == wanted)
            .ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageState {
    pub code: LanguageCode,
    pub name: String,
}

impl Default for LanguageState {
    fn default() -> Self {
        Self::from(LanguageCode::default())
    }
}

impl From<LanguageCode> for LanguageState {
    fn from(code: LanguageCode) -> Self {
        Self {
            code,
            name: code.native_name().to_string(),
        }
    }
}

impl LanguageState {
    /// Saved language first, then the process locale, then English.
    pub fn initial(saved: Option<LanguageCode>, locale: Option<&str>) -> Self {
        saved
            .or_else(|| locale.and_then(LanguageCode::from_locale))
            .map(Self::from)
            .unwrap_or_default()
    }

    pub fn set_language(&mut self, code: LanguageCode) {
        *self = Self::from(code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_precedence() {
        assert_eq!(
            LanguageState::initial(Some(LanguageCode::Ja), Some("de_DE.UTF-8")).code,
            LanguageCode::Ja
        );
        assert_eq!(
            LanguageState::initial(None, Some("de_DE.UTF-8")).code,
            LanguageCode::De
        );
        assert_eq!(LanguageState::initial(None, Some("C")).code, LanguageCode::En);
        assert_eq!(LanguageState::initial(None, None).name, "English");
    }

    #[test]
    fn test_set_language_updates_name() {
        let mut language = LanguageState::default();
        language.set_language(LanguageCode::Hi);
        assert_eq!(language.name, "हिन्दी");
        assert_eq!(LanguageCode::from_locale("pt-BR"), Some(LanguageCode::Pt));
    }

    #[test]
    fn test_twelve_supported_codes() {
        assert_eq!(LanguageCode::all().len(), 12);
        assert!("xx".parse::<LanguageCode>().is_err());
        assert_eq!(serde_json::to_string(&LanguageCode::Zh).unwrap(), "\"zh\"");
    }
}
