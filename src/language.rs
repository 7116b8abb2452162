use crate::error::InvalidInputError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language used to localize recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Ta,
    Te,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Hi, Language::Ta, Language::Te];

    /// Code sent as the `{languageCode}` path segment
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Ta => "ta",
            Language::Te => "te",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Ta => "Tamil",
            Language::Te => "Telugu",
        }
    }
}

impl FromStr for Language {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| InvalidInputError::UnknownLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes() {
        assert_eq!("en".parse::<Language>(), Ok(Language::En));
        assert_eq!(" TA ".parse::<Language>(), Ok(Language::Ta));
        assert_eq!(
            "fr".parse::<Language>(),
            Err(InvalidInputError::UnknownLanguage("fr".to_string()))
        );
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(Language::default(), Language::En);
        assert_eq!(Language::default().code(), "en");
    }
}
