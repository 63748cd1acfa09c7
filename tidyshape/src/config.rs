//! Runtime settings read from the environment.
//!
//! | Variable              | Meaning                                  |
//! |-----------------------|------------------------------------------|
//! | `TIDYSHAPE_LOG`       | `quiet`, `error`, `warning` or `info`    |
//! | `TIDYSHAPE_DELIMITER` | Forces the CSV delimiter (`tab` allowed) |
//!
//! The binary loads a `.env` file first, so both can live there.

use crate::logs::Verbosity;

pub const LOG_ENV: &str = "TIDYSHAPE_LOG";
pub const DELIMITER_ENV: &str = "TIDYSHAPE_DELIMITER";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub verbosity: Verbosity,
    pub delimiter: Option<char>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Info,
            delimiter: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. Unparseable values fall back
    /// to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let verbosity = lookup(LOG_ENV)
            .and_then(|v| Verbosity::parse(&v))
            .unwrap_or(defaults.verbosity);
        let delimiter = lookup(DELIMITER_ENV).and_then(|v| parse_delimiter(&v));
        Self { verbosity, delimiter }
    }
}

/// Parse a delimiter given as a single character or a name.
pub fn parse_delimiter(value: &str) -> Option<char> {
    match value {
        "tab" | "\\t" | "\t" => Some('\t'),
        "comma" => Some(','),
        "semicolon" => Some(';'),
        "pipe" => Some('|'),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_without_env() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_reads_values() {
        let env: HashMap<&str, &str> =
            [(LOG_ENV, "quiet"), (DELIMITER_ENV, "tab")].into_iter().collect();
        let settings = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.verbosity, Verbosity::Quiet);
        assert_eq!(settings.delimiter, Some('\t'));
    }

    #[test]
    fn test_bad_values_fall_back() {
        let settings = Settings::from_lookup(|k| match k {
            LOG_ENV => Some("chatty".into()),
            _ => Some(";;".into()),
        });
        assert_eq!(settings.verbosity, Verbosity::Info);
        assert_eq!(settings.delimiter, None);
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";"), Some(';'));
        assert_eq!(parse_delimiter("pipe"), Some('|'));
        assert_eq!(parse_delimiter(""), None);
    }
}
