//! Application settings loaded from a TOML file.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! The path comes from `DAYBOOK_CONFIG` and falls back to `./config.toml`.

use crate::{
    core::record::RecordKind,
    errors::{Error, Result},
};
use chrono::FixedOffset;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Japan Standard Time, the zone both trackers were written for.
const DEFAULT_UTC_OFFSET_MINUTES: i32 = 9 * 60;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Offset used to turn stored instants into local calendar dates
    pub utc_offset_minutes: i32,
    /// Calendar display settings
    pub calendar: CalendarSettings,
    /// Study tracker settings
    pub study: StudySettings,
    /// Finance tracker settings
    pub finance: FinanceSettings,
}

/// Calendar display settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CalendarSettings {
    /// How many sessions a calendar cell lists before "+N more"
    pub preview_limit: usize,
}

/// Study tracker settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StudySettings {
    /// Subjects a session may be recorded under
    pub subjects: Vec<String>,
}

/// Finance tracker settings. Categories are suggestions for the entry form;
/// any non-empty category is accepted.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FinanceSettings {
    /// Suggested income categories
    pub income_categories: Vec<String>,
    /// Suggested expense categories
    pub expense_categories: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            calendar: CalendarSettings::default(),
            study: StudySettings::default(),
            finance: FinanceSettings::default(),
        }
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self { preview_limit: 2 }
    }
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            subjects: owned(&[
                "数学",
                "英語",
                "国語",
                "理科",
                "社会",
                "プログラミング",
                "その他",
            ]),
        }
    }
}

impl Default for FinanceSettings {
    fn default() -> Self {
        Self {
            income_categories: owned(&["給与", "ボーナス", "副業", "その他"]),
            expense_categories: owned(&[
                "食費",
                "交通費",
                "娯楽",
                "住居費",
                "光熱費",
                "通信費",
                "その他",
            ]),
        }
    }
}

impl Settings {
    /// Offset for converting stored instants to calendar dates.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| Error::Config {
            message: format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ),
        })
    }

    /// True when `subject` is one of the configured subjects.
    #[must_use]
    pub fn is_known_subject(&self, subject: &str) -> bool {
        self.study.subjects.iter().any(|s| s == subject)
    }

    /// Suggested categories for `kind`. Study has none.
    #[must_use]
    pub fn finance_categories(&self, kind: RecordKind) -> &[String] {
        match kind {
            RecordKind::Income => &self.finance.income_categories,
            RecordKind::Expense => &self.finance.expense_categories,
            RecordKind::Study => &[],
        }
    }
}

/// Parses settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.utc_offset()?;
    Ok(settings)
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML is invalid, or the
/// UTC offset is out of range.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `DAYBOOK_CONFIG` or `./config.toml`, using defaults
/// when the file does not exist.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("DAYBOOK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if Path::new(&path).exists() {
        load_settings(&path)
    } else {
        tracing::info!(%path, "no settings file found, using defaults");
        Ok(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r#"
            utc_offset_minutes = 0

            [calendar]
            preview_limit = 3

            [study]
            subjects = ["math", "english"]

            [finance]
            income_categories = ["salary"]
            expense_categories = ["food", "rent"]
        "#;

        let settings = parse_settings(toml_str).unwrap();
        assert_eq!(settings.utc_offset_minutes, 0);
        assert_eq!(settings.calendar.preview_limit, 3);
        assert!(settings.is_known_subject("math"));
        assert!(!settings.is_known_subject("数学"));
        assert_eq!(settings.finance_categories(RecordKind::Expense), ["food", "rent"]);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings = parse_settings("[calendar]\npreview_limit = 5\n").unwrap();
        assert_eq!(settings.calendar.preview_limit, 5);
        assert_eq!(settings.utc_offset_minutes, 540);
        assert!(settings.is_known_subject("プログラミング"));
        assert_eq!(settings.utc_offset().unwrap().local_minus_utc(), 9 * 3600);
    }

    #[test]
    fn test_default_finance_categories() {
        let settings = Settings::default();
        assert_eq!(
            settings.finance_categories(RecordKind::Income),
            ["給与", "ボーナス", "副業", "その他"]
        );
        assert_eq!(
            settings.finance_categories(RecordKind::Expense),
            ["食費", "交通費", "娯楽", "住居費", "光熱費", "通信費", "その他"]
        );
        assert!(settings.finance_categories(RecordKind::Study).is_empty());
    }

    #[test]
    fn test_empty_settings_equal_default() {
        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            parse_settings("utc_offset_minutes = \"nine\""),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            parse_settings("utc_offset_minutes = 100000"),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_load_settings_missing_file() {
        let result = load_settings("/nonexistent/daybook/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
