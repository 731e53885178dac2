// Engine settings, loaded from an optional JSON file
use anyhow::{Context, Result};
use serde::Deserialize;
use shared::ist::{ReportingZone, IST_OFFSET_MINUTES};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::EngineError;

// Real-world UTC offsets stay within -12:00..=+14:00.
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ShopSettings {
    pub name: String,
    pub contact: String,
    pub footer: String,
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            name: "MyChoice Jewelers".to_string(),
            contact: String::new(),
            footer: "Computer Generated Bill".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub shop: ShopSettings,
    /// Offset of the zone reporting periods are expressed in. IST by default.
    pub reporting_offset_minutes: i32,
    /// JSON snapshot the command line keeps the records in.
    pub store_path: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            shop: ShopSettings::default(),
            reporting_offset_minutes: IST_OFFSET_MINUTES,
            store_path: PathBuf::from("ledger.json"),
        }
    }
}

impl EngineSettings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading settings file: {}", path.display()))?;
        let settings: EngineSettings = serde_json::from_str(&raw)
            .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults when no path is given.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(settings_path) => Self::load(settings_path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.reporting_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(EngineError::ConfigError(format!(
                "reporting_offset_minutes {} is outside +/-{}",
                self.reporting_offset_minutes, MAX_OFFSET_MINUTES
            )));
        }
        if self.shop.name.trim().is_empty() {
            return Err(EngineError::ConfigError("shop.name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn zone(&self) -> ReportingZone {
        ReportingZone::from_offset_minutes(self.reporting_offset_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults_use_ist() {
        let settings = EngineSettings::load_optional(None).unwrap();
        assert_eq!(settings.zone(), ReportingZone::IST);
        assert_eq!(settings.shop.name, "MyChoice Jewelers");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = settings_file(r#"{ "shop": { "name": "Lakshmi Gold House" } }"#);
        let settings = EngineSettings::load(file.path()).unwrap();
        assert_eq!(settings.shop.name, "Lakshmi Gold House");
        assert_eq!(settings.shop.footer, "Computer Generated Bill");
        assert_eq!(settings.reporting_offset_minutes, 330);
        assert_eq!(settings.store_path, PathBuf::from("ledger.json"));
    }

    #[test]
    fn test_rejects_impossible_offset() {
        let file = settings_file(r#"{ "reporting_offset_minutes": 2000 }"#);
        let err = EngineSettings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("reporting_offset_minutes"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = EngineSettings::load("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("Reading settings file"));
    }

    #[test]
    fn test_malformed_json() {
        let file = settings_file("{ not json");
        let err = EngineSettings::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Parsing settings JSON"));
    }
}
