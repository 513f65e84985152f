//! INI file configuration adapter.
//!
//! Sections: `[analysis]`, `[feed]`, `[ai]`, `[logging]`. Every key is
//! optional; an absent file is equivalent to an empty one.

use crate::domain::error::BondwatchError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BondwatchError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| BondwatchError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, BondwatchError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| BondwatchError::ConfigParse {
                file: "<inline>".into(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// No file given: every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[analysis]
as_of_date = 2026-01-05
investment_amount = 250000
sort_by = ytm

[feed]
host = mirror.example.org
refresh_delay_ms = 0
seed = 42

[ai]
api_key_env = MY_GEMINI_KEY
timeout_secs = 20

[logging]
level = debug
"#;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn load_errors_are_reportable() {
        let err = FileConfigAdapter::from_file("/nonexistent/bondwatch.ini").unwrap_err();
        assert!(matches!(err, BondwatchError::ConfigParse { .. }));
        assert!(format!("{:?}", FileConfigAdapter::empty()).starts_with("FileConfigAdapter"));
    }

    #[test]
    fn reads_every_section() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("analysis", "sort_by"),
            Some("ytm".to_string())
        );
        assert_eq!(
            adapter.get_double("analysis", "investment_amount", 0.0),
            250000.0
        );
        assert_eq!(
            adapter.get_string("feed", "host"),
            Some("mirror.example.org".to_string())
        );
        assert_eq!(adapter.get_int("feed", "seed", 0), 42);
        assert_eq!(adapter.get_int("ai", "timeout_secs", 15), 20);
        assert_eq!(
            adapter.get_string("logging", "level"),
            Some("debug".to_string())
        );
    }

    #[test]
    fn missing_keys_fall_back() {
        let adapter = FileConfigAdapter::from_string("[analysis]\n").unwrap();
        assert_eq!(adapter.get_string("analysis", "as_of_date"), None);
        assert_eq!(adapter.get_string("feed", "host"), None);
        assert_eq!(adapter.get_int("feed", "refresh_delay_ms", 2000), 2000);
        assert_eq!(
            adapter.get_double("analysis", "investment_amount", 1_000_000.0),
            1_000_000.0
        );
    }

    #[test]
    fn non_numeric_values_fall_back() {
        let adapter = FileConfigAdapter::from_string(
            "[analysis]\ninvestment_amount = lots\n[feed]\nrefresh_delay_ms = soon\n",
        )
        .unwrap();
        assert_eq!(adapter.get_double("analysis", "investment_amount", 7.0), 7.0);
        assert_eq!(adapter.get_int("feed", "refresh_delay_ms", 9), 9);
    }

    #[test]
    fn bool_values() {
        let adapter = FileConfigAdapter::from_string(
            "[feed]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("feed", "a", false));
        assert!(adapter.get_bool("feed", "b", false));
        assert!(adapter.get_bool("feed", "c", false));
        assert!(!adapter.get_bool("feed", "d", true));
        assert!(!adapter.get_bool("feed", "e", true));
        assert!(!adapter.get_bool("feed", "f", true));
        assert!(adapter.get_bool("feed", "g", true));
        assert!(!adapter.get_bool("feed", "missing", false));
    }

    #[test]
    fn get_date_parses_and_rejects() {
        let adapter = FileConfigAdapter::from_string(
            "[analysis]\nas_of_date = 2026-01-05\nyield_reference_date = 05/01/2026\n",
        )
        .unwrap();
        assert_eq!(
            adapter.get_date("analysis", "as_of_date").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
        assert_eq!(adapter.get_date("analysis", "missing").unwrap(), None);
        assert!(adapter.get_date("analysis", "yield_reference_date").is_err());
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config(SAMPLE);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("ai", "api_key_env"),
            Some("MY_GEMINI_KEY".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/bondwatch.ini");
        match result {
            Err(BondwatchError::ConfigParse { file, .. }) => {
                assert!(file.ends_with("bondwatch.ini"))
            }
            _ => panic!("expected ConfigParse"),
        }
    }

    #[test]
    fn empty_adapter_has_no_values() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("analysis", "as_of_date"), None);
        assert_eq!(adapter.get_int("ai", "timeout_secs", 15), 15);
    }
}
