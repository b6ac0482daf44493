use serde::{Deserialize, Serialize};

use crate::{
    ledger::{Credits, LedgerSettings, DEFAULT_CREDITS, DEFAULT_SU_CAP},
    storage::{ImportMode, DEFAULT_EXPORT_FILE},
};

use super::ConfigError;

pub const CONFIG_KEYS: [&str; 5] = [
    "su_cap",
    "default_credits",
    "import_mode",
    "export_path",
    "plain_output",
];

/// User preferences persisted between shell sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_su_cap")]
    pub su_cap: usize,
    #[serde(default = "Config::default_credits")]
    pub default_credits: u32,
    #[serde(default)]
    pub import_mode: ImportMode,
    #[serde(default = "Config::default_export_path")]
    pub export_path: String,
    #[serde(default)]
    pub plain_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            su_cap: Self::default_su_cap(),
            default_credits: Self::default_credits(),
            import_mode: ImportMode::default(),
            export_path: Self::default_export_path(),
            plain_output: false,
        }
    }
}

impl Config {
    pub fn default_su_cap() -> usize {
        DEFAULT_SU_CAP
    }

    pub fn default_credits() -> u32 {
        DEFAULT_CREDITS
    }

    pub fn default_export_path() -> String {
        DEFAULT_EXPORT_FILE.into()
    }

    /// Ledger tunables derived from this config. A hand-edited file with an
    /// illegal credit default falls back to 4.
    pub fn ledger_settings(&self) -> LedgerSettings {
        LedgerSettings {
            su_cap: self.su_cap,
            default_credits: Credits::new(i64::from(self.default_credits)).unwrap_or_default(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        match key.to_ascii_lowercase().as_str() {
            "su_cap" => {
                let cap: usize = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number"))?;
                if cap == 0 {
                    return Err(invalid("cap must be at least 1"));
                }
                self.su_cap = cap;
            }
            "default_credits" => {
                let credits: i64 = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number"))?;
                let credits = Credits::new(credits).map_err(|err| invalid(&err.to_string()))?;
                self.default_credits = credits.value();
            }
            "import_mode" => {
                self.import_mode =
                    ImportMode::parse(value).ok_or_else(|| invalid("use `strict` or `lenient`"))?;
            }
            "export_path" => {
                if value.trim().is_empty() {
                    return Err(invalid("path cannot be empty"));
                }
                self.export_path = value.to_string();
            }
            "plain_output" => {
                self.plain_output = parse_flag(value).ok_or_else(|| invalid("use on/off"))?;
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
