//! Process configuration, read once at startup.

use std::{
    env,
    path::{
        Path,
        PathBuf,
    },
    time::Duration,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::KoyomiError,
    grid::{
        GridDefinition,
        GridLayout,
    },
    persistence::{
        get_data_file_path,
        load_hjson,
    },
};

pub const CONFIG_FILE: &str = "config.hjson";
pub const OCR_API_KEY_VAR: &str = "KOYOMI_OCR_API_KEY";
pub const CALENDAR_TOKEN_VAR: &str = "KOYOMI_CALENDAR_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub language_hints: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            api_key: None,
            language_hints: vec!["ja".to_string()],
            timeout_secs: 60,
        }
    }
}

impl OcrSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    pub base_url: String,
    pub calendar_id: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            calendar_id: "primary".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl CalendarSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub grid: GridLayout,
    pub ocr: OcrSettings,
    pub calendar: CalendarSettings,
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        get_data_file_path(CONFIG_FILE)
    }

    /// Reads `path` (or the default location), then fills credentials from the
    /// environment when the file leaves them out.
    pub fn load(path: Option<&Path>) -> Result<Self, KoyomiError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let mut config: AppConfig = load_hjson(&path)?;
        config.apply_env(|name| env::var(name).ok());
        Ok(config)
    }

    pub fn from_hjson(text: &str) -> Result<Self, KoyomiError> {
        Ok(serde_hjson::from_str(text)?)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.ocr.api_key.is_none() {
            self.ocr.api_key = lookup(OCR_API_KEY_VAR).filter(|v| !v.is_empty());
        }
        if self.calendar.token.is_none() {
            self.calendar.token = lookup(CALENDAR_TOKEN_VAR).filter(|v| !v.is_empty());
        }
    }

    pub fn grid_definition(&self) -> Result<GridDefinition, KoyomiError> {
        Ok(GridDefinition::from_layout(&self.grid)?)
    }
}
