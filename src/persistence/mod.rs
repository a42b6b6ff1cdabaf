use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::Deserialize;
use tracing::info;

use crate::core::KoyomiError;

const APP_NAME: &str = "koyomi";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join(APP_NAME)
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

/// Missing file means defaults, an unreadable or malformed one is an error.
pub fn load_hjson<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> Result<T, KoyomiError> {
    if !path.exists() {
        info!(path = %path.display(), "no file found, using defaults");
        return Ok(T::default());
    }

    let text = fs::read_to_string(path).map_err(|e| {
        KoyomiError::FailedToLoadConfig(format!("{}: {}", path.display(), e))
    })?;
    let data: T = serde_hjson::from_str(&text)?;
    info!(path = %path.display(), "data loaded");
    Ok(data)
}
