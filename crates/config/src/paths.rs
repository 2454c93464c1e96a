//! Path conventions for stocksense state

use std::path::PathBuf;

/// Root state directory (~/.stocksense)
pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .expect("failed to locate home directory")
        .join(".stocksense")
}

/// Config file location
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Default location of the tabular datasets
pub fn datasets_dir() -> PathBuf {
    data_dir().join("data")
}

/// Default location of the internal document corpus
pub fn docs_dir() -> PathBuf {
    data_dir().join("docs")
}

/// Ensure directory exists
pub async fn ensure_dir(path: &PathBuf) -> std::io::Result<()> {
    tokio::fs::create_dir_all(path).await
}
