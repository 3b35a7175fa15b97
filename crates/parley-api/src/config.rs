//! Settings loading: TOML file plus environment overrides.
//!
//! The file is optional; defaults apply when it is absent. Environment
//! variables override the file so deployments can keep credentials and
//! host-specific values out of it:
//!
//! - `PARLEY_CONFIG`          - path to the settings file (default `parley.toml`)
//! - `PARLEY_DB_URL`          - database URL
//! - `PARLEY_GPT_FOLDER_ID`   - completion provider folder id
//! - `PARLEY_GPT_API_KEY`     - completion provider API key (env-only, never in the file)

use std::path::{Path, PathBuf};

use anyhow::Context;
use parley_types::config::Settings;

/// Resolve the settings file path from the CLI flag or `PARLEY_CONFIG`.
pub fn settings_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path
        .or_else(|| std::env::var("PARLEY_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("parley.toml"))
}

/// Load settings from the given file (defaults when missing) and apply
/// environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = if path.exists() {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))?
    } else {
        Settings::default()
    };

    if let Ok(url) = std::env::var("PARLEY_DB_URL") {
        settings.database.url = Some(url);
    }
    if let Ok(folder_id) = std::env::var("PARLEY_GPT_FOLDER_ID") {
        settings.completion.folder_id = folder_id;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings.api.port, 8000);
    }

    #[test]
    fn test_file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parley.toml");
        std::fs::write(
            &path,
            "[api]\nport = 9999\n\n[completion]\nfolder_id = \"b1gexample\"\n",
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.api.port, 9999);
        assert_eq!(settings.completion.folder_id, "b1gexample");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parley.toml");
        std::fs::write(&path, "this is not toml [").unwrap();
        assert!(load_settings(&path).is_err());
    }

    #[test]
    fn test_settings_path_defaults() {
        assert_eq!(settings_path(None), PathBuf::from("parley.toml"));
        assert_eq!(
            settings_path(Some(PathBuf::from("/etc/parley.toml"))),
            PathBuf::from("/etc/parley.toml")
        );
    }
}
