use anyhow::{Context, Result};
use shared::settings::AppSettings;
use std::fs;
use std::path::{Path, PathBuf};

fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com.local", "Typeahead", "Typeahead")
        .map(|proj| proj.config_dir().join("settings.json"))
}

/// Load settings from the user's config dir, writing defaults on first run.
pub fn load_settings_or_default() -> Result<AppSettings> {
    match config_path() {
        Some(path) => load_or_init(&path),
        None => {
            tracing::warn!("no config directory available, using default settings");
            Ok(AppSettings::default())
        }
    }
}

fn load_or_init(path: &Path) -> Result<AppSettings> {
    if path.exists() {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        return serde_json::from_slice::<AppSettings>(&bytes)
            .with_context(|| format!("malformed settings file {}", path.display()));
    }

    let settings = AppSettings::default();
    if let Err(e) = save_settings(path, &settings) {
        tracing::warn!(error = %e, "could not write default settings");
    } else {
        tracing::info!(path = %path.display(), "wrote default settings");
    }
    Ok(settings)
}

fn save_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(settings)?)?;
    Ok(())
}
