//! Application configuration management

use std::path::PathBuf;

use anyhow::Result;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Storage settings
    pub storage: StorageConfig,
    /// Export settings
    pub export: ExportConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Where profiles and the session are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the profile store directory
    pub data_dir: Option<PathBuf>,
}

/// PDF export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exported files are written to (defaults to Downloads)
    pub output_dir: Option<PathBuf>,
    /// Open the PDF with the system viewer after export
    pub open_after_export: bool,
    /// Typst executable used to compile documents
    pub typst_binary: String,
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme (light/dark)
    pub theme: String,
    /// Saved profiles panel width
    pub sidebar_width: f32,
    /// Form panel width
    pub form_width: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            open_after_export: true,
            typst_binary: "typst".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            sidebar_width: 260.0,
            form_width: 420.0,
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "portfolio-generator", "Portfolio Generator")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !path.exists() {
            // First run: write the defaults so there is a file to edit
            let config = Self::default();
            if let Err(e) = config.save() {
                tracing::warn!("Failed to write default config: {}", e);
            }
            return Ok(config);
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Get the profile store directory
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("store"))
                .unwrap_or_else(|| PathBuf::from("store"))
        })
    }

    /// Get the directory exported PDFs land in
    pub fn output_dir(&self) -> PathBuf {
        self.export.output_dir.clone().unwrap_or_else(|| {
            UserDirs::new()
                .and_then(|dirs| dirs.download_dir().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    /// Whether the dark theme is selected
    pub fn dark_theme(&self) -> bool {
        self.ui.theme.eq_ignore_ascii_case("dark")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"export": {"open_after_export": false}}"#).unwrap();
        assert!(!config.export.open_after_export);
        assert_eq!(config.export.typst_binary, "typst");
        assert_eq!(config.ui.sidebar_width, 260.0);
        assert!(!config.dark_theme());
    }

    #[test]
    fn test_overrides_win() {
        let mut config = AppConfig::default();
        config.storage.data_dir = Some(PathBuf::from("/tmp/profiles"));
        config.export.output_dir = Some(PathBuf::from("/tmp/out"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/profiles"));
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/out"));
    }
}
