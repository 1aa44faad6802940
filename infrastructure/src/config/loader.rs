//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use scout_application::AdapterSettings;
use scout_domain::ConfigIssue;
use std::fmt::Write as _;
use std::path::PathBuf;
use thiserror::Error;

const PROJECT_FILENAMES: [&str; 2] = ["scout.toml", ".scout.toml"];
const ENV_PREFIX: &str = "SCOUT_";

/// Failure to produce usable settings.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `SCOUT_*` environment variables (nested keys separated by `__`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./scout.toml` or `./.scout.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/source-scout/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment.extract().map_err(Box::new)
    }

    /// Load, validate and convert into immutable [`AdapterSettings`].
    ///
    /// Errors abort; warnings are returned alongside the settings so the
    /// caller can log them.
    pub fn load_settings(
        config_path: Option<&PathBuf>,
    ) -> Result<(AdapterSettings, Vec<ConfigIssue>), ConfigLoadError> {
        let config = Self::load(config_path)?;
        Self::settings_from(&config)
    }

    /// Validate an already-loaded [`FileConfig`] and convert it.
    pub fn settings_from(
        config: &FileConfig,
    ) -> Result<(AdapterSettings, Vec<ConfigIssue>), ConfigLoadError> {
        let issues = config.validate();
        let errors: Vec<String> = issues
            .iter()
            .filter(|i| i.is_error())
            .map(|i| i.message.clone())
            .collect();
        if !errors.is_empty() {
            return Err(ConfigLoadError::Invalid(errors));
        }
        Ok((config.to_settings(), issues))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("source-scout").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILENAMES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for debugging)
    pub fn describe_config_sources() -> String {
        let mut out = String::from("Configuration sources (in priority order):\n");

        let _ = writeln!(out, "  [ENV  ] Environment: {}*", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            let _ = writeln!(out, "  [FOUND] Project: {}", path.display());
        } else {
            let _ = writeln!(out, "  [     ] Project: ./scout.toml or ./.scout.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            let _ = writeln!(out, "  [{}] Global:  {}", mark, path.display());
        }

        out.push_str("  [     ] Default: built-in defaults\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::time::Duration;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.limits.max_items, 10);
        assert_eq!(config.http.timeout_seconds, 30);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("source-scout"));
    }

    #[test]
    fn test_project_file_is_merged() {
        Jail::expect_with(|jail| {
            jail.create_file("scout.toml", "[limits]\nmax_items = 4\n")?;
            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.limits.max_items, 4);
            assert_eq!(config.limits.max_snippet_length, 500);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file("scout.toml", "[http]\ntimeout_seconds = 12\n")?;
            jail.create_file("custom.toml", "[http]\ntimeout_seconds = 7\n")?;
            let path = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&path)).map_err(|e| *e)?;
            assert_eq!(config.http.timeout_seconds, 7);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file("scout.toml", "[http]\ntimeout_seconds = 12\n")?;
            jail.set_env("SCOUT_HTTP__TIMEOUT_SECONDS", "5");
            jail.set_env("SCOUT_HTTP__CONTACT_EMAIL", "ops@example.org");
            let (settings, issues) = ConfigLoader::load_settings(None).map_err(|e| e.to_string())?;
            assert!(issues.is_empty());
            assert_eq!(settings.timeout, Duration::from_secs(5));
            assert_eq!(settings.contact_email.as_deref(), Some("ops@example.org"));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(".scout.toml", "[limits]\nmax_items = 0\n")?;
            let err = ConfigLoader::load_settings(None).unwrap_err();
            assert!(matches!(err, ConfigLoadError::Invalid(ref msgs) if msgs.len() == 1));
            assert!(err.to_string().contains("limits.max_items"));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_figment_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[limits]\nmax_items = \"many\"\n").unwrap();
        let err = ConfigLoader::load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Figment(_)));
    }

    #[test]
    fn test_describe_config_sources() {
        let text = ConfigLoader::describe_config_sources();
        assert!(text.contains("scout.toml"));
        assert!(text.contains("SCOUT_"));
    }
}
