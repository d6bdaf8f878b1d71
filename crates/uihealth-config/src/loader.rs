//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ConfigError;
use crate::schema::Config;

/// Reads `uihealth.toml`: `${VAR}` substitution first, TOML second, then `~`
/// expansion of every path-valued setting.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load `path` if it exists, otherwise fall back to built-in defaults.
    ///
    /// Only use this for the implicit default location; an explicitly requested
    /// file that is missing should be an error.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_paths(&mut config);
        Ok(config)
    }

    /// Substitute `${VAR}` references. Every referenced variable must be set.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let pattern = env_var_pattern()?;

        let missing = pattern
            .captures_iter(content)
            .map(|cap| cap[1].to_string())
            .find(|name| std::env::var(name).is_err());
        if let Some(name) = missing {
            return Err(ConfigError::EnvVarNotSet(name));
        }

        Ok(pattern
            .replace_all(content, |cap: &regex::Captures<'_>| {
                std::env::var(&cap[1]).unwrap_or_default()
            })
            .into_owned())
    }

    fn expand_paths(config: &mut Config) {
        config.evidence.screenshot_dir = Self::expand_path(&config.evidence.screenshot_dir);
        config.report.dir = Self::expand_path(&config.report.dir);
        config.agent.screenshot_dir = Self::expand_path(&config.agent.screenshot_dir);
        if let Some(chrome) = config.browser.chrome_path.take() {
            config.browser.chrome_path = Some(Self::expand_path(&chrome));
        }
    }

    /// Expand shell-style paths (e.g., `~/reports`).
    pub fn expand_path(path: &Path) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
    }
}

fn env_var_pattern() -> Result<Regex, ConfigError> {
    Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::InvalidFormat(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.probe.max_attempts, 5);
        assert_eq!(config.registry().len(), 14);
    }

    #[test]
    fn test_expand_path() {
        let expanded = ConfigLoader::expand_path(Path::new("~/reports"));
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_load_basic_config() {
        let content = r#"
            [target]
            base_url = "http://localhost:5556"

            [probe]
            max_attempts = 3
            interval_ms = 100
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.target.base_url, "http://localhost:5556");
        assert_eq!(config.probe.max_attempts, 3);
        assert_eq!(config.probe.interval_ms, 100);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[browser]").unwrap();
        writeln!(file, "navigation_timeout_ms = 5000").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.browser.navigation_timeout_ms, 5000);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/uihealth.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/uihealth.toml")).unwrap();
        assert_eq!(config.target.base_url, "http://127.0.0.1:8050");
    }

    #[test]
    fn test_load_invalid_toml() {
        let content = "invalid = [unclosed";
        let result = ConfigLoader::load_str(content);
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("UIHEALTH_TEST_BASE", "http://10.1.2.3:8050");
        }
        let content = "[target]\nbase_url = \"${UIHEALTH_TEST_BASE}\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.target.base_url, "http://10.1.2.3:8050");
        unsafe {
            std::env::remove_var("UIHEALTH_TEST_BASE");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_UIHEALTH_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_tilde_paths_are_expanded() {
        let content = "[report]\ndir = \"~/uihealth-reports\"\n[browser]\nchrome_path = \"~/bin/chrome\"";
        let config = ConfigLoader::load_str(content).unwrap();
        assert!(!config.report.dir.to_string_lossy().starts_with('~'));
        assert!(config.report.dir.ends_with("uihealth-reports"));
        assert!(!config.browser.chrome_path.unwrap().to_string_lossy().starts_with('~'));
        // Relative defaults are left alone.
        assert_eq!(config.evidence.screenshot_dir, PathBuf::from("artifacts/ui_health"));
    }

    #[test]
    fn test_expand_env_vars_no_vars() {
        let content = "value = \"no variables here\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert_eq!(expanded, content);
    }
}
