use inkpage_engine::models::{StrokeTool, ToolPalette};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid width {width} for {tool:?} in {config_path}: must be positive")]
    InvalidToolWidth {
        config_path: PathBuf,
        tool: StrokeTool,
        width: f64,
    },
}

/// User settings: starting colours and widths for the ink tools, and where
/// to write the log
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub tools: ToolPalette,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        for tool in [StrokeTool::Pen, StrokeTool::Highlighter] {
            let width = config.tools.settings_for(tool).width;
            if width.is_nan() || width <= 0.0 {
                return Err(ConfigError::InvalidToolWidth {
                    config_path: config_path.to_path_buf(),
                    tool,
                    width,
                });
            }
        }

        // Expand shell variables and tilde in the log path
        config.log_file = config
            .log_file
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/inkpage");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpage_engine::models::ToolSettings;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/inkpage/config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_empty_file_gives_default_palette() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "");

        let config = Config::load_from_path(&path).unwrap().unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.tools.highlighter.color, "#ffeb3b");
    }

    #[test]
    fn test_partial_tool_table() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r##"
[tools.highlighter]
color = "#8bc34a"
width = 16.0
"##,
        );

        let config = Config::load_from_path(&path).unwrap().unwrap();

        assert_eq!(config.tools.highlighter, ToolSettings::new("#8bc34a", 16.0));
        assert_eq!(config.tools.pen, ToolPalette::default().pen);
    }

    #[test]
    fn test_non_positive_width_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r##"
[tools.pen]
color = "#000000"
width = 0.0
"##,
        );

        let err = Config::load_from_path(&path).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::InvalidToolWidth {
                tool: StrokeTool::Pen,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "tools = 3");

        let err = Config::load_from_path(&path).unwrap_err();

        assert!(err.to_string().contains("config.toml"));
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_log_file_env_var_expanded() {
        unsafe {
            env::set_var("INKPAGE_TEST_LOGS", "/var/tmp/inkpage");
        }
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, r#"log_file = "$INKPAGE_TEST_LOGS/editor.log""#);

        let config = Config::load_from_path(&path).unwrap().unwrap();

        assert_eq!(
            config.log_file,
            Some(PathBuf::from("/var/tmp/inkpage/editor.log"))
        );
        unsafe {
            env::remove_var("INKPAGE_TEST_LOGS");
        }
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(&PathBuf::from("~/logs/ink.log")).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("logs/ink.log"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.tools.pen = ToolSettings::new("#3f51b5", 3.5);
        config.log_file = Some(PathBuf::from("/tmp/inkpage.log"));

        config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, config);
    }
}
