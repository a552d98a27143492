use crate::error::{CommentBlockError, Result};
use crate::settings::{BlockOverrides, BlockSettings};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure for comment blocks
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Settings applied to every block
    pub defaults: BlockOverrides,

    /// Named block templates, selected with `--block NAME`
    pub blocks: BTreeMap<String, BlockOverrides>,
}

// From trait implementations for better ergonomics
impl From<PathBuf> for Config {
    fn from(path: PathBuf) -> Self {
        Config::load_from_file(&path).unwrap_or_default()
    }
}

impl From<&Path> for Config {
    fn from(path: &Path) -> Self {
        Config::load_from_file(path).unwrap_or_default()
    }
}

// Configuration loading
impl Config {
    /// Load configuration from file, or use defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::find_config_file() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CommentBlockError::config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| CommentBlockError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| CommentBlockError::config(format!("Failed to serialize config: {}", e)))?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CommentBlockError::config(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, toml_string)
            .map_err(|e| CommentBlockError::config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Find config file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        // Check in order of priority:
        // 1. Environment variable set from the --config flag
        if let Ok(path) = std::env::var("COMMENT_BLOCKS_CONFIG_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Environment variable
        if let Ok(path) = std::env::var("COMMENT_BLOCKS_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 3. XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("comment-blocks").join("config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 4. Home directory
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir.join(".comment-blocks.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Get default config file path (for creating new config)
    pub fn default_config_path() -> Result<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("comment-blocks").join("config.toml"))
        } else {
            Err(CommentBlockError::config(
                "Could not determine config directory",
            ))
        }
    }

    /// Names of the configured block templates
    pub fn block_names(&self) -> Vec<&str> {
        self.blocks.keys().map(String::as_str).collect()
    }

    /// Merge everything that applies to one invocation.
    ///
    /// Precedence, lowest first: built-in defaults, `[defaults]`, the named
    /// block, then `args`.
    pub fn settings_for(&self, block: Option<&str>, args: BlockOverrides) -> Result<BlockSettings> {
        let named = match block {
            Some(name) => self.blocks.get(name).cloned().ok_or_else(|| {
                CommentBlockError::config(format!(
                    "Unknown block '{}'. Configured blocks: {}",
                    name,
                    self.block_names().join(", ")
                ))
            })?,
            None => BlockOverrides::default(),
        };

        Ok(args
            .over(named)
            .over(self.defaults.clone())
            .into_settings())
    }

    /// Generate example config file content
    pub fn example_toml() -> &'static str {
        r#"# Comment Blocks Configuration File
#
# Every key may be a single value (used for all lines) or an array with one
# value per line. Short arrays repeat their last value; `subjects` decides
# how many lines a block has.

[defaults]
lineLength = 80                      # number, "minimum" or "minimum + N"
startText = "${BLOCK_COMMENT_START}"
# endText defaults to ${LINE_COMMENT} when startText starts with it,
# otherwise to ${BLOCK_COMMENT_END}
justify = "center"                   # left, center or right
gapLeft = 3
gapRight = 3
padLines = "-"
subjects = ["", "${selectedText}", ""]
selectCurrentLine = true
keepIndentation = false

# Named templates, used with `comment-blocks --block <name>`

[blocks.banner]
startText = "${LINE_COMMENT}"
padLines = "="
subjects = ["", "\\U${selectedText}", ""]

[blocks.file-header]
lineLength = [80, 80, 80, 80]
startText = ["${BLOCK_COMMENT_START}", " *", " *", " "]
endText = ["", "", "", "${BLOCK_COMMENT_END}"]
justify = "left"
gapLeft = 1
padLines = [" ", " ", " ", "*"]
subjects = ["", "${relativeFile}", "${CURRENT_YEAR}-${CURRENT_MONTH}-${CURRENT_DATE}", ""]

[blocks.fit]
lineLength = "minimum + 4"
startText = "${LINE_COMMENT}"
justify = "left"
gapLeft = 1
padLines = " "
subjects = ["${selectedText}"]

[blocks.ask]
justify = "${getInput}"
padLines = "${getInput}"
subjects = ["", "${getInput}", ""]
"#
    }
}

// Global configuration instance
use std::sync::OnceLock;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration instance
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Config::default()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LineLength, Numeric, Setting};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.blocks.is_empty());
        let settings = config.settings_for(None, BlockOverrides::default()).unwrap();
        assert_eq!(settings, BlockSettings::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.defaults.pad_lines = Some(Setting::Scalar("=".to_string()));
        config.blocks.insert(
            "fit".to_string(),
            BlockOverrides {
                line_length: Some(Setting::Scalar(LineLength::Minimum { offset: 2 })),
                gap_left: Some(Setting::PerLine(vec![
                    Numeric::Value(1.0),
                    Numeric::Placeholder("${getInput}".to_string()),
                ])),
                ..Default::default()
            },
        );
        config.save(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_example_config() {
        let example = Config::example_toml();
        assert!(example.contains("Comment Blocks Configuration"));

        let config = Config::from_toml(example).unwrap();
        assert_eq!(config.block_names(), vec!["ask", "banner", "file-header", "fit"]);
        assert_eq!(
            config.blocks["fit"].line_length,
            Some(Setting::Scalar(LineLength::Minimum { offset: 4 }))
        );
        assert_eq!(
            config.blocks["banner"].subjects.as_ref().unwrap()[1],
            r"\U${selectedText}"
        );
    }

    #[test]
    fn test_settings_precedence() {
        let config = Config::from_toml(
            r##"
[defaults]
padLines = "="
gapLeft = 1

[blocks.wide]
lineLength = 100
padLines = "#"
"##,
        )
        .unwrap();

        let args: BlockOverrides = serde_json::from_str(r#"{"gapLeft": 5}"#).unwrap();
        let settings = config.settings_for(Some("wide"), args).unwrap();
        assert_eq!(settings.line_length, Setting::Scalar(LineLength::Columns(100.0)));
        assert_eq!(settings.pad_lines, Setting::Scalar("#".to_string()));
        assert_eq!(settings.gap_left, Setting::Scalar(Numeric::Value(5.0)));
        assert_eq!(settings.gap_right, Setting::Scalar(Numeric::Value(3.0)));
    }

    #[test]
    fn test_unknown_block_is_an_error() {
        let config = Config::default();
        let err = config
            .settings_for(Some("missing"), BlockOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("Unknown block 'missing'"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("lineLength = [").unwrap_err();
        assert!(matches!(err, CommentBlockError::Config(_)));
    }
}
