use crate::error::{ExtractError, Result};
use crate::ui::locale::Language;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_SUFFIX: &str = ".rsb";
pub const DEFAULT_SUBDIR_NAME: &str = "RSB_Files";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub suffix: String,
    pub subdir_name: String,
    pub preserve_structure: bool,
    pub buffer_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    pub language: String,
    pub pause_on_exit: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
            subdir_name: DEFAULT_SUBDIR_NAME.to_string(),
            preserve_structure: false, // basename-only output
            buffer_size: 64 * 1024,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            language: Language::En.code().to_string(),
            pause_on_exit: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExtractError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ExtractError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ExtractError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["rsb-extract.toml", ".rsb-extract.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref suffix) = cli_args.suffix {
            self.extraction.suffix = suffix.clone();
        }

        if let Some(ref subdir_name) = cli_args.subdir_name {
            self.extraction.subdir_name = subdir_name.clone();
        }

        if let Some(preserve_structure) = cli_args.preserve_structure {
            self.extraction.preserve_structure = preserve_structure;
        }

        if let Some(language) = cli_args.language {
            self.ui.language = language.code().to_string();
        }

        if cli_args.pause_on_exit {
            self.ui.pause_on_exit = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ExtractError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ExtractError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.suffix.is_empty() {
            return Err(ExtractError::Config {
                message: "Payload suffix must not be empty".to_string(),
            });
        }

        // Must name exactly one directory under the output root
        let mut components = Path::new(&self.extraction.subdir_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => {
                return Err(ExtractError::Config {
                    message: format!(
                        "Output subdirectory must be a single directory name, got '{}'",
                        self.extraction.subdir_name
                    ),
                });
            }
        }

        if self.extraction.buffer_size < 4096 {
            return Err(ExtractError::Config {
                message: "Copy buffer size must be at least 4096 bytes".to_string(),
            });
        }

        if Language::from_code(&self.ui.language).is_none() {
            return Err(ExtractError::Config {
                message: format!(
                    "Unsupported language '{}' (expected one of: {})",
                    self.ui.language,
                    Language::all()
                        .iter()
                        .map(|l| format!("{} ({})", l.code(), l.display_name()))
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }

        Ok(())
    }

    /// Language for the presentation layer. Falls back to English for codes
    /// that slipped past validation.
    pub fn language(&self) -> Language {
        Language::from_code(&self.ui.language).unwrap_or_default()
    }

    pub fn default_config_path() -> PathBuf {
        PathBuf::from("rsb-extract.toml")
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub suffix: Option<String>,
    pub subdir_name: Option<String>,
    pub preserve_structure: Option<bool>,
    pub language: Option<Language>,
    pub pause_on_exit: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suffix(mut self, suffix: Option<String>) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn with_subdir_name(mut self, subdir_name: Option<String>) -> Self {
        self.subdir_name = subdir_name;
        self
    }

    pub fn with_preserve_structure(mut self, preserve: Option<bool>) -> Self {
        self.preserve_structure = preserve;
        self
    }

    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }

    pub fn with_pause_on_exit(mut self, pause: bool) -> Self {
        self.pause_on_exit = pause;
        self
    }
}
