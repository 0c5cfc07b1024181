use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Archive not found: {path}")]
    ArchiveNotFound { path: String },

    #[error("Not a valid zip archive: {path}: {detail}")]
    InvalidArchiveFormat { path: String, detail: String },

    #[error("No entries ending with '{suffix}' found in archive")]
    NoMatchingEntries { suffix: String },

    #[error("Failed to extract '{entry}': {source}")]
    ExtractionIo {
        entry: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Operation was cancelled by user")]
    Cancelled,
}

impl ExtractError {
    /// Zero matches is an expected outcome rather than a defect.
    pub fn is_informational(&self) -> bool {
        matches!(self, ExtractError::NoMatchingEntries { .. })
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            ExtractError::ArchiveNotFound { .. } => 2,
            ExtractError::InvalidArchiveFormat { .. } => 3,
            ExtractError::NoMatchingEntries { .. } => 4,
            ExtractError::ExtractionIo { .. } => 5,
            ExtractError::Cancelled => 130,
            _ => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for ExtractError {
    fn user_message(&self) -> String {
        match self {
            ExtractError::ArchiveNotFound { path } => {
                format!("Archive file does not exist: {}", path)
            }
            ExtractError::InvalidArchiveFormat { path, detail } => {
                format!("Could not read {} as a zip archive ({})", path, detail)
            }
            ExtractError::NoMatchingEntries { suffix } => {
                format!("The archive contains no files ending with '{}'", suffix)
            }
            ExtractError::ExtractionIo { entry, source } => {
                format!("Extraction stopped at {}: {}", entry, source)
            }
            ExtractError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            ExtractError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            ExtractError::ArchiveNotFound { .. } => Some(
                "Check the path. Relative paths are resolved against the current directory.".to_string()
            ),
            ExtractError::InvalidArchiveFormat { .. } => Some(
                "Make sure the file is a complete, unencrypted IPA or zip archive. Re-download it if the transfer may have been interrupted.".to_string()
            ),
            ExtractError::NoMatchingEntries { .. } => Some(
                "Use --suffix to select a different payload extension, or --dry-run to inspect what would match.".to_string()
            ),
            ExtractError::ExtractionIo { .. } => Some(
                "Files extracted before the failure were left in place. Check free disk space and write permissions, then run again.".to_string()
            ),
            ExtractError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ExtractError {
    fn from(error: toml::de::Error) -> Self {
        ExtractError::Config {
            message: error.to_string(),
        }
    }
}

impl ExtractError {
    /// Archive at `path` could not be read as a zip.
    pub fn invalid_archive(path: &std::path::Path, detail: impl ToString) -> Self {
        ExtractError::InvalidArchiveFormat {
            path: path.display().to_string(),
            detail: detail.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
