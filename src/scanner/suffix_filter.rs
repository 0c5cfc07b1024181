use crate::config::ExtractionConfig;

/// Selects archive entries by a literal, case-sensitive name suffix.
#[derive(Debug, Clone)]
pub struct SuffixFilter {
    suffix: String,
}

impl SuffixFilter {
    pub fn new<S: Into<String>>(suffix: S) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.suffix.clone())
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Compares against the entry's full in-archive name, not its base name.
    pub fn matches(&self, entry_name: &str) -> bool {
        entry_name.ends_with(&self.suffix)
    }
}

/// Last `/`-separated segment of an entry name.
pub fn base_name(entry_name: &str) -> &str {
    entry_name.rsplit('/').next().unwrap_or(entry_name)
}
