use crate::error::{ExtractError, Result};
use crate::scanner::MatchedEntry;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// The directory a run writes into: `<output_root>/<subdir_name>`.
///
/// Created on demand and never removed here; cleaning up old output is left
/// to whoever owns the output root.
#[derive(Debug, Clone)]
pub struct ExtractionTarget {
    output_root: PathBuf,
    directory: PathBuf,
    preserve_structure: bool,
}

impl ExtractionTarget {
    pub fn new<P: Into<PathBuf>>(output_root: P, subdir_name: &str) -> Self {
        let output_root = output_root.into();
        let directory = output_root.join(subdir_name);

        Self {
            output_root,
            directory,
            preserve_structure: false,
        }
    }

    pub fn with_preserve_structure(mut self, preserve: bool) -> Self {
        self.preserve_structure = preserve;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Creates the target directory. Safe to call when it already exists.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.directory)?;
        log::debug!("extraction target ready: {}", self.directory.display());
        Ok(())
    }

    /// Where an entry's bytes are written.
    ///
    /// By default only the base name is used, so entries sharing a base name
    /// overwrite each other and the later one wins. With structure
    /// preservation the entry path is kept, minus any component that could
    /// leave the target directory.
    pub fn destination_for(&self, entry: &MatchedEntry) -> Result<PathBuf> {
        let relative = if self.preserve_structure {
            sanitize_entry_path(&entry.name)
        } else {
            PathBuf::from(&entry.base_name)
        };

        if relative.as_os_str().is_empty() {
            return Err(ExtractError::InvalidPath {
                path: format!("Entry has no usable file name: {}", entry.name),
            });
        }

        Ok(self.directory.join(relative))
    }
}

fn sanitize_entry_path(name: &str) -> PathBuf {
    Path::new(name)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}
