use crate::scanner::suffix_filter::{base_name, SuffixFilter};
use std::io::{Read, Seek};
use zip::result::ZipResult;
use zip::ZipArchive;

/// An archive entry selected for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    /// Position in the archive's central directory.
    pub index: usize,
    pub name: String,
    pub base_name: String,
    pub size: u64,
}

impl MatchedEntry {
    pub fn new(index: usize, name: String, size: u64) -> Self {
        let base_name = base_name(&name).to_string();
        Self {
            index,
            name,
            base_name,
            size,
        }
    }
}

/// Entries selected for one run, in archive order. Never re-sorted.
#[derive(Debug, Clone, Default)]
pub struct MatchSet {
    entries: Vec<MatchedEntry>,
}

impl MatchSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchedEntry> {
        self.entries.iter()
    }

    pub fn get(&self, position: usize) -> Option<&MatchedEntry> {
        self.entries.get(position)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }
}

impl FromIterator<MatchedEntry> for MatchSet {
    fn from_iter<I: IntoIterator<Item = MatchedEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a MatchedEntry;
    type IntoIter = std::slice::Iter<'a, MatchedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

pub struct EntryScanner {
    filter: SuffixFilter,
}

impl EntryScanner {
    pub fn new(filter: SuffixFilter) -> Self {
        Self { filter }
    }

    /// Walks the central directory once, keeping entries whose name ends
    /// with the configured suffix.
    pub fn scan<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> ZipResult<MatchSet> {
        let mut entries = Vec::new();

        for index in 0..archive.len() {
            // Raw access reads metadata only, without setting up decompression
            let file = archive.by_index_raw(index)?;
            let name = file.name().to_string();

            if self.filter.matches(&name) {
                log::debug!("matched entry #{}: {}", index, name);
                entries.push(MatchedEntry::new(index, name, file.size()));
            }
        }

        let matches = MatchSet { entries };
        log::info!("{}", self.get_statistics(&matches, archive.len()).display_summary());

        Ok(matches)
    }

    pub fn get_statistics(&self, matches: &MatchSet, archive_entries: usize) -> ScanStatistics {
        ScanStatistics {
            archive_entries,
            matched_entries: matches.len(),
            matched_bytes: matches.total_bytes(),
            suffix: self.filter.suffix().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanStatistics {
    pub archive_entries: usize,
    pub matched_entries: usize,
    pub matched_bytes: u64,
    pub suffix: String,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        format!(
            "Scanned {} entries: {} ending with '{}' ({} bytes)",
            self.archive_entries, self.matched_entries, self.suffix, self.matched_bytes
        )
    }
}
