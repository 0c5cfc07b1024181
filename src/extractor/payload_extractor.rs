use crate::config::ExtractionConfig;
use crate::error::{ExtractError, Result};
use crate::extractor::target::ExtractionTarget;
use crate::scanner::{EntryScanner, MatchSet, MatchedEntry, SuffixFilter};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use zip::result::ZipError;
use zip::ZipArchive;

const MIN_BUFFER_SIZE: usize = 4096;

/// Emitted once per entry successfully written, in archive order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    /// 1-based position within the match set.
    pub index: usize,
    pub total: usize,
    pub elapsed: Duration,
    pub base_name: String,
    pub entry_name: String,
    pub bytes_written: u64,
}

impl ProgressEvent {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.index as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_last(&self) -> bool {
        self.index == self.total
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub extracted_count: usize,
    /// Base names in the order they were written. May contain duplicates
    /// when entries collide on the same base name.
    pub extracted_names: Vec<String>,
    pub target_directory: PathBuf,
    pub bytes_written: u64,
    pub elapsed: Duration,
}

impl ExtractionResult {
    pub fn joined_names(&self) -> String {
        self.extracted_names.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Archive opened and match set computed; nothing written yet.
    Enumerated,
    Extracting,
    Completed,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Failed)
    }
}

/// Copies payload entries out of a zip archive.
pub struct PayloadExtractor {
    filter: SuffixFilter,
    subdir_name: String,
    preserve_structure: bool,
    buffer_size: usize,
}

impl PayloadExtractor {
    pub fn new<S: Into<String>>(suffix: S) -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            filter: SuffixFilter::new(suffix),
            subdir_name: defaults.subdir_name,
            preserve_structure: defaults.preserve_structure,
            buffer_size: defaults.buffer_size,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            filter: SuffixFilter::from_config(config),
            subdir_name: config.subdir_name.clone(),
            preserve_structure: config.preserve_structure,
            buffer_size: config.buffer_size.max(MIN_BUFFER_SIZE),
        }
    }

    pub fn with_subdir_name<S: Into<String>>(mut self, name: S) -> Self {
        self.subdir_name = name.into();
        self
    }

    pub fn with_preserve_structure(mut self, preserve: bool) -> Self {
        self.preserve_structure = preserve;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(MIN_BUFFER_SIZE);
        self
    }

    pub fn suffix(&self) -> &str {
        self.filter.suffix()
    }

    pub fn target_for(&self, output_root: &Path) -> ExtractionTarget {
        ExtractionTarget::new(output_root, &self.subdir_name)
            .with_preserve_structure(self.preserve_structure)
    }

    /// Opens the archive, computes the match set and prepares the target
    /// directory. Nothing is extracted until the returned run is iterated.
    pub fn open(&self, archive_path: &Path, output_root: &Path) -> Result<ExtractionRun> {
        let start_time = Instant::now();

        let (archive, matches) = self.open_and_scan(archive_path)?;

        let target = self.target_for(output_root);
        target.prepare()?;

        if matches.is_empty() {
            return Err(ExtractError::NoMatchingEntries {
                suffix: self.suffix().to_string(),
            });
        }

        log::info!(
            "extracting {} entries from {} into {}",
            matches.len(),
            archive_path.display(),
            target.directory().display()
        );

        Ok(ExtractionRun {
            archive,
            matches,
            target,
            buffer_size: self.buffer_size,
            position: 0,
            extracted_names: Vec::new(),
            bytes_written: 0,
            start_time,
            state: RunState::Enumerated,
            failure: None,
        })
    }

    /// Match set for an archive without touching the filesystem.
    pub fn plan(&self, archive_path: &Path) -> Result<MatchSet> {
        let (_, matches) = self.open_and_scan(archive_path)?;
        Ok(matches)
    }

    /// Runs to completion, handing each progress event to the callback.
    pub fn extract(
        &self,
        archive_path: &Path,
        output_root: &Path,
        progress_callback: Option<&dyn Fn(&ProgressEvent)>,
    ) -> Result<ExtractionResult> {
        let mut run = self.open(archive_path, output_root)?;

        for event in run.by_ref() {
            let event = event?;
            if let Some(callback) = progress_callback {
                callback(&event);
            }
        }

        run.finish()
    }

    fn open_and_scan(&self, archive_path: &Path) -> Result<(ZipArchive<BufReader<File>>, MatchSet)> {
        if self.suffix().is_empty() {
            return Err(ExtractError::Config {
                message: "Payload suffix must not be empty".to_string(),
            });
        }

        if !archive_path.exists() {
            return Err(ExtractError::ArchiveNotFound {
                path: archive_path.display().to_string(),
            });
        }

        if archive_path.is_dir() {
            return Err(ExtractError::invalid_archive(archive_path, "path is a directory"));
        }

        let file = File::open(archive_path)?;
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| match e {
            ZipError::Io(io_error) if io_error.kind() != io::ErrorKind::UnexpectedEof => {
                ExtractError::Io(io_error)
            }
            other => ExtractError::invalid_archive(archive_path, other),
        })?;

        log::debug!(
            "opened {} ({} entries)",
            archive_path.display(),
            archive.len()
        );

        let matches = EntryScanner::new(self.filter.clone())
            .scan(&mut archive)
            .map_err(|e| ExtractError::invalid_archive(archive_path, e))?;

        Ok((archive, matches))
    }
}

/// A single extraction in progress.
///
/// Iterating yields one `ProgressEvent` per written entry. The first I/O
/// failure is yielded as an error and ends the iteration; files written
/// before it stay on disk. Call [`ExtractionRun::finish`] for the result.
pub struct ExtractionRun {
    archive: ZipArchive<BufReader<File>>,
    matches: MatchSet,
    target: ExtractionTarget,
    buffer_size: usize,
    position: usize,
    extracted_names: Vec<String>,
    bytes_written: u64,
    start_time: Instant,
    state: RunState,
    failure: Option<RunFailure>,
}

#[derive(Debug)]
struct RunFailure {
    entry: String,
    kind: io::ErrorKind,
    message: String,
}

impl RunFailure {
    fn into_error(self) -> ExtractError {
        ExtractError::ExtractionIo {
            entry: self.entry,
            source: io::Error::new(self.kind, self.message),
        }
    }
}

impl ExtractionRun {
    pub fn total(&self) -> usize {
        self.matches.len()
    }

    pub fn target_directory(&self) -> &Path {
        self.target.directory()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn extracted_count(&self) -> usize {
        self.extracted_names.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Drains any remaining entries and returns the terminal outcome.
    pub fn finish(mut self) -> Result<ExtractionResult> {
        for event in self.by_ref() {
            event?;
        }

        if let Some(failure) = self.failure.take() {
            return Err(failure.into_error());
        }

        Ok(ExtractionResult {
            extracted_count: self.extracted_names.len(),
            extracted_names: self.extracted_names,
            target_directory: self.target.directory().to_path_buf(),
            bytes_written: self.bytes_written,
            elapsed: self.start_time.elapsed(),
        })
    }

    fn extract_entry(&mut self, entry: &MatchedEntry) -> io::Result<u64> {
        let destination = self
            .target
            .destination_for(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut source = self.archive.by_index(entry.index).map_err(zip_to_io)?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, File::create(&destination)?);

        let bytes = io::copy(&mut source, &mut writer)?;
        writer.flush()?;

        log::debug!("wrote {} ({} bytes)", destination.display(), bytes);
        Ok(bytes)
    }
}

impl Iterator for ExtractionRun {
    type Item = Result<ProgressEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_terminal() {
            return None;
        }

        let Some(entry) = self.matches.get(self.position).cloned() else {
            self.state = RunState::Completed;
            return None;
        };

        self.state = RunState::Extracting;

        match self.extract_entry(&entry) {
            Ok(bytes_written) => {
                self.position += 1;
                self.bytes_written += bytes_written;
                self.extracted_names.push(entry.base_name.clone());

                if self.position == self.matches.len() {
                    self.state = RunState::Completed;
                }

                Some(Ok(ProgressEvent {
                    index: self.position,
                    total: self.matches.len(),
                    elapsed: self.start_time.elapsed(),
                    base_name: entry.base_name,
                    entry_name: entry.name,
                    bytes_written,
                }))
            }
            Err(source) => {
                log::warn!("extraction of {} failed: {}", entry.name, source);
                self.state = RunState::Failed;
                self.failure = Some(RunFailure {
                    entry: entry.name.clone(),
                    kind: source.kind(),
                    message: source.to_string(),
                });
                Some(Err(ExtractError::ExtractionIo {
                    entry: entry.name,
                    source,
                }))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_terminal() {
            (0, Some(0))
        } else {
            (0, Some(self.matches.len() - self.position))
        }
    }
}

fn zip_to_io(error: ZipError) -> io::Error {
    match error {
        ZipError::Io(e) => e,
        other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_archive(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (entry_name, data) in entries {
            writer.start_file(*entry_name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        let bytes = writer.finish().unwrap().into_inner();

        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_extracts_matching_entries_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let archive = write_archive(
            temp_dir.path(),
            "game.ipa",
            &[
                ("Payload/b.rsb", b"bbb"),
                ("Payload/Info.plist", b"plist"),
                ("Payload/res/a.rsb", b"a"),
            ],
        );

        let extractor = PayloadExtractor::new(".rsb");
        let result = extractor.extract(&archive, temp_dir.path(), None).unwrap();

        assert_eq!(result.extracted_count, 2);
        assert_eq!(result.extracted_names, vec!["b.rsb", "a.rsb"]);
        assert_eq!(result.bytes_written, 4);

        let out = temp_dir.path().join("RSB_Files");
        assert_eq!(result.target_directory, out);
        assert_eq!(fs::read(out.join("b.rsb")).unwrap(), b"bbb");
        assert_eq!(fs::read(out.join("a.rsb")).unwrap(), b"a");
        assert!(!out.join("Info.plist").exists());
    }

    #[test]
    fn test_progress_events() {
        let temp_dir = TempDir::new().unwrap();
        let archive = write_archive(
            temp_dir.path(),
            "game.ipa",
            &[("1.rsb", b"1"), ("2.rsb", b"2"), ("3.rsb", b"3"), ("4.rsb", b"4")],
        );

        let extractor = PayloadExtractor::new(".rsb");
        let run = extractor.open(&archive, temp_dir.path()).unwrap();
        assert_eq!(run.state(), RunState::Enumerated);
        assert_eq!(run.total(), 4);

        let events: Vec<ProgressEvent> = run.map(|e| e.unwrap()).collect();

        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| e.total == 4));
        assert_eq!(events[2].index, 3);
        assert_eq!(format!("{:.2}", events[2].percentage()), "75.00");
        assert!(events[3].is_last());
        assert!(events.windows(2).all(|w| w[0].elapsed <= w[1].elapsed));
    }

    #[test]
    fn test_callback_sees_every_event() {
        let temp_dir = TempDir::new().unwrap();
        let archive = write_archive(temp_dir.path(), "a.zip", &[("x.rsb", b"x"), ("y.rsb", b"y")]);

        let seen = std::cell::RefCell::new(Vec::new());
        let callback = |event: &ProgressEvent| seen.borrow_mut().push(event.base_name.clone());

        let result = PayloadExtractor::new(".rsb")
            .extract(&archive, temp_dir.path(), Some(&callback))
            .unwrap();

        assert_eq!(*seen.borrow(), result.extracted_names);
    }

    #[test]
    fn test_missing_archive() {
        let temp_dir = TempDir::new().unwrap();
        let output_root = temp_dir.path().join("out");

        let result = PayloadExtractor::new(".rsb").open(&temp_dir.path().join("nope.ipa"), &output_root);

        assert!(matches!(result, Err(ExtractError::ArchiveNotFound { .. })));
        assert!(!output_root.exists());
    }

    #[test]
    fn test_invalid_archive() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.ipa");
        fs::write(&path, b"this is not a zip file at all").unwrap();

        let result = PayloadExtractor::new(".rsb").extract(&path, temp_dir.path(), None);

        match result {
            Err(ExtractError::InvalidArchiveFormat { path: p, detail }) => {
                assert!(p.ends_with("broken.ipa"));
                assert!(!detail.is_empty());
            }
            other => panic!("expected InvalidArchiveFormat, got {:?}", other.map(|r| r.extracted_count)),
        }
    }

    #[test]
    fn test_no_matching_entries_still_creates_target() {
        let temp_dir = TempDir::new().unwrap();
        let archive = write_archive(temp_dir.path(), "a.ipa", &[("a.txt", b"a"), ("B.RSB", b"b")]);

        let result = PayloadExtractor::new(".rsb").extract(&archive, temp_dir.path(), None);

        assert!(matches!(result, Err(ExtractError::NoMatchingEntries { .. })));
        let out = temp_dir.path().join("RSB_Files");
        assert!(out.is_dir());
        assert_eq!(fs::read_dir(out).unwrap().count(), 0);
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let archive = write_archive(temp_dir.path(), "a.ipa", &[("a.rsb", b"a")]);

        let result = PayloadExtractor::new("").extract(&archive, temp_dir.path(), None);
        assert!(matches!(result, Err(ExtractError::Config { .. })));
    }

    #[test]
    fn test_colliding_base_names_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let archive = write_archive(
            temp_dir.path(),
            "a.ipa",
            &[("a/x.rsb", b"first"), ("b/x.rsb", b"second")],
        );

        let result = PayloadExtractor::new(".rsb")
            .extract(&archive, temp_dir.path(), None)
            .unwrap();

        assert_eq!(result.extracted_count, 2);
        let out = temp_dir.path().join("RSB_Files");
        assert_eq!(fs::read_dir(&out).unwrap().count(), 1);
        assert_eq!(fs::read(out.join("x.rsb")).unwrap(), b"second");
    }

    #[test]
    fn test_preserve_structure_keeps_both() {
        let temp_dir = TempDir::new().unwrap();
        let archive = write_archive(
            temp_dir.path(),
            "a.ipa",
            &[("a/x.rsb", b"first"), ("b/x.rsb", b"second")],
        );

        PayloadExtractor::new(".rsb")
            .with_preserve_structure(true)
            .extract(&archive, temp_dir.path(), None)
            .unwrap();

        let out = temp_dir.path().join("RSB_Files");
        assert_eq!(fs::read(out.join("a").join("x.rsb")).unwrap(), b"first");
        assert_eq!(fs::read(out.join("b").join("x.rsb")).unwrap(), b"second");
    }

    #[test]
    fn test_write_failure_aborts_run() {
        let temp_dir = TempDir::new().unwrap();
        let archive = write_archive(
            temp_dir.path(),
            "a.ipa",
            &[("ok.rsb", b"ok"), ("blocked.rsb", b"x"), ("never.rsb", b"n")],
        );

        // A directory where the second file should go makes File::create fail
        let out = temp_dir.path().join("RSB_Files");
        fs::create_dir_all(out.join("blocked.rsb")).unwrap();

        let mut run = PayloadExtractor::new(".rsb").open(&archive, temp_dir.path()).unwrap();

        assert!(run.next().unwrap().is_ok());
        match run.next() {
            Some(Err(ExtractError::ExtractionIo { entry, .. })) => assert_eq!(entry, "blocked.rsb"),
            other => panic!("expected ExtractionIo, got {:?}", other.map(|r| r.is_ok())),
        }
        assert!(run.next().is_none());
        assert_eq!(run.state(), RunState::Failed);
        assert_eq!(run.extracted_count(), 1);

        let finished = run.finish();
        assert!(matches!(finished, Err(ExtractError::ExtractionIo { .. })));
        assert!(out.join("ok.rsb").exists());
        assert!(!out.join("never.rsb").exists());
    }

    #[test]
    fn test_plan_does_not_write() {
        let temp_dir = TempDir::new().unwrap();
        let archive = write_archive(temp_dir.path(), "a.ipa", &[("x.rsb", b"x"), ("y.bin", b"y")]);

        let extractor = PayloadExtractor::new(".rsb");
        let matches = extractor.plan(&archive).unwrap();

        assert_eq!(matches.names(), vec!["x.rsb"]);
        assert!(!temp_dir.path().join("RSB_Files").exists());
    }
}
