pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExtractionConfig, UiConfig};
pub use error::{ExtractError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    ExtractionResult, ExtractionRun, ExtractionTarget, PayloadExtractor, ProgressEvent, RunState,
};
pub use scanner::{EntryScanner, MatchSet, MatchedEntry, SuffixFilter};
pub use ui::{Catalog, GracefulShutdown, Language, OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface: the extraction core wired to terminal output.
pub struct RsbExtract {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl RsbExtract {
    /// Create a new instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::with_shutdown(config, output_mode, verbose, quiet, shutdown))
    }

    /// Create an instance without installing a Ctrl+C handler
    pub fn new_without_signals(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self::with_shutdown(config, output_mode, verbose, quiet, GracefulShutdown::without_handler())
    }

    fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        let catalog = Catalog::for_language(config.language());
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet).with_catalog(catalog);
        let progress_manager = ProgressManager::new(
            !quiet && output_mode == OutputMode::Human && console::Term::stderr().is_term(),
        );
        let output_formatter = output_formatter.with_progress_bar(progress_manager.is_enabled());

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    /// Create an instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        Self::new(config, cli_args.output_mode(), cli_args.verbose, cli_args.quiet)
    }

    /// Extract every payload entry of `archive_path` into
    /// `<output_root>/<subdir>`, rendering progress as it goes.
    ///
    /// A Ctrl+C stops the run between files and yields `Cancelled`; files
    /// already written are kept.
    pub fn extract_archive(&self, archive_path: &Path, output_root: &Path) -> Result<ExtractionResult> {
        self.run_extraction(archive_path, output_root, |_| {})
    }

    fn run_extraction<F>(&self, archive_path: &Path, output_root: &Path, mut on_event: F) -> Result<ExtractionResult>
    where
        F: FnMut(&ProgressEvent),
    {
        self.shutdown.check_shutdown()?;

        self.output_formatter.start_operation(self.output_formatter.catalog().extracting);
        self.output_formatter.debug(&format!("Archive: {}", archive_path.display()));

        let extractor = PayloadExtractor::from_config(&self.config.extraction);

        let spinner = self
            .progress_manager
            .create_spinner(&format!("Reading {}", archive_path.display()));
        let opened = extractor.open(archive_path, output_root);
        spinner.finish_and_clear();
        let mut run = opened?;

        self.output_formatter.info(&format!(
            "Found {} files ending with '{}'",
            run.total(),
            extractor.suffix()
        ));

        let file_progress = self.progress_manager.create_file_progress(run.total() as u64);

        for event in run.by_ref() {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    file_progress.abandon();
                    return Err(e);
                }
            };

            ui::progress::update_file_progress(&file_progress, &event);
            self.progress_manager
                .suspend(|| self.output_formatter.print_progress(&event));
            on_event(&event);

            if !event.is_last() && !self.shutdown.is_running() {
                file_progress.abandon();
                self.progress_manager.clear();
                return Err(ExtractError::Cancelled);
            }
        }

        let result = run.finish()?;

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Extracted {} files", result.extracted_count),
            result.elapsed,
        );

        Ok(result)
    }

    /// Match set and target directory for an archive, without writing.
    pub fn plan(&self, archive_path: &Path, output_root: &Path) -> Result<MatchSet> {
        let extractor = PayloadExtractor::from_config(&self.config.extraction);
        let matches = extractor.plan(archive_path)?;

        self.output_formatter.print_dry_run_plan(
            archive_path,
            extractor.target_for(output_root).directory(),
            &matches,
        );

        Ok(matches)
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Get progress manager reference
    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ExtractError) {
        self.progress_manager
            .suspend(|| self.output_formatter.print_user_friendly_error(error));
    }
}

/// Extract every entry whose name ends with `suffix` from `archive_path`
/// into `<output_root>/RSB_Files`, with no terminal output.
pub fn extract_payloads(archive_path: &Path, output_root: &Path, suffix: &str) -> Result<ExtractionResult> {
    PayloadExtractor::new(suffix).extract(archive_path, output_root, None)
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Get build information
pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        target: std::env::consts::ARCH.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "rsb-extract {} ({}) built on {} for {}",
            self.version, self.git_hash, self.build_date, self.target
        )
    }
}
