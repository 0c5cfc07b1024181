use crate::error::{ExtractError, UserFriendlyError};
use crate::extractor::{ExtractionResult, ProgressEvent};
use crate::scanner::MatchSet;
use crate::ui::locale::Catalog;
use console::{style, Emoji, StyledObject, Term};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static PACKAGE: Emoji = Emoji("📦 ", "> ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
    catalog: &'static Catalog,
    progress_bar: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
            catalog: Catalog::for_language(Default::default()),
            progress_bar: false,
        }
    }

    pub fn with_catalog(mut self, catalog: &'static Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Whether a progress bar is drawn alongside this formatter's output.
    pub fn with_progress_bar(mut self, visible: bool) -> Self {
        self.progress_bar = visible;
        self
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    pub fn start_operation(&self, operation: &str) {
        if !self.should_show_message(0) {
            return;
        }

        match self.mode {
            OutputMode::Human if self.use_colors => {
                println!("{}{}", PACKAGE, style(operation).cyan().bold())
            }
            OutputMode::Human => println!("> {}", operation),
            OutputMode::Json => self.print_json_message("operation_start", operation),
            OutputMode::Plain => println!("STARTING: {}", operation),
        }
    }

    pub fn print_welcome(&self) {
        if !self.should_show_message(0) || self.mode == OutputMode::Json {
            return;
        }

        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.use_colors {
            println!("{}", style(self.catalog.welcome).magenta().bold());
            println!("{}", style(version).magenta());
        } else {
            println!("{}", self.catalog.welcome);
            println!("{}", version);
        }
    }

    /// The per-file line: `Progress: 75.00% | Time elapsed: 0.12s`.
    pub fn progress_line(&self, event: &ProgressEvent) -> String {
        format!(
            "{}: {:.2}% | {}: {:.2}s",
            self.catalog.progress,
            event.percentage(),
            self.catalog.time_elapsed,
            event.elapsed.as_secs_f64()
        )
    }

    pub fn print_progress(&self, event: &ProgressEvent) {
        match self.mode {
            OutputMode::Human => {
                if self.shows_progress_line() {
                    println!("{}", self.progress_line(event));
                }
            }
            OutputMode::Plain => {
                if self.should_show_message(0) {
                    println!("{}", self.progress_line(event));
                }
            }
            OutputMode::Json => {
                if self.should_show_message(0) {
                    self.print_json_object(&serde_json::json!({
                        "type": "progress",
                        "index": event.index,
                        "total": event.total,
                        "percentage": event.percentage(),
                        "elapsed_ms": event.elapsed.as_millis(),
                        "file": event.base_name,
                        "entry": event.entry_name,
                        "bytes": event.bytes_written,
                    }));
                }
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &ExtractError) {
        let user_message = error.user_message();

        match error {
            ExtractError::NoMatchingEntries { .. } => self.warning(self.catalog.not_recognized),
            ExtractError::Cancelled => self.warning(self.catalog.cancelled),
            ExtractError::ArchiveNotFound { .. } => {
                self.error(self.catalog.archive_missing);
                self.error(&user_message);
            }
            _ => self.error(&format!("{}: {}", self.catalog.error, user_message)),
        }

        if self.quiet {
            return;
        }

        let Some(suggestion) = error.suggestion() else {
            return;
        };

        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "suggestion",
                "message": suggestion
            })),
            OutputMode::Plain => println!("SUGGESTION: {}", suggestion),
            OutputMode::Human if self.use_colors => {
                println!("{}{}", INFO, style(format!("Suggestion: {}", suggestion)).cyan())
            }
            OutputMode::Human => println!("Suggestion: {}", suggestion),
        }
    }

    // Summary and reporting
    pub fn print_extraction_summary(&self, result: &ExtractionResult) {
        match self.mode {
            OutputMode::Json => self.print_json_summary(result),
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_summary(result),
            OutputMode::Plain => self.print_plain_summary(result),
        }
    }

    pub fn print_dry_run_plan(&self, archive_path: &Path, target_dir: &Path, matches: &MatchSet) {
        if self.mode == OutputMode::Json {
            self.print_json_object(&serde_json::json!({
                "type": "plan",
                "archive": archive_path.display().to_string(),
                "target_directory": target_dir.display().to_string(),
                "entries": matches.names(),
                "total_bytes": matches.total_bytes(),
            }));
            return;
        }

        self.info("DRY RUN MODE - No files will be extracted");
        self.print_separator();
        println!("  Archive:          {}", archive_path.display());
        println!("  Target directory: {}", target_dir.display());
        println!(
            "  Matching entries: {} ({})",
            matches.len(),
            format_bytes(matches.total_bytes())
        );
        for entry in matches {
            println!("    {} -> {}", entry.name, entry.base_name);
        }
        self.print_separator();
    }

    pub fn print_separator(&self) {
        match self.mode {
            _ if self.quiet => {}
            OutputMode::Json => {}
            OutputMode::Human if self.use_colors => println!("{}", style("─".repeat(60)).dim()),
            OutputMode::Human | OutputMode::Plain => println!("{}", "-".repeat(60)),
        }
    }

    // Private helper methods
    fn shows_progress_line(&self) -> bool {
        // A visible bar already carries the percentage
        let min_verbose_level = if self.progress_bar { 1 } else { 0 };
        self.should_show_message(min_verbose_level)
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn emit(&self, level: Level, message: &str) {
        if let Some(min_verbose_level) = level.min_verbose_level() {
            if !self.should_show_message(min_verbose_level) {
                return;
            }
        }

        let line = match self.mode {
            OutputMode::Json => return self.print_json_message(level.label(), message),
            OutputMode::Plain => format!("{}: {}", level.label().to_uppercase(), message),
            OutputMode::Human if self.use_colors => {
                format!("{}{}", level.emoji(), level.styled(message))
            }
            OutputMode::Human => format!("{} {}", level.marker(), message),
        };

        if level == Level::Error {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, result: &ExtractionResult) {
        println!();
        self.print_separator();

        if self.use_colors {
            println!("{}{}", CHECKMARK, style(self.catalog.done).green().bold());
        } else {
            println!("✓ {}", self.catalog.done);
        }

        let count = if self.use_colors {
            style(result.extracted_count).cyan().bold().to_string()
        } else {
            result.extracted_count.to_string()
        };
        println!("  {} {}", self.catalog.total_extracted, count);
        println!("  {} {}", self.catalog.extracted_files, result.joined_names());
        println!("  {}", result.target_directory.display());
        println!(
            "  {} / {}",
            format_bytes(result.bytes_written),
            format_duration(result.elapsed)
        );

        self.print_separator();
    }

    fn print_json_summary(&self, result: &ExtractionResult) {
        let summary = serde_json::json!({
            "type": "result",
            "extracted_count": result.extracted_count,
            "extracted_names": result.extracted_names,
            "target_directory": result.target_directory.display().to_string(),
            "bytes_written": result.bytes_written,
            "duration_ms": result.elapsed.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        self.print_json_object(&summary);
    }

    fn print_plain_summary(&self, result: &ExtractionResult) {
        println!("{}", self.catalog.done);
        println!("{} {}", self.catalog.total_extracted, result.extracted_count);
        println!("{} {}", self.catalog.extracted_files, result.joined_names());
        println!("Target: {}", result.target_directory.display());
        println!("Duration: {:?}", result.elapsed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Error,
    Warning,
    Info,
    Debug,
}

impl Level {
    /// Errors are shown even in quiet mode.
    fn min_verbose_level(self) -> Option<u8> {
        match self {
            Level::Error => None,
            Level::Warning => Some(0),
            Level::Info => Some(1),
            Level::Debug => Some(2),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Level::Error => "✗",
            Level::Warning => "!",
            Level::Info => "i",
            Level::Debug => " ",
        }
    }

    fn emoji(self) -> Emoji<'static, 'static> {
        match self {
            Level::Error => CROSS,
            Level::Warning => WARNING,
            Level::Info => INFO,
            Level::Debug => Emoji("  ", "  "),
        }
    }

    fn styled(self, message: &str) -> StyledObject<&str> {
        match self {
            Level::Error => style(message).red().bold(),
            Level::Warning => style(message).yellow().bold(),
            Level::Info => style(message).cyan(),
            Level::Debug => style(message).dim(),
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

fn format_duration(duration: Duration) -> String {
    crate::ui::progress::format_duration(duration)
}
