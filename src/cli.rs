use crate::config::{CliOverrides, Config};
use crate::error::{ExtractError, Result};
use crate::ui::locale::Language;
use crate::ui::output::OutputMode;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rsb-extract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract RSB payload files from IPA archives")]
#[command(
    long_about = "rsb-extract opens an IPA (or any zip archive), finds every entry whose name \
                  ends with the payload suffix and copies it into an RSB_Files directory next \
                  to the archive."
)]
#[command(after_help = "EXAMPLES:\n  \
    rsb-extract Game.ipa\n  \
    rsb-extract Game.ipa --output ./out --lang es\n  \
    rsb-extract Game.ipa --suffix .bin --subdir BIN_Files\n  \
    rsb-extract Game.ipa --dry-run\n  \
    rsb-extract --lang zh --generate-config\n\n\
    Without an ARCHIVE argument the path is asked for interactively.")]
pub struct Cli {
    /// IPA or zip archive to extract from (prompted for when omitted)
    pub archive: Option<PathBuf>,

    /// Directory to create the output folder in (defaults to the archive's directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Entry name suffix to extract (case-sensitive)
    #[arg(short, long, help = "Entry name suffix to extract, e.g. .rsb")]
    pub suffix: Option<String>,

    /// Name of the output folder created under the output directory
    #[arg(long, value_name = "NAME")]
    pub subdir: Option<String>,

    /// Keep archive directory structure instead of flattening to file names
    #[arg(long, help = "Keep archive paths instead of flattening to base names")]
    pub preserve_structure: Option<bool>,

    /// Message language
    #[arg(short, long, value_enum)]
    pub lang: Option<Language>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Wait for Enter before exiting
    #[arg(long)]
    pub pause: bool,

    /// Dry run (show what would be extracted without writing anything)
    #[arg(long)]
    pub dry_run: bool,

    /// Write the effective configuration to a file and exit
    #[arg(long)]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON lines output
    Json,
    /// Plain text output
    Plain,
}

impl From<&OutputFormat> for OutputMode {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        }
    }
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_suffix(self.suffix.clone())
            .with_subdir_name(self.subdir.clone())
            .with_preserve_structure(self.preserve_structure)
            .with_language(self.lang)
            .with_pause_on_exit(self.pause)
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from(&self.output_format)
    }

    pub fn config_output_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_config_path)
    }

    /// Output root for an archive: `--output` when given, else the
    /// archive's own directory.
    pub fn output_root_for(&self, archive_path: &Path) -> Result<PathBuf> {
        match self.output {
            Some(ref output) => resolve_path(output),
            None => archive_path
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| ExtractError::InvalidPath {
                    path: format!("Archive has no parent directory: {}", archive_path.display()),
                }),
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Makes a path absolute against the current directory without touching
/// the filesystem, so missing archives can still be reported by name.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
