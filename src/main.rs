use clap::Parser;
use rsb_extract::cli::resolve_path;
use rsb_extract::ui::prompt;
use rsb_extract::{
    Cli, Config, ExtractError, OutputFormatter, OutputMode, RsbExtract, UserFriendlyError,
};
use std::path::PathBuf;
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level());

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let app = match RsbExtract::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    app.output_formatter().print_welcome();

    let exit_code = match resolve_archive(&cli, &app) {
        Ok(archive) if cli.dry_run => handle_dry_run(&cli, &app, archive),
        Ok(archive) => handle_extract(&cli, &app, archive),
        Err(e) => {
            app.handle_error(&e);
            e.exit_code()
        }
    };

    if app.config().ui.pause_on_exit {
        prompt::wait_for_enter(app.output_formatter().catalog());
    }

    exit_code
}

fn resolve_archive(cli: &Cli, app: &RsbExtract) -> rsb_extract::Result<PathBuf> {
    let raw = match cli.archive {
        Some(ref archive) => archive.clone(),
        None => prompt::prompt_archive_path(app.output_formatter().catalog())?,
    };

    resolve_path(&raw)
}

fn handle_extract(cli: &Cli, app: &RsbExtract, archive: PathBuf) -> i32 {
    let result = cli
        .output_root_for(&archive)
        .and_then(|output_root| app.extract_archive(&archive, &output_root));

    match result {
        Ok(result) => {
            app.output_formatter().print_extraction_summary(&result);
            0
        }
        Err(e) => {
            app.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_dry_run(cli: &Cli, app: &RsbExtract, archive: PathBuf) -> i32 {
    let result = cli
        .output_root_for(&archive)
        .and_then(|output_root| app.plan(&archive, &output_root));

    match result {
        Ok(matches) if matches.is_empty() => {
            let error = ExtractError::NoMatchingEntries {
                suffix: app.config().extraction.suffix.clone(),
            };
            app.handle_error(&error);
            error.exit_code()
        }
        Ok(_) => {
            app.output_formatter().info("Run without --dry-run to perform actual extraction");
            0
        }
        Err(e) => {
            app.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli.config_output_path();

    // Start from the existing file so regenerating only applies the new flags
    let base = if config_path.exists() {
        Config::load_from_file(&config_path)
    } else {
        Ok(Config::default())
    };

    let result = base.and_then(|mut config| {
        config.merge_with_cli_args(&cli.create_cli_overrides());
        config.validate()?;
        config.save_to_file(&config_path)
    });

    match result {
        Ok(()) => {
            println!("Generated configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!("  rsb-extract <archive> --config {}", config_path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            e.exit_code()
        }
    }
}

fn print_startup_error(error: &ExtractError) {
    // Create a basic formatter for startup errors
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(verbosity: u8) {
    let default_filter = if verbosity >= 2 {
        "rsb_extract=debug"
    } else {
        "rsb_extract=warn"
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .try_init();
}
