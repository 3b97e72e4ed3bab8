use std::cell::Cell;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use release_validator::cli::{BundleArgs, Cli, ColorChoice, Commands, NewDirArgs, RootsArgs};
use release_validator::config::{Config, ConfigLoader, FileConfigLoader};
use release_validator::host::{Bundle, BundleKind, LocalHost, ShareDirectoryHookData};
use release_validator::output::{
    ColorMode, JsonFormatter, OutputFormat, OutputFormatter, ScanProgress, TextFormatter,
};
use release_validator::result::ScanResult;
use release_validator::runner::{Decision, ScanConfiguration, ScanOutcome, ScanRunnerRegistry};
use release_validator::validator::ValidatorRegistry;
use release_validator::{EXIT_CONFIG_ERROR, EXIT_REJECTED, EXIT_SUCCESS};

type Registry = ScanRunnerRegistry<LocalHost, Box<dyn Fn() -> ScanConfiguration + Send + Sync>>;

const fn color_choice_to_mode(choice: ColorChoice) -> ColorMode {
    match choice {
        ColorChoice::Auto => ColorMode::Auto,
        ColorChoice::Always => ColorMode::Always,
        ColorChoice::Never => ColorMode::Never,
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let exit_code = match run(&cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::debug!(kind = e.error_type(), error = ?e, "command failed");
            eprintln!("Error: {e}");
            EXIT_CONFIG_ERROR
        }
    };

    std::process::exit(exit_code);
}

const fn default_log_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "release_validator=warn";
    }
    match verbose {
        0 => "release_validator=info",
        1 => "release_validator=debug",
        _ => "release_validator=trace",
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> release_validator::Result<i32> {
    let mut config = load_config(cli.config.as_deref(), cli.no_config)?;
    if cli.ignore_excluded {
        config.ignore_excluded = true;
    }

    let validators = ValidatorRegistry::from_config(&config)?;
    if let Commands::Validators = cli.command {
        return run_validators(cli, &config, &validators);
    }

    let host = LocalHost::new(&config.share)?;
    let source: Box<dyn Fn() -> ScanConfiguration + Send + Sync> =
        Box::new(move || ScanConfiguration::from_config(&config, &validators));
    let registry: Registry = ScanRunnerRegistry::new(host, source);

    match &cli.command {
        Commands::Bundle(args) => run_bundle(cli, &registry, args),
        Commands::NewDir(args) => run_new_dir(cli, &registry, args),
        Commands::Roots(args) => run_roots(cli, &registry, args),
        Commands::Share => run_share(cli, &registry),
        Commands::Validators => Ok(EXIT_SUCCESS),
    }
}

fn load_config(config_path: Option<&Path>, no_config: bool) -> release_validator::Result<Config> {
    if no_config {
        return Ok(Config::default());
    }

    let loader = FileConfigLoader::new();
    config_path.map_or_else(|| loader.load(), |path| loader.load_from_path(path))
}

/// Canonical form of a user-supplied path; the raw path when it cannot be
/// resolved, so the scan itself reports the access failure.
fn resolve_path(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn run_bundle(cli: &Cli, registry: &Registry, args: &BundleArgs) -> release_validator::Result<i32> {
    let target = resolve_path(&args.path);
    let bundle = Bundle {
        name: target
            .file_name()
            .map_or_else(|| target.display().to_string(), |n| n.to_string_lossy().into_owned()),
        target,
        kind: if args.file {
            BundleKind::File
        } else {
            BundleKind::Directory
        },
    };

    let progress = ScanProgress::new(&format!("Validating bundle {}", bundle.name), cli.quiet);
    let verdict = Cell::new(None);
    let outcome = registry.on_bundle_finished(
        &bundle,
        || verdict.set(Some(Decision::Accepted)),
        |message| verdict.set(Some(Decision::Rejected(message))),
    );
    progress.finish();

    report_hook(cli, &outcome, verdict.into_inner())
}

fn run_new_dir(cli: &Cli, registry: &Registry, args: &NewDirArgs) -> release_validator::Result<i32> {
    let data = ShareDirectoryHookData {
        path: resolve_path(&args.path),
        new_parent: false,
    };

    let verdict = Cell::new(None);
    let outcome = registry.on_share_directory_added(
        &data,
        || verdict.set(Some(Decision::Accepted)),
        |message| verdict.set(Some(Decision::Rejected(message))),
    );

    report_hook(cli, &outcome, verdict.into_inner())
}

fn run_roots(cli: &Cli, registry: &Registry, args: &RootsArgs) -> release_validator::Result<i32> {
    let ids = (!args.ids.is_empty()).then_some(args.ids.as_slice());

    let progress = ScanProgress::new("Scanning share roots", cli.quiet);
    let result = registry.scan_share_roots(ids);
    progress.finish();

    report_scan(cli, result)
}

fn run_share(cli: &Cli, registry: &Registry) -> release_validator::Result<i32> {
    let progress = ScanProgress::new("Scanning share", cli.quiet);
    let result = registry.scan_share();
    progress.finish();

    report_scan(cli, result)
}

fn report_hook(
    cli: &Cli,
    outcome: &ScanOutcome,
    verdict: Option<Decision>,
) -> release_validator::Result<i32> {
    let output = format_output(cli, &outcome.result, verdict.as_ref())?;
    write_output(&output, cli.quiet);

    Ok(match verdict {
        Some(Decision::Rejected(_)) => EXIT_REJECTED,
        Some(Decision::Accepted) | None => EXIT_SUCCESS,
    })
}

fn report_scan(cli: &Cli, result: Option<ScanResult>) -> release_validator::Result<i32> {
    let Some(result) = result else {
        return Err(release_validator::ReleaseValidatorError::Config(
            "A share scan is already running".to_string(),
        ));
    };

    let output = format_output(cli, &result, None)?;
    write_output(&output, cli.quiet);

    Ok(if result.is_clean() {
        EXIT_SUCCESS
    } else {
        EXIT_REJECTED
    })
}

#[derive(Serialize)]
struct ValidatorInfo<'a> {
    key: &'a str,
    title: &'a str,
    enabled: bool,
}

fn run_validators(
    cli: &Cli,
    config: &Config,
    validators: &ValidatorRegistry,
) -> release_validator::Result<i32> {
    let infos: Vec<ValidatorInfo<'_>> = validators
        .definitions()
        .iter()
        .map(|d| ValidatorInfo {
            key: d.key,
            title: d.title,
            enabled: config.validator_enabled(d.key, d.default_enabled),
        })
        .collect();

    let output = match cli.format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&infos)?),
        OutputFormat::Text => format_validators_text(&infos),
    };
    write_output(&output, cli.quiet);

    Ok(EXIT_SUCCESS)
}

fn format_validators_text(infos: &[ValidatorInfo<'_>]) -> String {
    infos
        .iter()
        .map(|info| {
            let mark = if info.enabled { "x" } else { " " };
            format!("[{mark}] {:<16} {}\n", info.key, info.title)
        })
        .collect()
}

fn format_output(
    cli: &Cli,
    result: &ScanResult,
    decision: Option<&Decision>,
) -> release_validator::Result<String> {
    match cli.format {
        OutputFormat::Text => {
            TextFormatter::new(color_choice_to_mode(cli.color)).format(result, decision)
        }
        OutputFormat::Json => JsonFormatter
            .format(result, decision)
            .map(|json| format!("{json}\n")),
    }
}

fn write_output(content: &str, quiet: bool) {
    if !quiet {
        print!("{content}");
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
