//! `hub` command line: load datasets and inspect the error taxonomy.
//!
//! Errors that end a run are reported once through the installed policy, rendered
//! with miette, and mapped to an exit status by category (see [`Category::exit_code`]).

mod cli;
mod tracing_setup;

use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use hub_error::{
    Category, CombinedPolicy, ConstructionError, ErrorKind, ErrorPolicy, HubError, MiettePolicy,
    Params, ResultExt, TracingPolicy,
};
use hub_load::{DatasetHandle, Format, Loaded, local_dispatcher};
use hub_report::{ConfigError, DiagnosticsPolicy, Reporter, ReporterConfig, initialize_telemetry};
use tracing::{debug, info, warn};

use crate::cli::{Cli, Command, ExplainArgs, LoadArgs};

/// What ended a run early.
enum Failure {
    Hub(HubError),
    Config(ConfigError),
    Usage(ConstructionError),
}

impl Failure {
    fn exit_code(&self) -> ExitCode {
        let category = match self {
            Failure::Hub(e) => e.category(),
            Failure::Config(_) => Category::Environment,
            Failure::Usage(_) => Category::UserInput,
        };
        ExitCode::from(category.exit_code())
    }

    fn render(&self) {
        match self {
            Failure::Hub(e) => MiettePolicy.render(e),
            Failure::Config(e) => eprintln!("error: {e}"),
            Failure::Usage(e) => eprintln!("error: {e}"),
        }
    }
}

impl From<HubError> for Failure {
    fn from(e: HubError) -> Self {
        Failure::Hub(e)
    }
}

impl From<ConfigError> for Failure {
    fn from(e: ConfigError) -> Self {
        Failure::Config(e)
    }
}

impl From<ConstructionError> for Failure {
    fn from(e: ConstructionError) -> Self {
        Failure::Usage(e)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_setup::init_tracing_once(cli.verbose);

    let policy = match build_policy(&cli) {
        Ok(policy) => policy,
        Err(failure) => {
            failure.render();
            return failure.exit_code();
        }
    };

    match run(cli.command, &policy) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            failure.render();
            failure.exit_code()
        }
    }
}

/// Load reporting config, send start-up telemetry, and assemble the error policy.
///
/// Only an unreadable or invalid `--config` file stops the run. Problems with the
/// default file or `HUB_REPORTING_*` variables disable reporting instead.
fn build_policy(cli: &Cli) -> Result<Arc<dyn ErrorPolicy>, Failure> {
    let resolved = match &cli.config {
        Some(path) => ReporterConfig::load_from_path(path)?
            .with_env_overrides(|key| std::env::var(key).ok()),
        None => ReporterConfig::load_default(),
    };
    let reporter = match resolved {
        Ok(config) => Reporter::from_config(&config),
        Err(e) => {
            warn!(error = %e, "diagnostics reporting disabled: invalid reporting config");
            Reporter::disabled()
        }
    };
    let reporter = Arc::new(reporter);
    debug!(enabled = reporter.is_enabled(), "diagnostics reporter ready");

    if !cli.no_telemetry {
        initialize_telemetry(&reporter);
    }

    // errors that end the run are rendered by miette, so tracing stays at debug
    let policy = CombinedPolicy::new()
        .push(TracingPolicy::quiet())
        .push(DiagnosticsPolicy::new(reporter));
    Ok(Arc::new(policy))
}

fn run(command: Command, policy: &Arc<dyn ErrorPolicy>) -> Result<(), Failure> {
    match command {
        Command::Load(args) => load(args, policy),
        Command::Kinds => {
            print_kinds();
            Ok(())
        }
        Command::Explain(args) => explain(args),
    }
}

fn load(args: LoadArgs, policy: &Arc<dyn ErrorPolicy>) -> Result<(), Failure> {
    let dispatcher = local_dispatcher(args.root.clone(), Arc::clone(policy));
    let Loaded {
        dataset,
        format,
        deprecation,
    } = dispatcher
        .dispatch(&args.identifier)
        .report_err(policy.as_ref())?;
    info!(identifier = %dataset.identifier, ?format, "dataset loaded");

    if args.json {
        println!("{:#}", dataset.metadata);
    } else {
        print_summary(&dataset, format, deprecation.is_some());
    }
    Ok(())
}

fn print_summary(dataset: &DatasetHandle, format: Format, deprecated: bool) {
    let label = match format {
        Format::Legacy => "legacy (v0.x)",
        Format::Current => "current",
    };
    println!("dataset: {}", dataset.identifier);
    println!("path:    {}", dataset.path.display());
    let suffix = if deprecated { ", deprecated" } else { "" };
    println!("format:  {label}{suffix}");
    if let Some(obj) = dataset.metadata.as_object() {
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        let fields = if keys.is_empty() {
            "-".to_string()
        } else {
            keys.join(", ")
        };
        println!("fields:  {fields}");
    }
}

fn print_kinds() {
    for kind in ErrorKind::ALL {
        let required = kind.required_params();
        let required = if required.is_empty() {
            "-".to_string()
        } else {
            required.join(", ")
        };
        println!("{:<30} {:<15} {required}", kind.name(), kind.category().label());
    }
}

/// Build the error from the given params and print its message. Nothing is reported.
fn explain(args: ExplainArgs) -> Result<(), Failure> {
    let kind = ErrorKind::from_str(args.kind.trim())?;
    let params: Params = args.params.into_iter().collect();
    let error = HubError::new(kind, params)?;
    println!("{}", error.message());
    println!("kind:     {}", error.name());
    let category = error.category();
    println!("category: {category} (exit {})", category.exit_code());
    if !error.is_reportable() {
        println!("silent:   never sent to diagnostics");
    }
    if let Some(help) = error.help() {
        println!("help:     {help}");
    }
    Ok(())
}
