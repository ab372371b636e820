use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "hub",
    version,
    about = "Load hub datasets and inspect the error taxonomy"
)]
pub struct Cli {
    /// Reporting config file (defaults to $XDG_CONFIG_HOME/hub/reporting.toml)
    #[arg(long, global = true, env = "HUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not send the start-up telemetry entry
    #[arg(long, global = true)]
    pub no_telemetry: bool,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a dataset, trying the legacy format first
    Load(LoadArgs),
    /// List every error kind with its category and required parameters
    Kinds,
    /// Render the message for an error kind
    Explain(ExplainArgs),
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Dataset identifier, e.g. `user/mnist`
    pub identifier: String,

    /// Directory holding local datasets
    #[arg(long, env = "HUB_DATA_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Print the dataset metadata as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExplainArgs {
    /// Kind name, case-insensitive (see `hub kinds`)
    pub kind: String,

    /// Parameter as key=value; repeatable
    #[arg(short, long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_load_with_global_flags() {
        let args = ["hub", "load", "user/mnist", "--root", "/data", "-vv", "--no-telemetry"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_telemetry);
        match cli.command {
            Command::Load(args) => {
                assert_eq!(args.identifier, "user/mnist");
                assert_eq!(args.root, PathBuf::from("/data"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_explain_params() {
        let args = [
            "hub",
            "explain",
            "ValueShape",
            "-p",
            "expected=(3,)",
            "--param",
            "actual=(4,)",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Explain(args) => assert_eq!(
                args.params,
                vec![
                    ("expected".to_string(), "(3,)".to_string()),
                    ("actual".to_string(), "(4,)".to_string())
                ]
            ),
            other => panic!("unexpected {other:?}"),
        }
        assert!(Cli::try_parse_from(["hub", "explain", "X", "-p", "novalue"]).is_err());
    }
}
