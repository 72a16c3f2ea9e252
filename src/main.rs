use anyhow::{Context, Result};
use calcpad::calculator::{DisplayState, EvaluationOutcome};
use calcpad::{logging, repl};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "calcpad", version, about = "Keypad calculator")]
struct Cli {
    /// Feed one key sequence (e.g. "12+3=") and print the final display.
    #[arg(long, conflicts_with = "expr")]
    keys: Option<String>,

    /// Validate and evaluate a single expression.
    #[arg(long)]
    expr: Option<String>,

    /// Print displays as JSON objects.
    #[arg(long)]
    json: bool,

    /// Configuration file (defaults to <config_dir>/calcpad/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn print_display(display: &DisplayState, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(display)?);
    } else {
        println!("{}", display.text);
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = logging::load_config(cli.config.as_deref(), cli.verbose)
        .context("Failed to load configuration")?;
    logging::init(cli.verbose, config.log_filter.as_deref());
    debug!(?config, "configuration ready");

    if let Some(expr) = cli.expr.as_deref() {
        return match config.evaluator().calculate(expr) {
            EvaluationOutcome::Value(value) => {
                print_display(&DisplayState::from_buffer(&value), cli.json)?;
                Ok(ExitCode::SUCCESS)
            }
            EvaluationOutcome::Error(err) => {
                print_display(&DisplayState::error(&config.error_message), cli.json)?;
                eprintln!("{}: {}", err.kind(), err);
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let mut session = config.session();

    if let Some(keys) = cli.keys.as_deref() {
        let display = session.submit_all(repl::tokens_from_keys(keys));
        print_display(&display, cli.json)?;
        return Ok(if display.is_error {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        });
    }

    let stdin = io::stdin();
    if stdin.is_terminal() && !cli.json {
        info!("interactive session started");
        println!("calcpad: type keys, '=' to evaluate, 'c' to clear, '<' to delete, ':q' to quit");
    }

    repl::run(
        &mut session,
        &config.repl,
        cli.json,
        stdin.lock(),
        io::stdout().lock(),
    )
    .context("I/O error in interactive session")?;

    Ok(ExitCode::SUCCESS)
}
