//! Occupation form driver (ocf-form) - Main entry point
//!
//! Runs a form controller against the built-in company catalog. Commands are
//! read from stdin, one per line; every event the controller publishes is
//! written to stdout as a JSON line. Logs go to stderr.
//!
//! ```text
//! set <field> <text...>   field: company_name | company_address | city_name | phone_number | npwp
//! select <id>             pick a listed suggestion
//! dismiss                 hide the suggestion list
//! submit                  validate everything
//! show                    print the current state
//! quit
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use ocf_common::config::ConfigResolver;
use ocf_common::FieldName;
use ocf_form::{CatalogSuggestionProvider, ControllerConfig, FormController, FormValidator};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for ocf-form
#[derive(Parser, Debug)]
#[command(name = "ocf-form")]
#[command(about = "Interactive driver for the occupation form controller")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, env = "OCF_CONFIG")]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long, env = "OCF_LOG_LEVEL")]
    log_level: Option<String>,
}

const USAGE: &str = "usage: set <field> <text> | select <id> | dismiss | submit | show | quit";

enum Command {
    Set(FieldName, String),
    Select(i64),
    Dismiss,
    Submit,
    Show,
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim_start();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    match verb {
        "set" => {
            let (field, text) = rest.split_once(' ').unwrap_or((rest, ""));
            let field: FieldName = field.parse()?;
            Ok(Command::Set(field, text.to_string()))
        }
        "select" => {
            let id = rest
                .trim()
                .parse()
                .with_context(|| format!("invalid suggestion id '{}'", rest.trim()))?;
            Ok(Command::Select(id))
        }
        "dismiss" => Ok(Command::Dismiss),
        "submit" => Ok(Command::Submit),
        "show" => Ok(Command::Show),
        "quit" | "exit" => Ok(Command::Quit),
        other => anyhow::bail!("unknown command '{}'", other),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before logging is up; its own messages are dropped
    let config = ConfigResolver::new(args.config.clone())
        .resolve()
        .context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("ocf_form={level},ocf_common={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let controller = FormController::with_config(
        Arc::new(CatalogSuggestionProvider::default()),
        FormValidator::new(),
        ControllerConfig::from(&config.form),
    );
    info!("Form {} ready", controller.form_id());

    let printer = {
        let events = controller.event_stream();
        tokio::spawn(async move {
            tokio::pin!(events);
            while let Some(event) = events.next().await {
                match serde_json::to_string(&event) {
                    Ok(json) => println!("{}", json),
                    Err(e) => warn!("Failed to serialize event: {}", e),
                }
            }
        })
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(Command::Set(field, text)) => controller.on_field_changed(field, &text),
            Ok(Command::Select(id)) => {
                let snapshot = controller.snapshot();
                match snapshot.suggestions.iter().find(|s| s.id == id) {
                    Some(suggestion) => controller.on_suggestion_selected(suggestion),
                    None => eprintln!("no listed suggestion with id {}", id),
                }
            }
            Ok(Command::Dismiss) => controller.on_dismiss_suggestions(),
            Ok(Command::Submit) => {
                let outcome = controller.on_submit();
                eprintln!(
                    "submit {}",
                    if outcome.is_accepted() { "accepted" } else { "rejected" }
                );
            }
            Ok(Command::Show) => {
                let json = serde_json::to_string_pretty(&controller.snapshot())
                    .context("Failed to serialize state")?;
                println!("{}", json);
            }
            Ok(Command::Quit) => break,
            Err(e) => eprintln!("{:#}\n{}", e, USAGE),
        }
    }

    // Last handle: pending timers are aborted and the event stream ends
    drop(controller);
    if let Err(e) = printer.await {
        warn!("Event printer ended abnormally: {}", e);
    }
    info!("Driver shutdown complete");
    Ok(())
}
