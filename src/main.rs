// file: src/main.rs
// description: commandline application entry point with interactive and single-shot modes
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use nl_search::utils::logging::{format_error, format_info, format_warning};
use nl_search::{Config, QueryPipeline, TerminalPresenter};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "nl_search")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Natural-language search over OpenSearch", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Print the generated query DSL before the results
    #[arg(long, action = ArgAction::SetTrue)]
    show_dsl: bool,

    /// Search this index instead of the configured one
    #[arg(long, value_name = "NAME")]
    index: Option<String>,

    /// Query text; starts the interactive loop when omitted
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    colored::control::set_override(cli.color);
    nl_search::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Starting natural-language search");

    let mut config = if cli.config.exists() {
        info!("Loading configuration from: {}", cli.config.display());
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using defaults and environment",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    if let Some(index) = cli.index {
        config.search.index = index;
        config.validate().context("Invalid index override")?;
    }

    info!(
        "Configuration loaded - Index: {}, Max results: {}",
        config.search.index, config.search.max_results
    );

    let pipeline =
        QueryPipeline::from_config(&config).context("Failed to initialize search services")?;
    let presenter = TerminalPresenter::new(config.search.max_results).with_dsl(cli.show_dsl);

    if cli.query.is_empty() {
        run_interactive(&pipeline, &presenter).await
    } else {
        let query = cli.query.join(" ");
        run_single(&pipeline, &presenter, &query).await
    }
}

async fn run_single(
    pipeline: &QueryPipeline,
    presenter: &TerminalPresenter,
    query: &str,
) -> Result<()> {
    info!("Processing query: {}", query);

    let outcome = pipeline
        .run(query)
        .await
        .with_context(|| format!("Failed to process query \"{}\"", query))?;
    presenter.print(&outcome);

    Ok(())
}

async fn run_interactive(pipeline: &QueryPipeline, presenter: &TerminalPresenter) -> Result<()> {
    println!(
        "{}",
        format_info(&format!(
            "Natural-language search on index '{}' ({} conversion)",
            pipeline.index(),
            pipeline.strategy()
        ))
    );
    println!("{}", format_info("Enter queries (type 'exit' to quit)"));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Query: ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            info!("User requested exit");
            break;
        }

        match pipeline.run(query).await {
            Ok(outcome) => presenter.print(&outcome),
            Err(e) => {
                error!("Error processing query: {}", e);
                eprintln!("{}", format_error(&e.to_string()));
                if e.is_fatal() {
                    eprintln!("{}", format_warning("Unrecoverable error, exiting"));
                    return Err(e.into());
                }
            }
        }
    }

    info!("Interactive mode ended");
    Ok(())
}
