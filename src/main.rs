//! CLI entry point for ecoprompt.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::Colorize;
use dotenvy::dotenv;
use indicatif::ProgressBar;

mod client;
mod config;
mod core;
mod error_taxonomy;
mod logging;
mod models;
mod palette;
mod presenter;
mod tui;
mod utils;

use crate::client::AnalysisClient;
use crate::config::Config;
use crate::core::engine::spawn_engine;
use crate::core::events::Event;
use crate::models::AnalysisResult;
use crate::presenter::PresentationModel;

#[derive(Parser, Debug)]
#[command(
    name = "ecoprompt",
    author,
    version,
    about = "Analyze prompts for redundant text and resource savings",
    long_about = "Submit a prompt to the analysis service and see the optimized \
                  version next to the water and energy it saves.\n\n\
                  Just run 'ecoprompt' for the interactive UI."
)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Analyze a single prompt (non-interactive)
    #[arg(short, long)]
    prompt: Option<String>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the analysis endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Analyze a single prompt and print the result
    Exec {
        /// Prompt to analyze
        prompt: String,
    },
    /// Check configuration and endpoint reachability
    Doctor,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    if let Some(command) = cli.command.clone() {
        return match command {
            Commands::Exec { prompt } => {
                let config = load_config_from_cli(&cli)?;
                run_one_shot(&config, &prompt).await
            }
            Commands::Doctor => {
                let config = load_config_from_cli(&cli)?;
                run_doctor(&config).await;
                Ok(())
            }
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        };
    }

    let config = load_config_from_cli(&cli)?;

    // One-shot prompt mode
    if let Some(prompt) = cli.prompt {
        return run_one_shot(&config, &prompt).await;
    }

    // Default: interactive TUI
    tui::run_tui(&config).await
}

fn load_config_from_cli(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.clone())?;
    if let Some(endpoint) = cli.endpoint.clone() {
        config.endpoint_url = Some(endpoint);
        config.validate()?;
    }
    Ok(config)
}

/// Generate shell completions for the given shell
fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

// === One-Shot Mode ===

/// Run a single analysis through the engine and print the outcome.
async fn run_one_shot(config: &Config, prompt: &str) -> Result<()> {
    let client = AnalysisClient::new(config)?;
    let retry = config.retry_policy();
    let max_attempts = retry.max_attempts;
    let (engine_handle, mut rx_event) = spawn_engine(client, retry);

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Analyzing prompt…");
    spinner.enable_steady_tick(Duration::from_millis(80));

    engine_handle.submit(prompt).await?;

    let outcome = loop {
        let Some(event) = rx_event.recv().await else {
            spinner.finish_and_clear();
            bail!("engine stopped unexpectedly");
        };
        if let Event::AttemptFailed { attempt, .. } = &event {
            spinner.set_message(format!(
                "Retrying… (attempt {} of {max_attempts})",
                attempt + 2
            ));
        }
        if event.is_terminal() {
            break event;
        }
    };

    spinner.finish_and_clear();
    let _ = engine_handle.shutdown().await;

    match outcome {
        Event::Completed { result, view } => {
            print_result(&result, &view);
            Ok(())
        }
        Event::SubmitRejected { message } | Event::Failed { message, .. } => {
            bail!("{message}")
        }
        _ => unreachable!("loop breaks only on terminal events"),
    }
}

fn print_result(result: &AnalysisResult, view: &PresentationModel) {
    let (green_r, green_g, green_b) = palette::ECO_GREEN_RGB;
    let (red_r, red_g, red_b) = palette::ECO_RED_RGB;
    let (water_r, water_g, water_b) = palette::ECO_WATER_RGB;

    if view.has_redundant_parts {
        println!(
            "{}",
            view.removed_segments
                .join(" ")
                .truecolor(red_r, red_g, red_b)
                .strikethrough()
        );
    }
    println!(
        "{}",
        result
            .optimized_prompt
            .truecolor(green_r, green_g, green_b)
            .bold()
    );
    println!();

    let consumption = &result.consumption;
    for (label, detail) in [
        ("before", &consumption.before),
        ("after ", &consumption.after),
        ("saved ", &consumption.saved),
    ] {
        println!(
            "  {}  {}",
            label.dimmed(),
            presenter::format_consumption(detail)
                .truecolor(water_r, water_g, water_b)
        );
    }
    if let Some(percent) = presenter::savings_percent(consumption) {
        println!(
            "  {}  {}",
            "total ".dimmed(),
            format!("{percent}% saved")
                .truecolor(green_r, green_g, green_b)
                .bold()
        );
    }
}

// === Doctor ===

/// Check configuration and report endpoint reachability.
async fn run_doctor(config: &Config) {
    let (green_r, green_g, green_b) = palette::ECO_GREEN_RGB;
    let (amber_r, amber_g, amber_b) = palette::ECO_AMBER_RGB;
    let (red_r, red_g, red_b) = palette::ECO_RED_RGB;

    println!(
        "{}",
        "ecoprompt doctor".truecolor(green_r, green_g, green_b).bold()
    );
    println!();

    println!("{}", "Version:".bold());
    println!("  ecoprompt: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("{}", "Configuration:".bold());
    let config_file = dirs::home_dir()
        .map(|home| home.join(".ecoprompt").join("config.toml"));
    match config_file {
        Some(path) if path.exists() => println!(
            "  {} config.toml found at {}",
            "✓".truecolor(green_r, green_g, green_b),
            path.display()
        ),
        _ => println!(
            "  {} config.toml not found (using defaults)",
            "!".truecolor(amber_r, amber_g, amber_b)
        ),
    }
    let endpoint = config.endpoint_url();
    println!("  endpoint: {endpoint}");
    println!(
        "  retry: {} attempts, {:.0}ms base delay",
        config.retry_policy().max_attempts,
        config.retry_policy().initial_delay * 1000.0
    );
    println!();

    println!("{}", "Endpoint:".bold());
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build();
    let reachable = match client {
        Ok(client) => client.get(&endpoint).send().await.is_ok(),
        Err(_) => false,
    };
    if reachable {
        // Any HTTP response counts; the analysis route itself only answers POST.
        println!(
            "  {} service is reachable",
            "✓".truecolor(green_r, green_g, green_b)
        );
    } else {
        println!(
            "  {} service is not reachable at {endpoint}",
            "✗".truecolor(red_r, red_g, red_b)
        );
    }
}
