use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use ecopack_client::config::{check_endpoint, ClientConfig};
use ecopack_client::view;
use ecopack_client::{
    HttpPredictionService, PredictionController, PredictionStatus, RequirementInputs,
};

/// Sustainable packaging recommendations from the EcoPackAI service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Prediction service origin (overrides ECOPACK_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request ranked packaging materials for a product
    Predict {
        /// Weight capacity required (1-10)
        #[arg(long, default_value_t = 5.0)]
        weight: f64,
        /// Product strength requirement (1-10)
        #[arg(long, default_value_t = 5.0)]
        strength: f64,
        /// Barrier protection needed (1-10)
        #[arg(long, default_value_t = 5.0)]
        barrier: f64,
        /// Reuse potential (1-10)
        #[arg(long, default_value_t = 5.0)]
        reuse: f64,
        /// Show details for this rank instead of the top one
        #[arg(long)]
        select: Option<usize>,
        /// List every recommendation, not only the top three
        #[arg(long, default_value_t = false)]
        show_all: bool,
        /// Print the raw recommendation list as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Check whether the prediction service is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.base_url {
        config = config.with_base_url(url);
    }
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid client configuration")?;

    match args.command {
        Command::Health => {
            let up = check_endpoint(&config.base_url).await;
            info!(base_url = %config.base_url, reachable = up, "Health check");
            println!(
                "{} is {}",
                config.base_url,
                if up { "reachable" } else { "unreachable" }
            );
            Ok(if up { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Predict {
            weight,
            strength,
            barrier,
            reuse,
            select,
            show_all,
            json,
        } => {
            let service = HttpPredictionService::from_config(&config)
                .context("Failed to build prediction client")?;
            let mut controller = PredictionController::new(Arc::new(service), &config);
            controller.set_inputs(RequirementInputs::new(weight, strength, barrier, reuse));
            if show_all {
                controller.toggle_show_all();
            }

            if controller.submit().await == PredictionStatus::Failed {
                eprintln!(
                    "{}",
                    controller.error_message().unwrap_or("Prediction failed")
                );
                return Ok(ExitCode::FAILURE);
            }

            if let Some(rank) = select {
                let index = rank
                    .checked_sub(1)
                    .context("Ranks start at 1")?;
                controller
                    .select(index)
                    .with_context(|| format!("Cannot select rank {rank}"))?;
            }

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(controller.recommendations())?
                );
                return Ok(ExitCode::SUCCESS);
            }

            print!("{}", view::render_table(&view::ranked_cards(&controller)));
            let hidden = view::hidden_card_count(&controller);
            if hidden > 0 {
                println!("({hidden} more, use --show-all)");
            }
            println!();
            print!("{}", view::render_detail(&controller));
            Ok(ExitCode::SUCCESS)
        }
    }
}
