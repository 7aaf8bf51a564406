//! # card-forecast
//!
//! Command-line front end for the card forecast serving pipeline.

use card_forecast::{
    EvaluationMode, ForecastService, PipelineConfig, PipelineError, PipelineRequest,
};
use clap::{Parser, Subcommand};
use forecast_app::{present, Renderer, TextRenderer};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Looked up in the working directory when `--config` is not given
const DEFAULT_CONFIG_FILE: &str = "card_forecast.json";

#[derive(Parser)]
#[command(name = "card-forecast")]
#[command(about = "Forecast credit card counts per financial entity", long_about = None)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable financial entities
    Entities,

    /// Forecast one entity and show history, predictions and the merged series
    Predict {
        /// Financial entity (see `entities`)
        #[arg(short, long)]
        entity: Option<String>,

        /// Number of months to forecast
        #[arg(short = 'n', long)]
        horizon: Option<usize>,

        /// Score the forecast against the last known observations
        #[arg(long)]
        evaluate: bool,
    },

    /// Print the link to the interactive dashboard
    Dashboard,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig, PipelineError> {
    match path {
        Some(path) => PipelineConfig::from_json_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            PipelineConfig::from_json_file(DEFAULT_CONFIG_FILE)
        }
        None => {
            info!("No configuration file found, using the built-in entity table");
            Ok(PipelineConfig::default())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let service = match load_config(cli.config.as_deref()).and_then(ForecastService::from_config)
    {
        Ok(service) => service,
        Err(err) => {
            error!(error = %err, "Could not start");
            eprintln!("{}", err.user_message());
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut renderer = TextRenderer::new(stdout.lock());

    let outcome = match cli.command {
        Commands::Entities => list_entities(&service, &mut renderer),
        Commands::Predict {
            entity,
            horizon,
            evaluate,
        } => predict(&service, &mut renderer, entity, horizon, evaluate),
        Commands::Dashboard => show_dashboard(&service, &mut renderer),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "Rendering failed");
            ExitCode::FAILURE
        }
    }
}

fn list_entities<R: Renderer>(
    service: &ForecastService,
    renderer: &mut R,
) -> forecast_app::render::Result<ExitCode> {
    for name in service.registry().names() {
        renderer.render_notice(name)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn predict<R: Renderer>(
    service: &ForecastService,
    renderer: &mut R,
    entity: Option<String>,
    horizon: Option<usize>,
    evaluate: bool,
) -> forecast_app::render::Result<ExitCode> {
    let selection = match entity {
        Some(name) => match service.select(&name) {
            Ok(selection) => selection,
            Err(err) => {
                renderer.render_error(&err.user_message())?;
                renderer.render_notice(&format!(
                    "Entidades disponibles: {}",
                    service.registry().names().join(", ")
                ))?;
                return Ok(ExitCode::from(2));
            }
        },
        None => service.registry().default_selection(),
    };

    let horizon = horizon.unwrap_or(service.config().horizon.default);
    let mut request = PipelineRequest::new(selection, horizon);
    if evaluate {
        request = request.with_evaluation(EvaluationMode::Backtest);
    }

    let mut result = service.run(&request);
    present(&mut result, renderer)?;

    // Stage failures were shown to the user; they are not process failures
    Ok(ExitCode::SUCCESS)
}

fn show_dashboard<R: Renderer>(
    service: &ForecastService,
    renderer: &mut R,
) -> forecast_app::render::Result<ExitCode> {
    match &service.config().dashboard_url {
        Some(url) => renderer.render_notice(url)?,
        None => renderer.render_notice("No hay un dashboard configurado.")?,
    }
    Ok(ExitCode::SUCCESS)
}
