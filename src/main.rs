use clap::Parser;
use kantei::adapters::start_api_server;
use kantei::cli::{self, Cli, Commands};
use kantei::config::{AppConfig, LoggingConfig};
use kantei::domain::PredictRequestBody;
use kantei::error::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match AppConfig::load_from(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: could not load config from {}: {}", cli.config.display(), e);
            AppConfig::default()
        }
    };

    match cli.command {
        None => {
            init_logging(&config.logging);
            start_api_server(&config).await?;
        }
        Some(Commands::Serve { port, model_dir }) => {
            init_logging(&config.logging);
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dir) = model_dir {
                config.model.dir = dir;
            }
            info!(model_dir = %config.model.dir.display(), "Starting Real Estate Appraisal API...");
            start_api_server(&config).await?;
        }
        Some(Commands::Predict {
            land_area,
            building_area,
            building_age,
            ward,
            district,
            year,
            quarter,
            explain,
            model_dir,
        }) => {
            init_logging_simple();
            let body = PredictRequestBody {
                land_area,
                building_area,
                building_age,
                ward_name: ward,
                district,
                year,
                quarter,
            };
            let dir = model_dir.unwrap_or(config.model.dir);
            cli::run_predict(&dir, body, explain)?;
        }
        Some(Commands::Inspect { top, model_dir }) => {
            init_logging_simple();
            let dir = model_dir.unwrap_or(config.model.dir);
            cli::run_inspect(&dir, top)?;
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.env_filter());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn init_logging_simple() {
    // Minimal logging for CLI commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
