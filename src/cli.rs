use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::domain::{PredictRequestBody, PredictionRequest};
use crate::error::Result;
use crate::predictor::{load_artifacts, ModelReport, PredictionBreakdown};

#[derive(Parser)]
#[command(name = "kantei")]
#[command(version)]
#[command(about = "Tokyo 23-ward real-estate price estimation service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory
    #[arg(short, long, default_value = "config", env = "KANTEI_CONFIG_DIR")]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the prediction API (default)
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
        /// Override the configured model directory
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
    /// Run a single prediction locally and print the JSON response
    Predict {
        /// 土地面積 (㎡)
        #[arg(long)]
        land_area: f64,
        /// 建物面積 (㎡)
        #[arg(long)]
        building_area: f64,
        /// 築年数 (years)
        #[arg(long)]
        building_age: f64,
        /// Ward name, e.g. 世田谷区
        #[arg(short, long)]
        ward: String,
        #[arg(short, long)]
        district: Option<String>,
        #[arg(short, long)]
        year: Option<i64>,
        #[arg(short, long)]
        quarter: Option<i64>,
        /// Also print the per-feature contribution breakdown
        #[arg(long)]
        explain: bool,
        /// Override the configured model directory
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
    /// Show model coefficients and scaler statistics
    Inspect {
        /// Number of coefficients to list
        #[arg(short, long, default_value = "10")]
        top: usize,
        /// Override the configured model directory
        #[arg(long)]
        model_dir: Option<PathBuf>,
    },
}

pub fn run_predict(model_dir: &Path, body: PredictRequestBody, explain: bool) -> Result<()> {
    let predictor = load_artifacts(model_dir)?;
    let req = PredictionRequest::try_from(body)?;

    let result = predictor.predict(&req)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    if explain {
        print_breakdown(&predictor.breakdown(&req)?);
    }
    Ok(())
}

pub fn run_inspect(model_dir: &Path, top: usize) -> Result<()> {
    let predictor = load_artifacts(model_dir)?;
    print_report(&predictor.report(top));
    Ok(())
}

fn print_report(report: &ModelReport) {
    println!("=== Model ===");
    println!("  type:      {}", report.model_type);
    println!("  intercept: {:.2}万円", report.intercept);
    println!("  features:  {}", report.feature_count);

    println!("\n=== Top coefficients ===");
    for c in &report.top_coefficients {
        println!("  {:<24} {:>12.2}万円", c.feature, c.value);
    }

    if !report.ward_coefficients.is_empty() {
        println!("\n=== Ward coefficients ===");
        for c in &report.ward_coefficients {
            println!("  {:<10} {:>12.2}万円", c.feature, c.value);
        }
    }

    println!("\n=== Scaler ({}) ===", report.scaler_type);
    println!("  mean:  {:?}...", report.scaler_mean);
    println!("  scale: {:?}...", report.scaler_scale);
}

fn print_breakdown(b: &PredictionBreakdown) {
    println!("\n=== Breakdown ===");
    println!("  {:<24} {:>12.2}", "intercept", b.intercept);
    for c in &b.contributions {
        println!(
            "  {:<24} {:>12.2}  (raw {:.3}, scaled {:.3}, coef {:.2})",
            c.feature, c.contribution, c.raw, c.scaled, c.coefficient
        );
    }
    println!("  {:<24} {:>12.2}", "score", b.score);
}
