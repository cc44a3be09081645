use anyhow::Context;
use better_rest::core::training::{fit_linear, read_samples, SleepUnit};
use better_rest::core::ModelStore;
use better_rest::utils::logger;
use better_rest::LocalStorage;
use clap::Parser;

#[derive(Parser)]
#[command(name = "train_model")]
#[command(about = "Fits a linear sleep model from a CSV of wake, estimatedSleep, coffee, actualSleep")]
struct Args {
    /// Path to the training CSV
    #[arg(short, long)]
    input: String,

    /// Where to write the model (.json or .toml)
    #[arg(short, long, default_value = "models/sleep.json")]
    output: String,

    /// The actualSleep column is in seconds rather than hours
    #[arg(long)]
    seconds: bool,

    /// Fit and report without writing the model
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Training sleep model from {}", args.input);

    let data = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("failed to read training data '{}'", args.input))?;

    let unit = if args.seconds {
        SleepUnit::Seconds
    } else {
        SleepUnit::Hours
    };
    let samples = read_samples(data.as_slice(), unit).context("failed to parse training data")?;
    let report = fit_linear(&samples)?;

    println!("Samples:   {}", report.samples);
    println!("RMSE:      {:.4} h", report.rmse);
    println!("R²:        {:.4}", report.r_squared);
    println!("{}", serde_json::to_string_pretty(&report.coefficients)?);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - model not written");
        return Ok(());
    }

    let storage = LocalStorage::new(".");
    storage
        .save_model(&args.output, &report.coefficients)
        .await
        .with_context(|| format!("failed to write model '{}'", args.output))?;

    println!("✅ Model saved to: {}", args.output);
    Ok(())
}
