use better_rest::core::bedtime::wake_time_or_default;
use better_rest::core::{Notification, SleepRequest};
use better_rest::utils::error::{BedtimeError, ErrorSeverity};
use better_rest::utils::{logger, validation::Validate};
use better_rest::{
    load_sleep_model, BedtimeCalculator, BedtimeOutcome, BedtimeSession, CliConfig, LocalStorage,
    SleepForm, TomlConfig,
};
use clap::Parser;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    notification: &'a Notification,
    #[serde(skip_serializing_if = "Option::is_none")]
    bedtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    predicted_sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wake_time_seconds: Option<f64>,
}

fn exit_with(e: &BedtimeError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 載入設定檔 (可選)
    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path).await {
                Ok(config) => {
                    if let Err(e) = config.validate() {
                        exit_with(&e);
                    }
                    config
                }
                Err(e) => exit_with(&e),
            }
        }
        None => TomlConfig::default(),
    };

    let config = cli.resolve(&file_config);
    if let Err(e) = config.validate() {
        exit_with(&e);
    }
    tracing::debug!("Resolved config: {:?}", config);

    let storage = LocalStorage::new(".");
    let model = load_sleep_model(&storage, &config).await;
    let calculator = BedtimeCalculator::from_config(model, &config);

    let today = chrono::Local::now().date_naive();
    let wake_up = wake_time_or_default(&config.wake, today);
    let form = SleepForm::new(wake_up, config.sleep_hours, config.coffee_cups);
    if let Err(e) = SleepRequest::try_from_form(&form, calculator.encoding()) {
        exit_with(&e);
    }

    let mut session = BedtimeSession::new(calculator);
    let outcome = session.calculate(&form);
    let notification = outcome.notification();

    if cli.json {
        let report = match &outcome {
            BedtimeOutcome::Bedtime {
                request,
                estimate,
                result,
                ..
            } => JsonReport {
                notification: &notification,
                bedtime: Some(result.bedtime.format("%Y-%m-%dT%H:%M:%S").to_string()),
                predicted_sleep_hours: Some(estimate.actual_sleep_hours),
                wake_time_seconds: Some(request.wake_time_seconds),
            },
            BedtimeOutcome::Failed => JsonReport {
                notification: &notification,
                bedtime: None,
                predicted_sleep_hours: None,
                wake_time_seconds: None,
            },
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", notification.title);
        println!("{}", notification.message);
    }

    // 輸出即視為使用者已確認
    session.dismiss();

    if notification.is_error() {
        std::process::exit(1);
    }

    Ok(())
}
