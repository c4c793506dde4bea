use clap::Parser;
use keyword_etl::core::ConfigProvider;
use keyword_etl::utils::error::ErrorSeverity;
use keyword_etl::utils::{logger, validation::Validate};
use keyword_etl::{CliConfig, EtlEngine, EtlError, KeywordPipeline, LocalStorage, TomlConfig};

async fn run<C: ConfigProvider + Validate>(config: C) -> keyword_etl::Result<String> {
    config.validate()?;
    tracing::debug!(
        "Endpoint: {}, output path: {}",
        config.endpoint(),
        config.output_path()
    );

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = KeywordPipeline::new(storage, config)?;
    EtlEngine::new(pipeline).run().await
}

fn exit_code(e: &EtlError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting keyword-etl CLI");

    let outcome = match config.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            match TomlConfig::from_file(&path) {
                Ok(file_config) => run(file_config).await,
                Err(e) => Err(e),
            }
        }
        None => run(config).await,
    };

    match outcome {
        Ok(output_path) => {
            println!("✅ Keyword records saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Keyword ETL failed: {} (Severity: {:?})", e, e.severity());
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());

            let code = exit_code(&e);
            if code > 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
