use clap::Parser;
use proof_etl::backend;
use proof_etl::core::ConfigProvider;
use proof_etl::utils::progress::TracingProgress;
use proof_etl::utils::{logger, validation::Validate};
use proof_etl::{
    CliConfig, CorrectionEngine, CorrectionPipeline, LocalStorage, ProofError, TomlConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting proof-etl");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let result = match config.config.clone() {
        Some(profile_path) => match load_profile(&profile_path) {
            Ok(profile) => {
                let token = profile.token().map(str::to_string);
                run_pipeline(profile, token).await
            }
            Err(e) => Err(e),
        },
        None => match config.validate() {
            Ok(()) => {
                let token = config.token();
                run_pipeline(config, token).await
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(output_path) => {
            tracing::info!("✅ proofreading run completed");
            println!("✅ proofreading run completed");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ proofreading run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn load_profile(path: &str) -> Result<TomlConfig, ProofError> {
    let profile = TomlConfig::from_file(path)?;
    profile.validate()?;
    Ok(profile)
}

async fn run_pipeline<C>(config: C, token: Option<String>) -> Result<String, ProofError>
where
    C: ConfigProvider + BackendChoice + 'static,
{
    let backend = backend::from_settings(
        config.backend_kind(),
        config.endpoint(),
        config.model(),
        token.as_deref(),
        config.request_timeout_secs(),
    )?;

    let storage = LocalStorage::new(".".to_string());
    let pipeline = CorrectionPipeline::new(storage, config, backend, Box::new(TracingProgress));
    let mut engine = CorrectionEngine::new(pipeline);
    engine.run().await
}

/// The backend variant is a construction-time concern, not part of the
/// ConfigProvider port the pipeline sees.
trait BackendChoice {
    fn backend_kind(&self) -> &'static str;
}

impl BackendChoice for CliConfig {
    fn backend_kind(&self) -> &'static str {
        self.backend.as_str()
    }
}

impl BackendChoice for TomlConfig {
    fn backend_kind(&self) -> &'static str {
        self.source.backend.as_str()
    }
}
