mod platform;
mod settings;
mod status;

use anyhow::Result;
use predictor::{Predictor, PredictorConfig};
use providers::jina::JinaSearch;
use providers::router::ProviderRouter;
use shared::collaborators::Collaborators;
use shared::settings::AppSettings;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = settings::load_settings_or_default()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(settings))
}

async fn run(settings: AppSettings) -> Result<()> {
    let router = ProviderRouter::new(settings.model.clone());
    info!(
        provider = router.active_provider().unwrap_or("none"),
        "model providers configured"
    );

    let search = JinaSearch::from_settings(&settings.search).unwrap_or_else(|e| {
        warn!(error = %e, "web search has no credentials; searches will fail");
        JinaSearch::new(&settings.search.base_url, "", settings.search.max_results)
    });

    let collaborators = Collaborators {
        capture: Arc::new(platform::XcapCapture),
        model: Arc::new(router),
        search: Arc::new(search),
        injector: Arc::new(platform::EnigoInjector),
    };
    let config = PredictorConfig::from_settings(&settings.predictor, settings.model.max_tokens);
    let predictor = Predictor::new(config, collaborators);

    let indicator = tokio::spawn(status::run(predictor.clone(), predictor.subscribe()));
    platform::spawn_key_hook(predictor.clone())?;
    info!(
        confirm_key = %predictor.config().confirm_key,
        "listening for input; double-press the confirmation key to type a prediction"
    );

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    predictor.shutdown();
    indicator.abort();
    Ok(())
}
