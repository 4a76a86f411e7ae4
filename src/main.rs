use anyhow::Result;
use malaysia_load_synth::{config, telemetry, GenerationOutcome, Generator, ReferenceCatalog};
use config::Config;
use std::sync::Arc;
use telemetry::init_tracing;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    let request = cfg.to_request()?;
    let generator = Arc::new(Generator::new(
        Arc::new(ReferenceCatalog::malaysia()),
        cfg.generator.settings(),
    )?);

    info!(
        buildings = request.num_buildings(),
        start = %request.start(),
        end = %request.end(),
        freq = %request.frequency(),
        "starting malaysia-load-synth"
    );

    let cancel = CancellationToken::new();
    let timeout = cfg.generator.timeout();

    let watchdog = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = telemetry::shutdown_signal() => {
                    warn!("cancelling generation on shutdown");
                    cancel.cancel();
                }
                _ = tokio::time::sleep(timeout) => {
                    warn!(timeout_seconds = timeout.as_secs(), "generation timed out");
                    cancel.cancel();
                }
                _ = cancel.cancelled() => {}
            }
        })
    };

    let result = {
        let generator = generator.clone();
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || generator.generate(&request, &cancel)).await?
    };
    // releases the watchdog once generation has finished
    cancel.cancel();
    watchdog.await?;

    let outcome = GenerationOutcome::from_result(&result);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    match result {
        Ok(dataset) => {
            info!(run_id = %dataset.run_id, seed = dataset.seed, "done");
            Ok(())
        }
        Err(e) => anyhow::bail!(e),
    }
}
