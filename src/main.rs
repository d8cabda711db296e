use anyhow::Context;
use libris_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load LIBRIS settings")?;
    libris_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        store = %settings.store.endpoint,
        "libris-app bootstrap starting"
    );

    libris_app::run(&settings).await?;

    tracing::info!("libris-app shutdown complete");
    Ok(())
}
