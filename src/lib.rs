//! LIBRIS Application Library
//!
//! Book inventory application assembled from LIBRIS modules: a seeded
//! catalog in a document store, exposed over HTTP by the books module.

pub mod modules;
pub mod utils;

use anyhow::Context;
use libris_kernel::settings::Settings;
use libris_kernel::{InitCtx, ModuleRegistry};
use libris_store::Store;

/// Run the application: connect the store, bring modules up, serve HTTP
/// until shutdown, then tear everything down and release the store.
pub async fn run(settings: &Settings) -> anyhow::Result<()> {
    let store = Store::connect(&settings.store.endpoint, &settings.store.database)
        .await
        .context("failed to connect to the document store")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let ctx = InitCtx {
        settings,
        store: &store,
    };

    registry.init_core_modules(&ctx).await?;
    registry.init_custom_modules(&ctx).await?;
    registry.start_core_modules(&ctx).await?;
    registry.start_custom_modules(&ctx).await?;

    libris_http::start_server(&registry, &ctx).await?;

    registry.stop_custom_modules().await?;
    registry.stop_core_modules().await?;
    store.close().await;

    Ok(())
}
