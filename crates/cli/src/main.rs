//! Command-line entrypoint for LIBRIS.

use anyhow::Context;
use clap::{Parser, Subcommand};

use libris_app::modules::books::models::{Book, BookFilter};
use libris_app::modules::books::seed;
use libris_app::modules::books::service::{DeleteOutcome, InventoryService};
use libris_kernel::settings::Settings;
use libris_store::Store;

#[derive(Parser)]
#[command(name = "libris", about = "Book inventory service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP application
    Serve,
    /// Seed the store and walk one record through every inventory operation
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load LIBRIS settings")?;
    libris_telemetry::init(&settings.telemetry);

    match cli.command {
        Command::Serve => libris_app::run(&settings).await,
        Command::Demo => demo(&settings).await,
    }
}

/// Linear walkthrough mirroring a checkout/restock session: seed, the three
/// catalog reads, then adjust / recategorize / drain / delete-if-empty on a
/// single record.
async fn demo(settings: &Settings) -> anyhow::Result<()> {
    let store = Store::connect(&settings.store.endpoint, &settings.store.database)
        .await
        .context("failed to connect to the document store")?;
    let books = store.collection::<Book>();
    let service = InventoryService::new(books.clone());

    let seeded = seed::seed_if_empty(&books).await?;
    tracing::info!(seeded, "catalog ready");

    let all = service.list(&BookFilter::default()).await?;
    for book in &all {
        tracing::info!(
            title = %book.title,
            category = %book.category,
            copies = book.available_copies,
            "in catalog"
        );
    }

    let self_help = service
        .list(&BookFilter {
            category: Some("Self-Help".to_string()),
            ..Default::default()
        })
        .await?;
    tracing::info!(count = self_help.len(), "Self-Help titles");

    let recent = service
        .list(&BookFilter {
            published_after: Some(2015),
            ..Default::default()
        })
        .await?;
    tracing::info!(count = recent.len(), "titles published after 2015");

    let subject = all.first().context("catalog is empty")?;

    let subject = service.adjust_copies(subject.id, -1).await?;
    tracing::info!(
        title = %subject.title,
        copies = subject.available_copies,
        "checked out one copy"
    );

    let subject = service.change_category(subject.id, "Education").await?;
    tracing::info!(title = %subject.title, category = %subject.category, "category changed");

    // Drain what's left so the deletion check has something to do.
    let subject = service
        .adjust_copies(subject.id, -subject.available_copies)
        .await?;

    match service.delete_if_empty(subject.id).await? {
        DeleteOutcome::Deleted => {
            tracing::info!(title = %subject.title, "record deleted (no copies left)")
        }
        DeleteOutcome::Retained => {
            tracing::info!(title = %subject.title, "record retained (copies available)")
        }
    }

    store.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
