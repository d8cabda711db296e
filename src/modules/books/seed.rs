//! Idempotent catalog seeding.
//!
//! Runs at process start, outside the inventory service: a non-empty
//! collection is left exactly as it is.

use libris_store::{Collection, StoreError};
use once_cell::sync::Lazy;

use super::models::Book;

/// The catalog inserted into an empty store on first start.
static CATALOG: Lazy<Vec<Book>> = Lazy::new(|| {
    vec![
        Book::draft("Clean Code", "Robert Martin", "Programming", 2018, 5),
        Book::draft("Atomic Habits", "James Clear", "Self-Help", 2019, 4),
        Book::draft("Deep Work", "Cal Newport", "Productivity", 2016, 3),
        Book::draft("The Alchemist", "Paulo Coelho", "Fiction", 2015, 6),
        Book::draft("Think Like a Monk", "Jay Shetty", "Self-Help", 2020, 2),
        Book::draft(
            "Eloquent JavaScript",
            "Marijn Haverbeke",
            "Programming",
            2017,
            7,
        ),
        Book::draft("Ikigai", "Héctor García", "Self-Help", 2016, 1),
    ]
});

/// Insert the seed catalog unless the collection already holds records.
///
/// Returns the number of records inserted (zero when seeding was skipped).
pub async fn seed_if_empty(books: &Collection<Book>) -> Result<usize, StoreError> {
    if books.count().await? > 0 {
        tracing::debug!("books already exist, skipping seed");
        return Ok(0);
    }

    let inserted = books.insert_many(CATALOG.clone()).await?;
    tracing::info!(count = inserted.len(), "book catalog seeded");
    Ok(inserted.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_store::Store;

    #[tokio::test]
    async fn seeding_twice_inserts_nothing_new() {
        let store = Store::connect("memory://local", "seed-tests").await.unwrap();
        let books = store.collection::<Book>();

        assert_eq!(seed_if_empty(&books).await.unwrap(), 7);
        assert_eq!(seed_if_empty(&books).await.unwrap(), 0);
        assert_eq!(books.count().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn seeded_records_get_store_ids() {
        let store = Store::connect("memory://local", "seed-tests").await.unwrap();
        let books = store.collection::<Book>();
        seed_if_empty(&books).await.unwrap();

        let all = books.find_all().await.unwrap();
        assert!(all.iter().all(|book| !book.id.is_nil()));

        // Insertion order is preserved, so the first record is stable.
        assert_eq!(all[0].title, "Clean Code");
    }
}
