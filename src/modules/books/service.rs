//! Record lifecycle rules for the book catalog.

use libris_store::{Collection, StoreError};
use thiserror::Error;
use uuid::Uuid;

use super::models::{Book, BookFilter};

/// Errors surfaced by inventory operations. All of them fail fast; nothing
/// here retries.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("book not found")]
    NotFound,

    #[error("invalid operation: {0}")]
    InvalidOperation(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a delete-if-empty check. Both variants are normal results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The count was zero and the record was removed.
    Deleted,
    /// Copies remain; the record was left untouched.
    Retained,
}

/// Owns the rules for mutating a book's copy count and category, and for
/// deleting a record once its stock reaches zero.
///
/// Holds nothing beyond the collection handle; every operation is one load
/// followed by at most one write, and a failed operation leaves the stored
/// record unchanged.
#[derive(Clone)]
pub struct InventoryService {
    books: Collection<Book>,
}

impl InventoryService {
    pub fn new(books: Collection<Book>) -> Self {
        Self { books }
    }

    /// Adjust the available-copy count by `delta` (positive restocks,
    /// negative checks out). The count may drain to zero but never below.
    pub async fn adjust_copies(&self, id: Uuid, delta: i64) -> Result<Book, InventoryError> {
        let mut book = self.load(id).await?;

        let new_count = book.available_copies + delta;
        if new_count < 0 {
            return Err(InventoryError::InvalidOperation(
                "negative stock not allowed",
            ));
        }

        book.available_copies = new_count;
        self.books.save(&book).await?;
        Ok(book)
    }

    /// Replace the category label. Any non-empty text is accepted; there is
    /// no fixed category set.
    pub async fn change_category(
        &self,
        id: Uuid,
        new_category: &str,
    ) -> Result<Book, InventoryError> {
        let mut book = self.load(id).await?;

        if new_category.trim().is_empty() {
            return Err(InventoryError::InvalidOperation("category cannot be empty"));
        }

        book.category = new_category.to_string();
        self.books.save(&book).await?;
        Ok(book)
    }

    /// Remove the record if and only if its copy count is zero.
    pub async fn delete_if_empty(&self, id: Uuid) -> Result<DeleteOutcome, InventoryError> {
        let book = self.load(id).await?;

        if book.available_copies == 0 {
            self.books.delete(id).await?;
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::Retained)
        }
    }

    pub async fn find(&self, id: Uuid) -> Result<Book, InventoryError> {
        self.load(id).await
    }

    /// Pass-through query against the store; no business logic beyond the
    /// filter predicate.
    pub async fn list(&self, filter: &BookFilter) -> Result<Vec<Book>, InventoryError> {
        let books = self
            .books
            .find_where(|book| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |category| book.category == category)
                    && filter
                        .published_after
                        .map_or(true, |year| book.published_year > year)
            })
            .await?;
        Ok(books)
    }

    async fn load(&self, id: Uuid) -> Result<Book, InventoryError> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or(InventoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::seed;
    use libris_store::Store;

    async fn seeded_service() -> InventoryService {
        let store = Store::connect("memory://local", "inventory-tests")
            .await
            .unwrap();
        let books = store.collection::<Book>();
        seed::seed_if_empty(&books).await.unwrap();
        InventoryService::new(books)
    }

    async fn by_title(service: &InventoryService, title: &str) -> Book {
        service
            .list(&BookFilter::default())
            .await
            .unwrap()
            .into_iter()
            .find(|book| book.title == title)
            .unwrap_or_else(|| panic!("seed catalog is missing '{title}'"))
    }

    #[tokio::test]
    async fn checkout_and_restock_apply_the_delta() {
        let service = seeded_service().await;
        let book = by_title(&service, "Deep Work").await;

        let book = service.adjust_copies(book.id, -1).await.unwrap();
        assert_eq!(book.available_copies, 2);

        let book = service.adjust_copies(book.id, 4).await.unwrap();
        assert_eq!(book.available_copies, 6);

        // The new count is persisted, not just returned.
        assert_eq!(service.find(book.id).await.unwrap().available_copies, 6);
    }

    #[tokio::test]
    async fn checkout_past_zero_is_rejected_and_leaves_the_record_alone() {
        let service = seeded_service().await;
        let book = by_title(&service, "Clean Code").await;
        assert_eq!(book.available_copies, 5);

        let book = service.adjust_copies(book.id, -1).await.unwrap();
        assert_eq!(book.available_copies, 4);

        let err = service.adjust_copies(book.id, -10).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidOperation(_)));

        assert_eq!(service.find(book.id).await.unwrap().available_copies, 4);
    }

    #[tokio::test]
    async fn adjusting_an_unknown_id_is_not_found() {
        let service = seeded_service().await;

        let err = service.adjust_copies(Uuid::nil(), 1).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound));
    }

    #[tokio::test]
    async fn any_nonempty_category_is_accepted() {
        let service = seeded_service().await;
        let book = by_title(&service, "Atomic Habits").await;
        assert_eq!(book.category, "Self-Help");

        let book = service.change_category(book.id, "Education").await.unwrap();
        assert_eq!(book.category, "Education");

        // No enumeration check; arbitrary labels pass through verbatim.
        let book = service
            .change_category(book.id, "Shelf 9 / Oddities")
            .await
            .unwrap();
        assert_eq!(book.category, "Shelf 9 / Oddities");

        let stored = service.find(book.id).await.unwrap();
        assert_eq!(stored.category, "Shelf 9 / Oddities");
        assert_eq!(stored.available_copies, book.available_copies);
    }

    #[tokio::test]
    async fn blank_category_is_rejected() {
        let service = seeded_service().await;
        let book = by_title(&service, "Ikigai").await;

        let err = service.change_category(book.id, "  ").await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidOperation(_)));
        assert_eq!(service.find(book.id).await.unwrap().category, "Self-Help");
    }

    #[tokio::test]
    async fn changing_category_of_unknown_id_is_not_found() {
        let service = seeded_service().await;

        let err = service
            .change_category(Uuid::nil(), "Education")
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::NotFound));
    }

    #[tokio::test]
    async fn stocked_records_survive_the_deletion_check() {
        let service = seeded_service().await;
        let book = by_title(&service, "The Alchemist").await;

        let outcome = service.delete_if_empty(book.id).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Retained);

        let stored = service.find(book.id).await.unwrap();
        assert_eq!(stored.available_copies, book.available_copies);
    }

    #[tokio::test]
    async fn drained_records_are_deleted() {
        let service = seeded_service().await;
        let book = by_title(&service, "Ikigai").await;
        assert_eq!(book.available_copies, 1);

        let book = service.adjust_copies(book.id, -1).await.unwrap();
        assert_eq!(book.available_copies, 0);

        let outcome = service.delete_if_empty(book.id).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);

        let err = service.find(book.id).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound));
    }

    #[tokio::test]
    async fn deleting_an_unknown_id_is_not_found() {
        let service = seeded_service().await;

        let err = service.delete_if_empty(Uuid::nil()).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound));
    }

    #[tokio::test]
    async fn list_filters_by_category_and_year() {
        let service = seeded_service().await;

        let all = service.list(&BookFilter::default()).await.unwrap();
        assert_eq!(all.len(), 7);

        let self_help = service
            .list(&BookFilter {
                category: Some("Self-Help".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(self_help.len(), 3);
        assert!(self_help.iter().all(|book| book.category == "Self-Help"));

        let recent = service
            .list(&BookFilter {
                published_after: Some(2015),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(recent.len(), 6);
        assert!(recent.iter().all(|book| book.published_year > 2015));

        let recent_self_help = service
            .list(&BookFilter {
                category: Some("Self-Help".to_string()),
                published_after: Some(2016),
            })
            .await
            .unwrap();
        assert_eq!(recent_self_help.len(), 2);
    }
}
