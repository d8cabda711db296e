use libris_store::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single book record as persisted in the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier, immutable after creation
    pub id: Uuid,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Free-form category label
    pub category: String,
    /// Year of publication
    pub published_year: i32,
    /// Copies currently available for checkout; never negative
    pub available_copies: i64,
}

impl Book {
    /// A record that has not been inserted yet; the store assigns the id.
    pub fn draft(
        title: &str,
        author: &str,
        category: &str,
        published_year: i32,
        available_copies: i64,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            title: title.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            published_year,
            available_copies,
        }
    }
}

impl Document for Book {
    const COLLECTION: &'static str = "books";

    fn id(&self) -> Uuid {
        self.id
    }

    fn assign_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

/// Request model for the copy-count adjustment operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustCopies {
    /// Positive restocks, negative checks out
    pub delta: i64,
}

/// Request model for the category-change operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeCategory {
    /// Replacement category label
    pub category: String,
}

/// Filters accepted by the list operation; all optional, combined with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Strictly-greater-than publication year cutoff
    pub published_after: Option<i32>,
}
