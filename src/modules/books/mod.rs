pub mod models;
pub mod routes;
pub mod seed;
pub mod service;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;

use libris_kernel::{InitCtx, Module};

use crate::utils;
use models::Book;
use service::InventoryService;

/// Books module: owns the book catalog and its inventory rules.
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = ctx.store.collection::<Book>();
        let seeded = seed::seed_if_empty(&books).await?;

        tracing::info!(
            prefix = %utils::log_prefix("books"),
            environment = ?ctx.settings.environment,
            seeded,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self, ctx: &InitCtx<'_>) -> Router {
        routes::router(InventoryService::new(ctx.store.collection::<Book>()))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "category",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "string" },
                                "description": "Exact category match"
                            },
                            {
                                "name": "published_after",
                                "in": "query",
                                "required": false,
                                "schema": { "type": "integer" },
                                "description": "Only books published strictly after this year"
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "List of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch a book",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown book id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book if no copies remain",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Whether the record was deleted; records with copies left are retained",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/DeleteResult" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown book id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}/copies": {
                    "post": {
                        "summary": "Adjust available copies",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AdjustCopies" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown book id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "409": {
                                "description": "Adjustment would drive the count negative",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}/category": {
                    "put": {
                        "summary": "Change a book's category",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ChangeCategory" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": {
                                "description": "Unknown book id",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "OK",
                                "content": {
                                    "text/plain": { "schema": { "type": "string" } }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "string",
                                "format": "uuid",
                                "description": "Store-assigned identifier"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "category": {
                                "type": "string",
                                "description": "Free-form category label"
                            },
                            "published_year": {
                                "type": "integer",
                                "description": "Year of publication"
                            },
                            "available_copies": {
                                "type": "integer",
                                "description": "Copies available for checkout; never negative"
                            }
                        },
                        "required": ["id", "title", "author", "category", "published_year", "available_copies"]
                    },
                    "AdjustCopies": {
                        "type": "object",
                        "properties": {
                            "delta": {
                                "type": "integer",
                                "description": "Positive restocks, negative checks out"
                            }
                        },
                        "required": ["delta"]
                    },
                    "ChangeCategory": {
                        "type": "object",
                        "properties": {
                            "category": {
                                "type": "string",
                                "description": "Replacement category label"
                            }
                        },
                        "required": ["category"]
                    },
                    "DeleteResult": {
                        "type": "object",
                        "properties": {
                            "deleted": {
                                "type": "boolean",
                                "description": "Whether the record was removed"
                            }
                        },
                        "required": ["deleted"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
