//! HTTP surface of the bookshop module.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use bookshop_db::{SharedStore, Store, StoreError};
use bookshop_http::error::AppError;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::export::{self, ExportError};
use super::import::{self, ImportError};

const CUTOFF_FORMAT: &str = "%Y-%m-%d";

pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/books/import", post(import_books))
        .route("/authors/import", post(import_authors))
        .route("/authors/prolific", get(prolific_authors))
        .route("/books/oldest-science", get(oldest_science_books))
        .route("/health", get(health_check))
        .with_state(store)
}

async fn health_check() -> &'static str {
    "bookshop module is healthy"
}

async fn import_books(State(store): State<SharedStore>, body: String) -> Result<String, AppError> {
    let report = with_store(store, move |store| import::import_books(store, &body))
        .await?
        .map_err(import_failure)?;
    Ok(report.to_string())
}

async fn import_authors(
    State(store): State<SharedStore>,
    body: String,
) -> Result<String, AppError> {
    let report = with_store(store, move |store| import::import_authors(store, &body))
        .await?
        .map_err(import_failure)?;
    Ok(report.to_string())
}

async fn prolific_authors(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AppError> {
    let document = with_store(store, |store| export::export_prolific_authors(store))
        .await?
        .map_err(export_failure)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], document))
}

#[derive(Debug, Deserialize)]
struct CutoffQuery {
    before: String,
}

async fn oldest_science_books(
    State(store): State<SharedStore>,
    Query(query): Query<CutoffQuery>,
) -> Result<impl IntoResponse, AppError> {
    let before = NaiveDate::parse_from_str(&query.before, CUTOFF_FORMAT).map_err(|_| {
        AppError::validation(
            vec![json!({"field": "before", "error": "expected YYYY-MM-DD"})],
            format!("invalid cutoff date '{}'", query.before),
        )
    })?;

    let document = with_store(store, move |store| {
        export::export_oldest_science_books(store, before)
    })
    .await?
    .map_err(export_failure)?;
    Ok(([(header::CONTENT_TYPE, "application/xml")], document))
}

/// Run `job` on a blocking thread with exclusive access to the store.
async fn with_store<T, F>(store: SharedStore, job: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&mut dyn Store) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = bookshop_db::lock(&store)?;
        Ok::<_, StoreError>(job(&mut *guard))
    })
    .await
    .map_err(|err| AppError::Internal(anyhow::anyhow!("store task failed: {}", err)))?
    .map_err(|err| AppError::Internal(err.into()))
}

fn import_failure(err: ImportError) -> AppError {
    match err {
        ImportError::Decode(err) => AppError::bad_request(err.to_string()),
        ImportError::Store(err) => AppError::Internal(err.into()),
    }
}

fn export_failure(err: ExportError) -> AppError {
    AppError::Internal(err.into())
}

/// OpenAPI fragment for the routes above.
pub fn openapi() -> serde_json::Value {
    let error = json!({
        "description": "Error",
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    });
    let report = json!({
        "description": "One line per record: a success message or `Invalid data!`",
        "content": { "text/plain": { "schema": { "type": "string" } } }
    });

    json!({
        "paths": {
            "/books/import": {
                "post": {
                    "summary": "Import books from a <Books> XML document",
                    "tags": ["Bookshop"],
                    "requestBody": {
                        "required": true,
                        "content": { "application/xml": { "schema": { "type": "string" } } }
                    },
                    "responses": { "200": report.clone(), "400": error.clone(), "500": error.clone() }
                }
            },
            "/authors/import": {
                "post": {
                    "summary": "Import authors from a JSON array",
                    "tags": ["Bookshop"],
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": { "type": "string" } } }
                    },
                    "responses": { "200": report, "400": error.clone(), "500": error.clone() }
                }
            },
            "/authors/prolific": {
                "get": {
                    "summary": "Authors ordered by number of books",
                    "tags": ["Bookshop"],
                    "responses": {
                        "200": {
                            "description": "Authors with their books",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/ProlificAuthor" }
                                    }
                                }
                            }
                        },
                        "500": error.clone()
                    }
                }
            },
            "/books/oldest-science": {
                "get": {
                    "summary": "Up to 10 science books published before a date",
                    "tags": ["Bookshop"],
                    "parameters": [{
                        "name": "before",
                        "in": "query",
                        "required": true,
                        "schema": { "type": "string", "format": "date" }
                    }],
                    "responses": {
                        "200": {
                            "description": "<Books> XML document",
                            "content": { "application/xml": { "schema": { "type": "string" } } }
                        },
                        "422": error.clone(),
                        "500": error
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Bookshop health check",
                    "tags": ["Bookshop"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "ProlificAuthor": {
                    "type": "object",
                    "properties": {
                        "AuthorName": { "type": "string" },
                        "Books": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "BookName": { "type": "string" },
                                    "BookPrice": { "type": "string", "example": "15.50" }
                                },
                                "required": ["BookName", "BookPrice"]
                            }
                        }
                    },
                    "required": ["AuthorName", "Books"]
                }
            }
        }
    })
}
