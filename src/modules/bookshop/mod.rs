//! Bookshop batch import and export.
//!
//! Books arrive as XML, authors as JSON. Each import call validates every
//! record on its own, stages what passes and commits once; the returned
//! report has one line per input record. Two read-only views export the
//! most prolific authors (JSON) and the oldest science books (XML).

pub mod codec;
pub mod export;
pub mod import;
pub mod models;
pub mod report;
pub mod resolver;
pub mod routes;
pub mod validation;

use async_trait::async_trait;
use axum::Router;
use bookshop_db::SharedStore;
use bookshop_kernel::{InitCtx, Module};

pub use export::{
    export_oldest_science_books, export_prolific_authors, oldest_science_books,
    prolific_authors, ExportError, OLDEST_BOOKS_LIMIT,
};
pub use import::{import_authors, import_books, ImportError};
pub use report::{ImportReport, ReportLine, INVALID_DATA};

pub struct BookshopModule {
    store: SharedStore,
}

impl BookshopModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BookshopModule {
    fn name(&self) -> &'static str {
        "bookshop"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let (books, authors) = {
            let store = bookshop_db::lock(&self.store)?;
            (store.books()?.len(), store.authors()?.len())
        };

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            authors,
            "bookshop module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(routes::openapi())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "bookshop module stopped");
        Ok(())
    }
}

pub fn create_module(store: SharedStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BookshopModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshop_db::MemoryStore;
    use bookshop_kernel::settings::Settings;

    #[tokio::test]
    async fn module_initializes_against_store() {
        let module = create_module(bookshop_db::shared(MemoryStore::new()));
        let settings = Settings::default();

        module.init(&InitCtx { settings: &settings }).await.unwrap();
        assert_eq!(module.name(), "bookshop");
        assert!(module.openapi().is_some());
    }
}
