//! Page content lookup against the externally owned `pages` table.
//!
//! The ingestion system writes one row per document page; this server only
//! reads. Lookups go through the normalized document identity because
//! callers frequently hold a `_page_<n>`-suffixed reference from the index.

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::{BasePageStore, PageRecord};
use crate::common::identity;
use crate::error::{PipelineError, Result};

pub struct PostgresPageStore {
    pool: PgPool,
}

impl PostgresPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PageRow {
    id: String,
    file_path: String,
    page: i32,
    content: String,
}

#[async_trait]
impl BasePageStore for PostgresPageStore {
    async fn fetch_page(&self, document: &str, page: i32) -> Result<PageRecord> {
        let doc_identity = identity::base_identity(document);

        let row: Option<PageRow> = sqlx::query_as(
            r#"
            SELECT id::text AS id, file_path, page, content
            FROM pages
            WHERE file_path LIKE '%' || $1 || '%'
            AND page = $2
            LIMIT 1
            "#,
        )
        .bind(&doc_identity)
        .bind(page)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(PageRecord {
                id: row.id,
                document: doc_identity,
                page: row.page,
                content: row.content,
                file_path: row.file_path,
            }),
            None => Err(PipelineError::PageNotFound {
                document: doc_identity,
                page,
            }),
        }
    }
}
