//! corpus-storage — the single `comics` table, shared read/write by the
//! Ingestor (writer) and Search Engine (reader). Neither depends on the
//! other; both depend on [`PgStorage`] through `corpus_core::ports::Storage`.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE comics (
//!     id    BIGINT PRIMARY KEY,
//!     url   TEXT NOT NULL,
//!     words TEXT[] NOT NULL
//! );
//! ```
//!
//! Ranking queries lean on PostgreSQL's array operators (`&&`, `unnest`,
//! `array_length`) to compute the two ranking keys in a single round trip
//! (see [`PgStorage::search_comics`]).

pub mod migrations;

use async_trait::async_trait;
use corpus_core::error::CoreError;
use corpus_core::ports::{Pingable, Storage};
use corpus_core::types::{Comic, DbStats};
use sqlx::PgPool;

/// A `Storage` implementation backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        migrations::run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn add(&self, comic: Comic) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            INSERT INTO comics (id, url, words) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(comic.id)
        .bind(&comic.url)
        .bind(&comic.words)
        .execute(&self.pool)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        Ok(())
    }

    async fn ids(&self) -> Result<Vec<i64>, CoreError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM comics")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CoreError::Internal(e.into()))?;
        Ok(ids)
    }

    async fn stats(&self) -> Result<DbStats, CoreError> {
        let words_total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(array_length(words, 1)), 0) FROM comics",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        let words_unique: i64 = sqlx::query_scalar(
            "SELECT COALESCE(COUNT(DISTINCT word), 0) FROM comics, unnest(words) AS word",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        let comics_fetched: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comics")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CoreError::Internal(e.into()))?;

        Ok(DbStats {
            words_total,
            words_unique,
            comics_fetched,
        })
    }

    async fn drop_all(&self) -> Result<(), CoreError> {
        sqlx::query("DELETE FROM comics")
            .execute(&self.pool)
            .await
            .map_err(|e| CoreError::Internal(e.into()))?;
        Ok(())
    }

    async fn search_comics(
        &self,
        keywords: &[String],
        limit: i64,
    ) -> Result<Vec<Comic>, CoreError> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let effective_limit = if limit > 0 { limit } else { i64::MAX };

        let rows: Vec<(i64, String, Vec<String>)> = sqlx::query_as(
            r#"
            WITH search_words AS (
                SELECT unnest($1::text[]) AS word
            ),
            comic_matches AS (
                SELECT
                    c.id,
                    c.url,
                    c.words,
                    COUNT(DISTINCT sw.word) AS unique_matches,
                    SUM(
                        (SELECT COUNT(*)
                         FROM unnest(c.words) AS comic_word
                         WHERE comic_word = sw.word)
                    ) AS total_matches
                FROM comics c
                CROSS JOIN search_words sw
                WHERE c.words && $1
                GROUP BY c.id, c.url, c.words
            )
            SELECT id, url, words
            FROM comic_matches
            ORDER BY unique_matches DESC, total_matches DESC
            LIMIT $2
            "#,
        )
        .bind(keywords)
        .bind(effective_limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CoreError::Internal(e.into()))?;

        Ok(rows
            .into_iter()
            .map(|(id, url, words)| Comic { id, url, words })
            .collect())
    }

    async fn all_comics(&self) -> Result<Vec<Comic>, CoreError> {
        let rows: Vec<(i64, String, Vec<String>)> =
            sqlx::query_as("SELECT id, url, words FROM comics ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| CoreError::Internal(e.into()))?;

        Ok(rows
            .into_iter()
            .map(|(id, url, words)| Comic { id, url, words })
            .collect())
    }

    async fn comics_by_ids(&self, ids: &[i64]) -> Result<Vec<Comic>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<(i64, String, Vec<String>)> =
            sqlx::query_as("SELECT id, url, words FROM comics WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| CoreError::Internal(e.into()))?;

        Ok(rows
            .into_iter()
            .map(|(id, url, words)| Comic { id, url, words })
            .collect())
    }
}

#[async_trait]
impl Pingable for PgStorage {
    async fn ping(&self) -> Result<(), CoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CoreError::Internal(e.into()))?;
        Ok(())
    }
}
