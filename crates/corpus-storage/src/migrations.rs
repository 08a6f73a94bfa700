//! Schema migration for the `comics` table.
//!
//! There is exactly one table and one migration; `sqlx::migrate!` is
//! overkill for a single `CREATE TABLE IF NOT EXISTS`, so this runs a plain
//! idempotent statement at startup, same as the original's `storage.Migrate`.

use sqlx::PgPool;

pub async fn run(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comics (
            id    BIGINT PRIMARY KEY,
            url   TEXT NOT NULL,
            words TEXT[] NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
