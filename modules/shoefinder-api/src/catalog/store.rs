use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;
use tracing::debug;

use shoefinder_common::{CatalogTable, Config};

use super::query::{QueryParam, TYPE_COLUMN_SQL};
use super::row::row_to_json;
use super::{CatalogQuery, CatalogRow, CatalogStore};

/// Catalog store over a shared MySQL pool.
#[derive(Clone)]
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Open the pool from configuration. Connects eagerly so a bad DSN fails at startup.
    pub async fn connect(config: &Config) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.db_host)
            .port(config.db_port)
            .username(&config.db_user)
            .password(&config.db_password)
            .database(&config.db_name);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect_with(options)
            .await
            .with_context(|| {
                format!(
                    "connecting to MySQL at {}:{}/{}",
                    config.db_host, config.db_port, config.db_name
                )
            })?;

        Ok(Self::new(pool))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CatalogStore for MySqlCatalog {
    async fn has_type_column(&self, table: CatalogTable) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as(TYPE_COLUMN_SQL)
            .bind(table.as_str())
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("checking Type column on {table}"))?;

        debug!(%table, has_type_column = count > 0, "Schema lookup");
        Ok(count > 0)
    }

    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        let mut q = sqlx::query(&query.sql);
        for param in &query.params {
            q = match param {
                QueryParam::Text(text) => q.bind(text.as_str()),
                QueryParam::Number(n) => q.bind(*n),
            };
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("executing catalog query: {}", query.sql))?;

        debug!(rows = rows.len(), "Catalog query complete");

        rows.iter()
            .map(|row| row_to_json(row).context("decoding catalog row"))
            .collect()
    }
}
