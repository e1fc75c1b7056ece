/// SQLite movie catalog
///
/// The catalog is a single read-only file produced offline. Two consumers:
/// the paginated listing endpoint, and the recommendation pipeline's
/// id-to-title lookup for prior selections. Connections are created lazily so
/// a missing file fails individual queries instead of process startup - the
/// pipeline degrades lookups, the listing endpoint reports the error.
use crate::{error::AppResult, services::providers::TitleLookup};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Row, SqlitePool};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogRow {
    pub id: String,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
}

#[derive(Clone)]
pub struct MovieCatalog {
    pool: SqlitePool,
}

impl MovieCatalog {
    /// Open the catalog at `path` without touching the file yet
    pub fn open(path: &str) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_lazy_with(options);

        Self { pool }
    }

    /// Wrap an existing pool (tests, in-memory catalogs)
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of the catalog, highest-rated first
    pub async fn list_page(&self, page: u32, limit: u32) -> AppResult<Vec<CatalogRow>> {
        let offset = (i64::from(page) - 1) * i64::from(limit);

        let rows = sqlx::query_as::<_, CatalogRow>(
            "SELECT CAST(id AS TEXT) AS id, title, overview, poster_path, vote_average, release_date \
             FROM movies ORDER BY vote_average DESC LIMIT ? OFFSET ?",
        )
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}

#[async_trait::async_trait]
impl TitleLookup for MovieCatalog {
    async fn titles_for_ids(&self, ids: &[String]) -> AppResult<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // Ids are opaque strings end to end; the column is compared as text
        // regardless of its declared affinity.
        let mut builder: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new("SELECT title FROM movies WHERE CAST(id AS TEXT) IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut titles = Vec::with_capacity(rows.len());
        for row in rows {
            titles.push(row.try_get("title")?);
        }
        Ok(titles)
    }
}
