//! Concurrent count and window queries.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::{Row, SqlitePool};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::Error;
use crate::clause::{build_count_query, trim_statement};
use crate::decode::{JsonRow, decode_rows};
use crate::options::PaginationOptions;
use crate::pagination::CountablePagination;

/// One page of rows together with its pagination metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse {
   /// The rows in this page
   pub rows: Vec<JsonRow>,
   /// Metadata computed from the total row count
   pub pagination: CountablePagination,
}

/// Run one page of a `SELECT` query together with its count.
///
/// The count statement is derived from `query` (see [`build_count_query`])
/// and the data statement gets `LIMIT <per_page> OFFSET <offset>` appended.
/// Both run at the same time on separate pooled connections and receive the
/// same bind `values`. The result is awaited directly:
///
/// ```no_run
/// # async fn example(pool: sqlx::SqlitePool) -> Result<(), sqlx_sqlite_countable::Error> {
/// use serde_json::json;
/// use sqlx_sqlite_countable::{PaginationOptions, query_paginated};
///
/// let opts = PaginationOptions::new().with_page(2).with_per_page(20);
/// let page = query_paginated(
///    &pool,
///    &opts,
///    "SELECT id, title FROM posts WHERE category = $1 ORDER BY id",
///    vec![json!("tech")],
/// )
/// .await?;
///
/// println!("{} of {} pages", page.pagination.page(), page.pagination.pages());
/// # Ok(())
/// # }
/// ```
///
/// The two reads are not a snapshot: a write between them can make the count
/// disagree with the rows returned.
pub fn query_paginated(
   pool: &SqlitePool,
   options: &PaginationOptions,
   query: impl Into<String>,
   values: Vec<JsonValue>,
) -> QueryPaginatedBuilder {
   QueryPaginatedBuilder {
      pool: pool.clone(),
      options: options.clone(),
      query: query.into(),
      values,
      cancel: None,
   }
}

/// Builder for a single paginated query, returned by [`query_paginated`].
pub struct QueryPaginatedBuilder {
   pool: SqlitePool,
   options: PaginationOptions,
   query: String,
   values: Vec<JsonValue>,
   cancel: Option<CancellationToken>,
}

impl QueryPaginatedBuilder {
   /// Abort both queries when `token` is cancelled.
   ///
   /// Cancellation drops the count and data queries, returning their pooled
   /// connections, and resolves with [`Error::Cancelled`].
   pub fn cancel_on(mut self, token: CancellationToken) -> Self {
      self.cancel = Some(token);
      self
   }

   /// Execute both queries and compute the page metadata.
   pub async fn execute(self) -> Result<PaginatedResponse, Error> {
      let Self {
         pool,
         options,
         query,
         values,
         cancel,
      } = self;

      let (count_sql, data_sql) = build_statements(&query, &options)?;
      trace!(count = %count_sql, data = %data_sql, "paginated statements");

      // If either branch fails, try_join drops the other one, which cancels
      // its query and hands its connection back to the pool.
      let branches = async move {
         tokio::try_join!(
            fetch_count(&pool, &count_sql, values.clone()),
            fetch_rows(&pool, &data_sql, values),
         )
      };

      let (total, rows) = match cancel {
         Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => {
               debug!(page = options.page(), "paginated query cancelled");
               return Err(Error::Cancelled);
            }
            result = branches => result?,
         },
         None => branches.await?,
      };

      let pagination = CountablePagination::from_count_with_options(&options, total);
      debug!(
         total,
         page = pagination.page(),
         pages = pagination.pages(),
         rows = rows.len(),
         "fetched page"
      );

      Ok(PaginatedResponse { rows, pagination })
   }
}

impl IntoFuture for QueryPaginatedBuilder {
   type Output = Result<PaginatedResponse, Error>;
   type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

   fn into_future(self) -> Self::IntoFuture {
      Box::pin(self.execute())
   }
}

/// Build the count statement and the windowed data statement.
pub(crate) fn build_statements(
   query: &str,
   options: &PaginationOptions,
) -> Result<(String, String), Error> {
   let count_sql = build_count_query(query, options.column())?;
   let (limit, offset) = options.window()?;
   // A trailing `--` comment would swallow a window on the same line.
   let data_sql = format!(
      "{}\nLIMIT {} OFFSET {}",
      trim_statement(query),
      limit,
      offset
   );

   Ok((count_sql, data_sql))
}

async fn fetch_count(pool: &SqlitePool, sql: &str, values: Vec<JsonValue>) -> Result<i64, Error> {
   let mut q = sqlx::query(sql);
   for value in values {
      q = bind_value(q, value);
   }

   let row = q
      .fetch_optional(pool)
      .await?
      .ok_or(Error::Scan(sqlx::Error::RowNotFound))?;

   row.try_get::<i64, _>(0).map_err(Error::Scan)
}

async fn fetch_rows(
   pool: &SqlitePool,
   sql: &str,
   values: Vec<JsonValue>,
) -> Result<Vec<JsonRow>, Error> {
   let mut q = sqlx::query(sql);
   for value in values {
      q = bind_value(q, value);
   }

   let rows = q.fetch_all(pool).await?;
   decode_rows(rows)
}

/// Helper function to bind a JSON value to a SQLx query
pub(crate) fn bind_value<'a>(
   query: sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>>,
   value: JsonValue,
) -> sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>> {
   match value {
      JsonValue::Null => query.bind(None::<JsonValue>),
      JsonValue::Bool(flag) => query.bind(flag),
      JsonValue::String(text) => query.bind(text),
      JsonValue::Number(number) => {
         // Preserve integer precision by binding as i64 when possible
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else if let Some(uint_val) = number.as_u64() {
            // Too large for SQLite's INTEGER, falls back to REAL
            query.bind(uint_val as f64)
         } else {
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      other => query.bind(other),
   }
}
