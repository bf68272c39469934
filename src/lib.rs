//! # sqlx-sqlite-countable
//!
//! Count-then-paginate `SELECT` queries on SQLite.
//!
//! Given a query, its bind values and [`PaginationOptions`], the crate derives
//! a matching `COUNT` statement, appends `LIMIT`/`OFFSET` to the original, runs
//! both concurrently on a [`sqlx::SqlitePool`] and returns the rows together
//! with [`CountablePagination`] metadata: total rows, page count, neighbouring
//! pages and a short window of page numbers for page-selector links.
//!
//! ## Query convention
//!
//! Queries must be a single top-level statement of the form
//!
//! ```text
//! SELECT <projection> FROM <conditions> [ORDER BY ...]
//! ```
//!
//! `<conditions>` (tables, joins, `WHERE`) is reused verbatim for the count.
//! See the [`clause`] module for what is and is not recognized.
//!
//! ## Example
//!
//! ```no_run
//! use serde_json::json;
//! use sqlx_sqlite_countable::{PaginationOptions, PoolConfig, open_read_pool, query_paginated};
//!
//! # async fn example() -> Result<(), sqlx_sqlite_countable::Error> {
//! let pool = open_read_pool("blog.db", PoolConfig::default()).await?;
//!
//! let opts = PaginationOptions::new().with_page(3).with_per_page(25);
//! let page = query_paginated(
//!    &pool,
//!    &opts,
//!    "SELECT id, title FROM posts WHERE score > $1 ORDER BY id",
//!    vec![json!(50)],
//! )
//! .await?;
//!
//! for row in &page.rows {
//!    println!("{}", row["title"]);
//! }
//! println!("page {} of {}", page.pagination.page(), page.pagination.pages());
//! # Ok(())
//! # }
//! ```

pub mod clause;
mod config;
mod decode;
mod driver;
mod error;
mod options;
pub mod pagination;
mod query;

pub use clause::{build_count_query, condition_clause};
pub use config::{PoolConfig, open_read_pool};
pub use decode::JsonRow;
pub use driver::query_paginated_all;
pub use error::{Error, Result};
pub use options::PaginationOptions;
pub use pagination::{CountablePagination, pages_for_count};
pub use query::{PaginatedResponse, QueryPaginatedBuilder, query_paginated};
