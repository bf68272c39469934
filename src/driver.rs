//! Walking every page of a paginated query.

use std::future::Future;

use serde_json::Value as JsonValue;
use sqlx::SqlitePool;
use tracing::debug;

use crate::Error;
use crate::options::PaginationOptions;
use crate::query::{PaginatedResponse, query_paginated};

/// Run `query` page by page, starting at `options.page()`, handing each page
/// to `callback`.
///
/// Pages are fetched strictly one after another: the next page's queries are
/// only issued once the callback for the current page has returned `Ok`. The
/// first error, from a query or from the callback, stops the walk and is
/// returned; a callback error is wrapped in [`Error::Callback`] with the
/// original error as its source.
///
/// An empty result set still produces one call with no rows. The caller's
/// `options` are not modified.
///
/// ```no_run
/// # async fn example(pool: sqlx::SqlitePool) -> Result<(), sqlx_sqlite_countable::Error> {
/// use sqlx_sqlite_countable::{PaginationOptions, query_paginated_all};
///
/// let mut seen = 0;
/// query_paginated_all(
///    &pool,
///    &PaginationOptions::new().with_per_page(100),
///    |page| {
///       seen += page.rows.len();
///       async { Ok::<(), std::io::Error>(()) }
///    },
///    "SELECT * FROM posts ORDER BY id",
///    vec![],
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn query_paginated_all<F, Fut, E>(
   pool: &SqlitePool,
   options: &PaginationOptions,
   mut callback: F,
   query: &str,
   values: Vec<JsonValue>,
) -> Result<(), Error>
where
   F: FnMut(PaginatedResponse) -> Fut,
   Fut: Future<Output = Result<(), E>>,
   E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
   let mut options = options.clone();

   loop {
      let response = query_paginated(pool, &options, query, values.clone()).await?;
      let next = response.pagination.next_page();

      callback(response)
         .await
         .map_err(|e| Error::Callback(e.into()))?;

      if next == 0 {
         break;
      }

      debug!(next, "advancing to next page");
      options.set_page(next);
   }

   Ok(())
}
