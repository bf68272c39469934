//! Read pool configuration for paginated queries

use std::path::Path;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::debug;

use crate::Error;

/// Configuration for the read-only pool that paginated queries run on
///
/// Each paginated query holds two connections at once (count and data), so
/// `max_connections` below 2 serializes the two statements.
///
/// # Examples
///
/// ```
/// use sqlx_sqlite_countable::PoolConfig;
/// use std::time::Duration;
///
/// let config = PoolConfig {
///    max_connections: 4,
///    ..Default::default()
/// };
/// assert_eq!(config.idle_timeout, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
   /// Maximum number of concurrent read connections
   ///
   /// Default: 6
   pub max_connections: u32,

   /// How long a query waits for a free connection before failing
   ///
   /// Default: 30 seconds
   pub acquire_timeout: Duration,

   /// Connections idle for this long are closed
   ///
   /// Default: 30 seconds
   pub idle_timeout: Duration,
}

impl Default for PoolConfig {
   fn default() -> Self {
      Self {
         max_connections: 6,
         acquire_timeout: Duration::from_secs(30),
         idle_timeout: Duration::from_secs(30),
      }
   }
}

/// Open a read-only connection pool on an existing SQLite database file.
pub async fn open_read_pool(
   path: impl AsRef<Path>,
   config: PoolConfig,
) -> Result<SqlitePool, Error> {
   let path = path.as_ref();
   let connect_options = SqliteConnectOptions::new().filename(path).read_only(true);

   let pool = SqlitePoolOptions::new()
      .max_connections(config.max_connections.max(1))
      .min_connections(0)
      .acquire_timeout(config.acquire_timeout)
      .idle_timeout(Some(config.idle_timeout))
      .connect_with(connect_options)
      .await?;

   debug!(
      path = %path.display(),
      max_connections = config.max_connections,
      "opened read pool"
   );

   Ok(pool)
}
