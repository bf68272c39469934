//! Per-call pagination options.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::clause::validate_count_column;

/// Options for one paginated query.
///
/// Values are not checked on construction. The executor clamps `page` and
/// `per_page` to at least 1; call [`validate`](Self::validate) for strict
/// checking of input from untrusted sources.
///
/// Deserializes from camelCase JSON, with missing fields taking the defaults:
///
/// ```
/// use sqlx_sqlite_countable::PaginationOptions;
///
/// let opts: PaginationOptions = serde_json::from_str(r#"{"page": 3, "perPage": 25}"#).unwrap();
/// assert_eq!(opts.page(), 3);
/// assert_eq!(opts.per_page(), 25);
/// assert_eq!(opts.column(), "*");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationOptions {
   page: i64,
   per_page: i64,
   spill: i64,
   #[serde(alias = "countColumn")]
   column: String,
}

impl Default for PaginationOptions {
   fn default() -> Self {
      Self {
         page: 1,
         per_page: 10,
         spill: 2,
         column: "*".to_string(),
      }
   }
}

impl PaginationOptions {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn with_page(mut self, page: i64) -> Self {
      self.page = page;
      self
   }

   pub fn with_per_page(mut self, per_page: i64) -> Self {
      self.per_page = per_page;
      self
   }

   pub fn with_spill(mut self, spill: i64) -> Self {
      self.spill = spill;
      self
   }

   /// Set the column or expression passed to `COUNT(...)`.
   pub fn with_column(mut self, column: impl Into<String>) -> Self {
      self.column = column.into();
      self
   }

   pub fn page(&self) -> i64 {
      self.page
   }

   pub fn per_page(&self) -> i64 {
      self.per_page
   }

   pub fn spill(&self) -> i64 {
      self.spill
   }

   pub fn column(&self) -> &str {
      &self.column
   }

   /// Advance to another page. This is the only mutation the driver performs.
   pub fn set_page(&mut self, page: i64) {
      self.page = page;
   }

   /// Page number clamped to at least 1.
   pub fn effective_page(&self) -> i64 {
      self.page.max(1)
   }

   /// Page size clamped to at least 1.
   pub fn effective_per_page(&self) -> i64 {
      self.per_page.max(1)
   }

   /// Spill clamped to at least 1, then to below the page size.
   ///
   /// Not consulted when building the visible page window, which has a fixed
   /// width of [`WINDOW_WIDTH`](crate::pagination::WINDOW_WIDTH).
   pub fn effective_spill(&self) -> i64 {
      let per_page = self.effective_per_page();
      let spill = self.spill.max(1);
      if spill >= per_page { per_page - 1 } else { spill }
   }

   /// Strictly validate the options instead of clamping them.
   pub fn validate(&self) -> Result<(), Error> {
      if self.page < 1 {
         return Err(Error::InvalidPage(self.page));
      }
      if self.per_page < 1 {
         return Err(Error::InvalidPageSize(self.per_page));
      }
      if self.spill < 0 {
         return Err(Error::InvalidSpill(self.spill));
      }
      validate_count_column(&self.column)
   }

   /// `(limit, offset)` for the data window of the current page.
   pub(crate) fn window(&self) -> Result<(i64, i64), Error> {
      let limit = self.effective_per_page();
      let offset = (self.effective_page() - 1)
         .checked_mul(limit)
         .ok_or(Error::InvalidPage(self.page))?;

      Ok((limit, offset))
   }
}
