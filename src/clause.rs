//! Count query derivation.
//!
//! A paginated query is a single `SELECT ... FROM <conditions> [ORDER BY ...]
//! [LIMIT ...]` statement. The matching count query keeps the condition clause
//! (everything between `FROM` and the first `ORDER`/`LIMIT`) and replaces the
//! projection with `COUNT(<column>)`:
//!
//! ```text
//! SELECT id, title FROM posts WHERE category = $1 ORDER BY id
//!                       └─────── conditions ───────┘
//! SELECT COUNT(*) FROM posts WHERE category = $1
//! ```
//!
//! Keywords are only recognized at the top level: text inside parentheses,
//! string literals, quoted identifiers and comments is skipped, so subqueries
//! such as `FROM (SELECT ... ORDER BY x LIMIT 5)` keep their clauses.
//!
//! # Limitations
//!
//! The projection is discarded, so statements whose row count depends on it
//! do not produce a matching count: top-level `GROUP BY` yields one count per
//! group, `SELECT DISTINCT` counts duplicates, and compound selects (`UNION`)
//! are not understood. Bind parameters that appear in the projection are
//! still passed to the count query and shift positional `?` parameters.

use crate::Error;

/// True if `keyword` sits at `i` as a whole word.
fn is_keyword_at(bytes: &[u8], i: usize, keyword: &[u8]) -> bool {
   let end = i + keyword.len();
   if bytes.get(i..end) != Some(keyword) {
      return false;
   }

   let word_start = i == 0 || !is_ident_byte(bytes[i - 1]);
   let word_end = bytes.get(end).is_none_or(|&b| !is_ident_byte(b));
   word_start && word_end
}

// Non-ASCII bytes belong to identifiers such as `städte`.
fn is_ident_byte(b: u8) -> bool {
   b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Index of the last byte of the quoted text, comment or bracketed name
/// opening at `i`, or `None` if nothing is opened there. Unterminated
/// tokens run to the end of the input.
fn skip_token(bytes: &[u8], i: usize) -> Option<usize> {
   let last = bytes.len() - 1;
   let next = bytes.get(i + 1).copied();

   let end = match bytes[i] {
      quote @ (b'\'' | b'"' | b'`') => {
         // `''` inside a literal is an escaped quote.
         let mut j = i + 1;
         loop {
            match bytes.get(j) {
               None => break last,
               Some(&b) if b == quote && bytes.get(j + 1) == Some(&quote) => j += 2,
               Some(&b) if b == quote => break j,
               Some(_) => j += 1,
            }
         }
      }
      b'[' => bytes[i..]
         .iter()
         .position(|&b| b == b']')
         .map_or(last, |offset| i + offset),
      b'-' if next == Some(b'-') => bytes[i..]
         .iter()
         .position(|&b| b == b'\n')
         .map_or(last, |offset| i + offset),
      b'/' if next == Some(b'*') => bytes[i + 2..]
         .windows(2)
         .position(|pair| pair == b"*/")
         .map_or(last, |offset| i + 2 + offset + 1),
      _ => return None,
   };

   Some(end)
}

/// Call `on_keyword` at every position outside parentheses, quotes and
/// comments until it returns `Some`.
///
/// Matching runs on an ASCII-uppercased copy, which keeps byte offsets
/// identical to `query`.
fn scan_top_level<T>(
   query: &str,
   mut on_keyword: impl FnMut(&[u8], usize) -> Option<T>,
) -> Option<T> {
   let upper = query.to_ascii_uppercase();
   let bytes = upper.as_bytes();
   let mut depth = 0_i32;
   let mut i = 0;

   while i < bytes.len() {
      if let Some(end) = skip_token(bytes, i) {
         i = end + 1;
         continue;
      }

      match bytes[i] {
         b'(' => depth += 1,
         b')' => depth -= 1,
         _ if depth == 0 => {
            if let Some(found) = on_keyword(bytes, i) {
               return Some(found);
            }
         }
         _ => {}
      }
      i += 1;
   }

   None
}

/// Trim surrounding whitespace and trailing semicolons from a statement.
pub(crate) fn trim_statement(query: &str) -> &str {
   query.trim().trim_end_matches(';').trim_end()
}

/// Extract the condition clause of a `SELECT` statement: the text after the
/// first top-level `FROM`, up to the first top-level `ORDER` or `LIMIT`.
///
/// # Errors
///
/// Returns [`Error::MalformedQuery`] if there is no top-level `FROM` or the
/// clause after it is empty.
pub fn condition_clause(query: &str) -> Result<&str, Error> {
   let query = trim_statement(query);

   let from = scan_top_level(query, |bytes, i| is_keyword_at(bytes, i, b"FROM").then_some(i))
   .ok_or_else(|| Error::malformed("no top-level FROM clause"))?;

   let start = from + "FROM".len();
   let end = scan_top_level(query, |bytes, i| {
      let boundary = i >= start
         && (is_keyword_at(bytes, i, b"ORDER") || is_keyword_at(bytes, i, b"LIMIT"));
      boundary.then_some(i)
   })
   .unwrap_or(query.len());

   let conditions = query[start..end].trim();
   if conditions.is_empty() {
      return Err(Error::malformed("empty FROM clause"));
   }

   Ok(conditions)
}

/// Build the `SELECT COUNT(<column>) FROM <conditions>` statement matching a
/// paginated query.
///
/// ```
/// use sqlx_sqlite_countable::build_count_query;
///
/// let sql = build_count_query("SELECT * FROM posts WHERE score > $1 ORDER BY id", "*").unwrap();
/// assert_eq!(sql, "SELECT COUNT(*) FROM posts WHERE score > $1");
/// ```
pub fn build_count_query(query: &str, column: &str) -> Result<String, Error> {
   validate_count_column(column)?;
   let conditions = condition_clause(query)?;

   Ok(format!("SELECT COUNT({}) FROM {}", column.trim(), conditions))
}

/// `[a-zA-Z_][a-zA-Z0-9_.]*`: a bare or table-qualified column name.
fn is_identifier(name: &str) -> bool {
   let mut chars = name.chars();
   let Some(first) = chars.next() else {
      return false;
   };
   if !first.is_ascii_alphabetic() && first != '_' {
      return false;
   }

   chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.')
}

/// Validate the expression passed to `COUNT(...)`: `*`, an identifier, or
/// `DISTINCT <identifier>`.
pub(crate) fn validate_count_column(column: &str) -> Result<(), Error> {
   let trimmed = column.trim();
   if trimmed == "*" {
      return Ok(());
   }

   let target = match trimmed.get(..9) {
      Some(prefix) if prefix.eq_ignore_ascii_case("DISTINCT ") => trimmed[9..].trim_start(),
      _ => trimmed,
   };

   if !is_identifier(target) || target.eq_ignore_ascii_case("DISTINCT") {
      return Err(Error::InvalidCountColumn {
         column: column.to_string(),
      });
   }

   Ok(())
}
