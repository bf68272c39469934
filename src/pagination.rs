//! Count-based pagination metadata.
//!
//! Given the options of a query and the total number of matching rows,
//! [`CountablePagination`] describes the requested page: how many pages there
//! are, which pages precede and follow it, and a short window of page numbers
//! around it for rendering page-selector links.
//!
//! # Page window
//!
//! The window is only filled in when there are more than ten pages; smaller
//! result sets are expected to list every page. It is [`WINDOW_WIDTH`] pages
//! wide and centered on the current page, sliding right near the first page
//! and left near the last so it always stays within `1..=pages`:
//!
//! ```text
//! pages = 25
//! page  1  →  [1 2 3 4 5 6 7]
//! page 15  →  [12 13 14 15 16 17 18]
//! page 25  →  [19 20 21 22 23 24 25]
//! ```
//!
//! The `spill` option does not affect the window width.

use serde::Serialize;
use url::Url;

use crate::options::PaginationOptions;

/// Number of page links in the visible window.
pub const WINDOW_WIDTH: i64 = 7;

/// The window is left empty for result sets with at most this many pages.
pub const WINDOW_THRESHOLD: i64 = 10;

/// Number of pages needed for `total` rows at `per_page` rows per page.
///
/// `per_page` is clamped to at least 1; a non-positive total has no pages.
pub fn pages_for_count(per_page: i64, total: i64) -> i64 {
   let per_page = per_page.max(1);
   if total <= 0 {
      return 0;
   }

   (total - 1) / per_page + 1
}

/// Pagination metadata for one page of a counted result set.
///
/// `next_page` and `previous_page` are 0 when there is no such page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountablePagination {
   total: i64,
   per_page: i64,
   page: i64,
   pages: i64,
   next_page: i64,
   previous_page: i64,
   range: Vec<i64>,
}

impl CountablePagination {
   /// Metadata for the first page of `total` rows with default options.
   pub fn from_count(total: i64) -> Self {
      Self::from_count_with_options(&PaginationOptions::default(), total)
   }

   /// Metadata for the page selected by `opts` out of `total` rows.
   ///
   /// A page beyond the last one is reported as the last page (or page 1 for
   /// an empty result set).
   pub fn from_count_with_options(opts: &PaginationOptions, total: i64) -> Self {
      let per_page = opts.effective_per_page();
      let pages = pages_for_count(per_page, total);
      let page = opts.effective_page().min(pages.max(1));

      let mut next_page = 0;
      let mut previous_page = 0;

      if pages > 1 {
         if page > 1 {
            previous_page = page - 1;
         }
         if page < pages {
            next_page = page + 1;
         }
      }

      let range = if pages > WINDOW_THRESHOLD {
         page_window(page, pages)
      } else {
         Vec::new()
      };

      Self {
         total: total.max(0),
         per_page,
         page,
         pages,
         next_page,
         previous_page,
         range,
      }
   }

   pub fn total(&self) -> i64 {
      self.total
   }

   pub fn per_page(&self) -> i64 {
      self.per_page
   }

   pub fn page(&self) -> i64 {
      self.page
   }

   pub fn pages(&self) -> i64 {
      self.pages
   }

   pub fn next_page(&self) -> i64 {
      self.next_page
   }

   pub fn previous_page(&self) -> i64 {
      self.previous_page
   }

   /// Page numbers to render as links, ascending. Empty for ten pages or fewer.
   pub fn range(&self) -> &[i64] {
      &self.range
   }

   /// `base` with its `page` query parameter set to the next page, or `"#"`
   /// if this is the last page.
   pub fn next_url(&self, base: &Url) -> String {
      page_url(base, self.next_page)
   }

   /// `base` with its `page` query parameter set to the previous page, or
   /// `"#"` if this is the first page.
   pub fn previous_url(&self, base: &Url) -> String {
      page_url(base, self.previous_page)
   }
}

/// Window of [`WINDOW_WIDTH`] consecutive pages around `page`, kept within
/// `1..=pages`. Requires `pages > WINDOW_WIDTH`.
fn page_window(page: i64, pages: i64) -> Vec<i64> {
   // Shifting right at the start and left at the end both reduce to
   // clamping the first page, which keeps every bound within 1..=pages.
   let min = (page - WINDOW_WIDTH / 2)
      .max(1)
      .min(pages - WINDOW_WIDTH + 1);

   (min..=min + (WINDOW_WIDTH - 1)).collect()
}

/// Replace (or add) the `page` query parameter, keeping other parameters in
/// their original order.
fn page_url(base: &Url, page: i64) -> String {
   if page == 0 {
      return "#".to_string();
   }

   let mut url = base.clone();
   let pairs: Vec<(String, String)> = url
      .query_pairs()
      .filter(|(key, _)| key != "page")
      .map(|(key, value)| (key.into_owned(), value.into_owned()))
      .collect();

   url
      .query_pairs_mut()
      .clear()
      .extend_pairs(pairs)
      .append_pair("page", &page.to_string());

   url.into()
}

#[cfg(test)]
mod tests {
   use super::*;

   fn compute(total: i64, per_page: i64, page: i64) -> CountablePagination {
      let opts = PaginationOptions::new()
         .with_per_page(per_page)
         .with_page(page);
      CountablePagination::from_count_with_options(&opts, total)
   }

   // ─── scenarios ───

   #[test]
   fn ten_pages_has_no_window() {
      let pg = compute(95, 10, 1);
      assert_eq!(pg.pages(), 10);
      assert_eq!(pg.next_page(), 2);
      assert_eq!(pg.previous_page(), 0);
      assert!(pg.range().is_empty());
   }

   #[test]
   fn middle_page_window_is_centered() {
      let pg = compute(250, 10, 15);
      assert_eq!(pg.pages(), 25);
      assert_eq!(pg.next_page(), 16);
      assert_eq!(pg.previous_page(), 14);
      assert_eq!(pg.range(), &[12, 13, 14, 15, 16, 17, 18]);
   }

   #[test]
   fn last_page_window_shifts_left() {
      let pg = compute(250, 10, 25);
      assert_eq!(pg.pages(), 25);
      assert_eq!(pg.next_page(), 0);
      assert_eq!(pg.previous_page(), 24);
      assert_eq!(pg.range(), &[19, 20, 21, 22, 23, 24, 25]);
   }

   #[test]
   fn empty_result_set() {
      let pg = compute(0, 10, 1);
      assert_eq!(pg.total(), 0);
      assert_eq!(pg.pages(), 0);
      assert_eq!(pg.page(), 1);
      assert_eq!(pg.next_page(), 0);
      assert_eq!(pg.previous_page(), 0);
      assert!(pg.range().is_empty());
   }

   #[test]
   fn first_pages_window_starts_at_one() {
      for page in 1..=4 {
         assert_eq!(compute(250, 10, page).range(), &[1, 2, 3, 4, 5, 6, 7]);
      }
      assert_eq!(compute(250, 10, 5).range(), &[2, 3, 4, 5, 6, 7, 8]);
   }

   #[test]
   fn single_page() {
      let pg = compute(7, 10, 1);
      assert_eq!(pg.pages(), 1);
      assert_eq!(pg.next_page(), 0);
      assert_eq!(pg.previous_page(), 0);
   }

   #[test]
   fn eleven_pages_gets_window() {
      let pg = compute(101, 10, 6);
      assert_eq!(pg.pages(), 11);
      assert_eq!(pg.range(), &[3, 4, 5, 6, 7, 8, 9]);
   }

   // ─── clamping ───

   #[test]
   fn zero_page_and_per_page_clamp_to_one() {
      let pg = compute(5, 0, 0);
      assert_eq!(pg.per_page(), 1);
      assert_eq!(pg.page(), 1);
      assert_eq!(pg.pages(), 5);
      assert_eq!(pg.next_page(), 2);
   }

   #[test]
   fn page_past_end_reports_last_page() {
      let pg = compute(250, 10, 40);
      assert_eq!(pg.page(), 25);
      assert_eq!(pg.next_page(), 0);
      assert_eq!(pg.previous_page(), 24);
      assert_eq!(pg.range(), &[19, 20, 21, 22, 23, 24, 25]);

      let pg = compute(0, 10, 3);
      assert_eq!(pg.page(), 1);
      assert_eq!(pg.previous_page(), 0);
   }

   #[test]
   fn window_at_i64_limit() {
      let pg = compute(i64::MAX, 1, i64::MAX);
      assert_eq!(pg.pages(), i64::MAX);
      assert_eq!(pg.page(), i64::MAX);
      assert_eq!(pg.next_page(), 0);
      assert_eq!(pg.previous_page(), i64::MAX - 1);
      assert_eq!(pg.range(), &((i64::MAX - 6)..=i64::MAX).collect::<Vec<_>>()[..]);

      let pg = compute(i64::MAX, 1, i64::MAX - 4);
      assert_eq!(pg.range(), &((i64::MAX - 7)..=(i64::MAX - 1)).collect::<Vec<_>>()[..]);

      let pg = compute(i64::MAX, 1, i64::MAX - 2);
      assert_eq!(pg.range().first(), Some(&(i64::MAX - 6)));
      assert_eq!(pg.range().last(), Some(&i64::MAX));
   }

   #[test]
   fn spill_does_not_change_window() {
      let base = compute(250, 10, 15);
      for spill in [0, 1, 2, 5, 9, 50] {
         let opts = PaginationOptions::new()
            .with_per_page(10)
            .with_page(15)
            .with_spill(spill);
         let pg = CountablePagination::from_count_with_options(&opts, 250);
         assert_eq!(pg.range(), base.range());
      }
   }

   #[test]
   fn from_count_uses_defaults() {
      let pg = CountablePagination::from_count(42);
      assert_eq!(pg.per_page(), 10);
      assert_eq!(pg.page(), 1);
      assert_eq!(pg.pages(), 5);
      assert_eq!(pg.next_page(), 2);
   }

   // ─── properties ───

   #[test]
   fn pages_is_ceiling_division() {
      for per_page in 1..=12 {
         for total in 0..=300 {
            let expected = (total + per_page - 1) / per_page;
            assert_eq!(pages_for_count(per_page, total), expected);
         }
      }
   }

   #[test]
   fn neighbours_and_window_hold_for_all_pages() {
      for total in [0, 1, 9, 10, 11, 99, 100, 101, 110, 111, 250, 1_000] {
         for per_page in [1, 3, 10, 25] {
            let pages = pages_for_count(per_page, total);
            for page in 1..=pages.max(1) {
               let pg = compute(total, per_page, page);

               assert_eq!(pg.previous_page() == 0, page == 1 || pages <= 1);
               assert_eq!(pg.next_page() == 0, page >= pages || pages <= 1);
               if pg.previous_page() != 0 {
                  assert_eq!(pg.previous_page(), page - 1);
               }
               if pg.next_page() != 0 {
                  assert_eq!(pg.next_page(), page + 1);
               }

               let range = pg.range();
               if pages <= WINDOW_THRESHOLD {
                  assert!(range.is_empty());
                  continue;
               }

               assert_eq!(range.len() as i64, WINDOW_WIDTH.min(pages));
               assert!(range.windows(2).all(|w| w[1] == w[0] + 1));
               assert!(range[0] >= 1);
               assert!(*range.last().unwrap() <= pages);
               assert!(range.contains(&page));
            }
         }
      }
   }

   // ─── urls ───

   #[test]
   fn next_url_replaces_page_parameter() {
      let base = Url::parse("https://example.com/posts?sort=asc&page=3").unwrap();
      let pg = compute(100, 10, 3);
      assert_eq!(pg.next_url(&base), "https://example.com/posts?sort=asc&page=4");
      assert_eq!(
         pg.previous_url(&base),
         "https://example.com/posts?sort=asc&page=2"
      );
   }

   #[test]
   fn next_url_adds_page_parameter() {
      let base = Url::parse("https://example.com/posts").unwrap();
      let pg = compute(100, 10, 1);
      assert_eq!(pg.next_url(&base), "https://example.com/posts?page=2");
   }

   #[test]
   fn missing_neighbour_url_is_hash() {
      let base = Url::parse("https://example.com/posts?page=1").unwrap();
      let first = compute(100, 10, 1);
      assert_eq!(first.previous_url(&base), "#");

      let last = compute(100, 10, 10);
      assert_eq!(last.next_url(&base), "#");
   }

   // ─── serde ───

   #[test]
   fn serializes_camel_case() {
      let json = serde_json::to_value(compute(95, 10, 2)).unwrap();
      assert_eq!(
         json,
         serde_json::json!({
            "total": 95,
            "perPage": 10,
            "page": 2,
            "pages": 10,
            "nextPage": 3,
            "previousPage": 1,
            "range": []
         })
      );
   }
}
