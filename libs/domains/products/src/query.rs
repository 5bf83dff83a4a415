//! Catalog query builder.
//!
//! Turns raw route parameters (business line, `"<low>-<high>"` price range,
//! free-text term and the `from` page index) into a typed [`CatalogQuery`].
//! Parsing happens here so malformed input is rejected before any store call.
//! A query renders to a MongoDB filter with [`CatalogQuery::filter_document`]
//! and can be evaluated in memory with [`CatalogQuery::matches`]; both agree.

use mongodb::bson::{Document, doc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::models::Product;

/// Records per catalog page.
pub const PAGE_SIZE: u64 = 11;

/// Fields searched by free-text queries.
pub const SEARCH_FIELDS: [&str; 4] = ["name", "businessLine", "model", "description"];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogQueryError {
    #[error("Invalid page index '{0}': expected a non-negative integer")]
    InvalidPage(String),

    #[error("Invalid price range '{input}': {reason}")]
    InvalidPriceRange { input: String, reason: &'static str },

    #[error("Search term must not be blank")]
    EmptyTerm,
}

/// Zero-based page index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page(u64);

impl Page {
    /// Parse the `from` query parameter.
    ///
    /// Absent, empty and `"0"` all mean the first page. Anything that is not
    /// a non-negative integer, or whose offset would not fit the store's
    /// signed 64-bit skip, is rejected.
    pub fn parse(raw: Option<&str>) -> Result<Self, CatalogQueryError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Ok(Self(0));
        }

        let invalid = || CatalogQueryError::InvalidPage(raw.to_string());
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let index: u64 = raw.parse().map_err(|_| invalid())?;
        index
            .checked_mul(PAGE_SIZE)
            .filter(|skip| *skip <= i64::MAX as u64)
            .ok_or_else(invalid)?;

        Ok(Self(index))
    }

    pub fn index(&self) -> u64 {
        self.0
    }

    /// Records to skip: `index * PAGE_SIZE`.
    pub fn skip(&self) -> u64 {
        self.0 * PAGE_SIZE
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE as i64
    }
}

/// Number of pages needed for `total` matching records.
pub fn page_count(total: u64) -> u64 {
    total.div_ceil(PAGE_SIZE)
}

/// Inclusive price bounds parsed from `"<low>-<high>"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }
}

impl FromStr for PriceRange {
    type Err = CatalogQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| CatalogQueryError::InvalidPriceRange {
            input: s.to_string(),
            reason,
        };

        let (low, high) = s
            .split_once('-')
            .ok_or_else(|| invalid("expected '<low>-<high>'"))?;
        if high.contains('-') {
            return Err(invalid("expected exactly one '-'"));
        }

        let bound = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid("bounds must be finite numbers"))
        };
        let (low, high) = (bound(low)?, bound(high)?);

        if low < 0.0 || high < 0.0 {
            return Err(invalid("bounds must not be negative"));
        }
        if low > high {
            return Err(invalid("lower bound exceeds upper bound"));
        }

        Ok(Self { low, high })
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogFilter {
    /// Listing, optionally narrowed by business line and/or price.
    Listing {
        business_line: Option<String>,
        price: Option<PriceRange>,
    },
    /// Free-text match on any of [`SEARCH_FIELDS`].
    Search { term: String },
}

/// A validated catalog request: what to match and which page to return.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub filter: CatalogFilter,
    pub page: Page,
}

impl CatalogQuery {
    /// Build a listing query from the optional route segments.
    pub fn listing(
        business_line: Option<&str>,
        price: Option<&str>,
        from: Option<&str>,
    ) -> Result<Self, CatalogQueryError> {
        let business_line = business_line.map(non_blank).transpose()?;
        let price = price.map(str::parse::<PriceRange>).transpose()?;
        let page = Page::parse(from)?;

        Ok(Self {
            filter: CatalogFilter::Listing {
                business_line,
                price,
            },
            page,
        })
    }

    /// Build a free-text search query.
    pub fn search(term: &str, from: Option<&str>) -> Result<Self, CatalogQueryError> {
        let term = non_blank(term)?;
        let page = Page::parse(from)?;

        Ok(Self {
            filter: CatalogFilter::Search { term },
            page,
        })
    }

    /// MongoDB filter selecting the matching products.
    ///
    /// Text terms are matched literally and case-insensitively anywhere in
    /// the field.
    pub fn filter_document(&self) -> Document {
        match &self.filter {
            CatalogFilter::Listing {
                business_line,
                price,
            } => {
                let mut filter = doc! {};
                if let Some(line) = business_line {
                    filter.insert("businessLine", substring_regex(line));
                }
                if let Some(range) = price {
                    filter.insert("price", doc! { "$gte": range.low, "$lte": range.high });
                }
                filter
            }
            CatalogFilter::Search { term } => {
                let clauses: Vec<Document> = SEARCH_FIELDS
                    .iter()
                    .map(|field| {
                        let mut clause = Document::new();
                        clause.insert(*field, substring_regex(term));
                        clause
                    })
                    .collect();
                doc! { "$or": clauses }
            }
        }
    }

    /// In-memory evaluation of [`Self::filter_document`].
    pub fn matches(&self, product: &Product) -> bool {
        match &self.filter {
            CatalogFilter::Listing {
                business_line,
                price,
            } => {
                business_line
                    .as_deref()
                    .is_none_or(|line| contains_ignore_case(&product.business_line, line))
                    && price.is_none_or(|range| range.contains(product.price))
            }
            CatalogFilter::Search { term } => [
                Some(product.name.as_str()),
                Some(product.business_line.as_str()),
                product.model.as_deref(),
                Some(product.description.as_str()),
            ]
            .into_iter()
            .flatten()
            .any(|field| contains_ignore_case(field, term)),
        }
    }
}

fn non_blank(raw: &str) -> Result<String, CatalogQueryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogQueryError::EmptyTerm);
    }
    Ok(trimmed.to_string())
}

fn substring_regex(term: &str) -> Document {
    doc! { "$regex": regex::escape(term), "$options": "i" }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateProduct, Product};

    fn product(name: &str, line: &str, price: f64) -> Product {
        Product::new(CreateProduct {
            name: name.into(),
            business_line: line.into(),
            price,
            ..CreateProduct::default()
        })
    }

    mod page {
        use super::*;

        #[test]
        fn test_absent_empty_and_zero_are_first_page() {
            for raw in [None, Some(""), Some("0"), Some("  ")] {
                let page = Page::parse(raw).unwrap();
                assert_eq!(page.skip(), 0);
                assert_eq!(page.limit(), 11);
            }
        }

        #[test]
        fn test_skip_is_index_times_page_size() {
            assert_eq!(Page::parse(Some("1")).unwrap().skip(), 11);
            assert_eq!(Page::parse(Some("7")).unwrap().skip(), 77);
        }

        #[test]
        fn test_rejects_negative_fractional_and_garbage() {
            for raw in ["-1", "+1", "+0", "1.5", "two", "0x10", "1_000"] {
                assert_eq!(
                    Page::parse(Some(raw)),
                    Err(CatalogQueryError::InvalidPage(raw.to_string()))
                );
            }
        }

        #[test]
        fn test_rejects_overflowing_offset() {
            let huge = (u64::MAX / 2).to_string();
            assert!(Page::parse(Some(&huge)).is_err());

            let max_ok = (i64::MAX as u64 / PAGE_SIZE).to_string();
            assert!(Page::parse(Some(&max_ok)).is_ok());
        }

        #[test]
        fn test_page_count_rounds_up() {
            assert_eq!(page_count(0), 0);
            assert_eq!(page_count(1), 1);
            assert_eq!(page_count(11), 1);
            assert_eq!(page_count(12), 2);
            assert_eq!(page_count(22), 2);
            assert_eq!(page_count(23), 3);
        }
    }

    mod price_range {
        use super::*;

        #[test]
        fn test_bounds_are_inclusive() {
            let range: PriceRange = "10-50".parse().unwrap();
            assert!(range.contains(10.0));
            assert!(range.contains(50.0));
            assert!(range.contains(27.5));
            assert!(!range.contains(9.0));
            assert!(!range.contains(51.0));
        }

        #[test]
        fn test_accepts_decimals_and_equal_bounds() {
            assert_eq!(
                "0.5-12.75".parse::<PriceRange>().unwrap(),
                PriceRange { low: 0.5, high: 12.75 }
            );
            assert!("20-20".parse::<PriceRange>().unwrap().contains(20.0));
        }

        #[test]
        fn test_rejects_malformed_ranges() {
            for raw in ["10", "10-20-30", "-10", "10-", "a-b", "inf-5", "1-NaN", "50-10"] {
                assert!(
                    matches!(
                        raw.parse::<PriceRange>(),
                        Err(CatalogQueryError::InvalidPriceRange { .. })
                    ),
                    "{raw} should be rejected"
                );
            }
        }
    }

    mod filter_document {
        use super::*;

        #[test]
        fn test_unfiltered_listing_matches_everything() {
            let query = CatalogQuery::listing(None, None, None).unwrap();
            assert!(query.filter_document().is_empty());
        }

        #[test]
        fn test_business_line_is_escaped_case_insensitive_regex() {
            let query = CatalogQuery::listing(Some("acid (conc.)"), None, None).unwrap();
            let filter = query.filter_document();
            let line = filter.get_document("businessLine").unwrap();

            assert_eq!(line.get_str("$regex").unwrap(), r"acid \(conc\.\)");
            assert_eq!(line.get_str("$options").unwrap(), "i");
        }

        #[test]
        fn test_price_range_renders_gte_lte() {
            let query = CatalogQuery::listing(None, Some("10-50"), None).unwrap();
            let filter = query.filter_document();
            let price = filter.get_document("price").unwrap();

            assert_eq!(price.get_f64("$gte").unwrap(), 10.0);
            assert_eq!(price.get_f64("$lte").unwrap(), 50.0);
        }

        #[test]
        fn test_search_is_disjunction_over_four_fields() {
            let query = CatalogQuery::search("sol", Some("2")).unwrap();
            let filter = query.filter_document();
            let clauses = filter.get_array("$or").unwrap();

            assert_eq!(clauses.len(), SEARCH_FIELDS.len());
            assert_eq!(query.page.skip(), 22);
        }
    }

    mod matching {
        use super::*;

        #[test]
        fn test_business_line_is_case_insensitive_substring() {
            let query = CatalogQuery::listing(Some("acid"), None, None).unwrap();
            assert!(query.matches(&product("HCl", "Acids", 5.0)));
            assert!(!query.matches(&product("Acetone", "Solvents", 5.0)));
        }

        #[test]
        fn test_combined_filters_must_all_hold() {
            let query = CatalogQuery::listing(Some("solv"), Some("10-50"), None).unwrap();
            assert!(query.matches(&product("Xylene", "Solvents", 10.0)));
            assert!(!query.matches(&product("Xylene", "Solvents", 51.0)));
            assert!(!query.matches(&product("Bleach", "Cleaning", 20.0)));
        }

        #[test]
        fn test_search_checks_model_and_description() {
            let mut p = product("Degreaser", "Cleaning", 5.0);
            p.model = Some("DX-9".into());
            p.description = "Removes heavy grease".into();

            assert!(CatalogQuery::search("dx-9", None).unwrap().matches(&p));
            assert!(CatalogQuery::search("GREASE", None).unwrap().matches(&p));
            assert!(!CatalogQuery::search("acid", None).unwrap().matches(&p));
        }

        #[test]
        fn test_regex_metacharacters_match_literally() {
            let query = CatalogQuery::listing(Some("a.c"), None, None).unwrap();
            assert!(!query.matches(&product("x", "abc", 1.0)));
            assert!(query.matches(&product("x", "A.C grade", 1.0)));
        }
    }

    #[test]
    fn test_blank_terms_are_rejected() {
        assert_eq!(
            CatalogQuery::search("   ", None),
            Err(CatalogQueryError::EmptyTerm)
        );
        assert_eq!(
            CatalogQuery::listing(Some(""), None, None),
            Err(CatalogQueryError::EmptyTerm)
        );
    }

    #[test]
    fn test_bad_page_fails_whole_query() {
        assert!(matches!(
            CatalogQuery::listing(Some("Acids"), Some("1-2"), Some("-3")),
            Err(CatalogQueryError::InvalidPage(_))
        ));
    }
}
