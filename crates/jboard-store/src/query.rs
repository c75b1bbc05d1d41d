//! Job listing query builder: filter, sort and pagination.

use bson::oid::ObjectId;
use bson::{doc, Document, Regex};

/// Filter value that disables the corresponding equality clause.
const ANY: &str = "all";

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Filter parameters for job listings.
///
/// `status` and `job_type` are passed through as raw strings: `"all"` (or
/// absence) matches everything, any other literal becomes an equality match
/// and simply selects nothing when it names no stored value.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Case-insensitive substring, matched against position, company and
    /// location. Treated literally; regex metacharacters are escaped.
    pub search: Option<String>,
    pub status: Option<String>,
    pub job_type: Option<String>,
    /// Restrict to postings owned by this company user.
    pub created_by: Option<ObjectId>,
}

impl JobFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = doc! {};
        if let Some(owner) = self.created_by {
            filter.insert("createdBy", owner);
        }
        if let Some(status) = self.status.as_deref() {
            if status != ANY {
                filter.insert("status", status);
            }
        }
        if let Some(job_type) = self.job_type.as_deref() {
            if job_type != ANY {
                filter.insert("type", job_type);
            }
        }
        if let Some(search) = self.search.as_deref() {
            if !search.is_empty() {
                let fields = ["position", "company", "location"];
                let clauses: Vec<Document> = fields
                    .iter()
                    .map(|field| doc! { *field: contains(search) })
                    .collect();
                filter.insert("$or", clauses);
            }
        }
        filter
    }
}

fn contains(needle: &str) -> Regex {
    Regex {
        pattern: regex::escape(needle),
        options: "i".to_string(),
    }
}

/// Supported sort orders for job listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Latest,
    Oldest,
    PositionAsc,
    PositionDesc,
}

impl SortKey {
    /// Unrecognized or absent keys mean no explicit sort.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw? {
            "latest" => Some(SortKey::Latest),
            "oldest" => Some(SortKey::Oldest),
            "a-z" => Some(SortKey::PositionAsc),
            "z-a" => Some(SortKey::PositionDesc),
            _ => None,
        }
    }

    pub fn to_document(&self) -> Document {
        match self {
            SortKey::Latest => doc! { "createdAt": -1 },
            SortKey::Oldest => doc! { "createdAt": 1 },
            SortKey::PositionAsc => doc! { "position": 1 },
            SortKey::PositionDesc => doc! { "position": -1 },
        }
    }
}

/// Requested page, already coerced to sane values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    /// Coerce raw query parameters. Absent, non-numeric or zero values fall
    /// back to the defaults (page 1, size 10).
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            number: coerce(page, DEFAULT_PAGE),
            size: coerce(limit, DEFAULT_PAGE_SIZE),
        }
    }

    /// Saturating: an absurdly large page number lands past the collection
    /// and yields an empty page instead of wrapping.
    pub fn skip(&self) -> u64 {
        (self.number - 1).saturating_mul(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.size).unwrap_or(i64::MAX)
    }
}

fn coerce(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(default)
}

/// Pagination summary returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
}

impl PageInfo {
    /// `total_pages` rounds up; an empty result set has zero pages.
    pub fn new(total: u64, page: &Page) -> Self {
        Self {
            total,
            current_page: page.number,
            total_pages: total.div_ceil(page.size),
            page_size: page.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_everything() {
        assert_eq!(JobFilter::default().to_document(), doc! {});
    }

    #[test]
    fn all_sentinel_skips_equality_clauses() {
        let filter = JobFilter {
            status: Some("all".to_string()),
            job_type: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.to_document(), doc! {});
    }

    #[test]
    fn status_and_type_pass_through() {
        let filter = JobFilter {
            status: Some("interview".to_string()),
            job_type: Some("remote".to_string()),
            ..Default::default()
        };
        let document = filter.to_document();
        assert_eq!(document.get_str("status").unwrap(), "interview");
        assert_eq!(document.get_str("type").unwrap(), "remote");
    }

    #[test]
    fn search_builds_case_insensitive_or() {
        let filter = JobFilter {
            search: Some("engineer".to_string()),
            ..Default::default()
        };
        let document = filter.to_document();
        let clauses = document.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 3);
        let first = clauses[0].as_document().unwrap();
        let regex = match first.get("position").unwrap() {
            bson::Bson::RegularExpression(r) => r,
            other => panic!("expected regex, got {other:?}"),
        };
        assert_eq!(regex.pattern, "engineer");
        assert_eq!(regex.options, "i");
    }

    #[test]
    fn search_escapes_regex_metacharacters() {
        let filter = JobFilter {
            search: Some("c++ (senior)".to_string()),
            ..Default::default()
        };
        let document = filter.to_document();
        let clauses = document.get_array("$or").unwrap();
        let first = clauses[0].as_document().unwrap();
        let regex = match first.get("position").unwrap() {
            bson::Bson::RegularExpression(r) => r,
            other => panic!("expected regex, got {other:?}"),
        };
        assert_eq!(regex.pattern, r"c\+\+ \(senior\)");
    }

    #[test]
    fn empty_search_adds_no_clause() {
        let filter = JobFilter {
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter.to_document(), doc! {});
    }

    #[test]
    fn owner_scoping_adds_created_by() {
        let owner = ObjectId::new();
        let filter = JobFilter {
            created_by: Some(owner),
            ..Default::default()
        };
        let document = filter.to_document();
        assert_eq!(document.get_object_id("createdBy").unwrap(), owner);
    }

    #[test]
    fn sort_keys_parse() {
        assert_eq!(SortKey::parse(Some("latest")), Some(SortKey::Latest));
        assert_eq!(SortKey::parse(Some("oldest")), Some(SortKey::Oldest));
        assert_eq!(SortKey::parse(Some("a-z")), Some(SortKey::PositionAsc));
        assert_eq!(SortKey::parse(Some("z-a")), Some(SortKey::PositionDesc));
        assert_eq!(SortKey::parse(Some("salary")), None);
        assert_eq!(SortKey::parse(None), None);
    }

    #[test]
    fn sort_documents() {
        assert_eq!(SortKey::Latest.to_document(), doc! { "createdAt": -1 });
        assert_eq!(SortKey::PositionDesc.to_document(), doc! { "position": -1 });
    }

    #[test]
    fn page_defaults() {
        let page = Page::from_params(None, None);
        assert_eq!(page.number, 1);
        assert_eq!(page.size, 10);
        assert_eq!(page.skip(), 0);
    }

    #[test]
    fn page_coerces_garbage_to_defaults() {
        let page = Page::from_params(Some("abc"), Some("0"));
        assert_eq!(page.number, 1);
        assert_eq!(page.size, 10);
    }

    #[test]
    fn huge_page_number_saturates_instead_of_overflowing() {
        let page = Page::from_params(Some("18446744073709551615"), Some("10"));
        assert_eq!(page.number, u64::MAX);
        assert_eq!(page.skip(), u64::MAX);
    }

    #[test]
    fn huge_limit_clamps_to_i64() {
        let page = Page::from_params(Some("2"), Some("18446744073709551615"));
        assert_eq!(page.limit(), i64::MAX);
        assert_eq!(page.skip(), u64::MAX);
    }

    #[test]
    fn page_skip_math() {
        let page = Page::from_params(Some("2"), Some("5"));
        assert_eq!(page.skip(), 5);
        assert_eq!(page.limit(), 5);
    }

    #[test]
    fn total_pages_round_up() {
        let page = Page::from_params(Some("2"), Some("5"));
        let info = PageInfo::new(12, &page);
        assert_eq!(info.total, 12);
        assert_eq!(info.current_page, 2);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.page_size, 5);
    }

    #[test]
    fn zero_results_mean_zero_pages() {
        let info = PageInfo::new(0, &Page::default());
        assert_eq!(info.total_pages, 0);
    }
}
