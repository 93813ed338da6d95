use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
/// Highest page whose offset still fits in an `i64` at any allowed page size.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Raw list query. Numbers are kept as strings so that `?page=abc` falls back
/// to the default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub descending: bool,
}

/// Validated page window handed to the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok()).filter(|v| *v >= 1)
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        parse_positive(self.page.as_deref())
            .map(|p| p.min(MAX_PAGE))
            .unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        parse_positive(self.limit.as_deref())
            .map(|l| l.min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT)
    }

    /// Resolves `sortBy` against the columns a collection allows.
    pub fn sort(&self, allowed: &[&'static str]) -> Result<Option<Sort>, AppError> {
        let Some(field) = self.sort_by.as_deref().map(str::trim).filter(|f| !f.is_empty()) else {
            return Ok(None);
        };
        let column = allowed
            .iter()
            .copied()
            .find(|c| *c == field)
            .ok_or_else(|| AppError::BadRequest(format!("Champ de tri invalide: {field}")))?;
        let descending = self
            .order
            .as_deref()
            .map(|o| o.eq_ignore_ascii_case("desc"))
            .unwrap_or(false);
        Ok(Some(Sort { column, descending }))
    }

    /// Caller-sized page (`limit` honoured).
    pub fn request(&self, allowed: &[&'static str]) -> Result<PageRequest, AppError> {
        Ok(PageRequest {
            page: self.page(),
            per_page: self.limit(),
            sort: self.sort(allowed)?,
        })
    }

    /// Page with a size fixed by the collection; `limit` and sorting are ignored.
    pub fn fixed(&self, per_page: i64) -> PageRequest {
        PageRequest {
            page: self.page(),
            per_page,
            sort: None,
        }
    }
}

pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 0;
    }
    (total + per_page - 1) / per_page
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub prev: Option<String>,
}

impl PageMeta {
    pub fn new(req: &PageRequest, total: i64) -> Self {
        Self {
            current_page: req.page,
            per_page: req.per_page,
            total,
            total_pages: total_pages(total, req.per_page),
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page.saturating_mul(self.per_page) < self.total
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn links(&self) -> PageLinks {
        PageLinks {
            next: self
                .has_next()
                .then(|| format!("?page={}", self.current_page.saturating_add(1))),
            prev: self
                .has_prev()
                .then(|| format!("?page={}", self.current_page - 1)),
        }
    }
}

/// `{data, page, totalPages, total}` body shared by the caller-sized lists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
}

impl<T> Paged<T> {
    pub fn new(data: Vec<T>, req: &PageRequest, total: i64) -> Self {
        Self {
            data,
            page: req.page,
            total_pages: total_pages(total, req.per_page),
            total,
        }
    }
}
