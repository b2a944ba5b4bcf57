//! Query parameter parsing for the CRUD endpoints.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::request::Parts;
use serde::Deserialize;

use crate::store::ListFilter;

/// Default page number.
pub const DEFAULT_PAGE: f64 = 1.0;

/// Default rows per page.
pub const DEFAULT_ROW: u64 = 5;

/// `GET /crud-operations?_id&text`. `id` is accepted as an alias of `_id`.
#[derive(Debug, Default, Deserialize)]
pub struct DocumentListQuery {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "id")]
    pub id_alias: Option<String>,
    pub text: Option<String>,
}

impl DocumentListQuery {
    pub fn into_filter(self) -> ListFilter {
        ListFilter {
            id: non_empty(self.id).or_else(|| non_empty(self.id_alias)),
            text: non_empty(self.text),
        }
    }
}

/// `GET /crud-operations/relational?id&text`.
#[derive(Debug, Default, Deserialize)]
pub struct RelationalListQuery {
    pub id: Option<String>,
    pub text: Option<String>,
}

impl RelationalListQuery {
    pub fn into_filter(self) -> ListFilter {
        ListFilter {
            id: non_empty(self.id),
            text: non_empty(self.text),
        }
    }
}

/// Raw `page` / `row` query values, kept as strings so bad input falls back
/// to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub row: Option<String>,
}

/// Coerced pagination request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    /// Requested page, 1-based. A fractional value matches no page.
    pub page: f64,
    /// Rows per page, at least 1.
    pub row: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            row: DEFAULT_ROW,
        }
    }
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        let page = coerce_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let row = coerce_positive(query.row.as_deref())
            .map(f64::trunc)
            .filter(|row| *row >= 1.0)
            .map(|row| row as u64)
            .unwrap_or(DEFAULT_ROW);

        Self { page, row }
    }
}

/// Parse a positive finite number. Empty, malformed, zero, negative and
/// non-finite input yield `None`.
fn coerce_positive(raw: Option<&str>) -> Option<f64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n > 0.0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Target record of an update or delete.
///
/// Taken from the `{id}` capture when the route has one. Static routes
/// that also accept updates and deletes (`/count`, `/pagination`) use their
/// last path segment, which matches no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordId(pub String);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let captured = RawPathParams::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|params| params.iter().next().map(|(_, value)| value.to_string()));

        let id = captured.unwrap_or_else(|| {
            parts
                .uri
                .path()
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        });
        Ok(Self(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::routing::put;
    use axum::Router;
    use tower::ServiceExt;

    async fn record_id_for(uri: &str) -> String {
        let app = Router::new()
            .route("/{id}", put(|RecordId(id): RecordId| async move { id }))
            .route("/count", put(|RecordId(id): RecordId| async move { id }));

        let response = app
            .oneshot(Request::put(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_record_id_from_capture_or_segment() {
        assert_eq!(record_id_for("/abc123").await, "abc123");
        assert_eq!(record_id_for("/count").await, "count");
    }

    fn request(page: Option<&str>, row: Option<&str>) -> PageRequest {
        PageRequest::from(PageQuery {
            page: page.map(String::from),
            row: row.map(String::from),
        })
    }

    #[test]
    fn test_defaults_when_missing() {
        assert_eq!(request(None, None), PageRequest::default());
    }

    #[test]
    fn test_invalid_input_falls_back() {
        for bad in ["", "abc", "0", "-3", "NaN", "inf"] {
            assert_eq!(request(Some(bad), Some(bad)), PageRequest::default(), "input {bad:?}");
        }
    }

    #[test]
    fn test_valid_numbers() {
        assert_eq!(request(Some(" 3 "), Some("10")), PageRequest { page: 3.0, row: 10 });
        assert_eq!(request(Some("2"), Some("2.9")), PageRequest { page: 2.0, row: 2 });
        assert_eq!(request(Some("1.5"), Some("0.5")), PageRequest { page: 1.5, row: 5 });
    }

    #[test]
    fn test_document_filter_alias_and_empties() {
        let query = DocumentListQuery {
            id: Some(String::new()),
            id_alias: Some("abc".into()),
            text: Some(String::new()),
        };
        assert_eq!(query.into_filter(), ListFilter::by_id("abc"));

        let query = DocumentListQuery {
            id: Some("primary".into()),
            id_alias: Some("alias".into()),
            text: Some("milk".into()),
        };
        let filter = query.into_filter();
        assert_eq!(filter.id.as_deref(), Some("primary"));
        assert_eq!(filter.text.as_deref(), Some("milk"));
    }

    #[test]
    fn test_relational_filter() {
        let filter = RelationalListQuery { id: Some("4".into()), text: None }.into_filter();
        assert_eq!(filter, ListFilter::by_id("4"));
        assert!(RelationalListQuery::default().into_filter().is_empty());
    }
}
