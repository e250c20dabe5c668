//! PostgREST rendering of query descriptors.
//!
//! The hosted store exposes tables under `/rest/v1/<table>` and takes filters
//! as query parameters (`price=gte.10`). Counts are requested with
//! `Prefer: count=exact` and an empty page; the total comes back in the
//! `Content-Range` header.

use crate::infrastructure::encoding::encode_filter_value;
use crate::query::builder::{CountQuery, PageQuery, Predicates};

const REST_PREFIX: &str = "/rest/v1";

/// A rendered REST call: path, ordered query parameters and extra headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RestRequest {
    /// Encoded query string without the leading `?`.
    ///
    /// `*` is left as-is since it is the `ilike` wildcard.
    #[must_use]
    pub fn query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{k}={}", encode_filter_value(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Path plus query string.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}?{}", self.path, self.query_string())
    }
}

/// Renders a count query.
///
/// # Example
///
/// ```rust
/// use listagain::app::filters::FilterState;
/// use listagain::query::{postgrest, QueryPair};
///
/// let pair = QueryPair::from_filter(&FilterState::default(), 9);
/// let req = postgrest::count_request(&pair.count);
/// assert_eq!(
///     req.query_string(),
///     "select=id&status=eq.available&price=gte.0&price=lte.1000&limit=0"
/// );
/// ```
#[must_use]
pub fn count_request(query: &CountQuery) -> RestRequest {
    let mut params = vec![("select".to_string(), "id".to_string())];
    push_filters(&mut params, &query.predicates);
    params.push(("limit".to_string(), "0".to_string()));

    RestRequest {
        path: format!("{REST_PREFIX}/{}", query.table),
        params,
        headers: vec![("Prefer".to_string(), "count=exact".to_string())],
    }
}

/// Renders a page query.
#[must_use]
pub fn page_request(query: &PageQuery) -> RestRequest {
    let mut params = vec![("select".to_string(), "*".to_string())];
    push_filters(&mut params, &query.predicates);
    params.push(("order".to_string(), query.order_by.as_wire()));
    params.push(("offset".to_string(), query.offset.to_string()));
    params.push(("limit".to_string(), query.limit.to_string()));

    RestRequest {
        path: format!("{REST_PREFIX}/{}", query.table),
        params,
        headers: Vec::new(),
    }
}

fn push_filters(params: &mut Vec<(String, String)>, predicates: &Predicates) {
    params.push(("status".to_string(), format!("eq.{}", predicates.status)));
    params.push(("price".to_string(), format!("gte.{}", predicates.min_price)));
    params.push(("price".to_string(), format!("lte.{}", predicates.max_price)));
    if let Some(needle) = &predicates.title_contains {
        params.push(("title".to_string(), format!("ilike.*{}*", escape_like(needle))));
    }
    if let Some(id) = predicates.category_id {
        params.push(("category_id".to_string(), format!("eq.{id}")));
    }
    if let Some(condition) = predicates.condition {
        params.push(("condition".to_string(), format!("eq.{condition}")));
    }
}

/// Escapes LIKE metacharacters so user text matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '*' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::filters::{ConditionFilter, FilterState, SortKey};
    use crate::domain::Condition;
    use crate::query::QueryPair;

    #[test]
    fn renders_lamp_page_two() {
        let mut f = FilterState::default();
        f.set_search("lamp");
        f.set_page(2);
        let pair = QueryPair::from_filter(&f, 9);
        let req = page_request(&pair.page);
        assert_eq!(req.path, "/rest/v1/products");
        assert_eq!(
            req.query_string(),
            "select=*&status=eq.available&price=gte.0&price=lte.1000&title=ilike.*lamp*&order=created_at.desc&offset=9&limit=9"
        );
        assert!(req.headers.is_empty());
    }

    #[test]
    fn count_carries_prefer_header_and_same_filters() {
        let mut f = FilterState::default();
        f.set_condition(ConditionFilter::Only(Condition::LikeNew));
        f.set_sort(SortKey::PriceDesc);
        let pair = QueryPair::from_filter(&f, 9);

        let count = count_request(&pair.count);
        let page = page_request(&pair.page);
        assert_eq!(count.headers, vec![("Prefer".to_string(), "count=exact".to_string())]);

        let filters = |r: &RestRequest| -> Vec<(String, String)> {
            r.params
                .iter()
                .filter(|(k, _)| !matches!(k.as_str(), "select" | "order" | "offset" | "limit"))
                .cloned()
                .collect()
        };
        assert_eq!(filters(&count), filters(&page));
        assert!(page.url().contains("condition=eq.like-new"));
        assert!(page.url().contains("order=price.desc"));
    }

    #[test]
    fn search_text_is_escaped_and_encoded() {
        let mut f = FilterState::default();
        f.set_search("50% off_desk & chair");
        let pair = QueryPair::from_filter(&f, 9);
        let qs = page_request(&pair.page).query_string();
        assert!(qs.contains("title=ilike.*50%5C%25%20off%5C_desk%20%26%20chair*"));
    }
}
