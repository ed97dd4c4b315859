//! URL joining and query strings.

use serde::Serialize;

use crate::error::HttpError;

/// Flat, ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from any flat serializable value, e.g. a struct of
    /// scalars or a map.
    pub fn from_serialize<T: Serialize + ?Sized>(params: &T) -> Result<Self, HttpError> {
        let encoded = serde_urlencoded::to_string(params).map_err(HttpError::Query)?;
        Ok(url::form_urlencoded::parse(encoded.as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect())
    }

    /// Append a pair.
    pub fn pair(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((name.into(), value.to_string()));
        self
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a pair named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Whether there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// All pairs in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Add every pair from `other` whose name is not already present.
    pub fn fill_missing(&mut self, other: QueryParams) {
        for (name, value) in other.pairs {
            if !self.contains(&name) {
                self.pairs.push((name, value));
            }
        }
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for QueryParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Join `base` and `path` with exactly one slash, then append the encoded
/// query when one is given.
///
/// At most one trailing slash is removed from `base` and at most one leading
/// slash from `path`. Inputs are not validated.
///
/// ```
/// use beam_client::{build_address, QueryParams};
///
/// assert_eq!(build_address("https://x/api/", "/foo", None), "https://x/api/foo");
///
/// let query = QueryParams::from([("a", "1"), ("b", "x")]);
/// assert_eq!(
///     build_address("https://x/api", "foo", Some(&query)),
///     "https://x/api/foo?a=1&b=x"
/// );
/// ```
pub fn build_address(base: &str, path: &str, query: Option<&QueryParams>) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.strip_prefix('/').unwrap_or(path);

    let mut url = format!("{}/{}", base, path);

    if let Some(query) = query {
        url.push('?');
        url.push_str(&query.encode());
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use test_case::test_case;

    #[test_case("https://x/api", "/foo" ; "leading slash on path")]
    #[test_case("https://x/api/", "foo" ; "trailing slash on base")]
    #[test_case("https://x/api/", "/foo" ; "both slashes")]
    #[test_case("https://x/api", "foo" ; "no slashes")]
    fn test_build_address_single_slash(base: &str, path: &str) {
        assert_eq!(build_address(base, path, None), "https://x/api/foo");
    }

    #[test]
    fn test_build_address_strips_only_one_slash() {
        assert_eq!(build_address("https://x/api//", "//foo", None), "https://x/api///foo");
    }

    #[test]
    fn test_build_address_with_query() {
        let query: QueryParams = [("a", "1"), ("b", "x")].into();
        assert_eq!(
            build_address("https://x/api", "/foo", Some(&query)),
            "https://x/api/foo?a=1&b=x"
        );
    }

    #[test]
    fn test_build_address_encodes_query() {
        let query = QueryParams::new().pair("q", "a b&c").pair("n", 5);
        assert_eq!(
            build_address("https://x/api", "search", Some(&query)),
            "https://x/api/search?q=a+b%26c&n=5"
        );
    }

    #[test]
    fn test_build_address_empty_query_keeps_separator() {
        assert_eq!(
            build_address("https://x/api", "foo", Some(&QueryParams::new())),
            "https://x/api/foo?"
        );
    }

    #[test]
    fn test_query_from_serialize() {
        #[derive(Serialize)]
        struct Page {
            page: u32,
            limit: u32,
        }

        let query = QueryParams::from_serialize(&Page { page: 2, limit: 50 }).unwrap();
        assert_eq!(query.get("page"), Some("2"));
        assert_eq!(query.get("limit"), Some("50"));
        assert_eq!(query.encode(), "page=2&limit=50");
    }

    #[test]
    fn test_query_from_nested_value_fails() {
        let nested = serde_json::json!({ "a": { "b": 1 } });
        assert!(matches!(
            QueryParams::from_serialize(&nested),
            Err(HttpError::Query(_))
        ));
    }

    #[test]
    fn test_query_fill_missing() {
        let mut query = QueryParams::from([("page", "1")]);
        query.fill_missing(QueryParams::from([("page", "9"), ("limit", "10")]));
        assert_eq!(query.encode(), "page=1&limit=10");
    }
}
