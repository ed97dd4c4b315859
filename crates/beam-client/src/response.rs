//! HTTP response types.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// Response metadata paired with a body.
#[derive(Debug, Clone)]
pub struct Response<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: T,
}

/// Undecoded response as produced by runners and providers.
pub type RawResponse = Response<Bytes>;

impl<T> Response<T> {
    pub fn new(status: StatusCode, headers: HeaderMap, body: T) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Replace the body, keeping status and headers.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
        }
    }

    pub fn into_body(self) -> T {
        self.body
    }
}

impl RawResponse {
    /// A `200 OK` response with a JSON body.
    pub fn json(body: &serde_json::Value) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static(crate::request::headers::CONTENT_TYPE_JSON),
        );
        Self::new(StatusCode::OK, headers, Bytes::from(body.to_string()))
    }

    /// Body as lossy UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the JSON body. An empty body decodes as `null`.
    pub fn parse_json<T: DeserializeOwned>(self) -> Result<Response<T>, HttpError> {
        let body = if self.body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_slice(b"null")
        } else {
            serde_json::from_slice(&self.body)
        };

        match body {
            Ok(body) => Ok(Response::new(self.status, self.headers, body)),
            Err(source) => Err(HttpError::Decode {
                status: self.status.as_u16(),
                body: String::from_utf8_lossy(&self.body).into_owned(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Join {
        authkey: String,
        endpoints: Vec<String>,
    }

    #[test]
    fn test_parse_json() {
        let raw = RawResponse::json(&serde_json::json!({
            "authkey": "abc",
            "endpoints": ["wss://chat1"],
        }));

        let response: Response<Join> = raw.parse_json().unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body.authkey, "abc");
        assert_eq!(response.body.endpoints, vec!["wss://chat1".to_string()]);
    }

    #[test]
    fn test_parse_empty_body() {
        let raw = RawResponse::new(StatusCode::NO_CONTENT, HeaderMap::new(), Bytes::new());
        let response: Response<Option<Join>> = raw.parse_json().unwrap();
        assert_eq!(response.status, StatusCode::NO_CONTENT);
        assert!(response.body.is_none());
    }

    #[test]
    fn test_parse_error_keeps_body() {
        let raw = RawResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::from_static(b"<html>"));
        let err = raw.parse_json::<Join>().unwrap_err();

        match err {
            HttpError::Decode { status, body, .. } => {
                assert_eq!(status, 200);
                assert_eq!(body, "<html>");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_map() {
        let raw = RawResponse::json(&serde_json::json!("hi"));
        let text = raw.map(|b| String::from_utf8_lossy(&b).into_owned());
        assert_eq!(text.body, "\"hi\"");
    }
}
