//! Token extractors.
//!
//! An extractor looks at an [`AuthRequest`] and either finds a candidate token
//! or returns `None`. Extractors never mutate the request and can be combined
//! with [`from_extractors`], where the first one that finds a token wins.

use axum::http::header;

use crate::auth_header;
use crate::request::AuthRequest;

pub const BEARER_AUTH_SCHEME: &str = "bearer";

pub trait TokenExtractor: Send + Sync {
    fn extract(&self, request: &AuthRequest) -> Option<String>;
}

impl<F> TokenExtractor for F
where
    F: Fn(&AuthRequest) -> Option<String> + Send + Sync,
{
    fn extract(&self, request: &AuthRequest) -> Option<String> {
        self(request)
    }
}

/// Token is the whole value of a custom header, e.g. `x-access-token`.
pub fn from_header(name: &str) -> impl TokenExtractor + Clone + use<> {
    let name = name.to_ascii_lowercase();
    move |req: &AuthRequest| req.header(&name).map(str::to_string)
}

/// Token is the value of `Authorization: <scheme> <token>` when the scheme
/// matches `auth_scheme` (case-insensitive).
pub fn from_auth_header_with_scheme(auth_scheme: &str) -> impl TokenExtractor + Clone + use<> {
    let auth_scheme = auth_scheme.to_string();
    move |req: &AuthRequest| {
        let raw = req.headers().get(header::AUTHORIZATION)?;
        let parsed = auth_header::parse_value(raw).ok().flatten()?;
        parsed
            .scheme
            .eq_ignore_ascii_case(&auth_scheme)
            .then_some(parsed.value)
    }
}

/// `Authorization: Bearer <token>`
pub fn from_auth_header_as_bearer_token() -> impl TokenExtractor + Clone + use<> {
    from_auth_header_with_scheme(BEARER_AUTH_SCHEME)
}

/// Token is a string field of the parsed request body.
pub fn from_body_field(field: &str) -> impl TokenExtractor + Clone + use<> {
    let field = field.to_string();
    move |req: &AuthRequest| req.body_field(&field).map(str::to_string)
}

/// Token is a query string parameter, e.g. `?access_token=...`.
pub fn from_url_query_parameter(param: &str) -> impl TokenExtractor + Clone + use<> {
    let param = param.to_string();
    move |req: &AuthRequest| req.query_param(&param)
}

/// Try each extractor in order and return the first token found.
pub fn from_extractors(extractors: Vec<Box<dyn TokenExtractor>>) -> impl TokenExtractor + use<> {
    move |req: &AuthRequest| extractors.iter().find_map(|e| e.extract(req))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Uri};
    use serde_json::json;

    fn with_authorization(value: &str) -> AuthRequest {
        let mut req = AuthRequest::new();
        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        req
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let extract = from_auth_header_as_bearer_token();
        assert_eq!(extract.extract(&with_authorization("bearer abc")).as_deref(), Some("abc"));
        assert_eq!(extract.extract(&with_authorization("Bearer abc")).as_deref(), Some("abc"));
        assert_eq!(extract.extract(&with_authorization("BEARER abc")).as_deref(), Some("abc"));
    }

    #[test]
    fn other_scheme_or_malformed_header_yields_none() {
        let extract = from_auth_header_as_bearer_token();
        assert_eq!(extract.extract(&with_authorization("Basic abc")), None);
        assert_eq!(extract.extract(&with_authorization("malformed")), None);
        assert_eq!(extract.extract(&AuthRequest::new()), None);
    }

    #[test]
    fn custom_scheme() {
        let extract = from_auth_header_with_scheme("JWT");
        assert_eq!(extract.extract(&with_authorization("jwt abc")).as_deref(), Some("abc"));
        assert_eq!(extract.extract(&with_authorization("bearer abc")), None);
    }

    #[test]
    fn custom_header() {
        let mut req = AuthRequest::new();
        req.headers_mut()
            .insert("x-access-token", HeaderValue::from_static("abc"));
        assert_eq!(from_header("X-Access-Token").extract(&req).as_deref(), Some("abc"));
        assert_eq!(from_header("x-other").extract(&req), None);
    }

    #[test]
    fn body_field_and_query_parameter() {
        let req = AuthRequest::new()
            .with_uri(Uri::from_static("/?access_token=q"))
            .with_body(json!({ "auth_token": "b" }));
        assert_eq!(from_body_field("auth_token").extract(&req).as_deref(), Some("b"));
        assert_eq!(from_url_query_parameter("access_token").extract(&req).as_deref(), Some("q"));
    }

    #[test]
    fn first_match_wins_in_order() {
        let mut req = AuthRequest::new().with_uri(Uri::from_static("/?access_token=from-query"));
        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        let header_first = from_extractors(vec![
            Box::new(from_auth_header_as_bearer_token()),
            Box::new(from_url_query_parameter("access_token")),
        ]);
        let query_first = from_extractors(vec![
            Box::new(from_url_query_parameter("access_token")),
            Box::new(from_auth_header_as_bearer_token()),
        ]);

        assert_eq!(header_first.extract(&req).as_deref(), Some("from-header"));
        assert_eq!(query_first.extract(&req).as_deref(), Some("from-query"));
    }

    #[test]
    fn composite_matches_standalone_extractor() {
        let req = with_authorization("Bearer abc.def.ghi");
        let standalone = from_auth_header_as_bearer_token();
        let chain = from_extractors(vec![
            Box::new(from_header("x-access-token")),
            Box::new(from_auth_header_as_bearer_token()),
        ]);
        assert_eq!(chain.extract(&req), standalone.extract(&req));
    }

    #[test]
    fn extractors_from_borrowed_names_outlive_the_names() {
        let boxed: Box<dyn TokenExtractor> = {
            let header_name = String::from("x-access-token");
            let param = String::from("access_token");
            Box::new(from_extractors(vec![
                Box::new(from_header(header_name.as_str())),
                Box::new(from_url_query_parameter(param.as_str())),
            ]))
        };

        let req = AuthRequest::new().with_uri(Uri::from_static("/?access_token=q"));
        assert_eq!(boxed.extract(&req).as_deref(), Some("q"));
    }

    #[test]
    fn empty_chain_yields_none() {
        let chain = from_extractors(Vec::new());
        assert_eq!(chain.extract(&with_authorization("Bearer abc")), None);
    }
}
