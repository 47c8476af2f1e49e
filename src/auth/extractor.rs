//! Locating a session token in request headers

use axum::http::{header, HeaderMap};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "jwt";

/// Find the candidate token for a request.
///
/// Checks `Authorization: Bearer <token>` first, then a cookie named `jwt`.
/// Empty values are treated as absent, which is how a cleared logout cookie
/// arrives.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::AUTHORIZATION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE).then(|| value.trim().trim_matches('"'))
        })
        .find(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_no_token() {
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_bearer_header() {
        let h = headers(&[(header::AUTHORIZATION, "Bearer abc.def.ghi")]);
        assert_eq!(extract_token(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_other_scheme_ignored() {
        let h = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_token(&h), None);
    }

    #[test]
    fn test_cookie_among_others() {
        let h = headers(&[(header::COOKIE, "theme=dark; jwt=tok123; lang=en")]);
        assert_eq!(extract_token(&h).as_deref(), Some("tok123"));
    }

    #[test]
    fn test_cookie_name_must_match_exactly() {
        let h = headers(&[(header::COOKIE, "old_jwt=nope; jwtx=nope")]);
        assert_eq!(extract_token(&h), None);
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer A"),
            (header::COOKIE, "jwt=B"),
        ]);
        assert_eq!(extract_token(&h).as_deref(), Some("A"));
    }

    #[test]
    fn test_cleared_cookie_is_absent() {
        let h = headers(&[(header::COOKIE, "jwt=")]);
        assert_eq!(extract_token(&h), None);
    }

    #[test]
    fn test_empty_bearer_falls_back_to_cookie() {
        let h = headers(&[
            (header::AUTHORIZATION, "Bearer "),
            (header::COOKIE, "jwt=B"),
        ]);
        assert_eq!(extract_token(&h).as_deref(), Some("B"));
    }
}
