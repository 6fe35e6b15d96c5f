use axum::http::{HeaderMap, header::COOKIE};

/// Attributes for a `Set-Cookie` header.
pub struct CookieSpec<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub max_age_secs: i64,
    pub http_only: bool,
    pub same_site: &'a str,
    pub secure: bool,
}

/// Builds a `Set-Cookie` header value scoped to the whole site.
#[must_use]
pub fn build_cookie(spec: &CookieSpec<'_>) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite={}",
        spec.name, spec.value, spec.max_age_secs, spec.same_site
    );
    if spec.http_only {
        cookie.push_str("; HttpOnly");
    }
    if spec.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Finds a cookie by name across every `Cookie` header on the request.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

/// Compares two byte strings without short-circuiting on the first mismatch.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_read_cookie_among_several() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; spades_admin_auth=abc123; other=1"),
        );

        assert_eq!(read_cookie(&headers, "spades_admin_auth"), Some("abc123"));
        assert_eq!(read_cookie(&headers, "theme"), Some("dark"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_read_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("a=1"));
        headers.append(COOKIE, HeaderValue::from_static("b=2"));

        assert_eq!(read_cookie(&headers, "b"), Some("2"));
    }

    #[test]
    fn test_build_cookie_flags() {
        let cookie = build_cookie(&CookieSpec {
            name: "session",
            value: "v",
            max_age_secs: 60,
            http_only: true,
            same_site: "Strict",
            secure: true,
        });

        assert_eq!(
            cookie,
            "session=v; Path=/; Max-Age=60; SameSite=Strict; HttpOnly; Secure"
        );
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
