//! The cookie that ties reset requests to one server-side session.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use schoolhub_config::SessionConfig;
use uuid::Uuid;

/// Session id from `jar`, issuing a new cookie when there is none.
pub fn session_id(jar: CookieJar, config: &SessionConfig) -> (CookieJar, String) {
    if let Some(id) = jar
        .get(&config.cookie_name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|id| !id.is_empty())
    {
        return (jar, id);
    }

    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((config.cookie_name.clone(), id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build();

    (jar.add(cookie), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, header};
    use axum::response::IntoResponse;

    #[test]
    fn test_existing_cookie_is_reused() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("schoolhub_session=abc123"),
        );
        let jar = CookieJar::from_headers(&headers);

        let (_, id) = session_id(jar, &SessionConfig::default());
        assert_eq!(id, "abc123");
    }

    #[test]
    fn test_new_cookie_is_issued() {
        let (jar, id) = session_id(CookieJar::new(), &SessionConfig::default());
        assert!(Uuid::parse_str(&id).is_ok());

        let response = jar.into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with(&format!("schoolhub_session={}", id)));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(!set_cookie.contains("Secure"));
    }
}
