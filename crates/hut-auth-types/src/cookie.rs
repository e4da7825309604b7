//! Cookie builder for the admin session token.
//!
//! The browser never needs to manage the token explicitly: it is delivered as
//! an HTTP-only, SameSite=Lax cookie and dies with its Max-Age.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the admin session token.
pub const HUT_ADMIN_SESSION: &str = "hut_admin_session";

/// Admin-session lifetime in seconds (2 hours). Both the JWT `exp` claim and
/// the cookie Max-Age use this value.
pub const SESSION_TTL_SECS: u64 = 7200;

/// Set the admin-session cookie on the jar.
///
/// `secure` should be on in production; local HTTP development turns it off.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use hut_auth_types::cookie::{set_session_cookie, HUT_ADMIN_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "example.com".to_string(), true);
/// let cookie = jar.get(HUT_ADMIN_SESSION).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(7200)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(
    jar: CookieJar,
    value: String,
    domain: String,
    secure: bool,
) -> CookieJar {
    let cookie = Cookie::build((HUT_ADMIN_SESSION, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(SESSION_TTL_SECS as i64))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the admin-session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use hut_auth_types::cookie::{clear_session_cookie, set_session_cookie, HUT_ADMIN_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "a".to_string(), "example.com".to_string(), true);
/// let jar = clear_session_cookie(jar, "example.com".to_string(), true);
/// let cookie = jar.get(HUT_ADMIN_SESSION).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String, secure: bool) -> CookieJar {
    let cookie = Cookie::build((HUT_ADMIN_SESSION, ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
