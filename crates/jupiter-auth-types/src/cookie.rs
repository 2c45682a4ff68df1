//! Refresh-token cookie builders.
//!
//! The refresh token only ever travels in this cookie: path `/`, HTTP-only,
//! `Secure` unless the service runs in debug mode, Max-Age equal to the
//! refresh-token lifetime (or zero when clearing).

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::token::REFRESH_TOKEN_TTL_SECS;

/// Cookie name for the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Deployment-dependent cookie attributes.
#[derive(Debug, Clone, Default)]
pub struct CookieSettings {
    /// Emit the `Secure` attribute. Disabled only in debug mode.
    pub secure: bool,
    /// Optional `Domain` attribute; host-only cookie when `None`.
    pub domain: Option<String>,
}

impl CookieSettings {
    pub fn new(debug_mode: bool, domain: Option<String>) -> Self {
        Self {
            secure: !debug_mode,
            domain,
        }
    }

    fn build(&self, value: String, max_age: Duration) -> Cookie<'static> {
        let mut builder = Cookie::build((REFRESH_TOKEN_COOKIE, value))
            .path("/")
            .max_age(max_age)
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax);
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }
}

/// Read the refresh-token value, if the client sent one.
pub fn refresh_token_from(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

/// Set the refresh-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use jupiter_auth_types::cookie::{set_refresh_token_cookie, CookieSettings, REFRESH_TOKEN_COOKIE};
///
/// let settings = CookieSettings::new(false, None);
/// let jar = set_refresh_token_cookie(CookieJar::new(), "refresh_value".to_string(), &settings);
/// let cookie = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "refresh_value");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), None);
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(864000)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_refresh_token_cookie(jar: CookieJar, value: String, settings: &CookieSettings) -> CookieJar {
    jar.add(settings.build(value, Duration::seconds(REFRESH_TOKEN_TTL_SECS as i64)))
}

/// Expire the refresh-token cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use jupiter_auth_types::cookie::{
///     clear_refresh_token_cookie, set_refresh_token_cookie, CookieSettings, REFRESH_TOKEN_COOKIE,
/// };
///
/// let settings = CookieSettings::new(true, Some("example.com".to_string()));
/// let jar = set_refresh_token_cookie(CookieJar::new(), "r".to_string(), &settings);
/// let jar = clear_refresh_token_cookie(jar, &settings);
/// let cookie = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert!(!cookie.secure().unwrap_or(false));
/// ```
pub fn clear_refresh_token_cookie(jar: CookieJar, settings: &CookieSettings) -> CookieJar {
    jar.add(settings.build(String::new(), Duration::ZERO))
}
