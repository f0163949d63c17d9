//! `Set-Cookie` attributes for the cart cookie.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::check_cookie_value;
use crate::error::Result;

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SameSite {
    Strict,
    /// Browser default when the attribute is omitted.
    #[default]
    Lax,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes rendered on the cart `Set-Cookie` header.
///
/// Every attribute is optional and only rendered when set. Unset `path`
/// and `same_site` fall back to the browser defaults (`/` and `Lax`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CookieOptions {
    /// Lifetime in seconds.
    pub max_age: Option<u64>,
    pub domain: Option<String>,
    pub path: Option<String>,
    /// Absolute expiry.
    pub expires: Option<DateTime<Utc>>,
    pub http_only: Option<bool>,
    pub same_site: Option<SameSite>,
    pub secure: Option<bool>,
}

impl CookieOptions {
    /// No attributes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn expires(mut self, at: DateTime<Utc>) -> Self {
        self.expires = Some(at);
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Append `; Name=value` pairs for every set attribute.
    ///
    /// `domain` and `path` must be cookie octets.
    pub(crate) fn render_into(&self, cookie: &mut String) -> Result<()> {
        // Writing to a String cannot fail.
        if let Some(max_age) = self.max_age {
            let _ = write!(cookie, "; Max-Age={max_age}");
        }
        if let Some(domain) = &self.domain {
            check_cookie_value("Domain", domain)?;
            let _ = write!(cookie, "; Domain={domain}");
        }
        if let Some(path) = &self.path {
            check_cookie_value("Path", path)?;
            let _ = write!(cookie, "; Path={path}");
        }
        if let Some(expires) = self.expires {
            let _ = write!(cookie, "; Expires={}", expires.format("%a, %d %b %Y %H:%M:%S GMT"));
        }
        if self.http_only == Some(true) {
            cookie.push_str("; HttpOnly");
        }
        if let Some(same_site) = self.same_site {
            let _ = write!(cookie, "; SameSite={}", same_site.as_str());
        }
        if self.secure == Some(true) {
            cookie.push_str("; Secure");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(options: &CookieOptions) -> String {
        let mut cookie = String::new();
        options.render_into(&mut cookie).unwrap();
        cookie
    }

    #[test]
    fn test_default_renders_nothing() {
        assert_eq!(rendered(&CookieOptions::default()), "");
    }

    #[test]
    fn test_false_flags_render_nothing() {
        let options = CookieOptions::new().http_only(false).secure(false);
        assert_eq!(rendered(&options), "");
    }

    #[test]
    fn test_same_site_none() {
        let options = CookieOptions::new().same_site(SameSite::None).secure(true);
        assert_eq!(rendered(&options), "; SameSite=None; Secure");
    }

    #[test]
    fn test_deserialize_from_config() {
        let options: CookieOptions = serde_json::from_str(
            r#"{"maxAge": 1209600, "sameSite": "Lax", "httpOnly": true, "expires": "2026-10-21T07:28:00Z"}"#,
        )
        .unwrap();

        assert_eq!(options.max_age, Some(1_209_600));
        assert_eq!(options.same_site, Some(SameSite::Lax));
        assert_eq!(options.http_only, Some(true));
        assert_eq!(
            rendered(&options),
            "; Max-Age=1209600; Expires=Wed, 21 Oct 2026 07:28:00 GMT; HttpOnly; SameSite=Lax"
        );
    }
}
