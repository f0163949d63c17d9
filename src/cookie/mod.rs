//! Cookie module - carrying the cart id between requests.
//!
//! The cart id lives in a single cookie (default name `cart`). Only the
//! trailing token of the storefront global id is stored:
//!
//! ```text
//! gid://shopify/Cart/c1-123  ->  Set-Cookie: cart=c1-123
//! Cookie: cart=c1-123        ->  gid://shopify/Cart/c1-123
//! ```
//!
//! # Example
//!
//! ```
//! use http::HeaderMap;
//! use storefront_cart::cookie::{CartIdStore, CookieOptions};
//!
//! let store = CartIdStore::new().with_options(CookieOptions::new().max_age(1000));
//! let mut headers = HeaderMap::new();
//! store.set_cart_id("gid://shopify/Cart/c1-123", &mut headers).unwrap();
//!
//! assert_eq!(headers["set-cookie"], "cart=c1-123; Max-Age=1000");
//! ```

mod options;

pub use options::{CookieOptions, SameSite};

use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};

use crate::error::{CartError, Result};

/// Default cookie name.
pub const DEFAULT_CART_COOKIE: &str = "cart";

/// Global id prefix restored when reading a bare token from the cookie.
pub const CART_GID_PREFIX: &str = "gid://shopify/Cart/";

/// Reads and writes the cart id cookie.
///
/// Holds no per-request state; one store can serve every request.
#[derive(Debug, Clone)]
pub struct CartIdStore {
    cookie_name: String,
    options: CookieOptions,
}

impl CartIdStore {
    /// Store using the `cart` cookie with no attributes.
    pub fn new() -> Self {
        Self {
            cookie_name: DEFAULT_CART_COOKIE.to_string(),
            options: CookieOptions::default(),
        }
    }

    /// Use a different cookie name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Render these attributes on every `Set-Cookie`.
    pub fn with_options(mut self, options: CookieOptions) -> Self {
        self.options = options;
        self
    }

    /// Cookie name.
    #[inline]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Cookie attributes.
    #[inline]
    pub fn options(&self) -> &CookieOptions {
        &self.options
    }

    /// Read the cart id from the request's `Cookie` headers.
    ///
    /// Returns the id in global id form. A missing or empty cookie yields
    /// `None`; malformed cookie pairs are skipped.
    pub fn get_cart_id(&self, request_headers: &HeaderMap) -> Option<String> {
        let token = request_headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| name.trim() == self.cookie_name)
            .map(|(_, value)| value.trim().trim_matches('"'))?;

        if token.is_empty() {
            return None;
        }

        if token.starts_with("gid://") {
            Some(token.to_string())
        } else {
            Some(format!("{CART_GID_PREFIX}{token}"))
        }
    }

    /// Append a `Set-Cookie` header carrying `cart_id` to `response_headers`.
    ///
    /// Only the trailing segment of a global id is stored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidCookieValue`] if the id token or an
    /// attribute holds bytes outside the cookie octet set (`;`, `,`,
    /// whitespace, quotes, backslash, controls, non-ASCII).
    pub fn set_cart_id(&self, cart_id: &str, response_headers: &mut HeaderMap) -> Result<()> {
        self.set_cart_id_with(cart_id, response_headers, &self.options)
    }

    /// Like [`set_cart_id`](Self::set_cart_id) with one-off attributes.
    pub fn set_cart_id_with(
        &self,
        cart_id: &str,
        response_headers: &mut HeaderMap,
        options: &CookieOptions,
    ) -> Result<()> {
        let cookie = self.render(cart_id, options)?;
        response_headers.append(SET_COOKIE, HeaderValue::from_str(&cookie)?);
        tracing::debug!("Set cart cookie {}", self.cookie_name);
        Ok(())
    }

    fn render(&self, cart_id: &str, options: &CookieOptions) -> Result<String> {
        let token = cart_id.rsplit('/').next().unwrap_or(cart_id);
        check_cookie_value("value", token)?;

        let mut cookie = format!("{}={}", self.cookie_name, token);
        options.render_into(&mut cookie)?;
        Ok(cookie)
    }
}

/// RFC 6265 `cookie-octet`.
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

/// Reject values that could end the cookie pair or add attributes.
pub(crate) fn check_cookie_value(field: &'static str, value: &str) -> Result<()> {
    if value.bytes().all(is_cookie_octet) {
        return Ok(());
    }
    Err(CartError::InvalidCookieValue {
        field,
        value: value.to_string(),
    })
}

impl Default for CartIdStore {
    fn default() -> Self {
        Self::new()
    }
}
