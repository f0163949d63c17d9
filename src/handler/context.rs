//! Request context for handlers.
//!
//! A [`RequestContext`] carries what a handler needs to know about the
//! request it serves:
//! - the cart id read from the inbound cookie
//! - caller overrides ([`CartOptionalParams`]) for cart id, country, language
//!
//! Explicit overrides always win over the cookie and over the storefront's
//! i18n defaults.
//!
//! # Example
//!
//! ```
//! use storefront_cart::handler::{CartOptionalParams, RequestContext};
//!
//! let ctx = RequestContext::new(Some("gid://shopify/Cart/from-cookie".into()))
//!     .with_params(CartOptionalParams::new().cart_id("gid://shopify/Cart/explicit"));
//!
//! assert_eq!(ctx.cart_id(), Some("gid://shopify/Cart/explicit"));
//! ```

use serde::Deserialize;

/// Per-call overrides accepted by every handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartOptionalParams {
    /// Use this cart instead of the one in the cookie.
    pub cart_id: Option<String>,
    /// Country code for `@inContext`.
    pub country: Option<String>,
    /// Language code for `@inContext`.
    pub language: Option<String>,
}

impl CartOptionalParams {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart_id(mut self, cart_id: impl Into<String>) -> Self {
        self.cart_id = Some(cart_id.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Fill unset fields from `fallback`. Values already set are kept.
    pub fn or(self, fallback: CartOptionalParams) -> Self {
        Self {
            cart_id: self.cart_id.or(fallback.cart_id),
            country: self.country.or(fallback.country),
            language: self.language.or(fallback.language),
        }
    }
}

/// Context passed to cart handlers.
///
/// `RequestContext` is `Clone` and cheap enough to hand to every handler
/// of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Cart id from the inbound cookie.
    inbound_cart_id: Option<String>,
    /// Caller overrides.
    params: CartOptionalParams,
}

impl RequestContext {
    /// Create a context for a request whose cookie held `inbound_cart_id`.
    pub fn new(inbound_cart_id: Option<String>) -> Self {
        Self {
            inbound_cart_id,
            params: CartOptionalParams::default(),
        }
    }

    /// Apply caller overrides. Overrides already on the context win.
    pub fn with_params(mut self, params: CartOptionalParams) -> Self {
        self.params = self.params.or(params);
        self
    }

    /// Effective cart id: explicit override, else the cookie.
    pub fn cart_id(&self) -> Option<&str> {
        self.params
            .cart_id
            .as_deref()
            .or(self.inbound_cart_id.as_deref())
    }

    /// Cart id from the inbound cookie, ignoring overrides.
    #[inline]
    pub fn inbound_cart_id(&self) -> Option<&str> {
        self.inbound_cart_id.as_deref()
    }

    /// Caller overrides.
    #[inline]
    pub fn params(&self) -> &CartOptionalParams {
        &self.params
    }
}
