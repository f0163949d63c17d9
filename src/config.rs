//! Cart settings.
//!
//! [`CartConfig`] deserializes from the host application's configuration
//! (any serde format) with every field optional:
//!
//! ```
//! use storefront_cart::config::CartConfig;
//!
//! let config: CartConfig = serde_json::from_str(
//!     r#"{"cookieName": "cart", "cookie": {"maxAge": 1209600, "httpOnly": true}}"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.cookie.max_age, Some(1_209_600));
//! assert_eq!(config.num_cart_lines, 100);
//! ```

use serde::Deserialize;

use crate::cookie::{CartIdStore, CookieOptions, DEFAULT_CART_COOKIE};
use crate::handler::DEFAULT_NUM_CART_LINES;

/// Settings for the cart service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartConfig {
    /// Name of the cart id cookie.
    pub cookie_name: String,
    /// Attributes rendered on the cart id cookie.
    pub cookie: CookieOptions,
    /// Lines returned by the cart read path.
    pub num_cart_lines: u32,
    /// Replacement for the default `CartApiQuery` fragment.
    pub cart_query_fragment: Option<String>,
    /// Replacement for the default `CartApiMutation` fragment.
    pub cart_mutate_fragment: Option<String>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_CART_COOKIE.to_string(),
            cookie: CookieOptions::default(),
            num_cart_lines: DEFAULT_NUM_CART_LINES,
            cart_query_fragment: None,
            cart_mutate_fragment: None,
        }
    }
}

impl CartConfig {
    /// Cookie store for these settings.
    pub fn cart_id_store(&self) -> CartIdStore {
        CartIdStore::new()
            .with_cookie_name(self.cookie_name.clone())
            .with_options(self.cookie.clone())
    }
}
