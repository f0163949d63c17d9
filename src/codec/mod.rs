//! Codec module - the cart form wire format.
//!
//! A cart mutation travels from the browser as a single form field,
//! [`CART_FORM_INPUT`], whose value is a JSON object holding the action
//! name with the action's inputs flattened alongside it:
//!
//! ```text
//! cartFormInput={"action":"LinesAdd","lines":[{"merchandiseId":"gid://shopify/ProductVariant/1"}]}
//! ```
//!
//! [`FormCodec`] converts between that field and [`CartActionInput`].
//! The codec is untyped: inputs are validated only once they reach a handler.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use storefront_cart::codec::{CartActionInput, FormCodec, CART_FORM_INPUT};
//!
//! let input = CartActionInput::new("LinesRemove")
//!     .with_input("lineIds", serde_json::json!(["gid://shopify/CartLine/1"]));
//!
//! let (name, value) = FormCodec::form_field(&input).unwrap();
//! let form = HashMap::from([(name.to_string(), value)]);
//!
//! assert_eq!(name, CART_FORM_INPUT);
//! assert_eq!(FormCodec::decode(&form).unwrap(), input);
//! ```

mod form;

pub use form::{CartActionInput, FormCodec, FormData, CART_FORM_INPUT};
