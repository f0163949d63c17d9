//! Handler module - cart action handlers and routing.
//!
//! Provides:
//! - [`DefaultHandlers`] - one storefront operation per built-in action
//! - [`HandlerRegistry`] - routes action names to default or custom handlers
//! - [`RequestContext`] - the request's cart id and caller overrides
//!
//! # Example
//!
//! ```ignore
//! use storefront_cart::handler::{CartQueryOptions, DefaultHandlers, HandlerRegistry};
//!
//! let defaults = DefaultHandlers::new(CartQueryOptions::new(storefront));
//! let mut registry = HandlerRegistry::new(defaults);
//!
//! // Override a built-in action
//! registry.register("LinesAdd", |inputs: serde_json::Map<_, _>, ctx| async move {
//!     my_lines_add(inputs, ctx).await
//! });
//! ```

mod context;
mod defaults;
mod registry;

pub use context::{CartOptionalParams, RequestContext};
pub use defaults::{CartGetParams, CartQueryOptions, DefaultHandlers, DEFAULT_NUM_CART_LINES};
pub use registry::{BoxFuture, Handler, HandlerRegistry, HandlerResult, Route, TypedHandler};
