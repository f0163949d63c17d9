//! # storefront-cart
//!
//! Cart action dispatch for storefront servers.
//!
//! One HTTP endpoint accepts every cart mutation a page can submit. The
//! browser sends a single form field holding the action name and its
//! inputs; the server decodes it, routes it to a handler, runs one
//! storefront operation and refreshes the cart cookie.
//!
//! ## Architecture
//!
//! - **Codec**: `cartFormInput={"action": ..., ...inputs}` <-> [`CartActionInput`]
//! - **Registry**: built-in actions go to [`DefaultHandlers`]; custom handlers override or extend by name
//! - **Dispatcher**: decode, route, invoke, then write the cart id cookie
//!
//! ## Example
//!
//! ```ignore
//! use storefront_cart::{CartOptionalParams, CartService};
//!
//! let service = CartService::builder(storefront)
//!     .handle("CustomEditInPlace", |input: EditInPlace, ctx| async move {
//!         edit_in_place(input, ctx).await
//!     })
//!     .build();
//!
//! // In the cart route
//! let cart = service.for_request(&request_headers);
//! let result = cart
//!     .respond(&form, &mut response_headers, CartOptionalParams::new())
//!     .await?;
//! ```

pub mod action;
pub mod codec;
pub mod config;
pub mod cookie;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod queries;
pub mod storefront;

mod cart;

pub use action::{ActionName, CartAction};
pub use cart::{CartHandler, CartService, CartServiceBuilder};
pub use codec::{CartActionInput, FormCodec, CART_FORM_INPUT};
pub use dispatch::{Dispatched, Dispatcher};
pub use error::CartError;
pub use handler::{CartOptionalParams, DefaultHandlers, HandlerRegistry, RequestContext};
pub use storefront::{CartQueryResult, StorefrontClient};
