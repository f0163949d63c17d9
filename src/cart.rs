//! Cart service builder and per-request cart handler.
//!
//! The [`CartServiceBuilder`] provides a fluent API for configuring the
//! storefront client, cookie and custom handlers. The resulting
//! [`CartService`] is built once and shared; each request gets a
//! [`CartHandler`] bound to its cart cookie.
//!
//! # Example
//!
//! ```ignore
//! use storefront_cart::{CartService, CartOptionalParams};
//!
//! let service = CartService::builder(storefront)
//!     .cookie_options(CookieOptions::new().max_age(60 * 60 * 24 * 14).http_only(true))
//!     .handle("CustomEditInPlace", edit_in_place)
//!     .build();
//!
//! // Per request
//! let cart = service.for_request(&request_headers);
//! let result = cart.respond(&form, &mut response_headers, CartOptionalParams::new()).await?;
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::action::{
    AttributeInput, CartAction, CartBuyerIdentityInput, CartInput, CartLineInput,
    CartLineUpdateInput, CartSelectedDeliveryOptionInput, MetafieldSetInput,
};
use crate::codec::{CartActionInput, FormCodec, FormData};
use crate::config::CartConfig;
use crate::cookie::CookieOptions;
use crate::dispatch::{Dispatched, Dispatcher};
use crate::error::Result;
use crate::handler::{
    CartGetParams, CartOptionalParams, CartQueryOptions, DefaultHandlers, Handler,
    HandlerRegistry, HandlerResult, RequestContext, TypedHandler,
};
use crate::storefront::{Cart, CartQueryResult, StorefrontClient};

/// Builder for configuring and creating a [`CartService`].
pub struct CartServiceBuilder {
    storefront: Arc<dyn StorefrontClient>,
    config: CartConfig,
    custom: HashMap<String, Arc<dyn Handler>>,
}

impl CartServiceBuilder {
    /// Create a builder for `storefront` with default settings.
    pub fn new(storefront: Arc<dyn StorefrontClient>) -> Self {
        Self {
            storefront,
            config: CartConfig::default(),
            custom: HashMap::new(),
        }
    }

    /// Replace all settings.
    pub fn config(mut self, config: CartConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the cart cookie name.
    ///
    /// Default: `cart`
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.config.cookie_name = name.into();
        self
    }

    /// Set the cart cookie attributes.
    ///
    /// Default: none rendered
    pub fn cookie_options(mut self, options: CookieOptions) -> Self {
        self.config.cookie = options;
        self
    }

    /// Set the number of lines the cart read path returns.
    ///
    /// Default: 100
    pub fn num_cart_lines(mut self, count: u32) -> Self {
        self.config.num_cart_lines = count;
        self
    }

    /// Replace the `CartApiQuery` fragment used by the read path.
    pub fn cart_query_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.config.cart_query_fragment = Some(fragment.into());
        self
    }

    /// Replace the `CartApiMutation` fragment used by mutations.
    pub fn cart_mutate_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.config.cart_mutate_fragment = Some(fragment.into());
        self
    }

    /// Register a custom action handler with typed inputs.
    ///
    /// A built-in action name replaces that action's default handler.
    pub fn handle<F, T, Fut>(mut self, action: &str, handler: F) -> Self
    where
        F: Fn(T, RequestContext) -> Fut + Send + Sync + 'static,
        T: DeserializeOwned + Send + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.custom
            .insert(action.to_string(), Arc::new(TypedHandler::new(action, handler)));
        self
    }

    /// Register an already-built custom handler.
    pub fn handler(mut self, action: &str, handler: Arc<dyn Handler>) -> Self {
        self.custom.insert(action.to_string(), handler);
        self
    }

    /// Default handlers for the current settings.
    ///
    /// Useful for custom handlers that compose default ones.
    pub fn defaults(&self) -> DefaultHandlers {
        let mut options = CartQueryOptions::new(self.storefront.clone());
        options.num_cart_lines = self.config.num_cart_lines;
        if let Some(fragment) = &self.config.cart_query_fragment {
            options.cart_query_fragment = fragment.clone();
        }
        if let Some(fragment) = &self.config.cart_mutate_fragment {
            options.cart_mutate_fragment = fragment.clone();
        }
        DefaultHandlers::new(options)
    }

    /// Build the service.
    pub fn build(self) -> CartService {
        let registry = HandlerRegistry::build(self.defaults(), self.custom);
        let store = self.config.cart_id_store();

        CartService {
            dispatcher: Dispatcher::new(Arc::new(registry), store),
        }
    }
}

/// Shared cart service; one per process.
#[derive(Clone)]
pub struct CartService {
    dispatcher: Dispatcher,
}

impl CartService {
    /// Create a new service builder.
    pub fn builder(storefront: Arc<dyn StorefrontClient>) -> CartServiceBuilder {
        CartServiceBuilder::new(storefront)
    }

    /// The dispatcher behind this service.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Bind the service to one request's cart cookie.
    pub fn for_request(&self, request_headers: &HeaderMap) -> CartHandler {
        let inbound = self.dispatcher.store().get_cart_id(request_headers);

        CartHandler {
            dispatcher: self.dispatcher.clone(),
            ctx: RequestContext::new(inbound),
        }
    }
}

/// Cart operations for a single request.
pub struct CartHandler {
    dispatcher: Dispatcher,
    ctx: RequestContext,
}

impl CartHandler {
    fn defaults(&self) -> &DefaultHandlers {
        self.dispatcher.registry().defaults()
    }

    fn ctx(&self, params: CartOptionalParams) -> RequestContext {
        self.ctx.clone().with_params(params)
    }

    /// Cart id from the request cookie.
    pub fn get_cart_id(&self) -> Option<&str> {
        self.ctx.inbound_cart_id()
    }

    /// Write `cart_id` into the response's `Set-Cookie`.
    pub fn set_cart_id(&self, cart_id: &str, response_headers: &mut HeaderMap) -> Result<()> {
        self.dispatcher.store().set_cart_id(cart_id, response_headers)
    }

    /// Decode the cart form without running it.
    pub fn get_form_input<F: FormData + ?Sized>(&self, form: &F) -> Result<CartActionInput> {
        FormCodec::decode(form)
    }

    /// Decode and run the submitted cart action.
    pub async fn dispatch<F: FormData + ?Sized>(
        &self,
        form: &F,
        params: CartOptionalParams,
    ) -> Result<Dispatched> {
        self.dispatcher.dispatch_with(form, self.ctx(params)).await
    }

    /// Decode and run the submitted cart action, then write the cart cookie.
    pub async fn respond<F: FormData + ?Sized>(
        &self,
        form: &F,
        response_headers: &mut HeaderMap,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        let dispatched = self.dispatch(form, params).await?;
        dispatched.write_cart_id(self.dispatcher.store(), response_headers)?;
        Ok(dispatched.into_result())
    }

    /// Read the cart; `None` when there is none.
    pub async fn get(
        &self,
        get: CartGetParams,
        params: CartOptionalParams,
    ) -> Result<Option<Cart>> {
        self.defaults().get(get, &self.ctx(params)).await
    }

    /// Run a built-in action, honouring a custom handler under its name.
    async fn run(&self, action: CartAction, params: CartOptionalParams) -> Result<CartQueryResult> {
        self.dispatcher
            .registry()
            .run(action, self.ctx(params))
            .await
    }

    pub async fn create(
        &self,
        input: CartInput,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::Create { input }, params).await
    }

    pub async fn add_lines(
        &self,
        lines: Vec<CartLineInput>,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::LinesAdd { lines }, params).await
    }

    pub async fn update_lines(
        &self,
        lines: Vec<CartLineUpdateInput>,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::LinesUpdate { lines }, params).await
    }

    pub async fn remove_lines(
        &self,
        line_ids: Vec<String>,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::LinesRemove { line_ids }, params).await
    }

    pub async fn update_note(
        &self,
        note: String,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::NoteUpdate { note }, params).await
    }

    pub async fn update_buyer_identity(
        &self,
        buyer_identity: CartBuyerIdentityInput,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::BuyerIdentityUpdate { buyer_identity }, params)
            .await
    }

    pub async fn update_discount_codes(
        &self,
        discount_codes: Vec<String>,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::DiscountCodesUpdate { discount_codes }, params)
            .await
    }

    pub async fn update_selected_delivery_options(
        &self,
        selected_delivery_options: Vec<CartSelectedDeliveryOptionInput>,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(
            CartAction::SelectedDeliveryOptionsUpdate {
                selected_delivery_options,
            },
            params,
        )
        .await
    }

    pub async fn update_attributes(
        &self,
        attributes: Vec<AttributeInput>,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::AttributesUpdateInput { attributes }, params)
            .await
    }

    pub async fn set_metafields(
        &self,
        metafields: Vec<MetafieldSetInput>,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::MetafieldsSet { metafields }, params).await
    }

    pub async fn delete_metafield(
        &self,
        key: String,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        self.run(CartAction::MetafieldDelete { key }, params).await
    }
}
