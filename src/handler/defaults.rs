//! Default handlers for the built-in cart actions.
//!
//! [`DefaultHandlers`] turns each [`CartAction`] into exactly one storefront
//! operation. It closes over the storefront client and operation fragments
//! only; everything request-specific arrives in the [`RequestContext`].
//!
//! Every mutation except `Create` needs a cart id and fails with
//! [`CartError::MissingCartId`] when none resolves. The read path
//! ([`DefaultHandlers::get`]) treats a missing cart id as "no cart".

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::RequestContext;
use crate::action::{
    ActionName, AttributeInput, CartAction, CartBuyerIdentityInput, CartInput, CartLineInput,
    CartLineUpdateInput, CartSelectedDeliveryOptionInput, MetafieldSetInput,
};
use crate::error::{CartError, Result};
use crate::queries;
use crate::storefront::{
    CachePolicy, Cart, CartQueryResult, MutateOptions, QueryOptions, StorefrontClient,
};

/// Default number of cart lines returned by the read path.
pub const DEFAULT_NUM_CART_LINES: u32 = 100;

/// What the default handlers close over.
#[derive(Clone)]
pub struct CartQueryOptions {
    /// Storefront API client.
    pub storefront: Arc<dyn StorefrontClient>,
    /// Fragment defining `CartApiQuery on Cart`.
    pub cart_query_fragment: String,
    /// Fragment defining `CartApiMutation on Cart`.
    pub cart_mutate_fragment: String,
    /// Line count for the read path when the call does not set one.
    pub num_cart_lines: u32,
}

impl CartQueryOptions {
    /// Options with the default fragments.
    pub fn new(storefront: Arc<dyn StorefrontClient>) -> Self {
        Self {
            storefront,
            cart_query_fragment: queries::DEFAULT_CART_QUERY_FRAGMENT.to_string(),
            cart_mutate_fragment: queries::DEFAULT_CART_MUTATE_FRAGMENT.to_string(),
            num_cart_lines: DEFAULT_NUM_CART_LINES,
        }
    }
}

/// Parameters for the cart read path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartGetParams {
    /// Number of lines to return.
    pub num_cart_lines: Option<u32>,
}

/// One handler per built-in action.
///
/// Cheap to clone; clones share the same storefront client.
#[derive(Clone)]
pub struct DefaultHandlers {
    options: Arc<CartQueryOptions>,
}

impl DefaultHandlers {
    /// Create the default handlers.
    pub fn new(options: CartQueryOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    /// Options the handlers were built with.
    pub fn options(&self) -> &CartQueryOptions {
        &self.options
    }

    /// Run the default handler for `action`.
    pub async fn handle(&self, action: CartAction, ctx: &RequestContext) -> Result<CartQueryResult> {
        match action {
            CartAction::AttributesUpdateInput { attributes } => {
                self.update_attributes(attributes, ctx).await
            }
            CartAction::BuyerIdentityUpdate { buyer_identity } => {
                self.update_buyer_identity(buyer_identity, ctx).await
            }
            CartAction::Create { input } => self.create(input, ctx).await,
            CartAction::DiscountCodesUpdate { discount_codes } => {
                self.update_discount_codes(discount_codes, ctx).await
            }
            CartAction::LinesAdd { lines } => self.add_lines(lines, ctx).await,
            CartAction::LinesUpdate { lines } => self.update_lines(lines, ctx).await,
            CartAction::LinesRemove { line_ids } => self.remove_lines(line_ids, ctx).await,
            CartAction::NoteUpdate { note } => self.update_note(note, ctx).await,
            CartAction::SelectedDeliveryOptionsUpdate {
                selected_delivery_options,
            } => {
                self.update_selected_delivery_options(selected_delivery_options, ctx)
                    .await
            }
            CartAction::MetafieldsSet { metafields } => self.set_metafields(metafields, ctx).await,
            CartAction::MetafieldDelete { key } => self.delete_metafield(key, ctx).await,
        }
    }

    /// Read the cart. Returns `None` when no cart id resolves or the
    /// storefront has no such cart.
    pub async fn get(&self, params: CartGetParams, ctx: &RequestContext) -> Result<Option<Cart>> {
        let Some(cart_id) = ctx.cart_id() else {
            tracing::debug!("No cart id, skipping cart query");
            return Ok(None);
        };

        let mut variables = self.in_context(ctx);
        variables.insert("cartId".into(), json!(cart_id));
        variables.insert(
            "numCartLines".into(),
            json!(params.num_cart_lines.unwrap_or(self.options.num_cart_lines)),
        );

        let document = queries::cart_query(&self.options.cart_query_fragment);
        let mut data = self
            .options
            .storefront
            .query(
                &document,
                QueryOptions {
                    variables: Value::Object(variables),
                    cache: CachePolicy::None,
                },
            )
            .await
            .map_err(CartError::Backend)?;

        match data.get_mut("cart").map(Value::take) {
            Some(Value::Null) | None => Ok(None),
            Some(cart) => Ok(Some(serde_json::from_value(cart)?)),
        }
    }

    /// Create a new cart. Runs without a cart id.
    pub async fn create(&self, input: CartInput, ctx: &RequestContext) -> Result<CartQueryResult> {
        let mut variables = self.in_context(ctx);
        variables.insert("input".into(), serde_json::to_value(input)?);
        self.mutate(ActionName::Create, variables).await
    }

    pub async fn add_lines(
        &self,
        lines: Vec<CartLineInput>,
        ctx: &RequestContext,
    ) -> Result<CartQueryResult> {
        self.mutate_cart(ActionName::LinesAdd, ctx, "lines", &lines).await
    }

    pub async fn update_lines(
        &self,
        lines: Vec<CartLineUpdateInput>,
        ctx: &RequestContext,
    ) -> Result<CartQueryResult> {
        self.mutate_cart(ActionName::LinesUpdate, ctx, "lines", &lines).await
    }

    pub async fn remove_lines(
        &self,
        line_ids: Vec<String>,
        ctx: &RequestContext,
    ) -> Result<CartQueryResult> {
        self.mutate_cart(ActionName::LinesRemove, ctx, "lineIds", &line_ids)
            .await
    }

    pub async fn update_note(&self, note: String, ctx: &RequestContext) -> Result<CartQueryResult> {
        self.mutate_cart(ActionName::NoteUpdate, ctx, "note", &note).await
    }

    pub async fn update_buyer_identity(
        &self,
        buyer_identity: CartBuyerIdentityInput,
        ctx: &RequestContext,
    ) -> Result<CartQueryResult> {
        self.mutate_cart(
            ActionName::BuyerIdentityUpdate,
            ctx,
            "buyerIdentity",
            &buyer_identity,
        )
        .await
    }

    pub async fn update_discount_codes(
        &self,
        discount_codes: Vec<String>,
        ctx: &RequestContext,
    ) -> Result<CartQueryResult> {
        self.mutate_cart(
            ActionName::DiscountCodesUpdate,
            ctx,
            "discountCodes",
            &discount_codes,
        )
        .await
    }

    pub async fn update_selected_delivery_options(
        &self,
        selected_delivery_options: Vec<CartSelectedDeliveryOptionInput>,
        ctx: &RequestContext,
    ) -> Result<CartQueryResult> {
        self.mutate_cart(
            ActionName::SelectedDeliveryOptionsUpdate,
            ctx,
            "selectedDeliveryOptions",
            &selected_delivery_options,
        )
        .await
    }

    pub async fn update_attributes(
        &self,
        attributes: Vec<AttributeInput>,
        ctx: &RequestContext,
    ) -> Result<CartQueryResult> {
        self.mutate_cart(
            ActionName::AttributesUpdateInput,
            ctx,
            "attributes",
            &attributes,
        )
        .await
    }

    /// Set metafields on the cart. The result's cart carries only the id.
    pub async fn set_metafields(
        &self,
        metafields: Vec<MetafieldSetInput>,
        ctx: &RequestContext,
    ) -> Result<CartQueryResult> {
        let cart_id = require_cart_id(ActionName::MetafieldsSet, ctx)?;

        let owned: Vec<Value> = metafields
            .into_iter()
            .map(|metafield| -> Result<Value> {
                let mut value = serde_json::to_value(metafield)?;
                value["ownerId"] = json!(cart_id);
                Ok(value)
            })
            .collect::<Result<_>>()?;

        let mut variables = self.in_context(ctx);
        variables.insert("metafields".into(), Value::Array(owned));

        let mut result = self.mutate(ActionName::MetafieldsSet, variables).await?;
        result.cart = Some(Cart::with_id(cart_id));
        Ok(result)
    }

    /// Delete one cart metafield. The result's cart carries only the id.
    pub async fn delete_metafield(
        &self,
        key: String,
        ctx: &RequestContext,
    ) -> Result<CartQueryResult> {
        let cart_id = require_cart_id(ActionName::MetafieldDelete, ctx)?;

        let mut variables = self.in_context(ctx);
        variables.insert("input".into(), json!({ "ownerId": cart_id, "key": key }));

        let mut result = self.mutate(ActionName::MetafieldDelete, variables).await?;
        result.cart = Some(Cart::with_id(cart_id));
        Ok(result)
    }

    /// Mutation on an existing cart: `{cartId, <key>: input}`.
    async fn mutate_cart<T: Serialize>(
        &self,
        action: ActionName,
        ctx: &RequestContext,
        key: &str,
        input: &T,
    ) -> Result<CartQueryResult> {
        let cart_id = require_cart_id(action, ctx)?;

        let mut variables = self.in_context(ctx);
        variables.insert("cartId".into(), json!(cart_id));
        variables.insert(key.into(), serde_json::to_value(input)?);

        self.mutate(action, variables).await
    }

    async fn mutate(&self, action: ActionName, variables: Map<String, Value>) -> Result<CartQueryResult> {
        let document = queries::mutation(action, &self.options.cart_mutate_fragment);
        let data = self
            .options
            .storefront
            .mutate(
                &document,
                MutateOptions {
                    variables: Value::Object(variables),
                },
            )
            .await
            .map_err(CartError::Backend)?;

        let result = CartQueryResult::from_data(data, queries::mutation_root(action))?;
        if result.has_user_errors() {
            tracing::warn!(
                "{} returned {} user error(s): {}",
                action,
                result.errors.len(),
                result.errors[0].message
            );
        }
        Ok(result)
    }

    /// `country`/`language` variables: overrides first, then storefront i18n.
    fn in_context(&self, ctx: &RequestContext) -> Map<String, Value> {
        let i18n = self.options.storefront.i18n();
        let params = ctx.params();

        let mut variables = Map::new();
        variables.insert(
            "country".into(),
            json!(params.country.as_deref().unwrap_or(&i18n.country)),
        );
        variables.insert(
            "language".into(),
            json!(params.language.as_deref().unwrap_or(&i18n.language)),
        );
        variables
    }
}

fn require_cart_id(action: ActionName, ctx: &RequestContext) -> Result<String> {
    ctx.cart_id()
        .map(str::to_string)
        .ok_or(CartError::MissingCartId(action.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storefront::I18n;
    use crate::error::BoxError;
    use crate::handler::CartOptionalParams;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records operations and answers every mutation with a fixed cart.
    struct Recorder {
        i18n: I18n,
        calls: Mutex<Vec<(String, Value)>>,
        cart: Value,
    }

    impl Recorder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                i18n: I18n::new("CA", "FR"),
                calls: Mutex::new(Vec::new()),
                cart: json!({"id": "gid://shopify/Cart/c1-new", "totalQuantity": 1}),
            })
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StorefrontClient for Recorder {
        fn i18n(&self) -> &I18n {
            &self.i18n
        }

        async fn query(&self, document: &str, options: QueryOptions) -> std::result::Result<Value, BoxError> {
            assert_eq!(options.cache, CachePolicy::None);
            self.calls
                .lock()
                .unwrap()
                .push((document.to_string(), options.variables));
            Ok(json!({ "cart": self.cart }))
        }

        async fn mutate(&self, document: &str, options: MutateOptions) -> std::result::Result<Value, BoxError> {
            self.calls
                .lock()
                .unwrap()
                .push((document.to_string(), options.variables));
            let root = document
                .trim_start_matches("mutation ")
                .split('(')
                .next()
                .unwrap()
                .to_string();
            Ok(json!({ root: { "cart": self.cart, "errors": [] } }))
        }
    }

    fn handlers(storefront: Arc<Recorder>) -> DefaultHandlers {
        DefaultHandlers::new(CartQueryOptions::new(storefront))
    }

    #[tokio::test]
    async fn test_update_lines_without_cart_id_fails() {
        let storefront = Recorder::new();
        let handlers = handlers(storefront.clone());

        let err = handlers
            .update_lines(vec![], &RequestContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::MissingCartId("LinesUpdate")));
        assert!(storefront.calls().is_empty());
    }

    #[tokio::test]
    async fn test_every_mutation_but_create_requires_cart_id() {
        let handlers = handlers(Recorder::new());
        let ctx = RequestContext::default();

        for name in ActionName::ALL.into_iter().filter(|a| !a.creates_cart()) {
            let action = CartAction::parse(name, minimal_inputs(name)).unwrap();
            let err = handlers.handle(action, &ctx).await.unwrap_err();
            assert!(matches!(err, CartError::MissingCartId(n) if n == name.as_str()));
        }
    }

    fn minimal_inputs(name: ActionName) -> Map<String, Value> {
        let value = match name {
            ActionName::AttributesUpdateInput => json!({"attributes": []}),
            ActionName::BuyerIdentityUpdate => json!({"buyerIdentity": {}}),
            ActionName::Create => json!({}),
            ActionName::DiscountCodesUpdate => json!({"discountCodes": []}),
            ActionName::LinesAdd | ActionName::LinesUpdate => json!({"lines": []}),
            ActionName::LinesRemove => json!({"lineIds": []}),
            ActionName::NoteUpdate => json!({"note": ""}),
            ActionName::SelectedDeliveryOptionsUpdate => json!({"selectedDeliveryOptions": []}),
            ActionName::MetafieldsSet => json!({"metafields": []}),
            ActionName::MetafieldDelete => json!({"key": "k"}),
        };
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_create_without_cart_id_returns_new_id() {
        let storefront = Recorder::new();
        let handlers = handlers(storefront.clone());

        let result = handlers
            .create(CartInput::default(), &RequestContext::default())
            .await
            .unwrap();

        assert_eq!(result.cart_id(), Some("gid://shopify/Cart/c1-new"));
        let calls = storefront.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.starts_with("mutation cartCreate("));
        assert_eq!(calls[0].1["input"], json!({}));
        assert!(calls[0].1.get("cartId").is_none());
    }

    #[tokio::test]
    async fn test_add_lines_variables() {
        let storefront = Recorder::new();
        let handlers = handlers(storefront.clone());
        let ctx = RequestContext::new(Some("gid://shopify/Cart/c1-123".into()));

        handlers
            .add_lines(vec![CartLineInput::new("gid://shopify/ProductVariant/9").quantity(2)], &ctx)
            .await
            .unwrap();

        let (_, variables) = &storefront.calls()[0];
        assert_eq!(
            variables,
            &json!({
                "cartId": "gid://shopify/Cart/c1-123",
                "lines": [{"merchandiseId": "gid://shopify/ProductVariant/9", "quantity": 2}],
                "country": "CA",
                "language": "FR"
            })
        );
    }

    #[tokio::test]
    async fn test_overrides_beat_cookie_and_i18n() {
        let storefront = Recorder::new();
        let handlers = handlers(storefront.clone());
        let ctx = RequestContext::new(Some("cookie-id".into())).with_params(
            CartOptionalParams::new()
                .cart_id("explicit-id")
                .country("US")
                .language("EN"),
        );

        handlers.update_note("gift".into(), &ctx).await.unwrap();

        let (_, variables) = &storefront.calls()[0];
        assert_eq!(variables["cartId"], "explicit-id");
        assert_eq!(variables["country"], "US");
        assert_eq!(variables["language"], "EN");
        assert_eq!(variables["note"], "gift");
    }

    #[tokio::test]
    async fn test_get_without_cart_id_is_none() {
        let storefront = Recorder::new();
        let handlers = handlers(storefront.clone());

        let cart = handlers
            .get(CartGetParams::default(), &RequestContext::default())
            .await
            .unwrap();

        assert!(cart.is_none());
        assert!(storefront.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_queries_with_line_count() {
        let storefront = Recorder::new();
        let handlers = handlers(storefront.clone());
        let ctx = RequestContext::new(Some("gid://shopify/Cart/c1-new".into()));

        let cart = handlers.get(CartGetParams::default(), &ctx).await.unwrap().unwrap();
        assert_eq!(cart.id, "gid://shopify/Cart/c1-new");

        handlers
            .get(CartGetParams { num_cart_lines: Some(5) }, &ctx)
            .await
            .unwrap();

        let calls = storefront.calls();
        assert!(calls[0].0.starts_with("query CartQuery("));
        assert_eq!(calls[0].1["numCartLines"], DEFAULT_NUM_CART_LINES);
        assert_eq!(calls[1].1["numCartLines"], 5);
    }

    #[tokio::test]
    async fn test_metafields_set_owner_and_cart() {
        let storefront = Recorder::new();
        let handlers = handlers(storefront.clone());
        let ctx = RequestContext::new(Some("gid://shopify/Cart/c1-123".into()));

        let result = handlers
            .set_metafields(
                vec![MetafieldSetInput {
                    key: "public.gift".into(),
                    kind: "boolean".into(),
                    value: "true".into(),
                }],
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(result.cart_id(), Some("gid://shopify/Cart/c1-123"));
        let (_, variables) = &storefront.calls()[0];
        assert_eq!(
            variables["metafields"][0],
            json!({
                "key": "public.gift",
                "type": "boolean",
                "value": "true",
                "ownerId": "gid://shopify/Cart/c1-123"
            })
        );
    }

    #[tokio::test]
    async fn test_metafield_delete_input() {
        let storefront = Recorder::new();
        let handlers = handlers(storefront.clone());
        let ctx = RequestContext::new(Some("gid://shopify/Cart/c1-123".into()));

        handlers.delete_metafield("public.gift".into(), &ctx).await.unwrap();

        let (document, variables) = &storefront.calls()[0];
        assert!(document.starts_with("mutation cartMetafieldDelete("));
        assert_eq!(
            variables["input"],
            json!({"ownerId": "gid://shopify/Cart/c1-123", "key": "public.gift"})
        );
    }

    #[tokio::test]
    async fn test_one_operation_per_call() {
        let storefront = Recorder::new();
        let handlers = handlers(storefront.clone());
        let ctx = RequestContext::new(Some("gid://shopify/Cart/c1-123".into()));

        for name in ActionName::ALL {
            let action = CartAction::parse(name, minimal_inputs(name)).unwrap();
            handlers.handle(action, &ctx).await.unwrap();
        }

        assert_eq!(storefront.calls().len(), ActionName::ALL.len());
    }
}
