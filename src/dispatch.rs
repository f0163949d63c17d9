//! Dispatcher - from submitted form to handler result.
//!
//! One dispatch per request, strictly in order:
//! 1. decode the cart form field
//! 2. look up the action in the registry
//! 3. invoke the handler with the request's [`RequestContext`]
//! 4. write the resolved cart id back as a cookie
//!
//! [`Dispatcher::dispatch`] stops after step 3 and returns a [`Dispatched`]
//! value; step 4 is [`Dispatched::write_cart_id`]. [`Dispatcher::respond`]
//! runs all four. Failures propagate unchanged and nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! let dispatcher = Dispatcher::new(registry, CartIdStore::new());
//!
//! let mut response_headers = HeaderMap::new();
//! let result = dispatcher
//!     .respond(&form, &request_headers, &mut response_headers, CartOptionalParams::new())
//!     .await?;
//! ```

use std::sync::Arc;

use http::HeaderMap;

use crate::codec::{FormCodec, FormData};
use crate::cookie::CartIdStore;
use crate::error::Result;
use crate::handler::{CartOptionalParams, HandlerRegistry, RequestContext};
use crate::storefront::CartQueryResult;

/// A completed dispatch whose cart id has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    /// Decoded action name.
    pub action: String,
    /// Handler result, including any user errors.
    pub result: CartQueryResult,
    /// Cart id from the result, else the id resolved before the call.
    pub cart_id: Option<String>,
}

impl Dispatched {
    /// Write the cart id cookie into `response_headers`.
    ///
    /// Writes even when the id is unchanged so the cookie is refreshed.
    /// Does nothing when no cart id resolved.
    pub fn write_cart_id(&self, store: &CartIdStore, response_headers: &mut HeaderMap) -> Result<()> {
        match &self.cart_id {
            Some(cart_id) => store.set_cart_id(cart_id, response_headers),
            None => {
                tracing::debug!("No cart id after {}, cookie not written", self.action);
                Ok(())
            }
        }
    }

    /// Drop the bookkeeping and keep the handler result.
    pub fn into_result(self) -> CartQueryResult {
        self.result
    }
}

/// Routes decoded cart forms to handlers.
///
/// Cheap to clone; clones share the registry.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<HandlerRegistry>,
    store: CartIdStore,
}

impl Dispatcher {
    /// Create a dispatcher over a shared registry.
    pub fn new(registry: Arc<HandlerRegistry>, store: CartIdStore) -> Self {
        Self { registry, store }
    }

    /// The registry actions are routed through.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// The cookie store used for cart ids.
    pub fn store(&self) -> &CartIdStore {
        &self.store
    }

    /// Decode `form`, run the matching handler and return its outcome.
    ///
    /// The cart id comes from `params` if set, else from the request cookie.
    ///
    /// # Errors
    ///
    /// Codec, lookup and handler errors are returned unchanged.
    pub async fn dispatch<F: FormData + ?Sized>(
        &self,
        form: &F,
        request_headers: &HeaderMap,
        params: CartOptionalParams,
    ) -> Result<Dispatched> {
        let ctx = RequestContext::new(self.store.get_cart_id(request_headers)).with_params(params);
        self.dispatch_with(form, ctx).await
    }

    /// Like [`dispatch`](Self::dispatch) with an already-built context.
    pub async fn dispatch_with<F: FormData + ?Sized>(
        &self,
        form: &F,
        ctx: RequestContext,
    ) -> Result<Dispatched> {
        let input = FormCodec::decode(form)?;
        let action = input.action().to_string();
        let resolved = ctx.cart_id().map(str::to_string);

        tracing::debug!("Dispatching cart action {}", action);

        let result = match self.registry.call(input, ctx).await {
            Ok(result) => result,
            Err(e) => {
                if e.is_client_error() {
                    tracing::debug!("Cart action {} rejected: {}", action, e);
                } else {
                    tracing::error!("Cart action {} failed: {}", action, e);
                }
                return Err(e);
            }
        };

        let cart_id = result.cart_id().map(str::to_string).or(resolved);

        Ok(Dispatched {
            action,
            result,
            cart_id,
        })
    }

    /// Dispatch and write the cart id cookie into `response_headers`.
    pub async fn respond<F: FormData + ?Sized>(
        &self,
        form: &F,
        request_headers: &HeaderMap,
        response_headers: &mut HeaderMap,
        params: CartOptionalParams,
    ) -> Result<CartQueryResult> {
        let dispatched = self.dispatch(form, request_headers, params).await?;
        dispatched.write_cart_id(&self.store, response_headers)?;
        Ok(dispatched.into_result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use http::header::{COOKIE, SET_COOKIE};
    use http::HeaderValue;
    use serde_json::{json, Map, Value};

    use crate::codec::{CartActionInput, CART_FORM_INPUT};
    use crate::error::{BoxError, CartError};
    use crate::handler::{CartQueryOptions, DefaultHandlers, TypedHandler};
    use crate::storefront::{Cart, I18n, MutateOptions, QueryOptions, StorefrontClient};

    /// Echoes the requested cart id back, or issues `c1-new` on create.
    struct Echo {
        i18n: I18n,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StorefrontClient for Echo {
        fn i18n(&self) -> &I18n {
            &self.i18n
        }

        async fn query(&self, _: &str, _: QueryOptions) -> std::result::Result<Value, BoxError> {
            Ok(json!({ "cart": null }))
        }

        async fn mutate(&self, document: &str, options: MutateOptions) -> std::result::Result<Value, BoxError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let id = options.variables["cartId"]
                .as_str()
                .unwrap_or("gid://shopify/Cart/c1-new")
                .to_string();
            let root = document
                .trim_start_matches("mutation ")
                .split('(')
                .next()
                .unwrap()
                .to_string();
            Ok(json!({ root: { "cart": { "id": id }, "errors": [] } }))
        }
    }

    fn dispatcher(custom: HashMap<String, Arc<dyn crate::handler::Handler>>) -> (Dispatcher, Arc<Echo>) {
        let echo = Arc::new(Echo {
            i18n: I18n::new("US", "EN"),
            calls: AtomicUsize::new(0),
        });
        let defaults = DefaultHandlers::new(CartQueryOptions::new(echo.clone()));
        let registry = HandlerRegistry::build(defaults, custom);
        (Dispatcher::new(Arc::new(registry), CartIdStore::new()), echo)
    }

    fn form(input: &CartActionInput) -> HashMap<String, String> {
        HashMap::from([(
            CART_FORM_INPUT.to_string(),
            FormCodec::encode(input).unwrap(),
        )])
    }

    fn with_cookie(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(value));
        headers
    }

    #[tokio::test]
    async fn test_respond_refreshes_unchanged_cart_id() {
        let (dispatcher, _) = dispatcher(HashMap::new());
        let input = CartActionInput::new("NoteUpdate").with_input("note", json!("hi"));
        let mut response = HeaderMap::new();

        let result = dispatcher
            .respond(&form(&input), &with_cookie("cart=c1-123"), &mut response, CartOptionalParams::new())
            .await
            .unwrap();

        assert_eq!(result.cart_id(), Some("gid://shopify/Cart/c1-123"));
        assert_eq!(response.get(SET_COOKIE).unwrap(), "cart=c1-123");
    }

    #[tokio::test]
    async fn test_create_writes_new_cart_id() {
        let (dispatcher, _) = dispatcher(HashMap::new());
        let mut response = HeaderMap::new();

        dispatcher
            .respond(
                &form(&CartActionInput::new("Create")),
                &HeaderMap::new(),
                &mut response,
                CartOptionalParams::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.get(SET_COOKIE).unwrap(), "cart=c1-new");
    }

    #[tokio::test]
    async fn test_unknown_action_never_calls_handler() {
        let (dispatcher, echo) = dispatcher(HashMap::new());
        let mut response = HeaderMap::new();

        let err = dispatcher
            .respond(
                &form(&CartActionInput::new("CustomEditInPlace")),
                &with_cookie("cart=c1-1"),
                &mut response,
                CartOptionalParams::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::UnknownAction(ref a) if a == "CustomEditInPlace"));
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_missing_cart_id_writes_nothing() {
        let (dispatcher, echo) = dispatcher(HashMap::new());
        let input = CartActionInput::new("LinesUpdate").with_input("lines", json!([]));
        let mut response = HeaderMap::new();

        let err = dispatcher
            .respond(&form(&input), &HeaderMap::new(), &mut response, CartOptionalParams::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::MissingCartId("LinesUpdate")));
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
        assert!(response.is_empty());
    }

    #[tokio::test]
    async fn test_explicit_param_overrides_cookie() {
        let (dispatcher, _) = dispatcher(HashMap::new());
        let input = CartActionInput::new("LinesRemove").with_input("lineIds", json!([]));

        let dispatched = dispatcher
            .dispatch(
                &form(&input),
                &with_cookie("cart=c1-cookie"),
                CartOptionalParams::new().cart_id("gid://shopify/Cart/c1-param"),
            )
            .await
            .unwrap();

        assert_eq!(dispatched.action, "LinesRemove");
        assert_eq!(dispatched.cart_id.as_deref(), Some("gid://shopify/Cart/c1-param"));
    }

    #[tokio::test]
    async fn test_resolved_id_used_when_result_has_no_cart() {
        let custom: Arc<dyn crate::handler::Handler> = Arc::new(TypedHandler::new(
            "CustomPing",
            |_: Map<String, Value>, _ctx: RequestContext| async { Ok(CartQueryResult::default()) },
        ));
        let (dispatcher, _) = dispatcher(HashMap::from([("CustomPing".to_string(), custom)]));

        let dispatched = dispatcher
            .dispatch(
                &form(&CartActionInput::new("CustomPing")),
                &with_cookie("cart=c1-9"),
                CartOptionalParams::new(),
            )
            .await
            .unwrap();

        assert_eq!(dispatched.cart_id.as_deref(), Some("gid://shopify/Cart/c1-9"));
    }

    #[tokio::test]
    async fn test_custom_result_id_wins() {
        let custom: Arc<dyn crate::handler::Handler> = Arc::new(TypedHandler::new(
            "LinesAdd",
            |_: Map<String, Value>, _ctx: RequestContext| async {
                Ok(CartQueryResult::from_cart(Cart::with_id("gid://shopify/Cart/c1-other")))
            },
        ));
        let (dispatcher, echo) = dispatcher(HashMap::from([("LinesAdd".to_string(), custom)]));
        let mut response = HeaderMap::new();

        dispatcher
            .respond(
                &form(&CartActionInput::new("LinesAdd")),
                &with_cookie("cart=c1-9"),
                &mut response,
                CartOptionalParams::new(),
            )
            .await
            .unwrap();

        assert_eq!(response.get(SET_COOKIE).unwrap(), "cart=c1-other");
        assert_eq!(echo.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_decode_errors_propagate() {
        let (dispatcher, _) = dispatcher(HashMap::new());
        let empty: HashMap<String, String> = HashMap::new();

        let err = dispatcher
            .dispatch(&empty, &HeaderMap::new(), CartOptionalParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::MissingFormInput(_)));

        let garbled = HashMap::from([(CART_FORM_INPUT.to_string(), "{".to_string())]);
        let err = dispatcher
            .dispatch(&garbled, &HeaderMap::new(), CartOptionalParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::MalformedFormInput(_)));
    }
}
