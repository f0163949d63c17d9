//! Handler registry for routing cart actions by name.
//!
//! The registry holds the [`DefaultHandlers`] for the built-in actions and
//! a map of custom handlers keyed by action name. Custom handlers win: a
//! custom handler registered under a built-in name replaces that default
//! entirely. Names found in neither are unknown.
//!
//! Build the registry once per process and share it behind an `Arc`.
//!
//! # Example
//!
//! ```ignore
//! use storefront_cart::handler::{DefaultHandlers, HandlerRegistry, RequestContext};
//!
//! let mut registry = HandlerRegistry::new(defaults.clone());
//!
//! // Custom action composed from two default handlers.
//! let edit = defaults.clone();
//! registry.register("CustomEditInPlace", move |input: EditInPlace, ctx: RequestContext| {
//!     let edit = edit.clone();
//!     async move {
//!         edit.add_lines(input.add_lines, &ctx).await?;
//!         edit.remove_lines(input.remove_lines, &ctx).await
//!     }
//! });
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{DefaultHandlers, RequestContext};
use crate::action::{ActionName, CartAction};
use crate::codec::CartActionInput;
use crate::error::{CartError, Result};
use crate::storefront::CartQueryResult;

/// Result type for handler functions.
pub type HandlerResult = Result<CartQueryResult>;

/// Boxed future for handler results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for custom handler functions.
pub trait Handler: Send + Sync + 'static {
    /// Handle an action with its untyped inputs.
    fn call(&self, inputs: Map<String, Value>, ctx: RequestContext) -> BoxFuture<'static, HandlerResult>;
}

/// Wrapper that deserializes inputs before calling the handler.
///
/// Use `T = Map<String, Value>` to receive the inputs untouched.
pub struct TypedHandler<F, T, Fut>
where
    F: Fn(T, RequestContext) -> Fut + Send + Sync + 'static,
    T: DeserializeOwned + Send + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    action: String,
    handler: F,
    _phantom: PhantomData<fn(T) -> Fut>,
}

impl<F, T, Fut> TypedHandler<F, T, Fut>
where
    F: Fn(T, RequestContext) -> Fut + Send + Sync + 'static,
    T: DeserializeOwned + Send + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    /// Create a new typed handler for `action`.
    pub fn new(action: impl Into<String>, handler: F) -> Self {
        Self {
            action: action.into(),
            handler,
            _phantom: PhantomData,
        }
    }
}

impl<F, T, Fut> Handler for TypedHandler<F, T, Fut>
where
    F: Fn(T, RequestContext) -> Fut + Send + Sync + 'static,
    T: DeserializeOwned + Send + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, inputs: Map<String, Value>, ctx: RequestContext) -> BoxFuture<'static, HandlerResult> {
        let parsed: T = match serde_json::from_value(Value::Object(inputs)) {
            Ok(v) => v,
            Err(source) => {
                let err = CartError::InvalidInputs {
                    action: self.action.clone(),
                    source,
                };
                return Box::pin(async move { Err(err) });
            }
        };

        Box::pin((self.handler)(parsed, ctx))
    }
}

/// Where a registry sends an action.
pub enum Route<'a> {
    /// A caller-supplied handler.
    Custom(&'a Arc<dyn Handler>),
    /// The default handler for a built-in action.
    Default(ActionName),
}

/// Registry mapping action names to handlers.
pub struct HandlerRegistry {
    /// Handlers for built-in actions.
    defaults: DefaultHandlers,
    /// Custom handlers by action name; checked first.
    custom: HashMap<String, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    /// Registry with only the default handlers.
    pub fn new(defaults: DefaultHandlers) -> Self {
        Self {
            defaults,
            custom: HashMap::new(),
        }
    }

    /// Merge default handlers with custom ones. Custom handlers win by name.
    pub fn build(defaults: DefaultHandlers, custom: HashMap<String, Arc<dyn Handler>>) -> Self {
        for name in custom.keys() {
            if name.parse::<ActionName>().is_ok() {
                tracing::debug!("Custom handler overrides default action {}", name);
            }
        }

        Self { defaults, custom }
    }

    /// Register a custom handler taking typed inputs.
    ///
    /// # Arguments
    ///
    /// * `name` - Action name; a built-in name overrides the default
    /// * `handler` - Handler function that takes (T, RequestContext)
    pub fn register<F, T, Fut>(&mut self, name: &str, handler: F)
    where
        F: Fn(T, RequestContext) -> Fut + Send + Sync + 'static,
        T: DeserializeOwned + Send + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.register_handler(name, Arc::new(TypedHandler::new(name, handler)));
    }

    /// Register an already-built custom handler.
    pub fn register_handler(&mut self, name: &str, handler: Arc<dyn Handler>) {
        self.custom.insert(name.to_string(), handler);
    }

    /// Find where `name` is routed.
    pub fn route(&self, name: &str) -> Option<Route<'_>> {
        if let Some(handler) = self.custom.get(name) {
            return Some(Route::Custom(handler));
        }
        name.parse::<ActionName>().ok().map(Route::Default)
    }

    /// Whether `name` has a handler.
    pub fn contains(&self, name: &str) -> bool {
        self.route(name).is_some()
    }

    /// Every routable action name, sorted.
    pub fn action_names(&self) -> Vec<String> {
        let mut names: Vec<String> = ActionName::ALL
            .iter()
            .map(|name| name.as_str().to_string())
            .filter(|name| !self.custom.contains_key(name))
            .chain(self.custom.keys().cloned())
            .collect();
        names.sort();
        names
    }

    /// The default handlers.
    pub fn defaults(&self) -> &DefaultHandlers {
        &self.defaults
    }

    /// Route a decoded action to its handler and run it.
    ///
    /// Built-in actions are validated against their typed shape first.
    pub async fn call(&self, input: CartActionInput, ctx: RequestContext) -> HandlerResult {
        let (name, inputs) = input.into_parts();

        match self.route(&name) {
            Some(Route::Custom(handler)) => handler.call(inputs, ctx).await,
            Some(Route::Default(action)) => {
                let action = CartAction::parse(action, inputs)?;
                self.defaults.handle(action, &ctx).await
            }
            None => Err(CartError::UnknownAction(name)),
        }
    }

    /// Run an already-typed built-in action.
    ///
    /// A custom handler registered under the action's name still wins and
    /// receives the action's inputs in their wire form.
    pub async fn run(&self, action: CartAction, ctx: RequestContext) -> HandlerResult {
        match self.route(action.name().as_str()) {
            Some(Route::Custom(handler)) => {
                let (_, inputs) = action.to_input()?.into_parts();
                handler.call(inputs, ctx).await
            }
            _ => self.defaults.handle(action, &ctx).await,
        }
    }
}
