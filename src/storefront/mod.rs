//! Storefront module - the backend client contract.
//!
//! The cart never talks HTTP itself. It hands an operation document and
//! variables to a [`StorefrontClient`] and reads the returned `data` object.
//! Transport, authentication, caching and retries belong to the client.
//!
//! Mutation payloads are read into [`CartQueryResult`]: the cart plus any
//! `userErrors` the backend reported. User errors are soft failures and are
//! returned to the caller, never raised.

mod result;

pub use result::{Cart, CartQueryResult, UserError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BoxError;

/// Default country and language for storefront operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct I18n {
    pub country: String,
    pub language: String,
}

impl I18n {
    pub fn new(country: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            language: language.into(),
        }
    }
}

/// Caching the client may apply to a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Client's own default.
    #[default]
    Default,
    /// Never cache; used for cart reads.
    None,
}

/// Options for [`StorefrontClient::query`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub variables: Value,
    pub cache: CachePolicy,
}

/// Options for [`StorefrontClient::mutate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutateOptions {
    pub variables: Value,
}

/// Client for the storefront API.
///
/// Implementations must be safe to share across concurrent requests.
/// Both methods return the operation's `data` object.
#[async_trait]
pub trait StorefrontClient: Send + Sync {
    /// Country and language used when a call does not override them.
    fn i18n(&self) -> &I18n;

    /// Run a read-only operation.
    async fn query(&self, document: &str, options: QueryOptions) -> Result<Value, BoxError>;

    /// Run a mutation.
    async fn mutate(&self, document: &str, options: MutateOptions) -> Result<Value, BoxError>;
}
