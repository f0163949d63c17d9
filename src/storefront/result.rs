//! Results returned by cart operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CartError, Result};

/// A cart as selected by the operation's fragment.
///
/// Only `id` is guaranteed; everything else the fragment selected is kept
/// in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Cart {
    /// Cart with only an id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }
}

/// Validation error reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserError {
    pub message: String,
    #[serde(default)]
    pub field: Option<Vec<String>>,
    #[serde(default)]
    pub code: Option<String>,
}

/// Outcome of a cart mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartQueryResult {
    #[serde(default)]
    pub cart: Option<Cart>,
    /// Soft failures; a non-empty list does not make the call an error.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<UserError>,
}

impl CartQueryResult {
    /// Result for `cart` with no user errors.
    pub fn from_cart(cart: Cart) -> Self {
        Self {
            cart: Some(cart),
            errors: Vec::new(),
        }
    }

    /// Read the payload under `root` from an operation's `data` object.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Backend`] if `root` is missing or null, and
    /// [`CartError::Json`] if the payload has the wrong shape.
    pub fn from_data(mut data: Value, root: &str) -> Result<Self> {
        match data.get_mut(root).map(Value::take) {
            Some(Value::Null) | None => Err(CartError::Backend(
                format!("response has no `{root}` payload").into(),
            )),
            Some(payload) => Ok(serde_json::from_value(payload)?),
        }
    }

    /// Id of the returned cart, if any.
    pub fn cart_id(&self) -> Option<&str> {
        self.cart.as_ref().map(|cart| cart.id.as_str())
    }

    /// Whether the backend reported validation errors.
    pub fn has_user_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<UserError>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<UserError>>::deserialize(deserializer)?.unwrap_or_default())
}
