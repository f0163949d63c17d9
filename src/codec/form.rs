//! Cart form field encoding.
//!
//! The value of [`CART_FORM_INPUT`] is `{"action": <name>, ...inputs}`.
//! Encoding flattens [`CartActionInput::inputs`] next to `action`; decoding
//! splits them apart again. Object equality, not byte equality, is the
//! round-trip contract.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CartError, Result};

/// Name of the only form field the cart protocol reads.
pub const CART_FORM_INPUT: &str = "cartFormInput";

/// Key reserved for the action name inside the encoded object.
const ACTION_KEY: &str = "action";

/// A decoded cart form submission.
///
/// `inputs` never contains an `action` key; it is reserved for the action
/// name on the wire and is dropped if supplied as an input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartActionInput {
    action: String,
    #[serde(flatten)]
    inputs: Map<String, Value>,
}

impl CartActionInput {
    /// Create an input for `action` with no inputs.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            inputs: Map::new(),
        }
    }

    /// Create an input from an action name and an inputs object.
    pub fn from_parts(action: impl Into<String>, mut inputs: Map<String, Value>) -> Self {
        inputs.remove(ACTION_KEY);
        Self {
            action: action.into(),
            inputs,
        }
    }

    /// Add one input value.
    pub fn with_input(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != ACTION_KEY {
            self.inputs.insert(key, value);
        }
        self
    }

    /// Action name.
    #[inline]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Action inputs, untyped.
    #[inline]
    pub fn inputs(&self) -> &Map<String, Value> {
        &self.inputs
    }

    /// Split into action name and inputs.
    pub fn into_parts(self) -> (String, Map<String, Value>) {
        (self.action, self.inputs)
    }
}

/// Read access to submitted form fields.
///
/// Mirrors the `has`/`get` lookups of a parsed form body. Implemented for
/// the map and pair-list shapes that form parsers usually produce.
pub trait FormData {
    /// Value of the first field named `key`.
    fn get(&self, key: &str) -> Option<&str>;

    /// Whether a field named `key` is present with a non-empty value.
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }
}

impl FormData for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

impl FormData for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

impl FormData for [(String, String)] {
    fn get(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

impl FormData for Vec<(String, String)> {
    fn get(&self, key: &str) -> Option<&str> {
        FormData::get(self.as_slice(), key)
    }
}

/// Encoder/decoder for the cart form field.
pub struct FormCodec;

impl FormCodec {
    /// Encode an action and its inputs into the form field value.
    ///
    /// # Errors
    ///
    /// Returns error if an input value cannot be serialized.
    pub fn encode(input: &CartActionInput) -> Result<String> {
        Ok(serde_json::to_string(input)?)
    }

    /// Encode into a `(field name, field value)` pair ready for a form body.
    pub fn form_field(input: &CartActionInput) -> Result<(&'static str, String)> {
        Ok((CART_FORM_INPUT, Self::encode(input)?))
    }

    /// Decode the cart action from submitted form data.
    ///
    /// # Errors
    ///
    /// - [`CartError::MissingFormInput`] if the field is absent or empty.
    /// - [`CartError::MalformedFormInput`] if the value is not a JSON object
    ///   with a non-empty string `action`.
    pub fn decode<F: FormData + ?Sized>(form: &F) -> Result<CartActionInput> {
        if !form.has(CART_FORM_INPUT) {
            return Err(CartError::MissingFormInput(CART_FORM_INPUT));
        }
        let raw = form
            .get(CART_FORM_INPUT)
            .ok_or(CartError::MissingFormInput(CART_FORM_INPUT))?;

        Self::decode_value(raw)
    }

    /// Decode a raw field value.
    pub fn decode_value(raw: &str) -> Result<CartActionInput> {
        let input: CartActionInput = serde_json::from_str(raw)
            .map_err(|e| CartError::MalformedFormInput(e.to_string()))?;

        if input.action.is_empty() {
            return Err(CartError::MalformedFormInput(
                "`action` must not be empty".to_string(),
            ));
        }

        Ok(input)
    }
}
