//! Action module - built-in cart actions and their typed payloads.
//!
//! Provides:
//! - [`ActionName`] - the closed set of actions with a default handler
//! - [`CartAction`] - one variant per built-in action, carrying validated inputs
//! - storefront input objects ([`CartLineInput`], [`CartInput`], ...)
//!
//! Inputs arrive untyped from the [form codec](crate::codec). Built-in
//! actions are validated here before reaching a default handler; custom
//! actions skip this step and get the raw inputs.

mod inputs;
mod name;

pub use inputs::{
    AttributeInput, CartBuyerIdentityInput, CartInput, CartLineInput, CartLineUpdateInput,
    CartSelectedDeliveryOptionInput, MetafieldSetInput,
};
pub use name::{ActionName, NotBuiltIn};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec::CartActionInput;
use crate::error::{CartError, Result};

/// A built-in cart action with validated inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all_fields = "camelCase")]
pub enum CartAction {
    AttributesUpdateInput {
        attributes: Vec<AttributeInput>,
    },
    BuyerIdentityUpdate {
        buyer_identity: CartBuyerIdentityInput,
    },
    Create {
        #[serde(default)]
        input: CartInput,
    },
    DiscountCodesUpdate {
        discount_codes: Vec<String>,
    },
    LinesAdd {
        lines: Vec<CartLineInput>,
    },
    LinesUpdate {
        lines: Vec<CartLineUpdateInput>,
    },
    LinesRemove {
        line_ids: Vec<String>,
    },
    NoteUpdate {
        note: String,
    },
    SelectedDeliveryOptionsUpdate {
        selected_delivery_options: Vec<CartSelectedDeliveryOptionInput>,
    },
    MetafieldsSet {
        metafields: Vec<MetafieldSetInput>,
    },
    MetafieldDelete {
        key: String,
    },
}

impl CartAction {
    /// Validate untyped inputs against the shape of `name`.
    ///
    /// Unknown extra inputs are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidInputs`] if a required input is missing
    /// or has the wrong type.
    pub fn parse(name: ActionName, mut inputs: Map<String, Value>) -> Result<Self> {
        inputs.insert("action".to_string(), Value::String(name.as_str().to_string()));

        serde_json::from_value(Value::Object(inputs)).map_err(|source| CartError::InvalidInputs {
            action: name.to_string(),
            source,
        })
    }

    /// Name of this action.
    pub fn name(&self) -> ActionName {
        match self {
            CartAction::AttributesUpdateInput { .. } => ActionName::AttributesUpdateInput,
            CartAction::BuyerIdentityUpdate { .. } => ActionName::BuyerIdentityUpdate,
            CartAction::Create { .. } => ActionName::Create,
            CartAction::DiscountCodesUpdate { .. } => ActionName::DiscountCodesUpdate,
            CartAction::LinesAdd { .. } => ActionName::LinesAdd,
            CartAction::LinesUpdate { .. } => ActionName::LinesUpdate,
            CartAction::LinesRemove { .. } => ActionName::LinesRemove,
            CartAction::NoteUpdate { .. } => ActionName::NoteUpdate,
            CartAction::SelectedDeliveryOptionsUpdate { .. } => {
                ActionName::SelectedDeliveryOptionsUpdate
            }
            CartAction::MetafieldsSet { .. } => ActionName::MetafieldsSet,
            CartAction::MetafieldDelete { .. } => ActionName::MetafieldDelete,
        }
    }

    /// Convert into the untyped form representation, e.g. to build a form.
    pub fn to_input(&self) -> Result<CartActionInput> {
        match serde_json::to_value(self)? {
            Value::Object(inputs) => Ok(CartActionInput::from_parts(self.name().as_str(), inputs)),
            other => Err(CartError::MalformedFormInput(format!(
                "expected an object for {}, got {other}",
                self.name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_lines_add() {
        let action = CartAction::parse(
            ActionName::LinesAdd,
            object(json!({"lines": [{"merchandiseId": "gid://shopify/ProductVariant/1", "quantity": 3}]})),
        )
        .unwrap();

        assert_eq!(
            action,
            CartAction::LinesAdd {
                lines: vec![CartLineInput::new("gid://shopify/ProductVariant/1").quantity(3)],
            }
        );
        assert_eq!(action.name(), ActionName::LinesAdd);
    }

    #[test]
    fn test_parse_tolerates_extra_inputs() {
        let action = CartAction::parse(
            ActionName::LinesAdd,
            object(json!({"lines": [], "test": "test"})),
        )
        .unwrap();

        assert_eq!(action, CartAction::LinesAdd { lines: vec![] });
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let action = CartAction::parse(
            ActionName::LinesRemove,
            object(json!({"lineIds": ["gid://shopify/CartLine/1"]})),
        )
        .unwrap();
        assert_eq!(
            action,
            CartAction::LinesRemove {
                line_ids: vec!["gid://shopify/CartLine/1".to_string()]
            }
        );

        let action = CartAction::parse(
            ActionName::DiscountCodesUpdate,
            object(json!({"discountCodes": ["SAVE10"]})),
        )
        .unwrap();
        assert_eq!(action.name(), ActionName::DiscountCodesUpdate);
    }

    #[test]
    fn test_create_inputs_are_optional() {
        let action = CartAction::parse(ActionName::Create, Map::new()).unwrap();
        assert_eq!(action, CartAction::Create { input: CartInput::default() });
    }

    #[test]
    fn test_parse_invalid_inputs() {
        let err = CartAction::parse(ActionName::NoteUpdate, object(json!({"note": 7}))).unwrap_err();
        assert!(matches!(err, CartError::InvalidInputs { ref action, .. } if action == "NoteUpdate"));
        assert!(err.is_client_error());

        let err = CartAction::parse(ActionName::LinesUpdate, Map::new()).unwrap_err();
        assert!(err.to_string().contains("lines"));
    }

    #[test]
    fn test_to_input_roundtrip() {
        let action = CartAction::MetafieldsSet {
            metafields: vec![MetafieldSetInput {
                key: "public.gift".into(),
                kind: "boolean".into(),
                value: "true".into(),
            }],
        };

        let input = action.to_input().unwrap();
        assert_eq!(input.action(), "MetafieldsSet");
        assert!(!input.inputs().contains_key("action"));

        let (name, inputs) = input.into_parts();
        let parsed = CartAction::parse(name.parse().unwrap(), inputs).unwrap();
        assert_eq!(parsed, action);
    }
}
