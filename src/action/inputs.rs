//! Storefront input objects carried by cart actions.
//!
//! Field names follow the storefront API (camelCase on the wire). Optional
//! fields are omitted from mutation variables when unset.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A key/value attribute on a cart or cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInput {
    pub key: String,
    pub value: String,
}

/// A line to add to a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    pub merchandise_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_plan_id: Option<String>,
}

impl CartLineInput {
    /// Line for one unit of `merchandise_id`.
    pub fn new(merchandise_id: impl Into<String>) -> Self {
        Self {
            merchandise_id: merchandise_id.into(),
            quantity: None,
            attributes: None,
            selling_plan_id: None,
        }
    }

    /// Set the quantity.
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// An update to an existing cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineUpdateInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchandise_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_plan_id: Option<String>,
}

/// Buyer identity associated with a cart.
///
/// `delivery_address_preferences` is forwarded verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBuyerIdentityInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address_preferences: Option<Value>,
}

/// Delivery option chosen for one delivery group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSelectedDeliveryOptionInput {
    pub delivery_group_id: String,
    pub delivery_option_handle: String,
}

/// A metafield to set on a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldSetInput {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Initial contents of a new cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<CartLineInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_identity: Option<CartBuyerIdentityInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_codes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metafields: Option<Vec<MetafieldSetInput>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_line_input_omits_unset_fields() {
        let line = CartLineInput::new("gid://shopify/ProductVariant/1").quantity(2);
        assert_eq!(
            serde_json::to_value(&line).unwrap(),
            json!({"merchandiseId": "gid://shopify/ProductVariant/1", "quantity": 2})
        );
    }

    #[test]
    fn test_metafield_type_is_renamed() {
        let metafield: MetafieldSetInput = serde_json::from_value(json!({
            "key": "public.gift",
            "type": "boolean",
            "value": "true"
        }))
        .unwrap();

        assert_eq!(metafield.kind, "boolean");
        assert_eq!(serde_json::to_value(&metafield).unwrap()["type"], "boolean");
    }

    #[test]
    fn test_empty_cart_input_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(CartInput::default()).unwrap(), json!({}));
    }
}
