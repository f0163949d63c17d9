//! The closed set of built-in cart action names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Name of a built-in cart action.
///
/// Custom actions are plain strings registered on the
/// [`HandlerRegistry`](crate::handler::HandlerRegistry); this enum only
/// covers the actions that have a default handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionName {
    AttributesUpdateInput,
    BuyerIdentityUpdate,
    Create,
    DiscountCodesUpdate,
    LinesAdd,
    LinesUpdate,
    LinesRemove,
    NoteUpdate,
    SelectedDeliveryOptionsUpdate,
    MetafieldsSet,
    MetafieldDelete,
}

impl ActionName {
    /// Every built-in action.
    pub const ALL: [ActionName; 11] = [
        ActionName::AttributesUpdateInput,
        ActionName::BuyerIdentityUpdate,
        ActionName::Create,
        ActionName::DiscountCodesUpdate,
        ActionName::LinesAdd,
        ActionName::LinesUpdate,
        ActionName::LinesRemove,
        ActionName::NoteUpdate,
        ActionName::SelectedDeliveryOptionsUpdate,
        ActionName::MetafieldsSet,
        ActionName::MetafieldDelete,
    ];

    /// Wire name of the action.
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionName::AttributesUpdateInput => "AttributesUpdateInput",
            ActionName::BuyerIdentityUpdate => "BuyerIdentityUpdate",
            ActionName::Create => "Create",
            ActionName::DiscountCodesUpdate => "DiscountCodesUpdate",
            ActionName::LinesAdd => "LinesAdd",
            ActionName::LinesUpdate => "LinesUpdate",
            ActionName::LinesRemove => "LinesRemove",
            ActionName::NoteUpdate => "NoteUpdate",
            ActionName::SelectedDeliveryOptionsUpdate => "SelectedDeliveryOptionsUpdate",
            ActionName::MetafieldsSet => "MetafieldsSet",
            ActionName::MetafieldDelete => "MetafieldDelete",
        }
    }

    /// Whether the action can run without an existing cart.
    #[inline]
    pub const fn creates_cart(self) -> bool {
        matches!(self, ActionName::Create)
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a built-in action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotBuiltIn;

impl FromStr for ActionName {
    type Err = NotBuiltIn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or(NotBuiltIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_names() {
        for name in ActionName::ALL {
            assert_eq!(name.as_str().parse::<ActionName>(), Ok(name));
            assert_eq!(name.to_string(), name.as_str());
        }
    }

    #[test]
    fn test_custom_names_are_not_built_in() {
        assert_eq!("CustomEditInPlace".parse::<ActionName>(), Err(NotBuiltIn));
        assert_eq!("linesadd".parse::<ActionName>(), Err(NotBuiltIn));
        assert_eq!("".parse::<ActionName>(), Err(NotBuiltIn));
    }

    #[test]
    fn test_only_create_creates_cart() {
        let creating: Vec<_> = ActionName::ALL.into_iter().filter(|a| a.creates_cart()).collect();
        assert_eq!(creating, vec![ActionName::Create]);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&ActionName::SelectedDeliveryOptionsUpdate).unwrap();
        assert_eq!(json, r#""SelectedDeliveryOptionsUpdate""#);
    }
}
