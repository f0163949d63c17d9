//! Operation documents for the default cart handlers.
//!
//! Every mutation selects `cart { ...CartApiMutation }` and aliases
//! `userErrors` as `errors`, so its payload reads straight into
//! [`CartQueryResult`](crate::storefront::CartQueryResult). Metafield
//! mutations select no cart.

use crate::action::ActionName;

/// Default selection for carts returned by mutations.
pub const DEFAULT_CART_MUTATE_FRAGMENT: &str = r#"
  fragment CartApiMutation on Cart {
    id
    totalQuantity
  }
"#;

/// Default selection for the cart read path.
pub const DEFAULT_CART_QUERY_FRAGMENT: &str = r#"
  fragment CartApiQuery on Cart {
    id
    checkoutUrl
    totalQuantity
    buyerIdentity {
      countryCode
      customer {
        id
        email
        firstName
        lastName
        displayName
      }
      email
      phone
    }
    lines(first: $numCartLines) {
      edges {
        node {
          id
          quantity
          attributes {
            key
            value
          }
          cost {
            totalAmount {
              ...CartApiMoney
            }
            amountPerQuantity {
              ...CartApiMoney
            }
            compareAtAmountPerQuantity {
              ...CartApiMoney
            }
          }
          merchandise {
            ... on ProductVariant {
              id
              availableForSale
              compareAtPrice {
                ...CartApiMoney
              }
              price {
                ...CartApiMoney
              }
              requiresShipping
              title
              image {
                id
                url
                altText
                width
                height
              }
              product {
                handle
                title
                id
              }
              selectedOptions {
                name
                value
              }
            }
          }
        }
      }
    }
    cost {
      subtotalAmount {
        ...CartApiMoney
      }
      totalAmount {
        ...CartApiMoney
      }
      totalDutyAmount {
        ...CartApiMoney
      }
      totalTaxAmount {
        ...CartApiMoney
      }
    }
    note
    attributes {
      key
      value
    }
    discountCodes {
      code
      applicable
    }
  }

  fragment CartApiMoney on MoneyV2 {
    currencyCode
    amount
  }
"#;

const USER_ERRORS: &str = r#"
      errors: userErrors {
        message
        field
        code
      }"#;

/// Root field of the payload returned by `action`'s mutation.
pub const fn mutation_root(action: ActionName) -> &'static str {
    match action {
        ActionName::AttributesUpdateInput => "cartAttributesUpdate",
        ActionName::BuyerIdentityUpdate => "cartBuyerIdentityUpdate",
        ActionName::Create => "cartCreate",
        ActionName::DiscountCodesUpdate => "cartDiscountCodesUpdate",
        ActionName::LinesAdd => "cartLinesAdd",
        ActionName::LinesUpdate => "cartLinesUpdate",
        ActionName::LinesRemove => "cartLinesRemove",
        ActionName::NoteUpdate => "cartNoteUpdate",
        ActionName::SelectedDeliveryOptionsUpdate => "cartSelectedDeliveryOptionsUpdate",
        ActionName::MetafieldsSet => "cartMetafieldsSet",
        ActionName::MetafieldDelete => "cartMetafieldDelete",
    }
}

/// Mutation document for `action`, selecting carts with `cart_fragment`.
///
/// `cart_fragment` must define `CartApiMutation on Cart`.
pub fn mutation(action: ActionName, cart_fragment: &str) -> String {
    let name = mutation_root(action);
    let (params, call) = match action {
        ActionName::AttributesUpdateInput => (
            "$cartId: ID!\n    $attributes: [AttributeInput!]!",
            "cartAttributesUpdate(cartId: $cartId, attributes: $attributes)",
        ),
        ActionName::BuyerIdentityUpdate => (
            "$cartId: ID!\n    $buyerIdentity: CartBuyerIdentityInput!",
            "cartBuyerIdentityUpdate(cartId: $cartId, buyerIdentity: $buyerIdentity)",
        ),
        ActionName::Create => (
            "$input: CartInput!",
            "cartCreate(input: $input)",
        ),
        ActionName::DiscountCodesUpdate => (
            "$cartId: ID!\n    $discountCodes: [String!]",
            "cartDiscountCodesUpdate(cartId: $cartId, discountCodes: $discountCodes)",
        ),
        ActionName::LinesAdd => (
            "$cartId: ID!\n    $lines: [CartLineInput!]!",
            "cartLinesAdd(cartId: $cartId, lines: $lines)",
        ),
        ActionName::LinesUpdate => (
            "$cartId: ID!\n    $lines: [CartLineUpdateInput!]!",
            "cartLinesUpdate(cartId: $cartId, lines: $lines)",
        ),
        ActionName::LinesRemove => (
            "$cartId: ID!\n    $lineIds: [ID!]!",
            "cartLinesRemove(cartId: $cartId, lineIds: $lineIds)",
        ),
        ActionName::NoteUpdate => (
            "$cartId: ID!\n    $note: String",
            "cartNoteUpdate(cartId: $cartId, note: $note)",
        ),
        ActionName::SelectedDeliveryOptionsUpdate => (
            "$cartId: ID!\n    $selectedDeliveryOptions: [CartSelectedDeliveryOptionInput!]!",
            "cartSelectedDeliveryOptionsUpdate(cartId: $cartId, selectedDeliveryOptions: $selectedDeliveryOptions)",
        ),
        ActionName::MetafieldsSet => {
            return metafield_mutation(
                name,
                "$metafields: [CartMetafieldsSetInput!]!",
                "cartMetafieldsSet(metafields: $metafields)",
            )
        }
        ActionName::MetafieldDelete => {
            return metafield_mutation(
                name,
                "$input: CartMetafieldDeleteInput!",
                "cartMetafieldDelete(input: $input)",
            )
        }
    };

    format!(
        "mutation {name}(\n    {params}\n    $country: CountryCode = ZZ\n    $language: LanguageCode\n  ) @inContext(country: $country, language: $language) {{\n    {call} {{\n      cart {{\n        ...CartApiMutation\n      }}{USER_ERRORS}\n    }}\n  }}\n{cart_fragment}"
    )
}

fn metafield_mutation(name: &str, params: &str, call: &str) -> String {
    format!(
        "mutation {name}(\n    {params}\n    $country: CountryCode = ZZ\n    $language: LanguageCode\n  ) @inContext(country: $country, language: $language) {{\n    {call} {{{USER_ERRORS}\n    }}\n  }}\n"
    )
}

/// Cart read query, selecting the cart with `cart_fragment`.
///
/// `cart_fragment` must define `CartApiQuery on Cart`.
pub fn cart_query(cart_fragment: &str) -> String {
    format!(
        "query CartQuery(\n    $cartId: ID!\n    $numCartLines: Int = 100\n    $country: CountryCode = ZZ\n    $language: LanguageCode\n  ) @inContext(country: $country, language: $language) {{\n    cart(id: $cartId) {{\n      ...CartApiQuery\n    }}\n  }}\n{cart_fragment}"
    )
}
