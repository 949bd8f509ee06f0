//! Entity IDs.
//!
//! `ProductId` and `OrderId` both wrap the store's integer key but are
//! distinct types, so one can never stand in for the other.

/// Declare an `i32`-backed entity ID.
///
/// The generated type serializes as a bare integer and offers `new`,
/// `as_i32` and `is_assigned`, plus conversions to and from `i32`.
///
/// ```rust
/// use stockroom_core::{OrderId, ProductId};
///
/// let product = ProductId::new(3);
/// let order = OrderId::from(3);
/// assert_eq!(product.as_i32(), i32::from(order));
/// assert!(product.is_assigned());
/// ```
///
/// Equal values of different ID types still do not mix:
///
/// ```compile_fail
/// use stockroom_core::{OrderId, ProductId};
///
/// let order = OrderId::new(3);
/// let _: ProductId = order;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }

            /// Whether a store has assigned this ID (store IDs are positive).
            #[must_use]
            pub const fn is_assigned(&self) -> bool {
                self.0 > 0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_conversion() {
        let id = ProductId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(i32::from(id), 42);
        assert_eq!(ProductId::from(42), id);
    }

    #[test]
    fn test_id_is_assigned() {
        assert!(OrderId::new(1).is_assigned());
        assert!(!OrderId::new(0).is_assigned());
        assert!(!OrderId::new(-3).is_assigned());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&OrderId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderId::new(7));
    }
}
