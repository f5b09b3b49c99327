use serde::{Deserialize, Serialize};

/// Declares an integer identity newtype assigned by the store.
///
/// Wrapping the raw `i64` keeps product, order, item and customer
/// identities from being mixed up at call sites.
macro_rules! int_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identity from its raw value.
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw integer value.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

int_id!(
    /// Unique identifier for a product.
    ProductId
);

int_id!(
    /// Unique identifier for an order, assigned on creation.
    OrderId
);

int_id!(
    /// Unique identifier for a single order line.
    OrderItemId
);

int_id!(
    /// Identifier of the customer placing an order.
    ///
    /// Zero is never a valid customer.
    CustomerId
);

impl CustomerId {
    /// Returns true if this is the unset (zero) identity.
    pub const fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

/// Money amount in minor currency units (cents) to avoid floating point issues.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a new amount from minor units.
    pub const fn from_minor_units(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Returns the amount in minor units.
    pub const fn minor_units(&self) -> i64 {
        self.0
    }
}
