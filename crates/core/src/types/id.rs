//! Record ids.
//!
//! Account ids and address ids are different types, so one cannot be passed
//! where the other is expected.

/// Declare an id newtype over `$inner`.
///
/// The type is `Copy`, ordered, hashable and serializes as the bare inner
/// value. `Display`/`FromStr` delegate to the inner type, and `From` works in
/// both directions.
///
/// ```rust
/// # use nexus_accounts_core::define_id;
/// define_id!(CouponId, i64);
///
/// let id: CouponId = "17".parse().unwrap();
/// assert_eq!(id.get(), 17);
/// assert_eq!(i64::from(id), 17);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $inner:ty) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            #[must_use]
            pub const fn new(id: $inner) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn get(&self) -> $inner {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = <$inner as ::core::str::FromStr>::Err;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse::<$inner>().map(Self)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Account ids are UUIDs assigned by the auth service.
define_id!(UserId, ::uuid::Uuid);
// Address ids are assigned by the `user_addresses` identity column.
define_id!(AddressId, i64);

impl UserId {
    /// Generate a fresh random account id.
    ///
    /// Real ids come from the auth service; this exists for fakes and tests.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}
