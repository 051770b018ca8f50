//! Serde support for the id presets.
//!
//! Ids serialize as their native integer representation by default. For
//! storage schemas keyed by a signed 64-bit column, use the [`as_i64`]
//! adapter with `#[serde(with = "shardflake::as_i64")]`.

use ::serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ClassicId, ClusterId, RegionId};

macro_rules! impl_serde_id {
    ($($name:ty),* $(,)?) => {
        $(
            impl Serialize for $name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serializer.serialize_u64(self.to_raw())
                }
            }

            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    u64::deserialize(deserializer).map(Self::from_raw)
                }
            }
        )*
    };
}

impl_serde_id!(ClusterId, ClassicId, RegionId);

/// Serialize and deserialize any [`ShardedId`] through its signed 64-bit
/// view.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use shardflake::RegionId;
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "shardflake::as_i64")]
///     id: RegionId,
/// }
/// ```
pub mod as_i64 {
    use super::{Deserialize, Deserializer, Serializer};
    use crate::ShardedId;

    /// Serialize an id as a non-negative `i64`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, serializer: S) -> Result<S::Ok, S::Error>
    where
        ID: ShardedId,
        S: Serializer,
    {
        serializer.serialize_i64(id.to_i64())
    }

    /// Deserialize an id from its signed 64-bit representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the value
    /// is negative.
    pub fn deserialize<'de, ID, D>(deserializer: D) -> Result<ID, D::Error>
    where
        ID: ShardedId,
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        if raw < 0 {
            return Err(::serde::de::Error::custom("id must be non-negative"));
        }
        Ok(ID::from_raw(raw as u64))
    }
}
