//! Coordination-free, approximately time-ordered 64-bit identifiers.
//!
//! `shardflake` packs a millisecond timestamp delta, one or two shard
//! fields, and a per-millisecond sequence into a single 64-bit integer whose
//! top bit is always zero, so every id is losslessly representable as a
//! non-negative `i64`. Ids from one generator instance are unique and locally
//! monotonic; ids from concurrently running instances never collide as long
//! as each instance carries a distinct shard identity.
//!
//! The bit partition is described by a [`ShardedId`] layout (declared with
//! [`define_sharded_id!`]), the per-millisecond state machine lives in the
//! generators, and [`RangeCalculator`] inverts the encoding: it turns a
//! calendar period or an explicit time window into the open interval of ids
//! that could have been produced inside it, which converts time-range queries
//! into id-range scans.
//!
//! # Example
//!
//! ```
//! use shardflake::{CLUSTER_EPOCH, ClusterId, LockShardedGenerator, WallClock};
//!
//! # fn main() -> shardflake::Result<()> {
//! let shard = ClusterId::shard_from_parts(3, 21)?;
//! let clock = WallClock::with_epoch(CLUSTER_EPOCH);
//! let generator = LockShardedGenerator::<ClusterId, _>::new(shard, clock)?;
//!
//! let id = generator.next_id()?;
//! assert_eq!(id.datacenter_id(), 3);
//! assert_eq!(id.machine_id(), 21);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod generator;
mod id;
mod range;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::range::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
