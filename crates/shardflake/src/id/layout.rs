/// Declares a packed 64-bit id layout from most significant bit to least
/// significant bit: `reserved`, `timestamp`, shard field(s), `sequence`.
///
/// The shard portion is either a single `shard` field or a
/// `datacenter`/`machine` pair; the split form additionally derives per-field
/// accessors and a validating [`shard_from_parts`] constructor. The total
/// number of bits **must equal 64**, otherwise a compile-time assertion
/// fails.
///
/// ```text
/// define_sharded_id!(
///     <TypeName>,
///     reserved: <bits>,
///     timestamp: <bits>,
///     shard: <bits>,          // or: datacenter: <bits>, machine: <bits>,
///     sequence: <bits>
/// );
/// ```
///
/// ## Example: a single-shard-field layout
///
/// ```rust
/// use shardflake::define_sharded_id;
///
/// define_sharded_id!(
///     MyCustomId,
///     reserved: 1,
///     timestamp: 41,
///     shard: 10,
///     sequence: 12
/// );
///
/// let id = MyCustomId::from(1_000, 3, 7);
/// assert_eq!(id.timestamp(), 1_000);
/// assert_eq!(id.shard(), 3);
/// assert_eq!(id.sequence(), 7);
/// ```
///
/// [`shard_from_parts`]: crate::ClusterId::shard_from_parts
#[macro_export]
macro_rules! define_sharded_id {
    // Split shard portion: datacenter + machine.
    (
        $(#[$meta:meta])*
        $name:ident,
        reserved: $reserved_bits:expr,
        timestamp: $timestamp_bits:expr,
        datacenter: $datacenter_bits:expr,
        machine: $machine_bits:expr,
        sequence: $sequence_bits:expr
    ) => {
        $crate::define_sharded_id!(@common
            $(#[$meta])*
            $name,
            reserved: $reserved_bits,
            timestamp: $timestamp_bits,
            shard: ($datacenter_bits + $machine_bits),
            sequence: $sequence_bits
        );

        impl $name {
            pub const DATACENTER_BITS: u32 = $datacenter_bits;
            pub const MACHINE_BITS: u32 = $machine_bits;

            pub const MACHINE_SHIFT: u32 = Self::SEQUENCE_BITS;
            pub const DATACENTER_SHIFT: u32 = Self::MACHINE_SHIFT + Self::MACHINE_BITS;

            pub const DATACENTER_MASK: u64 = (1 << Self::DATACENTER_BITS) - 1;
            pub const MACHINE_MASK: u64 = (1 << Self::MACHINE_BITS) - 1;

            /// Largest representable datacenter id.
            #[must_use]
            pub const fn max_datacenter_id() -> u64 {
                Self::DATACENTER_MASK
            }

            /// Largest representable machine id.
            #[must_use]
            pub const fn max_machine_id() -> u64 {
                Self::MACHINE_MASK
            }

            /// Extracts the datacenter id from the packed id.
            #[must_use]
            pub const fn datacenter_id(&self) -> u64 {
                (self.id >> Self::DATACENTER_SHIFT) & Self::DATACENTER_MASK
            }

            /// Extracts the machine id from the packed id.
            #[must_use]
            pub const fn machine_id(&self) -> u64 {
                (self.id >> Self::MACHINE_SHIFT) & Self::MACHINE_MASK
            }

            /// Combines per-field shard identities into the single shard
            /// value the generators take, rejecting any identity that does
            /// not fit its field.
            ///
            /// # Errors
            ///
            /// Returns `Error::ShardOutOfRange` if either id exceeds its
            /// field's maximum.
            pub fn shard_from_parts(datacenter_id: u64, machine_id: u64) -> $crate::Result<u64> {
                if datacenter_id > Self::max_datacenter_id() {
                    return Err($crate::Error::ShardOutOfRange {
                        field: "datacenter id",
                        value: datacenter_id,
                        max: Self::max_datacenter_id(),
                    });
                }
                if machine_id > Self::max_machine_id() {
                    return Err($crate::Error::ShardOutOfRange {
                        field: "machine id",
                        value: machine_id,
                        max: Self::max_machine_id(),
                    });
                }
                Ok((datacenter_id << Self::MACHINE_BITS) | machine_id)
            }
        }
    };

    // Single shard field.
    (
        $(#[$meta:meta])*
        $name:ident,
        reserved: $reserved_bits:expr,
        timestamp: $timestamp_bits:expr,
        shard: $shard_bits:expr,
        sequence: $sequence_bits:expr
    ) => {
        $crate::define_sharded_id!(@common
            $(#[$meta])*
            $name,
            reserved: $reserved_bits,
            timestamp: $timestamp_bits,
            shard: $shard_bits,
            sequence: $sequence_bits
        );
    };

    (@common
        $(#[$meta:meta])*
        $name:ident,
        reserved: $reserved_bits:expr,
        timestamp: $timestamp_bits:expr,
        shard: $shard_bits:expr,
        sequence: $sequence_bits:expr
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name {
            id: u64,
        }

        const _: () = {
            // Compile-time check: the fields must partition the backing
            // type exactly, otherwise extraction would alias.
            assert!(
                $reserved_bits + $timestamp_bits + $shard_bits + $sequence_bits == u64::BITS,
                "layout must account for all 64 bits"
            );
        };

        impl $name {
            pub const RESERVED_BITS: u32 = $reserved_bits;
            pub const TIMESTAMP_BITS: u32 = $timestamp_bits;
            pub const SHARD_BITS: u32 = $shard_bits;
            pub const SEQUENCE_BITS: u32 = $sequence_bits;

            pub const SEQUENCE_SHIFT: u32 = 0;
            pub const SHARD_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
            pub const TIMESTAMP_SHIFT: u32 = Self::SHARD_SHIFT + Self::SHARD_BITS;

            pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
            pub const SHARD_MASK: u64 = (1 << Self::SHARD_BITS) - 1;
            pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

            /// Packs the given components, masking each into its field.
            #[must_use]
            pub const fn from(timestamp: u64, shard: u64, sequence: u64) -> Self {
                let t = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
                let s = (shard & Self::SHARD_MASK) << Self::SHARD_SHIFT;
                let q = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
                Self { id: t | s | q }
            }

            /// Extracts the timestamp delta from the packed id.
            #[must_use]
            pub const fn timestamp(&self) -> u64 {
                (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
            }

            /// Extracts the combined shard value from the packed id.
            #[must_use]
            pub const fn shard(&self) -> u64 {
                (self.id >> Self::SHARD_SHIFT) & Self::SHARD_MASK
            }

            /// Extracts the sequence from the packed id.
            #[must_use]
            pub const fn sequence(&self) -> u64 {
                (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
            }

            /// Largest representable timestamp delta.
            #[must_use]
            pub const fn max_timestamp() -> u64 {
                Self::TIMESTAMP_MASK
            }

            /// Largest representable combined shard value.
            #[must_use]
            pub const fn max_shard() -> u64 {
                Self::SHARD_MASK
            }

            /// Largest representable sequence value.
            #[must_use]
            pub const fn max_sequence() -> u64 {
                Self::SEQUENCE_MASK
            }

            /// Converts this type into its raw representation.
            #[must_use]
            pub const fn to_raw(&self) -> u64 {
                self.id
            }

            /// Converts a raw value into this type.
            #[must_use]
            pub const fn from_raw(raw: u64) -> Self {
                Self { id: raw }
            }

            /// The id as a signed 64-bit integer (always non-negative for
            /// in-range timestamps).
            #[must_use]
            pub const fn to_i64(&self) -> i64 {
                self.id as i64
            }
        }

        impl $crate::ShardedId for $name {
            const SHARD_BITS: u32 = Self::SHARD_BITS;
            const SEQUENCE_BITS: u32 = Self::SEQUENCE_BITS;

            fn timestamp(&self) -> u64 {
                self.timestamp()
            }

            fn shard(&self) -> u64 {
                self.shard()
            }

            fn sequence(&self) -> u64 {
                self.sequence()
            }

            fn max_timestamp() -> u64 {
                Self::TIMESTAMP_MASK
            }

            fn max_shard() -> u64 {
                Self::SHARD_MASK
            }

            fn max_sequence() -> u64 {
                Self::SEQUENCE_MASK
            }

            fn from_components(timestamp: u64, shard: u64, sequence: u64) -> Self {
                debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
                Self::from(timestamp, shard, sequence)
            }

            fn to_raw(&self) -> u64 {
                self.to_raw()
            }

            fn from_raw(raw: u64) -> Self {
                Self::from_raw(raw)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.id)
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                let full = core::any::type_name::<Self>();
                let name = full.rsplit("::").next().unwrap_or(full);
                f.debug_struct(name)
                    .field("id", &format_args!("{} (0x{:x})", self.id, self.id))
                    .field("timestamp", &self.timestamp())
                    .field("shard", &self.shard())
                    .field("sequence", &self.sequence())
                    .finish()
            }
        }
    };
}

define_sharded_id!(
    /// A 64-bit id for fleets addressed as datacenter + machine.
    ///
    /// - 1 bit reserved (sign, always 0)
    /// - 41 bits timestamp (ms since [`CLUSTER_EPOCH`])
    /// - 5 bits datacenter id (up to 32 datacenters)
    /// - 7 bits machine id (up to 128 machines per datacenter)
    /// - 10 bits sequence (up to 1024 ids per machine per millisecond)
    ///
    /// ```text
    ///  Bit Index:  63 62           22 21    17 16      10 9        0
    ///              +--+--------------+--------+----------+----------+
    ///  Field:      | 0| timestamp(41)| dc (5) | mach (7) | seq (10) |
    ///              +--+--------------+--------+----------+----------+
    ///              |<------- MSB ------ 64 bits ------ LSB ------->|
    /// ```
    ///
    /// [`CLUSTER_EPOCH`]: crate::CLUSTER_EPOCH
    ClusterId,
    reserved: 1,
    timestamp: 41,
    datacenter: 5,
    machine: 7,
    sequence: 10
);

define_sharded_id!(
    /// A 64-bit id in the classic datacenter + worker layout.
    ///
    /// - 1 bit reserved (sign, always 0)
    /// - 41 bits timestamp (ms since [`CLASSIC_EPOCH`])
    /// - 5 bits datacenter id
    /// - 5 bits machine (worker) id
    /// - 12 bits sequence
    ///
    /// ```text
    ///  Bit Index:  63 62           22 21    17 16      12 11       0
    ///              +--+--------------+--------+----------+----------+
    ///  Field:      | 0| timestamp(41)| dc (5) | mach (5) | seq (12) |
    ///              +--+--------------+--------+----------+----------+
    ///              |<------- MSB ------ 64 bits ------ LSB ------->|
    /// ```
    ///
    /// [`CLASSIC_EPOCH`]: crate::CLASSIC_EPOCH
    ClassicId,
    reserved: 1,
    timestamp: 41,
    datacenter: 5,
    machine: 5,
    sequence: 12
);

define_sharded_id!(
    /// A 64-bit id whose shard field is a logical region, filled per call
    /// from a caller-supplied tag.
    ///
    /// - 42 bits timestamp (ms since [`CLASSIC_EPOCH`]; deltas stay below
    ///   2^41 for ~69 years, keeping the top bit 0)
    /// - 10 bits region (tag modulo 1024)
    /// - 12 bits sequence
    ///
    /// ```text
    ///  Bit Index:  63             22 21         12 11       0
    ///              +-----------------+-------------+----------+
    ///  Field:      | timestamp (42)  | region (10) | seq (12) |
    ///              +-----------------+-------------+----------+
    ///              |<---- MSB ----- 64 bits ----- LSB ------>|
    /// ```
    ///
    /// [`CLASSIC_EPOCH`]: crate::CLASSIC_EPOCH
    RegionId,
    reserved: 0,
    timestamp: 42,
    shard: 10,
    sequence: 12
);

impl RegionId {
    /// Largest representable region value.
    #[must_use]
    pub const fn max_region() -> u64 {
        Self::SHARD_MASK
    }

    /// Extracts the region from the packed id.
    #[must_use]
    pub const fn region(&self) -> u64 {
        self.shard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShardedId;

    #[test]
    fn cluster_id_fields_and_bounds() {
        let ts = ClusterId::max_timestamp();
        let shard = ClusterId::max_shard();
        let seq = ClusterId::max_sequence();

        let id = ClusterId::from(ts, shard, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.shard(), shard);
        assert_eq!(id.sequence(), seq);
        assert_eq!(id.datacenter_id(), ClusterId::max_datacenter_id());
        assert_eq!(id.machine_id(), ClusterId::max_machine_id());
        // Every bit except the sign bit set.
        assert_eq!(id.to_raw(), u64::MAX >> 1);
        assert!(id.to_i64() >= 0);
    }

    #[test]
    fn classic_id_shift_offsets() {
        assert_eq!(ClassicId::TIMESTAMP_SHIFT, 22);
        assert_eq!(ClassicId::DATACENTER_SHIFT, 17);
        assert_eq!(ClassicId::MACHINE_SHIFT, 12);
        assert_eq!(ClassicId::SEQUENCE_MASK, 0xfff);
    }

    #[test]
    fn region_id_round_trip() {
        let id = RegionId::from(191_110_625_343, 513, 4_095);
        assert_eq!(id.timestamp(), 191_110_625_343);
        assert_eq!(id.region(), 513);
        assert_eq!(id.sequence(), 4_095);
        assert_eq!(RegionId::from_raw(id.to_raw()), id);
    }

    #[test]
    fn low_bit_fields() {
        let id = ClusterId::from(0, 0, 0);
        assert_eq!(id.to_raw(), 0);

        let id = ClusterId::from(1, 1, 1);
        assert_eq!(id.timestamp(), 1);
        assert_eq!(id.shard(), 1);
        assert_eq!(id.sequence(), 1);
    }

    #[test]
    fn ordering_follows_timestamp_then_shard_then_sequence() {
        let a = RegionId::from(10, 0, 4_095);
        let b = RegionId::from(11, 0, 0);
        let c = RegionId::from(11, 1, 0);
        let d = RegionId::from(11, 1, 1);
        assert!(a < b && b < c && c < d);
    }

    #[test]
    fn shard_from_parts_validates_each_field() {
        let max_dc = ClusterId::max_datacenter_id();
        let max_machine = ClusterId::max_machine_id();

        let shard = ClusterId::shard_from_parts(max_dc, max_machine).unwrap();
        assert_eq!(shard, ClusterId::max_shard());

        let err = ClusterId::shard_from_parts(max_dc + 1, 0).unwrap_err();
        assert_eq!(
            err,
            crate::Error::ShardOutOfRange {
                field: "datacenter id",
                value: max_dc + 1,
                max: max_dc,
            }
        );

        let err = ClusterId::shard_from_parts(0, max_machine + 1).unwrap_err();
        assert_eq!(
            err,
            crate::Error::ShardOutOfRange {
                field: "machine id",
                value: max_machine + 1,
                max: max_machine,
            }
        );
    }

    #[test]
    fn shard_from_parts_packs_datacenter_above_machine() {
        let shard = ClusterId::shard_from_parts(1, 2).unwrap();
        let id = ClusterId::from(0, shard, 0);
        assert_eq!(id.datacenter_id(), 1);
        assert_eq!(id.machine_id(), 2);
    }

    #[test]
    fn checked_shard_bounds() {
        assert_eq!(RegionId::checked_shard(1_023).unwrap(), 1_023);
        assert!(RegionId::checked_shard(1_024).is_err());
    }
}
