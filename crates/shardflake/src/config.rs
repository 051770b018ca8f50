use std::env;

/// Environment variable naming the datacenter identity.
pub const DATACENTER_ID_VAR: &str = "SHARDFLAKE_DATACENTER_ID";

/// Environment variable naming the machine identity.
pub const MACHINE_ID_VAR: &str = "SHARDFLAKE_MACHINE_ID";

const DEFAULT_DATACENTER_ID: u64 = 0;
const DEFAULT_MACHINE_ID: u64 = 1;

/// Shard identity for a deployment, resolved outside the generators.
///
/// This is a convenience layer over deployment metadata: the generators
/// themselves only take explicit, already-validated values. Identity is read
/// from [`DATACENTER_ID_VAR`] and [`MACHINE_ID_VAR`] (a `.env` file is
/// honored). A missing or unparsable variable falls back to datacenter 0 /
/// machine 1 so a misconfigured node still boots; with the `tracing` feature
/// enabled, the fallback is logged so operators can fix the deployment.
///
/// Note that the fallback values are *not* validated against any particular
/// layout here; pass them through e.g. [`ClusterId::shard_from_parts`] when
/// constructing a generator.
///
/// [`ClusterId::shard_from_parts`]: crate::ClusterId::shard_from_parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardIdentity {
    pub datacenter_id: u64,
    pub machine_id: u64,
}

impl Default for ShardIdentity {
    fn default() -> Self {
        Self {
            datacenter_id: DEFAULT_DATACENTER_ID,
            machine_id: DEFAULT_MACHINE_ID,
        }
    }
}

impl ShardIdentity {
    /// Resolves the shard identity from the environment, falling back to
    /// the defaults for anything missing or malformed.
    #[must_use]
    pub fn from_env() -> Self {
        // Best effort: a missing .env file is the common case.
        let _ = dotenvy::dotenv();
        Self {
            datacenter_id: read_var(DATACENTER_ID_VAR, DEFAULT_DATACENTER_ID),
            machine_id: read_var(MACHINE_ID_VAR, DEFAULT_MACHINE_ID),
        }
    }
}

fn read_var(name: &str, default: u64) -> u64 {
    match env::var(name).ok().and_then(|value| value.parse().ok()) {
        Some(value) => value,
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                var = name,
                default,
                "shard identity not configured; using default"
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Process environment is shared, so every env manipulation for this
    // module happens inside this single test.
    #[test]
    fn from_env_resolution() {
        unsafe {
            env::remove_var(DATACENTER_ID_VAR);
            env::remove_var(MACHINE_ID_VAR);
        }
        assert_eq!(ShardIdentity::from_env(), ShardIdentity::default());

        unsafe {
            env::set_var(DATACENTER_ID_VAR, "3");
            env::set_var(MACHINE_ID_VAR, "21");
        }
        assert_eq!(
            ShardIdentity::from_env(),
            ShardIdentity {
                datacenter_id: 3,
                machine_id: 21,
            }
        );

        // Malformed values fall back rather than fail.
        unsafe {
            env::set_var(MACHINE_ID_VAR, "not-a-number");
        }
        assert_eq!(ShardIdentity::from_env().machine_id, 1);

        unsafe {
            env::remove_var(DATACENTER_ID_VAR);
            env::remove_var(MACHINE_ID_VAR);
        }
    }
}
