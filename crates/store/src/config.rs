//! Store configuration.
//!
//! Values come from environment variables; anything missing falls back to a
//! default, anything malformed falls back with a warning.
//!
//! | variable | meaning | default |
//! |---|---|---|
//! | `SMARTSHELF_DELETE_POLICY` | `ignore` or `strict` for unknown ids | `ignore` |
//! | `SMARTSHELF_EXPIRY_SOON_DAYS` | "expiring soon" window | `7` |
//! | `SMARTSHELF_EXPIRY_WARNING_DAYS` | wider expiry warning window | `30` |
//! | `SMARTSHELF_SEED_DEMO` | seed the demo stock items | `false` |

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use smartshelf_inventory::{DeletePolicy, ExpiryThresholds};

pub const DELETE_POLICY_VAR: &str = "SMARTSHELF_DELETE_POLICY";
pub const EXPIRY_SOON_DAYS_VAR: &str = "SMARTSHELF_EXPIRY_SOON_DAYS";
pub const EXPIRY_WARNING_DAYS_VAR: &str = "SMARTSHELF_EXPIRY_WARNING_DAYS";
pub const SEED_DEMO_VAR: &str = "SMARTSHELF_SEED_DEMO";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub delete_policy: DeletePolicy,
    pub expiry: ExpiryThresholds,
    pub seed_demo_data: bool,
}

impl StoreConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let delete_policy = parse_or(&lookup, DELETE_POLICY_VAR, defaults.delete_policy);
        let soon_days = parse_or(&lookup, EXPIRY_SOON_DAYS_VAR, defaults.expiry.soon_days);
        let warning_days = parse_or(&lookup, EXPIRY_WARNING_DAYS_VAR, defaults.expiry.warning_days);
        let seed_demo_data = lookup(SEED_DEMO_VAR)
            .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    tracing::warn!(
                        var = SEED_DEMO_VAR,
                        value = %raw,
                        "invalid boolean; using default"
                    );
                    defaults.seed_demo_data
                }
            })
            .unwrap_or(defaults.seed_demo_data);

        let expiry = if soon_days < 0 || warning_days < soon_days {
            tracing::warn!(
                soon_days,
                warning_days,
                "expiry windows must satisfy 0 <= soon <= warning; using defaults"
            );
            defaults.expiry
        } else {
            ExpiryThresholds {
                soon_days,
                warning_days,
            }
        };

        Self {
            delete_policy,
            expiry,
            seed_demo_data,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!(var = key, value = %raw, error = %e, "invalid value; using default");
            default
        }),
    }
}
