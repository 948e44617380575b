//! Operator-supplied key/value settings for a scaling target.
//!
//! The orchestrating host hands the target a flat `string -> string` map,
//! once at plugin configuration time and again on every `scale`/`status`
//! call. Per-call values win over the plugin-level ones.

use super::ConfigError;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

pub const KEY_ASG_NAME: &str = "asg_name";
pub const KEY_REGION: &str = "region";
pub const KEY_ACCESS_KEY_ID: &str = "aws_access_key_id";
pub const KEY_SECRET_ACCESS_KEY: &str = "aws_secret_access_key";
pub const KEY_SESSION_TOKEN: &str = "session_token";
pub const KEY_CLASS: &str = "class";
pub const KEY_DRAIN_DEADLINE: &str = "drain_deadline";
pub const KEY_DRAIN_IGNORE_SYSTEM_JOBS: &str = "node_drain_ignore_system_jobs";
pub const KEY_NODE_PURGE: &str = "node_purge";
pub const KEY_CONVERGENCE_TIMEOUT: &str = "convergence_timeout";
pub const KEY_CONVERGENCE_POLL_INTERVAL: &str = "convergence_poll_interval";

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_DRAIN_DEADLINE: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_CONVERGENCE_TIMEOUT: Duration = Duration::from_secs(150);
pub const DEFAULT_CONVERGENCE_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Static credentials for the provider API.
///
/// When absent the provider adapter falls back to whatever ambient
/// credentials its gateway is configured with.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Credentials {
    /// Resolve credentials from the map. The key id and secret come as a pair.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Option<Self>, ConfigError> {
        let key_id = non_empty(map, KEY_ACCESS_KEY_ID);
        let secret = non_empty(map, KEY_SECRET_ACCESS_KEY);

        match (key_id, secret) {
            (Some(access_key_id), Some(secret_access_key)) => Ok(Some(Self {
                access_key_id: access_key_id.to_string(),
                secret_access_key: secret_access_key.to_string(),
                session_token: non_empty(map, KEY_SESSION_TOKEN).map(str::to_string),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::InvalidValue {
                key: KEY_SECRET_ACCESS_KEY,
                message: format!("must be set together with {}", KEY_ACCESS_KEY_ID),
            }),
            (None, Some(_)) => Err(ConfigError::InvalidValue {
                key: KEY_ACCESS_KEY_ID,
                message: format!("must be set together with {}", KEY_SECRET_ACCESS_KEY),
            }),
        }
    }
}

/// Region and credentials used to reach the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub region: String,
    pub credentials: Option<Credentials>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            credentials: None,
        }
    }
}

/// Options forwarded to the node drain collaborator on scale in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainSettings {
    pub deadline: Duration,
    pub node_class: Option<String>,
    pub ignore_system_jobs: bool,
    pub purge: bool,
}

impl Default for DrainSettings {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DRAIN_DEADLINE,
            node_class: None,
            ignore_system_jobs: false,
            purge: false,
        }
    }
}

/// Bounds on waiting for the provider after a capacity increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceSettings {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConvergenceSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_CONVERGENCE_TIMEOUT,
            poll_interval: DEFAULT_CONVERGENCE_POLL_INTERVAL,
        }
    }
}

/// Fully resolved settings for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSettings {
    pub provider: ProviderSettings,
    pub drain: DrainSettings,
    pub convergence: ConvergenceSettings,
}

impl TargetSettings {
    /// Resolve settings from an operator map, applying defaults for absent keys.
    ///
    /// Absent keys fall back to defaults; present but malformed values are
    /// rejected with [`ConfigError::InvalidValue`].
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let provider = ProviderSettings {
            region: non_empty(map, KEY_REGION)
                .unwrap_or(DEFAULT_REGION)
                .to_string(),
            credentials: Credentials::from_map(map)?,
        };

        let drain = DrainSettings {
            deadline: optional_duration(map, KEY_DRAIN_DEADLINE)?
                .unwrap_or(DEFAULT_DRAIN_DEADLINE),
            node_class: non_empty(map, KEY_CLASS).map(str::to_string),
            ignore_system_jobs: optional_bool(map, KEY_DRAIN_IGNORE_SYSTEM_JOBS)?
                .unwrap_or(false),
            purge: optional_bool(map, KEY_NODE_PURGE)?.unwrap_or(false),
        };

        let convergence = ConvergenceSettings {
            timeout: optional_duration(map, KEY_CONVERGENCE_TIMEOUT)?
                .unwrap_or(DEFAULT_CONVERGENCE_TIMEOUT),
            poll_interval: optional_duration(map, KEY_CONVERGENCE_POLL_INTERVAL)?
                .unwrap_or(DEFAULT_CONVERGENCE_POLL_INTERVAL),
        };

        if convergence.poll_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: KEY_CONVERGENCE_POLL_INTERVAL,
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            provider,
            drain,
            convergence,
        })
    }
}

/// Look up the group name, the one key whose absence is fatal at call time.
pub fn require_group_name(map: &HashMap<String, String>) -> Result<&str, ConfigError> {
    map.get(KEY_ASG_NAME)
        .map(String::as_str)
        .ok_or(ConfigError::MissingKey(KEY_ASG_NAME))
}

/// Layer `overrides` on top of `base`, returning a new map.
pub fn merge(
    base: &HashMap<String, String>,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Parse a duration such as `"500ms"`, `"30s"`, `"15m"`, `"1h"` or bare seconds.
pub fn parse_duration(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let s = value.trim();
    let invalid = || ConfigError::InvalidValue {
        key,
        message: format!("'{}' is not a duration (expected e.g. 30s, 15m, 1h)", value),
    };

    let (digits, unit_ms) = if let Some(ms) = s.strip_suffix("ms") {
        (ms, 1)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1_000)
    } else if let Some(mins) = s.strip_suffix('m') {
        (mins, 60_000)
    } else if let Some(hours) = s.strip_suffix('h') {
        (hours, 3_600_000)
    } else {
        (s, 1_000)
    };

    let n: u64 = digits.trim().parse().map_err(|_| invalid())?;
    n.checked_mul(unit_ms)
        .map(Duration::from_millis)
        .ok_or_else(invalid)
}

fn non_empty<'a>(map: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    map.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn optional_duration(
    map: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    non_empty(map, key)
        .map(|v| parse_duration(key, v))
        .transpose()
}

fn optional_bool(
    map: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<bool>, ConfigError> {
    non_empty(map, key)
        .map(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key,
                message: format!("'{}' is not a boolean", v),
            }),
        })
        .transpose()
}
