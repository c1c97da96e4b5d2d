//! Configuration types
//!
//! JSON configuration for the hook, loaded once at startup and treated as
//! read-only for the lifetime of the invocation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::zone::{ReverseZoneSet, ZoneSet};

/// TSIG-style shared-secret credential for dynamic updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsigKey {
    /// Key algorithm (e.g. "hmac-sha256")
    pub algorithm: String,
    /// Key name
    pub name: String,
    /// Base64 shared secret
    pub secret: String,
}

/// Zone configuration for one address realm (private/public)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealmConfig {
    /// Zone suffixes, matched in configured order
    #[serde(default)]
    pub zones: Vec<String>,

    /// Fallback zone for names matching no configured zone
    #[serde(default)]
    pub search_domain: Option<String>,
}

impl RealmConfig {
    /// Build the zone set for this realm
    pub fn zone_set(&self) -> ZoneSet {
        ZoneSet::new(&self.zones, self.search_domain.as_deref())
    }
}

/// Hook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Nameserver to send dynamic updates to
    pub name_server: String,

    /// Optional update credential
    #[serde(default)]
    pub key: Option<TsigKey>,

    /// TTL for created records
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Zones for the VPN-internal (private) realm
    #[serde(default)]
    pub private: RealmConfig,

    /// Zones for the public realm; without it a supplied public address
    /// gets reverse records only
    #[serde(default)]
    pub public: Option<RealmConfig>,

    /// Reverse zones, v4 and v6 mixed; partitioned by suffix at load time
    #[serde(default)]
    pub reverse_zones: Vec<String>,

    /// Commit all zones in one batch (true) or one batch per zone (false)
    #[serde(default = "default_batch_all_zones")]
    pub batch_all_zones: bool,

    /// Path to the external updater executable
    #[serde(default)]
    pub nsupdate_path: Option<String>,

    /// Execution bound for the updater subprocess, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HookConfig {
    /// Load and validate configuration from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.name_server.trim().is_empty() {
            return Err(Error::config("name_server cannot be empty"));
        }

        if let Some(ref key) = self.key {
            if key.algorithm.is_empty() || key.name.is_empty() || key.secret.is_empty() {
                return Err(Error::config(
                    "key requires algorithm, name, and secret to be set",
                ));
            }
        }

        if self.ttl == 0 {
            return Err(Error::config("ttl must be > 0"));
        }

        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be > 0"));
        }

        // A configuration managing no zones at all can never emit a record
        let no_forward = self.private.zone_set().is_empty()
            && self.public.as_ref().is_none_or(|p| p.zone_set().is_empty());
        if no_forward && self.reverse_zones.is_empty() {
            return Err(Error::config(
                "No zones configured: set private/public zones, a search domain, or reverse_zones",
            ));
        }

        // Fails on reverse zones with unrecognized suffixes
        self.reverse_zone_set()?;

        Ok(())
    }

    /// Zone set for the private realm
    pub fn private_zones(&self) -> ZoneSet {
        self.private.zone_set()
    }

    /// Zone set for the public realm, when one is configured
    pub fn public_zones(&self) -> Option<ZoneSet> {
        self.public.as_ref().map(RealmConfig::zone_set)
    }

    /// Partitioned reverse zones
    pub fn reverse_zone_set(&self) -> Result<ReverseZoneSet> {
        ReverseZoneSet::from_config(&self.reverse_zones)
    }
}

fn default_ttl() -> u32 {
    3600
}

fn default_batch_all_zones() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}
