//! Zone selection
//!
//! Suffix-based matching of names and addresses against the configured
//! forward and reverse zones. Matching is first-configured-wins, not
//! longest-suffix: when `example.com` and `vpn.example.com` are both
//! configured, the earlier entry takes the record. This mirrors how
//! deployments of this tool have always behaved; reordering the zone list
//! is the way to change precedence.

use crate::address::{Address, AddressFamily};
use crate::error::{Error, Result};

const V4_REVERSE_SUFFIX: &str = "in-addr.arpa";
const V6_REVERSE_SUFFIX: &str = "ip6.arpa";

/// Normalize a DNS name for matching
///
/// Strips characters outside `[A-Za-z0-9.-]`, lowercases, and trims
/// leading/trailing dots.
pub fn normalize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '-')
        .collect();
    cleaned.to_ascii_lowercase().trim_matches('.').to_string()
}

/// True when `name` equals `zone` or ends with `.zone` (label boundary)
fn is_suffix_of(zone: &str, name: &str) -> bool {
    name == zone || name.ends_with(&format!(".{zone}"))
}

/// Result of a forward zone match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardMatch {
    /// The zone the record belongs to
    pub zone: String,
    /// Fully qualified owner name (no trailing dot)
    pub fqdn: String,
}

/// Ordered set of forward zone suffixes with an optional search-domain
/// fallback
#[derive(Debug, Clone, Default)]
pub struct ZoneSet {
    zones: Vec<String>,
    search_domain: Option<String>,
}

impl ZoneSet {
    /// Build a zone set, normalizing every entry
    ///
    /// Entries that normalize to the empty string are dropped.
    pub fn new(zones: &[String], search_domain: Option<&str>) -> Self {
        Self {
            zones: zones
                .iter()
                .map(|z| normalize_name(z))
                .filter(|z| !z.is_empty())
                .collect(),
            search_domain: search_domain
                .map(normalize_name)
                .filter(|s| !s.is_empty()),
        }
    }

    /// Whether the set has neither zones nor a search domain
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty() && self.search_domain.is_none()
    }

    /// Select the zone for a name
    ///
    /// Returns the first configured zone that is a suffix of the normalized
    /// name. If none matches and a search domain is configured, the name's
    /// first label is qualified with the search domain. An unqualified
    /// single-label name with no search domain is adopted into the first
    /// configured zone. Returns `None` otherwise; the caller then skips
    /// forward-record handling.
    pub fn match_name(&self, name: &str) -> Option<ForwardMatch> {
        let name = normalize_name(name);
        if name.is_empty() {
            return None;
        }

        for zone in &self.zones {
            if is_suffix_of(zone, &name) {
                return Some(ForwardMatch {
                    zone: zone.clone(),
                    fqdn: name,
                });
            }
        }

        if let Some(ref search) = self.search_domain {
            let host = name.split('.').next().unwrap_or(&name);
            return Some(ForwardMatch {
                zone: search.clone(),
                fqdn: format!("{host}.{search}"),
            });
        }

        if !name.contains('.') {
            if let Some(zone) = self.zones.first() {
                return Some(ForwardMatch {
                    zone: zone.clone(),
                    fqdn: format!("{name}.{zone}"),
                });
            }
        }

        None
    }
}

/// Reverse zones partitioned by address family
#[derive(Debug, Clone, Default)]
pub struct ReverseZoneSet {
    v4: Vec<String>,
    v6: Vec<String>,
}

impl ReverseZoneSet {
    /// Partition a raw reverse-zone list by family
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for any zone ending in neither
    /// `in-addr.arpa` nor `ip6.arpa`.
    pub fn from_config(zones: &[String]) -> Result<Self> {
        let mut set = Self::default();
        for raw in zones {
            let zone = normalize_name(raw);
            if zone.is_empty() {
                return Err(Error::config(format!("Empty reverse zone: {raw:?}")));
            }
            if is_suffix_of(V4_REVERSE_SUFFIX, &zone) {
                set.v4.push(zone);
            } else if is_suffix_of(V6_REVERSE_SUFFIX, &zone) {
                set.v6.push(zone);
            } else {
                return Err(Error::config(format!(
                    "Reverse zone {zone} ends in neither {V4_REVERSE_SUFFIX} nor {V6_REVERSE_SUFFIX}"
                )));
            }
        }
        Ok(set)
    }

    /// Select the reverse zone for an address
    ///
    /// First configured zone of the matching family that is a suffix of the
    /// address's reverse-lookup name; `None` when no zone matches.
    pub fn match_address(&self, address: &Address) -> Option<&str> {
        let zones = match address.family() {
            AddressFamily::V4 => &self.v4,
            AddressFamily::V6 => &self.v6,
        };
        zones
            .iter()
            .find(|zone| is_suffix_of(zone, address.reverse_name()))
            .map(String::as_str)
    }
}
