//! Dynamic-update transaction building
//!
//! Turns one reconciliation request into the ordered nsupdate directive
//! lines that bring the configured zones in line with the client's current
//! address. Every add is preceded by a delete for the same owner and type,
//! so re-issuing a transaction is a no-op net effect and records never
//! accumulate duplicates on repeated connect notifications.

use std::fmt;
use std::str::FromStr;

use crate::address::Address;
use crate::config::HookConfig;
use crate::error::{Error, Result};
use crate::zone::{ReverseZoneSet, ZoneSet};

/// Reconciliation operation, as reported by the VPN daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Client connected; create records
    Add,
    /// Client address changed; behaves exactly like Add
    Update,
    /// Client disconnected; remove records
    Delete,
}

impl Operation {
    /// Whether this operation emits `update add` lines
    fn writes_records(self) -> bool {
        matches!(self, Operation::Add | Operation::Update)
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "add" => Ok(Operation::Add),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(Error::config(format!(
                "Unknown operation {other:?}: expected add, update, or delete"
            ))),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// One reconciliation unit: an operation on an address/name pair
#[derive(Debug, Clone)]
pub struct RecordChangeRequest {
    /// What happened
    pub operation: Operation,
    /// VPN-internal (private realm) address
    pub address: Address,
    /// Optional public realm address, from the environment side channel
    pub public_address: Option<Address>,
    /// Client identity, used as the DNS host label and PTR value
    pub common_name: String,
}

/// Ordered dynamic-update directive lines for one request
///
/// Produced fresh per request and never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    lines: Vec<String>,
}

impl Transaction {
    /// Whether the request matched no zone at all
    ///
    /// An empty transaction must not be dispatched.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The directive lines, in dispatch order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The transcript fed to the updater: one directive per line,
    /// newline-terminated
    pub fn to_transcript(&self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

/// Build the update transaction for a request
///
/// The private realm is always reconciled; the public realm only when the
/// request carries a public address. Per matched zone the transaction holds
/// a `zone` directive, an `update delete` for the owner and type, and for
/// Add/Update an `update add` with the configured TTL. With
/// `batch_all_zones` every zone shares one `server`/`send` batch; otherwise
/// each zone is committed independently.
pub fn build_transaction(request: &RecordChangeRequest, config: &HookConfig) -> Result<Transaction> {
    let reverse_zones = config.reverse_zone_set()?;
    let write = request.operation.writes_records();

    let mut groups: Vec<Vec<String>> = Vec::new();

    let mut reconcile_realm = |zones: &ZoneSet, address: &Address| {
        if let Some(group) = forward_group(zones, request, address, config.ttl, write) {
            groups.push(group);
        }
        if let Some(group) = reverse_group(&reverse_zones, request, address, config.ttl, write) {
            groups.push(group);
        }
    };

    reconcile_realm(&config.private_zones(), &request.address);

    if let Some(ref public_address) = request.public_address {
        let zones = config.public_zones().unwrap_or_default();
        reconcile_realm(&zones, public_address);
    }

    if groups.is_empty() {
        tracing::debug!(
            common_name = %request.common_name,
            address = %request.address,
            "No zone matched; nothing to update"
        );
        return Ok(Transaction::default());
    }

    let mut lines = Vec::new();
    if config.batch_all_zones {
        lines.extend(header_lines(config));
        for group in groups {
            lines.extend(group);
        }
        lines.push("send".to_string());
    } else {
        for group in groups {
            lines.extend(header_lines(config));
            lines.extend(group);
            lines.push("send".to_string());
        }
    }

    Ok(Transaction { lines })
}

/// `server` and optional `key` directives opening a batch
fn header_lines(config: &HookConfig) -> Vec<String> {
    let mut lines = vec![format!("server {}", config.name_server)];
    if let Some(ref key) = config.key {
        lines.push(format!("key {}:{} {}", key.algorithm, key.name, key.secret));
    }
    lines
}

/// Forward (A/AAAA) directives for one realm, if its zones match the name
fn forward_group(
    zones: &ZoneSet,
    request: &RecordChangeRequest,
    address: &Address,
    ttl: u32,
    write: bool,
) -> Option<Vec<String>> {
    let matched = zones.match_name(&request.common_name)?;
    let rtype = address.record_type();

    let mut group = vec![
        format!("zone {}", matched.zone),
        format!("update delete {}. {}", matched.fqdn, rtype),
    ];
    if write {
        group.push(format!(
            "update add {}. {} {} {}",
            matched.fqdn, ttl, rtype, address
        ));
    }
    Some(group)
}

/// Reverse (PTR) directives for one realm's address, if a reverse zone
/// matches
fn reverse_group(
    reverse_zones: &ReverseZoneSet,
    request: &RecordChangeRequest,
    address: &Address,
    ttl: u32,
    write: bool,
) -> Option<Vec<String>> {
    let zone = reverse_zones.match_address(address)?;

    let mut group = vec![
        format!("zone {zone}"),
        format!("update delete {}. PTR", address.reverse_name()),
    ];
    if write {
        group.push(format!(
            "update add {}. {} PTR {}",
            address.reverse_name(),
            ttl,
            request.common_name
        ));
    }
    Some(group)
}
