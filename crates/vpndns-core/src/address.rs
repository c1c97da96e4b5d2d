//! Address classification
//!
//! Parses a raw address string into its family and derives the
//! reverse-lookup name used for PTR records.

use std::fmt;
use std::net::IpAddr;

use crate::error::{Error, Result};

/// Address family of a classified address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

/// A classified VPN client or server address
///
/// Immutable once constructed; carries the parsed address and its
/// precomputed reverse-lookup name (`in-addr.arpa` / `ip6.arpa`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    ip: IpAddr,
    reverse_name: String,
}

impl Address {
    /// Classify a raw address string
    ///
    /// Accepts IPv4 and IPv6 textual forms only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAddress`] if the text does not parse.
    pub fn classify(text: &str) -> Result<Self> {
        let ip: IpAddr = text
            .trim()
            .parse()
            .map_err(|_| Error::invalid_address(text))?;

        Ok(Self {
            reverse_name: reverse_name(ip),
            ip,
        })
    }

    /// The parsed address
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// Address family
    pub fn family(&self) -> AddressFamily {
        match self.ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }

    /// Forward record type for this family
    pub fn record_type(&self) -> &'static str {
        match self.family() {
            AddressFamily::V4 => "A",
            AddressFamily::V6 => "AAAA",
        }
    }

    /// Reverse-lookup name, e.g. `5.2.0.192.in-addr.arpa`
    pub fn reverse_name(&self) -> &str {
        &self.reverse_name
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.ip.fmt(f)
    }
}

/// Compute the reverse-lookup name for an address
///
/// IPv4: the four octets reversed, dot-joined, under `in-addr.arpa`.
/// IPv6: all 32 hex nibbles of the expanded address reversed, dot-joined,
/// under `ip6.arpa`.
fn reverse_name(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            format!("{}.{}.{}.{}.in-addr.arpa", o[3], o[2], o[1], o[0])
        }
        IpAddr::V6(v6) => {
            let mut labels = Vec::with_capacity(33);
            for octet in v6.octets().iter().rev() {
                labels.push(format!("{:x}", octet & 0x0f));
                labels.push(format!("{:x}", octet >> 4));
            }
            labels.push("ip6.arpa".to_string());
            labels.join(".")
        }
    }
}
