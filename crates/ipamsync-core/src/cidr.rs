// ── CIDR block newtype ──

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A network address in CIDR notation with no host bits set.
///
/// `10.0.0.0/24` parses; `10.0.0.1/24` does not. Serializes as its string
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cidr(IpNet);

impl Cidr {
    pub fn net(&self) -> IpNet {
        self.0
    }

    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// `10.0.0.0/24` -> `10.0.0.0-24`, used for synthesized names.
    pub fn slug(&self) -> String {
        self.to_string().replace('/', "-")
    }

    /// True when the two blocks share at least one address.
    ///
    /// Symmetric and reflexive. Blocks of different families never overlap.
    pub fn overlaps(&self, other: &Cidr) -> bool {
        match (self.0.network(), other.0.network()) {
            (IpAddr::V4(_), IpAddr::V4(_)) => {
                let (a_start, a_end) = v4_bounds(self.0);
                let (b_start, b_end) = v4_bounds(other.0);
                a_start <= b_end && b_start <= a_end
            }
            (IpAddr::V6(_), IpAddr::V6(_)) => {
                let (a_start, a_end) = v6_bounds(self.0);
                let (b_start, b_end) = v6_bounds(other.0);
                a_start <= b_end && b_start <= a_end
            }
            _ => false,
        }
    }
}

fn v4_bounds(net: IpNet) -> (u32, u32) {
    match (net.network(), net.broadcast()) {
        (IpAddr::V4(lo), IpAddr::V4(hi)) => (u32::from(lo), u32::from(hi)),
        _ => (0, 0),
    }
}

fn v6_bounds(net: IpNet) -> (u128, u128) {
    match (net.network(), net.broadcast()) {
        (IpAddr::V6(lo), IpAddr::V6(hi)) => (u128::from(lo), u128::from(hi)),
        _ => (0, 0),
    }
}

impl FromStr for Cidr {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let net: IpNet = trimmed
            .parse()
            .map_err(|_| CoreError::validation(format!("invalid CIDR '{trimmed}'")))?;
        if net != net.trunc() {
            return Err(CoreError::validation(format!(
                "invalid CIDR '{trimmed}': host bits set (did you mean {}?)",
                net.trunc()
            )));
        }
        Ok(Self(net))
    }
}

impl TryFrom<String> for Cidr {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cidr> for String {
    fn from(value: Cidr) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
