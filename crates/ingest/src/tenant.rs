//! The fixed set of client applications whose logs are kept apart.
//!
//! Tenants are a closed enum: there is no runtime registration. Both the write
//! path and the read path resolve identifiers through [`Tenant::resolve`], so
//! the two can never disagree about which tenants exist.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::IngestError;

/// A registered client application.
///
/// ```rust
/// use ingest::Tenant;
///
/// assert_eq!(Tenant::resolve("mdot"), Ok(Tenant::Mdot));
/// assert!(Tenant::resolve("notarealapp").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tenant {
    Zig,
    Mdot,
    Ecolane,
    Goaccess,
}

impl Tenant {
    /// Every registered tenant, in a stable order.
    pub const ALL: [Tenant; 4] = [Tenant::Zig, Tenant::Mdot, Tenant::Ecolane, Tenant::Goaccess];

    /// Resolve an `app_name` string. Matching is exact and case-sensitive.
    pub fn resolve(app_name: &str) -> Result<Self, IngestError> {
        match app_name {
            "zig" => Ok(Tenant::Zig),
            "mdot" => Ok(Tenant::Mdot),
            "ecolane" => Ok(Tenant::Ecolane),
            "goaccess" => Ok(Tenant::Goaccess),
            other => Err(IngestError::InvalidTenant(other.to_string())),
        }
    }

    /// Resolve the `app_name` field of a request body. Non-string values never
    /// name a tenant.
    pub fn resolve_value(app_name: &Value) -> Result<Self, IngestError> {
        match app_name {
            Value::String(name) => Self::resolve(name),
            other => Err(IngestError::InvalidTenant(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tenant::Zig => "zig",
            Tenant::Mdot => "mdot",
            Tenant::Ecolane => "ecolane",
            Tenant::Goaccess => "goaccess",
        }
    }
}

impl fmt::Display for Tenant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tenant {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s)
    }
}
