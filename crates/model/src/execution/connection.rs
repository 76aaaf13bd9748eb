use crate::core::utils::redact_conn_str;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the migration an endpoint plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointRole {
    Source,
    Destination,
}

impl EndpointRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointRole::Source => "source",
            EndpointRole::Destination => "destination",
        }
    }
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A connectable database instance. The connection string holds the
/// credentials, so it is never printed as is; use `redacted()`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub role: EndpointRole,
    pub conn_str: String,
}

impl Endpoint {
    pub fn new(role: EndpointRole, conn_str: impl Into<String>) -> Self {
        Endpoint {
            role,
            conn_str: conn_str.into(),
        }
    }

    pub fn source(conn_str: impl Into<String>) -> Self {
        Self::new(EndpointRole::Source, conn_str)
    }

    pub fn destination(conn_str: impl Into<String>) -> Self {
        Self::new(EndpointRole::Destination, conn_str)
    }

    pub fn redacted(&self) -> String {
        redact_conn_str(&self.conn_str)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.role, self.redacted())
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("role", &self.role)
            .field("conn_str", &self.redacted())
            .finish()
    }
}
