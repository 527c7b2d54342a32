//! Request context threaded explicitly into every stage handler call.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Identity attributed to a transition (ledger account or user identifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn address(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is acting and when the request arrived.
///
/// The timestamp is captured once at request start and reused for every
/// record the handler produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub actor: Actor,
    pub received_at: Timestamp,
}

impl RequestContext {
    /// Context for a request arriving now.
    pub fn now(actor: Actor) -> Self {
        Self::at(actor, Timestamp::now())
    }

    /// Context with a fixed arrival time.
    pub fn at(actor: Actor, received_at: Timestamp) -> Self {
        Self { actor, received_at }
    }
}
