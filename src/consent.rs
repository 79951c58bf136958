use chrono::Local;
use serde::{Deserialize, Serialize};

/// Current consent schema version. Records persisted under an older version
/// are treated as absent so the banner is shown again.
pub const CONSENT_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentDecision {
    Accepted,
    Rejected,
    Partial,
}

/// The user's recorded consent decision. Created on the first explicit
/// decision, read on every load, never silently mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub decision: ConsentDecision,
    pub timestamp: String,
    #[serde(default)]
    pub version: u32,
}

impl ConsentRecord {
    pub fn new(decision: ConsentDecision) -> Self {
        Self {
            decision,
            timestamp: Local::now().to_rfc3339(),
            version: CONSENT_VERSION,
        }
    }

    /// Whether the record was written under the current schema version.
    pub fn is_current(&self) -> bool {
        self.version == CONSENT_VERSION
    }
}
