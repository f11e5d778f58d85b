//! Notification emitted once per dispatched request cycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ajaxgate_core::{ActionName, NonceTier};

/// Summary of one dispatched cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// `None` when the request carried no action.
    pub action: Option<ActionName>,
    pub tier: NonceTier,
    /// Whether the cycle ended on the error path.
    pub bad: bool,
    pub occurred_at: DateTime<Utc>,
}

impl DispatchRecord {
    pub fn new(action: Option<ActionName>, bad: bool, occurred_at: DateTime<Utc>) -> Self {
        let tier = action
            .as_ref()
            .map(ActionName::tier)
            .unwrap_or(NonceTier::None);
        Self {
            action,
            tier,
            bad,
            occurred_at,
        }
    }
}
