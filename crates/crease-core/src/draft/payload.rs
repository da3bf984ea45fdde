// Save/update request body for a finalized team.

use serde::{Deserialize, Serialize};

/// The body of a create-team / update-team request.
///
/// Produced by `TeamBuilder::finalize` once every rule holds, and accepted by
/// `TeamBuilder::from_payload` to re-open a saved team for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPayload {
    /// Player ids in selection order.
    pub players: Vec<String>,
    pub captain_id: String,
    pub vice_captain_id: String,
}

impl TeamPayload {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
