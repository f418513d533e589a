use serde::{Deserialize, Serialize};

/// A safety classifier registered with the stack
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shield {
    /// Shield identifier used when configuring agents
    pub identifier: String,
    /// Provider-side shield identifier, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_shield_id: Option<String>,
}

/// Response from listing shields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShieldsListResponse {
    /// Registered shields
    pub data: Vec<Shield>,
}

/// Request to register a shield
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShieldRegisterRequest {
    /// Identifier the shield will be registered under
    pub shield_id: String,
    /// Provider-side shield identifier, e.g. `meta-llama/Llama-Guard-3-8B`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_shield_id: Option<String>,
}
