use serde::{Deserialize, Serialize};

/// A model registered with the stack
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Model {
    /// Model identifier used in requests
    pub identifier: String,
    /// Provider serving this model, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    /// Model type, e.g. `llm` or `embedding`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
}

/// Response from listing models
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelsListResponse {
    /// Registered models
    pub data: Vec<Model>,
}
