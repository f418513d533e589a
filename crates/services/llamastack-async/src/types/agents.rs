use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Configuration for a server-side agent
///
/// Mirrors what the agents API accepts at creation time: the model, its
/// instructions, enabled tool groups, and the shields applied to input and
/// output text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Builder, Default)]
#[builder(setter(into, strip_option), default)]
pub struct AgentConfig {
    /// Model identifier, e.g. `meta-llama/Llama-3.3-70B-Instruct`
    pub model: String,
    /// System instructions for the agent
    pub instructions: String,
    /// Enabled tool groups, e.g. `builtin::wolfram_alpha`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    /// Shields run over user input before inference
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_shields: Vec<String>,
    /// Shields run over assistant output after inference
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_shields: Vec<String>,
    /// Optional sampling parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_params: Option<SamplingParams>,
}

/// Sampling parameters for generation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SamplingParams {
    /// Sampling strategy
    pub strategy: SamplingStrategy,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Penalty applied to repeated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
    /// Stop sequences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// Sampling strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Greedy decoding
    #[default]
    Greedy,
    /// Nucleus sampling
    TopP {
        /// Sampling temperature
        #[serde(skip_serializing_if = "Option::is_none")]
        temperature: Option<f32>,
        /// Nucleus probability mass
        #[serde(skip_serializing_if = "Option::is_none")]
        top_p: Option<f32>,
    },
    /// Top-k sampling
    TopK {
        /// Number of candidates to sample from
        top_k: u32,
    },
}

/// Wire wrapper for agent creation
#[derive(Debug, Clone, Serialize)]
pub struct AgentCreateRequest {
    /// The agent configuration
    pub agent_config: AgentConfig,
}

/// Response from creating an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentCreateResponse {
    /// Server-assigned agent identifier
    pub agent_id: String,
}

/// Request to create a session for an agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCreateRequest {
    /// Human-readable session name
    pub session_name: String,
}

/// Response from creating a session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCreateResponse {
    /// Server-assigned session identifier
    pub session_id: String,
}
