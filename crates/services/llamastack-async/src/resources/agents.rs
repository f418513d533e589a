use crate::{
    client::Client,
    config::Config,
    error::StackError,
    types::agents::{
        AgentConfig, AgentCreateRequest, AgentCreateResponse, SamplingStrategy,
        SessionCreateRequest, SessionCreateResponse,
    },
};

/// Validate an agent configuration before sending it
fn validate_agent_config(config: &AgentConfig) -> Result<(), StackError> {
    if config.model.is_empty() {
        return Err(StackError::Config("agent model must not be empty".into()));
    }

    if let Some(params) = &config.sampling_params {
        if let SamplingStrategy::TopP { temperature, top_p } = &params.strategy {
            if let Some(t) = temperature
                && *t < 0.0
            {
                return Err(StackError::Config(format!(
                    "Invalid temperature {t}: must be >= 0.0"
                )));
            }
            if let Some(p) = top_p
                && (!(0.0..=1.0).contains(p) || *p == 0.0)
            {
                return Err(StackError::Config(format!(
                    "Invalid top_p {p}: must be in (0.0, 1.0]"
                )));
            }
        }

        if let Some(max_tokens) = params.max_tokens
            && max_tokens == 0
        {
            return Err(StackError::Config(
                "max_tokens must be greater than 0".into(),
            ));
        }

        if let Some(penalty) = params.repetition_penalty
            && penalty <= 0.0
        {
            return Err(StackError::Config(format!(
                "Invalid repetition_penalty {penalty}: must be > 0.0"
            )));
        }
    }

    Ok(())
}

/// API resource for the `/v1/agents` endpoints
pub struct Agents<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Agents<'c, C> {
    /// Creates a new Agents resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Register an agent with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the request fails
    /// to send, or the API returns an error.
    pub async fn create(&self, config: AgentConfig) -> Result<AgentCreateResponse, StackError> {
        validate_agent_config(&config)?;
        self.client
            .post(
                "/v1/agents",
                AgentCreateRequest {
                    agent_config: config,
                },
            )
            .await
    }

    /// Create a named session for an agent
    ///
    /// Sessions group an ordered sequence of turns sharing conversation
    /// history on the server side.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails to send or the API returns an
    /// error.
    pub async fn create_session(
        &self,
        agent_id: &str,
        session_name: &str,
    ) -> Result<SessionCreateResponse, StackError> {
        self.client
            .post(
                &format!("/v1/agents/{agent_id}/session"),
                SessionCreateRequest {
                    session_name: session_name.to_string(),
                },
            )
            .await
    }
}

impl<C: Config> Client<C> {
    /// Returns the Agents API resource
    #[must_use]
    pub const fn agents(&self) -> Agents<'_, C> {
        Agents::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::agents::SamplingParams;

    fn base_config() -> AgentConfig {
        AgentConfig {
            model: "meta-llama/Llama-3.2-3B-Instruct".into(),
            instructions: "Be helpful.".into(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_model_rejected() {
        let config = AgentConfig::default();
        assert!(matches!(
            validate_agent_config(&config),
            Err(StackError::Config(_))
        ));
    }

    #[test]
    fn top_p_zero_rejected() {
        let mut config = base_config();
        config.sampling_params = Some(SamplingParams {
            strategy: SamplingStrategy::TopP {
                temperature: Some(0.7),
                top_p: Some(0.0),
            },
            ..Default::default()
        });
        assert!(validate_agent_config(&config).is_err());
    }

    #[test]
    fn valid_sampling_accepted() {
        let mut config = base_config();
        config.sampling_params = Some(SamplingParams {
            strategy: SamplingStrategy::TopP {
                temperature: Some(0.8),
                top_p: Some(0.9),
            },
            max_tokens: Some(100),
            repetition_penalty: Some(1.1),
            stop: None,
        });
        assert!(validate_agent_config(&config).is_ok());
    }
}
