use crate::{
    client::Client,
    config::Config,
    error::StackError,
    sse::EventStream,
    types::messages::{TurnCreateRequest, TurnResponse},
};

/// API resource for turns within an agent session
pub struct Turns<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Turns<'c, C> {
    /// Creates a new Turns resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Create a turn and wait for the complete response
    ///
    /// # Errors
    ///
    /// Returns an error if the request carries no messages, fails to send,
    /// or the API returns an error.
    pub async fn create(
        &self,
        agent_id: &str,
        session_id: &str,
        mut req: TurnCreateRequest,
    ) -> Result<TurnResponse, StackError> {
        validate_turn_request(&req)?;
        req.stream = Some(false);
        self.client
            .post(&turn_path(agent_id, session_id), req)
            .await
    }

    /// Create a turn and stream its events
    ///
    /// Returns a stream of decoded [`TurnEvent`](crate::types::events::TurnEvent)s,
    /// typically consumed through a
    /// [`TurnAccumulator`](crate::turn::TurnAccumulator).
    ///
    /// # Example
    ///
    /// ```ignore
    /// let stream = client
    ///     .turns()
    ///     .create_stream(&agent_id, &session_id, TurnCreateRequest::from_user("hi"))
    ///     .await?;
    /// let mut acc = TurnAccumulator::new(session_id.clone());
    /// let message = drive(stream, &mut acc, |update| render(update)).await?;
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the request carries no messages, fails to send,
    /// or the API returns a non-2xx status.
    pub async fn create_stream(
        &self,
        agent_id: &str,
        session_id: &str,
        mut req: TurnCreateRequest,
    ) -> Result<EventStream, StackError> {
        validate_turn_request(&req)?;
        req.stream = Some(true);
        let response = self
            .client
            .post_stream(&turn_path(agent_id, session_id), req)
            .await?;
        Ok(crate::sse::event_stream_from_response(response))
    }
}

fn turn_path(agent_id: &str, session_id: &str) -> String {
    format!("/v1/agents/{agent_id}/session/{session_id}/turn")
}

fn validate_turn_request(req: &TurnCreateRequest) -> Result<(), StackError> {
    if req.messages.is_empty() {
        return Err(StackError::Config(
            "turn requires at least one input message".into(),
        ));
    }
    Ok(())
}

impl<C: Config> Client<C> {
    /// Returns the Turns API resource
    #[must_use]
    pub const fn turns(&self) -> Turns<'_, C> {
        Turns::new(self)
    }
}
