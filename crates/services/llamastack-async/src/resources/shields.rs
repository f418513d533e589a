use crate::{
    client::Client,
    config::Config,
    error::StackError,
    types::shields::{Shield, ShieldRegisterRequest, ShieldsListResponse},
};

/// API resource for the `/v1/shields` endpoints
pub struct Shields<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Shields<'c, C> {
    /// Creates a new Shields resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// List the shields registered with the stack
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails to send or the API returns an
    /// error.
    pub async fn list(&self) -> Result<ShieldsListResponse, StackError> {
        self.client.get("/v1/shields").await
    }

    /// Register a shield so agents can reference it by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the shield id is empty, the request fails to
    /// send, or the API returns an error.
    pub async fn register(&self, req: ShieldRegisterRequest) -> Result<Shield, StackError> {
        if req.shield_id.is_empty() {
            return Err(StackError::Config("shield_id must not be empty".into()));
        }
        self.client.post("/v1/shields", req).await
    }
}

impl<C: Config> Client<C> {
    /// Returns the Shields API resource
    #[must_use]
    pub const fn shields(&self) -> Shields<'_, C> {
        Shields::new(self)
    }
}
