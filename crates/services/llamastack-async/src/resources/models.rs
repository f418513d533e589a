use crate::{
    client::Client,
    config::Config,
    error::StackError,
    types::models::{Model, ModelsListResponse},
};

/// API resource for the `/v1/models` endpoints
pub struct Models<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Models<'c, C> {
    /// Creates a new Models resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// List the models registered with the stack
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails to send or the API returns an
    /// error.
    pub async fn list(&self) -> Result<ModelsListResponse, StackError> {
        self.client.get("/v1/models").await
    }

    /// Get a single model by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails to send or the API returns an
    /// error (including 404 for an unknown model).
    pub async fn get(&self, model_id: &str) -> Result<Model, StackError> {
        self.client.get(&format!("/v1/models/{model_id}")).await
    }
}

impl<C: Config> Client<C> {
    /// Returns the Models API resource
    #[must_use]
    pub const fn models(&self) -> Models<'_, C> {
        Models::new(self)
    }
}
