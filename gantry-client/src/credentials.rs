//! Credential-related API endpoints

use crate::EngineClient;
use crate::error::Result;
use gantry_core::dto::credential::CredentialCheck;

impl EngineClient {
    // =============================================================================
    // Provider Credentials
    // =============================================================================

    /// Check whether a provider credential is currently valid
    ///
    /// Used as a pre-flight gate before submitting runs whose nodes depend
    /// on an external provider. A failed check means the caller should send
    /// the user through the provider's authorization flow instead of
    /// starting the run.
    ///
    /// # Arguments
    /// * `provider` - Provider name (e.g., "google")
    ///
    /// # Returns
    /// The validity flag reported by the engine
    pub async fn validate_credential(&self, provider: &str) -> Result<CredentialCheck> {
        let url = format!("{}/api/credentials/{}/validate", self.base_url, provider);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
