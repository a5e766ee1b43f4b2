use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("request to {url} failed")]
    Request { url: String, source: reqwest::Error },
}

/// Abstraction over the HTTP liveness check for testability.
#[allow(async_fn_in_trait)]
pub trait HealthProbe: Send + Sync {
    /// Issue a single GET and return the response status code.
    async fn status(&self, url: &str) -> Result<u16, ProbeError>;
}

/// Real probe backed by reqwest.
///
/// Redirects are not followed: a 302 from the service must be observable
/// as 302, not as whatever the redirect target answers.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthProbe for HttpProbe {
    async fn status(&self, url: &str) -> Result<u16, ProbeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProbeError::Request {
                url: url.to_owned(),
                source: e,
            })?;
        Ok(response.status().as_u16())
    }
}

/// A freshly deployed service answering 200 or a login redirect (302)
/// counts as alive; anything else is reported but never fatal.
pub fn is_healthy(status: u16) -> bool {
    matches!(status, 200 | 302)
}
