use crate::core::error::Result;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// JSON-over-HTTP client rooted at a base URL.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str, timeout: Duration) -> Result<R> {
        let response = self
            .client
            .get(self.url(path))
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<R>().await?)
    }

    pub async fn post_json<T, R>(&self, path: &str, payload: &T, timeout: Duration) -> Result<R>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .timeout(timeout)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<R>().await?)
    }
}
