use reqwest::{Client, Response};
use std::fmt;
use std::time::{Duration, Instant};

use crate::core::scan::NewScanResult;
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Leaderboard,
    ScanResults,
    Questions,
    Health,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Leaderboard => write!(f, "/api/leaderboard"),
            Endpoint::ScanResults => write!(f, "/api/scan-results"),
            Endpoint::Questions => write!(f, "/api/questions"),
            Endpoint::Health => write!(f, "/health"),
        }
    }
}

/// One request as seen by the load tester.
#[derive(Debug, Clone)]
pub struct Sample {
    pub endpoint: Endpoint,
    pub status: u16,
    /// Value of the `X-Cache` response header, if any.
    pub cache: Option<String>,
    pub latency: Duration,
}

impl Sample {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct QuizClient {
    http_client: Client,
    base_url: String,
}

impl QuizClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get(&self, endpoint: Endpoint) -> AppResult<Sample> {
        let started = Instant::now();
        let response = self.http_client.get(self.url(endpoint)).send().await?;
        Ok(sample(endpoint, &response, started.elapsed()))
    }

    pub async fn leaderboard(&self) -> AppResult<Sample> {
        self.get(Endpoint::Leaderboard).await
    }

    pub async fn questions(&self) -> AppResult<Sample> {
        self.get(Endpoint::Questions).await
    }

    pub async fn health(&self) -> AppResult<Sample> {
        self.get(Endpoint::Health).await
    }

    pub async fn submit(&self, scan: &NewScanResult) -> AppResult<Sample> {
        let endpoint = Endpoint::ScanResults;
        let started = Instant::now();
        let response = self
            .http_client
            .post(self.url(endpoint))
            .json(scan)
            .send()
            .await?;
        Ok(sample(endpoint, &response, started.elapsed()))
    }
}

fn sample(endpoint: Endpoint, response: &Response, latency: Duration) -> Sample {
    Sample {
        endpoint,
        status: response.status().as_u16(),
        cache: response
            .headers()
            .get("x-cache")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string()),
        latency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_paths() {
        assert_eq!(Endpoint::Leaderboard.to_string(), "/api/leaderboard");
        assert_eq!(Endpoint::ScanResults.to_string(), "/api/scan-results");
        assert_eq!(Endpoint::Questions.to_string(), "/api/questions");
        assert_eq!(Endpoint::Health.to_string(), "/health");
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = QuizClient::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.url(Endpoint::Leaderboard),
            "http://localhost:3000/api/leaderboard"
        );
    }
}
