//! HTTP client for outgoing API requests

use crate::config::OutgoingSettings;
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use std::time::Duration;

const USER_AGENT: &str = concat!("dorksmith/", env!("CARGO_PKG_VERSION"));

/// HTTP response reduced to what callers inspect
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl HttpResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.text)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client wrapper with Dorksmith-specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = Duration::try_from_secs_f64(settings.request_timeout).with_context(|| {
            format!("invalid request timeout: {}", settings.request_timeout)
        })?;
        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        Ok(Self {
            client: builder.build()?,
            default_timeout: timeout,
        })
    }

    /// POST a JSON body with extra headers
    pub async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> reqwest::Result<HttpResponse> {
        let mut req_builder = self
            .client
            .post(url)
            .timeout(self.default_timeout)
            .header("Accept", "application/json")
            .json(body);

        for (key, value) in headers {
            req_builder = req_builder.header(*key, *value);
        }

        let response = req_builder.send().await?;
        Self::parse_response(response).await
    }

    /// Parse response into HttpResponse
    async fn parse_response(response: Response) -> reqwest::Result<HttpResponse> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(HttpResponse { status, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        for timeout in [-1.0, f64::NAN, f64::INFINITY] {
            let settings = OutgoingSettings {
                request_timeout: timeout,
                ..OutgoingSettings::default()
            };
            assert!(HttpClient::with_settings(&settings).is_err());
        }
    }

    #[tokio::test]
    async fn test_post_json_sends_headers_and_reads_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("x-test", "yes"))
            .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"ok":true}"#))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client
            .post_json(
                &format!("{}/echo", server.uri()),
                &[("x-test", "yes")],
                &serde_json::json!({"a": 1}),
            )
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert!(response.is_success());
        let body: serde_json::Value = response.json().unwrap();
        assert_eq!(body["ok"], true);
    }
}
