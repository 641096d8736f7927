use dnsprobe_domain::config::ClusterConfig;
use dnsprobe_domain::ProbeError;
use reqwest::{Certificate, Client, Method, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

/// Status and body of an API server reply.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// `message` of a Kubernetes `Status` body, or the raw body.
    pub fn message(&self) -> String {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| self.body.trim().to_string())
    }
}

/// Thin Kubernetes REST client: path building, bearer auth, TLS settings and
/// a per-request timeout.
pub struct KubeApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl KubeApiClient {
    /// # Errors
    ///
    /// * `ProbeError::Deployment` - If the server URL, token file or CA file
    ///   cannot be used
    pub fn from_config(config: &ClusterConfig) -> Result<Self, ProbeError> {
        let base = Url::parse(&config.api_server).map_err(|e| {
            ProbeError::Deployment(format!("Invalid API server '{}': {}", config.api_server, e))
        })?;

        let token = match (&config.token, &config.token_file) {
            (Some(token), _) => Some(token.clone()),
            (None, Some(path)) => Some(
                std::fs::read_to_string(path)
                    .map_err(|e| {
                        ProbeError::Deployment(format!("Cannot read token file {}: {}", path, e))
                    })?
                    .trim()
                    .to_string(),
            ),
            (None, None) => None,
        };

        let mut builder = Client::builder()
            .use_rustls_tls()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .pool_max_idle_per_host(4)
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify);

        if let Some(ca_file) = &config.ca_file {
            let pem = std::fs::read(ca_file).map_err(|e| {
                ProbeError::Deployment(format!("Cannot read CA file {}: {}", ca_file, e))
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|e| {
                ProbeError::Deployment(format!("Invalid CA certificate {}: {}", ca_file, e))
            })?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|e| ProbeError::Deployment(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self { http, base, token })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends `segments` to the server URL, escaping each one.
    pub fn url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, String> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| format!("API server URL {} cannot take a path", self.base))?
            .pop_if_empty()
            .extend(segments.iter().map(|s| s.as_ref()));
        Ok(url)
    }

    /// Sends one request. The error string describes a transport failure;
    /// HTTP error statuses come back as a normal response.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse, String> {
        debug!(method = %method, url = %url, "API request");

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body.to_string());
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("{} {} failed: {}", method, url, e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response from {}: {}", url, e))?;

        debug!(method = %method, url = %url, status = status.as_u16(), "API response");
        Ok(ApiResponse { status, body })
    }

    pub async fn get(&self, url: Url) -> Result<ApiResponse, String> {
        self.send(Method::GET, url, None).await
    }
}
