//! Transport and retry execution.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::multipart::to_form;
use crate::{
    ApiResponse, ClientConfig, Error, RequestBody, ResolvedRequest, Result, RetryPolicy,
    TransportError,
};

/// Performs a single HTTP round trip.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request once, without retrying.
    async fn send(&self, request: &ResolvedRequest)
    -> std::result::Result<ApiResponse, TransportError>;
}

/// [`Transport`] backed by a pooled reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport with the configured timeouts and user agent.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| Error::RequestBuild(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner,
            timeout: config.timeout,
        })
    }

    /// Wrap an existing reqwest client.
    pub fn from_client(inner: reqwest::Client, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &ResolvedRequest,
    ) -> std::result::Result<ApiResponse, TransportError> {
        let timeout = request.timeout.unwrap_or(self.timeout);
        let mut builder = self
            .inner
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .timeout(timeout);

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(bytes) => builder.body(bytes.clone()),
            RequestBody::Multipart(fields) => builder.multipart(to_form(fields)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e, timeout))?;

        ApiResponse::from_reqwest(response).await
    }
}

/// Executes requests through a [`Transport`] with timeout and retry policy.
#[derive(Clone)]
pub struct TransportClient {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    timeout: Duration,
}

impl TransportClient {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy, timeout: Duration) -> Self {
        Self {
            transport,
            retry,
            timeout,
        }
    }

    /// Build from configuration around the given transport.
    pub fn from_config(transport: Arc<dyn Transport>, config: &ClientConfig) -> Self {
        Self::new(transport, config.retry_policy(), config.timeout)
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Execute a request.
    ///
    /// Transport failures are retried with a fixed delay until the attempt
    /// budget runs out; any HTTP response, error status included, is
    /// returned as-is.
    pub async fn execute(
        &self,
        request: &ResolvedRequest,
    ) -> std::result::Result<ApiResponse, TransportError> {
        let timeout = request.timeout.unwrap_or(self.timeout);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let outcome = match tokio::time::timeout(timeout, self.transport.send(request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(TransportError::Timeout(timeout)),
            };

            match outcome {
                Ok(response) => return Ok(response),
                Err(e) if self.retry.should_retry(attempt, &e) => {
                    debug!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        error = %e,
                        url = %request.url,
                        "Retrying Wavius API request"
                    );
                    tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
                }
                Err(e) => {
                    warn!(
                        attempts = attempt,
                        error = %e,
                        url = %request.url,
                        "Wavius API request failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RequestBuilder, RequestSpec, Session};
    use http::StatusCode;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    /// Fails the first `failures` calls with a connection error.
    struct FlakyTransport {
        failures: u32,
        calls: AtomicU32,
        seen_at: Mutex<Vec<Instant>>,
        response: ApiResponse,
    }

    impl FlakyTransport {
        fn new(failures: u32, response: ApiResponse) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                seen_at: Mutex::new(Vec::new()),
                response,
            }
        }
    }

    #[async_trait]
    impl Transport for FlakyTransport {
        async fn send(
            &self,
            _request: &ResolvedRequest,
        ) -> std::result::Result<ApiResponse, TransportError> {
            self.seen_at.lock().unwrap().push(Instant::now());
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(TransportError::Connection("connection refused".into()))
            } else {
                Ok(self.response.clone())
            }
        }
    }

    /// Never answers.
    struct HangingTransport {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Transport for HangingTransport {
        async fn send(
            &self,
            _request: &ResolvedRequest,
        ) -> std::result::Result<ApiResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    fn request() -> ResolvedRequest {
        let config = ClientConfig::default();
        RequestBuilder::new(&config)
            .build(&RequestSpec::get("/status"), &Session::new())
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success_with_fixed_delay() {
        let delay = Duration::from_millis(1000);
        let transport = Arc::new(FlakyTransport::new(
            2,
            ApiResponse::new(StatusCode::OK, "{}"),
        ));
        let client = TransportClient::new(
            transport.clone(),
            RetryPolicy::fixed(3, delay),
            Duration::from_secs(30),
        );

        let response = client.execute(&request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);

        let seen = transport.seen_at.lock().unwrap();
        assert_eq!(seen[1] - seen[0], delay);
        assert_eq!(seen[2] - seen[1], delay);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_budget() {
        let transport = Arc::new(FlakyTransport::new(
            10,
            ApiResponse::new(StatusCode::OK, "{}"),
        ));
        let client = TransportClient::new(
            transport.clone(),
            RetryPolicy::fixed(3, Duration::from_millis(10)),
            Duration::from_secs(30),
        );

        let err = client.execute(&request()).await.unwrap_err();
        assert!(matches!(err, TransportError::Connection(_)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_status_not_retried() {
        let transport = Arc::new(FlakyTransport::new(
            0,
            ApiResponse::new(StatusCode::NOT_FOUND, r#"{"message":"not found"}"#),
        ));
        let client = TransportClient::new(
            transport.clone(),
            RetryPolicy::fixed(3, Duration::from_millis(10)),
            Duration::from_secs(30),
        );

        let response = client.execute(&request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retried_then_surfaced() {
        let transport = Arc::new(HangingTransport {
            calls: AtomicU32::new(0),
        });
        let client = TransportClient::new(
            transport.clone(),
            RetryPolicy::fixed(2, Duration::from_millis(100)),
            Duration::from_secs(5),
        );

        let err = client.execute(&request()).await.unwrap_err();
        assert_eq!(err, TransportError::Timeout(Duration::from_secs(5)));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_timeout_overrides_default() {
        let transport = Arc::new(HangingTransport {
            calls: AtomicU32::new(0),
        });
        let client = TransportClient::new(transport, RetryPolicy::none(), Duration::from_secs(5));

        let mut req = request();
        req.timeout = Some(Duration::from_secs(60));

        let start = Instant::now();
        let err = client.execute(&req).await.unwrap_err();
        assert_eq!(err, TransportError::Timeout(Duration::from_secs(60)));
        assert_eq!(start.elapsed(), Duration::from_secs(60));
    }
}
