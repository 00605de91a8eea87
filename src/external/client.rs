use std::time::Duration;

/// Builds the shared HTTP client for outbound calls.
///
/// One client per service, reused across requests for connection pooling and
/// DNS caching. The request timeout is the caller's per-upstream limit
/// (10s for the relay webhook, 30s for the gateway APIs); no retries happen
/// above it.
pub fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        // Timeouts
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        // Compression
        .gzip(true)
        // Security
        .use_rustls_tls()
        .build()
        .expect("Failed to build HTTP client")
}
