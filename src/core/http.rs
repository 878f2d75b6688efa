//! HTTP plumbing shared by the FPL and optimiser clients

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::rate_limit::RateLimiter;
use crate::{FplError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Headers sent with every request.
pub fn default_headers() -> Result<HeaderMap> {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let agent = format!("fpl-assist/{}", env!("CARGO_PKG_VERSION"));
    h.insert(USER_AGENT, HeaderValue::from_str(&agent)?);
    Ok(h)
}

/// Build the `reqwest` client used by both upstream clients.
pub fn build_client() -> Result<Client> {
    Ok(Client::builder()
        .default_headers(default_headers()?)
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

/// Join a base URL and a relative path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// GET `url` through `limiter` and decode the JSON body.
///
/// Rate-limit rejections, transport errors, non-success statuses and bad JSON
/// all come back as distinct [`FplError`] variants.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    limiter: &RateLimiter,
    url: &str,
    query: &[(&str, String)],
) -> Result<T> {
    let response = limiter
        .make_request(|| async {
            client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(FplError::from)
        })
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FplError::Upstream {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response.bytes().await?;
    debug!(url, bytes = body.len(), "response received");
    Ok(serde_json::from_slice(&body)?)
}
