use std::pin::Pin;
use std::sync::Arc;

use futures_util::Stream;
use tracing::{debug, warn};

use crate::aggregator::aggregate;
use crate::credentials::CredentialProvider;
use crate::error::ProviderError;
use crate::request::CompletionRequest;
use crate::stream::StreamEvent;

/// Boxed, single-pass sequence of stream events.
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Streaming chat completions against the xAI API with live search.
///
/// No timeout is set on the default HTTP client. Callers that need one pass
/// their own through [`XaiClient::with_http_client`].
#[derive(Clone)]
pub struct XaiClient {
    client: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl XaiClient {
    pub fn new(credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::with_http_client(reqwest::Client::new(), credentials)
    }

    pub fn with_http_client(
        client: reqwest::Client,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Stream the answer to `request`.
    ///
    /// Nothing is sent until the returned stream is first polled. Every call
    /// opens its own connection; dropping the stream closes it. Faults are
    /// reported once as `StreamEvent::Error` and never retried.
    pub fn stream(&self, request: CompletionRequest) -> EventStream {
        let client = self.client.clone();
        let credentials = Arc::clone(&self.credentials);

        Box::pin(async_stream::stream! {
            let resp = match open_stream(&client, credentials.as_ref(), &request).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, model = %request.model(), "completion request failed");
                    yield StreamEvent::Error { message: e.to_string() };
                    return;
                }
            };
            drop(request);

            for await event in aggregate(resp.bytes_stream()) {
                yield event;
            }
        })
    }
}

async fn open_stream(
    client: &reqwest::Client,
    credentials: &dyn CredentialProvider,
    request: &CompletionRequest,
) -> Result<reqwest::Response, ProviderError> {
    let url = credentials.endpoint();

    debug!(model = %request.model(), url = %url, "sending streaming request to xAI");

    let resp = client
        .post(&url)
        .bearer_auth(credentials.bearer_token())
        .header("content-type", "application/json")
        .header("accept", "text/event-stream")
        .json(request)
        .send()
        .await?;

    let status = resp.status().as_u16();
    if status == 429 {
        let retry = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .map(|s| s * 1000) // seconds to ms
            .unwrap_or(5000);
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry,
        });
    }

    if !resp.status().is_success() {
        let text = error_body(resp.text().await);
        warn!(status, body = %text, "xAI streaming API error");
        return Err(ProviderError::Api {
            status,
            message: text,
        });
    }

    Ok(resp)
}

/// Error response body, or why it could not be read.
fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(text) => text,
        Err(e) => format!("<unreadable error body: {e}>"),
    }
}
