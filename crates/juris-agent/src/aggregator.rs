use futures_util::{Stream, StreamExt};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::stream::{FinalResult, SseDecoder, SseFrame, StreamEvent, TokenUsage};

/// Accumulates text and citations across the frames of one stream.
#[derive(Debug, Default)]
pub struct Aggregator {
    text: String,
    citations: Vec<String>,
    model: Option<String>,
    usage: Option<TokenUsage>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one `data:` payload and return the text delta it carried.
    ///
    /// Payloads that are not valid JSON are logged and skipped. Fields are
    /// read independently, so a metadata field of unexpected type is ignored
    /// without losing the frame's text or citations.
    pub fn apply(&mut self, data: &str) -> Option<String> {
        let frame: Value = match serde_json::from_str(data) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, line = %data, "skipping malformed stream frame");
                return None;
            }
        };

        if let Some(model) = frame.get("model").and_then(Value::as_str) {
            self.model = Some(model.to_string());
        }
        if let Some(usage) = frame.get("usage").and_then(token_usage) {
            self.usage = Some(usage);
        }
        if let Some(citations) = frame.get("citations").and_then(Value::as_array) {
            self.citations
                .extend(citations.iter().cloned().map(citation_text));
        }

        let content = frame
            .pointer("/choices/0/delta/content")
            .and_then(Value::as_str)
            .filter(|content| !content.is_empty())?;
        self.text.push_str(content);
        Some(content.to_string())
    }

    pub fn finish(self) -> FinalResult {
        FinalResult {
            complete_text: self.text,
            citations: self.citations,
            model: self.model,
            usage: self.usage,
        }
    }
}

fn citation_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Usage block with missing or non-numeric counters read as zero.
fn token_usage(value: &Value) -> Option<TokenUsage> {
    let usage = value.as_object()?;
    let count = |key: &str| {
        usage
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0)
    };
    Some(TokenUsage {
        prompt_tokens: count("prompt_tokens"),
        completion_tokens: count("completion_tokens"),
    })
}

/// Turn a raw SSE byte stream into `StreamEvent`s.
///
/// Each text delta is yielded before the next frame is decoded. The stream
/// ends with one `Final` when the body ends or `[DONE]` arrives, or with one
/// `Error` if a read fails, in which case no `Final` follows.
pub fn aggregate<S, B, E>(byte_stream: S) -> impl Stream<Item = StreamEvent>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    async_stream::stream! {
        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut decoder = SseDecoder::new();
        let mut aggregator = Aggregator::new();

        'read: loop {
            match byte_stream.next().await {
                Some(Ok(chunk)) => {
                    decoder.feed(chunk.as_ref());
                    while let Some(frame) = decoder.next_frame() {
                        let data = match frame {
                            SseFrame::Done => break 'read,
                            SseFrame::Data(data) => data,
                        };
                        if let Some(text) = aggregator.apply(&data) {
                            debug!(len = text.len(), "stream text delta");
                            yield StreamEvent::TextDelta { text };
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!(error = %e, "stream interrupted");
                    yield StreamEvent::Error {
                        message: format!("Stream interrupted: {e}"),
                    };
                    return;
                }
                None => {
                    // connection closed without [DONE]; keep what arrived
                    if let Some(SseFrame::Data(data)) = decoder.finish() {
                        if let Some(text) = aggregator.apply(&data) {
                            yield StreamEvent::TextDelta { text };
                        }
                    }
                    break;
                }
            }
        }

        let result = aggregator.finish();
        info!(
            chars = result.complete_text.chars().count(),
            citations = result.citations.len(),
            "stream completed"
        );
        yield StreamEvent::Final(result);
    }
}
