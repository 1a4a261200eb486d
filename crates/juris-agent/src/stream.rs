/// Events emitted while a completion streams in.
///
/// A stream yields any number of `TextDelta`s followed by exactly one
/// terminal event: `Final` on success, `Error` on a transport fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental answer text, in arrival order.
    TextDelta { text: String },

    /// Consolidated answer once the stream has closed.
    Final(FinalResult),

    /// Transport or protocol failure. Nothing follows it.
    Error { message: String },
}

impl StreamEvent {
    pub fn as_text_delta(&self) -> Option<&str> {
        match self {
            Self::TextDelta { text } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinalResult {
    /// Concatenation of every `TextDelta` emitted before this result.
    pub complete_text: String,
    /// Citation references in arrival order, duplicates kept.
    pub citations: Vec<String>,
    /// Model name echoed by the service, if any frame carried one.
    pub model: Option<String>,
    /// Last usage block seen on the stream.
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Extract the payload of an SSE `data:` line.
/// The single space after the colon is optional per the SSE grammar.
pub fn parse_sse_line(line: &str) -> Option<&str> {
    let data = line.strip_prefix("data:")?;
    Some(data.strip_prefix(' ').unwrap_or(data))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// JSON payload of a `data:` line (not yet parsed).
    Data(String),
    /// `data: [DONE]`
    Done,
}

fn frame_from_line(line: &str) -> Option<SseFrame> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    // event:, id:, retry: and `:` comments carry nothing we use
    let data = parse_sse_line(line)?.trim();
    if data == "[DONE]" {
        Some(SseFrame::Done)
    } else {
        Some(SseFrame::Data(data.to_string()))
    }
}

/// Line buffer for an SSE body arriving in arbitrary chunks.
///
/// Network reads do not line up with frames: one read may hold several
/// lines, half a line, or half a UTF-8 character. Bytes are buffered raw
/// and only complete lines are decoded.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Next complete frame in the buffer, or `None` until more bytes arrive.
    pub fn next_frame(&mut self) -> Option<SseFrame> {
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(frame) = frame_from_line(&String::from_utf8_lossy(&line)) {
                return Some(frame);
            }
        }
        None
    }

    /// Decode whatever follows the last newline once the body has ended.
    pub fn finish(&mut self) -> Option<SseFrame> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buf);
        frame_from_line(&String::from_utf8_lossy(&rest))
    }
}
