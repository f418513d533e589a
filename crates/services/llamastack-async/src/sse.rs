//! Server-sent event transport for streamed turns.
//!
//! Decoding happens once here, at the transport boundary: raw bytes become
//! [`SseFrame`]s, and each frame becomes exactly one [`TurnEvent`] variant.
//! Payload shapes the decoder does not recognize become
//! [`TurnEvent::Unknown`] rather than errors; only transport failures
//! surface as `Err` items on the stream.

use std::collections::VecDeque;
use std::pin::Pin;

use futures::Stream;
use serde::Deserialize;

use crate::error::StackError;
use crate::types::events::{ShieldVerdict, ToolInvocation, TurnEvent};
use crate::types::messages::StopReason;

/// Type alias for the event stream returned by streaming turn creation
pub type EventStream =
    Pin<Box<dyn Stream<Item = Result<TurnEvent, StackError>> + Send + 'static>>;

// =========================================================================
// SSE Frame and Decoder
// =========================================================================

/// Raw SSE frame with optional event type and data payload
#[derive(Debug, Clone, Default)]
pub struct SseFrame {
    /// Event type (from `event:` line)
    pub event: Option<String>,
    /// Data payload (from `data:` lines, may be multiline)
    pub data: String,
}

/// SSE decoder that parses raw bytes into frames
///
/// Handles:
/// - Multi-line data (multiple `data:` lines)
/// - Chunk boundaries splitting lines
/// - Empty `data:` lines
/// - Unknown fields (ignored per SSE spec)
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    current_frame: SseFrame,
}

impl SseDecoder {
    /// Create a new decoder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a chunk of bytes and return any complete frames
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        let text = String::from_utf8_lossy(chunk);
        self.buffer.push_str(&text);

        let mut frames = Vec::new();

        while let Some(newline_pos) = self.buffer.find('\n') {
            let line = self.buffer[..newline_pos]
                .trim_end_matches('\r')
                .to_string();
            self.buffer = self.buffer[newline_pos + 1..].to_string();

            if line.is_empty() {
                // Blank line = end of frame
                if self.current_frame.event.is_some() || !self.current_frame.data.is_empty() {
                    frames.push(std::mem::take(&mut self.current_frame));
                }
            } else {
                self.consume_field(&line);
            }
        }

        frames
    }

    /// Flush any remaining data as a final frame
    ///
    /// Processes any incomplete line still in the buffer before returning
    /// the current frame. Call when the byte stream ends without a trailing
    /// blank line.
    pub fn flush(&mut self) -> Option<SseFrame> {
        if !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.consume_field(line.trim_end_matches('\r'));
        }

        if self.current_frame.event.is_some() || !self.current_frame.data.is_empty() {
            Some(std::mem::take(&mut self.current_frame))
        } else {
            None
        }
    }

    fn consume_field(&mut self, line: &str) {
        if let Some(value) = line.strip_prefix("event:") {
            self.current_frame.event = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("data:") {
            let data_value = value.strip_prefix(' ').unwrap_or(value);
            if !self.current_frame.data.is_empty() {
                self.current_frame.data.push('\n');
            }
            self.current_frame.data.push_str(data_value);
        }
        // Ignore other fields (id:, retry:, comments starting with :)
    }
}

// =========================================================================
// Wire structures
// =========================================================================

// The agents API wraps every chunk as {"event": {"payload": {...}}} with an
// event_type discriminator and, for step events, a step_type.

#[derive(Deserialize)]
struct StreamChunk {
    event: ChunkEvent,
}

#[derive(Deserialize)]
struct ChunkEvent {
    payload: ChunkPayload,
}

#[derive(Deserialize)]
struct ChunkPayload {
    event_type: String,
    #[serde(default)]
    step_type: Option<String>,
    #[serde(default)]
    delta: Option<ChunkDelta>,
    #[serde(default)]
    step_details: Option<StepDetails>,
    #[serde(default)]
    turn: Option<ChunkTurn>,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
struct StepDetails {
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
    #[serde(default)]
    tool_responses: Vec<WireToolResponse>,
    #[serde(default)]
    violation: Option<WireViolation>,
}

#[derive(Deserialize)]
struct WireToolCall {
    tool_name: String,
    #[serde(default)]
    arguments: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct WireToolResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireViolation {
    #[serde(default)]
    user_message: Option<String>,
}

#[derive(Deserialize)]
struct ChunkTurn {
    #[serde(default)]
    output_message: Option<WireOutputMessage>,
}

#[derive(Deserialize)]
struct WireOutputMessage {
    #[serde(default)]
    stop_reason: Option<StopReason>,
}

// =========================================================================
// Frame decoding
// =========================================================================

/// Decode one SSE frame into a [`TurnEvent`].
///
/// Total over arbitrary input: undecodable JSON or unrecognized
/// `event_type`/`step_type` combinations map to [`TurnEvent::Unknown`]
/// carrying the raw payload.
#[must_use]
pub fn decode_frame(frame: &SseFrame) -> TurnEvent {
    let raw: serde_json::Value = match serde_json::from_str(&frame.data) {
        Ok(v) => v,
        Err(_) => {
            return TurnEvent::Unknown {
                raw: serde_json::Value::String(frame.data.clone()),
            };
        }
    };

    let Ok(chunk) = serde_json::from_value::<StreamChunk>(raw.clone()) else {
        return TurnEvent::Unknown { raw };
    };

    let payload = chunk.event.payload;
    match (payload.event_type.as_str(), payload.step_type.as_deref()) {
        ("step_progress", Some("inference")) => match payload.delta {
            Some(delta) if delta.kind == "text" => TurnEvent::TextDelta { text: delta.text },
            _ => TurnEvent::Unknown { raw },
        },
        ("step_complete", Some("tool_execution")) => {
            let details = payload.step_details.unwrap_or_default();
            let calls = details
                .tool_calls
                .into_iter()
                .enumerate()
                .map(|(i, call)| ToolInvocation {
                    name: call.tool_name,
                    arguments: call.arguments,
                    output: details
                        .tool_responses
                        .get(i)
                        .and_then(|r| r.content.clone()),
                })
                .collect();
            TurnEvent::ToolCallComplete { calls }
        }
        ("step_complete", Some("shield_call")) => {
            let details = payload.step_details.unwrap_or_default();
            let verdict = match details.violation {
                Some(v) => ShieldVerdict::Violation {
                    user_message: v.user_message,
                },
                None => ShieldVerdict::Pass,
            };
            TurnEvent::SafetyCheckComplete { verdict }
        }
        ("turn_complete", _) => TurnEvent::TurnComplete {
            stop_reason: payload
                .turn
                .and_then(|t| t.output_message)
                .and_then(|m| m.stop_reason),
        },
        _ => TurnEvent::Unknown { raw },
    }
}

// =========================================================================
// Stream creation
// =========================================================================

/// Create an event stream from a reqwest Response
///
/// Converts the response body into a stream of decoded turn events. The
/// stream owns the response and closes the connection when dropped.
#[must_use]
pub fn event_stream_from_response(response: reqwest::Response) -> EventStream {
    use futures::StreamExt;

    let byte_stream = response.bytes_stream();

    Box::pin(futures::stream::unfold(
        (
            byte_stream,
            SseDecoder::new(),
            VecDeque::<SseFrame>::new(),
            false,
        ),
        |(mut stream, mut decoder, mut pending, mut ended)| async move {
            loop {
                if let Some(frame) = pending.pop_front() {
                    return Some((
                        Ok(decode_frame(&frame)),
                        (stream, decoder, pending, ended),
                    ));
                }
                if ended {
                    return None;
                }
                match stream.next().await {
                    Some(Ok(chunk)) => pending.extend(decoder.push(&chunk)),
                    Some(Err(e)) => {
                        return Some((
                            Err(StackError::Reqwest(e)),
                            (stream, decoder, pending, ended),
                        ));
                    }
                    None => {
                        if let Some(frame) = decoder.flush() {
                            pending.push_back(frame);
                        }
                        ended = true;
                    }
                }
            }
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::events::EventCategory;

    #[test]
    fn decoder_single_frame() {
        let mut decoder = SseDecoder::new();
        let chunk = b"data: {\"event\":{\"payload\":{\"event_type\":\"turn_complete\"}}}\n\n";
        let frames = decoder.push(chunk);
        assert_eq!(frames.len(), 1);
        assert!(frames[0].data.contains("turn_complete"));
    }

    #[test]
    fn decoder_split_chunks() {
        let mut decoder = SseDecoder::new();
        let frames1 = decoder.push(b"da");
        assert!(frames1.is_empty());
        let frames2 = decoder.push(b"ta: hello\n\n");
        assert_eq!(frames2.len(), 1);
        assert_eq!(frames2[0].data, "hello");
    }

    #[test]
    fn decoder_flush_incomplete() {
        let mut decoder = SseDecoder::new();
        decoder.push(b"data: truncated");
        let frame = decoder.flush().unwrap();
        assert_eq!(frame.data, "truncated");
    }

    #[test]
    fn malformed_json_becomes_unknown() {
        let frame = SseFrame {
            event: None,
            data: "not json at all".into(),
        };
        let event = decode_frame(&frame);
        assert_eq!(event.category(), EventCategory::Unknown);
    }
}
