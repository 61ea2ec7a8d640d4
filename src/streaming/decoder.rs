//! # Streaming Response Decoder
//!
//! Incremental decoder for Server-Sent-Events-style streamed chat
//! completions. The endpoint writes one record per line, either blank or
//! `data: <payload>`, where the payload is a completion chunk or the
//! literal `[DONE]` sentinel. Decoding is best-effort: keep-alives,
//! comments and unparseable payloads are skipped, never fatal, so a
//! half-working endpoint still yields every fragment it managed to send.

use crate::schemas::ChatCompletionChunk;
use bytes::BytesMut;
use futures_util::stream::{self, Stream, StreamExt};

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// A single decoded unit from a streamed completion body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A piece of generated text carried by `choices[0].delta.content`
    Fragment(String),
    /// The `[DONE]` sentinel: the stream is complete
    Done,
}

/// Decode one SSE line into at most one event.
///
/// Returns `None` for lines that carry nothing: blank lines, non-`data:`
/// directives (comments, keep-alives, `event:`/`id:`/`retry:` fields),
/// unparseable payloads, chunks without choices, and deltas without
/// content. Only the first choice is inspected; multi-choice streaming is
/// not part of the wire contract this decoder consumes.
pub fn decode_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim_end_matches('\r');
    let payload = line.strip_prefix(DATA_PREFIX)?;

    if payload == DONE_SENTINEL {
        return Some(StreamEvent::Done);
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(payload).ok()?;
    let choice = chunk.choices.into_iter().next()?;
    match choice.delta.content {
        Some(text) if !text.is_empty() => Some(StreamEvent::Fragment(text)),
        _ => None,
    }
}

/// Stateful line-reassembling decoder for raw transport chunks.
///
/// Transport chunks do not align to line boundaries, so bytes after the
/// last newline are buffered until the next [`feed`](Self::feed) call.
/// Buffering happens on bytes, not text: a multi-byte UTF-8 character
/// split across two chunks is reassembled before any string conversion.
///
/// One decoder per streaming request. Once the sentinel has been seen the
/// decoder is spent: further input is ignored and no event is ever
/// emitted after [`StreamEvent::Done`].
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: BytesMut,
    done: bool,
}

impl SseDecoder {
    /// Create a decoder for a fresh streaming request
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the terminal sentinel has been observed
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed one transport chunk; returns the events decoded from every
    /// line the chunk completed, in arrival order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.done {
            return events;
        }

        self.buf.extend_from_slice(chunk);
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line = self.buf.split_to(pos + 1);
            let text = String::from_utf8_lossy(&line[..pos]);
            match decode_line(&text) {
                Some(StreamEvent::Done) => {
                    self.done = true;
                    self.buf.clear();
                    events.push(StreamEvent::Done);
                    break;
                }
                Some(event) => events.push(event),
                None => {}
            }
        }
        events
    }
}

/// Decode a lazy sequence of raw lines into a lazy sequence of events.
///
/// Pull-based: nothing is read from `lines` until the returned stream is
/// polled, and after the sentinel the source is not read again. The
/// stream ends when the source is exhausted or `Done` was emitted,
/// whichever comes first.
pub fn decode_lines<S>(lines: S) -> impl Stream<Item = StreamEvent>
where
    S: Stream<Item = String> + Unpin,
{
    stream::unfold((lines, false), |(mut lines, done)| async move {
        if done {
            return None;
        }
        while let Some(line) = lines.next().await {
            match decode_line(&line) {
                Some(StreamEvent::Done) => return Some((StreamEvent::Done, (lines, true))),
                Some(event) => return Some((event, (lines, false))),
                None => {}
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment_line(text: &str) -> String {
        format!(
            "data: {}",
            serde_json::json!({"choices":[{"delta":{"content": text}}]})
        )
    }

    #[test]
    fn test_well_formed_line_yields_fragment() {
        let event = decode_line(r#"data: {"choices":[{"delta":{"content":"X"}}]}"#);
        assert_eq!(event, Some(StreamEvent::Fragment("X".to_string())));
    }

    #[test]
    fn test_done_sentinel() {
        assert_eq!(decode_line("data: [DONE]"), Some(StreamEvent::Done));
    }

    #[test]
    fn test_blank_line_skipped() {
        assert_eq!(decode_line(""), None);
    }

    #[test]
    fn test_non_data_lines_skipped() {
        assert_eq!(decode_line(": keep-alive"), None);
        assert_eq!(decode_line("event: message"), None);
        assert_eq!(decode_line("retry: 1000"), None);
    }

    #[test]
    fn test_malformed_json_skipped() {
        assert_eq!(decode_line("data: not-json"), None);
    }

    #[test]
    fn test_empty_choices_skipped() {
        assert_eq!(decode_line(r#"data: {"choices":[]}"#), None);
    }

    #[test]
    fn test_missing_choices_skipped() {
        assert_eq!(decode_line(r#"data: {"object":"chat.completion.chunk"}"#), None);
    }

    #[test]
    fn test_delta_without_content_skipped() {
        assert_eq!(
            decode_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
        assert_eq!(
            decode_line(r#"data: {"choices":[{"delta":{"content":""}}]}"#),
            None
        );
    }

    #[test]
    fn test_first_choice_wins() {
        let event = decode_line(
            r#"data: {"choices":[{"delta":{"content":"first"}},{"delta":{"content":"second"}}]}"#,
        );
        assert_eq!(event, Some(StreamEvent::Fragment("first".to_string())));
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(decode_line("data: [DONE]\r"), Some(StreamEvent::Done));
        assert_eq!(
            decode_line("data: {\"choices\":[{\"delta\":{\"content\":\"X\"}}]}\r"),
            Some(StreamEvent::Fragment("X".to_string()))
        );
    }

    #[tokio::test]
    async fn test_lines_decode_in_order_and_stop_at_done() {
        let lines = vec![
            "data: {\"choices\":[{\"delta\":{\"content\":\"Жил\"}}]}".to_string(),
            "data: {\"choices\":[{\"delta\":{\"content\":\"-был\"}}]}".to_string(),
            "data: [DONE]".to_string(),
            "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}".to_string(),
        ];
        let events: Vec<StreamEvent> =
            decode_lines(stream::iter(lines)).collect().await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Fragment("Жил".to_string()),
                StreamEvent::Fragment("-был".to_string()),
                StreamEvent::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_lines_with_noise_interleaved() {
        let lines = vec![
            String::new(),
            ": keep-alive".to_string(),
            fragment_line("a"),
            "data: not-json".to_string(),
            fragment_line("b"),
        ];
        let events: Vec<StreamEvent> = decode_lines(stream::iter(lines)).collect().await;
        assert_eq!(
            events,
            vec![
                StreamEvent::Fragment("a".to_string()),
                StreamEvent::Fragment("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_feed_reassembles_split_lines() {
        let mut decoder = SseDecoder::new();
        let line = fragment_line("hello") + "\n";
        let (head, tail) = line.as_bytes().split_at(12);

        assert!(decoder.feed(head).is_empty());
        assert_eq!(
            decoder.feed(tail),
            vec![StreamEvent::Fragment("hello".to_string())]
        );
    }

    #[test]
    fn test_feed_reassembles_split_utf8() {
        let mut decoder = SseDecoder::new();
        let line = fragment_line("Жил") + "\n";
        let bytes = line.as_bytes();
        // Split inside the first Cyrillic character's two-byte encoding
        let split = line.find('Ж').unwrap() + 1;

        assert!(decoder.feed(&bytes[..split]).is_empty());
        assert_eq!(
            decoder.feed(&bytes[split..]),
            vec![StreamEvent::Fragment("Жил".to_string())]
        );
    }

    #[test]
    fn test_feed_multiple_lines_per_chunk() {
        let mut decoder = SseDecoder::new();
        let chunk = format!("{}\n\n{}\n", fragment_line("a"), fragment_line("b"));
        assert_eq!(
            decoder.feed(chunk.as_bytes()),
            vec![
                StreamEvent::Fragment("a".to_string()),
                StreamEvent::Fragment("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_feed_stops_at_done_within_chunk() {
        let mut decoder = SseDecoder::new();
        let chunk = format!(
            "{}\ndata: [DONE]\n{}\n",
            fragment_line("kept"),
            fragment_line("ignored")
        );
        assert_eq!(
            decoder.feed(chunk.as_bytes()),
            vec![StreamEvent::Fragment("kept".to_string()), StreamEvent::Done]
        );
        assert!(decoder.is_done());
        assert!(decoder.feed(format!("{}\n", fragment_line("late")).as_bytes()).is_empty());
    }

    #[test]
    fn test_feed_crlf() {
        let mut decoder = SseDecoder::new();
        let chunk = format!("{}\r\ndata: [DONE]\r\n", fragment_line("x"));
        assert_eq!(
            decoder.feed(chunk.as_bytes()),
            vec![StreamEvent::Fragment("x".to_string()), StreamEvent::Done]
        );
    }
}
