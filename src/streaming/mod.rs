//! # Streaming Module
//!
//! Consumes Server-Sent Events (SSE) streamed chat completions. The
//! [`decoder`] submodule turns raw lines into [`StreamEvent`]s; this
//! module wires a live HTTP response body (a stream of byte chunks) to
//! that decoder.
//!
//! Decoding is strictly sequential and pull-based: one producer (the
//! response body), one consumer, no locks, no background work. Each
//! streaming request gets a fresh decoder; nothing is shared across
//! requests.

pub mod decoder;

// Re-export commonly used streaming types
pub use decoder::{decode_line, decode_lines, SseDecoder, StreamEvent};

use crate::error::ProbeError;
use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;

struct DecodeState<S> {
    body: Pin<Box<S>>,
    decoder: SseDecoder,
    pending: VecDeque<StreamEvent>,
    failed: bool,
}

/// Decode an HTTP response body into a lazy sequence of stream events.
///
/// Events come out in arrival order, one per poll. A transport failure is
/// yielded once as an `Err` item and ends the sequence; everything decoded
/// before it stands as a valid prefix. After [`StreamEvent::Done`] the
/// body is not polled again, even if the endpoint keeps sending.
pub fn decode_body<S, E>(body: S) -> impl Stream<Item = Result<StreamEvent, ProbeError>>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<ProbeError>,
{
    let state = DecodeState {
        body: Box::pin(body),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        failed: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((Ok(event), state));
            }
            if state.decoder.is_done() || state.failed {
                return None;
            }
            match state.body.next().await {
                Some(Ok(chunk)) => {
                    state.pending.extend(state.decoder.feed(&chunk));
                }
                Some(Err(err)) => {
                    state.failed = true;
                    return Some((Err(err.into()), state));
                }
                None => return None,
            }
        }
    })
}
