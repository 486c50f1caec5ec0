//! Incremental day-block segmentation over a live model stream.
//!
//! The segmenter buffers model output only until a day block is known to be
//! complete (the next `Day N:` header or the end-of-plan marker arrives),
//! reconciles that block and releases it. Once the marker is seen everything
//! else is forwarded untouched.
//!
//! Output depends only on the concatenated input, never on how it was split
//! into fragments.

use std::collections::VecDeque;
use std::mem;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::stream::unfold;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::planner::constants::{END_OF_PLAN_MARKER, MAX_PLAN_DAYS};
use crate::planner::parser::DayBlockParser;
use crate::planner::reconcile::{ReconcileConfig, reconcile};

/// Stream-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Literal that ends the structured plan.
    pub end_marker: String,

    /// Day blocks reconciled before the rest pass through verbatim.
    pub max_days: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            end_marker: END_OF_PLAN_MARKER.to_string(),
            max_days: MAX_PLAN_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// Buffering until a day block is complete.
    Accumulating,
    /// End-of-plan marker seen; forwarding verbatim.
    Suggestion,
    /// Input exhausted while accumulating; nothing more is emitted.
    Drained,
}

/// Transforms a fragmented plan stream into its reconciled form.
#[derive(Debug)]
pub struct Segmenter {
    parser: Arc<DayBlockParser>,
    config: Arc<ReconcileConfig>,
    max_days: usize,
    state: SegmenterState,
    buffer: String,
    days_reconciled: usize,
}

impl Segmenter {
    pub fn new(parser: Arc<DayBlockParser>, config: Arc<ReconcileConfig>, max_days: usize) -> Self {
        Self {
            parser,
            config,
            max_days,
            state: SegmenterState::Accumulating,
            buffer: String::new(),
            days_reconciled: 0,
        }
    }

    /// Build a segmenter with its own parser.
    pub fn from_config(config: ReconcileConfig, stream: &StreamConfig) -> Result<Self> {
        let parser = DayBlockParser::new(stream.end_marker.clone())?;
        Ok(Self::new(Arc::new(parser), Arc::new(config), stream.max_days))
    }

    pub fn state(&self) -> SegmenterState {
        self.state
    }

    pub fn days_reconciled(&self) -> usize {
        self.days_reconciled
    }

    /// Consume one fragment and return whatever output is now final.
    pub fn feed(&mut self, fragment: &str) -> String {
        match self.state {
            SegmenterState::Suggestion => fragment.to_string(),
            SegmenterState::Drained => String::new(),
            SegmenterState::Accumulating => {
                self.buffer.push_str(fragment);
                self.advance()
            }
        }
    }

    /// Signal end of input and flush what is still buffered.
    pub fn finish(&mut self) -> String {
        if self.state != SegmenterState::Accumulating {
            return String::new();
        }
        self.state = SegmenterState::Drained;

        let rest = mem::take(&mut self.buffer);
        let mut out = String::new();
        self.flush_blocks(&rest, &mut out);
        tracing::debug!(days = self.days_reconciled, "stream drained");
        out
    }

    /// Run a whole fragment sequence through a fresh segmenter.
    pub fn process<I, S>(mut self, fragments: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = String::new();
        for fragment in fragments {
            out.push_str(&self.feed(fragment.as_ref()));
        }
        out.push_str(&self.finish());
        out
    }

    fn advance(&mut self) -> String {
        let mut out = String::new();

        if let Some(pos) = self.buffer.find(self.parser.end_marker()) {
            let suggestion = self.buffer.split_off(pos);
            let plan = mem::take(&mut self.buffer);
            self.flush_blocks(&plan, &mut out);
            out.push_str(&suggestion);
            self.state = SegmenterState::Suggestion;
            tracing::debug!(days = self.days_reconciled, "end of plan reached");
            return out;
        }

        let headers = self.parser.day_headers(&self.buffer);
        if let Some(last) = headers.last() {
            // Everything before the newest header is complete.
            let pending = self.buffer.split_off(last.start);
            let complete = mem::replace(&mut self.buffer, pending);
            self.flush_blocks(&complete, &mut out);
        }
        out
    }

    /// Emit `text` split at day headers: leading text verbatim, each day
    /// reconciled while under the day cap.
    fn flush_blocks(&mut self, text: &str, out: &mut String) {
        let headers = self.parser.day_headers(text);
        let Some(first) = headers.first() else {
            out.push_str(text);
            return;
        };
        out.push_str(&text[..first.start]);

        for (i, header) in headers.iter().enumerate() {
            let end = headers.get(i + 1).map_or(text.len(), |next| next.start);
            self.emit_block(&text[header.start..end], out);
        }
    }

    fn emit_block(&mut self, block: &str, out: &mut String) {
        if self.days_reconciled >= self.max_days {
            tracing::warn!(cap = self.max_days, "day beyond plan length, passing through");
            out.push_str(block);
            return;
        }

        match self.parser.parse(block) {
            Ok(day) => {
                self.days_reconciled += 1;
                out.push_str(&reconcile(&day, &self.config));
            }
            Err(e) => {
                tracing::warn!(error = %e, "day block left unreconciled");
                out.push_str(block);
            }
        }
    }
}

/// Wrap an upstream token stream so that it yields reconciled output.
///
/// Output is released one character per item as soon as it is final. An
/// upstream error is yielded once and ends the stream; dropping the returned
/// stream drops the upstream.
pub fn reconcile_stream<S, E>(
    upstream: S,
    segmenter: Segmenter,
) -> impl Stream<Item = std::result::Result<String, E>> + Send
where
    S: Stream<Item = std::result::Result<String, E>> + Send + 'static,
    E: Send + 'static,
{
    struct State<S> {
        upstream: Pin<Box<S>>,
        segmenter: Segmenter,
        pending: VecDeque<String>,
        ended: bool,
    }

    let state = State {
        upstream: Box::pin(upstream),
        segmenter,
        pending: VecDeque::new(),
        ended: false,
    };

    unfold(state, |mut state| async move {
        loop {
            if let Some(piece) = state.pending.pop_front() {
                return Some((Ok(piece), state));
            }
            if state.ended {
                return None;
            }

            match state.upstream.next().await {
                Some(Ok(fragment)) => {
                    let out = state.segmenter.feed(&fragment);
                    state.pending.extend(out.chars().map(String::from));
                }
                Some(Err(e)) => {
                    state.ended = true;
                    return Some((Err(e), state));
                }
                None => {
                    state.ended = true;
                    let out = state.segmenter.finish();
                    state.pending.extend(out.chars().map(String::from));
                }
            }
        }
    })
}
