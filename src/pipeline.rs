use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;

use thiserror::Error;

use crate::multiline::reassemble;
use crate::parser::{LogEntry, ParseContext, classify_entry};
use crate::timestamp::{Clock, SystemClock};

#[derive(Debug, Error)]
pub enum ParseError {
    /// A bug in the parser surfaced as a panic. No partial result is kept.
    #[error("unexpected error while parsing logs: {0}")]
    Internal(String),

    #[error("parse worker exited without a result")]
    WorkerGone,
}

/// Raw text in, ordered [`LogEntry`] list out.
///
/// Reassembles multi-line entries, then classifies each one. Blank input
/// yields an empty list. Every logical entry yields exactly one `LogEntry`.
#[derive(Debug, Clone, Default)]
pub struct Pipeline<C = SystemClock> {
    clock: C,
}

impl Pipeline<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> Pipeline<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn parse(&self, raw: &str) -> Result<Vec<LogEntry>, ParseError> {
        if raw.trim().is_empty() {
            tracing::debug!("blank input, nothing to parse");
            return Ok(Vec::new());
        }

        // One clock reading per run: ids and "now" fallbacks all agree.
        let ctx = ParseContext::new(self.clock.now());
        panic::catch_unwind(AssertUnwindSafe(|| run(raw, &ctx))).map_err(|payload| {
            let reason = panic_message(payload.as_ref());
            tracing::error!(%reason, "log parser panicked");
            ParseError::Internal(reason)
        })
    }
}

/// Parse with the system clock.
pub fn parse_logs(raw: &str) -> Result<Vec<LogEntry>, ParseError> {
    Pipeline::new().parse(raw)
}

fn run(raw: &str, ctx: &ParseContext) -> Vec<LogEntry> {
    let logical = reassemble(raw);
    let entries: Vec<LogEntry> = logical
        .iter()
        .enumerate()
        .map(|(index, text)| classify_entry(text, index, ctx))
        .collect();
    tracing::debug!(
        bytes = raw.len(),
        entries = entries.len(),
        "parsed log text"
    );
    entries
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "parser panicked".to_string()
    }
}

/// A parse running on a background thread. The result arrives whole; there
/// is no way to cancel a job once spawned.
pub struct ParseJob {
    receiver: mpsc::Receiver<Result<Vec<LogEntry>, ParseError>>,
}

/// Run a pipeline over `raw` on its own thread.
pub fn spawn_parse<C: Clock + 'static>(raw: String, clock: C) -> ParseJob {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = Pipeline::with_clock(clock).parse(&raw);
        // The caller may have dropped the job; nothing left to do then.
        let _ = tx.send(result);
    });
    ParseJob { receiver: rx }
}

impl ParseJob {
    /// Block until the parse completes.
    pub fn wait(self) -> Result<Vec<LogEntry>, ParseError> {
        self.receiver.recv().unwrap_or(Err(ParseError::WorkerGone))
    }

    /// Non-blocking poll. `None` while the job is still running. Only the
    /// first `Some(Ok(..))` carries the entries.
    pub fn try_result(&self) -> Option<Result<Vec<LogEntry>, ParseError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(ParseError::WorkerGone)),
        }
    }
}
