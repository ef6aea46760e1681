//! Event scripts: a JSON array of steps replayed against a receiver.
//!
//! ```json
//! [
//!   {"op": "ready", "name": "fw.bin", "size": 10, "auto": false},
//!   {"op": "data", "data": "AAECAwQ="},
//!   {"op": "ack"},
//!   {"op": "event", "event": "complete"}
//! ]
//! ```

use std::path::Path;

use anyhow::Context;
use orpfile_protocol::{FileData, TransferEvent, TransferRequest};
use orpfile_transfer::{SinkProvider, TransferError, TransferReceiver};
use serde::{Deserialize, Serialize};

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Ready(TransferRequest),
    Event { event: TransferEvent },
    Data(FileData),
    Ack,
    Auto { enabled: bool },
}

/// Outcome of a replay run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub steps: usize,
    pub failures: usize,
}

pub fn load(path: &Path) -> anyhow::Result<Vec<Step>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse(&content).with_context(|| format!("failed to parse script {}", path.display()))
}

pub fn parse(json: &str) -> anyhow::Result<Vec<Step>> {
    Ok(serde_json::from_str(json)?)
}

/// Applies `steps` in order.
///
/// Failed steps are logged and counted; with `strict` the first failure
/// stops the replay.
pub fn replay<P: SinkProvider>(
    receiver: &mut TransferReceiver<P>,
    steps: &[Step],
    strict: bool,
) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();

    for (index, step) in steps.iter().enumerate() {
        summary.steps += 1;
        if let Err(e) = apply(receiver, step) {
            summary.failures += 1;
            tracing::warn!(step = index, error = %e, "step failed");
            if strict {
                return Err(e).with_context(|| format!("step {index} failed"));
            }
        }
    }

    Ok(summary)
}

fn apply<P: SinkProvider>(
    receiver: &mut TransferReceiver<P>,
    step: &Step,
) -> Result<(), TransferError> {
    match step {
        Step::Ready(request) => receiver.ready(request),
        Step::Event { event } => receiver.event(*event),
        Step::Data(chunk) => receiver.data(Some(chunk.data.as_slice())).map(|_| ()),
        Step::Ack => receiver.acknowledge().map(|_| ()),
        Step::Auto { enabled } => {
            receiver.set_auto(*enabled);
            Ok(())
        }
    }
}
