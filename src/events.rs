//! Backend event stream: one JSON [`BackendEvent`] per line.

use crate::snapshot::BackendEvent;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("line {line}: invalid backend event: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("reading backend events failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub enum SourceItem {
    Event(BackendEvent),
    Error(SourceError),
    Closed,
}

pub fn decode_line(line_no: usize, line: &str) -> Result<BackendEvent, SourceError> {
    serde_json::from_str(line).map_err(|source| SourceError::Decode { line: line_no, source })
}

/// Reads events until EOF or an IO error, forwarding each one. Stops early
/// once the receiving side is gone.
pub fn pump<R: BufRead>(reader: R, tx: &Sender<SourceItem>) {
    for (idx, line) in reader.lines().enumerate() {
        let item = match line {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match decode_line(idx + 1, &line) {
                Ok(event) => SourceItem::Event(event),
                Err(err) => SourceItem::Error(err),
            },
            Err(err) => {
                let _ = tx.send(SourceItem::Error(err.into()));
                break;
            }
        };
        if tx.send(item).is_err() {
            debug!("event receiver dropped, stopping reader");
            return;
        }
    }
    info!("backend event stream closed");
    let _ = tx.send(SourceItem::Closed);
}

pub fn spawn_reader<R: BufRead + Send + 'static>(reader: R) -> Receiver<SourceItem> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || pump(reader, &tx));
    rx
}
