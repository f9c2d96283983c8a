//! Replays newline-delimited JSON events into a [`MessageEventHandler`].
//!
//! Stands in for a live chat-platform bridge: each line is one `message` or `message-updated`
//! event. Blank lines are skipped; malformed lines (bad JSON or bad UTF-8) are logged and
//! skipped.

use capture_core::{MessageEvent, MessageEventHandler};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Dispatches every event read from `reader` to `handler`, in order, until EOF.
pub async fn replay<R, H>(mut reader: R, handler: &H) -> std::io::Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
    H: MessageEventHandler + ?Sized,
{
    let mut stats = ReplayStats::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping event line that is not UTF-8");
                stats.skipped += 1;
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match MessageEvent::from_json_line(line) {
            Ok(event) => {
                match &event {
                    MessageEvent::Created(_) => stats.created += 1,
                    MessageEvent::Updated(_) => stats.updated += 1,
                }
                handler.dispatch(&event).await;
            }
            Err(e) => {
                warn!(line = line_no, error = %e, "Skipping malformed event");
                stats.skipped += 1;
            }
        }
    }

    info!(
        created = stats.created,
        updated = stats.updated,
        skipped = stats.skipped,
        "Replay finished"
    );
    Ok(stats)
}
