//! Stdio host adapter.
//!
//! Positions arrive on stdin as one JSON document per line: an object with
//! `latitude` and `longitude` sets the fix, `null` clears it. Published
//! deltas leave on stdout, one JSON document per line.

use common::{Coordinate, Delta, Error};
use poi_engine::SharedPosition;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Parse one stdin line. `Ok(None)` clears the position.
pub fn parse_position_line(line: &str) -> Result<Option<Coordinate>, Error> {
    let parsed: Option<Coordinate> = serde_json::from_str(line)?;

    if let Some(c) = parsed {
        let in_range = (-90.0..=90.0).contains(&c.latitude)
            && (-180.0..=180.0).contains(&c.longitude);
        if !in_range {
            return Err(Error::Other(format!("position out of range: {c}")));
        }
    }
    Ok(parsed)
}

/// Feed `position` from line-delimited JSON until `reader` hits EOF.
pub async fn read_positions<R>(reader: R, position: SharedPosition) -> Result<(), Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_position_line(line) {
            Ok(update) => {
                debug!("Position update: {:?}", update);
                position.set(update);
            }
            Err(e) => warn!("Ignoring position line {:?}: {}", line, e),
        }
    }
    info!("Position input closed, keeping last known position");
    Ok(())
}

/// Write every delta from `rx` to `writer` until all publishers are gone.
pub async fn write_deltas<W>(mut rx: mpsc::UnboundedReceiver<Delta>, mut writer: W) -> Result<(), Error>
where
    W: AsyncWrite + Unpin,
{
    while let Some(delta) = rx.recv().await {
        let mut line = serde_json::to_vec(&delta)?;
        line.push(b'\n');
        writer.write_all(&line).await?;
        writer.flush().await?;
    }
    Ok(())
}
