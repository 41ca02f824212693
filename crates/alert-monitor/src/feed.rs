//! Sample Feed Loop

use crate::monitor::{AlertEvent, AlertMonitor, Sample};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Drive a monitor from a stream of samples.
///
/// Consumes samples until the sender side closes and forwards every alert
/// event to `event_tx`. The loop is the only caller into the monitor, so no
/// two ticks of one collection can overlap. Stops early when the event
/// receiver is dropped.
pub async fn run(
    mut monitor: AlertMonitor,
    mut sample_rx: mpsc::Receiver<Sample>,
    event_tx: mpsc::Sender<AlertEvent>,
) {
    info!("alert feed started");
    'feed: while let Some(sample) = sample_rx.recv().await {
        for event in monitor.ingest(&sample.channel, sample.value) {
            if event_tx.send(event).await.is_err() {
                warn!("alert event receiver dropped");
                break 'feed;
            }
        }
    }
    info!("alert feed stopped");
}
