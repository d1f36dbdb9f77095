use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::store::RecordStore;

use super::client::FeedClient;
use super::error::FeedError;

/// Fetch the feed and replace the store contents with it. On any failure the
/// store is left as it was.
pub async fn refresh_once(feed: &FeedClient, store: &dyn RecordStore) -> Result<usize, FeedError> {
    let records = feed.fetch().await?;
    let count = store.replace_all(records)?;
    Ok(count)
}

/// Background task that refreshes the store on a fixed interval.
pub struct Refresher {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl Refresher {
    pub fn spawn(feed: Arc<FeedClient>, store: Arc<dyn RecordStore>, interval: Duration) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_refresh_loop(feed, store, interval, stop_rx));
        Self { stop_tx, join }
    }

    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.join.await;
    }
}

async fn run_refresh_loop(
    feed: Arc<FeedClient>,
    store: Arc<dyn RecordStore>,
    interval: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    log::info!("Refreshing {} every {:?}", feed.url(), interval);

    loop {
        let should_stop = tokio::select! {
            _ = sleep(interval) => false,
            _ = &mut stop_rx => true,
        };
        if should_stop {
            log::info!("Feed refresher stopped");
            return;
        }

        match refresh_once(&feed, store.as_ref()).await {
            Ok(count) => log::info!("Refreshed store with {} state vectors", count),
            Err(e) => log::warn!("Feed refresh failed, keeping previous data: {}", e),
        }
    }
}
