// ── Reactive display stream ──
//
// Subscription type for consuming changes to the display store.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use mealdeck_api::FoodItem;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

type Snapshot = Arc<Vec<FoodItem>>;

/// A subscription to the visible meal list.
///
/// Offers the snapshot taken at subscription time, the latest snapshot, and
/// change notification via [`changed`](Self::changed) or a `Stream`.
pub struct FoodStream {
    current: Snapshot,
    receiver: watch::Receiver<Snapshot>,
}

impl FoodStream {
    pub(crate) fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation (or at the last `changed`).
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next replacement of the list.
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> FoodWatchStream {
        FoodWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding each list snapshot, starting with the current one.
pub struct FoodWatchStream {
    inner: WatchStream<Snapshot>,
}

impl Stream for FoodWatchStream {
    type Item = Snapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
