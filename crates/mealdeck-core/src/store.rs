// ── Display store ──
//
// The list of meals currently on screen. Whichever query ran last
// overwrites it; nothing merges.

use std::sync::Arc;

use mealdeck_api::FoodItem;
use tokio::sync::watch;
use tracing::trace;

use crate::stream::FoodStream;

/// Owned, injectable holder for the visible meal list. Clones share one
/// list; separately constructed stores never do.
#[derive(Clone)]
pub struct DisplayStore {
    items: Arc<watch::Sender<Arc<Vec<FoodItem>>>>,
}

impl Default for DisplayStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayStore {
    pub fn new() -> Self {
        let (items, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            items: Arc::new(items),
        }
    }

    /// Replace the visible list wholesale and notify subscribers.
    pub fn set_items(&self, items: Arc<Vec<FoodItem>>) {
        trace!(count = items.len(), "display list replaced");
        self.items.send_replace(items);
    }

    pub fn items(&self) -> Arc<Vec<FoodItem>> {
        self.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn subscribe(&self) -> FoodStream {
        FoodStream::new(self.items.subscribe())
    }
}
