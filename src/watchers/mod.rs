//! Watcher subsystems for the feed.
//!
//! Watchers sit between the raw transport and consumers: they take raw
//! socket data and emit normalized `LiveEvent`s.

mod sale_watcher;

pub use sale_watcher::SaleWatcher;
