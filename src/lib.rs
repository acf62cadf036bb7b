// checkstore - Observable checklist state container

pub mod config;
pub mod item;
pub mod seed;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use item::{CheckItem, Checkable, ItemId};
pub use seed::{load_items, warn_duplicate_ids};
pub use store::{CheckList, ItemList, SubscriberId};
