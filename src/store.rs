// Checklist store: owned list snapshot plus change observers

use crate::item::Checkable;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Immutable snapshot of the list; unchanged items are shared across snapshots
pub type ItemList<T> = Arc<Vec<Arc<T>>>;

/// Handle returned by `CheckList::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

type Observer<T> = Box<dyn FnMut(&ItemList<T>) + Send>;

/// Ordered list of checkable items with change notification
///
/// Every operation that installs a new list fires each registered observer
/// exactly once. Queries and suppressed no-ops never notify. Unknown ids are
/// ignored rather than reported.
pub struct CheckList<T: Checkable> {
    list: ItemList<T>,
    observers: BTreeMap<SubscriberId, Observer<T>>,
    next_subscriber: u64,
}

impl<T: Checkable> CheckList<T> {
    /// Create a store seeded with the given items
    pub fn new(initial: Vec<T>) -> Self {
        Self::from_items(initial)
    }

    /// Create a store from owned or already shared items
    pub fn from_items<I>(initial: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Arc<T>>,
    {
        let list: Vec<Arc<T>> = initial.into_iter().map(Into::into).collect();
        debug!(len = list.len(), "CheckList::from_items: seeded");
        Self {
            list: Arc::new(list),
            observers: BTreeMap::new(),
            next_subscriber: 0,
        }
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Register a callback invoked with the new snapshot after every change
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriberId
    where
        F: FnMut(&ItemList<T>) + Send + 'static,
    {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.observers.insert(id, Box::new(callback));
        debug!(subscriber = id.0, "subscribe: registered");
        id
    }

    /// Remove a callback; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.observers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current snapshot
    pub fn get(&self) -> ItemList<T> {
        Arc::clone(&self.list)
    }

    /// Borrowed view of the current snapshot
    pub fn items(&self) -> &[Arc<T>] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// First item with the given id
    pub fn find_item(&self, id: &T::Id) -> Option<&Arc<T>> {
        self.list.iter().find(|item| item.id() == id)
    }

    /// Position of the first item with the given id
    pub fn find_index(&self, id: &T::Id) -> Option<usize> {
        self.list.iter().position(|item| item.id() == id)
    }

    /// Raw checked flag of the item; `None` when the item is absent or unset
    pub fn is_checked(&self, id: &T::Id) -> Option<bool> {
        self.find_item(id).and_then(|item| item.checked())
    }

    /// True if every item is checked (vacuously true for an empty list)
    pub fn is_all_checked(&self) -> bool {
        self.list.iter().all(|item| item.is_checked())
    }

    /// Checked items in list order
    pub fn checked_list(&self) -> Vec<Arc<T>> {
        self.list.iter().filter(|item| item.is_checked()).cloned().collect()
    }

    /// Ids of checked items in list order
    pub fn checked_ids(&self) -> Vec<T::Id> {
        self.list
            .iter()
            .filter(|item| item.is_checked())
            .map(|item| item.id().clone())
            .collect()
    }

    pub fn checked_count(&self) -> usize {
        self.list.iter().filter(|item| item.is_checked()).count()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the whole list and notify, even if the contents are identical
    pub fn set<I>(&mut self, items: I)
    where
        I: IntoIterator,
        I::Item: Into<Arc<T>>,
    {
        let list: Vec<Arc<T>> = items.into_iter().map(Into::into).collect();
        self.list = Arc::new(list);
        debug!(len = self.list.len(), observers = self.observers.len(), "set: installed new list");

        for observer in self.observers.values_mut() {
            observer(&self.list);
        }
    }

    /// Set one item's checked flag. Returns true if a new list was installed.
    ///
    /// Unknown ids and writes of the current value are no-ops. When ids
    /// repeat, the first match in list order is updated.
    pub fn update_item(&mut self, id: &T::Id, checked: bool) -> bool {
        let Some(idx) = self.find_index(id) else {
            debug!(?id, "update_item: unknown id, ignoring");
            return false;
        };

        let current = &self.list[idx];
        if current.checked() == Some(checked) {
            debug!(?id, checked, "update_item: already set, skipping");
            return false;
        }

        let replacement = Arc::new(current.with_checked(checked));
        let mut next = self.list.as_ref().clone();
        next[idx] = replacement;
        self.set(next);
        true
    }

    /// Flip one item's checked flag; unknown ids are ignored
    pub fn toggle(&mut self, id: &T::Id) -> bool {
        let target = !self.is_checked(id).unwrap_or(false);
        self.update_item(id, target)
    }

    pub fn check(&mut self, id: &T::Id) -> bool {
        self.update_item(id, true)
    }

    pub fn uncheck(&mut self, id: &T::Id) -> bool {
        self.update_item(id, false)
    }

    /// Set every item's checked flag. No-op if all items already hold that value.
    pub fn update_all(&mut self, checked: bool) -> bool {
        if self.list.iter().all(|item| item.checked() == Some(checked)) {
            debug!(checked, "update_all: already uniform, skipping");
            return false;
        }

        let next: Vec<Arc<T>> = self
            .list
            .iter()
            .map(|item| Arc::new(item.with_checked(checked)))
            .collect();
        self.set(next);
        true
    }

    /// Check everything unless everything is already checked, else uncheck everything
    pub fn toggle_all(&mut self) -> bool {
        let target = !self.is_all_checked();
        self.update_all(target)
    }

    pub fn check_all(&mut self) -> bool {
        self.update_all(true)
    }

    pub fn uncheck_all(&mut self) -> bool {
        self.update_all(false)
    }
}

impl<T: Checkable> Default for CheckList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Checkable + fmt::Debug> fmt::Debug for CheckList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckList")
            .field("list", &self.list)
            .field("subscribers", &self.observers.len())
            .finish()
    }
}
