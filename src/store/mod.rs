//! Selection store: the single source of truth for the equipped character
//! and for picker visibility.
//!
//! The store is an explicit instance handed to consumers by reference. It is
//! the only writer of `current`; everyone else reads it or subscribes.
//! Subscribers run synchronously, in subscription order, before the mutating
//! call returns.

pub mod storage;

use std::collections::BTreeMap;
use std::fmt;

use crate::error::SiteError;
use crate::models::{Catalog, CharacterOption};

pub use storage::{FileStorage, MemoryStorage, SelectionStorage, STORAGE_KEY};

/// Notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A `select` succeeded.
    SelectionChanged {
        /// Id that was current before the call
        previous: String,
        /// Id that is current now
        current: String,
    },
    /// Picker visibility flipped.
    ModalVisibilityChanged(bool),
}

/// Token returned by [`SelectionStore::subscribe`]; pass it to
/// [`SelectionStore::unsubscribe`] to dispose of the subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

/// Session-wide selection state.
pub struct SelectionStore {
    catalog: Catalog,
    current: String,
    modal_visible: bool,
    subscribers: BTreeMap<SubscriptionId, Subscriber>,
    next_subscription: u64,
    storage: Option<Box<dyn SelectionStorage>>,
}

impl fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionStore")
            .field("current", &self.current)
            .field("modal_visible", &self.modal_visible)
            .field("subscribers", &self.subscribers.len())
            .field("persistent", &self.storage.is_some())
            .finish_non_exhaustive()
    }
}

impl SelectionStore {
    /// Creates a store starting at the catalog default, without persistence.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let current = catalog.default_id().to_string();
        Self {
            catalog,
            current,
            modal_visible: false,
            subscribers: BTreeMap::new(),
            next_subscription: 0,
            storage: None,
        }
    }

    /// Creates a store that restores and persists the selection.
    ///
    /// A stored id that is absent or not in the catalog falls back to the default.
    pub fn with_storage(catalog: Catalog, storage: Box<dyn SelectionStorage>) -> Self {
        let mut store = Self::new(catalog);

        match storage.load(STORAGE_KEY) {
            Some(id) if store.catalog.contains(&id) => {
                tracing::info!(character = %id, "restored persisted selection");
                store.current = id;
            }
            Some(id) => {
                tracing::debug!(character = %id, "ignoring persisted selection not in catalog");
            }
            None => {}
        }

        store.storage = Some(storage);
        store
    }

    /// Id of the equipped character. Never fails.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    /// The equipped character.
    #[must_use]
    pub fn current_option(&self) -> &CharacterOption {
        self.catalog
            .get(&self.current)
            .unwrap_or_else(|| self.catalog.default_option())
    }

    /// The catalog this store validates against.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Whether the picker is open.
    #[must_use]
    pub fn is_modal_visible(&self) -> bool {
        self.modal_visible
    }

    /// Equips a character.
    ///
    /// Ids outside the catalog are rejected with [`SiteError::InvalidOption`] and
    /// leave the state untouched. Every successful call notifies once, even when
    /// re-selecting the current id.
    pub fn select(&mut self, id: &str) -> Result<(), SiteError> {
        if !self.catalog.contains(id) {
            tracing::debug!(character = %id, "rejected selection outside catalog");
            return Err(SiteError::InvalidOption(id.to_string()));
        }

        let previous = std::mem::replace(&mut self.current, id.to_string());
        tracing::info!(from = %previous, to = %id, "character selected");

        if let Some(storage) = self.storage.as_mut() {
            if let Err(err) = storage.store(STORAGE_KEY, id) {
                tracing::warn!(error = %err, "failed to persist selection");
            }
        }

        self.notify(&StoreEvent::SelectionChanged {
            previous,
            current: id.to_string(),
        });
        Ok(())
    }

    /// Opens or closes the picker. Returns whether visibility changed.
    ///
    /// Setting the current value again is a no-op and does not notify.
    pub fn set_modal_visible(&mut self, visible: bool) -> bool {
        if self.modal_visible == visible {
            return false;
        }

        self.modal_visible = visible;
        tracing::debug!(visible, "picker visibility changed");
        self.notify(&StoreEvent::ModalVisibilityChanged(visible));
        true
    }

    /// Registers a listener for every successful select and visibility change.
    pub fn subscribe(&mut self, callback: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.insert(id, Box::new(callback));
        id
    }

    /// Removes a listener. Returns false if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self, event: &StoreEvent) {
        for callback in self.subscribers.values_mut() {
            callback(event);
        }
    }
}
