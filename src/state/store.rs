//! The injected state container.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, warn};
use uuid::Uuid;

use super::action::Action;
use super::derive::derive_gameweek;
use super::model::{LatestError, Notification, Page, State};
use crate::core::{Clock, SystemClock};

pub type Listener = Arc<dyn Fn(&State) + Send + Sync>;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// Holds the current [`State`] and applies actions to it one at a time.
///
/// Readers only ever see a state with a transition fully applied. After a
/// `SetGeneralInformation` the derived `gameweek` is recomputed inside the
/// same write, so no reader sees new information with a stale gameweek.
pub struct Store {
    state: RwLock<State>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicUsize,
    clock: Arc<dyn Clock>,
}

impl Store {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_state(State::default(), clock)
    }

    pub fn with_state(state: State, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(state),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(0),
            clock,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// A snapshot of the current state.
    pub fn get_state(&self) -> State {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read part of the state without cloning the rest.
    pub fn select<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        f(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn dispatch(&self, action: Action) {
        self.dispatch_with(|_| action);
    }

    /// Build the action from the current state and apply it under the same
    /// write, so read-modify-write helpers cannot lose a racing update.
    pub fn dispatch_with(&self, make: impl FnOnce(&State) -> Action) {
        let snapshot = {
            let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let action = make(&guard);
            debug!(action = action.name(), "dispatch");
            let rederive = matches!(action, Action::SetGeneralInformation { .. });
            let mut next = std::mem::take(&mut *guard).apply(action);
            if rederive {
                let gameweek = derive_gameweek(&next.general_information, self.clock.now_utc());
                debug!(gameweek = ?gameweek, "derived gameweek");
                next = next.apply(Action::SetGameweek { gameweek });
            }
            *guard = next;
            if self.has_listeners() {
                Some(guard.clone())
            } else {
                None
            }
        };

        if let Some(state) = snapshot {
            // Listeners may dispatch, so none of the locks are held here.
            let listeners: Vec<Listener> = self
                .listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect();
            for listener in listeners {
                listener(&state);
            }
        }
    }

    fn has_listeners(&self) -> bool {
        !self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Call `listener` with the new state after every dispatch.
    pub fn subscribe(&self, listener: impl Fn(&State) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Switch page, close the navbar and clear any non-fatal error.
    pub fn navigate(&self, page: Page) {
        self.dispatch(Action::SetCurrentPage { current_page: page });
        self.dispatch(Action::SetNavbarOpen { navbar_open: false });
        self.dispatch_with(|state| match &state.latest_error {
            Some(error) if !error.is_fatal => Action::set_latest_error(None),
            _ => Action::Unknown,
        });
    }

    /// Clear the current error. Fatal errors stay and `false` is returned.
    pub fn dismiss_error(&self) -> bool {
        let mut dismissed = false;
        self.dispatch_with(|state| {
            if state.has_fatal_error() {
                Action::Unknown
            } else {
                dismissed = true;
                Action::set_latest_error(None)
            }
        });
        dismissed
    }

    pub fn push_notification(&self, title: &str, message: &str) -> Uuid {
        let notification = Notification::new(title, message);
        let id = notification.id;
        self.dispatch_with(move |state| {
            let mut notifications = state.notifications.clone();
            notifications.push(notification);
            Action::SetNotifications { notifications }
        });
        id
    }

    /// Show `error`. A fatal error already on screen is never replaced by a
    /// non-fatal one; returns false when `error` was not shown.
    pub fn report_error(&self, error: LatestError) -> bool {
        warn!(
            name = %error.error.name,
            detail = %error.error.message,
            fatal = error.is_fatal,
            "{}",
            error.message
        );
        let mut shown = false;
        self.dispatch_with(|state| {
            if state.has_fatal_error() && !error.is_fatal {
                debug!(message = %error.message, "fatal error already shown, keeping it");
                return Action::Unknown;
            }
            shown = true;
            Action::set_latest_error(Some(error))
        });
        shown
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock::default()))
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("Store")
            .field("listeners", &listeners)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
