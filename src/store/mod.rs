//! Client-side application state
//!
//! A single `AppState` behind an `Arc<RwLock<..>>`. Fetch thunks move a
//! slice through LOADING to SUCCEEDED or FAILED; mutation helpers upsert or
//! remove single entities once the backend has accepted the change.

pub mod slice;
pub mod thunks;

pub use slice::{LoadStatus, Slice};

use std::future::Future;
use std::sync::Arc;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use crate::models::{
    Entity, GroupLesson, Lesson, LessonPackage, Manager, Notification, Student, Teacher, User,
};
use crate::utils::errors::Result;

/// Login progress and the signed-in user
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
    /// Set between the password step and the MFA step
    pub mfa_token: Option<String>,
    pub status: LoadStatus,
    pub error: Option<String>,
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn awaiting_mfa(&self) -> bool {
        self.mfa_token.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub auth: AuthState,
    pub students: Slice<Student>,
    pub teachers: Slice<Teacher>,
    pub managers: Slice<Manager>,
    pub lessons: Slice<Lesson>,
    pub group_lessons: Slice<GroupLesson>,
    pub packages: Slice<LessonPackage>,
    pub notifications: Slice<Notification>,
    pub unread_notifications: u64,
}

/// Picks one slice out of the state
pub type SliceSelector<T> = fn(&mut AppState) -> &mut Slice<T>;

/// Puts a slice back to its pre-fetch status when a fetch is dropped
/// before it resolves, e.g. because the caller timed out.
struct PendingFetch<T: 'static> {
    state: Arc<RwLock<AppState>>,
    select: SliceSelector<T>,
    name: &'static str,
    previous: LoadStatus,
    previous_error: Option<String>,
    armed: bool,
}

impl<T: 'static> PendingFetch<T> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

fn release_slice<T>(state: &mut AppState, select: SliceSelector<T>, status: LoadStatus, error: Option<String>) {
    let slice = select(state);
    if slice.is_loading() {
        slice.status = status;
        slice.error = error;
    }
}

impl<T: 'static> Drop for PendingFetch<T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        warn!(thunk = self.name, "Fetch dropped before completing, releasing slice");
        let select = self.select;
        let previous = self.previous;
        let error = self.previous_error.take();

        match self.state.try_write() {
            Ok(mut state) => release_slice(&mut *state, select, previous, error),
            Err(_) => {
                let state = Arc::clone(&self.state);
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            let mut state = state.write().await;
                            release_slice(&mut *state, select, previous, error);
                        });
                    }
                    Err(_) => warn!(thunk = self.name, "No runtime to release slice, it stays LOADING"),
                }
            }
        }
    }
}

/// What a fetch thunk ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThunkOutcome {
    /// Another fetch for the same slice was already in flight
    Skipped,
    Succeeded,
    Failed,
}

#[derive(Clone, Default)]
pub struct AppStore {
    state: Arc<RwLock<AppState>>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the whole state
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// Run a selector against the current state without cloning it
    pub async fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = self.state.read().await;
        f(&*state)
    }

    pub(crate) async fn write<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let mut state = self.state.write().await;
        f(&mut *state)
    }

    /// Drop everything, e.g. after logout
    pub async fn reset(&self) {
        *self.state.write().await = AppState::default();
        debug!("Store reset");
    }

    /// Fetch a whole slice.
    ///
    /// The slice is marked LOADING before `fetch` is polled. On success the
    /// items are replaced wholesale; on failure the previous items stay and
    /// the error message is recorded. If the slice is already LOADING the
    /// fetch is not started at all. Dropping the returned future midway
    /// puts the slice back to the status it had before.
    pub async fn run_thunk<T, Fut>(&self, name: &'static str, select: SliceSelector<T>, fetch: Fut) -> ThunkOutcome
    where
        T: 'static,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let mut guard = {
            let mut state = self.state.write().await;
            let slice = select(&mut *state);
            if slice.is_loading() {
                debug!(thunk = name, "Fetch already in flight, skipping");
                return ThunkOutcome::Skipped;
            }
            let guard = PendingFetch {
                state: Arc::clone(&self.state),
                select,
                name,
                previous: slice.status,
                previous_error: slice.error.clone(),
                armed: true,
            };
            slice.pending();
            guard
        };

        let result = fetch.await;

        let mut state = self.state.write().await;
        guard.disarm();
        let slice = select(&mut *state);
        match result {
            Ok(items) => {
                debug!(thunk = name, count = items.len(), "Fetch succeeded");
                slice.fulfilled(items);
                ThunkOutcome::Succeeded
            }
            Err(e) => {
                warn!(thunk = name, error = %e, "Fetch failed");
                slice.rejected(e.user_message());
                ThunkOutcome::Failed
            }
        }
    }

    /// Apply a create/update result to its slice
    pub async fn apply_upsert<T, Fut>(&self, select: SliceSelector<T>, op: Fut) -> Result<T>
    where
        T: Entity + Clone,
        Fut: Future<Output = Result<T>>,
    {
        let result = op.await;
        let mut state = self.state.write().await;
        let slice = select(&mut *state);
        match result {
            Ok(item) => {
                slice.clear_error();
                slice.upsert(item.clone());
                Ok(item)
            }
            Err(e) => {
                slice.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Apply a delete result to its slice
    pub async fn apply_remove<T, Fut>(&self, select: SliceSelector<T>, id: i64, op: Fut) -> Result<()>
    where
        T: Entity,
        Fut: Future<Output = Result<()>>,
    {
        let result = op.await;
        let mut state = self.state.write().await;
        let slice = select(&mut *state);
        match result {
            Ok(()) => {
                slice.clear_error();
                slice.remove(id);
                Ok(())
            }
            Err(e) => {
                slice.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
