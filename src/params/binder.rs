//! Two-way binding between a value and one URL query parameter.

use super::codec::ParamCodec;
use super::ParamStore;
use web_time::{Duration, Instant};

/// Delay between the last `set` and the URL write. Collapses rapid
/// interaction (slider drags, map pans) into a single history replacement.
pub const URL_WRITE_DEBOUNCE: Duration = Duration::from_millis(200);

/// A value mirrored to exactly one named query-string parameter.
///
/// Reads happen on demand via [`read_from`](UrlParam::read_from) (startup,
/// `popstate`); writes are driven by calling [`sync`](UrlParam::sync) each
/// frame, which flushes the pending value once the debounce window has
/// passed. An empty value (per the codec) deletes the parameter instead of
/// writing it.
pub struct UrlParam<T> {
    name: &'static str,
    codec: ParamCodec<T>,
    value: T,
    dirty_since: Option<Instant>,
}

impl<T: Clone + PartialEq> UrlParam<T> {
    pub fn new(name: &'static str, codec: ParamCodec<T>, initial: T) -> Self {
        Self {
            name,
            codec,
            value: initial,
            dirty_since: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Assigns a new value, arming the debounced URL write. Setting the
    /// current value again is a no-op.
    pub fn set(&mut self, value: T) {
        if value != self.value {
            self.value = value;
            self.dirty_since = Some(Instant::now());
        }
    }

    /// Applies the store's current value to this binding.
    ///
    /// Multiple values for the name are joined into a single string. An
    /// absent parameter or an empty parsed value leaves the current value
    /// untouched.
    pub fn read_from(&mut self, store: &impl ParamStore) {
        let joined = store.values(self.name).join("");
        if joined.is_empty() {
            return;
        }

        let parsed = (self.codec.parse)(&joined);
        if (self.codec.is_empty)(&parsed) {
            return;
        }

        self.value = parsed;
        self.dirty_since = None;
    }

    /// Flushes a pending write if the debounce window has elapsed. Call
    /// once per frame.
    pub fn sync(&mut self, store: &mut impl ParamStore) {
        self.sync_at(Instant::now(), store);
    }

    pub(crate) fn sync_at(&mut self, now: Instant, store: &mut impl ParamStore) {
        let Some(since) = self.dirty_since else {
            return;
        };
        if now.duration_since(since) < URL_WRITE_DEBOUNCE {
            return;
        }
        self.dirty_since = None;

        if (self.codec.is_empty)(&self.value) {
            log::debug!("Removing URL parameter {}", self.name);
            store.remove(self.name);
        } else {
            let serialized = (self.codec.stringify)(&self.value);
            log::debug!("Setting URL parameter {}={}", self.name, serialized);
            store.set(self.name, &serialized);
        }
    }
}
