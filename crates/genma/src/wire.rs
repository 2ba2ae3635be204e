//! Wire
//!
//! A single observed value. The callback runs once with the initial value
//! and then once per effective change, synchronously, before the write
//! returns.

use std::fmt;

/// Change callback
pub type OnChange<T> = Box<dyn FnMut(&T)>;

/// An observed value
pub struct Wire<T> {
    value: T,
    on_change: Option<OnChange<T>>,
}

impl<T> Wire<T> {
    /// A wire without a callback
    pub fn new(value: T) -> Self {
        Self { value, on_change: None }
    }

    /// A wire whose callback fires right away with `value`
    pub fn with_callback(value: T, on_change: impl FnMut(&T) + 'static) -> Self {
        let mut wire = Self {
            value,
            on_change: Some(Box::new(on_change)),
        };
        wire.notify();
        wire
    }

    /// Current value
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    fn notify(&mut self) {
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.value);
        }
    }
}

impl<T: PartialEq> Wire<T> {
    /// Replace the value. Equal values are ignored; returns whether the
    /// value changed and the callback ran.
    pub fn set(&mut self, value: T) -> bool {
        if value == self.value {
            return false;
        }
        self.value = value;
        self.notify();
        true
    }
}

impl<T: Clone> Wire<T> {
    /// Edit a copy of the value, then store it. Always notifies, even when
    /// the edit leaves the copy equal to the old value.
    pub fn mutate(&mut self, edit: impl FnOnce(&mut T)) {
        let mut next = self.value.clone();
        edit(&mut next);
        self.value = next;
        self.notify();
    }
}

impl<T: fmt::Debug> fmt::Debug for Wire<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wire")
            .field("value", &self.value)
            .field("observed", &self.on_change.is_some())
            .finish()
    }
}

impl<T: Default> Default for Wire<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
