use alloc::sync::Arc;

/// A callback fired with the new value of a [`Signal`].
pub type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A single-value output that only notifies when its value actually changes.
pub struct Signal<T> {
    value: T,
    subscriber: Option<Subscriber<T>>,
}

impl<T: PartialEq> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscriber: None,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and notifies the subscriber. Returns `false` (and stays silent) when the
    /// value is equal to the current one.
    pub fn publish(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        if let Some(subscriber) = &self.subscriber {
            subscriber(&self.value);
        }
        true
    }

    pub fn subscribe(&mut self, subscriber: Option<Subscriber<T>>) {
        self.subscriber = subscriber;
    }

    pub fn has_subscriber(&self) -> bool {
        self.subscriber.is_some()
    }
}

impl<T: Clone> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscriber: self.subscriber.clone(),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.value)
            .field("subscribed", &self.subscriber.is_some())
            .finish()
    }
}
