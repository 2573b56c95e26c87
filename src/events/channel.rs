use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

pub struct EventEmitter<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

pub struct EventObserver<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Handle returned by `subscribe`; dropping it keeps the listener alive, calling
/// `unsubscribe` removes it.
pub struct Unsubscriber<T: std::fmt::Debug> {
    channel: Channel<T>,
    id: SubscriptionId,
}

impl<T: std::fmt::Debug> Unsubscriber<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn unsubscribe(self) -> bool {
        self.channel.unsubscribe(self.id)
    }
}

pub struct Channel<T: std::fmt::Debug> {
    listeners: Rc<RefCell<BTreeMap<SubscriptionId, Callback<T>>>>,
    next_id: Rc<RefCell<SubscriptionId>>,
}

impl<T: std::fmt::Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T: std::fmt::Debug> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(RefCell::new(BTreeMap::new())),
            next_id: Rc::new(RefCell::new(0)),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        let id = {
            let mut next_id = self.next_id.borrow_mut();
            let id = *next_id;
            *next_id += 1;
            id
        };
        self.listeners.borrow_mut().insert(id, Rc::new(callback));
        Unsubscriber {
            channel: self.clone(),
            id,
        }
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    fn emit(&self, data: &T) {
        // snapshot so listeners may subscribe or unsubscribe while handling
        let listeners: Vec<Callback<T>> = self.listeners.borrow().values().cloned().collect();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", listeners.len(), data);
        for listener in listeners {
            listener(data);
        }
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    pub fn emit(&self, data: T) {
        self.channel.emit(&data);
    }
}

impl<T: std::fmt::Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> Unsubscriber<T>
    where
        F: Fn(&T) + 'static,
    {
        self.channel.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_event_subscription_and_emission() {
        let (emitter, observer) = Channel::<u32>::new();
        let counter = Rc::new(Cell::new(0));
        let counter_clone = counter.clone();

        let _subscription = observer.subscribe(move |_data: &u32| {
            counter_clone.set(counter_clone.get() + 1);
        });

        emitter.emit(2048);
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_listeners_called_in_subscription_order() {
        let (emitter, observer) = Channel::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = seen.clone();
            observer.subscribe(move |score: &u32| {
                seen.borrow_mut().push(format!("{tag}:{score}"));
            });
        }

        emitter.emit(4);
        assert_eq!(*seen.borrow(), vec!["first:4", "second:4"]);
    }

    #[test]
    fn test_clone_and_share() {
        let (emitter1, observer1) = Channel::<u32>::new();
        let emitter2 = emitter1.clone();
        let observer2 = observer1.clone();

        let counter = Rc::new(Cell::new(0));
        let counter_clone = counter.clone();
        observer1.subscribe(move |_data: &u32| {
            counter_clone.set(counter_clone.get() + 1);
        });

        emitter2.emit(8);
        assert_eq!(counter.get(), 1);

        let counter_clone = counter.clone();
        observer2.subscribe(move |_data: &u32| {
            counter_clone.set(counter_clone.get() + 1);
        });

        emitter1.emit(8);
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let (emitter, observer) = Channel::<u32>::new();
        let counter = Rc::new(Cell::new(0));
        let counter_clone = counter.clone();

        let subscription = observer.subscribe(move |_data: &u32| {
            counter_clone.set(counter_clone.get() + 1);
        });
        let id = subscription.id();

        emitter.emit(16);
        assert_eq!(counter.get(), 1);

        assert!(subscription.unsubscribe());
        emitter.emit(16);
        assert_eq!(counter.get(), 1);

        assert!(!observer.unsubscribe(id));
    }

    #[test]
    fn test_listener_may_subscribe_during_emit() {
        let (emitter, observer) = Channel::<u32>::new();
        let observer_clone = observer.clone();
        let late_calls = Rc::new(Cell::new(0));
        let late_calls_clone = late_calls.clone();

        observer.subscribe(move |_data: &u32| {
            let late_calls = late_calls_clone.clone();
            observer_clone.subscribe(move |_data: &u32| {
                late_calls.set(late_calls.get() + 1);
            });
        });

        emitter.emit(32);
        assert_eq!(late_calls.get(), 0);
        emitter.emit(32);
        assert_eq!(late_calls.get(), 1);
    }
}
