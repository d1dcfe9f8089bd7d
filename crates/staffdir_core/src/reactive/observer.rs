//! Observer registry with ordered delivery.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Observer<T> {
    id: u64,
    /// First sequence number this observer receives.
    since: u64,
    callback: Callback<T>,
}

struct Pending<T> {
    seq: u64,
    value: T,
    /// `Some` for a value addressed to a single observer.
    target: Option<u64>,
}

impl<T> Observer<T> {
    fn accepts(&self, pending: &Pending<T>) -> bool {
        pending.seq >= self.since && pending.target.map_or(true, |target| target == self.id)
    }
}

struct RegistryState<T> {
    next_id: u64,
    next_seq: u64,
    observers: Vec<Observer<T>>,
    delivering: bool,
    queue: VecDeque<Pending<T>>,
}

impl<T> RegistryState<T> {
    fn contains(&self, id: u64) -> bool {
        self.observers.iter().any(|observer| observer.id == id)
    }
}

/// Mutable list of callbacks invoked synchronously on `emit`.
pub struct ObserverRegistry<T> {
    state: Rc<RefCell<RegistryState<T>>>,
}

/// Clones share one registry: subscribing or emitting through any clone
/// reaches the same observers.
impl<T> Clone for ObserverRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: 'static> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ObserverRegistry<T> {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState {
                next_id: 0,
                next_seq: 0,
                observers: Vec::new(),
                delivering: false,
                queue: VecDeque::new(),
            })),
        }
    }

    /// Registers `callback` for values emitted from now on.
    ///
    /// Dropping the returned handle unregisters it.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        self.register(Rc::new(RefCell::new(callback))).1
    }

    /// Registers `callback` and hands it `initial` first.
    ///
    /// `initial` travels through the delivery queue, so a subscription made
    /// from inside an observer receives it after the values already queued
    /// for others, and never receives those older values itself.
    pub fn subscribe_with(&self, initial: T, callback: impl FnMut(&T) + 'static) -> Subscription {
        let (id, subscription) = self.register(Rc::new(RefCell::new(callback)));
        self.enqueue(initial, Some(id));
        subscription
    }

    /// Delivers `value` to every registered observer.
    ///
    /// When called from inside an observer, the value is queued and delivered
    /// after the current value reached every observer.
    pub fn emit(&self, value: T) {
        self.enqueue(value, None);
    }

    pub fn len(&self) -> usize {
        self.state.borrow().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().observers.is_empty()
    }

    fn register(&self, callback: Callback<T>) -> (u64, Subscription) {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            let since = state.next_seq;
            state.observers.push(Observer {
                id,
                since,
                callback,
            });
            id
        };

        let weak: Weak<RefCell<RegistryState<T>>> = Rc::downgrade(&self.state);
        let subscription = Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().observers.retain(|observer| observer.id != id);
            }
        });
        (id, subscription)
    }

    fn enqueue(&self, value: T, target: Option<u64>) {
        {
            let mut state = self.state.borrow_mut();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.queue.push_back(Pending { seq, value, target });
            if state.delivering {
                return;
            }
            state.delivering = true;
        }
        let _delivering = DeliveryGuard {
            state: &self.state,
        };
        self.drain();
    }

    fn drain(&self) {
        loop {
            let next = self.state.borrow_mut().queue.pop_front();
            let Some(pending) = next else {
                break;
            };
            let recipients: Vec<(u64, Callback<T>)> = self
                .state
                .borrow()
                .observers
                .iter()
                .filter(|observer| observer.accepts(&pending))
                .map(|observer| (observer.id, Rc::clone(&observer.callback)))
                .collect();
            for (id, callback) in recipients {
                // An earlier observer may have unsubscribed this one.
                if !self.state.borrow().contains(id) {
                    continue;
                }
                let mut observer = callback.borrow_mut();
                (*observer)(&pending.value);
            }
        }
    }
}

/// Clears the delivering flag even when an observer unwinds, dropping
/// whatever was still queued.
struct DeliveryGuard<'a, T> {
    state: &'a RefCell<RegistryState<T>>,
}

impl<T> Drop for DeliveryGuard<'_, T> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.delivering = false;
            state.queue.clear();
        }
    }
}

/// Handle that stops notifications when unsubscribed or dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stops further notifications for this observer only.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ObserverRegistry;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn unsubscribe_stops_only_that_observer() {
        let registry = ObserverRegistry::<u32>::new();
        let seen_a = Rc::new(RefCell::new(Vec::new()));
        let seen_b = Rc::new(RefCell::new(Vec::new()));

        let sink_a = Rc::clone(&seen_a);
        let sub_a = registry.subscribe(move |value| sink_a.borrow_mut().push(*value));
        let sink_b = Rc::clone(&seen_b);
        let _sub_b = registry.subscribe(move |value| sink_b.borrow_mut().push(*value));

        registry.emit(1);
        sub_a.unsubscribe();
        registry.emit(2);

        assert_eq!(*seen_a.borrow(), vec![1]);
        assert_eq!(*seen_b.borrow(), vec![1, 2]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reentrant_emit_is_delivered_after_current_round() {
        let registry = Rc::new(ObserverRegistry::<u32>::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner_registry = Rc::clone(&registry);
        let first_log = Rc::clone(&log);
        let _first = registry.subscribe(move |value| {
            first_log.borrow_mut().push(("first", *value));
            if *value == 1 {
                inner_registry.emit(2);
            }
        });
        let second_log = Rc::clone(&log);
        let _second = registry.subscribe(move |value| {
            second_log.borrow_mut().push(("second", *value));
        });

        registry.emit(1);

        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 1), ("first", 2), ("second", 2)]
        );
    }

    #[test]
    fn panicking_observer_does_not_block_later_emits() {
        let registry = ObserverRegistry::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let _subscription = registry.subscribe(move |value| {
            if *value == 1 {
                panic!("observer failure");
            }
            sink.borrow_mut().push(*value);
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| registry.emit(1)));
        assert!(result.is_err());

        registry.emit(2);
        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn late_subscriber_gets_initial_value_after_queued_ones() {
        let registry = Rc::new(ObserverRegistry::<u32>::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let late = Rc::new(RefCell::new(None));

        let inner_registry = Rc::clone(&registry);
        let first_log = Rc::clone(&log);
        let late_slot = Rc::clone(&late);
        let _first = registry.subscribe(move |value| {
            first_log.borrow_mut().push(("first", *value));
            if *value == 1 {
                inner_registry.emit(2);
                let late_log = Rc::clone(&first_log);
                let subscription = inner_registry.subscribe_with(20, move |value| {
                    late_log.borrow_mut().push(("late", *value));
                });
                *late_slot.borrow_mut() = Some(subscription);
                inner_registry.emit(3);
            }
        });

        registry.emit(1);

        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("first", 2), ("late", 20), ("first", 3), ("late", 3)]
        );
    }

    #[test]
    fn clones_share_observers() {
        let registry = ObserverRegistry::<u32>::new();
        let handle = registry.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let _subscription = handle.subscribe(move |value| sink.borrow_mut().push(*value));
        registry.emit(7);

        assert_eq!(*seen.borrow(), vec![7]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn dropping_registry_makes_unsubscribe_a_no_op() {
        let registry = ObserverRegistry::<u32>::new();
        let subscription = registry.subscribe(|_| {});
        drop(registry);
        subscription.unsubscribe();
    }
}
