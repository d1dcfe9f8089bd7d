//! Reactive list view model.
//!
//! # Responsibility
//! - Combine the employee snapshot, the debounced search term and the sort
//!   key into the displayed list (combine-latest semantics).
//! - Own the search debounce timer and drop unchanged search terms.
//!
//! # Invariants
//! - Recomputation happens synchronously on every accepted input change,
//!   using the latest value of the other two inputs.
//! - A released search term equal to the active term triggers nothing.
//! - Disposing a binding cancels its pending debounce timer.
//! - Output observers never run while a binding holds the model borrowed.

use crate::list::filter::{filter_employees, normalize_search};
use crate::list::sort::{sort_employees, SortField, SortKey};
use crate::reactive::{CombineLatest3, Debouncer, ObserverRegistry, Subscription};
use crate::storage::KeyValueStore;
use crate::store::{EmployeeSnapshot, EmployeeStore};
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Quiet period before a typed search term takes effect.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

type ListPipeline = CombineLatest3<EmployeeSnapshot, String, SortKey, EmployeeSnapshot>;

/// Derives the displayed employee list from its three inputs.
pub struct ListViewModel {
    pipeline: ListPipeline,
    search_input: Debouncer<String>,
    outputs: ObserverRegistry<EmployeeSnapshot>,
}

impl Default for ListViewModel {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl ListViewModel {
    /// Creates a model with an empty active search term and default sort.
    ///
    /// No list is produced until the first employee snapshot arrives.
    pub fn new(search_debounce: Duration) -> Self {
        let mut pipeline: ListPipeline =
            CombineLatest3::new(|employees: &EmployeeSnapshot, term: &String, key: &SortKey| {
                let filtered = filter_employees(employees, term);
                sort_employees(filtered, *key).into()
            });
        pipeline.set_b(String::new());
        pipeline.set_c(SortKey::default());

        Self {
            pipeline,
            search_input: Debouncer::new(search_debounce),
            outputs: ObserverRegistry::new(),
        }
    }

    /// Feeds a new employee snapshot.
    pub fn set_employees(&mut self, employees: EmployeeSnapshot) {
        let output = self.apply_employees(employees);
        publish(&self.outputs, output);
    }

    /// Records a raw keystroke; the term applies after the debounce window.
    pub fn input_search(&mut self, raw: &str, now: Instant) {
        self.search_input.push(raw.to_string(), now);
    }

    /// Drives the debounce timer.
    ///
    /// Returns `true` when a new search term was applied and the list
    /// recomputed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let (applied, output) = self.apply_poll(now);
        publish(&self.outputs, output);
        applied
    }

    /// Deadline of the pending search term, for scheduling the next `poll`.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.search_input.deadline()
    }

    /// Drops a typed but not yet applied search term.
    pub fn cancel_pending_search(&mut self) {
        self.search_input.cancel();
    }

    /// Applies a column selection using the toggle rule.
    pub fn sort_by(&mut self, field: SortField) -> SortKey {
        let key = self.sort_key().toggled(field);
        self.set_sort_key(key);
        key
    }

    /// Replaces the sort key directly.
    pub fn set_sort_key(&mut self, key: SortKey) {
        let output = self.apply_sort_key(key);
        publish(&self.outputs, output);
    }

    pub fn sort_key(&self) -> SortKey {
        self.pipeline.c().copied().unwrap_or_default()
    }

    /// Active (already debounced and normalized) search term.
    pub fn search_term(&self) -> &str {
        self.pipeline.b().map_or("", String::as_str)
    }

    /// Latest derived list; empty before the first employee snapshot.
    pub fn current(&self) -> EmployeeSnapshot {
        self.pipeline
            .output()
            .cloned()
            .unwrap_or_else(|| Vec::new().into())
    }

    /// Number of recomputations so far.
    pub fn recompute_count(&self) -> u64 {
        self.pipeline.recomputations()
    }

    /// Registers an observer for every recomputed list.
    pub fn subscribe(&self, observer: impl FnMut(&EmployeeSnapshot) + 'static) -> Subscription {
        self.outputs.subscribe(observer)
    }

    // `apply_*` update state and return the recomputed list without notifying.

    fn apply_employees(&mut self, employees: EmployeeSnapshot) -> Option<EmployeeSnapshot> {
        self.pipeline.set_a(employees).cloned()
    }

    fn apply_poll(&mut self, now: Instant) -> (bool, Option<EmployeeSnapshot>) {
        let Some(raw) = self.search_input.poll(now) else {
            return (false, None);
        };
        let normalized = normalize_search(&raw);
        if self.pipeline.b().is_some_and(|active| *active == normalized) {
            debug!("event=list_search module=list status=skipped reason=unchanged");
            return (false, None);
        }

        debug!(
            "event=list_search module=list status=ok term_chars={}",
            normalized.chars().count()
        );
        (true, self.pipeline.set_b(normalized).cloned())
    }

    fn apply_sort_key(&mut self, key: SortKey) -> Option<EmployeeSnapshot> {
        debug!(
            "event=list_sort module=list status=ok field={} direction={:?}",
            key.field, key.direction
        );
        self.pipeline.set_c(key).cloned()
    }
}

fn publish(outputs: &ObserverRegistry<EmployeeSnapshot>, output: Option<EmployeeSnapshot>) {
    if let Some(list) = output {
        outputs.emit(list);
    }
}

/// A `ListViewModel` wired to a store subscription.
///
/// Dropping or disposing the binding stops store updates and cancels any
/// pending search timer. Output observers run after the model borrow is
/// released, so they may mutate the store; the resulting list is delivered
/// once the current round of observers has finished.
pub struct ListBinding {
    model: Rc<RefCell<ListViewModel>>,
    outputs: ObserverRegistry<EmployeeSnapshot>,
    store_subscription: Option<Subscription>,
}

impl ListBinding {
    /// Subscribes `model` to `store`; the current snapshot is applied at once.
    pub fn bind<S: KeyValueStore>(store: &EmployeeStore<S>, model: ListViewModel) -> Self {
        let outputs = model.outputs.clone();
        let model = Rc::new(RefCell::new(model));
        let weak = Rc::downgrade(&model);
        let store_outputs = outputs.clone();
        let subscription = store.subscribe(move |snapshot| {
            if let Some(model) = weak.upgrade() {
                let output = model.borrow_mut().apply_employees(Rc::clone(snapshot));
                publish(&store_outputs, output);
            }
        });

        Self {
            model,
            outputs,
            store_subscription: Some(subscription),
        }
    }

    pub fn input_search(&self, raw: &str, now: Instant) {
        self.model.borrow_mut().input_search(raw, now);
    }

    pub fn poll(&self, now: Instant) -> bool {
        let (applied, output) = self.model.borrow_mut().apply_poll(now);
        publish(&self.outputs, output);
        applied
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.model.borrow().next_deadline()
    }

    pub fn sort_by(&self, field: SortField) -> SortKey {
        let key = self.sort_key().toggled(field);
        let output = self.model.borrow_mut().apply_sort_key(key);
        publish(&self.outputs, output);
        key
    }

    pub fn sort_key(&self) -> SortKey {
        self.model.borrow().sort_key()
    }

    pub fn search_term(&self) -> String {
        self.model.borrow().search_term().to_string()
    }

    pub fn current(&self) -> EmployeeSnapshot {
        self.model.borrow().current()
    }

    pub fn recompute_count(&self) -> u64 {
        self.model.borrow().recompute_count()
    }

    pub fn subscribe(&self, observer: impl FnMut(&EmployeeSnapshot) + 'static) -> Subscription {
        self.outputs.subscribe(observer)
    }

    pub fn is_attached(&self) -> bool {
        self.store_subscription.is_some()
    }

    /// Detaches from the store and cancels the pending search timer.
    pub fn dispose(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(subscription) = self.store_subscription.take() {
            subscription.unsubscribe();
        }
        if let Ok(mut model) = self.model.try_borrow_mut() {
            model.cancel_pending_search();
        }
    }
}

impl Drop for ListBinding {
    fn drop(&mut self) {
        self.detach();
    }
}
