//! Push-based change propagation primitives.
//!
//! # Responsibility
//! - Provide an explicit observer list with RAII unsubscription.
//! - Provide a last-value-wins debounce timer driven by caller time.
//! - Provide a combine-latest node over three inputs.
//!
//! # Invariants
//! - Everything here is single-threaded (`Rc`/`RefCell`), no hidden runtime.
//! - Observers see values strictly in emission order, including values
//!   emitted re-entrantly from inside an observer.

pub mod combine;
pub mod debounce;
pub mod observer;

pub use combine::CombineLatest3;
pub use debounce::Debouncer;
pub use observer::{ObserverRegistry, Subscription};
