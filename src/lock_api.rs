//! Wrap the Mutex lock.
//!
//! In a single thread, when atomics is not enabled, use the lock provided by the standard library.
//! There will be no deadlock unless there is a recursive call.
//!
//! In multithreading, when atomics is enabled, use parking_lot, it will not cause lock poisoning

#[cfg(target_feature = "atomics")]
use parking_lot::Mutex as Mutex0;

#[cfg(target_feature = "atomics")]
pub use parking_lot::MutexGuard;

#[cfg(not(target_feature = "atomics"))]
use std::sync::{Mutex as Mutex0, PoisonError};

#[cfg(not(target_feature = "atomics"))]
pub use std::sync::MutexGuard;

pub struct Mutex<T>(Mutex0<T>);

impl<T> Mutex<T> {
    pub fn new(t: T) -> Self {
        Self(Mutex0::new(t))
    }

    #[cfg(target_feature = "atomics")]
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock()
    }

    /// Poisoning is ignored.
    #[cfg(not(target_feature = "atomics"))]
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
