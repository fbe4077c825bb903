//! Countdown latch: blocks waiters until it has been signalled N times.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Latch released after a fixed number of signals.
#[derive(Debug)]
pub struct Countdown {
    remaining: Mutex<usize>,
    released: Condvar,
}

impl Countdown {
    /// Latch that needs `count` signals. A count of zero starts released.
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            released: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.remaining.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one completion. Extra signals past zero are ignored.
    pub fn signal(&self) {
        let mut remaining = self.lock();
        if *remaining > 0 {
            *remaining -= 1;
            if *remaining == 0 {
                self.released.notify_all();
            }
        }
    }

    /// Block until every expected signal has arrived.
    pub fn wait(&self) {
        let mut remaining = self.lock();
        while *remaining > 0 {
            remaining = self
                .released
                .wait(remaining)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Signals not yet received.
    pub fn remaining(&self) -> usize {
        *self.lock()
    }

    /// Guard that signals when dropped, including during unwinding.
    pub fn guard(&self) -> CountdownGuard<'_> {
        CountdownGuard { latch: self }
    }
}

/// Signals its [`Countdown`] on drop.
#[must_use = "the latch is signalled when the guard drops"]
pub struct CountdownGuard<'a> {
    latch: &'a Countdown,
}

impl Drop for CountdownGuard<'_> {
    fn drop(&mut self) {
        self.latch.signal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_zero_count_is_released() {
        let latch = Countdown::new(0);
        latch.wait();
        assert_eq!(latch.remaining(), 0);
    }

    #[test]
    fn test_wait_returns_after_all_signals() {
        let latch = Arc::new(Countdown::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let latch = Arc::clone(&latch);
                thread::spawn(move || latch.signal())
            })
            .collect();
        latch.wait();
        assert_eq!(latch.remaining(), 0);
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_guard_signals_on_panic() {
        let latch = Arc::new(Countdown::new(1));
        let worker = Arc::clone(&latch);
        let result = thread::spawn(move || {
            let _signal = worker.guard();
            panic!("worker died");
        })
        .join();
        assert!(result.is_err());
        latch.wait();
        assert_eq!(latch.remaining(), 0);
    }

    #[test]
    fn test_extra_signals_ignored() {
        let latch = Countdown::new(1);
        latch.signal();
        latch.signal();
        assert_eq!(latch.remaining(), 0);
    }
}
