//! At-most-one in-flight request per surface.
//!
//! A second request while the first is outstanding is rejected, not queued.
//! The permit releases the gate on drop, including on early return or panic.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::error::BondwatchError;

#[derive(Debug)]
pub struct RequestGate {
    surface: &'static str,
    busy: AtomicBool,
}

impl RequestGate {
    pub const fn new(surface: &'static str) -> Self {
        Self {
            surface,
            busy: AtomicBool::new(false),
        }
    }

    pub fn surface(&self) -> &'static str {
        self.surface
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn try_acquire(&self) -> Result<Permit<'_>, BondwatchError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Permit { gate: self })
            .map_err(|_| BondwatchError::Busy {
                surface: self.surface.to_string(),
            })
    }
}

#[derive(Debug)]
pub struct Permit<'a> {
    gate: &'a RequestGate,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_rejected_until_release() {
        let gate = RequestGate::new("market feed");
        let permit = gate.try_acquire().unwrap();
        assert!(gate.is_busy());

        let err = gate.try_acquire().unwrap_err();
        assert!(matches!(err, BondwatchError::Busy { ref surface } if surface == "market feed"));

        drop(permit);
        assert!(!gate.is_busy());
        assert!(gate.try_acquire().is_ok());
    }

    #[test]
    fn gates_are_independent() {
        let tutor = RequestGate::new("tutor");
        let analyst = RequestGate::new("analyst");
        let _a = tutor.try_acquire().unwrap();
        assert!(analyst.try_acquire().is_ok());
    }

    #[test]
    fn gate_is_shared_across_threads() {
        let gate = RequestGate::new("tutor");
        let permit = gate.try_acquire().unwrap();
        std::thread::scope(|s| {
            s.spawn(|| assert!(gate.try_acquire().is_err()));
        });
        drop(permit);
    }
}
