use std::cell::RefCell;

use contig_common::{Error, Result};

/// Lifecycle event totals recorded on the current thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Values created from scratch (explicit or default construction).
    pub constructed: usize,
    /// Successful copy constructions.
    pub copied: usize,
    /// Successful copy assignments.
    pub assigned: usize,
    pub dropped: usize,
}

impl Counters {
    /// Number of instrumented values currently alive.
    pub fn live(&self) -> usize {
        (self.constructed + self.copied) - self.dropped
    }
}

#[derive(Default)]
struct State {
    counters: Counters,
    copy_budget: Option<usize>,
    default_budget: Option<usize>,
}

thread_local! {
    static STATE: RefCell<State> = RefCell::new(State::default());
}

/// Entry point to the per-thread instrumentation shared by the element types
/// in [`crate::elements`].
pub struct Probe;

impl Probe {
    /// Zeroes all counters and disarms every injected failure.
    pub fn reset() {
        STATE.with(|s| *s.borrow_mut() = State::default());
    }

    pub fn counters() -> Counters {
        STATE.with(|s| s.borrow().counters)
    }

    /// Lets `n` more copies (constructions or assignments) succeed; every one
    /// after that fails until [`Probe::disarm`] or [`Probe::reset`].
    pub fn fail_copy_after(n: usize) {
        STATE.with(|s| s.borrow_mut().copy_budget = Some(n));
    }

    /// Lets `n` more default constructions succeed; every one after that fails.
    pub fn fail_default_after(n: usize) {
        STATE.with(|s| s.borrow_mut().default_budget = Some(n));
    }

    /// Removes injected failures, keeping the counters.
    pub fn disarm() {
        STATE.with(|s| {
            let mut s = s.borrow_mut();
            s.copy_budget = None;
            s.default_budget = None;
        });
    }

    pub(crate) fn on_construct() {
        STATE.with(|s| s.borrow_mut().counters.constructed += 1);
    }

    pub(crate) fn on_default() -> Result<()> {
        STATE.with(|s| {
            let mut s = s.borrow_mut();
            spend(&mut s.default_budget, "default")?;
            s.counters.constructed += 1;
            Ok(())
        })
    }

    pub(crate) fn on_copy() -> Result<()> {
        STATE.with(|s| {
            let mut s = s.borrow_mut();
            spend(&mut s.copy_budget, "copy")?;
            s.counters.copied += 1;
            Ok(())
        })
    }

    pub(crate) fn on_assign() -> Result<()> {
        STATE.with(|s| {
            let mut s = s.borrow_mut();
            spend(&mut s.copy_budget, "assign")?;
            s.counters.assigned += 1;
            Ok(())
        })
    }

    pub(crate) fn on_drop() {
        // Values dropped during thread teardown have nothing left to report to.
        let _ = STATE.try_with(|s| s.borrow_mut().counters.dropped += 1);
    }
}

fn spend(budget: &mut Option<usize>, operation: &'static str) -> Result<()> {
    match budget {
        Some(0) => {
            log::debug!("injecting element {operation} failure");
            Err(Error::element(operation, "injected failure"))
        }
        Some(n) => {
            *n -= 1;
            Ok(())
        }
        None => Ok(()),
    }
}
