//! The process-wide store and mode flag.
//!
//! Rendering code that does not thread a [`DrawCx`](crate::DrawCx) through its
//! calls uses these instead. The store is created empty on first use and the
//! flag starts in save mode. Neither is ever torn down.
use std::sync::atomic::{AtomicBool, Ordering};

use draw_state_common::{DrawKey, DrawStateResult};
use once_cell::sync::Lazy;
use parking_lot::Mutex;

use crate::{
    config::DrawStateConfig,
    phase::{self, Phase},
    slot::Slot,
    store::{CacheOutcome, DrawStateStore},
};

static RESTORING: AtomicBool = AtomicBool::new(false);
static STORE: Lazy<Mutex<DrawStateStore>> = Lazy::new(|| Mutex::new(DrawStateStore::default()));

/// `true` switches every cache call to restore mode, `false` back to save mode.
pub fn set_mode(restoring: bool) {
    RESTORING.store(restoring, Ordering::Release);
}

pub fn is_restoring() -> bool {
    RESTORING.load(Ordering::Acquire)
}

pub fn phase() -> Phase {
    is_restoring().into()
}

/// [`DrawStateStore::handle_caching`] on the process-wide store, in the
/// phase the mode flag holds when the call starts.
pub fn handle_caching(
    key: impl Into<DrawKey>,
    slots: &mut [&mut dyn Slot],
) -> DrawStateResult<CacheOutcome> {
    let phase = phase();
    STORE.lock().handle_caching(phase, key, slots)
}

pub fn draw_only<T: Default>(f: impl FnOnce() -> T) -> T {
    phase::draw_only(phase(), f)
}

pub fn configure_global(config: DrawStateConfig) {
    STORE.lock().set_config(config);
}

/// Inspect the process-wide store. The store stays locked while `f` runs.
pub fn with_global_store<R>(f: impl FnOnce(&DrawStateStore) -> R) -> R {
    f(&STORE.lock())
}

/// Holds the mode flag at a phase for a scope and puts back the previous
/// value when dropped, so an early return cannot leave the flag stuck.
#[must_use = "the previous mode is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct PhaseGuard {
    prev: bool,
}

impl PhaseGuard {
    pub fn enter(phase: Phase) -> Self {
        let prev = RESTORING.swap(phase.is_restoring(), Ordering::AcqRel);
        Self { prev }
    }
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        set_mode(self.prev);
    }
}

/// [`global::handle_caching`](crate::global::handle_caching) over a list of
/// mutable places.
///
/// ```
/// use draw_state::{global, handle_caching};
///
/// let mut state = String::from("on");
/// let mut brightness = 80u8;
/// handle_caching!((2, 1), state, brightness).unwrap();
/// assert!(global::with_global_store(|s| s.contains_key("2,1")));
/// ```
#[macro_export]
macro_rules! handle_caching {
    ($key:expr $(, $slot:expr)* $(,)?) => {
        $crate::global::handle_caching($key, $crate::slots![$($slot),*])
    };
}
