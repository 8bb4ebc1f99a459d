use draw_state_common::{DrawKey, DrawStateResult};

use crate::{
    phase::{self, Phase},
    slot::Slot,
    store::{CacheOutcome, DrawStateStore},
};

/// The state a single render pass threads through its draw calls.
///
/// The phase is fixed for the lifetime of the context, so every cache call
/// made through it agrees on whether it saves or restores.
#[derive(Debug)]
pub struct DrawCx<'a> {
    store: &'a mut DrawStateStore,
    phase: Phase,
}

impl<'a> DrawCx<'a> {
    pub fn new(store: &'a mut DrawStateStore, phase: Phase) -> Self {
        Self { store, phase }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether this pass redraws old values in the erase color.
    #[inline]
    pub fn is_erasing(&self) -> bool {
        self.phase.is_restoring()
    }

    pub fn cache(
        &mut self,
        key: impl Into<DrawKey>,
        slots: &mut [&mut dyn Slot],
    ) -> DrawStateResult<CacheOutcome> {
        self.store.handle_caching(self.phase, key, slots)
    }

    #[inline]
    pub fn draw_only<T: Default>(&self, f: impl FnOnce() -> T) -> T {
        phase::draw_only(self.phase, f)
    }

    pub fn store(&self) -> &DrawStateStore {
        &*self.store
    }
}

impl DrawStateStore {
    /// Run one erase-then-draw cycle.
    ///
    /// `render` is called first in [`Phase::Restore`], where each element's
    /// cache call brings back what it drew last time so it can be painted over.
    /// It is then called in [`Phase::Capture`] to draw and record fresh values.
    pub fn erase_and_redraw(&mut self, mut render: impl FnMut(&mut DrawCx<'_>)) {
        render(&mut DrawCx::new(self, Phase::Restore));
        render(&mut DrawCx::new(self, Phase::Capture));
    }
}
