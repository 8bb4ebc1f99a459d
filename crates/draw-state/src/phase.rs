/// Which half of a cache cycle a render pass is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Record the values a slot list holds. This is the mode flag's `false`.
    #[default]
    Capture,
    /// Overwrite a slot list with previously recorded values. This is the mode
    /// flag's `true`.
    Restore,
}

impl Phase {
    #[inline]
    pub fn is_restoring(&self) -> bool {
        matches!(self, Phase::Restore)
    }
}

impl From<bool> for Phase {
    #[inline]
    fn from(restoring: bool) -> Self {
        if restoring {
            Phase::Restore
        } else {
            Phase::Capture
        }
    }
}

impl From<Phase> for bool {
    #[inline]
    fn from(phase: Phase) -> Self {
        phase.is_restoring()
    }
}

/// Evaluate `f` only in [`Phase::Restore`]; otherwise return `T::default()`
/// without calling it.
#[inline]
pub fn draw_only<T: Default>(phase: Phase, f: impl FnOnce() -> T) -> T {
    match phase {
        Phase::Restore => f(),
        Phase::Capture => T::default(),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn flag_mapping() {
        assert_eq!(Phase::from(false), Phase::Capture);
        assert_eq!(Phase::from(true), Phase::Restore);
        assert!(bool::from(Phase::Restore));
        assert_eq!(Phase::default(), Phase::Capture);
    }

    #[test]
    fn draw_only_skips_the_thunk_when_capturing() {
        let calls = Cell::new(0);
        let lookup = || {
            calls.set(calls.get() + 1);
            String::from("22.5 °C")
        };

        assert_eq!(draw_only(Phase::Capture, lookup), "");
        assert_eq!(calls.get(), 0);
        assert_eq!(draw_only(Phase::Restore, lookup), "22.5 °C");
        assert_eq!(calls.get(), 1);

        assert_eq!(draw_only(Phase::Capture, || 42i32), 0);
        assert_eq!(draw_only(Phase::Capture, || vec![1u8]), Vec::<u8>::new());
        draw_only(Phase::Capture, || calls.set(100));
        assert_eq!(calls.get(), 1);
    }
}
