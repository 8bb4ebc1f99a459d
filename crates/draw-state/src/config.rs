/// How a restore of a key that was never saved is reported.
///
/// A miss is expected on the first frame an element is drawn, so some callers
/// prefer to keep it out of the warning log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissSeverity {
    #[default]
    Warn,
    Debug,
    Silent,
}

/// What a restore does with slots when the cached buffer does not fit the
/// slot list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestorePolicy {
    /// Write each slot as soon as its field decodes. A failure leaves the
    /// slots decoded so far mutated, and schema drift is only reported.
    #[default]
    Permissive,
    /// Decode every field first and write the slots only when the whole
    /// buffer matched. On any failure no slot is touched.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawStateConfig {
    pub miss_severity: MissSeverity,
    pub restore_policy: RestorePolicy,
    pub check_layout: bool,
}

impl Default for DrawStateConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawStateConfig {
    pub const fn new() -> Self {
        Self {
            miss_severity: MissSeverity::Warn,
            restore_policy: RestorePolicy::Permissive,
            check_layout: true,
        }
    }

    pub fn miss_severity(mut self, severity: MissSeverity) -> Self {
        self.miss_severity = severity;
        self
    }

    pub fn restore_policy(mut self, policy: RestorePolicy) -> Self {
        self.restore_policy = policy;
        self
    }

    /// Compare the slot kinds of a restore against the ones recorded at save
    /// time, after the buffer decoded with a matching length.
    pub fn check_layout(mut self, check: bool) -> Self {
        self.check_layout = check;
        self
    }
}
