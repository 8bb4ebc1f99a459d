use std::collections::BTreeMap;

use bytes::Bytes;
use draw_state_common::{DrawKey, DrawStateError, DrawStateResult};
use tracing::{debug, error, trace, warn};

use crate::{
    codec::{self, FieldError, FieldValue},
    config::{DrawStateConfig, MissSeverity, RestorePolicy},
    phase::Phase,
    slot::Slot,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    layout: u32,
    data: Bytes,
}

/// What a successful [`DrawStateStore::handle_caching`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// The slots were encoded into a buffer of `len` bytes.
    Saved { len: usize },
    /// Every slot was overwritten from a buffer of `len` bytes.
    Restored { len: usize },
    /// Nothing was cached under the key. The slots are untouched.
    Miss,
}

/// Recorded slot values for every element drawn so far, keyed by element.
///
/// Entries are only ever replaced wholesale. There is no removal, the store
/// lives as long as its owner.
#[derive(Debug, Clone, Default)]
pub struct DrawStateStore {
    entries: BTreeMap<DrawKey, Entry>,
    config: DrawStateConfig,
}

impl DrawStateStore {
    pub fn new(config: DrawStateConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &DrawStateConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DrawStateConfig) {
        self.config = config;
    }

    /// Save the slots under `key` in [`Phase::Capture`], or overwrite them from
    /// the buffer saved under `key` in [`Phase::Restore`].
    ///
    /// The slot list must hold the same kinds in the same order in both phases.
    /// Errors are diagnostics: under [`RestorePolicy::Permissive`] the slots
    /// that decoded before the error keep their restored values.
    pub fn handle_caching(
        &mut self,
        phase: Phase,
        key: impl Into<DrawKey>,
        slots: &mut [&mut dyn Slot],
    ) -> DrawStateResult<CacheOutcome> {
        let key = key.into();
        match phase {
            Phase::Capture => Ok(self.save(key, slots)),
            Phase::Restore => self.restore(&key, slots),
        }
    }

    fn save(&mut self, key: DrawKey, slots: &[&mut dyn Slot]) -> CacheOutcome {
        let mut buf = Vec::new();
        for slot in slots {
            codec::encode(&mut buf, &slot.capture());
        }

        let layout = codec::layout_fingerprint(slots.iter().map(|s| s.kind()));
        let len = buf.len();
        trace!("save {} slots for '{}' in {} bytes", slots.len(), key, len);
        self.entries.insert(
            key,
            Entry {
                layout,
                data: buf.into(),
            },
        );
        CacheOutcome::Saved { len }
    }

    fn restore(
        &self,
        key: &DrawKey,
        slots: &mut [&mut dyn Slot],
    ) -> DrawStateResult<CacheOutcome> {
        let Some(entry) = self.entries.get(key) else {
            match self.config.miss_severity {
                MissSeverity::Warn => warn!(
                    "restore skipped for '{}': nothing cached, slots keep their current values",
                    key
                ),
                MissSeverity::Debug => debug!("restore skipped for '{}': nothing cached", key),
                MissSeverity::Silent => {}
            }
            return Ok(CacheOutcome::Miss);
        };

        let strict = self.config.restore_policy == RestorePolicy::Strict;
        let data = &entry.data;
        let total = slots.len();
        let mut staged: Vec<FieldValue> = Vec::new();
        let mut offset = 0;
        for (i, slot) in slots.iter_mut().enumerate() {
            let start = offset;
            match codec::decode(data, &mut offset, slot.kind()) {
                Ok(value) if strict => staged.push(value),
                Ok(value) => slot.restore(value),
                Err(e) => {
                    let err = match e {
                        FieldError::Underrun { needed, remaining } => {
                            DrawStateError::BufferUnderrun {
                                key: key.clone(),
                                slot: i,
                                offset: start,
                                needed,
                                remaining,
                            }
                        }
                        FieldError::InvalidUtf8 => DrawStateError::DecodeError(
                            format!("slot {} of '{}' holds invalid UTF-8", i, key).into(),
                        ),
                    };
                    error!(
                        "restore failed for '{}' ({} cached bytes, {} of {} slots restored): {}",
                        key,
                        data.len(),
                        if strict { 0 } else { i },
                        total,
                        err
                    );
                    if strict && i > 0 {
                        ensure_cov::notify_cov("draw_state::store::restore::strict_discard");
                    }
                    return Err(err);
                }
            }
        }

        let drift = if offset != data.len() {
            Some(DrawStateError::LengthMismatch {
                key: key.clone(),
                consumed: offset,
                stored: data.len(),
            })
        } else if self.config.check_layout
            && codec::layout_fingerprint(slots.iter().map(|s| s.kind())) != entry.layout
        {
            Some(DrawStateError::LayoutMismatch { key: key.clone() })
        } else {
            None
        };

        if let Some(err) = drift {
            error!("{}", err);
            if strict {
                ensure_cov::notify_cov("draw_state::store::restore::strict_discard");
            }
            return Err(err);
        }

        for (slot, value) in slots.iter_mut().zip(staged) {
            slot.restore(value);
        }
        trace!("restore {} slots for '{}'", total, key);
        Ok(CacheOutcome::Restored { len: data.len() })
    }

    /// The raw buffer cached under `key`.
    pub fn get(&self, key: impl Into<DrawKey>) -> Option<Bytes> {
        self.entries.get(&key.into()).map(|e| e.data.clone())
    }

    pub fn contains_key(&self, key: impl Into<DrawKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total bytes held by keys and buffers.
    pub fn size(&self) -> usize {
        self.entries
            .iter()
            .fold(0, |acc, (k, v)| acc + k.len() + v.data.len())
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &DrawKey> + '_ {
        self.entries.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{slots, Timestamp};

    #[test]
    fn save_then_restore() {
        let mut store = DrawStateStore::default();
        let mut icon = String::from("WIFI_FULL");
        let mut time = Timestamp(1000);
        assert_eq!(
            store
                .handle_caching(Phase::Capture, "time", slots![icon, time])
                .unwrap(),
            CacheOutcome::Saved { len: 4 + 9 + 8 }
        );
        assert_eq!(store.get("time").unwrap().len(), 21);

        let mut icon = String::new();
        let mut time = Timestamp::default();
        assert_eq!(
            store
                .handle_caching(Phase::Restore, "time", slots![icon, time])
                .unwrap(),
            CacheOutcome::Restored { len: 21 }
        );
        assert_eq!(icon, "WIFI_FULL");
        assert_eq!(time, Timestamp(1000));
    }

    #[test]
    fn miss_leaves_slots_alone() {
        let mut store = DrawStateStore::default();
        let mut a = 5i32;
        let mut b = String::from("keep");
        assert_eq!(
            store
                .handle_caching(Phase::Restore, "never", slots![a, b])
                .unwrap(),
            CacheOutcome::Miss
        );
        assert_eq!(a, 5);
        assert_eq!(b, "keep");
        assert!(store.is_empty());
    }

    #[test]
    fn last_save_wins() {
        let mut store = DrawStateStore::default();
        let mut v = 1u16;
        store.handle_caching(Phase::Capture, (0, 0), slots![v]).unwrap();
        v = 2;
        store.handle_caching(Phase::Capture, (0, 0), slots![v]).unwrap();
        assert_eq!(store.len(), 1);

        v = 0;
        store.handle_caching(Phase::Restore, "0,0", slots![v]).unwrap();
        assert_eq!(v, 2);
    }

    #[test]
    fn trailing_slot_underruns() {
        let mut store = DrawStateStore::default();
        let mut icon = String::from("WIFI_FULL");
        let mut time = Timestamp(1000);
        store
            .handle_caching(Phase::Capture, "time", slots![icon, time])
            .unwrap();

        let mut icon = String::new();
        let mut time = Timestamp::default();
        let mut extra = 9u8;
        let err = store
            .handle_caching(Phase::Restore, "time", slots![icon, time, extra])
            .unwrap_err();
        assert_eq!(
            err,
            DrawStateError::BufferUnderrun {
                key: "time".into(),
                slot: 2,
                offset: 21,
                needed: 1,
                remaining: 0,
            }
        );
        // permissive: the slots before the failure were applied
        assert_eq!(icon, "WIFI_FULL");
        assert_eq!(time, Timestamp(1000));
        assert_eq!(extra, 9);
    }

    #[test]
    fn missing_slot_is_length_mismatch() {
        let mut store = DrawStateStore::default();
        let mut a = 1i32;
        let mut b = 2i32;
        store.handle_caching(Phase::Capture, "k", slots![a, b]).unwrap();

        let mut a = 0i32;
        let err = store
            .handle_caching(Phase::Restore, "k", slots![a])
            .unwrap_err();
        assert_eq!(
            err,
            DrawStateError::LengthMismatch {
                key: "k".into(),
                consumed: 4,
                stored: 8
            }
        );
        assert!(err.is_schema_drift());
        assert_eq!(a, 1);
    }

    #[test]
    fn swapped_order_never_silently_succeeds() {
        // "hi" has length 2, so the swapped read consumes exactly the buffer
        let mut store = DrawStateStore::default();
        let mut n = 2i32;
        let mut s = String::from("hi");
        store.handle_caching(Phase::Capture, "k", slots![n, s]).unwrap();

        let mut s2 = String::new();
        let mut n2 = 0i32;
        let err = store
            .handle_caching(Phase::Restore, "k", slots![s2, n2])
            .unwrap_err();
        assert_eq!(err, DrawStateError::LayoutMismatch { key: "k".into() });
    }

    #[test]
    fn strict_policy_touches_nothing_on_failure() {
        let mut store =
            DrawStateStore::new(DrawStateConfig::new().restore_policy(RestorePolicy::Strict));
        let mut a = 7i32;
        let mut b = String::from("x");
        store.handle_caching(Phase::Capture, "k", slots![a, b]).unwrap();

        let mut a = 0i32;
        let mut b = String::new();
        let mut c = 0u64;
        assert!(store
            .handle_caching(Phase::Restore, "k", slots![a, b, c])
            .is_err());
        assert_eq!((a, b.as_str(), c), (0, "", 0));

        let mut a = 0i32;
        assert!(store
            .handle_caching(Phase::Restore, "k", slots![a])
            .unwrap_err()
            .is_schema_drift());
        assert_eq!(a, 0);

        let mut b = String::new();
        assert!(store
            .handle_caching(Phase::Restore, "k", slots![a, b])
            .is_ok());
        assert_eq!((a, b.as_str()), (7, "x"));
    }

    #[test]
    fn layout_check_can_be_disabled() {
        let mut store = DrawStateStore::new(DrawStateConfig::new().check_layout(false));
        let mut n = 2i32;
        let mut s = String::from("hi");
        store.handle_caching(Phase::Capture, "k", slots![n, s]).unwrap();

        // without the fingerprint a swapped read that fits the buffer goes unnoticed
        let mut s = String::new();
        let mut n = 0i32;
        assert!(store
            .handle_caching(Phase::Restore, "k", slots![s, n])
            .is_ok());
        assert_eq!(s, "\u{2}\u{0}");
        assert_eq!(n, i32::from_le_bytes([0, 0, b'h', b'i']));
    }

    #[test]
    fn empty_slot_list() {
        let mut store = DrawStateStore::default();
        assert_eq!(
            store.handle_caching(Phase::Capture, "empty", slots![]).unwrap(),
            CacheOutcome::Saved { len: 0 }
        );
        assert_eq!(
            store.handle_caching(Phase::Restore, "empty", slots![]).unwrap(),
            CacheOutcome::Restored { len: 0 }
        );
    }

    #[test]
    fn introspection() {
        let mut store = DrawStateStore::default();
        let mut v = 1u8;
        store.handle_caching(Phase::Capture, (1, 2), slots![v]).unwrap();
        store.handle_caching(Phase::Capture, "b", slots![v]).unwrap();
        assert!(store.contains_key("1,2"));
        assert!(!store.contains_key((2, 1)));
        assert_eq!(store.size(), 3 + 1 + 1 + 1);
        assert_eq!(
            store.keys().map(|k| k.as_str()).collect::<Vec<_>>(),
            vec!["1,2", "b"]
        );
    }
}
