use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::codec::{FieldKind, FieldValue, ScalarBytes};

/// A value with a stable, self-contained little-endian byte form.
///
/// Implementing this is all a caller type needs to be usable as a [`Slot`].
/// The codec only knows the value by [`Scalar::WIDTH`], so two scalars with
/// the same width are interchangeable on the wire.
pub trait Scalar: Sized {
    const WIDTH: usize;
    fn write_le(&self, out: &mut ScalarBytes);
    /// `bytes` is always exactly [`Scalar::WIDTH`] long.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar_for_num {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                #[inline]
                fn write_le(&self, out: &mut ScalarBytes) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_le(bytes: &[u8]) -> Self {
                    let mut arr = [0u8; std::mem::size_of::<$t>()];
                    arr.copy_from_slice(bytes);
                    <$t>::from_le_bytes(arr)
                }
            }
        )*
    };
}

impl_scalar_for_num!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64);

impl Scalar for bool {
    const WIDTH: usize = 1;

    fn write_le(&self, out: &mut ScalarBytes) {
        out.push(*self as u8);
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

/// Seconds since the Unix epoch, as shown by clock tiles.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(pub i64);

impl Timestamp {
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Timestamp(secs)
    }

    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0
    }

    pub fn now() -> Self {
        let secs = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        };
        Timestamp(secs)
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Timestamp(value)
    }
}

impl Scalar for Timestamp {
    const WIDTH: usize = i64::WIDTH;

    fn write_le(&self, out: &mut ScalarBytes) {
        self.0.write_le(out)
    }

    fn read_le(bytes: &[u8]) -> Self {
        Timestamp(i64::read_le(bytes))
    }
}

/// A caller-owned location that is read on save and written on restore.
pub trait Slot {
    fn kind(&self) -> FieldKind;
    fn capture(&self) -> FieldValue;
    /// Overwrite the slot with a value decoded for [`Slot::kind`].
    fn restore(&mut self, value: FieldValue);
}

impl<T: Scalar> Slot for T {
    fn kind(&self) -> FieldKind {
        FieldKind::Scalar { width: T::WIDTH }
    }

    fn capture(&self) -> FieldValue {
        let mut bytes = ScalarBytes::new();
        self.write_le(&mut bytes);
        debug_assert_eq!(bytes.len(), T::WIDTH);
        FieldValue::Scalar(bytes)
    }

    fn restore(&mut self, value: FieldValue) {
        match value {
            FieldValue::Scalar(bytes) if bytes.len() == T::WIDTH => *self = T::read_le(&bytes),
            other => debug_assert!(false, "scalar slot got {:?}", other.kind()),
        }
    }
}

impl Slot for String {
    fn kind(&self) -> FieldKind {
        FieldKind::Text
    }

    fn capture(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn restore(&mut self, value: FieldValue) {
        match value.into_text() {
            Ok(text) => *self = text,
            Err(other) => debug_assert!(false, "text slot got {:?}", other.kind()),
        }
    }
}

impl Slot for Vec<String> {
    fn kind(&self) -> FieldKind {
        FieldKind::TextList
    }

    fn capture(&self) -> FieldValue {
        FieldValue::TextList(self.clone())
    }

    fn restore(&mut self, value: FieldValue) {
        match value.into_text_list() {
            Ok(list) => *self = list,
            Err(other) => debug_assert!(false, "text list slot got {:?}", other.kind()),
        }
    }
}

/// Build an ordered slot list out of mutable places.
///
/// ```
/// use draw_state::{slots, DrawStateStore, Phase};
///
/// let mut store = DrawStateStore::default();
/// let mut icon = String::from("WIFI_FULL");
/// let mut level = 3i32;
/// store
///     .handle_caching(Phase::Capture, "wifi", slots![icon, level])
///     .unwrap();
/// ```
#[macro_export]
macro_rules! slots {
    ($($slot:expr),* $(,)?) => {
        &mut [$((&mut $slot) as &mut dyn $crate::Slot),*]
    };
}
