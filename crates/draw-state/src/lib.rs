//! # Draw-State Cache
//!
//! Tiles on a slow display are not cleared and repainted. Each element is erased
//! by drawing it again in the background color with exactly the values it was
//! drawn with last time, and then drawn with fresh values. This crate remembers
//! those values.
//!
//! A render call site hands [`DrawStateStore::handle_caching`] a key and an
//! ordered list of its own variables. In [`Phase::Capture`] their values are
//! encoded into one buffer stored under the key. In [`Phase::Restore`] the
//! buffer is decoded back into the same variables.
//!
//! ## Buffer Format
//!
//! A buffer is the fields of the slot list laid back to back. Nothing in the
//! buffer says which kind a field is: the slot list used to restore must have
//! the same kinds in the same order as the one used to save.
//!
//! ┌──────────────────────────────────────────────────────┐
//! │ Cached Buffer                                        │
//! │┌ ─ ─ ─ ─ ─ ─ ┬ ─ ─ ─ ─ ─ ─ ┬ ─ ─ ─ ┬ ─ ─ ─ ─ ─ ─ ─ ─ │
//! │    Field 0   │   Field 1   │  ...  │   Field n-1   ││
//! ││    bytes    │    bytes    │       │     bytes      │
//! │ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ┘│
//! └──────────────────────────────────────────────────────┘
//!
//! All integers are little-endian.
//!
//! | kind      | wire form                                               |
//! |-----------|---------------------------------------------------------|
//! | scalar    | the value's fixed-width byte pattern (`bool` is 1 byte) |
//! | text      | `u32` byte length, then the UTF-8 bytes                 |
//! | text list | `u32` count, then that many text fields                 |
//!
//! ## Mismatch Detection
//!
//! Restoring checks, in order:
//! 1. Every field must fit in the bytes that remain ([`DrawStateError::BufferUnderrun`]).
//! 2. The decoded fields must use up the whole buffer ([`DrawStateError::LengthMismatch`]).
//! 3. The slot kinds must hash to the fingerprint recorded beside the buffer at
//!    save time ([`DrawStateError::LayoutMismatch`]).
//!
//! None of them is fatal. What happens to the slots depends on [`RestorePolicy`].
//!
//! ## Example
//!
//! ```
//! use draw_state::{slots, CacheOutcome, DrawStateStore, Phase, Timestamp};
//!
//! let mut store = DrawStateStore::default();
//! let mut icon = String::from("WIFI_FULL");
//! let mut time = Timestamp::from_secs(1000);
//! store
//!     .handle_caching(Phase::Capture, "time", slots![icon, time])
//!     .unwrap();
//!
//! let (mut icon, mut time) = (String::new(), Timestamp::default());
//! let outcome = store
//!     .handle_caching(Phase::Restore, "time", slots![icon, time])
//!     .unwrap();
//! assert_eq!(outcome, CacheOutcome::Restored { len: 21 });
//! assert_eq!((icon.as_str(), time.as_secs()), ("WIFI_FULL", 1000));
//! ```
pub mod codec;
pub mod config;
pub mod global;
mod phase;
mod render;
mod slot;
pub mod store;

pub use config::{DrawStateConfig, MissSeverity, RestorePolicy};
pub use draw_state_common::{Coord, DrawKey, DrawStateError, DrawStateResult};
pub use global::PhaseGuard;
pub use phase::{draw_only, Phase};
pub use render::DrawCx;
pub use slot::{Scalar, Slot, Timestamp};
pub use store::{CacheOutcome, DrawStateStore};
