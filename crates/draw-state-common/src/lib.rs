mod error;
mod key;

pub use error::{DrawStateError, DrawStateResult};
pub use key::{Coord, DrawKey};
