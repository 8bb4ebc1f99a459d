use std::{
    borrow::Borrow,
    fmt::{Debug, Display},
    ops::Deref,
};

use serde::{Deserialize, Serialize};

use crate::DrawStateError;

/// The canonical identity a cached buffer is stored under.
///
/// Every identity is canonicalized to a string, so a coordinate `(3, 4)` and
/// the text `"3,4"` name the same entry.
#[repr(transparent)]
#[derive(Clone, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DrawKey(Box<str>);

impl DrawKey {
    #[inline]
    pub fn new(key: impl Into<DrawKey>) -> Self {
        key.into()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the key as a coordinate, if it has the `"x,y"` form.
    pub fn as_coord(&self) -> Option<Coord> {
        Coord::try_from(self.as_str()).ok()
    }
}

impl Debug for DrawKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for DrawKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for DrawKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Borrow<str> for DrawKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DrawKey {
    #[inline(always)]
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for DrawKey {
    #[inline(always)]
    fn from(value: String) -> Self {
        Self(value.into_boxed_str())
    }
}

impl From<&String> for DrawKey {
    #[inline(always)]
    fn from(value: &String) -> Self {
        Self(value.as_str().into())
    }
}

impl From<&DrawKey> for DrawKey {
    #[inline(always)]
    fn from(value: &DrawKey) -> Self {
        value.clone()
    }
}

impl From<Coord> for DrawKey {
    fn from(value: Coord) -> Self {
        Self(value.to_string().into_boxed_str())
    }
}

impl From<(i32, i32)> for DrawKey {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y).into()
    }
}

/// A tile position on the display grid.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }
}

impl Debug for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("({},{})", self.x, self.y).as_str())
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("{},{}", self.x, self.y).as_str())
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord { x, y }
    }
}

impl From<Coord> for (i32, i32) {
    fn from(value: Coord) -> Self {
        (value.x, value.y)
    }
}

impl TryFrom<&str> for Coord {
    type Error = DrawStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let Some((x, y)) = value.split_once(',') else {
            return Err(DrawStateError::InvalidKey(
                format!("'{}' is not of the form \"x,y\"", value).into(),
            ));
        };

        let parse = |s: &str| {
            s.parse::<i32>().map_err(|_| {
                DrawStateError::InvalidKey(
                    format!("'{}' is not of the form \"x,y\"", value).into(),
                )
            })
        };
        let coord = Coord::new(parse(x)?, parse(y)?);
        // "03,4" or "+3,4" would otherwise parse into a key that is not canonical
        if coord.to_string() != value {
            return Err(DrawStateError::InvalidKey(
                format!("'{}' is not a canonical coordinate", value).into(),
            ));
        }
        Ok(coord)
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.y.cmp(&other.y) {
            core::cmp::Ordering::Equal => self.x.cmp(&other.x),
            ord => ord,
        }
    }
}
