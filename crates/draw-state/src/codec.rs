//! Type-directed encoding of a single field.
//!
//! A field is one of three closed kinds. The buffer never records which kind
//! a field was, so decoding must be driven by the same [`FieldKind`] sequence
//! that produced the buffer.
use bytes::BufMut;
use enum_as_inner::EnumAsInner;
use smallvec::SmallVec;
use thiserror::Error;

pub(crate) const XXH_SEED: u32 = u32::from_le_bytes(*b"DRAW");
pub const SIZE_OF_U32: usize = std::mem::size_of::<u32>();
/// Width of the length prefix of text fields and the count prefix of text lists.
pub const SIZE_OF_PREFIX: usize = SIZE_OF_U32;

pub type ScalarBytes = SmallVec<[u8; 16]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A fixed-width value, known to the codec only by its byte width.
    Scalar { width: usize },
    Text,
    TextList,
}

impl FieldKind {
    fn tag(&self) -> u8 {
        match self {
            FieldKind::Scalar { .. } => 0,
            FieldKind::Text => 1,
            FieldKind::TextList => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumAsInner)]
pub enum FieldValue {
    /// Little-endian bytes of a fixed-width value
    Scalar(ScalarBytes),
    Text(String),
    TextList(Vec<String>),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Scalar(bytes) => FieldKind::Scalar { width: bytes.len() },
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::TextList(_) => FieldKind::TextList,
        }
    }

    /// The number of bytes [`encode`] appends for this value.
    pub fn encoded_len(&self) -> usize {
        match self {
            FieldValue::Scalar(bytes) => bytes.len(),
            FieldValue::Text(s) => SIZE_OF_PREFIX + s.len(),
            FieldValue::TextList(list) => {
                SIZE_OF_PREFIX + list.iter().map(|s| SIZE_OF_PREFIX + s.len()).sum::<usize>()
            }
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("need {needed} bytes but only {remaining} remain")]
    Underrun { needed: usize, remaining: usize },
    #[error("text is not valid UTF-8")]
    InvalidUtf8,
}

/// ┌──────────────────────────────┐
/// │ Text                         │
/// │┌ ─ ─ ─ ─ ─ ─ ┬ ─ ─ ─ ─ ─ ─ ─ │
/// │  byte length    utf-8 bytes ││
/// ││    u32      │    bytes      │
/// │ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ─ ┘│
/// └──────────────────────────────┘
fn put_text(buf: &mut Vec<u8>, text: &str) {
    debug_assert!(text.len() <= u32::MAX as usize, "text is too long to cache");
    buf.put_u32_le(text.len() as u32);
    buf.put_slice(text.as_bytes());
}

/// Append the wire form of `value` to `buf`.
pub fn encode(buf: &mut Vec<u8>, value: &FieldValue) {
    match value {
        FieldValue::Scalar(bytes) => buf.put_slice(bytes),
        FieldValue::Text(text) => put_text(buf, text),
        FieldValue::TextList(list) => {
            debug_assert!(list.len() <= u32::MAX as usize, "list is too long to cache");
            buf.put_u32_le(list.len() as u32);
            for text in list {
                put_text(buf, text);
            }
        }
    }
}

fn take(bytes: &[u8], n: usize) -> Result<(&[u8], &[u8]), FieldError> {
    if bytes.len() < n {
        return Err(FieldError::Underrun {
            needed: n,
            remaining: bytes.len(),
        });
    }
    Ok(bytes.split_at(n))
}

fn get_u32_le(bytes: &[u8]) -> Result<(u32, &[u8]), FieldError> {
    let (head, rest) = take(bytes, SIZE_OF_U32)?;
    let mut arr = [0u8; SIZE_OF_U32];
    arr.copy_from_slice(head);
    Ok((u32::from_le_bytes(arr), rest))
}

fn get_text(bytes: &[u8]) -> Result<(String, &[u8]), FieldError> {
    let (len, rest) = get_u32_le(bytes)?;
    let (text, rest) = take(rest, len as usize)?;
    let text = std::str::from_utf8(text).map_err(|_| FieldError::InvalidUtf8)?;
    Ok((text.to_owned(), rest))
}

/// Read one field of the given kind at `offset`.
///
/// On success `offset` is advanced past the field. On failure it is left at
/// the start of the field.
pub fn decode(buf: &[u8], offset: &mut usize, kind: FieldKind) -> Result<FieldValue, FieldError> {
    let bytes = buf.get(*offset..).unwrap_or_default();
    let (value, rest) = match kind {
        FieldKind::Scalar { width } => {
            let (head, rest) = take(bytes, width)?;
            (FieldValue::Scalar(ScalarBytes::from_slice(head)), rest)
        }
        FieldKind::Text => {
            let (text, rest) = get_text(bytes)?;
            (FieldValue::Text(text), rest)
        }
        FieldKind::TextList => {
            let (count, mut rest) = get_u32_le(bytes)?;
            // each entry takes at least its prefix, so a corrupt count cannot over-allocate
            let mut list = Vec::with_capacity((count as usize).min(rest.len() / SIZE_OF_PREFIX));
            for _ in 0..count {
                let (text, r) = get_text(rest)?;
                list.push(text);
                rest = r;
            }
            (FieldValue::TextList(list), rest)
        }
    };

    *offset = buf.len() - rest.len();
    Ok(value)
}

/// A fingerprint of a sequence of field kinds.
///
/// It is kept beside a cached buffer so a restore can tell when the slot list
/// was reordered in a way that still consumes exactly the buffer length.
pub fn layout_fingerprint(kinds: impl IntoIterator<Item = FieldKind>) -> u32 {
    let mut buf = Vec::new();
    for kind in kinds {
        buf.put_u8(kind.tag());
        if let FieldKind::Scalar { width } = kind {
            buf.put_u32_le(width as u32);
        }
    }
    xxhash_rust::xxh32::xxh32(&buf, XXH_SEED)
}
