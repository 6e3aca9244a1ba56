//! Framing: sentinel-delimited transmissions.
//!
//! A request on the wire is `TAG(2) || TEXT(N) || "##" || KEY(N) || "@@"`.
//! There is no length prefix; the receiver accumulates bytes and rescans for
//! the sentinels, which is safe only because every sentinel byte is disjoint
//! from the 27-character payload alphabet.

use thiserror::Error;

/// Tag sent by a client requesting encryption.
pub const ENC_TAG: &[u8; 2] = b"!!";
/// Tag sent by a client requesting decryption.
pub const DEC_TAG: &[u8; 2] = b"$$";
/// Separates the text from the key inside a transmission.
pub const MID_SENTINEL: &[u8; 2] = b"##";
/// Marks the end of a transmission.
pub const END_SENTINEL: &[u8; 2] = b"@@";
/// Single-byte response sent when the role handshake fails.
pub const REJECTION_MARKER: u8 = b'*';

/// Which side of the one-time-pad protocol a party is on.
///
/// A daemon accepts only clients of its own role and rejects the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Encrypt,
    Decrypt,
}

impl Role {
    /// The two-byte tag this role puts at the front of its transmissions.
    pub fn tag(self) -> &'static [u8; 2] {
        match self {
            Role::Encrypt => ENC_TAG,
            Role::Decrypt => DEC_TAG,
        }
    }

    /// Recovers a role from a received tag, if it is one of the two known tags.
    pub fn from_tag(tag: &[u8]) -> Option<Role> {
        match tag {
            t if t == ENC_TAG => Some(Role::Encrypt),
            t if t == DEC_TAG => Some(Role::Decrypt),
            _ => None,
        }
    }
}

/// One decoded request: the client's tag plus the text and key payloads.
#[derive(Debug, PartialEq, Eq)]
pub struct Transmission {
    pub role: Option<Role>,
    pub text: Vec<u8>,
    pub key: Vec<u8>,
}

/// A transmission that contains the end sentinel but is structurally broken.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("transmission too short to carry a role tag")]
    MissingTag,
    #[error("transmission has no text/key separator")]
    MissingMid,
}

/// Builds the outbound frame for one request.
///
/// The key is truncated to the text length: the daemon never needs more key
/// than there is text.
///
/// # Panics
/// The key must be at least as long as the text; the client checks this
/// before calling.
pub fn encode(role: Role, text: &[u8], key: &[u8]) -> Vec<u8> {
    debug_assert!(key.len() >= text.len(), "key shorter than text");
    let key = &key[..text.len()];

    let mut frame = Vec::with_capacity(2 + text.len() + 2 + key.len() + 2);
    frame.extend_from_slice(role.tag());
    frame.extend_from_slice(text);
    frame.extend_from_slice(MID_SENTINEL);
    frame.extend_from_slice(key);
    frame.extend_from_slice(END_SENTINEL);
    frame
}

/// Attempts to decode one transmission from the bytes accumulated so far.
///
/// Returns `Ok(None)` until the end sentinel has been observed — a single
/// receive is never assumed to deliver a whole frame, so callers append each
/// new chunk and call this again.
pub fn decode(accumulated: &[u8]) -> Result<Option<Transmission>, FrameError> {
    let Some(end) = find(accumulated, END_SENTINEL) else {
        return Ok(None);
    };

    if end < 2 {
        return Err(FrameError::MissingTag);
    }
    let body = &accumulated[2..end];
    let mid = find(body, MID_SENTINEL).ok_or(FrameError::MissingMid)?;

    Ok(Some(Transmission {
        role: Role::from_tag(&accumulated[..2]),
        text: body[..mid].to_vec(),
        key: body[mid + 2..].to_vec(),
    }))
}

/// First occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8; 2]) -> Option<usize> {
    haystack.windows(2).position(|window| window == needle)
}
