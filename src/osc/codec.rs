//! OSC message encoder / decoder.
//!
//! Every field is padded with NUL bytes to a 4-byte boundary; numeric
//! arguments are big-endian.  A packet without a type tag string is
//! accepted as a message with no arguments (pre-1.0 senders).

use super::{MAX_STRING_LEN, OscArg, OscError, OscMessage};

/// Bundle marker; always rejected.
const BUNDLE_TAG: &[u8] = b"#bundle";

/// Length of `len` bytes plus NUL, rounded up to a multiple of 4.
const fn padded_len(len: usize) -> usize {
    (len / 4 + 1) * 4
}

/// Write `s` NUL-terminated and padded at `out[pos..]`.  Returns the new offset.
fn put_str(out: &mut [u8], pos: usize, s: &[u8]) -> Result<usize, OscError> {
    let end = pos + padded_len(s.len());
    if end > out.len() {
        return Err(OscError::BufferTooSmall);
    }
    out[pos..pos + s.len()].copy_from_slice(s);
    out[pos + s.len()..end].fill(0);
    Ok(end)
}

fn put_word(out: &mut [u8], pos: usize, word: [u8; 4]) -> Result<usize, OscError> {
    let end = pos + 4;
    if end > out.len() {
        return Err(OscError::BufferTooSmall);
    }
    out[pos..end].copy_from_slice(&word);
    Ok(end)
}

/// Encode `msg` into `out`.  Returns the number of bytes written.
pub fn encode(msg: &OscMessage, out: &mut [u8]) -> Result<usize, OscError> {
    let mut pos = put_str(out, 0, msg.address().as_bytes())?;

    let mut tags: heapless::Vec<u8, { super::MAX_ARGS + 1 }> = heapless::Vec::new();
    // Capacity is MAX_ARGS + 1 and a message never holds more than MAX_ARGS.
    let _ = tags.push(b',');
    for arg in msg.args() {
        tags.push(arg.tag()).map_err(|_| OscError::TooManyArgs)?;
    }
    pos = put_str(out, pos, &tags)?;

    for arg in msg.args() {
        pos = match arg {
            OscArg::Int(v) => put_word(out, pos, v.to_be_bytes())?,
            OscArg::Float(v) => put_word(out, pos, v.to_bits().to_be_bytes())?,
            OscArg::Str(s) => put_str(out, pos, s.as_bytes())?,
        };
    }

    Ok(pos)
}

/// Read a padded string starting at `pos`.  Returns the bytes (without NUL)
/// and the offset just past the padding.
fn take_str(packet: &[u8], pos: usize) -> Result<(&[u8], usize), OscError> {
    let rest = packet.get(pos..).ok_or(OscError::Truncated)?;
    let nul = rest.iter().position(|&b| b == 0).ok_or(OscError::Truncated)?;
    let end = pos + padded_len(nul);
    if end > packet.len() {
        return Err(OscError::Truncated);
    }
    Ok((&rest[..nul], end))
}

fn take_word(packet: &[u8], pos: usize) -> Result<([u8; 4], usize), OscError> {
    let bytes = packet.get(pos..pos + 4).ok_or(OscError::Truncated)?;
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    Ok((word, pos + 4))
}

/// Decode one OSC message from a datagram.
pub fn decode(packet: &[u8]) -> Result<OscMessage, OscError> {
    if packet.is_empty() {
        return Err(OscError::Empty);
    }
    if packet.starts_with(BUNDLE_TAG) {
        return Err(OscError::Bundle);
    }

    let (addr, mut pos) = take_str(packet, 0).map_err(|e| match e {
        OscError::Truncated => OscError::BadAddress,
        other => other,
    })?;
    let addr = core::str::from_utf8(addr).map_err(|_| OscError::BadAddress)?;
    let mut msg = OscMessage::new(addr)?;

    if pos == packet.len() {
        return Ok(msg);
    }

    let (tags, next) = take_str(packet, pos)?;
    pos = next;
    let Some((&b',', tags)) = tags.split_first() else {
        return Err(OscError::BadTypeTag);
    };

    for &tag in tags {
        let arg = match tag {
            b'i' => {
                let (word, next) = take_word(packet, pos)?;
                pos = next;
                OscArg::Int(i32::from_be_bytes(word))
            }
            b'f' => {
                let (word, next) = take_word(packet, pos)?;
                pos = next;
                OscArg::Float(f32::from_bits(u32::from_be_bytes(word)))
            }
            b's' => {
                let (bytes, next) = take_str(packet, pos)?;
                pos = next;
                let s = core::str::from_utf8(bytes).map_err(|_| OscError::BadTypeTag)?;
                let mut owned = heapless::String::<MAX_STRING_LEN>::new();
                owned.push_str(s).map_err(|_| OscError::TooLong)?;
                OscArg::Str(owned)
            }
            other => return Err(OscError::UnsupportedTag(other)),
        };
        msg.push(arg)?;
    }

    Ok(msg)
}
