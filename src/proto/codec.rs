//! Frame codec
//!
//! Byte-level framing: header interpretation, length inference, checksum
//! verification, and serialization. The decoder is incremental so the
//! port reader can issue byte-exact UART reads: feed what has arrived,
//! and [`Decoded::NeedMore`] says how many bytes to request next (always
//! 1 for the header, then the remainder of the frame in one read).

use crate::error::{ProtocolError, ProtocolResult};
use crate::proto::msg::{Frame, FrameKind, Payload, info, sys};

/// Outcome of a decode attempt over the bytes received so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// One complete, verified frame.
    Frame(Frame),
    /// The buffer holds a frame prefix; this many bytes are still missing.
    NeedMore(usize),
}

/// Frame checksum: XOR of all frame bytes except the checksum itself,
/// XORed with `0xFF`.
#[must_use]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0xFF, |acc, b| acc ^ b)
}

/// Total encoded length (checksum included) implied by a header byte.
///
/// # Errors
///
/// `BadSysFrame` for a SYS header other than SYNC/NACK/ACK, `BadLength`
/// for a size field beyond 32 bytes.
pub const fn frame_len(header: u8) -> ProtocolResult<usize> {
    match FrameKind::from_header(header) {
        FrameKind::Sys => match header {
            sys::SYNC | sys::NACK | sys::ACK => Ok(1),
            _ => Err(ProtocolError::BadSysFrame),
        },
        kind => {
            let size_exp = (header >> 3) & 0x07;
            if size_exp > 5 {
                return Err(ProtocolError::BadLength);
            }
            let payload = 1 << size_exp;
            let sub = matches!(kind, FrameKind::Info) as usize;
            // header + sub-kind + payload + checksum
            Ok(1 + sub + payload + 1)
        }
    }
}

/// Decode one frame from the start of `bytes`.
///
/// Returns [`Decoded::NeedMore`] while the frame is incomplete. A
/// returned frame always consumed exactly [`frame_len`] bytes; the caller
/// owns buffer management and reads byte-exact, so trailing bytes never
/// occur in practice.
///
/// # Errors
///
/// Any [`ProtocolError`] marks the buffer as garbage; the caller must
/// discard it and resynchronize on the next header.
pub fn decode(bytes: &[u8]) -> ProtocolResult<Decoded> {
    let Some(&header) = bytes.first() else {
        return Ok(Decoded::NeedMore(1));
    };

    let total = frame_len(header)?;
    if bytes.len() < total {
        return Ok(Decoded::NeedMore(total - bytes.len()));
    }
    let bytes = &bytes[..total];

    let kind = FrameKind::from_header(header);
    if kind == FrameKind::Sys {
        return Ok(Decoded::Frame(Frame {
            kind,
            op: header,
            mode: 0,
            payload: Payload::new(),
        }));
    }

    let expected = checksum(&bytes[..total - 1]);
    if bytes[total - 1] != expected {
        return Err(ProtocolError::BadChecksum);
    }

    let frame = match kind {
        // handled above
        FrameKind::Sys => unreachable!(),
        FrameKind::Cmd => Frame {
            kind,
            op: header & 0x07,
            mode: 0,
            payload: payload_of(&bytes[1..total - 1]),
        },
        FrameKind::Info => {
            let sub = bytes[1];
            let mode_ext = if sub & info::MODE_PLUS_8 != 0 { 8 } else { 0 };
            Frame {
                kind,
                op: sub & !info::MODE_PLUS_8,
                mode: (header & 0x07) | mode_ext,
                payload: payload_of(&bytes[2..total - 1]),
            }
        }
        FrameKind::Data => Frame {
            kind,
            op: 0,
            mode: header & 0x07,
            payload: payload_of(&bytes[1..total - 1]),
        },
    };

    Ok(Decoded::Frame(frame))
}

/// Serialize `frame` into `out`, returning the number of bytes written.
///
/// # Errors
///
/// `BadLength` when the stored payload length is not a frame payload
/// size or `out` is too small for the encoding.
pub fn encode(frame: &Frame, out: &mut [u8]) -> ProtocolResult<usize> {
    let header = frame.header()?;
    let total = frame_len(header)?;
    if out.len() < total {
        return Err(ProtocolError::BadLength);
    }

    out[0] = header;
    if total == 1 {
        return Ok(1);
    }

    let mut at = 1;
    if frame.kind == FrameKind::Info {
        let ext = if frame.mode >= 8 { info::MODE_PLUS_8 } else { 0 };
        out[at] = frame.op | ext;
        at += 1;
    }
    out[at..at + frame.payload.len()].copy_from_slice(&frame.payload);
    at += frame.payload.len();
    out[at] = checksum(&out[..at]);

    Ok(at + 1)
}

fn payload_of(bytes: &[u8]) -> Payload {
    let mut payload = Payload::new();
    // length bounded by frame_len, always <= 32
    let _ = payload.extend_from_slice(bytes);
    payload
}
