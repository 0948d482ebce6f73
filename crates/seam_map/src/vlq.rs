//! Base64 variable-length quantity primitives.
//!
//! Each Base64 digit carries 5 data bits plus a continuation bit (`0x20`).
//! The lowest bit of the first digit of a value is its sign.

use crate::error::MapError;

const BASE64_CHARS: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const CONTINUATION_BIT: u8 = 0x20;
const DATA_MASK: u8 = 0x1f;

/// Decodes one Base64 digit into its 6-bit value.
fn decode_digit(byte: u8) -> Result<u8, MapError> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => {
            return Err(MapError::malformed(format!(
                "invalid base64 digit '{}'",
                byte.escape_ascii()
            )))
        }
    };
    Ok(value)
}

/// Decodes every VLQ value in `segment` into `out`.
///
/// `out` is cleared first so callers can reuse one buffer across segments.
pub fn decode_segment(segment: &str, out: &mut Vec<i64>) -> Result<(), MapError> {
    out.clear();
    let mut accum: u64 = 0;
    let mut shift: u32 = 0;
    let mut pending = false;

    for byte in segment.bytes() {
        let digit = decode_digit(byte)?;
        if shift > 30 {
            return Err(MapError::malformed(format!(
                "VLQ value in segment '{segment}' overflows 32 bits"
            )));
        }
        accum |= u64::from(digit & DATA_MASK) << shift;
        shift += 5;
        pending = digit & CONTINUATION_BIT != 0;

        if !pending {
            let magnitude = (accum >> 1) as i64;
            let value = if accum & 1 == 1 { -magnitude } else { magnitude };
            if value > i64::from(u32::MAX) || value < -i64::from(u32::MAX) {
                return Err(MapError::malformed(format!(
                    "VLQ value in segment '{segment}' overflows 32 bits"
                )));
            }
            out.push(value);
            accum = 0;
            shift = 0;
        }
    }

    if pending {
        return Err(MapError::malformed(format!(
            "unterminated VLQ continuation in segment '{segment}'"
        )));
    }
    Ok(())
}

/// Appends the VLQ encoding of `value` to `out`.
pub fn encode_vlq(value: i64, out: &mut String) {
    let mut rest = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (rest & u64::from(DATA_MASK)) as u8;
        rest >>= 5;
        if rest > 0 {
            digit |= CONTINUATION_BIT;
        }
        out.push(BASE64_CHARS[digit as usize] as char);
        if rest == 0 {
            break;
        }
    }
}
