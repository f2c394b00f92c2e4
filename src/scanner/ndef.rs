//! NDEF Text record payload decoding.
//!
//! Layout of a Text record payload:
//!
//! ```text
//! [status][language code: n bytes][text]
//!  bit 7     = text is UTF-16 (else UTF-8)
//!  bit 6     = reserved
//!  bits 0..5 = n
//! ```
//!
//! UTF-16 text may start with a byte order mark; without one it is big-endian.

use super::ScanError;

const UTF16_FLAG: u8 = 0x80;
const LANG_LEN_MASK: u8 = 0x3F;

/// Extracts the text from an NDEF Text record payload.
pub fn decode_ndef_text(payload: &[u8]) -> Result<String, ScanError> {
    let Some((&status, rest)) = payload.split_first() else {
        return Err(ScanError::Empty);
    };
    let lang_len = usize::from(status & LANG_LEN_MASK);
    if rest.len() < lang_len {
        return Err(ScanError::Truncated {
            needed: 1 + lang_len,
            actual: payload.len(),
        });
    }
    let text = &rest[lang_len..];

    if status & UTF16_FLAG == 0 {
        String::from_utf8(text.to_vec()).map_err(|_| ScanError::Encoding("UTF-8"))
    } else {
        decode_utf16(text)
    }
}

fn decode_utf16(bytes: &[u8]) -> Result<String, ScanError> {
    if bytes.len() % 2 != 0 {
        return Err(ScanError::Encoding("UTF-16"));
    }
    let (little_endian, body) = match bytes {
        [0xFF, 0xFE, body @ ..] => (true, body),
        [0xFE, 0xFF, body @ ..] => (false, body),
        _ => (false, bytes),
    };
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            let pair = [pair[0], pair[1]];
            if little_endian {
                u16::from_le_bytes(pair)
            } else {
                u16::from_be_bytes(pair)
            }
        })
        .collect();
    String::from_utf16(&units).map_err(|_| ScanError::Encoding("UTF-16"))
}
