/*!
 * Text decoding with an ordered encoding fallback chain
 */

use std::borrow::Cow;

use encoding_rs::WINDOWS_1250;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use crate::types::{DecodedFile, TextEncoding};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Byte values cp1250 leaves unassigned
const CP1250_UNDEFINED: [u8; 5] = [0x81, 0x83, 0x88, 0x90, 0x98];

impl TextEncoding {
    /// Strictly decode `bytes`, returning `None` if they are not valid in
    /// this encoding.
    pub fn decode<'a>(self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            // A leading BOM is kept as U+FEFF, so BOM files report `utf-8`
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(Cow::Borrowed),
            Self::Utf8Sig => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(Cow::Borrowed)
            }
            Self::Cp1250 => {
                if bytes.iter().any(|b| CP1250_UNDEFINED.contains(b)) {
                    return None;
                }
                WINDOWS_1250.decode_without_bom_handling_and_without_replacement(bytes)
            }
            Self::Latin1 => Some(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())),
        }
    }
}

/// Decode raw bytes using the first encoding that accepts them.
///
/// Never fails: `latin-1` accepts every byte sequence, and should the chain
/// somehow be exhausted the bytes are decoded lossily with replacement
/// characters.
pub fn decode_bytes(bytes: &[u8]) -> DecodedFile {
    for encoding in TextEncoding::iter() {
        if let Some(text) = encoding.decode(bytes) {
            if encoding.is_fallback() {
                warn!(encoding = %encoding, "content only decodes with the fallback encoding, likely binary");
            } else {
                debug!(encoding = %encoding, "decoded content");
            }
            return DecodedFile {
                text: text.into_owned(),
                encoding_used: encoding,
            };
        }
    }

    DecodedFile {
        text: String::from_utf8_lossy(bytes).into_owned(),
        encoding_used: TextEncoding::Latin1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8_wins_first() {
        let decoded = decode_bytes("print('héllo')\n".as_bytes());
        assert_eq!(decoded.encoding_used, TextEncoding::Utf8);
        assert_eq!(decoded.text, "print('héllo')\n");
    }

    #[test]
    fn bom_is_kept_by_plain_utf8() {
        let decoded = decode_bytes(b"\xEF\xBB\xBFx = 1");
        assert_eq!(decoded.encoding_used, TextEncoding::Utf8);
        assert_eq!(decoded.text, "\u{feff}x = 1");
    }

    #[test]
    fn utf8_sig_strips_bom() {
        let text = TextEncoding::Utf8Sig.decode(b"\xEF\xBB\xBF[x]\nk=1").unwrap();
        assert_eq!(text, "[x]\nk=1");
        assert!(TextEncoding::Utf8Sig.decode(b"\xEF\xBB\xBF\xFF").is_none());
    }

    #[test]
    fn central_european_bytes_use_cp1250() {
        // "Árvíztűrő" in cp1250
        let bytes = b"\xC1rv\xEDzt\xFBr\xF5";
        let decoded = decode_bytes(bytes);
        assert_eq!(decoded.encoding_used, TextEncoding::Cp1250);
        assert_eq!(decoded.text, "Árvíztűrő");
    }

    #[test]
    fn undefined_cp1250_bytes_fall_back_to_latin1() {
        let bytes = [0x00, 0x81, 0xFF, 0x98];
        let decoded = decode_bytes(&bytes);
        assert_eq!(decoded.encoding_used, TextEncoding::Latin1);
        assert!(decoded.encoding_used.is_fallback());
        assert_eq!(decoded.text, "\u{0}\u{81}\u{ff}\u{98}");
    }

    #[test]
    fn empty_input_is_utf8() {
        let decoded = decode_bytes(b"");
        assert_eq!(decoded.encoding_used, TextEncoding::Utf8);
        assert!(decoded.text.is_empty());
    }

    #[test]
    fn every_byte_value_decodes() {
        let all: Vec<u8> = (0..=255).collect();
        let decoded = decode_bytes(&all);
        assert_eq!(decoded.encoding_used, TextEncoding::Latin1);
        assert_eq!(decoded.text.chars().count(), 256);
    }
}
