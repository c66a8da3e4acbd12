//! Short code detection and generation, plus base64 entity id decoding.
//!
//! Share links take one of two forms:
//! - a 6-character alphanumeric short code stored in the `short_urls` table
//! - the entity UUID, URL-safe base64 encoded
//!
//! A segment that looks like a short code is always a short code, even when
//! it would also decode as base64.

use std::sync::LazyLock;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use rand::Rng;
use regex::Regex;
use uuid::Uuid;

/// Length of a generated short code.
pub const SHORT_CODE_LEN: usize = 6;

/// Characters a short code is drawn from.
const SHORT_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

static SHORT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{6}$").expect("static short code regex"));

/// URL-safe base64 that accepts both padded and unpadded input.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Returns true if the segment is exactly 6 ASCII letters or digits.
pub fn is_short_code(segment: &str) -> bool {
    SHORT_CODE_RE.is_match(segment)
}

/// Decode a URL-safe base64 segment into an entity UUID.
///
/// Returns `None` for anything that is not valid base64, not UTF-8, or does
/// not spell a UUID once decoded.
pub fn decode_entity_id(segment: &str) -> Option<Uuid> {
    let bytes = URL_SAFE_LENIENT.decode(segment.trim()).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    Uuid::parse_str(text.trim()).ok()
}

/// Encode an entity UUID the way share links carry it.
pub fn encode_entity_id(id: &Uuid) -> String {
    URL_SAFE_LENIENT.encode(id.hyphenated().to_string())
}

/// Generate a random short code.
pub fn generate_short_code<R: Rng>(rng: &mut R) -> String {
    (0..SHORT_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SHORT_CODE_ALPHABET.len());
            SHORT_CODE_ALPHABET[idx] as char
        })
        .collect()
}
