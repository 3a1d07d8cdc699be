//! Share-state binary codec
//!
//! An arrangement is packed into 5 bytes per placement and framed as
//! unpadded base64url so it fits in a URL query parameter:
//!
//! | Bytes | Field |
//! |-------|-------|
//! | 0-1 | magnet index, big-endian `u16` |
//! | 2 | x, rounded and clamped to 0..=255 |
//! | 3 | y, rounded and clamped to 0..=255 |
//! | 4 | scale, quantized over the [`ScaleRange`] |
//!
//! Magnets are addressed by library position, so reordering the library
//! breaks links created before the reorder. Scale is lossy to one
//! quantization step but stable: decoding and re-encoding reproduces the
//! same bytes.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use thiserror::Error;

use crate::error::{Warning, WarningKind};
use crate::geometry::{round_half_up, ScaleRange};
use crate::models::Placement;

/// Bytes per packed placement.
pub const RECORD_BYTES: usize = 5;

/// Largest magnet index the format can address.
pub const MAX_MAGNET_INDEX: usize = u16::MAX as usize;

/// Query parameter carrying the share string.
pub const SHARE_PARAM: &str = "s";

/// URL-safe alphabet, no padding on encode, padding optional on decode.
const SHARE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Error type for share encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    /// The index does not fit in the 16-bit field
    #[error("placement {position} references magnet {index}, share links address at most 65535")]
    MagnetIndexOutOfRange { position: usize, index: usize },
}

/// Result of decoding a share string.
#[derive(Debug, Clone, Default)]
pub struct ShareDecode {
    pub placements: Vec<Placement>,
    pub warnings: Vec<Warning>,
}

fn position_byte(value: f64) -> u8 {
    // NaN clamps to 0
    round_half_up(value).max(0.0).min(255.0) as u8
}

/// Pack placements into the binary record format.
///
/// Fails rather than truncating when a magnet index does not fit in 16
/// bits, since a truncated index would point at a different magnet.
pub fn encode_bytes(placements: &[Placement], range: &ScaleRange) -> Result<Vec<u8>, ShareError> {
    let mut bytes = Vec::with_capacity(placements.len() * RECORD_BYTES);
    for (position, placement) in placements.iter().enumerate() {
        let index = u16::try_from(placement.magnet_index).map_err(|_| {
            ShareError::MagnetIndexOutOfRange { position, index: placement.magnet_index }
        })?;
        bytes.extend_from_slice(&index.to_be_bytes());
        bytes.push(position_byte(placement.x));
        bytes.push(position_byte(placement.y));
        bytes.push(range.quantize(placement.scale));
    }
    Ok(bytes)
}

/// Unpack binary records. A trailing partial record is dropped with a warning.
pub fn decode_bytes(bytes: &[u8], range: &ScaleRange) -> ShareDecode {
    let records = bytes.chunks_exact(RECORD_BYTES);
    let remainder = records.remainder().len();

    let mut result = ShareDecode {
        placements: records
            .map(|r| Placement {
                magnet_index: u16::from_be_bytes([r[0], r[1]]) as usize,
                x: r[2] as f64,
                y: r[3] as f64,
                scale: range.dequantize(r[4]),
            })
            .collect(),
        warnings: Vec::new(),
    };

    if remainder > 0 {
        result.warnings.push(Warning::new(
            WarningKind::MalformedShareText,
            format!("dropped {} trailing bytes of an incomplete record", remainder),
        ));
    }
    result
}

/// Encode placements as a base64url share string.
///
/// An empty arrangement encodes to the empty string.
///
/// # Examples
///
/// ```
/// use fridge::geometry::ScaleRange;
/// use fridge::models::Placement;
/// use fridge::share::{decode_share, encode_share};
///
/// let range = ScaleRange::default();
/// let placements = [Placement { magnet_index: 5, x: 100.0, y: 200.0, scale: 1.0 }];
/// let encoded = encode_share(&placements, &range).unwrap();
/// assert_eq!(encoded, "AAVkyDM");
///
/// let decoded = decode_share(&encoded, &range);
/// assert_eq!(decoded[0].magnet_index, 5);
/// assert_eq!((decoded[0].x, decoded[0].y), (100.0, 200.0));
/// ```
pub fn encode_share(placements: &[Placement], range: &ScaleRange) -> Result<String, ShareError> {
    let bytes = encode_bytes(placements, range)?;
    Ok(SHARE_ENGINE.encode(bytes))
}

/// Decode a share string, collecting warnings.
///
/// Never fails: text that is not valid base64 decodes to no placements, and
/// a trailing partial record is dropped. Standard-alphabet `+` and `/` are
/// accepted as well as their URL-safe replacements.
pub fn parse_share(text: &str, range: &ScaleRange) -> ShareDecode {
    let normalized: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    match SHARE_ENGINE.decode(normalized.as_bytes()) {
        Ok(bytes) => decode_bytes(&bytes, range),
        Err(e) => ShareDecode {
            placements: Vec::new(),
            warnings: vec![Warning::new(
                WarningKind::MalformedShareText,
                format!("share text is not valid base64url: {}", e),
            )],
        },
    }
}

/// Decode a share string, logging and dropping warnings.
pub fn decode_share(text: &str, range: &ScaleRange) -> Vec<Placement> {
    let decoded = parse_share(text, range);
    for warning in &decoded.warnings {
        warning.log();
    }
    decoded.placements
}

/// Build a share URL: `{base_url}/share?s={encoded}`.
///
/// An empty arrangement yields `base_url` unchanged, since there is nothing to share.
pub fn share_url(
    base_url: &str,
    placements: &[Placement],
    range: &ScaleRange,
) -> Result<String, ShareError> {
    if placements.is_empty() {
        return Ok(base_url.to_string());
    }
    let encoded = encode_share(placements, range)?;
    Ok(format!("{}/share?{}={}", base_url.trim_end_matches('/'), SHARE_PARAM, encoded))
}

/// Extract the share string from a URL's query, if present.
pub fn share_param(url: &str) -> Option<&str> {
    let query = url.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| match pair.split_once('=') {
        Some((key, value)) if key == SHARE_PARAM => Some(value),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(magnet_index: usize, x: f64, y: f64, scale: f64) -> Placement {
        Placement { magnet_index, x, y, scale }
    }

    #[test]
    fn test_encode_bytes_layout() {
        let bytes = encode_bytes(&[place(5, 100.0, 200.0, 1.0)], &ScaleRange::default()).unwrap();
        assert_eq!(bytes, vec![0x00, 0x05, 0x64, 0xC8, 51]);
    }

    #[test]
    fn test_scale_round_trip_within_one_step() {
        let range = ScaleRange::default();
        let steps = 1000;
        for i in 0..=steps {
            let scale = range.min + (range.max - range.min) * i as f64 / steps as f64;
            let encoded = encode_share(&[place(0, 10.0, 10.0, scale)], &range).unwrap();
            let decoded = decode_share(&encoded, &range);
            let error = (decoded[0].scale - scale).abs();
            assert!(
                error <= range.resolution(),
                "scale {} decoded as {} (error {})",
                scale,
                decoded[0].scale,
                error
            );
        }
    }

    #[test]
    fn test_encode_bytes_big_endian_index() {
        let bytes = encode_bytes(&[place(0x1234, 0.0, 0.0, 0.25)], &ScaleRange::default()).unwrap();
        assert_eq!(&bytes[..2], &[0x12, 0x34]);
        assert_eq!(bytes[4], 0);
    }

    #[test]
    fn test_encode_rounds_and_clamps_position() {
        let bytes =
            encode_bytes(&[place(0, 255.6, -3.0, 4.0), place(0, 10.5, 10.4, 100.0)], &ScaleRange::default())
                .unwrap();
        assert_eq!(&bytes[2..5], &[255, 0, 255]);
        assert_eq!(&bytes[7..10], &[11, 10, 255]);
    }

    #[test]
    fn test_encode_rejects_wide_index() {
        let err = encode_bytes(&[place(0, 0.0, 0.0, 1.0), place(65536, 0.0, 0.0, 1.0)], &ScaleRange::default())
            .unwrap_err();
        assert_eq!(err, ShareError::MagnetIndexOutOfRange { position: 1, index: 65536 });
        assert!(encode_bytes(&[place(MAX_MAGNET_INDEX, 0.0, 0.0, 1.0)], &ScaleRange::default()).is_ok());
    }

    #[test]
    fn test_empty_round_trip() {
        let range = ScaleRange::default();
        assert_eq!(encode_share(&[], &range).unwrap(), "");
        let decoded = parse_share("", &range);
        assert!(decoded.placements.is_empty());
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn test_encoding_is_url_safe() {
        // 0xfb 0xff encodes to "-_" territory in base64url
        let range = ScaleRange::default();
        let encoded = encode_share(&[place(0xfbff, 255.0, 255.0, 4.0)], &range).unwrap();
        assert!(!encoded.contains('+') && !encoded.contains('/') && !encoded.contains('='));
        assert_eq!(decode_share(&encoded, &range)[0].magnet_index, 0xfbff);
    }

    #[test]
    fn test_decode_accepts_padding_and_standard_alphabet() {
        let range = ScaleRange::default();
        let encoded = encode_share(&[place(0xfbff, 1.0, 2.0, 1.0)], &range).unwrap();
        let standard = encoded.replace('-', "+").replace('_', "/") + "=";
        assert_eq!(decode_share(&standard, &range), decode_share(&encoded, &range));
    }

    #[test]
    fn test_decode_drops_partial_record() {
        let range = ScaleRange::default();
        let bytes = [0u8, 1, 2, 3, 4, 0, 2];
        let decoded = decode_bytes(&bytes, &range);
        assert_eq!(decoded.placements.len(), 1);
        assert_eq!(decoded.placements[0].magnet_index, 1);
        assert_eq!(decoded.warnings[0].kind, WarningKind::MalformedShareText);
    }

    #[test]
    fn test_decode_garbage_yields_empty() {
        let range = ScaleRange::default();
        for text in ["!!!!", "a", "AAVky*M"] {
            let decoded = parse_share(text, &range);
            assert!(decoded.placements.is_empty(), "{} should decode to nothing", text);
            assert_eq!(decoded.warnings[0].kind, WarningKind::MalformedShareText);
        }
    }

    #[test]
    fn test_reencode_is_stable() {
        let range = ScaleRange::default();
        let placements = [place(3, 12.0, 240.0, 1.37), place(700, 0.0, 255.0, 0.26)];
        let first = decode_share(&encode_share(&placements, &range).unwrap(), &range);
        let bytes = encode_bytes(&first, &range).unwrap();
        let second = decode_bytes(&bytes, &range).placements;
        assert_eq!(first, second);
        assert_eq!(encode_bytes(&second, &range).unwrap(), bytes);
    }

    #[test]
    fn test_share_url() {
        let range = ScaleRange::default();
        assert_eq!(share_url("https://fridge.example", &[], &range).unwrap(), "https://fridge.example");
        let url = share_url("https://fridge.example/", &[place(5, 100.0, 200.0, 1.0)], &range).unwrap();
        assert_eq!(url, "https://fridge.example/share?s=AAVkyDM");
        assert_eq!(share_param(&url), Some("AAVkyDM"));
    }

    #[test]
    fn test_share_param() {
        assert_eq!(share_param("https://x/share?a=1&s=abc#frag"), Some("abc"));
        assert_eq!(share_param("https://x/share?a=1"), None);
        assert_eq!(share_param("https://x/share"), None);
    }
}
