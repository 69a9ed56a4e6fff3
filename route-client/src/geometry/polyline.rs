//! Encoded polyline codec.
//!
//! Routes arrive either as explicit coordinate arrays or as compact strings
//! using the delta + variable-length-integer encoding: each axis value is
//! scaled by a multiplier, delta-encoded against the previous point,
//! zig-zag mapped to unsigned, and written as base-32 groups of five bits
//! offset by 63 into the printable ASCII range. Elevation, when present,
//! is encoded with a fixed multiplier of 100.

use super::Position;

/// Error decoding an encoded polyline string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The string ended in the middle of a varint group.
    #[error("truncated polyline: varint not terminated before end of input")]
    Truncated,

    /// A character outside the printable encoding range was found.
    #[error("invalid polyline character {byte:#04x} at offset {offset}")]
    InvalidCharacter { byte: u8, offset: usize },

    /// A varint group ran past the width of the value type.
    #[error("overlong polyline varint at offset {offset}")]
    OverlongVarint { offset: usize },
}

/// Decode an encoded polyline into positions.
///
/// `multiplier` is the scale the coordinates were encoded with (typically
/// 1e5 or 1e6). With `is_3d` every point carries a third, elevation axis
/// encoded at a fixed multiplier of 100.
pub fn decode(encoded: &str, is_3d: bool, multiplier: f64) -> Result<Vec<Position>, CodecError> {
    let bytes = encoded.as_bytes();
    let mut idx = 0usize;
    let mut lat = 0i64;
    let mut lng = 0i64;
    let mut ele = 0i64;
    let mut out = Vec::new();

    while idx < bytes.len() {
        lat += read_varint(bytes, &mut idx)?;
        lng += read_varint(bytes, &mut idx)?;
        if is_3d {
            ele += read_varint(bytes, &mut idx)?;
            out.push(Position::with_ele(
                lng as f64 / multiplier,
                lat as f64 / multiplier,
                ele as f64 / 100.0,
            ));
        } else {
            out.push(Position::new(lng as f64 / multiplier, lat as f64 / multiplier));
        }
    }

    Ok(out)
}

/// Encode positions into a polyline string; the exact inverse of [`decode`].
///
/// Coordinates are rounded to `1/multiplier`, so a decode of the result
/// matches the input to that precision.
pub fn encode(points: &[Position], is_3d: bool, multiplier: f64) -> String {
    let mut out = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;
    let mut prev_ele = 0i64;

    for p in points {
        let lat = (p.lat * multiplier).round() as i64;
        let lng = (p.lng * multiplier).round() as i64;
        write_varint(lat - prev_lat, &mut out);
        write_varint(lng - prev_lng, &mut out);
        prev_lat = lat;
        prev_lng = lng;
        if is_3d {
            let ele = (p.ele * 100.0).round() as i64;
            write_varint(ele - prev_ele, &mut out);
            prev_ele = ele;
        }
    }

    out
}

/// Read one zig-zag varint starting at `*idx`, advancing it past the group.
fn read_varint(bytes: &[u8], idx: &mut usize) -> Result<i64, CodecError> {
    let mut shift = 0u32;
    let mut value = 0i64;

    loop {
        let Some(&raw) = bytes.get(*idx) else {
            return Err(CodecError::Truncated);
        };
        if !(63..=126).contains(&raw) {
            return Err(CodecError::InvalidCharacter {
                byte: raw,
                offset: *idx,
            });
        }
        if shift >= 64 {
            // More continuation groups than an i64 can hold.
            return Err(CodecError::OverlongVarint { offset: *idx });
        }
        *idx += 1;
        let byte = (raw - 63) as i64;
        value |= (byte & 0x1f) << shift;
        shift += 5;
        if byte < 0x20 {
            break;
        }
    }

    // Zig-zag: the low bit carries the sign.
    Ok(if value & 1 != 0 { !(value >> 1) } else { value >> 1 })
}

fn write_varint(value: i64, out: &mut String) {
    let mut v = if value < 0 { !(value << 1) } else { value << 1 } as u64;
    while v >= 0x20 {
        out.push(((0x20 | (v & 0x1f)) as u8 + 63) as char);
        v >>= 5;
    }
    out.push((v as u8 + 63) as char);
}

#[cfg(test)]
mod tests {
    use super::*;

    // The canonical example from the polyline format documentation.
    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn decode_reference_vector() {
        let points = decode(REFERENCE, false, 1e5).unwrap();
        assert_eq!(points.len(), 3);
        assert!((points[0].lat - 38.5).abs() < 1e-9);
        assert!((points[0].lng - -120.2).abs() < 1e-9);
        assert!((points[1].lat - 40.7).abs() < 1e-9);
        assert!((points[1].lng - -120.95).abs() < 1e-9);
        assert!((points[2].lat - 43.252).abs() < 1e-9);
        assert!((points[2].lng - -126.453).abs() < 1e-9);
    }

    #[test]
    fn encode_reference_vector() {
        let points = vec![
            Position::new(-120.2, 38.5),
            Position::new(-120.95, 40.7),
            Position::new(-126.453, 43.252),
        ];
        assert_eq!(encode(&points, false, 1e5), REFERENCE);
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        assert_eq!(decode("", false, 1e5).unwrap(), Vec::new());
    }

    #[test]
    fn truncated_input_is_an_error() {
        // '_' has the continuation bit set, so the stream must not end there.
        assert_eq!(decode("_", false, 1e5), Err(CodecError::Truncated));
    }

    #[test]
    fn invalid_character_is_an_error() {
        let err = decode("_p~iF\n", false, 1e5).unwrap_err();
        assert!(matches!(err, CodecError::InvalidCharacter { byte: b'\n', .. }));
    }

    #[test]
    fn overlong_varint_is_an_error() {
        // More continuation groups than fit in 64 bits must not overflow.
        let overlong: String = "a".repeat(13) + "A";
        let err = decode(&overlong, false, 1e5).unwrap_err();
        assert!(matches!(err, CodecError::OverlongVarint { offset: 13 }));
    }

    #[test]
    fn elevation_roundtrip() {
        let points = vec![
            Position::with_ele(13.4049, 52.52, 34.0),
            Position::with_ele(13.4105, 52.5223, 36.5),
        ];
        let encoded = encode(&points, true, 1e5);
        let decoded = decode(&encoded, true, 1e5).unwrap();
        assert_eq!(decoded.len(), 2);
        for (a, b) in points.iter().zip(&decoded) {
            assert!((a.lat - b.lat).abs() < 1e-5);
            assert!((a.lng - b.lng).abs() < 1e-5);
            assert!((a.ele - b.ele).abs() < 1e-2);
        }
    }

    #[test]
    fn negative_deltas_roundtrip() {
        let points = vec![
            Position::new(10.0, -5.0),
            Position::new(9.99, -5.01),
            Position::new(-170.5, 80.0),
        ];
        let decoded = decode(&encode(&points, false, 1e5), false, 1e5).unwrap();
        for (a, b) in points.iter().zip(&decoded) {
            assert!((a.lat - b.lat).abs() < 1e-5);
            assert!((a.lng - b.lng).abs() < 1e-5);
        }
    }
}
