//! TIFF PackBits run-length codec.
//!
//! Each packet starts with a signed header byte `n`:
//!
//! | Header        | Meaning                                  |
//! |---------------|------------------------------------------|
//! | `0..=127`     | `n + 1` literal bytes follow             |
//! | `-127..=-1`   | next byte repeated `1 - n` times         |
//! | `-128`        | no-op                                    |

use crate::error::LabelError;

/// Longest literal or repeat packet.
const MAX_PACKET: usize = 128;

/// Shortest run worth a repeat packet.
const MIN_REPEAT: usize = 3;

/// Compress `data`.
///
/// ```
/// use labelstrip::raster::packbits;
///
/// assert_eq!(packbits::encode(&[0, 0, 0, 0]), vec![0xFD, 0x00]);
/// assert_eq!(packbits::encode(&[1, 2]), vec![0x01, 1, 2]);
/// ```
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / MAX_PACKET + 1);
    let mut i = 0;

    while i < data.len() {
        let run = run_length(&data[i..]);
        if run >= MIN_REPEAT {
            out.push((257 - run) as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        while i < data.len() && i - start < MAX_PACKET && run_length(&data[i..]) < MIN_REPEAT {
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&data[start..i]);
    }

    out
}

/// Expand PackBits `data`. Fails if a packet runs past the end of input.
pub fn decode(data: &[u8]) -> Result<Vec<u8>, LabelError> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut i = 0;

    while i < data.len() {
        let header = data[i] as i8;
        i += 1;
        match header {
            0..=127 => {
                let count = header as usize + 1;
                let literal = data.get(i..i + count).ok_or_else(|| {
                    LabelError::Encode(format!(
                        "PackBits literal of {} bytes truncated at offset {}",
                        count,
                        i - 1
                    ))
                })?;
                out.extend_from_slice(literal);
                i += count;
            }
            -128 => {}
            _ => {
                let count = (1 - header as i16) as usize;
                let byte = *data.get(i).ok_or_else(|| {
                    LabelError::Encode(format!("PackBits repeat truncated at offset {}", i - 1))
                })?;
                out.resize(out.len() + count, byte);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Number of leading bytes equal to the first, capped at one packet.
fn run_length(data: &[u8]) -> usize {
    match data.first() {
        Some(&first) => data
            .iter()
            .take(MAX_PACKET)
            .take_while(|&&b| b == first)
            .count(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_apple_example() {
        // Example data from Apple's PackBits technical note
        let raw = [
            0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0xAA, 0xAA, 0xAA, 0xAA, 0x80, 0x00, 0x2A, 0x22,
            0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
        ];
        let packed = [
            0xFE, 0xAA, 0x02, 0x80, 0x00, 0x2A, 0xFD, 0xAA, 0x03, 0x80, 0x00, 0x2A, 0x22, 0xF7,
            0xAA,
        ];
        assert_eq!(encode(&raw), packed.to_vec());
        assert_eq!(decode(&packed).unwrap(), raw.to_vec());
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode(&[]), Vec::<u8>::new());
        assert_eq!(decode(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_blank_print_line() {
        // A blank 16-byte line compresses to a single repeat packet
        assert_eq!(encode(&[0u8; 16]), vec![0xF1, 0x00]);
    }

    #[test]
    fn test_long_runs_split_into_packets() {
        let raw = vec![7u8; 300];
        let packed = encode(&raw);
        assert_eq!(packed, vec![0x81, 7, 0x81, 7, 0xD5, 7]);
        assert_eq!(decode(&packed).unwrap(), raw);
    }

    #[test]
    fn test_long_literal_splits() {
        let raw: Vec<u8> = (0..200u32).map(|i| (i % 251) as u8).collect();
        let packed = encode(&raw);
        assert_eq!(packed[0], 127);
        assert_eq!(packed[129], 71);
        assert_eq!(decode(&packed).unwrap(), raw);
    }

    #[test]
    fn test_noop_header_is_skipped() {
        assert_eq!(decode(&[0x80, 0x00, 0x05]).unwrap(), vec![0x05]);
    }

    #[test]
    fn test_truncated_input() {
        assert!(matches!(decode(&[0x02, 0x01]), Err(LabelError::Encode(_))));
        assert!(matches!(decode(&[0xFE]), Err(LabelError::Encode(_))));
    }
}
