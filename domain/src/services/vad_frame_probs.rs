// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Binary codec for VAD per-frame speech probabilities, grounded on
//! `utils/vad_frame_probs_io.py`. Format (little-endian):
//! `magic: [u8; 8]`, `frame_hop_s: f64`, `count: u32`, `values: [f32; count]`.

const MAGIC: &[u8; 8] = b"SFVADP1\0";
const HEADER_LEN: usize = 8 + 8 + 4;

pub fn encode_vad_frame_probs(probs: &[f32], frame_hop_s: f64) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + probs.len() * 4);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&frame_hop_s.to_le_bytes());
    out.extend_from_slice(&(probs.len() as u32).to_le_bytes());
    for value in probs {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Decodes a payload encoded by [`encode_vad_frame_probs`]. Returns an empty
/// result (not an error) on a too-short buffer or mismatched magic, matching
/// the original's best-effort decode.
pub fn decode_vad_frame_probs(data: &[u8]) -> (Vec<f32>, f64) {
    if data.len() < HEADER_LEN {
        return (Vec::new(), 0.0);
    }
    if &data[0..8] != MAGIC {
        return (Vec::new(), 0.0);
    }
    let hop = f64::from_le_bytes(data[8..16].try_into().expect("8-byte slice"));
    let count = u32::from_le_bytes(data[16..20].try_into().expect("4-byte slice")) as usize;

    let values = &data[HEADER_LEN..];
    let mut out: Vec<f32> = values
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().expect("4-byte slice")))
        .collect();
    if count < out.len() {
        out.truncate(count);
    }
    (out, hop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_encode_decode() {
        let probs = vec![0.0_f32, 0.25, 0.5, 0.75, 1.0];
        let encoded = encode_vad_frame_probs(&probs, 0.01);
        let (decoded, hop) = decode_vad_frame_probs(&encoded);
        assert_eq!(decoded, probs);
        assert!((hop - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn decode_rejects_short_buffer() {
        let (decoded, hop) = decode_vad_frame_probs(&[1, 2, 3]);
        assert!(decoded.is_empty());
        assert_eq!(hop, 0.0);
    }

    #[test]
    fn decode_rejects_bad_magic() {
        let mut bytes = encode_vad_frame_probs(&[0.1], 0.02);
        bytes[0] = b'X';
        let (decoded, _) = decode_vad_frame_probs(&bytes);
        assert!(decoded.is_empty());
    }

    #[test]
    fn encode_empty_probs_produces_header_only() {
        let encoded = encode_vad_frame_probs(&[], 0.02);
        assert_eq!(encoded.len(), HEADER_LEN);
        let (decoded, _) = decode_vad_frame_probs(&encoded);
        assert!(decoded.is_empty());
    }
}
