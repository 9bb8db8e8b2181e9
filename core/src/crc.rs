// MaxIO
// Copyright 2026 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! The 5-bit CRC that protects every frame.
//!
//! The checksum covers the top 19 bits of a frame (the control byte, the data byte and the three
//! high bits of the last byte).  The five checksum bits themselves are replaced by a fixed seed
//! before the computation, so they never influence the result.

use crate::frame::FRAME_LEN;
use crate::{Error, Result};
use std::convert::TryFrom;

/// Generator polynomial x^5 + x^4 + x^2 + 1.
const CRC_POLY: u32 = 0b11_0101;

/// Seed that takes the place of the checksum bits during the computation.
const CRC_INIT: u32 = 0b0_0111;

/// Number of feedback steps: one for the initial window plus one per remaining bit.
const CRC_LENGTH: u32 = 19;

/// Mask of the checksum bits within the last byte of a frame.
pub const CRC_MASK: u8 = 0x1f;

/// Applies the polynomial to a 6-bit `window` if its top bit is set.
fn feedback(window: u32) -> u32 {
    if window & 0x20 == 0x20 {
        window ^ CRC_POLY
    } else {
        window
    }
}

/// Computes the checksum of `frame`.
pub fn crc5_frame(frame: &[u8; FRAME_LEN]) -> u8 {
    let word = (u32::from(frame[0]) << 16)
        | (u32::from(frame[1]) << 8)
        | u32::from(frame[2] & !CRC_MASK)
        | CRC_INIT;

    // The first window is bits [23:18]; each later step shifts in one more bit, MSB first.
    let mut state = feedback(word >> 18);
    for bit in (0..CRC_LENGTH - 1).rev() {
        let window = ((state & 0x1f) << 1) | ((word >> bit) & 0x01);
        state = feedback(window);
    }

    (state & u32::from(CRC_MASK)) as u8
}

/// Computes the checksum of `data`, which must be exactly one frame long.
pub fn crc5(data: &[u8]) -> Result<u8> {
    let frame = <&[u8; FRAME_LEN]>::try_from(data)
        .map_err(|_| Error::InvalidInputLength(data.len()))?;
    Ok(crc5_frame(frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frames with checksums captured from real devices.
    const KNOWN_VECTORS: &[([u8; 3], u8)] = &[
        ([0xa6, 0x00, 0x00], 0x02),
        ([0xff, 0x23, 0x00], 0x0c),
        ([0x01, 0x01, 0x00], 0x13),
        ([0x01, 0x00, 0x00], 0x05),
    ];

    #[test]
    fn test_known_vectors() {
        for (input, exp_crc) in KNOWN_VECTORS {
            assert_eq!(*exp_crc, crc5(input).unwrap(), "Bad CRC for {:02x?}", input);
            assert_eq!(*exp_crc, crc5_frame(input), "Bad CRC for {:02x?}", input);
        }
    }

    #[test]
    fn test_deterministic() {
        for (input, _) in KNOWN_VECTORS {
            let first = crc5_frame(input);
            for _ in 0..10 {
                assert_eq!(first, crc5_frame(input));
            }
        }
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(0x07, crc5_frame(&[0x00, 0x00, 0x00]));
        assert_eq!(0x03, crc5_frame(&[0xff, 0xff, 0xe0]));
    }

    #[test]
    fn test_checksum_bits_are_ignored() {
        for low in 0..=CRC_MASK {
            assert_eq!(0x02, crc5_frame(&[0xa6, 0x00, low]));
            assert_eq!(0x03, crc5_frame(&[0xff, 0xff, 0xe0 | low]));
        }
    }

    #[test]
    fn test_single_bit_flips_change_checksum() {
        for (input, exp_crc) in KNOWN_VECTORS {
            let word = u32::from(input[0]) << 16 | u32::from(input[1]) << 8 | u32::from(input[2]);
            for bit in 5..24 {
                let flipped = word ^ (1 << bit);
                let flipped = [(flipped >> 16) as u8, (flipped >> 8) as u8, flipped as u8];
                assert_ne!(
                    *exp_crc,
                    crc5_frame(&flipped),
                    "Flipping bit {} of {:02x?} went unnoticed",
                    bit,
                    input
                );
            }
        }
    }

    #[test]
    fn test_invalid_length() {
        for data in [&[0u8; 0][..], &[0x01][..], &[0x01, 0x00][..], &[0x01, 0x00, 0x00, 0x00][..]] {
            match crc5(data) {
                Err(Error::InvalidInputLength(n)) => assert_eq!(data.len(), n),
                r => panic!("Unexpected result {:?} for {:02x?}", r, data),
            }
        }
    }
}
