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

//! Error types for the frame protocol.

use std::io;

/// Errors raised while building, exchanging or checking frames.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The CRC input was not exactly one frame long.
    #[error("CRC input must be 3 bytes long but got {0}")]
    InvalidInputLength(usize),

    /// The register index is not part of the chip's register map or does not fit the frame.
    #[error("Invalid register index {0:#04x}")]
    InvalidRegister(u8),

    /// The chip address does not fit in the 2-bit address field.
    #[error("Invalid chip address {0}; must be between 0 and 3")]
    InvalidAddress(u8),

    /// The input channel number is out of range.
    #[error("Invalid input {0}; must be between 1 and 8")]
    InvalidInput(u8),

    /// The bus or a chip-select line failed.
    #[error("{0}")]
    Transport(#[from] io::Error),

    /// The checksum carried by a response does not match its contents.
    #[error("Checksum mismatch in response: computed {expected:#04x} but got {actual:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over the received frame.
        expected: u8,
        /// Checksum carried by the received frame.
        actual: u8,
    },
}

/// Result type for frame protocol operations.
pub type Result<T> = std::result::Result<T, Error>;
