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

//! Command and response frames.
//!
//! All frames are 3 bytes long and are shifted out MSB first:
//!
//! | Byte | Bits  | Command                     | Response                    |
//! |------|-------|-----------------------------|-----------------------------|
//! | 0    | 7..0  | Control byte (see `Layout`) | Device status               |
//! | 1    | 7..0  | Data to write (0 for reads) | Register contents           |
//! | 2    | 7..5  | Zero                        | Device flags                |
//! | 2    | 4..0  | CRC-5 of bits 23..5         | CRC-5 of bits 23..5         |

use crate::crc::{crc5_frame, CRC_MASK};
use crate::{Error, Result};
use std::convert::TryFrom;
use std::fmt;

/// Length of every frame in bytes.
pub const FRAME_LEN: usize = 3;

/// A raw frame as exchanged on the bus.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Frame(pub [u8; FRAME_LEN]);

impl Frame {
    /// Returns the first byte of the frame.
    pub fn control(&self) -> u8 {
        self.0[0]
    }

    /// Returns the data byte of the frame.
    pub fn data(&self) -> u8 {
        self.0[1]
    }

    /// Returns the 3 bits that precede the checksum in the last byte.
    pub fn flags(&self) -> u8 {
        self.0[2] >> 5
    }

    /// Returns the checksum carried by the frame.
    pub fn checksum(&self) -> u8 {
        self.0[2] & CRC_MASK
    }

    /// Recomputes the checksum bits from the rest of the frame.
    pub fn seal(mut self) -> Self {
        self.0[2] = (self.0[2] & !CRC_MASK) | crc5_frame(&self.0);
        self
    }

    /// Returns true if the checksum carried by the frame matches its contents.
    pub fn is_sealed(&self) -> bool {
        self.checksum() == crc5_frame(&self.0)
    }

    /// Returns the frame as a byte slice suitable for the bus.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; FRAME_LEN]> for Frame {
    fn from(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        match <[u8; FRAME_LEN]>::try_from(bytes) {
            Ok(bytes) => Ok(Self(bytes)),
            Err(_) => Err(Error::InvalidInputLength(bytes.len())),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x} {:02x} {:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// Direction of a register operation.
///
/// The encoding is the same for both chip families, so the bit can be used as-is in the control
/// byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Reads the register.
    Read = 0,

    /// Writes the register.
    Write = 1,
}

impl Direction {
    /// Returns the value of the direction bit.
    fn bit(self) -> u8 {
        self as u8
    }
}

/// Address of an output driver selected by its A0/A1 pins.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ChipAddress(u8);

impl ChipAddress {
    /// Largest address that fits in the 2-bit address field.
    pub const MAX: u8 = 0b11;

    /// Creates a new chip address, which must be in the `0..=MAX` range.
    pub fn new(address: u8) -> Result<Self> {
        if address > Self::MAX {
            return Err(Error::InvalidAddress(address));
        }
        Ok(Self(address))
    }

    /// Returns the numeric address.
    pub fn value(self) -> u8 {
        self.0
    }
}

/// A single register operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Command {
    /// Index of the register to access.
    pub register: u8,

    /// Whether to read or write the register.
    pub direction: Direction,

    /// Value to write.  Ignored for reads.
    pub data: u8,
}

impl Command {
    /// Creates a command that reads `register`.
    pub fn read(register: u8) -> Self {
        Self { register, direction: Direction::Read, data: 0 }
    }

    /// Creates a command that writes `data` into `register`.
    pub fn write(register: u8, data: u8) -> Self {
        Self { register, direction: Direction::Write, data }
    }
}

/// Layout of the control byte, which differs across chip families.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Layout {
    /// Output drivers (MAX14915): `AA0RRRRD`, where `AA` is the chip address, `RRRR` the register
    /// index and `D` the direction.
    OutputDriver(ChipAddress),

    /// Input receivers (MAX22190): `DRRRRRRR`, where `D` is the direction and `RRRRRRR` the
    /// register index.
    InputReceiver,
}

impl Layout {
    /// Returns the largest register index that fits in the control byte.
    pub fn max_register(self) -> u8 {
        match self {
            Layout::OutputDriver(_) => 0x0f,
            Layout::InputReceiver => 0x7f,
        }
    }

    /// Computes the control byte to access `register` in the given `direction`.
    pub fn control_byte(self, register: u8, direction: Direction) -> Result<u8> {
        if register > self.max_register() {
            return Err(Error::InvalidRegister(register));
        }
        let control = match self {
            Layout::OutputDriver(address) => {
                (address.value() << 6) | (register << 1) | direction.bit()
            }
            Layout::InputReceiver => register | (direction.bit() << 7),
        };
        Ok(control)
    }

    /// Splits the control byte of a command frame into its register index and direction.
    ///
    /// The address field of output drivers is ignored.
    pub fn parse_control(self, control: u8) -> (u8, Direction) {
        let (register, write) = match self {
            Layout::OutputDriver(_) => ((control >> 1) & 0x0f, control & 0x01 != 0),
            Layout::InputReceiver => (control & 0x7f, control & 0x80 != 0),
        };
        (register, if write { Direction::Write } else { Direction::Read })
    }

    /// Builds the frame for `command`, including its checksum.
    pub fn encode(self, command: &Command) -> Result<Frame> {
        let control = self.control_byte(command.register, command.direction)?;
        let data = match command.direction {
            Direction::Read => 0,
            Direction::Write => command.data,
        };
        Ok(Frame([control, data, 0]).seal())
    }

    /// Splits a frame received from the device into its fields.
    ///
    /// The checksum is not validated here; use `Response::verify` for that.
    pub fn decode(self, frame: Frame) -> Response {
        Response(frame)
    }
}

/// A frame received from a device in reply to a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Response(Frame);

impl Response {
    /// Returns the status byte that the device shifts out in place of the control byte.
    pub fn status(&self) -> u8 {
        self.0.control()
    }

    /// Returns the register contents.
    pub fn data(&self) -> u8 {
        self.0.data()
    }

    /// Returns the device flags that precede the checksum.
    pub fn flags(&self) -> u8 {
        self.0.flags()
    }

    /// Returns the raw frame.
    pub fn frame(&self) -> Frame {
        self.0
    }

    /// Checks that the checksum carried by the response matches its contents.
    pub fn verify(&self) -> Result<()> {
        let expected = crc5_frame(&(self.0).0);
        let actual = self.0.checksum();
        if expected != actual {
            return Err(Error::ChecksumMismatch { expected, actual });
        }
        Ok(())
    }
}
