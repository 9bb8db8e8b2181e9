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

//! SPI bus abstractions.

use std::io;

/// Defines the SPI clock polarity and phase.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpiMode {
    /// CPOL 0, CPHA 0
    Mode0 = 0,
    /// CPOL 0, CPHA 1
    Mode1 = 1,
    /// CPOL 1, CPHA 0
    Mode2 = 2,
    /// CPOL 1, CPHA 1
    Mode3 = 3,
}

/// Parameters to open an SPI bus.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpiConfig {
    /// Number of the SPI controller.
    pub bus: u8,

    /// Hardware slave select line of the controller.
    pub slave: u8,

    /// Clock frequency in Hz.
    pub clock_hz: u32,

    /// Clock polarity and phase.
    pub mode: SpiMode,
}

impl Default for SpiConfig {
    /// Both chip families accept mode 0 and are comfortable at 1 MHz on long cables.
    fn default() -> Self {
        Self { bus: 0, slave: 0, clock_hz: 1_000_000, mode: SpiMode::Mode0 }
    }
}

impl SpiConfig {
    /// Opens the bus described by this configuration with `factory`.
    pub fn open<B>(&self, factory: SpiFactory<B>) -> io::Result<B> {
        factory(self.bus, self.slave, self.clock_hz, self.mode)
    }
}

/// Factory function to open an SPI bus.
pub type SpiFactory<B> = fn(bus: u8, slave: u8, clock_hz: u32, mode: SpiMode) -> io::Result<B>;

/// A trait abstracting access to a full-duplex SPI bus.
pub trait SpiBus {
    /// Shifts out `write` while shifting in the same number of bytes into `read`.
    ///
    /// Returns the number of bytes exchanged.  The chip-select line is not touched.
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> io::Result<usize>;
}
