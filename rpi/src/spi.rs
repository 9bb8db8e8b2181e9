// MaxIO
// Copyright 2025 Julio Merino
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

//! SPI bus implementation using rppal.

use maxio_core::bus::{SpiBus, SpiMode};
use rppal::spi::{self, Bus, SlaveSelect, Spi};
use std::io;

/// Converts an SPI error to an IO error.
fn spi_error_to_io_error(e: spi::Error) -> io::Error {
    match e {
        spi::Error::Io(e) => e,
        e => io::Error::new(io::ErrorKind::InvalidInput, e.to_string()),
    }
}

/// Maps a bus number to the rppal controller.
fn to_bus(bus: u8) -> io::Result<Bus> {
    match bus {
        0 => Ok(Bus::Spi0),
        _ => Err(io::Error::new(io::ErrorKind::InvalidInput, "Only bus 0 is supported")),
    }
}

/// Maps a slave number to the rppal hardware slave select line.
fn to_slave_select(slave: u8) -> io::Result<SlaveSelect> {
    match slave {
        0 => Ok(SlaveSelect::Ss0),
        1 => Ok(SlaveSelect::Ss1),
        2 => Ok(SlaveSelect::Ss2),
        _ => Err(io::Error::new(io::ErrorKind::InvalidInput, "Only slaves 0 to 2 are supported")),
    }
}

/// Maps a clock mode to the rppal clock mode.
fn to_mode(mode: SpiMode) -> spi::Mode {
    match mode {
        SpiMode::Mode0 => spi::Mode::Mode0,
        SpiMode::Mode1 => spi::Mode::Mode1,
        SpiMode::Mode2 => spi::Mode::Mode2,
        SpiMode::Mode3 => spi::Mode::Mode3,
    }
}

/// An implementation of an `SpiBus` using rppal.
pub struct RppalSpiBus {
    spi: Spi,
}

/// Factory function to open an `RppalSpiBus`.
pub fn spi_bus_open(bus: u8, slave: u8, clock_hz: u32, mode: SpiMode) -> io::Result<RppalSpiBus> {
    let bus = to_bus(bus)?;
    let slave = to_slave_select(slave)?;
    let mode = to_mode(mode);

    let spi = Spi::new(bus, slave, clock_hz, mode).map_err(spi_error_to_io_error)?;

    Ok(RppalSpiBus { spi })
}

impl SpiBus for RppalSpiBus {
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> io::Result<usize> {
        self.spi.transfer(read, write).map_err(spi_error_to_io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bus() {
        assert_eq!(Bus::Spi0, to_bus(0).unwrap());
        assert_eq!(io::ErrorKind::InvalidInput, to_bus(1).unwrap_err().kind());
    }

    #[test]
    fn test_to_slave_select() {
        assert_eq!(SlaveSelect::Ss0, to_slave_select(0).unwrap());
        assert_eq!(SlaveSelect::Ss2, to_slave_select(2).unwrap());
        assert_eq!(io::ErrorKind::InvalidInput, to_slave_select(3).unwrap_err().kind());
    }

    #[test]
    fn test_to_mode() {
        assert_eq!(spi::Mode::Mode0, to_mode(SpiMode::Mode0));
        assert_eq!(spi::Mode::Mode3, to_mode(SpiMode::Mode3));
    }

    #[test]
    fn test_spi_error_to_io_error() {
        let e = spi_error_to_io_error(spi::Error::Io(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "no access",
        )));
        assert_eq!(io::ErrorKind::PermissionDenied, e.kind());
        assert_eq!("no access", e.to_string());
    }
}
