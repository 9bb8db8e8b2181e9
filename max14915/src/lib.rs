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

//! Driver for the MAX14915 octal industrial digital output driver.
//!
//! Up to four MAX14915 chips can share a single chip-select line, each one answering to the address
//! set on its A0/A1 pins.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use maxio_core::bus::SpiBus;
use maxio_core::device::{Device, DeviceConfig};
use maxio_core::frame::{ChipAddress, Layout, Response};
use maxio_core::gpio::{Pin, Pins};
use maxio_core::regs::Register as _;
use maxio_core::Result;
use std::sync::{Arc, Mutex};
use tracing::debug;

mod regs;
pub use regs::{Config1, Line, Register};

/// A MAX14915 reachable through a shared bus.
pub struct Max14915<B, P> {
    device: Device<B, P>,
}

impl<B: SpiBus, P: Pins> Max14915<B, P> {
    /// Creates a driver for the chip at `address` selected by the `cs` pin.
    pub fn new(
        bus: Arc<Mutex<B>>,
        pins: Arc<Mutex<P>>,
        cs: Pin,
        address: ChipAddress,
        config: DeviceConfig,
    ) -> Result<Self> {
        let device = Device::new(bus, pins, cs, Layout::OutputDriver(address), config)?;
        Ok(Self { device })
    }

    /// Reads `reg` and returns the full response.
    pub fn read_register(&mut self, reg: Register) -> Result<Response> {
        self.device.read(reg.index())
    }

    /// Writes `data` into `reg` and returns the full response.
    pub fn write_register(&mut self, reg: Register, data: u8) -> Result<Response> {
        self.device.write(reg.index(), data)
    }

    /// Reads the register with the raw `index`, which must be part of the register map.
    pub fn read_index(&mut self, index: u8) -> Result<Response> {
        self.read_register(Register::from_index(index)?)
    }

    /// Returns the channels whose switches are currently on.
    pub fn outputs(&mut self) -> Result<Line> {
        Ok(Line(self.read_register(Register::Output)?.data()))
    }

    /// Turns on exactly the channels in `lines`.
    pub fn write_outputs(&mut self, lines: Line) -> Result<()> {
        self.write_register(Register::Output, lines.bits())?;
        Ok(())
    }

    /// Turns on the channels in `lines` without touching the others and returns the new state.
    pub fn set_outputs(&mut self, lines: Line) -> Result<Line> {
        let current = self.outputs()?;
        let next = current | lines;
        debug!(?current, ?next, "setting outputs");
        self.write_outputs(next)?;
        Ok(next)
    }

    /// Turns off the channels in `lines` without touching the others and returns the new state.
    pub fn reset_outputs(&mut self, lines: Line) -> Result<Line> {
        let current = self.outputs()?;
        let next = current & !lines;
        debug!(?current, ?next, "resetting outputs");
        self.write_outputs(next)?;
        Ok(next)
    }

    /// Reads the chip-wide fault register.
    pub fn global_fault(&mut self) -> Result<u8> {
        Ok(self.read_register(Register::GlobalFault)?.data())
    }

    /// Reads the first configuration register.
    pub fn config1(&mut self) -> Result<Config1> {
        Ok(Config1(self.read_register(Register::Config1)?.data()))
    }

    /// Writes the first configuration register.
    pub fn write_config1(&mut self, config: Config1) -> Result<()> {
        self.write_register(Register::Config1, config.bits())?;
        Ok(())
    }

    /// Reads the second configuration register.
    pub fn config2(&mut self) -> Result<u8> {
        Ok(self.read_register(Register::Config2)?.data())
    }

    /// Writes the second configuration register.
    pub fn write_config2(&mut self, config: u8) -> Result<()> {
        self.write_register(Register::Config2, config)?;
        Ok(())
    }
}
