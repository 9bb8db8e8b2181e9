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

//! Driver for the MAX22190 octal industrial digital input receiver.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use maxio_core::bus::SpiBus;
use maxio_core::device::{Device, DeviceConfig};
use maxio_core::frame::{Layout, Response};
use maxio_core::gpio::{Pin, Pins};
use maxio_core::regs::Register as _;
use maxio_core::{Error, Result};
use std::sync::{Arc, Mutex};
use tracing::debug;

mod regs;
use regs::FILTER_REGISTERS;
pub use regs::{
    Configuration, Fault1, Fault1Enable, Fault2, Fault2Enable, Filter, FilterDelay, Gpo, Line,
    Register,
};

/// A MAX22190 reachable through a shared bus.
///
/// The chip has no address pins, so every instance needs its own chip-select line.
pub struct Max22190<B, P> {
    device: Device<B, P>,
}

impl<B: SpiBus, P: Pins> Max22190<B, P> {
    /// Creates a driver for the chip selected by the `cs` pin.
    ///
    /// Pipelined reads collect their data with a `NoOp` read so that the fault registers, which
    /// clear on read, are only read once.
    pub fn new(
        bus: Arc<Mutex<B>>,
        pins: Arc<Mutex<P>>,
        cs: Pin,
        config: DeviceConfig,
    ) -> Result<Self> {
        let device = Device::new(bus, pins, cs, Layout::InputReceiver, config)?
            .with_follow_up(Register::NoOp.index())?;
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

    /// Reads `reg` and returns only its contents.
    fn read_data(&mut self, reg: Register) -> Result<u8> {
        Ok(self.read_register(reg)?.data())
    }

    /// Returns the inputs that are currently high.
    pub fn digital_inputs(&mut self) -> Result<Line> {
        self.read_data(Register::DigitalInput).map(Line)
    }

    /// Returns the inputs that report a wire break.
    pub fn wire_break(&mut self) -> Result<Line> {
        self.read_data(Register::WireBreak).map(Line)
    }

    /// Reads the first fault register.
    pub fn fault1(&mut self) -> Result<Fault1> {
        self.read_data(Register::Fault1).map(Fault1)
    }

    /// Reads the enables of the first fault register.
    pub fn fault1_enable(&mut self) -> Result<Fault1Enable> {
        self.read_data(Register::Fault1Enable).map(Fault1Enable)
    }

    /// Writes the enables of the first fault register.
    pub fn write_fault1_enable(&mut self, enable: Fault1Enable) -> Result<()> {
        self.write_register(Register::Fault1Enable, enable.bits())?;
        Ok(())
    }

    /// Reads the second fault register.
    pub fn fault2(&mut self) -> Result<Fault2> {
        self.read_data(Register::Fault2).map(Fault2)
    }

    /// Reads the enables of the second fault register.
    pub fn fault2_enable(&mut self) -> Result<Fault2Enable> {
        self.read_data(Register::Fault2Enable).map(Fault2Enable)
    }

    /// Writes the enables of the second fault register.
    pub fn write_fault2_enable(&mut self, enable: Fault2Enable) -> Result<()> {
        self.write_register(Register::Fault2Enable, enable.bits())?;
        Ok(())
    }

    /// Returns the filter register for `input`, which is numbered from 1 to 8.
    fn filter_register(input: u8) -> Result<Register> {
        match input {
            1..=8 => Ok(FILTER_REGISTERS[usize::from(input - 1)]),
            _ => Err(Error::InvalidInput(input)),
        }
    }

    /// Reads the filter settings of `input`.
    pub fn filter(&mut self, input: u8) -> Result<Filter> {
        let reg = Self::filter_register(input)?;
        self.read_data(reg).map(Filter::from_bits)
    }

    /// Writes the filter settings of `input`.
    pub fn write_filter(&mut self, input: u8, filter: Filter) -> Result<()> {
        let reg = Self::filter_register(input)?;
        debug!(input, ?filter, "configuring filter");
        self.write_register(reg, filter.bits())?;
        Ok(())
    }

    /// Reads the global configuration.
    pub fn configuration(&mut self) -> Result<Configuration> {
        self.read_data(Register::Configuration).map(Configuration)
    }

    /// Writes the global configuration.
    pub fn write_configuration(&mut self, config: Configuration) -> Result<()> {
        self.write_register(Register::Configuration, config.bits())?;
        Ok(())
    }

    /// Returns the inputs that are enabled.
    pub fn input_enable(&mut self) -> Result<Line> {
        self.read_data(Register::InputEnable).map(Line)
    }

    /// Enables exactly the inputs in `lines`.
    pub fn write_input_enable(&mut self, lines: Line) -> Result<()> {
        self.write_register(Register::InputEnable, lines.bits())?;
        Ok(())
    }

    /// Reads the general purpose output register.
    pub fn gpo(&mut self) -> Result<Gpo> {
        self.read_data(Register::Gpo).map(Gpo)
    }

    /// Writes the general purpose output register.
    pub fn write_gpo(&mut self, gpo: Gpo) -> Result<()> {
        self.write_register(Register::Gpo, gpo.bits())?;
        Ok(())
    }
}
