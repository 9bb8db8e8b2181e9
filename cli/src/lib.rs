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

//! Bring-up routines for boards that combine MAX22190 receivers and MAX14915 drivers.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use anyhow::{anyhow, Result};
use maxio_core::bus::SpiBus;
use maxio_core::device::DeviceConfig;
use maxio_core::frame::ChipAddress;
use maxio_core::gpio::{Pin, PinMode, Pins};
use maxio_core::regs::Register;
use maxio_max14915::{self as max14915, Config1, Max14915};
use maxio_max22190::{self as max22190, Max22190};
use std::future::Future;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// Pin assignments of a board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Wiring {
    /// Open-drain fault line shared by all chips.  Active low.
    pub fault: Pin,

    /// Latch line of the output drivers.  Kept high so outputs follow their registers.
    pub latch: Pin,

    /// Synchronization line of the output drivers.  Kept high.
    pub sync: Pin,

    /// Chip-select lines of the input receivers, one per chip.
    pub input_cs: Vec<Pin>,

    /// Chip-select line shared by all output drivers.
    pub output_cs: Pin,

    /// Addresses of the output drivers behind `output_cs`.
    pub output_addresses: Vec<u8>,
}

impl Default for Wiring {
    /// Wiring of the reference carrier board: three receivers and two drivers.
    fn default() -> Self {
        Self {
            fault: Pin(17),
            latch: Pin(27),
            sync: Pin(22),
            input_cs: vec![Pin(5), Pin(6), Pin(13)],
            output_cs: Pin(19),
            output_addresses: vec![0b00, 0b01],
        }
    }
}

/// All chips of a board on a shared bus.
pub struct Board<B, P> {
    pins: Arc<Mutex<P>>,
    fault: Pin,
    inputs: Vec<Max22190<B, P>>,
    outputs: Vec<Max14915<B, P>>,
}

impl<B: SpiBus, P: Pins> Board<B, P> {
    /// Sets up the auxiliary lines described by `wiring` and creates a driver for every chip.
    pub fn new(
        bus: Arc<Mutex<B>>,
        pins: Arc<Mutex<P>>,
        wiring: &Wiring,
        config: DeviceConfig,
    ) -> Result<Self> {
        {
            let mut pins = pins.lock().map_err(|_| anyhow!("GPIO lock poisoned"))?;
            pins.setup(wiring.fault, PinMode::InPullUp)?;
            for pin in [wiring.latch, wiring.sync] {
                pins.setup(pin, PinMode::Out)?;
                pins.write(pin, true)?;
            }
        }

        let mut inputs = vec![];
        for cs in &wiring.input_cs {
            inputs.push(Max22190::new(bus.clone(), pins.clone(), *cs, config)?);
        }

        let mut outputs = vec![];
        for address in &wiring.output_addresses {
            let address = ChipAddress::new(*address)?;
            let output =
                Max14915::new(bus.clone(), pins.clone(), wiring.output_cs, address, config)?;
            outputs.push(output);
        }

        debug!(inputs = inputs.len(), outputs = outputs.len(), "board ready");
        Ok(Self { pins, fault: wiring.fault, inputs, outputs })
    }

    /// Returns true if any chip is pulling the fault line low.
    pub fn fault_asserted(&self) -> Result<bool> {
        let mut pins = self.pins.lock().map_err(|_| anyhow!("GPIO lock poisoned"))?;
        Ok(!pins.read(self.fault)?)
    }

    /// Prints the fault and configuration registers of every chip to `out`.
    pub fn report<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for (i, input) in self.inputs.iter_mut().enumerate() {
            writeln!(out, "IN{} Fault1: {:08b}", i + 1, input.fault1()?.bits())?;
        }
        for (i, output) in self.outputs.iter_mut().enumerate() {
            writeln!(out, "OUT{} Global Fault: {:08b}", i + 1, output.global_fault()?)?;
            writeln!(out, "OUT{} Config1: {:08b}", i + 1, output.config1()?.bits())?;
            writeln!(out, "OUT{} Config2: {:08b}", i + 1, output.config2()?)?;
        }
        writeln!(out, "Fault line: {}", if self.fault_asserted()? { "asserted" } else { "clear" })?;
        Ok(())
    }

    /// Prints every register of every chip to `out`.
    pub fn dump<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for (i, input) in self.inputs.iter_mut().enumerate() {
            for reg in max22190::Register::ALL {
                let response = input.read_register(*reg)?;
                writeln!(out, "IN{} {:?}: {:08b}", i + 1, reg, response.data())?;
            }
        }
        for (i, output) in self.outputs.iter_mut().enumerate() {
            for reg in max14915::Register::ALL {
                let response = output.read_register(*reg)?;
                writeln!(out, "OUT{} {:?}: {:08b}", i + 1, reg, response.data())?;
            }
        }
        Ok(())
    }

    /// Makes every output driver latch and filter its faults.
    pub fn configure_outputs(&mut self) -> Result<()> {
        for output in &mut self.outputs {
            output.write_config1(Config1::FAULT_LATCH_ENABLE | Config1::FAULT_FILTER_ENABLE)?;
        }
        Ok(())
    }

    /// Returns every line used by the board to its original state.
    pub fn release(self) -> Result<()> {
        let mut pins = self.pins.lock().map_err(|_| anyhow!("GPIO lock poisoned"))?;
        pins.clear_all()?;
        debug!("board released");
        Ok(())
    }

    /// Turns `lines` of the first output driver on or off.
    pub fn toggle(&mut self, lines: max14915::Line, on: bool) -> Result<()> {
        let output = self.outputs.first_mut().ok_or_else(|| anyhow!("Board has no outputs"))?;
        if on {
            output.set_outputs(lines)?;
        } else {
            output.reset_outputs(lines)?;
        }
        Ok(())
    }
}

/// Blinks `lines` of the first output driver every `period`.
///
/// Stops after `count` toggles, if given, or when `stop` completes.  The lines are left off on
/// return.  Returns the number of toggles performed.
pub async fn blink<B: SpiBus, P: Pins, F: Future<Output = std::io::Result<()>>>(
    board: &mut Board<B, P>,
    lines: max14915::Line,
    period: Duration,
    count: Option<u64>,
    stop: F,
) -> Result<u64> {
    tokio::pin!(stop);

    let mut on = false;
    let mut toggles = 0;
    while count.map_or(true, |count| toggles < count) {
        tokio::select! {
            _ = tokio::time::sleep(period) => {
                on = !on;
                board.toggle(lines, on)?;
                toggles += 1;
            }
            result = &mut stop => {
                result?;
                info!(toggles, "interrupted");
                break;
            }
        }
    }

    if on {
        board.toggle(lines, false)?;
    }
    Ok(toggles)
}
