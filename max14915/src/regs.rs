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

//! Register map of the MAX14915.

use maxio_core::bitmask;
use maxio_core::regs;

/// Registers of the MAX14915.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Register {
    /// Output switch states.
    Output = 0x00,
    /// Fault LED states.
    FaultLed = 0x01,
    /// Status LED states.
    StatusLed = 0x02,
    /// Interrupt summary.
    Interrupt = 0x03,
    /// Overload faults per channel.
    Overload = 0x04,
    /// Current-limit faults per channel.
    CurrentLimit = 0x05,
    /// Open-wire faults detected while the switch is off.
    OpenWireOff = 0x06,
    /// Open-wire faults detected while the switch is on.
    OpenWireOn = 0x07,
    /// Short-to-VDD faults per channel.
    ShortToVdd = 0x08,
    /// Chip-wide faults.
    GlobalFault = 0x09,
    /// Enables open-wire detection while off.
    OpenWireOffEnable = 0x0a,
    /// Enables open-wire detection while on.
    OpenWireOnEnable = 0x0b,
    /// Enables short-to-VDD detection.
    ShortToVddEnable = 0x0c,
    /// First configuration register.
    Config1 = 0x0d,
    /// Second configuration register.
    Config2 = 0x0e,
    /// Fault reporting masks.
    Mask = 0x0f,
}

impl regs::Register for Register {
    const ALL: &'static [Self] = &[
        Register::Output,
        Register::FaultLed,
        Register::StatusLed,
        Register::Interrupt,
        Register::Overload,
        Register::CurrentLimit,
        Register::OpenWireOff,
        Register::OpenWireOn,
        Register::ShortToVdd,
        Register::GlobalFault,
        Register::OpenWireOffEnable,
        Register::OpenWireOnEnable,
        Register::ShortToVddEnable,
        Register::Config1,
        Register::Config2,
        Register::Mask,
    ];

    fn index(self) -> u8 {
        self as u8
    }
}

bitmask! {
    /// Output channels, one bit per channel.
    pub struct Line {
        /// Channel 1.
        const LINE1 = 0x01;
        /// Channel 2.
        const LINE2 = 0x02;
        /// Channel 3.
        const LINE3 = 0x04;
        /// Channel 4.
        const LINE4 = 0x08;
        /// Channel 5.
        const LINE5 = 0x10;
        /// Channel 6.
        const LINE6 = 0x20;
        /// Channel 7.
        const LINE7 = 0x40;
        /// Channel 8.
        const LINE8 = 0x80;
    }
}

bitmask! {
    /// Fields of the `Config1` register.
    pub struct Config1 {
        /// Fault LEDs are driven by the `FaultLed` register instead of the fault logic.
        const FLED_SET = 0x01;
        /// Status LEDs are driven by the `StatusLed` register instead of the outputs.
        const SLED_SET = 0x02;
        /// Use the long blanking time for the fault filters.
        const FILTER_LONG = 0x04;
        /// Enable filtering of fault conditions.
        const FAULT_FILTER_ENABLE = 0x08;
        /// Minimum on-time stretch of the fault LEDs.
        const FLED_STRETCH = 0x30;
        /// Latch faults until they are read.
        const FAULT_LATCH_ENABLE = 0x40;
        /// Reduce the LED drive current.
        const LED_CURRENT_LIMIT = 0x80;
    }
}
