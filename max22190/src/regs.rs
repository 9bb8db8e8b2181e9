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

//! Register map of the MAX22190.

use maxio_core::bitmask;
use maxio_core::regs;

/// Registers of the MAX22190.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Register {
    /// Wire-break status per input.
    WireBreak = 0x00,
    /// Digital input states.
    DigitalInput = 0x02,
    /// First fault register.
    Fault1 = 0x04,
    /// Filter of input 1.
    FilterIn1 = 0x06,
    /// Filter of input 2.
    FilterIn2 = 0x08,
    /// Filter of input 3.
    FilterIn3 = 0x0a,
    /// Filter of input 4.
    FilterIn4 = 0x0c,
    /// Filter of input 5.
    FilterIn5 = 0x0e,
    /// Filter of input 6.
    FilterIn6 = 0x10,
    /// Filter of input 7.
    FilterIn7 = 0x12,
    /// Filter of input 8.
    FilterIn8 = 0x14,
    /// Global configuration.
    Configuration = 0x18,
    /// Per-input enable.
    InputEnable = 0x1a,
    /// Second fault register.
    Fault2 = 0x1c,
    /// Enables for the second fault register.
    Fault2Enable = 0x1e,
    /// General purpose output.
    Gpo = 0x22,
    /// Enables for the first fault register.
    Fault1Enable = 0x24,
    /// No operation; reading it returns the input states without side effects.
    NoOp = 0x26,
}

impl regs::Register for Register {
    const ALL: &'static [Self] = &[
        Register::WireBreak,
        Register::DigitalInput,
        Register::Fault1,
        Register::FilterIn1,
        Register::FilterIn2,
        Register::FilterIn3,
        Register::FilterIn4,
        Register::FilterIn5,
        Register::FilterIn6,
        Register::FilterIn7,
        Register::FilterIn8,
        Register::Configuration,
        Register::InputEnable,
        Register::Fault2,
        Register::Fault2Enable,
        Register::Gpo,
        Register::Fault1Enable,
        Register::NoOp,
    ];

    fn index(self) -> u8 {
        self as u8
    }
}

/// Filter registers indexed by input number minus one.
pub(crate) const FILTER_REGISTERS: [Register; 8] = [
    Register::FilterIn1,
    Register::FilterIn2,
    Register::FilterIn3,
    Register::FilterIn4,
    Register::FilterIn5,
    Register::FilterIn6,
    Register::FilterIn7,
    Register::FilterIn8,
];

bitmask! {
    /// Input channels, one bit per channel.
    pub struct Line {
        /// Input 1.
        const LINE1 = 0x01;
        /// Input 2.
        const LINE2 = 0x02;
        /// Input 3.
        const LINE3 = 0x04;
        /// Input 4.
        const LINE4 = 0x08;
        /// Input 5.
        const LINE5 = 0x10;
        /// Input 6.
        const LINE6 = 0x20;
        /// Input 7.
        const LINE7 = 0x40;
        /// Input 8.
        const LINE8 = 0x80;
    }
}

bitmask! {
    /// Fields of the `Fault1` register.
    pub struct Fault1 {
        /// At least one input reports a wire break.
        const WIRE_BREAK = 0x01;
        /// The 24V supply is below the medium threshold.
        const VOLTAGE_24V_M = 0x02;
        /// The 24V supply is below the low threshold.
        const VOLTAGE_24V_L = 0x04;
        /// The die temperature crossed the first alarm threshold.
        const TEMPERATURE_ALARM1 = 0x08;
        /// The die temperature crossed the second alarm threshold.
        const TEMPERATURE_ALARM2 = 0x10;
        /// At least one fault in `Fault2` is active.
        const FAULT2 = 0x20;
        /// The chip went through a power-on reset.
        const POWER_ON_RESET = 0x40;
        /// The chip received a frame with a bad checksum.
        const CRC = 0x80;
    }
}

bitmask! {
    /// Fields of the `Fault1Enable` register.
    pub struct Fault1Enable {
        /// Report wire breaks.
        const WIRE_BREAK = 0x01;
        /// Report the 24V medium threshold.
        const VOLTAGE_24V_M = 0x02;
        /// Report the 24V low threshold.
        const VOLTAGE_24V_L = 0x04;
        /// Report the first temperature alarm.
        const TEMPERATURE_ALARM1 = 0x08;
        /// Report the second temperature alarm.
        const TEMPERATURE_ALARM2 = 0x10;
        /// Report `Fault2` faults.
        const FAULT2 = 0x20;
        /// Report power-on resets.
        const POWER_ON_RESET = 0x40;
        /// Report checksum errors.
        const CRC = 0x80;
    }
}

bitmask! {
    /// Fields of the `Configuration` register.
    pub struct Configuration {
        /// Enable short-circuit detection on the REFDI pin.
        const REFDI_SHORT_CIRCUIT_DETECTION = 0x01;
        /// Fix all filters to their mid-scale delay.
        const FILTERS_MID_SCALE = 0x08;
        /// Voltage threshold faults stay set until `Fault1` is read.
        const EXPLICIT_VOLTAGE_FAULT_CLEAR = 0x10;
    }
}

bitmask! {
    /// Fields of the `Fault2` register.
    pub struct Fault2 {
        /// The REFWB pin is shorted.
        const REFWB_SHORT_CIRCUIT = 0x01;
        /// The REFWB pin is open.
        const REFWB_OPEN_CIRCUIT = 0x02;
        /// The REFDI pin is shorted.
        const REFDI_SHORT_CIRCUIT = 0x04;
        /// The REFDI pin is open.
        const REFDI_OPEN_CIRCUIT = 0x08;
        /// The chip shut down due to over-temperature.
        const OVER_TEMPERATURE_SHUTDOWN = 0x10;
        /// The last SPI transaction did not have a multiple of 8 clock pulses.
        const CLOCK_NOT_8_PULSES = 0x20;
    }
}

bitmask! {
    /// Fields of the `Fault2Enable` register.
    pub struct Fault2Enable {
        /// Report REFWB shorts.
        const REFWB_SHORT_CIRCUIT = 0x01;
        /// Report REFWB opens.
        const REFWB_OPEN_CIRCUIT = 0x02;
        /// Report REFDI shorts.
        const REFDI_SHORT_CIRCUIT = 0x04;
        /// Report REFDI opens.
        const REFDI_OPEN_CIRCUIT = 0x08;
        /// Report over-temperature shutdowns.
        const OVER_TEMPERATURE_SHUTDOWN = 0x10;
        /// Report bad clock pulse counts.
        const CLOCK_NOT_8_PULSES = 0x20;
    }
}

bitmask! {
    /// Fields of the `Gpo` register.
    pub struct Gpo {
        /// The FAULT pin stays asserted until the faults are read.
        const FAULT_STICKY = 0x80;
    }
}

/// Debounce delay of an input filter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterDelay {
    /// 50 microseconds.
    Micros50 = 0x00,
    /// 100 microseconds.
    Micros100 = 0x01,
    /// 400 microseconds.
    Micros400 = 0x02,
    /// 800 microseconds.
    Micros800 = 0x03,
    /// 1.6 milliseconds.
    Millis1_6 = 0x04,
    /// 3.2 milliseconds.
    Millis3_2 = 0x05,
    /// 12.8 milliseconds.
    Millis12_8 = 0x06,
    /// 20 milliseconds.
    Millis20 = 0x07,
}

impl FilterDelay {
    /// Mask of the delay field within a filter register.
    const MASK: u8 = 0x07;

    /// Decodes the delay field of a filter register.
    fn from_bits(bits: u8) -> Self {
        match bits & Self::MASK {
            0x00 => FilterDelay::Micros50,
            0x01 => FilterDelay::Micros100,
            0x02 => FilterDelay::Micros400,
            0x03 => FilterDelay::Micros800,
            0x04 => FilterDelay::Millis1_6,
            0x05 => FilterDelay::Millis3_2,
            0x06 => FilterDelay::Millis12_8,
            _ => FilterDelay::Millis20,
        }
    }
}

/// Contents of a per-input filter register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Filter {
    /// Debounce delay, ignored while `bypass` is set.
    pub delay: FilterDelay,

    /// Skip the programmable filter entirely.
    pub bypass: bool,

    /// Enable wire-break detection on the input.
    pub wire_break_detection: bool,
}

impl Filter {
    /// Bit that bypasses the programmable filter.
    const BYPASS: u8 = 0x08;

    /// Bit that enables wire-break detection.
    const WIRE_BREAK_DETECTION: u8 = 0x10;

    /// Decodes a filter register value.
    pub fn from_bits(bits: u8) -> Self {
        Self {
            delay: FilterDelay::from_bits(bits),
            bypass: bits & Self::BYPASS != 0,
            wire_break_detection: bits & Self::WIRE_BREAK_DETECTION != 0,
        }
    }

    /// Encodes the filter as a register value.
    pub fn bits(self) -> u8 {
        let mut bits = self.delay as u8;
        if self.bypass {
            bits |= Self::BYPASS;
        }
        if self.wire_break_detection {
            bits |= Self::WIRE_BREAK_DETECTION;
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maxio_core::regs::Register as _;

    #[test]
    fn test_register_table_lookup() {
        assert_eq!(18, Register::ALL.len());
        for reg in Register::ALL {
            assert_eq!(*reg, Register::from_index(reg.index()).unwrap());
        }
        assert!(Register::from_index(0x16).is_err());
        assert!(Register::from_index(0x20).is_err());
    }

    #[test]
    fn test_filter_registers_follow_inputs() {
        for (i, reg) in FILTER_REGISTERS.iter().enumerate() {
            assert_eq!(0x06 + 2 * i, usize::from(reg.index()));
        }
    }

    #[test]
    fn test_filter_bits() {
        let filter = Filter {
            delay: FilterDelay::Micros400,
            bypass: false,
            wire_break_detection: true,
        };
        assert_eq!(0x12, filter.bits());
        assert_eq!(filter, Filter::from_bits(0x12));

        let filter = Filter::from_bits(0x0f);
        assert_eq!(FilterDelay::Millis20, filter.delay);
        assert!(filter.bypass);
        assert!(!filter.wire_break_detection);
    }

    #[test]
    fn test_filter_ignores_reserved_bits() {
        assert_eq!(Filter::from_bits(0x03), Filter::from_bits(0xe3));
    }
}
