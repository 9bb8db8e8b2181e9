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

//! SPI frame protocol shared by the MAX14915 and MAX22190 industrial I/O chips.
//!
//! Every transaction with these chips is a single 3-byte frame: a control byte that selects the
//! register and direction, a data byte, and a 5-bit CRC in the low bits of the last byte.  This
//! crate builds and checks those frames and runs them through an injected SPI bus, bracketing each
//! exchange with a GPIO-driven chip-select line.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

pub mod bus;
pub mod crc;
pub mod device;
mod error;
pub mod frame;
pub mod gpio;
pub mod regs;
pub mod testutils;

pub use error::{Error, Result};
