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

//! Test utilities for consumers of the frame protocol.

use crate::bus::SpiBus;
use crate::device::ReadTiming;
use crate::frame::{Direction, Frame, Layout, FRAME_LEN};
use crate::gpio::{Pin, PinMode, Pins};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

/// An operation observed by the mocks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// Represents a call to `Pins::setup`.
    Setup(Pin, PinMode),

    /// Represents a call to `Pins::clear_all`.
    ClearAll,

    /// Represents a call to `Pins::read`.
    Read(Pin),

    /// Represents a call to `Pins::write`.
    Write(Pin, bool),

    /// Represents a successful call to `SpiBus::transfer` with the bytes that were written.
    Transfer(Vec<u8>),
}

/// Ordered record of the operations performed on a set of mocks.
///
/// Clones share the same underlying record so that a bus and its pins can log into a single
/// timeline.
#[derive(Clone, Debug, Default)]
pub struct Trace(Arc<Mutex<Vec<Event>>>);

impl Trace {
    /// Appends `event` to the record.
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    /// Returns all recorded events and clears the record.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}

/// Mock GPIO implementation that records operations and supplies fake reads.
pub struct MockPins {
    trace: Trace,
    levels: HashMap<Pin, bool>,
    fail_writes: bool,
}

impl MockPins {
    /// Creates a new set of pins that logs into `trace`.
    pub fn new(trace: Trace) -> Self {
        Self { trace, levels: HashMap::default(), fail_writes: false }
    }

    /// Sets the level that reads from `pin` will return.  Unset pins read as high.
    pub fn set_level(&mut self, pin: Pin, level: bool) {
        self.levels.insert(pin, level);
    }

    /// Makes all subsequent writes fail (or succeed again if `fail` is false).
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl Pins for MockPins {
    fn setup(&mut self, pin: Pin, mode: PinMode) -> io::Result<()> {
        self.trace.push(Event::Setup(pin, mode));
        Ok(())
    }

    fn clear_all(&mut self) -> io::Result<()> {
        self.trace.push(Event::ClearAll);
        Ok(())
    }

    fn read(&mut self, pin: Pin) -> io::Result<bool> {
        self.trace.push(Event::Read(pin));
        Ok(*self.levels.get(&pin).unwrap_or(&true))
    }

    fn write(&mut self, pin: Pin, v: bool) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "Mock GPIO failure"));
        }
        self.trace.push(Event::Write(pin, v));
        Ok(())
    }
}

/// Mock SPI bus that records writes and replies with canned responses.
///
/// When no canned response is queued, the bus behaves as a loopback and returns the written
/// bytes unchanged.
pub struct MockSpiBus {
    trace: Trace,
    responses: VecDeque<[u8; FRAME_LEN]>,
    fail_next: Option<io::ErrorKind>,
    truncate_next: Option<usize>,
}

impl MockSpiBus {
    /// Creates a new bus that logs into `trace`.
    pub fn new(trace: Trace) -> Self {
        Self { trace, responses: VecDeque::default(), fail_next: None, truncate_next: None }
    }

    /// Queues `response` to be returned by the next transfer that has no other response queued.
    pub fn push_response(&mut self, response: [u8; FRAME_LEN]) {
        self.responses.push_back(response);
    }

    /// Makes the next transfer fail with an error of type `kind`.
    pub fn fail_next(&mut self, kind: io::ErrorKind) {
        self.fail_next = Some(kind);
    }

    /// Makes the next transfer report that only `n` bytes were exchanged.
    pub fn truncate_next(&mut self, n: usize) {
        self.truncate_next = Some(n);
    }
}

impl SpiBus for MockSpiBus {
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> io::Result<usize> {
        if let Some(kind) = self.fail_next.take() {
            return Err(io::Error::new(kind, "Mock SPI failure"));
        }
        assert_eq!(read.len(), write.len(), "Full-duplex buffers must have the same length");

        self.trace.push(Event::Transfer(write.to_owned()));
        match self.responses.pop_front() {
            Some(response) => read.copy_from_slice(&response[..read.len()]),
            None => read.copy_from_slice(write),
        }
        Ok(self.truncate_next.take().unwrap_or(write.len()))
    }
}

/// Mock SPI bus that emulates the register file of a single chip.
///
/// Commands are decoded with `layout` and applied to the registers.  With pipelined timing, the
/// data byte of each response carries the register addressed by the previous frame, as the real
/// chips do.  Responses always have a zero status and a valid checksum.
pub struct MockRegisterBus {
    trace: Trace,
    layout: Layout,
    timing: ReadTiming,
    registers: [u8; 0x80],
    pending: u8,
}

impl MockRegisterBus {
    /// Creates a chip with all registers cleared that logs into `trace`.
    pub fn new(trace: Trace, layout: Layout, timing: ReadTiming) -> Self {
        Self { trace, layout, timing, registers: [0; 0x80], pending: 0 }
    }

    /// Sets the contents of `register` without going through the bus.
    pub fn set_register(&mut self, register: u8, value: u8) {
        self.registers[usize::from(register)] = value;
    }

    /// Returns the contents of `register`.
    pub fn register(&self, register: u8) -> u8 {
        self.registers[usize::from(register)]
    }
}

impl SpiBus for MockRegisterBus {
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> io::Result<usize> {
        assert_eq!(FRAME_LEN, write.len(), "Transfers must be exactly one frame long");
        assert_eq!(FRAME_LEN, read.len(), "Transfers must be exactly one frame long");
        self.trace.push(Event::Transfer(write.to_owned()));

        let (register, direction) = self.layout.parse_control(write[0]);
        let slot = usize::from(register);
        if direction == Direction::Write {
            self.registers[slot] = write[1];
        }

        let data = match self.timing {
            ReadTiming::Pipelined => self.pending,
            ReadTiming::SameFrame => self.registers[slot],
        };
        self.pending = self.registers[slot];

        read.copy_from_slice(Frame([0, data, 0]).seal().as_bytes());
        Ok(FRAME_LEN)
    }
}
