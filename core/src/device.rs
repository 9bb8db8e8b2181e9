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

//! Register transactions against a single chip on a shared bus.

use crate::bus::SpiBus;
use crate::frame::{Command, Direction, Frame, Layout, Response, FRAME_LEN};
use crate::gpio::{Pin, PinMode, Pins};
use crate::Result;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, trace, warn};

/// Frame whose response carries the contents of a register that is read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReadTiming {
    /// The response to every frame carries the register addressed by the previous frame, so a read
    /// takes two frames: the request and a follow-up whose response holds the data.
    Pipelined,

    /// The response to a read carries the register that the read addressed.
    SameFrame,
}

impl Default for ReadTiming {
    fn default() -> Self {
        ReadTiming::Pipelined
    }
}

/// Runtime options of a device.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DeviceConfig {
    /// Whether to validate the checksum of every response and fail the transaction if it does not
    /// match.  The chips also flag CRC errors on their own, so this is off by default.
    pub verify_responses: bool,

    /// How reads obtain the register contents.
    pub read_timing: ReadTiming,
}

/// Acquires `mutex`, turning a poisoned lock into an I/O error.
fn lock<T: ?Sized>(mutex: &Mutex<T>) -> io::Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| io::Error::new(io::ErrorKind::Other, "Lock poisoned by a panicking thread"))
}

/// A chip reachable through a shared bus and its own chip-select line.
///
/// The bus lock is held for the whole select-exchange-deselect sequence, so devices that share a
/// bus never interleave their transactions.  The pins lock is only taken while toggling a line and
/// always after the bus lock.
pub struct Device<B, P> {
    bus: Arc<Mutex<B>>,
    pins: Arc<Mutex<P>>,
    cs: Pin,
    layout: Layout,
    config: DeviceConfig,
    follow_up: Option<u8>,
}

impl<B: SpiBus, P: Pins> Device<B, P> {
    /// Creates a device that talks through `bus` when the active-low `cs` pin is asserted.
    ///
    /// The chip-select pin is configured as an output and left deasserted.
    pub fn new(
        bus: Arc<Mutex<B>>,
        pins: Arc<Mutex<P>>,
        cs: Pin,
        layout: Layout,
        config: DeviceConfig,
    ) -> Result<Self> {
        {
            let mut pins = lock(&pins)?;
            pins.setup(cs, PinMode::Out)?;
            pins.write(cs, true)?;
        }
        debug!(cs = cs.0, ?layout, "device ready");
        Ok(Self { bus, pins, cs, layout, config, follow_up: None })
    }

    /// Makes pipelined reads collect their data with a read of `register` instead of repeating
    /// the read of the register being accessed.
    ///
    /// Chips that have a side-effect free register should use it here so that registers which
    /// clear on read are only read once per operation.
    pub fn with_follow_up(mut self, register: u8) -> Result<Self> {
        self.layout.control_byte(register, Direction::Read)?;
        self.follow_up = Some(register);
        Ok(self)
    }

    /// Returns the frame layout of the device.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Sends `command` and returns the device's response.
    ///
    /// Transport errors are returned as is and the command is never retried.
    pub fn transfer(&mut self, command: &Command) -> Result<Response> {
        let frame = self.layout.encode(command)?;
        trace!(cs = self.cs.0, %frame, "sending");
        let received = self.exchange(&frame)?;
        trace!(cs = self.cs.0, frame = %received, "received");

        let response = self.layout.decode(received);
        if self.config.verify_responses {
            if let Err(e) = response.verify() {
                warn!(cs = self.cs.0, frame = %received, "response failed checksum verification");
                return Err(e);
            }
        }
        Ok(response)
    }

    /// Reads the register with index `register`.
    ///
    /// The returned response is the one whose data byte holds the register contents, which depends
    /// on the configured `ReadTiming`.
    pub fn read(&mut self, register: u8) -> Result<Response> {
        let response = self.transfer(&Command::read(register))?;
        match self.config.read_timing {
            ReadTiming::SameFrame => Ok(response),
            ReadTiming::Pipelined => {
                let follow_up = self.follow_up.unwrap_or(register);
                self.transfer(&Command::read(follow_up))
            }
        }
    }

    /// Writes `data` into the register with index `register`.
    ///
    /// With pipelined timing, the data byte of the response belongs to the previous frame.
    pub fn write(&mut self, register: u8, data: u8) -> Result<Response> {
        self.transfer(&Command::write(register, data))
    }

    /// Drives the chip-select line.  The line is active low.
    fn select(&self, active: bool) -> io::Result<()> {
        let mut pins = lock(&self.pins)?;
        pins.write(self.cs, !active)
    }

    /// Exchanges `frame` with the device while it is selected.
    fn exchange(&self, frame: &Frame) -> io::Result<Frame> {
        let mut bus = lock(&self.bus)?;

        self.select(true)?;
        let mut read = [0u8; FRAME_LEN];
        let result = bus.transfer(&mut read, frame.as_bytes());
        let deselected = self.select(false);

        let n = result?;
        deselected?;
        if n != FRAME_LEN {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Short SPI transfer: exchanged {} of {} bytes", n, FRAME_LEN),
            ));
        }
        Ok(Frame(read))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ChipAddress;
    use crate::testutils::{Event, MockPins, MockRegisterBus, MockSpiBus, Trace};
    use crate::Error;

    const CS: Pin = Pin(8);

    fn new_device(
        trace: &Trace,
        layout: Layout,
        config: DeviceConfig,
    ) -> (Device<MockSpiBus, MockPins>, Arc<Mutex<MockSpiBus>>, Arc<Mutex<MockPins>>) {
        let bus = Arc::from(Mutex::from(MockSpiBus::new(trace.clone())));
        let pins = Arc::from(Mutex::from(MockPins::new(trace.clone())));
        let device = Device::new(bus.clone(), pins.clone(), CS, layout, config).unwrap();
        (device, bus, pins)
    }

    #[test]
    fn test_new_configures_chip_select() {
        let trace = Trace::default();
        let (_device, _bus, _pins) =
            new_device(&trace, Layout::InputReceiver, DeviceConfig::default());
        assert_eq!(vec![Event::Setup(CS, PinMode::Out), Event::Write(CS, true)], trace.take());
    }

    #[test]
    fn test_transfer_brackets_exchange_with_chip_select() {
        let trace = Trace::default();
        let (mut device, bus, _pins) =
            new_device(&trace, Layout::InputReceiver, DeviceConfig::default());
        trace.take();

        bus.lock().unwrap().push_response([0x81, 0x42, 0x00]);
        let response = device.transfer(&Command::read(0x04)).unwrap();
        assert_eq!(0x81, response.status());
        assert_eq!(0x42, response.data());

        assert_eq!(
            vec![
                Event::Write(CS, false),
                Event::Transfer(vec![0x04, 0x00, 0x0f]),
                Event::Write(CS, true),
            ],
            trace.take()
        );
    }

    #[test]
    fn test_transfer_loopback_preserves_data() {
        let trace = Trace::default();
        let layouts = [Layout::OutputDriver(ChipAddress::new(3).unwrap()), Layout::InputReceiver];
        for layout in layouts.iter().copied() {
            let (mut device, _bus, _pins) = new_device(&trace, layout, DeviceConfig::default());
            for register in 0..=layout.max_register() {
                for data in [0x00, 0x01, 0x80, 0xa5, 0xff] {
                    let response = device.write(register, data).unwrap();
                    assert_eq!(data, response.data());
                    response.verify().unwrap();
                }
            }
        }
    }

    #[test]
    fn test_transfer_rejects_invalid_register_before_bus() {
        let trace = Trace::default();
        let layout = Layout::OutputDriver(ChipAddress::default());
        let (mut device, _bus, _pins) = new_device(&trace, layout, DeviceConfig::default());
        trace.take();

        match device.read(0x10) {
            Err(Error::InvalidRegister(0x10)) => (),
            r => panic!("Unexpected result {:?}", r),
        }
        assert!(trace.take().is_empty());
    }

    #[test]
    fn test_transfer_error_passes_through_and_deselects() {
        let trace = Trace::default();
        let (mut device, bus, _pins) =
            new_device(&trace, Layout::InputReceiver, DeviceConfig::default());
        trace.take();

        bus.lock().unwrap().fail_next(io::ErrorKind::TimedOut);
        match device.read(0x02) {
            Err(Error::Transport(e)) => {
                assert_eq!(io::ErrorKind::TimedOut, e.kind());
                assert_eq!("Mock SPI failure", e.to_string());
            }
            r => panic!("Unexpected result {:?}", r),
        }
        assert_eq!(vec![Event::Write(CS, false), Event::Write(CS, true)], trace.take());

        // The failure is not sticky and the caller may retry.
        device.read(0x02).unwrap();
    }

    #[test]
    fn test_transfer_pin_error_skips_exchange() {
        let trace = Trace::default();
        let (mut device, _bus, pins) =
            new_device(&trace, Layout::InputReceiver, DeviceConfig::default());
        trace.take();

        pins.lock().unwrap().fail_writes(true);
        match device.read(0x02) {
            Err(Error::Transport(e)) => assert_eq!(io::ErrorKind::Other, e.kind()),
            r => panic!("Unexpected result {:?}", r),
        }
        assert!(trace.take().is_empty());
    }

    #[test]
    fn test_transfer_short_exchange() {
        let trace = Trace::default();
        let (mut device, bus, _pins) =
            new_device(&trace, Layout::InputReceiver, DeviceConfig::default());

        bus.lock().unwrap().truncate_next(2);
        match device.read(0x02) {
            Err(Error::Transport(e)) => assert_eq!(io::ErrorKind::UnexpectedEof, e.kind()),
            r => panic!("Unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_verify_responses() {
        let trace = Trace::default();
        let config = DeviceConfig { verify_responses: true, ..Default::default() };
        let (mut device, bus, _pins) = new_device(&trace, Layout::InputReceiver, config);

        bus.lock().unwrap().push_response([0xa6, 0x00, 0x02]);
        assert_eq!(0xa6, device.transfer(&Command::read(0x02)).unwrap().status());

        bus.lock().unwrap().push_response([0xa6, 0x00, 0x03]);
        match device.transfer(&Command::read(0x02)) {
            Err(Error::ChecksumMismatch { expected: 0x02, actual: 0x03 }) => (),
            r => panic!("Unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_unverified_responses_are_returned() {
        let trace = Trace::default();
        let (mut device, bus, _pins) =
            new_device(&trace, Layout::InputReceiver, DeviceConfig::default());

        bus.lock().unwrap().push_response([0xa6, 0x00, 0x03]);
        let response = device.transfer(&Command::read(0x02)).unwrap();
        assert!(response.verify().is_err());
    }

    #[test]
    fn test_pipelined_read_returns_follow_up_response() {
        let trace = Trace::default();
        let bus = Arc::from(Mutex::from(MockRegisterBus::new(
            trace.clone(),
            Layout::InputReceiver,
            ReadTiming::Pipelined,
        )));
        let pins = Arc::from(Mutex::from(MockPins::new(trace.clone())));
        let mut device =
            Device::new(bus.clone(), pins, CS, Layout::InputReceiver, DeviceConfig::default())
                .unwrap();
        bus.lock().unwrap().set_register(0x02, 0x81);
        bus.lock().unwrap().set_register(0x04, 0x40);
        trace.take();

        assert_eq!(0x81, device.read(0x02).unwrap().data());
        assert_eq!(0x40, device.read(0x04).unwrap().data());
        assert_eq!(
            vec![
                Event::Write(CS, false),
                Event::Transfer(vec![0x02, 0x00, 0x03]),
                Event::Write(CS, true),
                Event::Write(CS, false),
                Event::Transfer(vec![0x02, 0x00, 0x03]),
                Event::Write(CS, true),
                Event::Write(CS, false),
                Event::Transfer(vec![0x04, 0x00, 0x0f]),
                Event::Write(CS, true),
                Event::Write(CS, false),
                Event::Transfer(vec![0x04, 0x00, 0x0f]),
                Event::Write(CS, true),
            ],
            trace.take()
        );
    }

    #[test]
    fn test_pipelined_read_uses_follow_up_register() {
        let trace = Trace::default();
        let bus = Arc::from(Mutex::from(MockRegisterBus::new(
            trace.clone(),
            Layout::InputReceiver,
            ReadTiming::Pipelined,
        )));
        let pins = Arc::from(Mutex::from(MockPins::new(trace.clone())));
        let mut device =
            Device::new(bus.clone(), pins, CS, Layout::InputReceiver, DeviceConfig::default())
                .unwrap()
                .with_follow_up(0x26)
                .unwrap();
        bus.lock().unwrap().set_register(0x04, 0xc0);
        trace.take();

        assert_eq!(0xc0, device.read(0x04).unwrap().data());
        let transfers: Vec<Event> =
            trace.take().into_iter().filter(|e| matches!(e, Event::Transfer(_))).collect();
        assert_eq!(
            vec![Event::Transfer(vec![0x04, 0x00, 0x0f]), Event::Transfer(vec![0x26, 0x00, 0x14])],
            transfers
        );
    }

    #[test]
    fn test_with_follow_up_rejects_invalid_register() {
        let trace = Trace::default();
        let layout = Layout::OutputDriver(ChipAddress::default());
        let (device, _bus, _pins) = new_device(&trace, layout, DeviceConfig::default());
        match device.with_follow_up(0x10) {
            Err(Error::InvalidRegister(0x10)) => (),
            Err(e) => panic!("Unexpected error {:?}", e),
            Ok(_) => panic!("Follow-up register should have been rejected"),
        }
    }

    #[test]
    fn test_same_frame_read_takes_one_frame() {
        let trace = Trace::default();
        let config = DeviceConfig { read_timing: ReadTiming::SameFrame, ..Default::default() };
        let (mut device, bus, _pins) = new_device(&trace, Layout::InputReceiver, config);
        trace.take();

        bus.lock().unwrap().push_response([0x00, 0x42, 0x00]);
        assert_eq!(0x42, device.read(0x04).unwrap().data());
        assert_eq!(
            vec![
                Event::Write(CS, false),
                Event::Transfer(vec![0x04, 0x00, 0x0f]),
                Event::Write(CS, true),
            ],
            trace.take()
        );
    }
}
