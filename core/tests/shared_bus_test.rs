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

//! Integration tests for devices that share a bus.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use maxio_core::device::{Device, DeviceConfig};
use maxio_core::frame::{ChipAddress, Layout};
use maxio_core::gpio::Pin;
use maxio_core::testutils::{Event, MockPins, MockSpiBus, Trace};
use std::sync::{Arc, Mutex};
use std::thread;

/// Number of transactions that each thread issues.
const ROUNDS: u8 = 50;

/// Checks that every transfer in `events` is bracketed by its own select and deselect.
fn check_bracketed(events: &[Event]) {
    let mut selected = None;
    let mut transferred = false;
    for event in events {
        match (event, selected) {
            (Event::Write(pin, false), None) => {
                selected = Some(*pin);
                transferred = false;
            }
            (Event::Transfer(_), Some(_)) => {
                assert!(!transferred, "Two transfers within one selection");
                transferred = true;
            }
            (Event::Write(pin, true), Some(sel)) => {
                assert_eq!(sel, *pin, "Deselected a different device");
                assert!(transferred, "Selection without a transfer");
                selected = None;
            }
            (event, selected) => panic!("Unexpected {:?} while {:?} is selected", event, selected),
        }
    }
    assert_eq!(None, selected);
}

#[test]
fn test_shared_bus_never_interleaves() {
    let trace = Trace::default();
    let bus = Arc::from(Mutex::from(MockSpiBus::new(trace.clone())));
    let pins = Arc::from(Mutex::from(MockPins::new(trace.clone())));

    let layouts = [
        (Pin(5), Layout::InputReceiver),
        (Pin(6), Layout::OutputDriver(ChipAddress::new(0).unwrap())),
        (Pin(6), Layout::OutputDriver(ChipAddress::new(1).unwrap())),
    ];
    let mut devices = vec![];
    for (cs, layout) in layouts.iter().copied() {
        devices.push(
            Device::new(bus.clone(), pins.clone(), cs, layout, DeviceConfig::default()).unwrap(),
        );
    }
    trace.take();

    let mut handles = vec![];
    for mut device in devices {
        handles.push(thread::spawn(move || {
            for round in 0..ROUNDS {
                let response = device.write(0x02, round).unwrap();
                assert_eq!(round, response.data());
                response.verify().unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let events = trace.take();
    assert_eq!(3 * 3 * usize::from(ROUNDS), events.len());
    check_bracketed(&events);
}

#[test]
fn test_devices_on_shared_chip_select_use_their_address() {
    let trace = Trace::default();
    let bus = Arc::from(Mutex::from(MockSpiBus::new(trace.clone())));
    let pins = Arc::from(Mutex::from(MockPins::new(trace.clone())));

    let mut first = Device::new(
        bus.clone(),
        pins.clone(),
        Pin(6),
        Layout::OutputDriver(ChipAddress::new(0).unwrap()),
        DeviceConfig::default(),
    )
    .unwrap();
    let mut second = Device::new(
        bus,
        pins,
        Pin(6),
        Layout::OutputDriver(ChipAddress::new(1).unwrap()),
        DeviceConfig::default(),
    )
    .unwrap();
    trace.take();

    first.read(0x0d).unwrap();
    second.read(0x0d).unwrap();

    let transfers: Vec<Event> =
        trace.take().into_iter().filter(|e| matches!(e, Event::Transfer(_))).collect();
    // Each read is followed by a repeat that collects the data.
    assert_eq!(
        vec![
            Event::Transfer(vec![0x1a, 0x00, 0x06]),
            Event::Transfer(vec![0x1a, 0x00, 0x06]),
            Event::Transfer(vec![0x5a, 0x00, 0x0d]),
            Event::Transfer(vec![0x5a, 0x00, 0x0d]),
        ],
        transfers
    );
}
