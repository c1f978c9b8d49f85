// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{error::Error, fmt, sync::Mutex};

use rppal::gpio::{Gpio, InputPin, Trigger};
use tokio::sync::mpsc::Sender;
use tracing::warn;

use super::{Edge, LineEvent};

/// Raspberry Pi GPIO via the gpiochip character device. Lines are addressed
/// by BCM channel number, rppal's single numbering convention.
pub struct Device {
    gpio: Gpio,
    pins: Mutex<Vec<InputPin>>,
}

impl Device {
    /// Initializes the GPIO subsystem. Fails if this host has no usable
    /// gpiochip device or we lack permission to open it.
    pub fn new() -> Result<Device, Box<dyn Error>> {
        Ok(Device {
            gpio: Gpio::new()?,
            pins: Mutex::new(Vec::new()),
        })
    }
}

impl super::Device for Device {
    fn name(&self) -> String {
        "rppal".to_string()
    }

    fn watch_line(
        &self,
        line: u8,
        edge: Edge,
        sender: Sender<LineEvent>,
    ) -> Result<(), Box<dyn Error>> {
        // The gallery's switches close to ground, so lines idle high.
        let mut pin = self.gpio.get(line)?.into_input_pullup();
        let trigger = match edge {
            Edge::Falling => Trigger::FallingEdge,
            Edge::Rising => Trigger::RisingEdge,
        };

        // No hardware debounce: the dispatch engine owns the debounce window,
        // so every transition is forwarded. The callback runs on rppal's
        // interrupt thread.
        pin.set_async_interrupt(trigger, None, move |_| {
            if let Err(e) = sender.blocking_send(LineEvent { line }) {
                warn!(line, err = e.to_string(), "Error forwarding edge event.");
            }
        })?;

        self.pins
            .lock()
            .expect("unable to get pins lock")
            .push(pin);
        Ok(())
    }

    fn release(&self) {
        let mut pins = self.pins.lock().expect("unable to get pins lock");
        for mut pin in pins.drain(..) {
            if let Err(e) = pin.clear_async_interrupt() {
                warn!(
                    line = pin.pin(),
                    err = e.to_string(),
                    "Error clearing interrupt."
                );
            }
            // Dropping the pin hands it back to the GPIO subsystem.
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO (rppal)")
    }
}
