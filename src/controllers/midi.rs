// src/controllers/midi.rs
// MIDI Controller

use midir::{Ignore, MidiInput, MidiInputConnection};
use std::sync::mpsc;

use crate::config::MidiConfig;
use crate::error::{Result, StageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEventKind {
    NoteOn,
    ControlChange,
}

/// One decoded message: note or controller id and its 7-bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    pub kind: MidiEventKind,
    pub id: u8,
    pub value: u8,
}

impl MidiEvent {
    pub fn note_on(id: u8, value: u8) -> Self {
        Self {
            kind: MidiEventKind::NoteOn,
            id,
            value,
        }
    }

    pub fn control_change(id: u8, value: u8) -> Self {
        Self {
            kind: MidiEventKind::ControlChange,
            id,
            value,
        }
    }

    /// Decodes `(status, data1, data2)`. Note-on with velocity 0 is a
    /// note-off and, like every other message, yields `None`.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let [status, data1, data2, ..] = bytes else {
            return None;
        };
        let (id, value) = (data1 & 0x7F, data2 & 0x7F);

        match status & 0xF0 {
            0x90 if value > 0 => Some(Self::note_on(id, value)),
            0xB0 => Some(Self::control_change(id, value)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortChange {
    /// The connected port is no longer listed
    Lost(String),
    /// The port count changed while disconnected; worth a connect attempt
    Appeared,
}

/// Decides what a fresh port listing means for the connection.
/// `last_count` is the number of ports seen at the previous poll.
pub fn port_change(current: Option<&str>, names: &[String], last_count: usize) -> Option<PortChange> {
    match current {
        Some(current) if !names.iter().any(|n| n == current) => Some(PortChange::Lost(current.to_string())),
        None if names.len() != last_count && !names.is_empty() => Some(PortChange::Appeared),
        _ => None,
    }
}

/// Listens to a single input port. Messages arrive on midir's thread and
/// are queued for the frame loop to take.
pub struct MidiController {
    config: MidiConfig,
    connection: Option<MidiInputConnection<()>>,
    receiver: Option<mpsc::Receiver<MidiEvent>>,
    port_name: Option<String>,
    monitor: Option<MidiInput>,
    event_queue: Vec<MidiEvent>,
    status: String,
    last_poll: f32,
    last_port_count: usize,
}

impl MidiController {
    /// Never fails: an unavailable device leaves the controller inert with
    /// the reason in `status_text`.
    pub fn new(config: &MidiConfig) -> Self {
        let monitor = match MidiInput::new(&format!("{} monitor", config.client_name)) {
            Ok(input) => Some(input),
            Err(e) => {
                log::warn!("MIDI port monitor unavailable: {}", e);
                None
            }
        };

        let mut controller = Self {
            config: config.clone(),
            connection: None,
            receiver: None,
            port_name: None,
            monitor,
            event_queue: Vec::new(),
            status: "Waiting for MIDI access...".to_string(),
            last_poll: 0.0,
            last_port_count: 0,
        };
        controller.try_connect();
        controller
    }

    fn try_connect(&mut self) {
        match self.connect() {
            Ok(name) => {
                log::info!("Listening to MIDI device: {}", name);
                self.status = format!("Connected: {}", name);
            }
            Err(e) => {
                log::warn!("{}", e);
                self.status = e.to_string();
            }
        }
    }

    fn connect(&mut self) -> Result<String> {
        let mut input = MidiInput::new(&self.config.client_name)
            .map_err(|e| StageError::DeviceUnavailable(format!("no MIDI access: {e}")))?;
        input.ignore(Ignore::All);

        let ports = input.ports();
        let port = ports
            .iter()
            .find(|port| match (&self.config.port_filter, input.port_name(port)) {
                (Some(filter), Ok(name)) => name.contains(filter.as_str()),
                (None, Ok(_)) => true,
                (_, Err(_)) => false,
            })
            .ok_or_else(|| StageError::DeviceUnavailable("no MIDI input device found".into()))?;

        let name = input
            .port_name(port)
            .map_err(|e| StageError::DeviceUnavailable(e.to_string()))?;

        let (sender, receiver) = mpsc::channel::<MidiEvent>();
        let connection = input
            .connect(
                port,
                &format!("{} input", self.config.client_name),
                move |_timestamp_us, message, _| {
                    if let Some(event) = MidiEvent::from_bytes(message) {
                        if sender.send(event).is_err() {
                            log::error!("failed to forward message from MIDI thread");
                        }
                    }
                },
                (),
            )
            .map_err(|e| StageError::DeviceUnavailable(format!("failed to connect: {e}")))?;

        self.connection = Some(connection);
        self.receiver = Some(receiver);
        self.port_name = Some(name.clone());
        Ok(name)
    }

    fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
        self.receiver = None;
        self.port_name = None;
    }

    pub fn process_messages(&mut self) {
        if let Some(receiver) = &self.receiver {
            self.event_queue.extend(receiver.try_iter());
        }
    }

    pub fn take_events(&mut self) -> Vec<MidiEvent> {
        std::mem::take(&mut self.event_queue)
    }

    /// Checks the port list every `port_poll_interval` seconds. Returns the
    /// new status text whenever it changed, failed reconnects included.
    pub fn poll_ports(&mut self, now: f32) -> Option<String> {
        if now - self.last_poll < self.config.port_poll_interval {
            return None;
        }
        self.last_poll = now;

        let monitor = self.monitor.as_ref()?;
        let names: Vec<String> = monitor
            .ports()
            .iter()
            .filter_map(|port| monitor.port_name(port).ok())
            .collect();

        let change = port_change(self.port_name.as_deref(), &names, self.last_port_count);
        self.last_port_count = names.len();

        let previous = self.status.clone();
        match change? {
            PortChange::Lost(name) => {
                log::warn!("MIDI device disconnected: {}", name);
                self.status = format!("Disconnected: {}", name);
                self.disconnect();
            }
            PortChange::Appeared => self.try_connect(),
        }
        (self.status != previous).then(|| self.status.clone())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let tests = vec![
            (vec![0x90, 56, 100], Some(MidiEvent::note_on(56, 100))),
            (vec![0x93, 44, 1], Some(MidiEvent::note_on(44, 1))),
            (vec![0x90, 56, 0], None), // note-off in disguise
            (vec![0x80, 56, 64], None),
            (vec![0xB0, 4, 127], Some(MidiEvent::control_change(4, 127))),
            (vec![0xBF, 21, 0], Some(MidiEvent::control_change(21, 0))),
            (vec![0xE0, 0, 64], None),
            (vec![0xB0, 4], None),
            (vec![], None),
        ];

        for (bytes, expected) in tests {
            assert_eq!(
                MidiEvent::from_bytes(&bytes),
                expected,
                "Failed for {:02X?}",
                bytes
            );
        }
    }

    #[test]
    fn test_port_change() {
        let ports = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();
        let tests = vec![
            // connected, port still listed
            (Some("APC mini"), ports(&["APC mini", "IAC Bus"]), 2, None),
            (Some("APC mini"), ports(&["APC mini"]), 2, None),
            // connected port unplugged
            (Some("APC mini"), ports(&["IAC Bus"]), 2, Some(PortChange::Lost("APC mini".into()))),
            (Some("APC mini"), ports(&[]), 1, Some(PortChange::Lost("APC mini".into()))),
            // disconnected, a device shows up
            (None, ports(&["APC mini"]), 0, Some(PortChange::Appeared)),
            (None, ports(&["APC mini", "IAC Bus"]), 1, Some(PortChange::Appeared)),
            // disconnected, nothing new
            (None, ports(&["IAC Bus"]), 1, None),
            (None, ports(&[]), 1, None),
            (None, ports(&[]), 0, None),
        ];

        for (current, names, last_count, expected) in tests {
            assert_eq!(
                port_change(current, &names, last_count),
                expected,
                "Failed for {:?} in {:?} after {}",
                current,
                names,
                last_count
            );
        }
    }
}
