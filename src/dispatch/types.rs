use crate::device::types::{ConnectionState, RawMulti};
use crate::dispatch::slots::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    // fatal to the screen
    BluetoothUnavailable,
    // fatal to the screen, the adapter exists but is switched off
    BluetoothOff,
    // advisory, the connection stays up
    LowBattery,
}

impl Notification {
    pub fn message(&self) -> &'static str {
        match self {
            Notification::BluetoothUnavailable => "Bluetooth is not available on this device.",
            Notification::BluetoothOff => "Bluetooth is turned off. Turn it on and start EEG Starter again.",
            Notification::LowBattery => "The battery of your EEG headset is low.",
        }
    }
}

/**
 * What dispatching a single device event did. Every event has exactly one effect.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Ignored,
    // the transition was written to the log
    Logged(ConnectionState),
    PoorSignalLogged(i32),
    SessionStarted,
    SlotWritten(Slot),
    Notify(Notification),
    ChannelsLogged(RawMulti),
    // the dispatcher was closed, the event arrived late
    Discarded,
}
