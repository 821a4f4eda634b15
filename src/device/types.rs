use std::fmt;

use crate::device::constants::RAW_MULTI_CHANNELS;

/**
 * Connection state as reported by the device session. Only the session moves between states,
 * the view never sets it.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    NotFound,
    NotPaired,
    Disconnected,
}

impl ConnectionState {
    // a connection attempt is in flight or established
    pub fn is_busy(&self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::NotFound => "device not found",
            ConnectionState::NotPaired => "device not paired",
            ConnectionState::Disconnected => "disconnected",
        };

        write!(f, "{}", result)
    }
}

/**
 * Poor signal severity. 0 means good contact, anything above is worse.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalQuality(pub i32);

impl SignalQuality {
    pub fn is_poor(&self) -> bool {
        self.0 > 0
    }
}

/**
 * One sample from each of the 8 channels, only produced in multi-channel raw mode.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMulti {
    pub channels: [i32; RAW_MULTI_CHANNELS],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    StateChange(ConnectionState),
    PoorSignal(SignalQuality),
    RawSample(i32),
    RawMultiSample(RawMulti),
    Attention(i32), // [0, 100]
    Meditation(i32), // [0, 100]
    Blink(i32), // blink strength
    HeartRate(i32), // not every headset model sends this
    LowBattery,
    RawCount(i32),
    // a tag this application does not know about, kept so newer sessions do not break us
    Other { tag: u16, value: i32 },
}
