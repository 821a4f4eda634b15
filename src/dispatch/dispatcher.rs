use log::{debug, error, info, warn};

use crate::device::session::DeviceSession;
use crate::device::types::{ConnectionState, DeviceEvent, RawMulti};
use crate::dispatch::slots::{ReadingSlots, Slot};
use crate::dispatch::types::{Effect, Notification};

// one diagnostic line per channel, channels are numbered from 1
fn channel_diagnostics(multi: &RawMulti) -> Vec<String> {
    multi.channels
        .iter()
        .enumerate()
        .map(|(channel, value)| format!("Raw channel {}: {}", channel + 1, value))
        .collect()
}

/**
 * Maps device events onto the reading slots. Owns the session it was built with, so that the
 * session is only driven from the thread that consumes its events.
 *
 * Besides the event mapping, the only control logic is the connection guard in
 * `request_connect`.
 */
pub struct EventDispatcher<S: DeviceSession> {
    session: S,
    raw_mode: bool,
    slots: ReadingSlots,
    closed: bool,
}

impl<S: DeviceSession> EventDispatcher<S> {
    pub fn new(session: S, raw_mode: bool) -> Self {
        EventDispatcher {
            session,
            raw_mode,
            slots: ReadingSlots::new(),
            closed: false,
        }
    }

    pub fn slots(&self) -> &ReadingSlots {
        &self.slots
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// Issues a connect to the session unless a connection is already in progress or established.
    /// Returns whether a connect was issued.
    pub fn request_connect(&mut self) -> bool {
        if self.closed {
            debug!("Ignoring connect request, dispatcher is closed");
            return false;
        }

        let state = self.session.state();
        if state.is_busy() {
            debug!("Ignoring connect request, device is {}", state);
            return false;
        }

        info!("Connecting to headset (raw mode: {})", self.raw_mode);
        self.session.connect(self.raw_mode);
        true
    }

    /// Releases the session. Events that are still in flight are discarded from now on.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }

        self.closed = true;
        self.session.close();
    }

    pub fn dispatch(&mut self, event: DeviceEvent) -> Effect {
        if self.closed {
            return Effect::Discarded;
        }

        match event {
            DeviceEvent::StateChange(state) => self.state_change(state),
            DeviceEvent::PoorSignal(quality) => {
                if quality.is_poor() {
                    warn!("Poor signal: {}", quality.0);
                    Effect::PoorSignalLogged(quality.0)
                }
                else {
                    Effect::Ignored
                }
            },
            DeviceEvent::RawSample(value) => {
                if self.raw_mode {
                    self.write(Slot::RawSample, value)
                }
                else {
                    Effect::Ignored
                }
            },
            DeviceEvent::Attention(value) => self.write(Slot::Attention, value),
            DeviceEvent::Meditation(value) => self.write(Slot::Meditation, value),
            DeviceEvent::Blink(value) => self.write(Slot::Blink, value),
            DeviceEvent::HeartRate(value) => self.write(Slot::HeartRate, value),
            DeviceEvent::LowBattery => {
                warn!("Headset battery is low");
                Effect::Notify(Notification::LowBattery)
            },
            DeviceEvent::RawMultiSample(multi) => {
                for line in channel_diagnostics(&multi) {
                    info!("{}", line);
                }
                Effect::ChannelsLogged(multi)
            },
            DeviceEvent::RawCount(_) => Effect::Ignored,
            DeviceEvent::Other { tag, .. } => {
                debug!("Ignoring unrecognized device event {}", tag);
                Effect::Ignored
            },
        }
    }

    fn state_change(&mut self, state: ConnectionState) -> Effect {
        match state {
            ConnectionState::Idle => Effect::Ignored,
            ConnectionState::Connecting => {
                info!("Connecting...");
                Effect::Logged(state)
            },
            ConnectionState::Connected => {
                info!("Connected!");
                self.session.start();
                Effect::SessionStarted
            },
            ConnectionState::NotFound => {
                error!("Device not found");
                Effect::Logged(state)
            },
            ConnectionState::NotPaired => {
                warn!("Device not paired");
                Effect::Logged(state)
            },
            ConnectionState::Disconnected => {
                info!("Device disconnected.");
                Effect::Logged(state)
            },
        }
    }

    fn write(&mut self, slot: Slot, value: i32) -> Effect {
        self.slots.write(slot, value);
        Effect::SlotWritten(slot)
    }
}
