use crate::device::types::ConnectionState;

/**
 * A connection to one headset. Decoding of the device protocol happens behind this trait,
 * results are delivered as `DeviceEvent`s on the channel the session was created with, never as
 * return values.
 *
 * All methods must return immediately.
 */
pub trait DeviceSession {
    /// Request a connection. Does nothing if a connection is already in progress or established.
    fn connect(&mut self, raw_mode: bool);

    /// Begin reading from a connected device.
    fn start(&mut self);

    /// Release the current connection. Safe to call at any time, also without a connection.
    fn disconnect(&mut self);

    /// Release the connection and stop producing events for good. Idempotent.
    fn close(&mut self);

    fn state(&self) -> ConnectionState;
}
