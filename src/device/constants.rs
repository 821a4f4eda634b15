/**
 * Number of channels in a multi-channel raw sample.
 */
pub const RAW_MULTI_CHANNELS: usize = 8;

/**
 * How many device events may be queued between the session task and the view.
 */
pub const EVENT_CHANNEL_SIZE: usize = 256;

/**
 * Default delay (milliseconds) between a connect request and its outcome.
 */
pub const CONNECT_DELAY: u64 = 1500;

/**
 * Default interval (milliseconds) between two batches of aggregate readings
 * (poor signal, attention, meditation, blink, heart rate). The headset reports these once per
 * second.
 */
pub const READING_INTERVAL: u64 = 1000;

/**
 * Default interval (milliseconds) between two raw samples. Real hardware samples at 512 Hz, the
 * simulated headset is slower so the view can keep up.
 */
pub const RAW_SAMPLE_INTERVAL: u64 = 20;

/**
 * Range of a raw sample, a signed 16 bit value on the wire. The simulated waveform stays inside
 * [-RAW_SAMPLE_RANGE, RAW_SAMPLE_RANGE].
 */
pub const RAW_SAMPLE_RANGE: i32 = 2048;

/**
 * Readings that are percentages (attention, meditation) are clamped to [0, METER_MAX].
 */
pub const METER_MAX: i32 = 100;
