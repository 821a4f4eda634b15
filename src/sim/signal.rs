use std::f64::consts::PI;

use crate::device::constants::{METER_MAX, RAW_MULTI_CHANNELS, RAW_SAMPLE_RANGE};
use crate::device::types::RawMulti;

/**
 * Nominal sample rate (Hz) of the simulated raw waveform. The waveform is computed against this
 * rate regardless of how fast samples are actually emitted.
 */
const RAW_SAMPLE_RATE: f64 = 512.0;

/// One batch of aggregate readings, as the headset sends them once per interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readings {
    pub poor_signal: i32,
    pub attention: i32,
    pub meditation: i32,
    pub blink: Option<i32>,
    pub heart_rate: i32,
}

fn meter(value: f64) -> i32 {
    (value.round() as i32).clamp(0, METER_MAX)
}

/// Deterministic readings for the `tick`th interval.
pub fn readings(tick: u64) -> Readings {
    let t = tick as f64;

    let poor_signal = if tick % 53 == 52 {
        200 // headset off
    }
    else if tick % 17 == 16 {
        26 // bad contact
    }
    else {
        0
    };

    let blink = if tick % 5 == 3 {
        Some(40 + ((tick * 37) % 60) as i32)
    }
    else {
        None
    };

    Readings {
        poor_signal,
        attention: meter(50.0 + 35.0 * (t / 9.0).sin() + 10.0 * (t / 2.3).sin()),
        meditation: meter(50.0 + 30.0 * (t / 11.0).cos() + 12.0 * (t / 3.7).sin()),
        blink,
        heart_rate: (68.0 + 6.0 * (t / 13.0).sin()).round() as i32,
    }
}

/// A raw sample: alpha and beta rhythm on top of a slow drift.
pub fn raw_sample(index: u64) -> i32 {
    let s = index as f64 / RAW_SAMPLE_RATE;
    let value = 600.0 * (2.0 * PI * 10.0 * s).sin()
        + 250.0 * (2.0 * PI * 21.0 * s).sin()
        + 120.0 * (2.0 * PI * 3.0 * s).sin();

    (value.round() as i32).clamp(-RAW_SAMPLE_RANGE, RAW_SAMPLE_RANGE)
}

/// Eight channels of the same waveform, each with its own phase and amplitude.
pub fn raw_multi(index: u64) -> RawMulti {
    let mut channels = [0; RAW_MULTI_CHANNELS];
    for (channel, value) in channels.iter_mut().enumerate() {
        let phase = index + channel as u64 * 7;
        *value = raw_sample(phase) / (channel as i32 + 1);
    }

    RawMulti { channels }
}
