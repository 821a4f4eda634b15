pub mod headset;
pub mod signal;
