pub mod application;
pub mod open;
pub mod style;
pub mod subscription;
pub mod types;
