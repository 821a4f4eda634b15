pub mod dispatcher;
pub mod slots;
pub mod types;
