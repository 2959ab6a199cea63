pub mod write_gate;

pub use write_gate::{WriteGate, WriteGuard};
