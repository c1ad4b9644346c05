//! Debounce primitives and indicator outputs.

pub mod debounce;
pub mod indicator;
pub mod sw_timer;
