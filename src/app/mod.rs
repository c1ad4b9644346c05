//! Main-loop side of the HAL.
//!
//! The interrupt HAL only records what happened; deciding what a tap
//! means belongs here.  [`service::TapToggle`] is the board demo: each
//! wake drains the register and flips an LED per recognised button.

pub mod service;
