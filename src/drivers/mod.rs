//! Actuator drivers, hardware initialisation, and interrupt glue.

pub mod buzzer;
pub mod hw_init;
pub mod hw_timer;
pub mod motion;
pub mod status_led;
