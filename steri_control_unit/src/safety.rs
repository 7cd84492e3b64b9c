//! Safety subsystem: door-release interlock chain and emergency stop latch.

pub mod estop;
pub mod interlock;
