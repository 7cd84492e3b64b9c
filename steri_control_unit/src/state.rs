//! Sterilization cycle state machine.

pub mod machine;
