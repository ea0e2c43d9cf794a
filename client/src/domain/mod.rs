//! Pure business-rule computations. No I/O, no clock reads; every function
//! here is deterministic in its inputs.

pub mod attendance;
pub mod rent;
pub mod revenue;
