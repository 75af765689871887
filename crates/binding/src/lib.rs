//! Contract bindings for the OP Stack contracts read by the withdrawal status core.
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod opstack;
