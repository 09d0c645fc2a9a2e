//! Primality testing module
//!
//! Trial division with a selectable divisor-testing strategy and an
//! integer-exact square-root bound.

mod trial;

pub use trial::*;
