//! Static translation tables
//!
//! All tables in this module are immutable process-wide constants. They are
//! populated at compile time (or once at first access for derived indexes)
//! and never mutated during translation, so the whole pipeline stays
//! reentrant and safely callable from concurrent threads.

pub mod functions;
pub mod symbols;
pub mod units;

pub use functions::MATH_FUNCTIONS;
pub use symbols::{replace_symbols, GREEK_LETTERS, SPECIAL_SYMBOLS};
pub use units::{lookup_unit_case_insensitive, CONSTANTS, UNITS};
