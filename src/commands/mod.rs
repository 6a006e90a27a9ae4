//! CLI command implementations.

pub mod lookup;

pub use lookup::LookupCommand;
