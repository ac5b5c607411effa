//! Database models split into domain-specific modules.

pub mod attendance;
pub mod compensation;
pub mod employee;
pub mod leave;

pub use attendance::*;
pub use compensation::*;
pub use employee::*;
pub use leave::*;
