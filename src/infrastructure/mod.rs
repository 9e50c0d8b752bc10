//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod dns;
pub mod error;
pub mod traits;

pub use dns::{DnsTxtLookup, ZoneTxtLookup};
pub use error::{InfraError, InfraResult};
