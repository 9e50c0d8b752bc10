//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, TxtLookup)
//! but are themselves concrete structs, not traits.

mod document;
mod resolver;

pub use document::DocumentService;
pub use resolver::DidResolver;
