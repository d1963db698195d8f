//! Versioned persistence of conversation entities.

mod registry;

pub use registry::{Envelope, RegistryError, SCHEMA_VERSION, SerializableRegistry};
