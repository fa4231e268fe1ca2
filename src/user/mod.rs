// Public API - what other modules can use
pub use registry::{InMemoryUsernameRegistry, UsernameRegistry};

// Internal modules
mod registry;
