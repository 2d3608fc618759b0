/// Dependency tracing core: domain model, engine services, and the
/// replaceable ranking policy.
pub mod domain;
pub mod policies;
pub mod services;
