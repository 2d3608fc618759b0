/// Ports module defining interfaces for hexagonal architecture
///
/// Only outbound (driven) ports exist here: the engine's inbound surface
/// is the application use cases themselves.
pub mod outbound;
