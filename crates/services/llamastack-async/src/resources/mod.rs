/// Agent and session management
pub mod agents;
/// Model listing
pub mod models;
/// Shield registration and listing
pub mod shields;
/// Turn creation, streaming and non-streaming
pub mod turns;
