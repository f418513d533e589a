/// Agent configuration and session types
pub mod agents;
/// Streamed turn events and their classification
pub mod events;
/// Messages, blocks, and turn request/response types
pub mod messages;
/// Model listing types
pub mod models;
/// Shield (safety classifier) types
pub mod shields;
