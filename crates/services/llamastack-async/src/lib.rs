#![deny(warnings)]
#![deny(clippy::all)]
#![deny(missing_docs)]

//! # `llamastack-async`
//!
//! An async client for llama-stack style agent APIs, with streaming turn
//! accumulation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use llamastack_async::{Client, TurnAccumulator, drive};
//! use llamastack_async::types::agents::AgentConfig;
//! use llamastack_async::types::messages::TurnCreateRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new();
//!
//! let agent = client
//!     .agents()
//!     .create(AgentConfig {
//!         model: "meta-llama/Llama-3.2-3B-Instruct".into(),
//!         instructions: "You are a helpful assistant.".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! let session = client.agents().create_session(&agent.agent_id, "demo").await?;
//!
//! let stream = client
//!     .turns()
//!     .create_stream(
//!         &agent.agent_id,
//!         &session.session_id,
//!         TurnCreateRequest::from_user("Write a haiku about streams."),
//!     )
//!     .await?;
//!
//! let mut acc = TurnAccumulator::new(session.session_id.clone());
//! let message = drive(stream, &mut acc, |update| {
//!     print!("{}", update.content);
//! })
//! .await?;
//! println!("\nstop reason: {:?}", message.stop_reason);
//! # Ok(())
//! # }
//! ```
//!
//! ## Streaming model
//!
//! Server events arrive as an [`sse::EventStream`] of typed
//! [`TurnEvent`](types::events::TurnEvent)s. A [`TurnAccumulator`] folds them
//! into ordered content blocks and emits full-content
//! [`BlockUpdate`](types::messages::BlockUpdate)s, so a renderer can redraw a
//! block idempotently at any point. [`drive`] wires the two together and
//! finalizes the turn into a [`Message`](types::messages::Message).
//!
//! ## Authentication
//!
//! The client reads `LLAMA_STACK_BASE_URL` and `LLAMA_STACK_API_KEY` by
//! default. See [`StackConfig`] for per-provider credentials passed through
//! the provider-data header.

/// HTTP client implementation
pub mod client;
/// Configuration types for the client
pub mod config;
/// Client-side conversation history
pub mod conversation;
/// Error types
pub mod error;
/// Parallel fan-out over independent turns
pub mod fanout;
/// API resource implementations
pub mod resources;
/// Retry logic utilities
pub mod retry;
/// Server-sent events (streaming) support
pub mod sse;
/// Test support utilities (for use in tests)
#[doc(hidden)]
pub mod test_support;
/// Streaming turn accumulation
pub mod turn;
/// Request and response types
pub mod types;

pub use crate::client::Client;
pub use crate::config::{Config, StackConfig};
pub use crate::conversation::Conversation;
pub use crate::error::{ApiErrorObject, StackError};
pub use crate::fanout::fan_out;
pub use crate::turn::{TurnAccumulator, TurnStatus, ViolationPolicy, drive};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::types::agents::*;
    pub use crate::types::events::*;
    pub use crate::types::messages::*;
    pub use crate::{Client, Conversation, StackConfig, TurnAccumulator, TurnStatus, drive};
}
