//! Service layer for conversation orchestration.
//!
//! Services hold the domain rules and delegate all I/O to ports.

pub mod conversation_store;
pub mod orchestrator;
pub mod simulated_gateway;

pub use conversation_store::{ContinuationNotAllowed, ConversationStore, MAX_CONTINUATIONS};
pub use orchestrator::{
    AnalysisOutcome, CONTINUE_PREFIX, ChatOrchestrator, ContinueOutcome, ConversationSnapshot,
    OrchestratorError, PromptOutcome,
};
pub use simulated_gateway::SimulatedGateway;
