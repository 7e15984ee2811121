// Coordinators layer - Workflow orchestration
//
// Coordinators handle pure workflow orchestration by composing provider operations
// for specific API endpoints. They determine the sequence of operations without
// containing business logic themselves.

pub mod session_coordinator;

// Re-export coordinators for clean imports
pub use session_coordinator::SessionCoordinator;
