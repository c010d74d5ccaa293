//! Agent module - the travel planning workflow.
//!
//! The workflow alternates two nodes:
//! 1. A decision step consults the model with the tool schemas
//! 2. If the decision requests tools, the executor runs them and feeds the
//!    results back for another decision
//! 3. A decision with no tool calls is the final plan: the thread parks at
//!    an approval interrupt
//! 4. An explicit resume composes the plan into an email and delivers it

mod decision;
mod executor;
mod graph;
mod mailer;
mod prompt;

pub use graph::{RunSnapshot, TravelAgent, WorkflowError};
