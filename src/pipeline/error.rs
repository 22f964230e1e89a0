//! Graph construction errors.
//!
//! Only building the graph can fail. Once a [`Scheduler`](super::Scheduler)
//! exists, nothing in the tick loop returns an error.

use crate::pipeline::id::NodeId;
use crate::pipeline::port::PortKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("Node '{0}' has no output port")]
    NotAProducer(String),

    #[error("Node '{0}' has no input port")]
    NotAConsumer(String),

    #[error("Port mismatch: '{from}' emits {emits:?}, '{to}' accepts {accepts:?}")]
    PortMismatch {
        from: String,
        to: String,
        emits: Vec<PortKind>,
        accepts: Vec<PortKind>,
    },

    #[error("Edge {from:?} -> {to:?} would create a cycle")]
    CycleDetected { from: NodeId, to: NodeId },

    #[error("Edge {from:?} -> {to:?} already exists")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("Node {0:?} is already scheduled")]
    AlreadyScheduled(NodeId),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
