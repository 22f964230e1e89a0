//! Dataflow core.
//!
//! Nodes are owned by a [`Scheduler`] in an arena and addressed by
//! [`NodeId`]. Producers emit [`Payload`]s that are delivered synchronously to
//! their consumers along edges declared once in a [`GraphBuilder`].
//!
//! # Architecture
//!
//! ```text
//! [BusReader] ──► [Decoder] ──► [LogSink]
//!                          ├──► [BridgeSink]
//!                          └──► [DashboardSink]
//! [SerialReader] ───────────► [LogSink] / [BridgeSink]
//! [Periodic<*Sampler>] ───────► [LogSink] / [BridgeSink] / [DashboardSink]
//! ```
//!
//! # Design
//!
//! - **Static topology**: edges are checked for payload kind and cycles at
//!   build time and cannot change afterwards.
//! - **No allocation on the hot path**: every payload is a fixed-size inline
//!   value and outboxes are reused between ticks.
//! - **Single thread**: hooks run to completion in a documented order, see
//!   [`scheduler`].

pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod nodes;
pub mod payload;
pub mod periodic;
pub mod port;
pub mod scheduler;

pub use error::{PipelineError, PipelineResult};
pub use graph::{Edge, GraphBuilder};
pub use id::{EdgeId, NodeId};
pub use node::{Clock, Node, NodeContext};
pub use payload::Payload;
pub use periodic::Periodic;
pub use port::{PortDescriptor, PortDirection, PortKind};
pub use scheduler::{NodeStats, Scheduler};
