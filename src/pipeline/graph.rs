//! Build-time graph construction.
//!
//! All topology is declared here. [`GraphBuilder::build`] hands the nodes,
//! edges and schedule to a [`Scheduler`], which has no way to change them.

use crate::model::Timestamp;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::id::{EdgeId, NodeId};
use crate::pipeline::node::Node;
use crate::pipeline::port::{kinds, PortDirection};
use crate::pipeline::scheduler::{NodeSlot, Scheduler};

/// A producer → consumer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
}

pub struct GraphBuilder {
    nodes: Vec<NodeSlot>,
    edges: Vec<Edge>,
    schedule: Vec<NodeId>,
    tick_rate_hz: u32,
    epoch: Option<Timestamp>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            schedule: Vec::new(),
            tick_rate_hz: 100,
            epoch: None,
        }
    }

    /// Target tick rate for [`Scheduler::run`]. `0` runs unthrottled with a
    /// short sleep between ticks.
    pub fn tick_rate_hz(mut self, hz: u32) -> Self {
        self.tick_rate_hz = hz;
        self
    }

    /// Wall-clock time that corresponds to scheduler time zero. Defaults to
    /// the moment [`build`](Self::build) is called.
    pub fn epoch(mut self, epoch: Timestamp) -> Self {
        self.epoch = Some(epoch);
        self
    }

    /// Add a node to the arena. Returns its NodeId.
    pub fn add_node<N: Node + 'static>(&mut self, node: N) -> NodeId {
        self.add_boxed(Box::new(node))
    }

    pub fn add_boxed(&mut self, node: Box<dyn Node>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeSlot::new(node));
        id
    }

    /// Connect the output of `from` to the input of `to`.
    ///
    /// Consumers of one producer receive its payloads in the order their
    /// edges were connected.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> PipelineResult<EdgeId> {
        let producer = self.slot(from)?;
        let consumer = self.slot(to)?;

        let emits = kinds(producer.node.ports(), PortDirection::Output);
        if emits.is_empty() {
            return Err(PipelineError::NotAProducer(producer.node.name().to_string()));
        }
        let accepts = kinds(consumer.node.ports(), PortDirection::Input);
        if accepts.is_empty() {
            return Err(PipelineError::NotAConsumer(consumer.node.name().to_string()));
        }
        if !emits.iter().any(|k| accepts.contains(k)) {
            return Err(PipelineError::PortMismatch {
                from: producer.node.name().to_string(),
                to: consumer.node.name().to_string(),
                emits,
                accepts,
            });
        }

        if self.edges.iter().any(|e| e.from == from && e.to == to) {
            return Err(PipelineError::DuplicateEdge { from, to });
        }
        if self.would_create_cycle(from, to) {
            return Err(PipelineError::CycleDetected { from, to });
        }

        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge { id, from, to });
        Ok(id)
    }

    /// Register `id` as a top-level node, ticked once per scheduler tick.
    /// Top-level nodes run in the order they were scheduled.
    pub fn schedule(&mut self, id: NodeId) -> PipelineResult<()> {
        self.slot(id)?;
        if self.schedule.contains(&id) {
            return Err(PipelineError::AlreadyScheduled(id));
        }
        self.schedule.push(id);
        Ok(())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn build(self) -> Scheduler {
        for (idx, slot) in self.nodes.iter().enumerate() {
            let id = NodeId(idx as u32);
            let fed = self.edges.iter().any(|e| e.to == id);
            if !fed && !self.schedule.contains(&id) {
                tracing::warn!(
                    "Node '{}' ({:?}) is neither scheduled nor fed by an edge and will never run",
                    slot.node.name(),
                    id
                );
            }
        }

        tracing::info!(
            "Graph built: {} nodes, {} edges, {} scheduled",
            self.nodes.len(),
            self.edges.len(),
            self.schedule.len()
        );

        Scheduler::new(
            self.nodes,
            &self.edges,
            self.schedule,
            self.tick_rate_hz,
            self.epoch.unwrap_or_else(Timestamp::now),
        )
    }

    fn slot(&self, id: NodeId) -> PipelineResult<&NodeSlot> {
        self.nodes
            .get(id.index())
            .ok_or(PipelineError::UnknownNode(id))
    }

    fn would_create_cycle(&self, from: NodeId, to: NodeId) -> bool {
        // If `to` can reach `from` through existing edges, adding from->to creates a cycle.
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![to];

        while let Some(current) = stack.pop() {
            if current == from {
                return true;
            }
            let idx = current.index();
            if idx >= self.nodes.len() || visited[idx] {
                continue;
            }
            visited[idx] = true;

            for edge in &self.edges {
                if edge.from == current {
                    stack.push(edge.to);
                }
            }
        }
        false
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::node::NodeContext;
    use crate::pipeline::payload::Payload;
    use crate::pipeline::port::{PortDescriptor, PortKind};

    static FRAME_OUT: &[PortDescriptor] = &[PortDescriptor::output("out", PortKind::Frame)];
    static UPDATE_IN: &[PortDescriptor] = &[PortDescriptor::input("in", PortKind::Update)];
    static UPDATE_THROUGH: &[PortDescriptor] = &[
        PortDescriptor::input("in", PortKind::Update),
        PortDescriptor::output("out", PortKind::Update),
    ];

    struct Stub(&'static [PortDescriptor]);

    impl Node for Stub {
        fn name(&self) -> &str {
            "stub"
        }

        fn ports(&self) -> &[PortDescriptor] {
            self.0
        }

        fn on_receive(&mut self, _payload: &Payload, _ctx: &mut NodeContext) {}
    }

    #[test]
    fn test_connect_checks_port_kinds() {
        let mut builder = GraphBuilder::new();
        let frames = builder.add_node(Stub(FRAME_OUT));
        let updates = builder.add_node(Stub(UPDATE_IN));

        assert!(matches!(
            builder.connect(frames, updates),
            Err(PipelineError::PortMismatch { .. })
        ));
        assert!(matches!(
            builder.connect(updates, frames),
            Err(PipelineError::NotAProducer(_))
        ));
    }

    #[test]
    fn test_connect_rejects_unknown_nodes() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node(Stub(UPDATE_THROUGH));
        assert_eq!(
            builder.connect(a, NodeId(9)),
            Err(PipelineError::UnknownNode(NodeId(9)))
        );
        assert_eq!(
            builder.schedule(NodeId(u32::MAX)),
            Err(PipelineError::UnknownNode(NodeId(u32::MAX)))
        );
    }

    #[test]
    fn test_cycle_detection() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node(Stub(UPDATE_THROUGH));
        let b = builder.add_node(Stub(UPDATE_THROUGH));
        let c = builder.add_node(Stub(UPDATE_THROUGH));

        builder.connect(a, b).unwrap();
        builder.connect(b, c).unwrap();
        assert_eq!(
            builder.connect(c, a),
            Err(PipelineError::CycleDetected { from: c, to: a })
        );
        assert_eq!(
            builder.connect(a, a),
            Err(PipelineError::CycleDetected { from: a, to: a })
        );
        assert_eq!(builder.edges().len(), 2);
    }

    #[test]
    fn test_duplicate_edge_and_schedule() {
        let mut builder = GraphBuilder::new();
        let a = builder.add_node(Stub(UPDATE_THROUGH));
        let b = builder.add_node(Stub(UPDATE_IN));
        builder.connect(a, b).unwrap();
        assert_eq!(
            builder.connect(a, b),
            Err(PipelineError::DuplicateEdge { from: a, to: b })
        );

        builder.schedule(a).unwrap();
        assert_eq!(builder.schedule(a), Err(PipelineError::AlreadyScheduled(a)));
    }
}
