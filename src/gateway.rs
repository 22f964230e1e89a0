//! Composition root for the default gateway graph.
//!
//! ```text
//! [BusReader] ──► [Decoder] ──► [LogSink] [BridgeSink] [DashboardSink]
//!      └─────────────────────────► [LogSink]  (log.raw_frames)
//! [SerialReader xN] ──────────► [LogSink] [BridgeSink]
//! [Periodic<AdcSampler>] ─────► [LogSink] [BridgeSink] [DashboardSink]
//! [Periodic<ImuSampler>] ─────► [LogSink] [BridgeSink] [DashboardSink]
//! [Periodic<BarometerSampler>] ► [LogSink] [BridgeSink] [DashboardSink]
//! ```
//!
//! Top-level nodes are scheduled in the order bus, serial lines, ADC, IMU,
//! barometer. Sinks are connected in the order log, bridge, dashboard.

use crate::config::GatewayConfig;
use crate::drivers::{AdcDriver, BarometerDriver, CanDriver, ImuDriver, SerialPort};
use crate::error::Result;
use crate::model::SourceInput;
use crate::pipeline::nodes::{
    AdcSamplerNode, BarometerSamplerNode, BridgeSinkNode, BusReaderNode, DashboardHandle,
    DashboardSinkNode, DecoderNode, ImuSamplerNode, LogSinkNode, SerialReaderNode,
};
use crate::pipeline::{GraphBuilder, NodeId, Periodic, Scheduler};
use crossbeam_channel::Sender;
use std::io::Write;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Everything outside the graph that the default nodes talk to.
pub struct GatewayIo {
    pub can: Box<dyn CanDriver>,
    pub serial: Vec<(SourceInput, Box<dyn SerialPort>)>,
    pub adc: Option<Box<dyn AdcDriver>>,
    pub imu: Option<Box<dyn ImuDriver>>,
    pub barometer: Option<Box<dyn BarometerDriver>>,
    /// Destination of the JSON-lines data log.
    pub data_log: Box<dyn Write>,
    /// Bounded queue drained by the bridge transport.
    pub bridge: Sender<String>,
}

/// Node IDs in the default graph, for stats lookups.
#[derive(Debug, Clone)]
pub struct GatewayNodeIds {
    pub bus_reader: NodeId,
    pub decoder: NodeId,
    pub serial_readers: Vec<NodeId>,
    pub adc_sampler: Option<NodeId>,
    pub imu_sampler: Option<NodeId>,
    pub baro_sampler: Option<NodeId>,
    pub log_sink: NodeId,
    pub bridge_sink: NodeId,
    pub dashboard_sink: NodeId,
}

pub struct Gateway {
    pub scheduler: Scheduler,
    pub nodes: GatewayNodeIds,
    pub dashboard: DashboardHandle,
}

impl Gateway {
    /// Wire the default graph. `running` is cleared when the CAN driver is
    /// exhausted.
    pub fn build(config: &GatewayConfig, io: GatewayIo, running: Arc<AtomicBool>) -> Result<Self> {
        let mut builder = GraphBuilder::new().tick_rate_hz(config.scheduler.tick_rate_hz);

        let bus_reader = builder.add_node(
            BusReaderNode::new(io.can)
                .with_frames_per_tick(config.scheduler.frames_per_tick)
                .with_shutdown(running),
        );
        let decoder = builder.add_node(DecoderNode::new(SourceInput::Nmea2000));

        let serial_readers: Vec<NodeId> = io
            .serial
            .into_iter()
            .map(|(input, port)| builder.add_node(SerialReaderNode::new(port, input)))
            .collect();

        let adc_sampler = io.adc.map(|adc| {
            builder.add_node(Periodic::new(
                AdcSamplerNode::new(adc, config.adc.channels.clone()),
                config.intervals.adc(),
            ))
        });
        let imu_sampler = io.imu.map(|imu| {
            builder.add_node(Periodic::new(ImuSamplerNode::new(imu), config.intervals.imu()))
        });
        let baro_sampler = io.barometer.map(|baro| {
            builder.add_node(Periodic::new(
                BarometerSamplerNode::new(baro),
                config.intervals.baro(),
            ))
        });
        let samplers: Vec<NodeId> = [adc_sampler, imu_sampler, baro_sampler]
            .into_iter()
            .flatten()
            .collect();

        let log_sink = builder.add_node(LogSinkNode::new(io.data_log));
        let bridge_sink = builder.add_node(BridgeSinkNode::new(io.bridge));
        let dashboard = DashboardSinkNode::new();
        let dashboard_handle = dashboard.handle();
        let dashboard_sink = builder.add_node(dashboard);

        // Raw frames are logged ahead of the update decoded from them.
        if config.log.raw_frames {
            builder.connect(bus_reader, log_sink)?;
        }
        builder.connect(bus_reader, decoder)?;
        for sink in [log_sink, bridge_sink, dashboard_sink] {
            builder.connect(decoder, sink)?;
        }
        for &reader in &serial_readers {
            builder.connect(reader, log_sink)?;
            builder.connect(reader, bridge_sink)?;
        }
        for &sampler in &samplers {
            for sink in [log_sink, bridge_sink, dashboard_sink] {
                builder.connect(sampler, sink)?;
            }
        }

        builder.schedule(bus_reader)?;
        for &node in serial_readers.iter().chain(&samplers) {
            builder.schedule(node)?;
        }

        let mut scheduler = builder.build();
        scheduler.set_stats_interval(config.intervals.stats());

        Ok(Self {
            scheduler,
            nodes: GatewayNodeIds {
                bus_reader,
                decoder,
                serial_readers,
                adc_sampler,
                imu_sampler,
                baro_sampler,
                log_sink,
                bridge_sink,
                dashboard_sink,
            },
            dashboard: dashboard_handle,
        })
    }
}
