//! # marine-gateway: NMEA 2000 instrumentation gateway
//!
//! A tick-driven dataflow core that turns bus traffic, serial sentences and
//! local sensor readings into provenance-tagged [`SensorUpdate`]s and fans
//! them out to logging, a wireless bridge and display pages.
//!
//! ## Architecture
//!
//! - **Drivers**: Polled hardware boundary (CAN, serial, ADC) behind traits,
//!   with a candump replay driver for running on a host
//! - **N2K**: CAN identifier codec, typed PGN messages and the
//!   [`ProtocolDecoder`] that maps them to [`SensorUpdate`]s
//! - **Pipeline**: Node arena, edges and a single-threaded [`Scheduler`] with
//!   depth-first synchronous delivery
//! - **Gateway**: The default graph wired from a [`GatewayConfig`]
//!
//! ## Configuration
//!
//! Settings are read from `gateway.toml` in the platform config directory
//! under `marine-gateway`, or from a path given on the command line.
//!
//! ## Example
//!
//! ```
//! use marine_gateway::model::{Quantity, SourceInput, Timestamp};
//! use marine_gateway::n2k::{N2kFrame, ProtocolDecoder};
//!
//! // Water depth 42.00 m below the transducer, no offset, SID 1.
//! let frame = N2kFrame::new(128267, 3, 0x23, &[1, 0x68, 0x10, 0, 0, 0xFF, 0x7F, 0xFF]);
//! let mut decoder = ProtocolDecoder::new();
//! let update = decoder.decode(SourceInput::Nmea2000, &frame, Timestamp::ZERO);
//! assert_eq!(update.get(Quantity::DepthBelowTransducer), Some(42.0));
//! ```

pub mod config;
pub mod drivers;
pub mod error;
pub mod gateway;
pub mod model;
pub mod n2k;
pub mod nmea0183;
pub mod pipeline;

// Re-export commonly used types
pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayIo, GatewayNodeIds};
pub use model::{Quantity, SensorUpdate, Source, SourceInput, Timestamp};
pub use n2k::{N2kFrame, ProtocolDecoder};
pub use pipeline::{GraphBuilder, Node, NodeContext, NodeId, Payload, Periodic, Scheduler};
