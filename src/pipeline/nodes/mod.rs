//! Built-in node implementations.

pub mod adc_sampler;
pub mod barometer_sampler;
pub mod bridge_sink;
pub mod bus_reader;
pub mod dashboard_sink;
pub mod decoder;
pub mod imu_sampler;
pub mod log_sink;
pub mod serial_reader;

pub use adc_sampler::{default_channels, AdcChannel, AdcSamplerNode};
pub use barometer_sampler::BarometerSamplerNode;
pub use bridge_sink::BridgeSinkNode;
pub use bus_reader::{BusReaderNode, DEFAULT_FRAMES_PER_TICK};
pub use dashboard_sink::{DashboardHandle, DashboardSinkNode, DashboardStore, Reading};
pub use decoder::DecoderNode;
pub use imu_sampler::ImuSamplerNode;
pub use log_sink::{LogRecord, LogSinkNode};
pub use serial_reader::{SerialReaderNode, SerialStats};
