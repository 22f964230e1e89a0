//! ImuSampler node: attitude and compass heading from the inertial unit.
//!
//! Meant to run inside [`Periodic`](crate::pipeline::Periodic) at the IMU
//! interval, which is much shorter than the ADC and barometer intervals.

use crate::drivers::ImuDriver;
use crate::model::{Quantity, SensorUpdate, Source, SourceInput};
use crate::pipeline::node::{Node, NodeContext};
use crate::pipeline::port::{PortDescriptor, PortKind};
use std::f64::consts::{PI, TAU};

static PORTS: &[PortDescriptor] = &[PortDescriptor::output("updates", PortKind::Update)];

pub struct ImuSamplerNode<I> {
    driver: I,
    samples: u64,
    not_ready: u64,
}

impl<I: ImuDriver> ImuSamplerNode<I> {
    pub fn new(driver: I) -> Self {
        Self {
            driver,
            samples: 0,
            not_ready: 0,
        }
    }
}

impl<I: ImuDriver> Node for ImuSamplerNode<I> {
    fn name(&self) -> &str {
        "ImuSampler"
    }

    fn ports(&self) -> &[PortDescriptor] {
        PORTS
    }

    fn on_tick(&mut self, ctx: &mut NodeContext) {
        let Some(attitude) = self.driver.read_attitude() else {
            self.not_ready += 1;
            return;
        };

        let mut update = SensorUpdate::new(ctx.timestamp, Source::local(SourceInput::Imu), 3);
        if attitude.heel.is_finite() && attitude.heel.abs() <= PI {
            update.set(Quantity::Heel, attitude.heel);
        }
        if attitude.pitch.is_finite() && attitude.pitch.abs() <= PI / 2.0 {
            update.set(Quantity::Pitch, attitude.pitch);
        }
        // The IMU compass is uncorrected for variation.
        if let Some(heading) = attitude.heading.filter(|h| (0.0..TAU).contains(h)) {
            update.set(Quantity::HeadingMagnetic, heading);
        }

        if update.is_empty() {
            tracing::debug!("ImuSampler: attitude out of range: {:?}", attitude);
            return;
        }
        self.samples += 1;
        ctx.emit(update);
    }

    fn status(&self) -> Option<String> {
        Some(format!("samples={} not_ready={}", self.samples, self.not_ready))
    }
}
