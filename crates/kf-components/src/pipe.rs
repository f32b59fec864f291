//! Pipe segment with Darcy-Weisbach friction.

use std::sync::Arc;

use crate::common::{EPSILON_FLOW, canonical_ends, check_finite, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::friction::{FlowRegime, darcy_friction_factor};
use crate::sampler::TransitionSampler;
use crate::traits::FlowElement;
use kf_core::numeric::sign_of;
use kf_core::units::{Area, Length, Velocity, VolumeRate, constants, m, m3ps};
use kf_fluids::Fluid;
use kf_graph::Direction;
use uom::si::area::square_meter;
use uom::si::velocity::meter_per_second;

/// Pipe between two nodes, carrying an incompressible fluid.
///
/// Area and relative roughness are fixed at construction. Velocity, Reynolds
/// number and head loss follow the current flow estimate, which the network
/// overwrites on every residual evaluation.
#[derive(Debug, Clone)]
pub struct Pipe {
    name: String,
    start: String,
    end: String,
    /// Pipe length
    pub length: Length,
    /// Inner diameter
    pub diameter: Length,
    /// Absolute surface roughness
    pub roughness: Length,
    area: Area,
    relative_roughness: f64,
    fluid: Arc<Fluid>,
    q: VolumeRate,
}

impl Pipe {
    /// Create a pipe joining `a` and `b` with zero initial flow.
    pub fn new(
        a: &str,
        b: &str,
        length: Length,
        diameter: Length,
        roughness: Length,
        fluid: Arc<Fluid>,
    ) -> ComponentResult<Self> {
        check_positive(length.value, "pipe length")?;
        check_positive(diameter.value, "pipe diameter")?;
        check_finite(roughness.value, "pipe roughness")?;
        if roughness.value < 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "pipe roughness",
            });
        }
        let (start, end) = canonical_ends(a, b)?;
        let d = diameter.value;
        Ok(Self {
            name: format!("{start}-{end}"),
            start,
            end,
            length,
            diameter,
            roughness,
            area: Area::new::<square_meter>(std::f64::consts::PI / 4.0 * d * d),
            relative_roughness: roughness.value / d,
            fluid,
            q: m3ps(0.0),
        })
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn relative_roughness(&self) -> f64 {
        self.relative_roughness
    }

    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    pub fn flow_rate(&self) -> VolumeRate {
        self.q
    }

    /// Mean velocity `Q / A`, signed like the flow.
    pub fn velocity(&self) -> Velocity {
        Velocity::new::<meter_per_second>(self.q.value / self.area.value)
    }

    /// Reynolds number `rho |V| D / mu`.
    pub fn reynolds(&self) -> f64 {
        let rho = self.fluid.density().value;
        let mu = self.fluid.viscosity().value;
        rho * self.velocity().value.abs() * self.diameter.value / mu
    }

    pub fn regime(&self) -> FlowRegime {
        FlowRegime::classify(self.reynolds())
    }

    pub fn friction_factor(&self, sampler: &mut dyn TransitionSampler) -> ComponentResult<f64> {
        darcy_friction_factor(self.reynolds(), self.relative_roughness, sampler)
    }

    /// Friction head loss `f L V^2 / (2 g)`, always non-negative.
    ///
    /// A stagnant pipe loses no head and never consults the friction model.
    pub fn head_loss(&self, sampler: &mut dyn TransitionSampler) -> ComponentResult<Length> {
        if self.q.value.abs() < EPSILON_FLOW {
            return Ok(m(0.0));
        }
        let f = self.friction_factor(sampler)?;
        let v = self.velocity().value;
        let hl = f * self.length.value * v * v / (2.0 * constants::G_MPS2);
        check_finite(hl, "head loss")?;
        Ok(m(hl))
    }

    /// Head loss seen by a traversal walking this pipe in `direction`.
    ///
    /// Positive when the walk follows the flow, negative against it.
    pub fn signed_head_loss(
        &self,
        direction: Direction,
        sampler: &mut dyn TransitionSampler,
    ) -> ComponentResult<f64> {
        let hl = self.head_loss(sampler)?;
        Ok(direction.sign() * sign_of(self.q.value) * hl.value)
    }

    /// Head loss seen by a traversal leaving node `from`.
    pub fn head_loss_from(
        &self,
        from: &str,
        sampler: &mut dyn TransitionSampler,
    ) -> ComponentResult<f64> {
        let direction = if from == self.start {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        self.signed_head_loss(direction, sampler)
    }
}

impl FlowElement for Pipe {
    fn name(&self) -> &str {
        &self.name
    }

    fn start(&self) -> &str {
        &self.start
    }

    fn end(&self) -> &str {
        &self.end
    }

    fn flow(&self) -> f64 {
        self.q.value
    }

    fn set_flow(&mut self, value: f64) {
        self.q = m3ps(value);
    }
}
