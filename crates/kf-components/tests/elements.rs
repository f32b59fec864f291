use std::sync::Arc;

use approx::assert_relative_eq;
use kf_components::{
    FlowElement, FlowRegime, MeanSampler, NormalSampler, Pipe, Resistor, VoltageSource, colebrook,
    darcy_friction_factor,
};
use kf_core::units::{m, mm, ohm, volt};
use kf_fluids::Fluid;
use kf_graph::Direction;

fn water() -> Arc<Fluid> {
    Arc::new(Fluid::water())
}

#[test]
fn pipes_share_one_fluid() {
    let fluid = water();
    let a = Pipe::new("a", "b", m(250.0), mm(300.0), m(0.00025), fluid.clone()).unwrap();
    let b = Pipe::new("a", "c", m(100.0), mm(200.0), m(0.00025), fluid.clone()).unwrap();
    assert_eq!(Arc::strong_count(&fluid), 3);
    assert_eq!(a.fluid(), b.fluid());
}

#[test]
fn turbulent_pipe_uses_colebrook_regardless_of_sampler() {
    let mut p = Pipe::new("c", "d", m(125.0), mm(200.0), m(0.00025), water()).unwrap();
    p.set_flow(0.03);
    assert_eq!(p.regime(), FlowRegime::Turbulent);
    let expected = colebrook(p.reynolds(), p.relative_roughness()).unwrap();
    let mut noisy = NormalSampler::seeded(11);
    assert_eq!(p.friction_factor(&mut noisy).unwrap(), expected);
}

#[test]
fn transitional_pipe_is_reproducible_with_a_seed() {
    let mut p = Pipe::new("c", "d", m(125.0), mm(200.0), m(0.00025), water()).unwrap();
    // Re = 3000 in a 200 mm water pipe.
    let v = 3000.0 * 0.00089 / (1000.0 * 0.2);
    p.set_flow(v * p.area().value);
    assert_eq!(p.regime(), FlowRegime::Transitional);

    let mut s1 = NormalSampler::seeded(5);
    let mut s2 = NormalSampler::seeded(5);
    let h1 = p.head_loss(&mut s1).unwrap();
    let h2 = p.head_loss(&mut s2).unwrap();
    assert_eq!(h1, h2);
}

#[test]
fn loop_of_resistor_and_source_balances_at_ohms_current() {
    // 16 V across 4 ohm, walked a -> b -> a.
    let src = VoltageSource::new("a", "b", volt(16.0)).unwrap();
    let mut r = Resistor::new("b", "a", ohm(4.0)).unwrap();
    r.set_flow(-4.0); // 4 A flowing b -> a
    let sum = src.delta_v_along(Direction::Forward) + r.delta_v_along(Direction::Reverse);
    assert_relative_eq!(sum.value, 0.0);
}

#[test]
fn laminar_boundary_is_deterministic() {
    let f = darcy_friction_factor(1500.0, 0.00125, &mut MeanSampler).unwrap();
    assert_eq!(f, 64.0 / 1500.0);
}
