//! Reference circuit and pipe network as ready-made instances.

use kf_core::units::{m, mm, ohm, volt};
use kf_fluids::Fluid;

use crate::error::NetworkResult;
use crate::pipe::PipeNetwork;
use crate::resistor::ResistorNetwork;

/// Absolute roughness shared by every reference pipe [m].
pub const REFERENCE_ROUGHNESS_M: f64 = 0.00025;

/// Two-loop circuit with a single junction at `c`.
///
/// Sources: 16 V rising a -> b, 32 V rising d -> e. Branch `I1` runs
/// b -> c and d -> a, `I2` runs e -> c, `I3` runs c -> d.
pub fn reference_circuit() -> NetworkResult<ResistorNetwork> {
    let mut b = ResistorNetwork::builder();
    b.add_resistor("a", "d", ohm(4.0))
        .add_resistor("b", "c", ohm(2.0))
        .add_resistor("c", "d", ohm(2.0))
        .add_resistor("c", "e", ohm(5.0))
        .add_source("a", "b", volt(16.0), Some("Linear"))
        .add_source("d", "e", volt(32.0), Some("Linear"))
        .add_loop("L1", &["a", "b", "c", "d"])
        .add_loop("L2", &["c", "d", "e"])
        .add_branch("I1", &[("b", "c"), ("d", "a")])
        .add_branch("I2", &[("e", "c")])
        .add_branch("I3", &[("c", "d")])
        .add_junction("c");
    b.build()
}

/// Eight-node, ten-pipe water network with three loops.
///
/// 60 m^3/s enters at `a`; 30 leaves at `d` and 15 each at `f` and `h`.
pub fn reference_pipe_network() -> NetworkResult<PipeNetwork> {
    let mut b = PipeNetwork::builder(Fluid::water());
    let r = m(REFERENCE_ROUGHNESS_M);
    for (a, z, length, diameter) in [
        ("a", "b", 250.0, 300.0),
        ("a", "c", 100.0, 200.0),
        ("b", "e", 100.0, 200.0),
        ("c", "d", 125.0, 200.0),
        ("c", "f", 100.0, 150.0),
        ("d", "e", 125.0, 200.0),
        ("d", "g", 100.0, 150.0),
        ("e", "h", 100.0, 150.0),
        ("f", "g", 125.0, 250.0),
        ("g", "h", 125.0, 250.0),
    ] {
        b.add_pipe(a, z, m(length), mm(diameter), r)?;
    }
    b.add_loop("A", &["a-b", "b-e", "d-e", "c-d", "a-c"])
        .add_loop("B", &["c-d", "d-g", "f-g", "c-f"])
        .add_loop("C", &["d-e", "e-h", "g-h", "d-g"])
        .set_external_flow("a", 60.0)
        .set_external_flow("d", -30.0)
        .set_external_flow("f", -15.0)
        .set_external_flow("h", -15.0);
    b.build()
}
