use approx::assert_relative_eq;
use kf_core::units::{deg_c, kpa};
use kf_cycle::{CycleError, RankineCycle};
use kf_fluids::{Region, TabulatedSteam};

#[test]
fn saturated_inlet_case() {
    let table = TabulatedSteam::reference();
    let report = RankineCycle::new("Rankine Cycle Case i", kpa(8.0), kpa(8000.0))
        .analyze(&table)
        .unwrap();

    let [s1, s2, s3, s4] = &report.states;
    assert_relative_eq!(s1.state.h, 2758.0);
    assert_relative_eq!(s2.state.x, 0.6745, epsilon = 1e-4);
    assert_eq!(s2.state.region, Region::Saturated);
    assert_relative_eq!(s3.state.h, 173.88);
    assert_relative_eq!(s4.state.h, 181.936, epsilon = 1e-3);
    assert_eq!(s4.state.region, Region::CompressedLiquid);

    assert_relative_eq!(report.efficiency, 37.08, epsilon = 0.01);
}

#[test]
fn superheat_raises_efficiency() {
    let table = TabulatedSteam::reference();
    let saturated = RankineCycle::new("sat", kpa(8.0), kpa(8000.0))
        .analyze(&table)
        .unwrap();
    let superheated = RankineCycle::new("sup", kpa(8.0), kpa(8000.0))
        .with_superheat(deg_c(500.0))
        .analyze(&table)
        .unwrap();

    assert_relative_eq!(superheated.states[0].state.h, 3398.3);
    assert!(superheated.efficiency > saturated.efficiency);
    assert_relative_eq!(superheated.efficiency, 40.0, epsilon = 0.05);
}

#[test]
fn inlet_below_saturation_is_a_property_error() {
    let table = TabulatedSteam::reference();
    let err = RankineCycle::new("cold", kpa(8.0), kpa(8000.0))
        .with_superheat(deg_c(250.0))
        .analyze(&table)
        .unwrap_err();
    assert!(matches!(
        err,
        CycleError::Property {
            state: "Turbine Inlet",
            ..
        }
    ));
}

#[test]
fn summary_mentions_every_state() {
    let table = TabulatedSteam::reference();
    let report = RankineCycle::new("Case i", kpa(8.0), kpa(8000.0))
        .analyze(&table)
        .unwrap();
    let text = report.to_string();
    for label in ["Turbine Inlet", "Turbine Exit", "Pump Inlet", "Pump Exit"] {
        assert!(text.contains(label));
    }
    assert!(text.contains("Efficiency: 37.0"));
}
