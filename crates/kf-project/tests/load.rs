use approx::assert_relative_eq;
use kf_project::{
    Network, NetworkDef, ProjectError, SamplerOverride, TransitionDef, ValidationError,
    build_network, from_yaml_str,
};

const CIRCUIT: &str = include_str!("../../../demos/circuit.yaml");
const PIPES: &str = include_str!("../../../demos/pipes.yaml");

#[test]
fn demo_circuit_solves_to_reference_currents() {
    let project = from_yaml_str(CIRCUIT).unwrap();
    assert_eq!(project.network.kind(), "circuit");
    assert!(project.solver.is_none());

    let mut network = build_network(&project, SamplerOverride::FromFile).unwrap();
    let report = network.solve(&project.solve_options()).unwrap();
    assert_relative_eq!(report.value("I1").unwrap(), 12.0 / 13.0, epsilon = 1e-9);
    assert_relative_eq!(report.value("I2").unwrap(), 56.0 / 13.0, epsilon = 1e-9);
    assert_relative_eq!(report.value("I3").unwrap(), 68.0 / 13.0, epsilon = 1e-9);
}

#[test]
fn demo_pipes_carry_solver_and_sampler_settings() {
    let project = from_yaml_str(PIPES).unwrap();
    let options = project.solve_options();
    assert_eq!(options.initial_guess, Some(10.0));
    assert_eq!(options.newton.max_iterations, 200);
    match &project.network {
        NetworkDef::Pipes(def) => {
            assert_eq!(def.pipes.len(), 10);
            assert_eq!(def.transition, TransitionDef::Normal { seed: Some(7) });
        }
        other => panic!("expected pipes, got {}", other.kind()),
    }
}

#[test]
fn demo_pipes_balance_inflow_at_a() {
    let project = from_yaml_str(PIPES).unwrap();
    let mut network = build_network(&project, SamplerOverride::Mean).unwrap();
    network.solve(&project.solve_options()).unwrap();

    let Network::Pipes(pipes) = &network else {
        panic!("expected a pipe network");
    };
    let ab = pipes.pipe("a-b").unwrap().flow_rate().value;
    let ac = pipes.pipe("a-c").unwrap().flow_rate().value;
    assert!((ab + ac - 60.0).abs() < 1e-5);
    for node in pipes.net_node_flows() {
        assert!(node.value.abs() < 1e-5, "node {} nets {}", node.name, node.value);
    }
}

#[test]
fn fluid_and_roughness_default_when_omitted() {
    let yaml = r#"
network:
  kind: pipes
  pipes:
    - { a: a, b: b, length_m: 10.0, diameter_mm: 100.0 }
  external_flows:
    - { node: a, flow_m3s: 1.0 }
    - { node: b, flow_m3s: -1.0 }
"#;
    let project = from_yaml_str(yaml).unwrap();
    assert_eq!(project.version, 1);
    let NetworkDef::Pipes(def) = &project.network else {
        panic!("expected pipes");
    };
    assert_eq!(def.fluid.viscosity_pa_s, 0.00089);
    assert_eq!(def.fluid.density_kg_m3, 1000.0);
    assert_eq!(def.pipes[0].roughness_m, 0.00025);
    assert_eq!(def.transition, TransitionDef::Normal { seed: None });
}

#[test]
fn unknown_kind_is_a_yaml_error() {
    let yaml = "network:\n  kind: thermal\n";
    assert!(matches!(from_yaml_str(yaml), Err(ProjectError::Yaml(_))));
}

#[test]
fn unknown_solver_key_is_a_yaml_error() {
    let yaml = CIRCUIT.to_string() + "solver:\n  max_iters: 3\n";
    assert!(matches!(from_yaml_str(&yaml), Err(ProjectError::Yaml(_))));
}

#[test]
fn future_version_is_rejected() {
    let yaml = CIRCUIT.replace("version: 1", "version: 9");
    assert!(matches!(
        from_yaml_str(&yaml),
        Err(ProjectError::Validation(ValidationError::UnsupportedVersion { version: 9 }))
    ));
}

#[test]
fn nonpositive_resistance_is_rejected() {
    let yaml = CIRCUIT.replace("ohms: 4.0", "ohms: 0.0");
    match from_yaml_str(&yaml) {
        Err(ProjectError::Validation(ValidationError::InvalidValue { field, .. })) => {
            assert_eq!(field, "resistors[0].ohms");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn two_element_loops_are_rejected_with_their_location() {
    let yaml = CIRCUIT.replace("nodes: [c, d, e]", "nodes: [c, d]");
    match from_yaml_str(&yaml) {
        Err(ProjectError::Validation(ValidationError::InvalidValue { field, value, .. })) => {
            assert_eq!(field, "loops.L2.nodes");
            assert_eq!(value, "2");
        }
        other => panic!("unexpected {other:?}"),
    }

    let yaml = PIPES.replace("[c-d, d-g, f-g, c-f]", "[c-d, c-d]");
    match from_yaml_str(&yaml) {
        Err(ProjectError::Validation(ValidationError::InvalidValue { field, .. })) => {
            assert_eq!(field, "loops.B.pipes");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn branch_through_missing_resistor_is_rejected() {
    let yaml = CIRCUIT.replace("[[e, c]]", "[[e, a]]");
    match from_yaml_str(&yaml) {
        Err(ProjectError::Validation(ValidationError::MissingReference { name, context })) => {
            assert_eq!(name, "resistor e-a");
            assert_eq!(context, "branch I2");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn loop_through_missing_pipe_is_rejected() {
    let yaml = PIPES.replace("[c-d, d-g, f-g, c-f]", "[c-d, d-g, f-g, c-h]");
    match from_yaml_str(&yaml) {
        Err(ProjectError::Validation(ValidationError::MissingReference { name, context })) => {
            assert_eq!(name, "pipe c-h");
            assert_eq!(context, "loop B");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn duplicate_pipe_is_rejected_in_either_order() {
    let yaml = PIPES.replace("{ a: g, b: h,", "{ a: b, b: a,");
    assert!(matches!(
        from_yaml_str(&yaml),
        Err(ProjectError::Validation(ValidationError::DuplicateName { .. }))
    ));
}

#[test]
fn structural_problems_surface_from_the_network_builder() {
    // Dropping the junction leaves three branches for two equations.
    let yaml = CIRCUIT.replace("  junctions: [c]\n", "");
    let project = from_yaml_str(&yaml).unwrap();
    assert!(matches!(
        build_network(&project, SamplerOverride::FromFile),
        Err(ProjectError::Network(_))
    ));
}

#[test]
fn json_save_and_load_preserve_the_definition() {
    let project = from_yaml_str(PIPES).unwrap();
    let path = std::env::temp_dir().join(format!("kf-project-{}.json", std::process::id()));
    kf_project::save_json(&path, &project).unwrap();
    let loaded = kf_project::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, project);
}
