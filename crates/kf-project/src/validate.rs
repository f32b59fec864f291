//! Definition validation.
//!
//! These checks catch malformed documents with a precise location. The
//! structural checks (square systems, loop continuity, flow balance) run
//! again when the network itself is built.

use crate::schema::{CircuitDef, NetworkDef, PipeNetworkDef, Project};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

/// Shortest closed walk the network builders accept.
const MIN_LOOP_LEN: usize = 3;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing reference: {name} in {context}")]
    MissingReference { name: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    if let Some(solver) = &project.solver {
        if let Some(guess) = solver.initial_guess {
            require(guess.is_finite(), "solver.initial_guess", guess, "must be finite")?;
        }
        solver
            .newton
            .validate()
            .map_err(|e| ValidationError::InvalidValue {
                field: "solver.newton".to_string(),
                value: format!("{:?}", solver.newton),
                reason: e.to_string(),
            })?;
    }

    match &project.network {
        NetworkDef::Circuit(c) => validate_circuit(c),
        NetworkDef::Pipes(p) => validate_pipes(p),
    }
}

fn validate_circuit(circuit: &CircuitDef) -> Result<(), ValidationError> {
    let mut nodes: HashSet<&str> = HashSet::new();
    let mut pairs = HashSet::new();

    for (i, r) in circuit.resistors.iter().enumerate() {
        let field = format!("resistors[{i}]");
        distinct_ends(&r.a, &r.b, &field)?;
        require(
            r.ohms.is_finite() && r.ohms > 0.0,
            &format!("{field}.ohms"),
            r.ohms,
            "must be finite and > 0",
        )?;
        unique_pair(&mut pairs, &r.a, &r.b)?;
        nodes.extend([r.a.as_str(), r.b.as_str()]);
    }
    for (i, s) in circuit.sources.iter().enumerate() {
        let field = format!("sources[{i}]");
        distinct_ends(&s.from, &s.to, &field)?;
        require(
            s.volts.is_finite(),
            &format!("{field}.volts"),
            s.volts,
            "must be finite",
        )?;
        unique_pair(&mut pairs, &s.from, &s.to)?;
        nodes.extend([s.from.as_str(), s.to.as_str()]);
    }

    let mut loop_names = HashSet::new();
    for l in &circuit.loops {
        unique_name(&mut loop_names, &l.name, "loops")?;
        loop_len(l.nodes.len(), &format!("loops.{}.nodes", l.name))?;
        for n in &l.nodes {
            known(&nodes, n, &format!("loop {}", l.name))?;
        }
    }

    let resistor_pairs: HashSet<(&str, &str)> = circuit
        .resistors
        .iter()
        .map(|r| ordered(&r.a, &r.b))
        .collect();
    let mut branch_names = HashSet::new();
    for br in &circuit.branches {
        unique_name(&mut branch_names, &br.name, "branches")?;
        if br.legs.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("branches.{}.legs", br.name),
                value: "[]".to_string(),
                reason: "a branch drives at least one resistor".to_string(),
            });
        }
        for (from, to) in &br.legs {
            if !resistor_pairs.contains(&ordered(from, to)) {
                return Err(ValidationError::MissingReference {
                    name: format!("resistor {from}-{to}"),
                    context: format!("branch {}", br.name),
                });
            }
        }
    }

    for j in &circuit.junctions {
        known(&nodes, j, "junctions")?;
    }
    Ok(())
}

fn validate_pipes(def: &PipeNetworkDef) -> Result<(), ValidationError> {
    require(
        def.fluid.viscosity_pa_s.is_finite() && def.fluid.viscosity_pa_s > 0.0,
        "fluid.viscosity_pa_s",
        def.fluid.viscosity_pa_s,
        "must be finite and > 0",
    )?;
    require(
        def.fluid.density_kg_m3.is_finite() && def.fluid.density_kg_m3 > 0.0,
        "fluid.density_kg_m3",
        def.fluid.density_kg_m3,
        "must be finite and > 0",
    )?;
    if def.pipes.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "pipes".to_string(),
            value: "[]".to_string(),
            reason: "a pipe network needs at least one pipe".to_string(),
        });
    }

    let mut nodes: HashSet<&str> = HashSet::new();
    let mut pairs = HashSet::new();
    for (i, p) in def.pipes.iter().enumerate() {
        let field = format!("pipes[{i}]");
        distinct_ends(&p.a, &p.b, &field)?;
        require(
            p.length_m.is_finite() && p.length_m > 0.0,
            &format!("{field}.length_m"),
            p.length_m,
            "must be finite and > 0",
        )?;
        require(
            p.diameter_mm.is_finite() && p.diameter_mm > 0.0,
            &format!("{field}.diameter_mm"),
            p.diameter_mm,
            "must be finite and > 0",
        )?;
        require(
            p.roughness_m.is_finite() && p.roughness_m >= 0.0,
            &format!("{field}.roughness_m"),
            p.roughness_m,
            "must be finite and >= 0",
        )?;
        unique_pair(&mut pairs, &p.a, &p.b)?;
        nodes.extend([p.a.as_str(), p.b.as_str()]);
    }

    let mut loop_names = HashSet::new();
    for l in &def.loops {
        unique_name(&mut loop_names, &l.name, "loops")?;
        loop_len(l.pipes.len(), &format!("loops.{}.pipes", l.name))?;
        for name in &l.pipes {
            let found = name
                .split_once('-')
                .map(|(a, b)| pairs.contains(&owned_pair(a.trim(), b.trim())))
                .unwrap_or(false);
            if !found {
                return Err(ValidationError::MissingReference {
                    name: format!("pipe {name}"),
                    context: format!("loop {}", l.name),
                });
            }
        }
    }

    let mut flow_nodes = HashSet::new();
    for f in &def.external_flows {
        known(&nodes, &f.node, "external_flows")?;
        unique_name(&mut flow_nodes, &f.node, "external_flows")?;
        require(
            f.flow_m3s.is_finite(),
            &format!("external_flows.{}", f.node),
            f.flow_m3s,
            "must be finite",
        )?;
    }
    Ok(())
}

fn loop_len(len: usize, field: &str) -> Result<(), ValidationError> {
    if len < MIN_LOOP_LEN {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: len.to_string(),
            reason: format!("a loop needs at least {MIN_LOOP_LEN} elements"),
        });
    }
    Ok(())
}

fn require(ok: bool, field: &str, value: f64, reason: &str) -> Result<(), ValidationError> {
    if ok {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        })
    }
}

fn distinct_ends(a: &str, b: &str, field: &str) -> Result<(), ValidationError> {
    if a == b {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: format!("{a}-{b}"),
            reason: "both ends are the same node".to_string(),
        });
    }
    Ok(())
}

fn ordered<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

fn owned_pair(a: &str, b: &str) -> (String, String) {
    let (lo, hi) = ordered(a, b);
    (lo.to_string(), hi.to_string())
}

fn unique_pair(
    seen: &mut HashSet<(String, String)>,
    a: &str,
    b: &str,
) -> Result<(), ValidationError> {
    let pair = owned_pair(a, b);
    if !seen.insert(pair.clone()) {
        return Err(ValidationError::DuplicateName {
            name: format!("{}-{}", pair.0, pair.1),
            context: "elements".to_string(),
        });
    }
    Ok(())
}

fn unique_name<'a>(
    seen: &mut HashSet<&'a str>,
    name: &'a str,
    context: &str,
) -> Result<(), ValidationError> {
    if !seen.insert(name) {
        return Err(ValidationError::DuplicateName {
            name: name.to_string(),
            context: context.to_string(),
        });
    }
    Ok(())
}

fn known(nodes: &HashSet<&str>, name: &str, context: &str) -> Result<(), ValidationError> {
    if nodes.contains(name) {
        Ok(())
    } else {
        Err(ValidationError::MissingReference {
            name: format!("node {name}"),
            context: context.to_string(),
        })
    }
}
