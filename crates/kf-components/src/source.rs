//! Ideal voltage source.

use crate::common::{canonical_ends, check_finite};
use crate::error::ComponentResult;
use kf_core::units::Voltage;
use kf_graph::Direction;

/// A fixed EMF on the undirected edge between two nodes.
///
/// Created as `new(from, to, v)`: walking `from -> to` raises the potential
/// by `v`, walking back lowers it by `v`. The contribution never depends on
/// the current through the source.
#[derive(Debug, Clone)]
pub struct VoltageSource {
    name: String,
    start: String,
    end: String,
    value: Voltage,
    rise: Direction,
    kind: Option<String>,
}

impl VoltageSource {
    pub fn new(from: &str, to: &str, value: Voltage) -> ComponentResult<Self> {
        check_finite(value.value, "source voltage")?;
        let (start, end) = canonical_ends(from, to)?;
        let rise = if from == start {
            Direction::Forward
        } else {
            Direction::Reverse
        };
        Ok(Self {
            name: format!("{start}-{end}"),
            start,
            end,
            value,
            rise,
            kind: None,
        })
    }

    /// Attach a free-form type tag (e.g. `"Linear"`).
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    pub fn value(&self) -> Voltage {
        self.value
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn touches(&self, node: &str) -> bool {
        self.start == node || self.end == node
    }

    /// Potential change seen by a traversal walking this source in `direction`.
    pub fn delta_v_along(&self, direction: Direction) -> Voltage {
        if direction == self.rise {
            self.value
        } else {
            -self.value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kf_core::units::volt;

    #[test]
    fn polarity_follows_declared_order() {
        let ab = VoltageSource::new("a", "b", volt(16.0)).unwrap();
        assert_eq!(ab.delta_v_along(Direction::Forward).value, 16.0);
        assert_eq!(ab.delta_v_along(Direction::Reverse).value, -16.0);

        let ed = VoltageSource::new("e", "d", volt(32.0)).unwrap();
        assert_eq!(ed.name(), "d-e");
        assert_eq!(ed.delta_v_along(Direction::Reverse).value, 32.0);
    }

    #[test]
    fn kind_tag_is_optional() {
        let s = VoltageSource::new("a", "b", volt(1.0)).unwrap();
        assert_eq!(s.kind(), None);
        assert_eq!(s.with_kind("Linear").kind(), Some("Linear"));
    }
}
