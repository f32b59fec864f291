//! Linear resistor obeying Ohm's law.

use crate::common::{canonical_ends, check_finite, check_positive};
use crate::error::ComponentResult;
use crate::traits::FlowElement;
use kf_core::units::{Current, Resistance, Voltage, amp};
use kf_graph::Direction;

/// A resistor on the undirected edge between two nodes.
///
/// The current is signed relative to the canonical orientation: positive
/// current flows from `start` to `end`.
#[derive(Debug, Clone)]
pub struct Resistor {
    name: String,
    start: String,
    end: String,
    resistance: Resistance,
    current: Current,
}

impl Resistor {
    /// Create a resistor between `a` and `b` with zero initial current.
    pub fn new(a: &str, b: &str, resistance: Resistance) -> ComponentResult<Self> {
        check_positive(resistance.value, "resistance")?;
        let (start, end) = canonical_ends(a, b)?;
        Ok(Self {
            name: format!("{start}-{end}"),
            start,
            end,
            resistance,
            current: amp(0.0),
        })
    }

    pub fn resistance(&self) -> Resistance {
        self.resistance
    }

    pub fn current(&self) -> Current {
        self.current
    }

    pub fn set_current(&mut self, current: Current) -> ComponentResult<()> {
        check_finite(current.value, "current")?;
        self.current = current;
        Ok(())
    }

    /// Voltage drop `I * R` in the positive current direction.
    pub fn delta_v(&self) -> Voltage {
        self.current * self.resistance
    }

    /// Potential change seen by a traversal walking this resistor in `direction`.
    ///
    /// Walking with the positive current loses `I * R`; walking against it
    /// gains the same amount.
    pub fn delta_v_along(&self, direction: Direction) -> Voltage {
        -self.delta_v() * direction.sign()
    }
}

impl FlowElement for Resistor {
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
        self.current.value
    }

    fn set_flow(&mut self, value: f64) {
        self.current = amp(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kf_core::units::ohm;
    use proptest::prelude::*;

    #[test]
    fn name_is_canonical() {
        let r = Resistor::new("d", "a", ohm(4.0)).unwrap();
        assert_eq!(r.name(), "a-d");
        assert_eq!(r.start(), "a");
    }

    #[test]
    fn rejects_zero_resistance() {
        assert!(Resistor::new("a", "b", ohm(0.0)).is_err());
    }

    #[test]
    fn walking_with_current_drops_voltage() {
        let mut r = Resistor::new("a", "d", ohm(4.0)).unwrap();
        r.set_current(amp(2.0)).unwrap();
        assert_eq!(r.delta_v().value, 8.0);
        assert_eq!(r.delta_v_along(Direction::Forward).value, -8.0);
        assert_eq!(r.delta_v_along(Direction::Reverse).value, 8.0);
    }

    #[test]
    fn non_finite_current_rejected() {
        let mut r = Resistor::new("a", "d", ohm(4.0)).unwrap();
        assert!(r.set_current(amp(f64::NAN)).is_err());
    }

    proptest! {
        #[test]
        fn ohms_law_is_linear(i in -100.0f64..100.0, k in -10.0f64..10.0, r in 0.1f64..50.0) {
            let mut res = Resistor::new("a", "b", ohm(r)).unwrap();
            res.set_flow(i);
            let v1 = res.delta_v().value;
            res.set_flow(k * i);
            let v2 = res.delta_v().value;
            prop_assert!((v2 - k * v1).abs() <= 1e-9 * (1.0 + v2.abs()));
        }
    }
}
