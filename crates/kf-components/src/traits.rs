//! Core traits for element models.

/// A two-terminal element whose state is a signed flow.
///
/// The flow is a current in amperes for resistors and a volumetric flow
/// rate in m^3/s for pipes. Positive flow runs from `start` to `end`, where
/// `start` is the canonically smaller node name.
pub trait FlowElement {
    /// Canonical name, `start-end`.
    fn name(&self) -> &str;

    fn start(&self) -> &str;

    fn end(&self) -> &str;

    /// Current signed flow state.
    fn flow(&self) -> f64;

    /// Overwrite the flow state. Called on every residual evaluation.
    fn set_flow(&mut self, value: f64);

    fn touches(&self, node: &str) -> bool {
        self.start() == node || self.end() == node
    }

    /// This element's contribution to the net flow arriving at `node`.
    ///
    /// Flow leaves the start node and arrives at the end node. Nodes the
    /// element does not touch receive nothing.
    fn inflow_at(&self, node: &str) -> f64 {
        if node == self.start() {
            -self.flow()
        } else if node == self.end() {
            self.flow()
        } else {
            0.0
        }
    }
}
