//! State initializer overrides: `override fun S.init()` / `override fun S.init(props: P)`

use super::ComponentDeclaration;
use crate::dataflow::{CfgSolver, StateInitWriteMatcher};
use crate::fields::{analyze, Field};
use crate::frontend::FrontEnd;
use crate::syntax::NodeId;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateInitFunction {
    pub component: ComponentDeclaration,
    pub function: NodeId,
    /// The props parameter of the `init(props)` overload
    pub props_parameter: Option<NodeId>,
}

impl StateInitFunction {
    /// State fields not assigned on every path through the initializer
    pub fn collect_missing_state_fields(&self, front_end: &dyn FrontEnd) -> Vec<Field> {
        let tree = front_end.tree();
        let Some(interface) = self.component.find_state_interface(front_end) else {
            return Vec::new();
        };
        let fields = analyze(front_end, &interface, None).fields;
        let Some(pseudocode) = front_end.control_flow(self.function) else {
            debug!(function = ?self.function, "state initializer has no control flow");
            return fields;
        };
        let Some(state_type) = self.component.state_type(tree) else {
            return fields;
        };

        let matcher = StateInitWriteMatcher {
            function: self.function,
            state_type,
            fields: &fields,
        };
        let state = CfgSolver::new(&pseudocode, front_end, matcher).solve_sink();
        fields.iter().filter(|f| !state.contains(f)).cloned().collect()
    }
}
