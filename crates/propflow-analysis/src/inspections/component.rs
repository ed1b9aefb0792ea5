//! Component class inspection: constructor props, state initializers and the builder function

use super::Inspection;
use propflow_core::component::{ComponentDeclaration, StateInitFunction};
use propflow_core::diagnostics::{Diagnostic, DiagnosticCollector, FixAction, Severity};
use propflow_core::fields::analyze;
use propflow_core::frontend::FrontEnd;

#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentInspection;

impl Inspection for ComponentInspection {
    fn name(&self) -> &'static str {
        "component"
    }

    fn check(&self, front_end: &dyn FrontEnd, sink: &mut DiagnosticCollector) {
        let tree = front_end.tree();
        let config = front_end.config();

        for component in ComponentDeclaration::all(tree, config) {
            let class = component.class;
            if component.has_props(tree, config) && !component.is_props_passed_in_constructor(tree) {
                sink.report_once(
                    Diagnostic::new(class, "Props not passed to constructor", Severity::Warning)
                        .with_fix(FixAction::AddConstructorParameter { component: class }),
                );
            }

            check_state_init(front_end, component, sink);

            if component.find_builder_function(front_end).is_none() {
                let fix = FixAction::RegenerateBuilderFunction { component: class };
                sink.report_once(
                    Diagnostic::new(class, "Missed builder function", Severity::WeakWarning).with_fix(fix.clone()),
                );
                if let Some(props) = component.find_props_interface(front_end) {
                    sink.report_once(
                        Diagnostic::new(props.declaration, "Missed builder function", Severity::WeakWarning)
                            .with_fix(fix),
                    );
                }
            }
        }
    }
}

fn check_state_init(front_end: &dyn FrontEnd, component: ComponentDeclaration, sink: &mut DiagnosticCollector) {
    let tree = front_end.tree();
    let config = front_end.config();
    let initializers = component.find_state_init_functions(front_end);
    let (with_props, without_props): (Vec<StateInitFunction>, Vec<StateInitFunction>) = initializers
        .iter()
        .copied()
        .partition(|init| init.props_parameter.is_some());

    if !with_props.is_empty() && !without_props.is_empty() {
        for init in &initializers {
            sink.report_once(
                Diagnostic::new(
                    init.function,
                    "Both \"State.init\" and \"State.init(props)\" is overridden",
                    Severity::Warning,
                )
                .with_fix(FixAction::DeleteDeclaration { target: init.function }),
            );
        }
    }

    if initializers.is_empty() {
        let has_state_fields = component
            .find_state_interface(front_end)
            .is_some_and(|state| !analyze(front_end, &state, None).is_empty());
        if has_state_fields {
            sink.report_once(Diagnostic::new(
                component.class,
                "Component has state that should be initialized",
                Severity::Warning,
            ));
        }
    }

    if !with_props.is_empty() && !component.is_props_passed_in_constructor(tree) {
        let message = format!(
            "{} is not passed to component constructor",
            component.props_type_simple_name(tree, config)
        );
        for parameter in with_props.iter().filter_map(|init| init.props_parameter) {
            sink.report_once(
                Diagnostic::new(parameter, message.as_str(), Severity::Warning).with_fix(
                    FixAction::AddConstructorParameter {
                        component: component.class,
                    },
                ),
            );
        }
    }

    for init in &initializers {
        let missing = init.collect_missing_state_fields(front_end);
        for field in &missing {
            sink.report_once(Diagnostic::new(
                field.declaration,
                "Value is not initialized in component state init function",
                Severity::Warning,
            ));
        }
        if !missing.is_empty() {
            sink.report_once(Diagnostic::new(
                init.function,
                format!(
                    "All {} vars should be initialized",
                    component.state_type_simple_name(tree, config)
                ),
                Severity::Warning,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propflow_core::frontend::SourceFrontEnd;
    use propflow_core::{AnalysisConfig, NodeId, SyntaxTree, Type};

    struct Fixture {
        tree: SyntaxTree,
        class: NodeId,
        state_x: NodeId,
        state_y: NodeId,
        init: NodeId,
    }

    /// `class Counter : RComponent<RProps, CounterState>() { override fun CounterState.init() { x = 0 } }`
    fn counter(with_initializer: bool) -> Fixture {
        let mut tree = SyntaxTree::new("Counter.kt");
        let state_x = tree.new_property("x", Some(Type::simple("Int")), true);
        let state_y = tree.new_property("y", Some(Type::simple("Int")), true);
        let state = tree.new_interface("CounterState", vec![Type::simple("RState")], &[state_x, state_y]);
        tree.add_top_level(state);

        let x = tree.new_name_ref("x");
        let zero = tree.new_literal("0");
        let assign = tree.new_assign(x, zero);
        let body = tree.new_block(&[assign]);
        let init = tree.new_function(Some("init"), Some(Type::simple("CounterState")), &[], body);

        let base = Type::generic("RComponent", vec![Type::simple("RProps"), Type::simple("CounterState")]);
        let entry = tree.new_super_type_entry(base, Some(&[]));
        let members = if with_initializer { vec![init] } else { Vec::new() };
        let class = tree.new_class("Counter", None, &[entry], &members);
        tree.add_top_level(class);

        let builder_body = tree.new_block(&[]);
        let builder = tree.new_function(Some("counter"), Some(Type::simple("RBuilder")), &[], builder_body);
        tree.add_top_level(builder);
        Fixture {
            tree,
            class,
            state_x,
            state_y,
            init,
        }
    }

    fn run(tree: &SyntaxTree) -> Vec<Diagnostic> {
        let config = AnalysisConfig::default();
        let fe = SourceFrontEnd::new(tree, &config);
        let mut sink = DiagnosticCollector::new();
        ComponentInspection.check(&fe, &mut sink);
        sink.into_diagnostics()
    }

    #[test]
    fn test_state_without_initializer() {
        let fx = counter(false);
        let diagnostics = run(&fx.tree);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location, fx.class);
        assert_eq!(diagnostics[0].message, "Component has state that should be initialized");
    }

    #[test]
    fn test_partially_initialized_state() {
        let fx = counter(true);
        let diagnostics = run(&fx.tree);
        let located: Vec<_> = diagnostics
            .iter()
            .map(|d| (d.location, d.message.as_str()))
            .collect();
        assert_eq!(
            located,
            vec![
                (fx.state_y, "Value is not initialized in component state init function"),
                (fx.init, "All CounterState vars should be initialized"),
            ]
        );
        assert!(!located.iter().any(|(at, _)| *at == fx.state_x));
    }

    #[test]
    fn test_props_not_passed_and_missing_builder() {
        let mut tree = SyntaxTree::new("a.kt");
        let x = tree.new_property("x", Some(Type::simple("Int")), true);
        let props = tree.new_interface("FooProps", vec![Type::simple("RProps")], &[x]);
        tree.add_top_level(props);
        let base = Type::generic("RComponent", vec![Type::simple("FooProps"), Type::simple("RState")]);
        let entry = tree.new_super_type_entry(base, None);
        let class = tree.new_class("Foo", None, &[entry], &[]);
        tree.add_top_level(class);

        let diagnostics = run(&tree);
        let located: Vec<_> = diagnostics
            .iter()
            .map(|d| (d.location, d.message.as_str(), d.severity))
            .collect();
        assert_eq!(
            located,
            vec![
                (class, "Props not passed to constructor", Severity::Warning),
                (class, "Missed builder function", Severity::WeakWarning),
                (props, "Missed builder function", Severity::WeakWarning),
            ]
        );
        assert_eq!(
            diagnostics[1].fixes,
            vec![FixAction::RegenerateBuilderFunction { component: class }]
        );
    }
}
