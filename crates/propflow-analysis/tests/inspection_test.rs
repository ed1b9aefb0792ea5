//! End-to-end inspection tests: build a file, inspect it, apply the offered fix, inspect again

use propflow_analysis::prelude::*;
use propflow_core::diagnostics::{Diagnostic, FixAction, Severity};
use propflow_core::prelude::{AnalysisConfig, ComponentDeclaration, NodeId, SyntaxTree, Type};
use propflow_core::syntax::render_node;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Playground {
    tree: SyntaxTree,
    config: AnalysisConfig,
    props: NodeId,
    fields: Vec<NodeId>,
    class: NodeId,
}

/// Props interface plus `class Playground(props: PlaygroundProps) : RComponent<PlaygroundProps, RState>(props)`
fn playground(fields: &[(&str, &str)]) -> Playground {
    init_tracing();
    let config = AnalysisConfig::default();
    let mut tree = SyntaxTree::new("Playground.kt");
    let fields: Vec<NodeId> = fields
        .iter()
        .map(|(name, ty)| tree.new_property(name, Some(Type::simple(*ty)), true))
        .collect();
    let props = tree.new_interface("PlaygroundProps", vec![Type::simple("RProps")], &fields);
    tree.add_top_level(props);

    let parameter = tree.new_parameter("props", Some(Type::simple("PlaygroundProps")), None);
    let argument = tree.new_name_ref("props");
    let base = Type::generic(
        "RComponent",
        vec![Type::simple("PlaygroundProps"), Type::simple("RState")],
    );
    let entry = tree.new_super_type_entry(base, Some(&[argument]));
    let class = tree.new_class("Playground", Some(&[parameter]), &[entry], &[]);
    tree.add_top_level(class);
    Playground {
        tree,
        config,
        props,
        fields,
        class,
    }
}

impl Playground {
    /// `fun RBuilder.<name>(<params>, body) = child(Playground::class) { attrs.f = f ...; body() }`
    fn builder(&mut self, name: &str, params: &[(&str, &str)], assigned: &[&str]) -> NodeId {
        let tree = &mut self.tree;
        let mut parameters: Vec<NodeId> = params
            .iter()
            .map(|(name, ty)| tree.new_parameter(name, Some(Type::simple(*ty)), None))
            .collect();
        let handler = Type::generic("RHandler", vec![Type::simple("PlaygroundProps")]);
        parameters.push(tree.new_parameter("body", Some(handler), Some("{}")));
        let mut statements: Vec<NodeId> = assigned
            .iter()
            .map(|field| tree.new_member_assignment("attrs", field, field))
            .collect();
        statements.push(tree.new_call("body", &[], None));
        let lambda = tree.new_lambda(&statements);
        let class_literal = tree.new_class_literal("Playground");
        let call = tree.new_call("child", &[class_literal], Some(lambda));
        let function = tree.new_function(Some(name), Some(Type::simple("RBuilder")), &parameters, call);
        tree.add_top_level(function)
    }

    fn inspect(&self) -> Vec<Diagnostic> {
        inspect(&self.tree, &self.config)
    }

    fn apply(&mut self, fix: &FixAction) -> Result<(), FixError> {
        apply_fix(&mut self.tree, fix, &self.config)
    }
}

fn summary(diagnostics: &[Diagnostic]) -> Vec<(NodeId, &str, Severity)> {
    diagnostics
        .iter()
        .map(|d| (d.location, d.message.as_str(), d.severity))
        .collect()
}

#[test]
fn test_missing_builder_field_is_reported_and_synchronized() -> anyhow::Result<()> {
    let mut pg = playground(&[("x", "Int"), ("y", "String")]);
    let builder = pg.builder("playground", &[("x", "Int")], &["x"]);

    let diagnostics = pg.inspect();
    assert_eq!(
        summary(&diagnostics),
        vec![
            (
                pg.fields[1],
                "Value is not initialized in component builder function",
                Severity::WeakWarning
            ),
            (builder, "All PlaygroundProps vars should be initialized", Severity::Warning),
            (pg.class, "Outdated builder function", Severity::WeakWarning),
        ]
    );
    let sync = FixAction::SynchronizeBuilderFunction {
        builder_function: builder,
    };
    assert!(diagnostics.iter().all(|d| d.fixes == vec![sync.clone()]));

    pg.apply(&sync)?;
    assert!(pg.inspect().is_empty());
    assert_eq!(
        render_node(&pg.tree, builder),
        "fun RBuilder.playground(x: Int, y: String, body: RHandler<PlaygroundProps> = {}) = \
         child(Playground::class) {\n    attrs.x = x\n    attrs.y = y\n    body()\n}"
    );
    Ok(())
}

#[test]
fn test_unknown_assignment_is_reported_at_props() -> anyhow::Result<()> {
    let mut pg = playground(&[("x", "Int")]);
    let builder = pg.builder("playground", &[("x", "Int"), ("z", "Int")], &["x", "z"]);

    let diagnostics = pg.inspect();
    assert_eq!(
        summary(&diagnostics),
        vec![
            (builder, "Builder function contains outdated assignments", Severity::Warning),
            (pg.class, "Outdated builder function", Severity::WeakWarning),
            (pg.props, "Builder function contains outdated assignments", Severity::WeakWarning),
        ]
    );

    pg.apply(&diagnostics[0].fixes[0])?;
    assert!(pg.inspect().is_empty());
    assert_eq!(pg.tree.parameters(builder).len(), 2);
    Ok(())
}

#[test]
fn test_outdated_parameter_type_is_reported() -> anyhow::Result<()> {
    let mut pg = playground(&[("x", "String")]);
    let builder = pg.builder("playground", &[("x", "Int")], &["x"]);

    let diagnostics = pg.inspect();
    assert_eq!(
        summary(&diagnostics),
        vec![
            (pg.fields[0], "Builder function has outdated parameter type", Severity::WeakWarning),
            (builder, "Builder function contains outdated parameter types", Severity::Warning),
            (pg.class, "Outdated builder function", Severity::WeakWarning),
        ]
    );

    pg.apply(&diagnostics[1].fixes[0])?;
    assert!(pg.inspect().is_empty());
    Ok(())
}

#[test]
fn test_construction_outside_builder_reports_at_callee() {
    let mut pg = playground(&[("x", "Int"), ("y", "String")]);
    pg.builder("playground", &[("x", "Int"), ("y", "String")], &["x", "y"]);

    let attrs = pg.tree.new_name_ref("attrs");
    let x = pg.tree.new_name_ref("x");
    let lhs = pg.tree.new_dot(attrs, x);
    let one = pg.tree.new_literal("1");
    let assign = pg.tree.new_assign(lhs, one);
    let lambda = pg.tree.new_lambda(&[assign]);
    let class_literal = pg.tree.new_class_literal("Playground");
    let call = pg.tree.new_call("child", &[class_literal], Some(lambda));
    let body = pg.tree.new_block(&[call]);
    let screen = pg
        .tree
        .new_function(Some("screen"), Some(Type::simple("RBuilder")), &[], body);
    pg.tree.add_top_level(screen);

    let diagnostics = pg.inspect();
    let callee = pg.tree.call_callee(call).unwrap();
    assert_eq!(
        summary(&diagnostics),
        vec![(callee, "All PlaygroundProps vars should be initialized", Severity::Warning)]
    );
    assert!(diagnostics[0].fixes.is_empty());
}

#[test]
fn test_misnamed_builder_is_renamed() -> anyhow::Result<()> {
    let mut pg = playground(&[("x", "Int")]);
    let builder = pg.builder("pg", &[("x", "Int")], &["x"]);

    let diagnostics = pg.inspect();
    let rename = diagnostics
        .iter()
        .find(|d| d.location == builder)
        .expect("rename diagnostic");
    assert_eq!(rename.message, "Component builder function should be named as \"playground\"");
    assert_eq!(
        rename.fixes,
        vec![FixAction::RenameIdentifier {
            target: builder,
            new_name: Some("playground".to_string()),
        }]
    );
    assert!(diagnostics
        .iter()
        .any(|d| d.location == pg.class && d.message == "Missed builder function"));

    let fix = rename.fixes[0].clone();
    pg.apply(&fix)?;
    assert!(pg.inspect().is_empty());
    Ok(())
}

#[test]
fn test_missing_builder_is_regenerated() -> anyhow::Result<()> {
    let mut pg = playground(&[("x", "Int")]);

    let diagnostics = pg.inspect();
    assert_eq!(
        summary(&diagnostics),
        vec![
            (pg.class, "Missed builder function", Severity::WeakWarning),
            (pg.props, "Missed builder function", Severity::WeakWarning),
        ]
    );
    pg.apply(&diagnostics[0].fixes[0])?;
    assert!(pg.inspect().is_empty());

    let component = ComponentDeclaration::from_class(&pg.tree, pg.class, &pg.config).unwrap();
    assert!(component
        .find_builder_function(&propflow_core::SourceFrontEnd::new(&pg.tree, &pg.config))
        .is_some());
    Ok(())
}

#[test]
fn test_deleting_a_prop_updates_the_builder() -> anyhow::Result<()> {
    let mut pg = playground(&[("x", "Int"), ("y", "String")]);
    let builder = pg.builder("playground", &[("x", "Int"), ("y", "String")], &["x", "y"]);
    assert!(pg.inspect().is_empty());

    let y = pg.fields[1];
    pg.apply(&FixAction::DeleteDeclaration { target: y })?;
    assert!(!pg.tree.is_attached(y));
    assert!(pg.inspect().is_empty());
    assert_eq!(
        render_node(&pg.tree, builder),
        "fun RBuilder.playground(x: Int, body: RHandler<PlaygroundProps> = {}) = \
         child(Playground::class) {\n    attrs.x = x\n    body()\n}"
    );
    Ok(())
}

#[test]
fn test_stale_fix_is_rejected() {
    let mut pg = playground(&[("x", "Int"), ("y", "String")]);
    let builder = pg.builder("playground", &[("x", "Int")], &["x"]);
    let fix = pg.inspect()[0].fixes[0].clone();

    pg.tree.detach(builder);
    assert_eq!(pg.apply(&fix), Err(FixError::StaleTarget(builder)));
}

#[test]
fn test_diagnostics_serialize() -> anyhow::Result<()> {
    let mut pg = playground(&[("x", "Int"), ("y", "String")]);
    pg.builder("playground", &[("x", "Int")], &["x"]);

    let diagnostics = pg.inspect();
    let json = serde_json::to_string(&diagnostics)?;
    let back: Vec<Diagnostic> = serde_json::from_str(&json)?;
    assert_eq!(back, diagnostics);
    Ok(())
}
