//! Integration tests for builder function synchronization
//!
//! Each test builds a props interface, a component and a builder function,
//! runs `actualize` and checks the rendered builder. A second run must
//! always be a no-op.

use propflow_core::prelude::*;
use propflow_core::syntax::render_node;

struct Playground {
    tree: SyntaxTree,
    config: AnalysisConfig,
    component: ComponentDeclaration,
    props: Vec<NodeId>,
}

/// `interface PlaygroundProps : RProps { var ... }` plus `class Playground : RComponent<PlaygroundProps, RState>()`
fn playground(props: &[(&str, &str)]) -> Playground {
    let config = AnalysisConfig::default();
    let mut tree = SyntaxTree::new("Playground.kt");
    let props: Vec<NodeId> = props
        .iter()
        .map(|(name, ty)| tree.new_property(name, Some(Type::simple(*ty)), true))
        .collect();
    let interface = tree.new_interface("PlaygroundProps", vec![Type::simple("RProps")], &props);
    tree.add_top_level(interface);
    let base = Type::generic(
        "RComponent",
        vec![Type::simple("PlaygroundProps"), Type::simple("RState")],
    );
    let entry = tree.new_super_type_entry(base, Some(&[]));
    let class = tree.new_class("Playground", None, &[entry], &[]);
    tree.add_top_level(class);
    let component = ComponentDeclaration::from_class(&tree, class, &config).unwrap();
    Playground {
        tree,
        config,
        component,
        props,
    }
}

impl Playground {
    /// `fun RBuilder.playground(<params>, body: RHandler<PlaygroundProps> = {}) = child(Playground::class) { <statements>; body() }`
    fn builder(&mut self, params: &[(&str, &str)], statements: &[NodeId]) -> BuilderFunction {
        let tree = &mut self.tree;
        let mut parameters: Vec<NodeId> = params
            .iter()
            .map(|(name, ty)| tree.new_parameter(name, Some(Type::simple(*ty)), None))
            .collect();
        let handler = Type::generic("RHandler", vec![Type::simple("PlaygroundProps")]);
        parameters.push(tree.new_parameter("body", Some(handler), Some("{}")));

        let mut lines = Vec::with_capacity(statements.len() * 2 + 1);
        for &statement in statements {
            lines.push(statement);
            lines.push(tree.new_newline());
        }
        lines.push(tree.new_call("body", &[], None));
        let lambda = tree.new_lambda(&lines);
        let class_literal = tree.new_class_literal("Playground");
        let call = tree.new_call("child", &[class_literal], Some(lambda));
        let function = tree.new_function(
            Some("playground"),
            Some(Type::simple("RBuilder")),
            &parameters,
            call,
        );
        tree.add_top_level(function);
        BuilderFunction {
            component: self.component,
            function,
        }
    }

    fn assign(&mut self, field: &str) -> NodeId {
        self.tree.new_member_assignment("attrs", field, field)
    }

    fn actualize(&mut self, builder: &BuilderFunction) -> Result<usize, CodegenError> {
        actualize(&mut self.tree, builder, &self.config)
    }

    fn render_builder(&self, builder: &BuilderFunction) -> String {
        render_node(&self.tree, builder.function)
    }
}

#[test]
fn test_missing_field_is_inserted_after_its_predecessor() {
    let mut pg = playground(&[("x", "Int"), ("y", "String")]);
    let assign_x = pg.assign("x");
    let builder = pg.builder(&[("x", "Int")], &[assign_x]);

    assert_eq!(pg.actualize(&builder), Ok(2));
    assert_eq!(
        pg.render_builder(&builder),
        "fun RBuilder.playground(x: Int, y: String, body: RHandler<PlaygroundProps> = {}) = \
         child(Playground::class) {\n    attrs.x = x\n    attrs.y = y\n    body()\n}"
    );
    assert_eq!(pg.actualize(&builder), Ok(0));
}

#[test]
fn test_branch_only_assignment_counts_as_missing() {
    let mut pg = playground(&[("x", "Int")]);
    let condition = pg.tree.new_name_ref("flag");
    let assign_x = pg.assign("x");
    let branch = pg.tree.new_if(condition, &[assign_x], None);
    let builder = pg.builder(&[("x", "Int"), ("flag", "Boolean")], &[branch]);

    let gaps = {
        let fe = SourceFrontEnd::new(&pg.tree, &pg.config);
        builder.expression(&pg.tree).unwrap().gap_report(&fe).unwrap()
    };
    assert_eq!(gaps.missing_fields.len(), 1);
    assert_eq!(gaps.missing_fields[0].declaration, pg.props[0]);

    // the existing `x` parameter is reused, only the statement is added
    assert_eq!(pg.actualize(&builder), Ok(1));
    assert_eq!(
        pg.render_builder(&builder),
        "fun RBuilder.playground(x: Int, flag: Boolean, body: RHandler<PlaygroundProps> = {}) = \
         child(Playground::class) {\n    attrs.x = x\n    if (flag) {\n        attrs.x = x\n    }\n    body()\n}"
    );
    assert_eq!(pg.actualize(&builder), Ok(0));
}

#[test]
fn test_assignment_on_both_branches_is_not_missing() {
    let mut pg = playground(&[("x", "Int")]);
    let condition = pg.tree.new_name_ref("flag");
    let then_x = pg.assign("x");
    let else_x = pg.assign("x");
    let branch = pg.tree.new_if(condition, &[then_x], Some(&[else_x]));
    let builder = pg.builder(&[("x", "Int"), ("flag", "Boolean")], &[branch]);
    let before = render(&pg.tree);

    assert_eq!(pg.actualize(&builder), Ok(0));
    assert_eq!(render(&pg.tree), before);
}

#[test]
fn test_unknown_assignment_and_its_parameter_are_removed() {
    let mut pg = playground(&[("x", "Int")]);
    let assign_x = pg.assign("x");
    let assign_z = pg.assign("z");
    let builder = pg.builder(&[("x", "Int"), ("z", "Int")], &[assign_x, assign_z]);

    assert_eq!(pg.actualize(&builder), Ok(2));
    assert_eq!(
        pg.render_builder(&builder),
        "fun RBuilder.playground(x: Int, body: RHandler<PlaygroundProps> = {}) = \
         child(Playground::class) {\n    attrs.x = x\n    body()\n}"
    );
    assert!(!pg.tree.is_attached(assign_z));
    assert_eq!(pg.actualize(&builder), Ok(0));
}

#[test]
fn test_outdated_parameter_type_is_rewritten() {
    let mut pg = playground(&[("x", "String")]);
    let assign_x = pg.assign("x");
    let builder = pg.builder(&[("x", "Int")], &[assign_x]);

    assert_eq!(pg.actualize(&builder), Ok(1));
    let x = pg.tree.parameters(builder.function)[0];
    assert_eq!(pg.tree.written_type(x), Some(&Type::simple("String")));
    assert_eq!(pg.actualize(&builder), Ok(0));
}

#[test]
fn test_reused_parameter_gets_the_field_type() {
    let mut pg = playground(&[("x", "String")]);
    let builder = pg.builder(&[("x", "Int")], &[]);

    assert_eq!(pg.actualize(&builder), Ok(2));
    assert_eq!(
        pg.render_builder(&builder),
        "fun RBuilder.playground(x: String, body: RHandler<PlaygroundProps> = {}) = \
         child(Playground::class) {\n    attrs.x = x\n    body()\n}"
    );
    assert_eq!(pg.actualize(&builder), Ok(0));
}

#[test]
fn test_field_named_like_the_handler_gets_its_own_parameter() {
    let mut pg = playground(&[("body", "String")]);
    let builder = pg.builder(&[], &[]);

    // handler and its call are renamed, then the field parameter and statement are added
    assert_eq!(pg.actualize(&builder), Ok(4));
    assert_eq!(
        pg.render_builder(&builder),
        "fun RBuilder.playground(body: String, body1: RHandler<PlaygroundProps> = {}) = \
         child(Playground::class) {\n    attrs.body = body\n    body1()\n}"
    );
    assert_eq!(pg.actualize(&builder), Ok(0));
}

#[test]
fn test_inserted_fields_follow_declaration_order() {
    let mut pg = playground(&[("a", "Int"), ("b", "Int"), ("c", "Int")]);
    let assign_b = pg.assign("b");
    let builder = pg.builder(&[("b", "Int")], &[assign_b]);

    assert_eq!(pg.actualize(&builder), Ok(4));
    assert_eq!(
        pg.render_builder(&builder),
        "fun RBuilder.playground(a: Int, b: Int, c: Int, body: RHandler<PlaygroundProps> = {}) = \
         child(Playground::class) {\n    attrs.a = a\n    attrs.b = b\n    attrs.c = c\n    body()\n}"
    );
}

#[test]
fn test_generated_builder_is_up_to_date() {
    let mut pg = playground(&[("x", "Int"), ("y", "String")]);
    let builder = generate_builder_function(&mut pg.tree, pg.component, &pg.config).unwrap();

    insta::assert_snapshot!(render(&pg.tree), @r"
    interface PlaygroundProps : RProps {
        var x: Int
        var y: String
    }

    class Playground : RComponent<PlaygroundProps, RState>()

    fun RBuilder.playground(x: Int, y: String, body: RHandler<PlaygroundProps> = {}) = child(Playground::class) {
        attrs.x = x
        attrs.y = y
        body()
    }
    ");
    assert_eq!(pg.actualize(&builder), Ok(0));
}

#[test]
fn test_remove_field_drops_statement_and_parameter() {
    let mut pg = playground(&[("x", "Int"), ("y", "String")]);
    let builder = generate_builder_function(&mut pg.tree, pg.component, &pg.config).unwrap();
    let y = {
        let fe = SourceFrontEnd::new(&pg.tree, &pg.config);
        let interface = pg.component.find_props_interface(&fe).unwrap();
        analyze(&fe, &interface, None).fields[1].clone()
    };

    assert_eq!(remove_field(&mut pg.tree, &builder, &y, &pg.config), Ok(2));
    assert_eq!(
        pg.render_builder(&builder),
        "fun RBuilder.playground(x: Int, body: RHandler<PlaygroundProps> = {}) = \
         child(Playground::class) {\n    attrs.x = x\n    body()\n}"
    );
}

#[test]
fn test_errors_leave_the_tree_untouched() {
    let mut pg = playground(&[("x", "Int")]);
    let block = pg.tree.new_block(&[]);
    let function = pg
        .tree
        .new_function(Some("playground"), Some(Type::simple("RBuilder")), &[], block);
    pg.tree.add_top_level(function);
    let not_a_call = BuilderFunction {
        component: pg.component,
        function,
    };
    let before = render(&pg.tree);

    assert_eq!(
        pg.actualize(&not_a_call),
        Err(CodegenError::MissingConstructionCall(function))
    );
    assert_eq!(render(&pg.tree), before);

    pg.tree.detach(function);
    assert_eq!(pg.actualize(&not_a_call), Err(CodegenError::DetachedNode(function)));
}

#[test]
fn test_missing_props_interface_is_reported() {
    let config = AnalysisConfig::default();
    let mut tree = SyntaxTree::new("Plain.kt");
    let base = Type::generic("RComponent", vec![Type::simple("RProps"), Type::simple("RState")]);
    let entry = tree.new_super_type_entry(base, Some(&[]));
    let class = tree.new_class("Plain", None, &[entry], &[]);
    tree.add_top_level(class);
    let component = ComponentDeclaration::from_class(&tree, class, &config).unwrap();
    let builder = generate_builder_function(&mut tree, component, &config).unwrap();

    assert_eq!(
        actualize(&mut tree, &builder, &config),
        Err(CodegenError::MissingPropsInterface(class))
    );
}
