//! From-scratch builder function generation

use crate::component::{BuilderFunction, ComponentDeclaration};
use crate::config::AnalysisConfig;
use crate::error::CodegenError;
use crate::fields::{analyze, Field};
use crate::frontend::{FrontEnd, SourceFrontEnd};
use crate::syntax::{NodeId, SyntaxTree};
use crate::types::Type;
use tracing::debug;

/// Renders `fun RBuilder.foo(<fields>, body: RHandler<P> = {}) = child(Foo::class) { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderFunctionGenerator {
    pub function_name: String,
    pub component_name: String,
    pub fields: Vec<Field>,
    pub props_type: Type,
    pub body_parameter: String,
    receiver: Type,
    handler_type: String,
    construction_function: String,
    attrs_member: String,
}

impl BuilderFunctionGenerator {
    pub fn new(front_end: &dyn FrontEnd, component: ComponentDeclaration) -> Result<Self, CodegenError> {
        let tree = front_end.tree();
        let config = front_end.config();
        let component_name = component
            .name(tree)
            .ok_or(CodegenError::NotAComponent(component.class))?
            .to_string();
        let function_name = component
            .builder_function_name(tree)
            .ok_or(CodegenError::NotAComponent(component.class))?;
        let fields: Vec<Field> = component
            .find_props_interface(front_end)
            .map(|interface| analyze(front_end, &interface, None).fields)
            .unwrap_or_default()
            .into_iter()
            .filter(|field| field.name.is_some())
            .collect();
        let props_type = component
            .props_type(tree)
            .unwrap_or_else(|| Type::simple(config.props_base.clone()));
        let body_parameter = choose_body_parameter_name(&config.body_parameter, &fields);

        Ok(Self {
            function_name,
            component_name,
            fields,
            props_type,
            body_parameter,
            receiver: Type::simple(config.builder_receiver.clone()),
            handler_type: config.handler_type.clone(),
            construction_function: config.construction_function.clone(),
            attrs_member: config.attrs_member.clone(),
        })
    }

    /// Build the detached function subtree
    pub fn generate(&self, tree: &mut SyntaxTree) -> NodeId {
        let mut parameters = Vec::with_capacity(self.fields.len() + 1);
        let mut statements = Vec::with_capacity(self.fields.len() * 2 + 1);
        for field in &self.fields {
            let Some(name) = field.name.as_deref() else {
                continue;
            };
            parameters.push(tree.new_parameter(name, field.declared_type.clone(), None));
            statements.push(tree.new_member_assignment(&self.attrs_member, name, name));
            statements.push(tree.new_newline());
        }
        let handler = Type::generic(self.handler_type.clone(), vec![self.props_type.clone()]);
        parameters.push(tree.new_parameter(&self.body_parameter, Some(handler), Some("{}")));
        statements.push(tree.new_call(&self.body_parameter, &[], None));

        let lambda = tree.new_lambda(&statements);
        let class_literal = tree.new_class_literal(&self.component_name);
        let call = tree.new_call(&self.construction_function, &[class_literal], Some(lambda));
        tree.new_function(
            Some(self.function_name.as_str()),
            Some(self.receiver.clone()),
            &parameters,
            call,
        )
    }
}

/// `body`, or `body1`..`body9` while a field already uses the name
pub fn choose_body_parameter_name(base: &str, fields: &[Field]) -> String {
    let taken = |name: &str| fields.iter().any(|field| field.name.as_deref() == Some(name));
    let mut name = base.to_string();
    let mut i = 1;
    while taken(&name) && i < 10 {
        name = format!("{base}{i}");
        i += 1;
    }
    name
}

/// Generate the builder function of `component` and insert it right after the class
pub fn generate_builder_function(
    tree: &mut SyntaxTree,
    component: ComponentDeclaration,
    config: &AnalysisConfig,
) -> Result<BuilderFunction, CodegenError> {
    if !tree.is_attached(component.class) {
        return Err(CodegenError::DetachedNode(component.class));
    }
    let generator = BuilderFunctionGenerator::new(&SourceFrontEnd::new(tree, config), component)?;
    let function = generator.generate(tree);
    if !tree.insert_after(component.class, function) {
        return Err(CodegenError::DetachedNode(component.class));
    }
    debug!(
        component = %generator.component_name,
        function = %generator.function_name,
        fields = generator.fields.len(),
        "generated builder function"
    );
    Ok(BuilderFunction { component, function })
}
