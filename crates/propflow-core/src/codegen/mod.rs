//! Source edits: builder synchronization, generation and component scaffolding

pub mod actualize;
pub mod component;
pub mod generator;
pub mod plan;

pub use actualize::{actualize, plan_actualize, remove_field, remove_unused_parameters};
pub use component::{
    create_field_interface, delete_interface, remove_props_constructor_argument,
    remove_props_constructor_argument_and_super_call, set_props_constructor_argument, set_type_argument,
    PROPS_PARAMETER,
};
pub use generator::{choose_body_parameter_name, generate_builder_function, BuilderFunctionGenerator};
pub use plan::{Anchor, Edit, EditPlan};
