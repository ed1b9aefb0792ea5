//! Structural types as computed by the front-end
//!
//! Types are compared structurally: two types are equal when their
//! constructor names, arguments and nullability agree. Constructor names
//! may be qualified (`react.RProps`); matching against framework names goes
//! through [`Type::is_class`], which compares simple names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (possibly generic, possibly nullable) type reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Type {
    pub name: String,
    pub args: Vec<Type>,
    pub nullable: bool,
}

impl Type {
    /// A type without arguments, e.g. `Int`
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            nullable: false,
        }
    }

    /// A generic type, e.g. `RComponent<P, S>`
    pub fn generic(name: impl Into<String>, args: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            args,
            nullable: false,
        }
    }

    pub fn into_nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Type argument at `index` (type-parameter projection)
    pub fn arg(&self, index: usize) -> Option<&Type> {
        self.args.get(index)
    }

    /// Last segment of the constructor name
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    /// Check whether the type constructor is the class `name` (qualified or not)
    pub fn is_class(&self, name: &str) -> bool {
        self.simple_name() == simple_name(name)
    }
}

/// Last segment of a dotted name
pub fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_generic_nullable() {
        let ty = Type::generic("RComponent", vec![Type::simple("MyProps"), Type::simple("RState")]);
        assert_eq!(ty.to_string(), "RComponent<MyProps, RState>");
        assert_eq!(Type::simple("String").into_nullable().to_string(), "String?");
    }

    #[test]
    fn test_is_class_ignores_package() {
        let ty = Type::simple("react.RProps");
        assert!(ty.is_class("RProps"));
        assert!(ty.is_class("react.RProps"));
        assert!(!ty.is_class("RState"));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(
            Type::generic("List", vec![Type::simple("Int")]),
            Type::generic("List", vec![Type::simple("Int")])
        );
        assert_ne!(Type::simple("Int"), Type::simple("Int").into_nullable());
    }
}
