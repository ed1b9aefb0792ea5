//! Error types

use crate::syntax::NodeId;
use thiserror::Error;

/// Preconditions a codegen request failed; the tree is left unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    #[error("builder function {0:?} has no parameter list")]
    MissingParameterList(NodeId),
    #[error("builder function {0:?} is not a construction call with a trailing lambda")]
    MissingConstructionCall(NodeId),
    #[error("construction call {0:?} has no lambda body")]
    MissingLambdaBody(NodeId),
    #[error("component {0:?} has no props interface")]
    MissingPropsInterface(NodeId),
    #[error("no control flow for {0:?}")]
    MissingControlFlow(NodeId),
    #[error("node {0:?} is not part of the tree")]
    DetachedNode(NodeId),
    #[error("{0:?} is not a component class")]
    NotAComponent(NodeId),
    #[error("component already has interface {0:?}")]
    InterfaceExists(NodeId),
    #[error("node {0:?} is neither a parameter nor a name reference")]
    NotRenamable(NodeId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config key `{0}` must not be empty")]
    EmptyName(&'static str),
}
