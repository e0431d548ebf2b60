//! Startup errors raised while assembling the route table.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// The prefix is already bound to another view set.
    #[error("prefix '{0}' is already registered")]
    DuplicatePrefix(String),

    /// Two view sets would produce the same route names.
    #[error("basename '{0}' is already registered")]
    DuplicateBasename(String),

    #[error("invalid resource prefix '{0}'")]
    InvalidPrefix(String),

    #[error("method {0} cannot be routed")]
    UnsupportedMethod(String),
}
