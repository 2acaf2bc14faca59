use derive_more::Display;

/// The input tree cannot be turned into a [`TreeModel`](crate::TreeModel).
///
/// Validation covers the whole tree before anything is built, so a model
/// never exists in a partially valid state.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MalformedInputError {
    /// The input has no root element (e.g. JSON `null`).
    #[display(fmt = "input tree has no root")]
    MissingRoot,

    /// A node has no `name` field. `path` names the closest named ancestors.
    #[display(fmt = "node at {} has no name", path)]
    MissingName { path: String },

    /// A node has an empty `name`.
    #[display(fmt = "node at {} has an empty name", path)]
    EmptyName { path: String },

    /// The input is not valid JSON of the expected shape.
    #[display(fmt = "could not parse input tree: {}", _0)]
    Parse(String),

    /// The input could not be read.
    #[display(fmt = "could not read input tree: {}", _0)]
    Io(String),
}

impl std::error::Error for MalformedInputError {}

impl From<serde_json::Error> for MalformedInputError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            MalformedInputError::Io(err.to_string())
        } else {
            MalformedInputError::Parse(err.to_string())
        }
    }
}
