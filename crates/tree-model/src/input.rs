//! Nested input records as supplied by the host.

use serde::{Deserialize, Serialize};

use crate::error::MalformedInputError;

/// One element of the input tree: `{ "name": ..., "children": [...] }`.
///
/// `name` is optional at the serde level so that a missing name can be
/// reported as [`MalformedInputError::MissingName`] with a useful path
/// instead of a generic parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputNode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<InputNode>,
}

impl InputNode {
    /// Create a leaf record.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            children: Vec::new(),
        }
    }

    /// Create a record with children.
    pub fn with_children(name: impl Into<String>, children: Vec<InputNode>) -> Self {
        Self {
            name: Some(name.into()),
            children,
        }
    }

    /// Check every record below (and including) `self` for a usable name.
    pub(crate) fn validate(&self) -> Result<(), MalformedInputError> {
        // Visited records as (name, parent entry); paths are only built on error
        let mut visited: Vec<(&str, Option<usize>)> = Vec::new();
        let mut stack: Vec<(&InputNode, Option<usize>, usize)> = vec![(self, None, 0)];

        while let Some((node, parent, index)) = stack.pop() {
            let name = match node.name.as_deref() {
                Some(name) if !name.is_empty() => name,
                Some(_) => {
                    return Err(MalformedInputError::EmptyName {
                        path: error_path(&visited, parent, index),
                    })
                }
                None => {
                    return Err(MalformedInputError::MissingName {
                        path: error_path(&visited, parent, index),
                    })
                }
            };

            let entry = visited.len();
            visited.push((name, parent));
            for (index, child) in node.children.iter().enumerate().rev() {
                stack.push((child, Some(entry), index));
            }
        }

        Ok(())
    }
}

fn error_path(visited: &[(&str, Option<usize>)], parent: Option<usize>, index: usize) -> String {
    let Some(parent) = parent else {
        return "<root>".to_string();
    };

    let mut segments = vec![format!("[{index}]")];
    let mut current = Some(parent);
    while let Some(entry) = current {
        let (name, up) = visited[entry];
        segments.push(name.to_string());
        current = up;
    }
    segments.reverse();
    segments.join("/")
}
