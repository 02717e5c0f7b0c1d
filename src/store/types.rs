//! Example resource types.

use serde::{Deserialize, Serialize};

/// Placeholder resource served by the CRUD routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Identifier, assigned by the store.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}

/// Fields required to create an [`Example`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewExample {
    pub name: String,
    pub description: String,
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExampleUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExampleUpdate {
    /// True when the update would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    pub(crate) fn apply(self, example: &mut Example) {
        if let Some(name) = self.name {
            example.name = name;
        }
        if let Some(description) = self.description {
            example.description = description;
        }
    }
}
