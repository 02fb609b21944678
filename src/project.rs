//! Project and explorer-tree model.
//!
//! The item tree is the unit shipped to the remote project store, so all of
//! these types serialize to the store's JSON wire shape.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a project item (file or folder)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub String);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of a project item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    File,
    Folder,
}

/// One node of the explorer tree
///
/// Files carry their content in `code`; folders carry `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub id: FileId,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProjectItem>,
}

impl ProjectItem {
    /// Create a file item with the given content
    pub fn file(id: FileId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            item_type: ItemType::File,
            name: name.into(),
            code: Some(code.into()),
            children: Vec::new(),
        }
    }

    /// Create a folder item
    pub fn folder(id: FileId, name: impl Into<String>, children: Vec<ProjectItem>) -> Self {
        Self {
            id,
            item_type: ItemType::Folder,
            name: name.into(),
            code: None,
            children,
        }
    }
}

/// A project as held by the remote store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    /// Root folder of the explorer tree
    pub files: ProjectItem,
}
