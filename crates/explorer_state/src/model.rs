use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TreeNodeKind {
    Folder,
    File,
}

/// One node of the backend folder tree, as served by the file-explorer API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type")]
    pub kind: TreeNodeKind,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn is_file(&self) -> bool {
        self.kind == TreeNodeKind::File
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub path: String,
    pub name: String,
}

/// Active academic-year/semester scope qualifying which folder tree is browsed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AcademicContext {
    pub academic_year_id: Option<i64>,
    pub semester_id: Option<i64>,
    pub year_code: Option<String>,
    pub semester_type: Option<String>,
}

/// Full navigation state shared by every explorer UI surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExplorerState {
    pub context: AcademicContext,

    pub tree_root: Option<TreeNode>,
    pub current_node: Option<TreeNode>,
    pub current_path: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub expanded_paths: BTreeSet<String>,

    pub is_loading: bool,
    pub is_tree_loading: bool,
    pub is_file_list_loading: bool,

    pub error: Option<String>,
    pub last_updated: Option<u64>,
}

impl ExplorerState {
    pub fn has_context(&self) -> bool {
        self.context.academic_year_id.is_some() && self.context.semester_id.is_some()
    }

    pub fn is_any_loading(&self) -> bool {
        self.is_loading || self.is_tree_loading || self.is_file_list_loading
    }
}
