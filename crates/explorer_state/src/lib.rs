//! Shared navigation state for the archive file explorer.
//!
//! [`ExplorerStateStore`] is the single source of truth for what the explorer
//! is showing: the selected academic context, the cached folder tree, the
//! current node and breadcrumb trail, expansion and loading flags. Consumers
//! subscribe for change notifications and receive independent state copies,
//! so no component can corrupt the store through a shared reference.

pub mod model;
pub mod store;

pub use model::{AcademicContext, Breadcrumb, ExplorerState, TreeNode, TreeNodeKind};
pub use store::{ExplorerStateStore, Subscription};
