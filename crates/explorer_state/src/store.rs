//! Shared navigation state store with subscribe/notify broadcasting.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

use crate::model::{AcademicContext, Breadcrumb, ExplorerState, TreeNode};

/// Wall-clock unix milliseconds for `last_updated` stamps.
fn wall_clock_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};

        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

type Listener = Rc<dyn Fn(&ExplorerState)>;
type ErrorHook = Rc<dyn Fn(&str)>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Handle returned by [`ExplorerStateStore::subscribe`].
///
/// `unsubscribe` is idempotent; once called, the listener is guaranteed to
/// receive zero further notifications.
pub struct Subscription {
    registry: Rc<RefCell<ListenerRegistry>>,
    id: u64,
}

impl Subscription {
    /// Removes the listener this subscription registered.
    pub fn unsubscribe(&self) {
        self.registry
            .borrow_mut()
            .entries
            .retain(|(id, _)| *id != self.id);
    }
}

/// Single shared store for file-explorer navigation state.
///
/// The store is an explicitly constructed instance injected into consumers
/// (one per page), not an ambient global. All operations are synchronous:
/// mutate, stamp `last_updated`, then broadcast an independent copy of the new
/// state to every subscriber. A panicking listener is caught and reported
/// through the error hook without disturbing later listeners.
pub struct ExplorerStateStore {
    state: RefCell<ExplorerState>,
    listeners: Rc<RefCell<ListenerRegistry>>,
    error_hook: RefCell<ErrorHook>,
    last_stamp_ms: Cell<u64>,
}

impl Default for ExplorerStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerStateStore {
    /// Creates an empty store with the default (stderr) listener error hook.
    pub fn new() -> Self {
        Self {
            state: RefCell::new(ExplorerState::default()),
            listeners: Rc::new(RefCell::new(ListenerRegistry::default())),
            error_hook: RefCell::new(Rc::new(|message: &str| {
                eprintln!("explorer state listener failed: {message}");
            })),
            last_stamp_ms: Cell::new(0),
        }
    }

    /// Replaces the hook invoked when a listener panics during notification.
    pub fn set_listener_error_hook(&self, hook: impl Fn(&str) + 'static) {
        *self.error_hook.borrow_mut() = Rc::new(hook);
    }

    // ---- getters ----

    /// Returns a deep, independent copy of the current state.
    pub fn state(&self) -> ExplorerState {
        self.state.borrow().clone()
    }

    /// Returns the active academic context.
    pub fn context(&self) -> AcademicContext {
        self.state.borrow().context.clone()
    }

    /// Whether both an academic year and a semester are selected.
    pub fn has_context(&self) -> bool {
        self.state.borrow().has_context()
    }

    /// Returns the cached folder tree root, when loaded.
    pub fn tree_root(&self) -> Option<TreeNode> {
        self.state.borrow().tree_root.clone()
    }

    /// Returns the currently selected node, when any.
    pub fn current_node(&self) -> Option<TreeNode> {
        self.state.borrow().current_node.clone()
    }

    /// Returns the current navigation path.
    pub fn current_path(&self) -> String {
        self.state.borrow().current_path.clone()
    }

    /// Returns the breadcrumb trail.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.state.borrow().breadcrumbs.clone()
    }

    /// Whether the given tree path is expanded.
    pub fn is_node_expanded(&self, path: &str) -> bool {
        self.state.borrow().expanded_paths.contains(path)
    }

    /// Returns a copy of every expanded tree path.
    pub fn expanded_paths(&self) -> BTreeSet<String> {
        self.state.borrow().expanded_paths.clone()
    }

    /// Whether any loading flag is active.
    pub fn is_any_loading(&self) -> bool {
        self.state.borrow().is_any_loading()
    }

    /// Returns the current error message, when any.
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Returns the timestamp of the last state mutation.
    pub fn last_updated(&self) -> Option<u64> {
        self.state.borrow().last_updated
    }

    // ---- mutators ----

    /// Selects the academic year/semester scope.
    pub fn set_context(
        &self,
        academic_year_id: i64,
        semester_id: i64,
        year_code: &str,
        semester_type: &str,
    ) {
        self.mutate(|state| {
            state.context = AcademicContext {
                academic_year_id: Some(academic_year_id),
                semester_id: Some(semester_id),
                year_code: Some(year_code.to_string()),
                semester_type: Some(semester_type.to_string()),
            };
        });
    }

    /// Replaces the cached folder tree.
    pub fn set_tree_root(&self, tree_root: Option<TreeNode>) {
        self.mutate(|state| state.tree_root = tree_root);
    }

    /// Selects the current node and path.
    pub fn set_current_node(&self, node: Option<TreeNode>, path: &str) {
        self.mutate(|state| {
            state.current_node = node;
            state.current_path = path.to_string();
        });
    }

    /// Replaces the breadcrumb trail.
    pub fn set_breadcrumbs(&self, breadcrumbs: Vec<Breadcrumb>) {
        self.mutate(|state| state.breadcrumbs = breadcrumbs);
    }

    /// Sets the combined loading flag.
    pub fn set_loading(&self, is_loading: bool) {
        self.mutate(|state| state.is_loading = is_loading);
    }

    /// Sets the tree-pane loading flag.
    pub fn set_tree_loading(&self, is_loading: bool) {
        self.mutate(|state| state.is_tree_loading = is_loading);
    }

    /// Sets the file-list loading flag.
    pub fn set_file_list_loading(&self, is_loading: bool) {
        self.mutate(|state| state.is_file_list_loading = is_loading);
    }

    /// Records an error message.
    pub fn set_error(&self, error: impl Into<String>) {
        let error = error.into();
        self.mutate(|state| state.error = Some(error));
    }

    /// Clears any recorded error.
    pub fn clear_error(&self) {
        self.mutate(|state| state.error = None);
    }

    /// Marks a tree path expanded. Already-expanded paths do not notify.
    pub fn expand_node(&self, path: &str) {
        if self.state.borrow().expanded_paths.contains(path) {
            return;
        }
        self.mutate(|state| {
            state.expanded_paths.insert(path.to_string());
        });
    }

    /// Marks a tree path collapsed. Already-collapsed paths do not notify.
    pub fn collapse_node(&self, path: &str) {
        if !self.state.borrow().expanded_paths.contains(path) {
            return;
        }
        self.mutate(|state| {
            state.expanded_paths.remove(path);
        });
    }

    /// Flips a tree path's expansion state.
    pub fn toggle_node_expansion(&self, path: &str) {
        self.mutate(|state| {
            if !state.expanded_paths.remove(path) {
                state.expanded_paths.insert(path.to_string());
            }
        });
    }

    /// Collapses every expanded tree path.
    pub fn clear_expanded_nodes(&self) {
        self.mutate(|state| state.expanded_paths.clear());
    }

    /// Resets everything to initial values. Subscriptions stay registered and
    /// observe the reset as one notification.
    pub fn reset(&self) {
        *self.state.borrow_mut() = ExplorerState::default();
        self.notify();
    }

    /// Clears tree/node data and flags while preserving the academic context.
    pub fn reset_data(&self) {
        {
            let mut state = self.state.borrow_mut();
            let context = state.context.clone();
            *state = ExplorerState {
                context,
                ..ExplorerState::default()
            };
        }
        self.notify();
    }

    // ---- subscriptions ----

    /// Registers a listener invoked with a state copy after every mutation.
    pub fn subscribe(&self, listener: impl Fn(&ExplorerState) + 'static) -> Subscription {
        let mut registry = self.listeners.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.entries.push((id, Rc::new(listener)));
        Subscription {
            registry: Rc::clone(&self.listeners),
            id,
        }
    }

    /// Stamps are wall-clock ms, forced strictly increasing per store so
    /// `last_updated` always orders mutations even within one millisecond.
    fn next_timestamp_ms(&self) -> u64 {
        let next = wall_clock_ms().max(self.last_stamp_ms.get().saturating_add(1));
        self.last_stamp_ms.set(next);
        next
    }

    fn mutate(&self, apply: impl FnOnce(&mut ExplorerState)) {
        {
            let mut state = self.state.borrow_mut();
            apply(&mut state);
            state.last_updated = Some(self.next_timestamp_ms());
        }
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.state();
        // Snapshot the registry first so listeners registered mid-broadcast
        // only see the next notification.
        let entries: Vec<(u64, Listener)> = self.listeners.borrow().entries.clone();
        for (id, listener) in entries {
            let result = catch_unwind(AssertUnwindSafe(|| listener(&snapshot)));
            if result.is_err() {
                let hook = self.error_hook.borrow().clone();
                hook(&format!("listener {id} panicked during notification"));
            }
        }
    }
}
