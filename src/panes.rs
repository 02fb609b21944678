//! Open-editor-pane state machine.
//!
//! State transitions are modeled as a pure reducer: given the current
//! [`PanesState`], a [`PaneEvent`] and a read-only view of the explorer
//! tree, [`reduce`] returns a fresh state. The input state is never mutated,
//! so the consuming event loop can keep previous states around (undo,
//! debugging) without copies being invalidated underneath it.
//!
//! Invariants maintained across every transition:
//! - file ids are unique across `items`
//! - at most one pane is flagged active, and a flagged pane's id equals
//!   `active_pane`

use crate::manifest::DappManifest;
use crate::project::{FileId, ItemType, ProjectItem};
use crate::tree::{find_item_by_path, path_of_item};
use serde_json::Value;

/// Name of the project manifest file, looked up at the tree root
pub const DAPPFILE_NAME: &str = "dappfile.json";

/// What a pane is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneType {
    /// A plain source file
    File,
    /// A contract's deployment configuration view
    Configuration,
}

/// Snapshot of the opened item carried by a pane
#[derive(Debug, Clone, PartialEq)]
pub struct PaneFile {
    pub id: FileId,
    pub name: String,
    pub code: Option<String>,
}

impl PaneFile {
    /// Snapshot a tree item for display in a pane
    pub fn from_item(item: &ProjectItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            code: item.code.clone(),
        }
    }
}

/// Deployment configuration shown by a [`PaneType::Configuration`] pane
#[derive(Debug, Clone, PartialEq)]
pub struct ContractConfiguration {
    pub name: String,
    /// Constructor arguments from the manifest, kept opaque
    pub arguments: Vec<Value>,
    pub other_contracts: Vec<String>,
    /// Path of the contract source within the project tree
    pub path: String,
}

/// One open editor tab
#[derive(Debug, Clone, PartialEq)]
pub struct Pane {
    pub file: PaneFile,
    pub active: bool,
    pub has_unsaved_changes: bool,
    pub pane_type: PaneType,
    /// Present only for configuration panes
    pub contract_configuration: Option<ContractConfiguration>,
}

/// The open-panes model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanesState {
    /// Id of the active pane's file, if any pane is flagged active
    pub active_pane: Option<FileId>,
    /// Open panes in display order
    pub items: Vec<Pane>,
}

/// Pane state transitions
#[derive(Debug, Clone)]
pub enum PaneEvent {
    /// Open the deployment configuration view for a contract source file
    OpenContractConfiguration { file: PaneFile },
    /// Open a file in an editor pane
    OpenFile { file: PaneFile },
    /// Close the pane showing the given file
    ClosePane { file_id: FileId },
    /// Close every pane except the one showing the given file
    CloseAllOtherPanes { file_id: FileId },
    /// Close every pane
    CloseAllPanes,
    /// A save completed; the pane's snapshot catches up to the saved content
    SaveFileSuccess { file_id: FileId, code: String },
    /// Mark or clear the unsaved-changes indicator on a pane
    SetUnsavedChanges {
        file_id: FileId,
        has_unsaved_changes: bool,
    },
    /// An explorer rename landed; propagate the new name to the open pane
    RenameItemSuccess { id: FileId, name: String },
    /// Reorder panes by relocating the pane at `from` to `to`
    MovePane { from: usize, to: usize },
}

/// Apply one event to the panes state, returning the next state.
///
/// Total: lookup misses (unknown pane id, absent or unreadable manifest, no
/// matching contract entry) leave the state unchanged rather than failing.
pub fn reduce(state: &PanesState, event: &PaneEvent, tree: &ProjectItem) -> PanesState {
    match event {
        PaneEvent::OpenContractConfiguration { file } => {
            open_contract_configuration(state, file, tree)
        }

        PaneEvent::OpenFile { file } => open_pane(state, file, PaneType::File, None),

        PaneEvent::ClosePane { file_id } => close_pane(state, file_id),

        PaneEvent::CloseAllOtherPanes { file_id } => {
            match state.items.iter().find(|p| p.file.id == *file_id) {
                Some(pane) => PanesState {
                    active_pane: state.active_pane.clone(),
                    items: vec![pane.clone()],
                },
                None => state.clone(),
            }
        }

        PaneEvent::CloseAllPanes => PanesState::default(),

        PaneEvent::SaveFileSuccess { file_id, code } => replace_matching(state, file_id, |pane| {
            let mut pane = pane.clone();
            pane.has_unsaved_changes = false;
            pane.file.code = Some(code.clone());
            pane
        }),

        PaneEvent::SetUnsavedChanges {
            file_id,
            has_unsaved_changes,
        } => replace_matching(state, file_id, |pane| {
            let mut pane = pane.clone();
            pane.has_unsaved_changes = *has_unsaved_changes;
            pane
        }),

        PaneEvent::RenameItemSuccess { id, name } => replace_matching(state, id, |pane| {
            let mut pane = pane.clone();
            pane.file.name = name.clone();
            pane
        }),

        PaneEvent::MovePane { from, to } => move_pane(state, *from, *to),
    }
}

fn open_contract_configuration(
    state: &PanesState,
    file: &PaneFile,
    tree: &ProjectItem,
) -> PanesState {
    let Some(dappfile) = find_item_by_path(tree, &[DAPPFILE_NAME], ItemType::File) else {
        tracing::debug!("project has no manifest, not opening configuration");
        return state.clone();
    };
    let Some(content) = dappfile.code.as_deref().filter(|code| !code.is_empty()) else {
        tracing::debug!("project manifest is empty, not opening configuration");
        return state.clone();
    };
    let manifest = match DappManifest::parse(content) {
        Ok(manifest) => manifest,
        Err(error) => {
            tracing::debug!(%error, "ignoring unreadable project manifest");
            return state.clone();
        }
    };

    let contract_path = path_of_item(tree, &file.id).unwrap_or_default();
    let Some(entry) = manifest.find_contract_by_source(&contract_path) else {
        tracing::debug!(
            path = %contract_path,
            "no contract entry for this source, not opening configuration"
        );
        return state.clone();
    };

    let configuration = ContractConfiguration {
        name: entry.name.clone(),
        arguments: entry.args.clone(),
        other_contracts: vec![String::new()],
        path: contract_path,
    };
    open_pane(state, file, PaneType::Configuration, Some(configuration))
}

/// Shared activate-or-insert logic behind both open events: deactivate every
/// pane, then reactivate the existing pane for this file in place or insert
/// a fresh one at the front of the list.
fn open_pane(
    state: &PanesState,
    file: &PaneFile,
    pane_type: PaneType,
    contract_configuration: Option<ContractConfiguration>,
) -> PanesState {
    let mut items: Vec<Pane> = state
        .items
        .iter()
        .map(|pane| Pane {
            active: false,
            ..pane.clone()
        })
        .collect();

    if let Some(existing) = items.iter_mut().find(|pane| pane.file.id == file.id) {
        existing.active = true;
    } else {
        items.insert(
            0,
            Pane {
                file: file.clone(),
                active: true,
                has_unsaved_changes: false,
                pane_type,
                contract_configuration,
            },
        );
    }

    PanesState {
        active_pane: Some(file.id.clone()),
        items,
    }
}

fn close_pane(state: &PanesState, file_id: &FileId) -> PanesState {
    let Some(removed_index) = state.items.iter().position(|p| p.file.id == *file_id) else {
        return state.clone();
    };

    let mut items = state.items.clone();
    let removed = items.remove(removed_index);
    let mut active_pane = state.active_pane.clone();

    if removed.active {
        if items.is_empty() {
            active_pane = None;
        } else {
            // Activate the pane that slid into the removed slot, or the new
            // last pane when the removed one was last.
            let next = removed_index.min(items.len() - 1);
            items[next].active = true;
            active_pane = Some(items[next].file.id.clone());
        }
    }

    PanesState { active_pane, items }
}

fn move_pane(state: &PanesState, from: usize, to: usize) -> PanesState {
    let mut items = state.items.clone();
    if !items.is_empty() {
        // Out-of-range indices are clamped rather than rejected.
        let from = from.min(items.len() - 1);
        let to = to.min(items.len() - 1);
        let pane = items.remove(from);
        items.insert(to, pane);
    }
    PanesState {
        active_pane: state.active_pane.clone(),
        items,
    }
}

fn replace_matching<F>(state: &PanesState, file_id: &FileId, update: F) -> PanesState
where
    F: Fn(&Pane) -> Pane,
{
    PanesState {
        active_pane: state.active_pane.clone(),
        items: state
            .items
            .iter()
            .map(|pane| {
                if pane.file.id == *file_id {
                    update(pane)
                } else {
                    pane.clone()
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_id(name: &str) -> FileId {
        FileId(name.to_string())
    }

    fn pane_file(name: &str) -> PaneFile {
        PaneFile {
            id: file_id(name),
            name: format!("{name}.sol"),
            code: Some(String::new()),
        }
    }

    fn empty_tree() -> ProjectItem {
        ProjectItem::folder(file_id("root"), "", vec![])
    }

    /// Tree with a manifest declaring a contract for /contracts/Token.sol
    fn tree_with_manifest(manifest: &str) -> ProjectItem {
        ProjectItem::folder(
            file_id("root"),
            "",
            vec![
                ProjectItem::file(file_id("dapp"), DAPPFILE_NAME, manifest),
                ProjectItem::folder(
                    file_id("contracts"),
                    "contracts",
                    vec![ProjectItem::file(file_id("token"), "Token.sol", "contract Token {}")],
                ),
            ],
        )
    }

    const TOKEN_MANIFEST: &str = r#"{
        "contracts": [
            { "source": "/contracts/Token.sol", "name": "Token", "args": ["1000"] }
        ]
    }"#;

    fn token_file() -> PaneFile {
        PaneFile::from_item(&ProjectItem::file(
            file_id("token"),
            "Token.sol",
            "contract Token {}",
        ))
    }

    fn open(state: &PanesState, name: &str) -> PanesState {
        reduce(
            state,
            &PaneEvent::OpenFile {
                file: pane_file(name),
            },
            &empty_tree(),
        )
    }

    #[test]
    fn test_open_file_inserts_new_pane_at_front() {
        let state = open(&PanesState::default(), "a");
        let state = open(&state, "b");

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].file.id, file_id("b"));
        assert_eq!(state.items[1].file.id, file_id("a"));
        assert!(state.items[0].active);
        assert!(!state.items[1].active);
        assert_eq!(state.active_pane, Some(file_id("b")));
        assert_eq!(state.items[0].pane_type, PaneType::File);
        assert!(state.items[0].contract_configuration.is_none());
        assert!(!state.items[0].has_unsaved_changes);
    }

    #[test]
    fn test_open_already_open_file_reactivates_in_place() {
        let state = open(&PanesState::default(), "a");
        let state = open(&state, "b");
        let state = open(&state, "a");

        // Same length and order, only the activation moved
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].file.id, file_id("b"));
        assert_eq!(state.items[1].file.id, file_id("a"));
        assert!(!state.items[0].active);
        assert!(state.items[1].active);
        assert_eq!(state.active_pane, Some(file_id("a")));
    }

    #[test]
    fn test_open_contract_configuration_builds_configuration_from_manifest() {
        let tree = tree_with_manifest(TOKEN_MANIFEST);
        let state = reduce(
            &PanesState::default(),
            &PaneEvent::OpenContractConfiguration { file: token_file() },
            &tree,
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.active_pane, Some(file_id("token")));
        let pane = &state.items[0];
        assert!(pane.active);
        assert_eq!(pane.pane_type, PaneType::Configuration);

        let configuration = pane.contract_configuration.as_ref().unwrap();
        assert_eq!(configuration.name, "Token");
        assert_eq!(configuration.path, "/contracts/Token.sol");
        assert_eq!(configuration.arguments, vec![serde_json::json!("1000")]);
        assert_eq!(configuration.other_contracts, vec![String::new()]);
    }

    #[test]
    fn test_open_contract_configuration_without_manifest_is_noop() {
        let tree = ProjectItem::folder(
            file_id("root"),
            "",
            vec![ProjectItem::file(file_id("token"), "Token.sol", "")],
        );
        let state = open(&PanesState::default(), "a");
        let next = reduce(
            &state,
            &PaneEvent::OpenContractConfiguration { file: token_file() },
            &tree,
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_open_contract_configuration_with_empty_manifest_is_noop() {
        let tree = tree_with_manifest("");
        let state = PanesState::default();
        let next = reduce(
            &state,
            &PaneEvent::OpenContractConfiguration { file: token_file() },
            &tree,
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_open_contract_configuration_with_malformed_manifest_is_noop() {
        let tree = tree_with_manifest("{ not json");
        let state = PanesState::default();
        let next = reduce(
            &state,
            &PaneEvent::OpenContractConfiguration { file: token_file() },
            &tree,
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_open_contract_configuration_without_matching_entry_is_noop() {
        let tree = tree_with_manifest(r#"{ "contracts": [] }"#);
        let state = PanesState::default();
        let next = reduce(
            &state,
            &PaneEvent::OpenContractConfiguration { file: token_file() },
            &tree,
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_open_contract_configuration_reactivates_existing_pane() {
        let tree = tree_with_manifest(TOKEN_MANIFEST);
        let state = reduce(
            &PanesState::default(),
            &PaneEvent::OpenContractConfiguration { file: token_file() },
            &tree,
        );
        let state = open(&state, "a");
        let state = reduce(
            &state,
            &PaneEvent::OpenContractConfiguration { file: token_file() },
            &tree,
        );

        // The existing configuration pane is reactivated, not duplicated
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].file.id, file_id("a"));
        assert!(!state.items[0].active);
        assert_eq!(state.items[1].file.id, file_id("token"));
        assert!(state.items[1].active);
        assert_eq!(state.active_pane, Some(file_id("token")));
        assert!(state.items[1].contract_configuration.is_some());
    }

    #[test]
    fn test_close_active_pane_activates_following_pane() {
        // items: [a(active), b] after opening b then a
        let state = open(&PanesState::default(), "b");
        let state = open(&state, "a");
        let state = reduce(
            &state,
            &PaneEvent::ClosePane {
                file_id: file_id("a"),
            },
            &empty_tree(),
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].file.id, file_id("b"));
        assert!(state.items[0].active);
        assert_eq!(state.active_pane, Some(file_id("b")));
    }

    #[test]
    fn test_close_active_last_pane_activates_new_last() {
        // items: [c, b, a]; make a (last) active, then close it
        let state = open(&PanesState::default(), "a");
        let state = open(&state, "b");
        let state = open(&state, "c");
        let state = open(&state, "a");
        let state = reduce(
            &state,
            &PaneEvent::ClosePane {
                file_id: file_id("a"),
            },
            &empty_tree(),
        );

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[1].file.id, file_id("b"));
        assert!(state.items[1].active);
        assert_eq!(state.active_pane, Some(file_id("b")));
    }

    #[test]
    fn test_close_last_remaining_pane_empties_state() {
        let state = open(&PanesState::default(), "a");
        let state = reduce(
            &state,
            &PaneEvent::ClosePane {
                file_id: file_id("a"),
            },
            &empty_tree(),
        );

        assert!(state.items.is_empty());
        assert_eq!(state.active_pane, None);
    }

    #[test]
    fn test_close_inactive_pane_keeps_active_selection() {
        let state = open(&PanesState::default(), "a");
        let state = open(&state, "b");
        let state = reduce(
            &state,
            &PaneEvent::ClosePane {
                file_id: file_id("a"),
            },
            &empty_tree(),
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].file.id, file_id("b"));
        assert!(state.items[0].active);
        assert_eq!(state.active_pane, Some(file_id("b")));
    }

    #[test]
    fn test_close_unknown_pane_is_noop() {
        let state = open(&PanesState::default(), "a");
        let next = reduce(
            &state,
            &PaneEvent::ClosePane {
                file_id: file_id("ghost"),
            },
            &empty_tree(),
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_close_all_other_panes_keeps_single_item() {
        let state = open(&PanesState::default(), "a");
        let state = open(&state, "b");
        let state = open(&state, "c");
        let state = reduce(
            &state,
            &PaneEvent::CloseAllOtherPanes {
                file_id: file_id("b"),
            },
            &empty_tree(),
        );

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].file.id, file_id("b"));
        // The transition itself does not force activation
        assert!(!state.items[0].active);
        assert_eq!(state.active_pane, Some(file_id("c")));
    }

    #[test]
    fn test_close_all_other_panes_on_active_pane() {
        let state = open(&PanesState::default(), "a");
        let state = open(&state, "b");
        let state = reduce(
            &state,
            &PaneEvent::CloseAllOtherPanes {
                file_id: file_id("b"),
            },
            &empty_tree(),
        );

        assert_eq!(state.items.len(), 1);
        assert!(state.items[0].active);
        assert_eq!(state.active_pane, Some(file_id("b")));
    }

    #[test]
    fn test_close_all_other_panes_unknown_id_is_noop() {
        let state = open(&PanesState::default(), "a");
        let next = reduce(
            &state,
            &PaneEvent::CloseAllOtherPanes {
                file_id: file_id("ghost"),
            },
            &empty_tree(),
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_close_all_panes_resets_to_initial_state() {
        let state = open(&PanesState::default(), "a");
        let state = open(&state, "b");
        let state = reduce(&state, &PaneEvent::CloseAllPanes, &empty_tree());
        assert_eq!(state, PanesState::default());
    }

    #[test]
    fn test_save_file_success_clears_unsaved_and_replaces_code() {
        let state = open(&PanesState::default(), "a");
        let state = reduce(
            &state,
            &PaneEvent::SetUnsavedChanges {
                file_id: file_id("a"),
                has_unsaved_changes: true,
            },
            &empty_tree(),
        );
        assert!(state.items[0].has_unsaved_changes);

        let state = reduce(
            &state,
            &PaneEvent::SaveFileSuccess {
                file_id: file_id("a"),
                code: "contract A {}".to_string(),
            },
            &empty_tree(),
        );

        assert!(!state.items[0].has_unsaved_changes);
        assert_eq!(state.items[0].file.code.as_deref(), Some("contract A {}"));
    }

    #[test]
    fn test_save_file_success_for_unknown_pane_is_noop() {
        let state = open(&PanesState::default(), "a");
        let next = reduce(
            &state,
            &PaneEvent::SaveFileSuccess {
                file_id: file_id("ghost"),
                code: "x".to_string(),
            },
            &empty_tree(),
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_rename_item_success_updates_file_name() {
        let state = open(&PanesState::default(), "a");
        let state = reduce(
            &state,
            &PaneEvent::RenameItemSuccess {
                id: file_id("a"),
                name: "Renamed.sol".to_string(),
            },
            &empty_tree(),
        );
        assert_eq!(state.items[0].file.name, "Renamed.sol");
    }

    #[test]
    fn test_move_pane_reorders_items() {
        // items: [c, b, a]
        let state = open(&PanesState::default(), "a");
        let state = open(&state, "b");
        let state = open(&state, "c");
        let state = reduce(
            &state,
            &PaneEvent::MovePane { from: 0, to: 2 },
            &empty_tree(),
        );

        let order: Vec<_> = state.items.iter().map(|p| p.file.id.clone()).collect();
        assert_eq!(order, vec![file_id("b"), file_id("a"), file_id("c")]);
        // Activation is untouched by reordering
        assert_eq!(state.active_pane, Some(file_id("c")));
        assert!(state.items[2].active);
    }

    #[test]
    fn test_move_pane_clamps_out_of_range_indices() {
        let state = open(&PanesState::default(), "a");
        let state = open(&state, "b");
        let state = reduce(
            &state,
            &PaneEvent::MovePane { from: 10, to: 0 },
            &empty_tree(),
        );

        let order: Vec<_> = state.items.iter().map(|p| p.file.id.clone()).collect();
        assert_eq!(order, vec![file_id("a"), file_id("b")]);
    }

    #[test]
    fn test_move_pane_on_empty_state_is_noop() {
        let state = PanesState::default();
        let next = reduce(
            &state,
            &PaneEvent::MovePane { from: 0, to: 1 },
            &empty_tree(),
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_reduce_leaves_previous_state_intact() {
        let state = open(&PanesState::default(), "a");
        let before = state.clone();
        let _ = reduce(
            &state,
            &PaneEvent::OpenFile {
                file: pane_file("b"),
            },
            &empty_tree(),
        );
        assert_eq!(state, before);
    }
}
