//! Pure lookup and traversal helpers over the explorer item tree.
//!
//! Paths are `/`-joined segment lists rooted below the (unnamed) root
//! folder, so a file `Token.sol` inside `contracts` has the path
//! `/contracts/Token.sol`.

use crate::project::{FileId, ItemType, ProjectItem};

/// Render a segment list as an absolute item path
pub fn path_to_string(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

/// Find the item at `path` below `root`, requiring the final segment to be
/// of the given type. Intermediate segments must be folders.
pub fn find_item_by_path<'a>(
    root: &'a ProjectItem,
    path: &[&str],
    item_type: ItemType,
) -> Option<&'a ProjectItem> {
    let (last, parents) = path.split_last()?;
    let mut current = root;
    for segment in parents {
        current = current
            .children
            .iter()
            .find(|child| child.item_type == ItemType::Folder && child.name == *segment)?;
    }
    current
        .children
        .iter()
        .find(|child| child.name == *last && child.item_type == item_type)
}

/// Depth-first visit of every item below `root` (the root itself is not
/// visited). The visitor receives each item together with its path segments.
pub fn traverse_tree<F>(root: &ProjectItem, mut visit: F)
where
    F: FnMut(&ProjectItem, &[String]),
{
    let mut segments = Vec::new();
    walk(root, &mut segments, &mut visit);
}

fn walk<F>(item: &ProjectItem, segments: &mut Vec<String>, visit: &mut F)
where
    F: FnMut(&ProjectItem, &[String]),
{
    for child in &item.children {
        segments.push(child.name.clone());
        visit(child, segments);
        walk(child, segments, visit);
        segments.pop();
    }
}

/// Full-traversal lookup of the absolute path of the item with the given id
pub fn path_of_item(root: &ProjectItem, id: &FileId) -> Option<String> {
    let mut found = None;
    traverse_tree(root, |item, segments| {
        if found.is_none() && item.id == *id {
            found = Some(path_to_string(segments));
        }
    });
    found
}
