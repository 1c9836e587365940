use super::response::{MenuNode, NodeShape};
use crate::error::{DsbError, Result};
use log::debug;

/// Collect the document URLs at the bottom of the menu tree.
///
/// Depth-first, in the order the nodes appear in the response. This order
/// is the order of the final output.
pub fn collect_leaves(items: &[MenuNode]) -> Result<Vec<String>> {
    let mut leaves = Vec::new();
    for item in items {
        walk(item, &mut leaves);
    }

    if leaves.is_empty() {
        return Err(DsbError::EmptyResult);
    }
    debug!("Found {} document references", leaves.len());

    Ok(leaves)
}

fn walk(node: &MenuNode, leaves: &mut Vec<String>) {
    match node.shape() {
        NodeShape::Leaf(detail) => leaves.push(detail.to_string()),
        NodeShape::Branch(children) => {
            for child in children {
                walk(child, leaves);
            }
        }
        NodeShape::Empty => {}
    }
}
