use partitioner_api::devicegraph::Device;

use super::{PageKind, PageNode, PageTree};

/// Depth-first, pre-order iterator over pages, descending into children and
/// nested pagers.
pub struct Walk<'a> {
    stack: Vec<&'a PageNode>,
}

impl<'a> Walk<'a> {
    pub(super) fn new(roots: &'a [PageNode]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a PageNode;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.stack.pop()?;
        self.stack.extend(page.sub_pages().iter().rev());
        self.stack.extend(page.children.iter().rev());
        Some(page)
    }
}

/// Returns the page representing the device.
///
/// Devices without a page of their own (grouped members, physical volumes,
/// devices of another graph) give `None`.
pub fn find_page<'a>(tree: &'a PageTree, device: &Device) -> Option<&'a PageNode> {
    tree.walk().find(|page| page.represents(device))
}

/// Returns the first page of the given kind.
pub fn find_page_by_kind(tree: &PageTree, kind: PageKind) -> Option<&PageNode> {
    tree.walk().find(|page| page.kind == kind)
}

pub fn find_page_by_id<'a>(tree: &'a PageTree, id: &str) -> Option<&'a PageNode> {
    tree.walk().find(|page| page.id == id)
}
