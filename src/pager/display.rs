//! Text rendering of page trees.

use std::fmt::{Display, Formatter, Result as FmtResult};

use super::{PageBinding, PageKind, PageNode, PageTree};

impl Display for PageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::System => write!(f, "system"),
            Self::Category(category) => write!(f, "category ({category})"),
            Self::Device(kind) => write!(f, "{kind}"),
            Self::DeviceGraph => write!(f, "device graph"),
            Self::Summary => write!(f, "summary"),
            Self::Settings => write!(f, "settings"),
        }
    }
}

fn write_page(f: &mut Formatter<'_>, page: &PageNode, depth: usize) -> FmtResult {
    write!(f, "{:indent$}{} [{}]", "", page.label, page.id, indent = depth * 2)?;
    if let PageBinding::Group(members) = &page.binding {
        write!(f, " ({} device(s))", members.len())?;
    }
    writeln!(f)?;

    for child in page.children.iter().chain(page.sub_pages()) {
        write_page(f, child, depth + 1)?;
    }
    Ok(())
}

impl Display for PageTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.roots
            .iter()
            .try_for_each(|page| write_page(f, page, 0))
    }
}
