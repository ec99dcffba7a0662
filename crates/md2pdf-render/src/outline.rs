//! Document outline (the bookmark tree in a viewer's sidebar).
//!
//! Entries nest by heading level: each entry becomes a child of the closest
//! preceding entry with a smaller level, so an H2 sits under its H1 and an
//! H3 that follows an H1 directly still nests under that H1.
//!
//! printpdf keeps a single bookmark per page and writes them flat, so the
//! tree is written after serialisation: the saved bytes are reloaded with
//! lopdf and the catalog's `/Outlines` is replaced by one item per entry.

use lopdf::{dictionary, Document, Object, ObjectId};

use crate::{OutlineEntry, RenderError};

/// Parent of every entry, as an index into `entries`. `None` for top-level
/// items.
pub(crate) fn parents(entries: &[OutlineEntry]) -> Vec<Option<usize>> {
    let mut open: Vec<usize> = Vec::new();
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            while open
                .last()
                .is_some_and(|&top| entries[top].level >= entry.level)
            {
                open.pop();
            }
            let parent = open.last().copied();
            open.push(i);
            parent
        })
        .collect()
}

/// Sibling links and subtree sizes derived from [`parents`].
struct Tree {
    parents: Vec<Option<usize>>,
    top: Vec<usize>,
    children: Vec<Vec<usize>>,
    prev: Vec<Option<usize>>,
    next: Vec<Option<usize>>,
    descendants: Vec<usize>,
}

impl Tree {
    fn new(entries: &[OutlineEntry]) -> Self {
        let parents = parents(entries);
        let n = entries.len();
        let mut top = Vec::new();
        let mut children = vec![Vec::new(); n];
        for (i, parent) in parents.iter().enumerate() {
            match parent {
                Some(p) => children[*p].push(i),
                None => top.push(i),
            }
        }

        let mut prev = vec![None; n];
        let mut next = vec![None; n];
        for siblings in children.iter().chain(std::iter::once(&top)) {
            for pair in siblings.windows(2) {
                next[pair[0]] = Some(pair[1]);
                prev[pair[1]] = Some(pair[0]);
            }
        }

        // Children always come after their parent.
        let mut descendants = vec![0; n];
        for i in (0..n).rev() {
            descendants[i] = children[i].iter().map(|&c| 1 + descendants[c]).sum();
        }

        Self {
            parents,
            top,
            children,
            prev,
            next,
            descendants,
        }
    }
}

fn pdf_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(format!("outline: {e}"))
}

/// Rewrite `bytes` with an outline item for every entry.
pub(crate) fn attach(bytes: Vec<u8>, entries: &[OutlineEntry]) -> Result<Vec<u8>, RenderError> {
    if entries.is_empty() {
        return Ok(bytes);
    }

    let mut doc = Document::load_mem(&bytes).map_err(pdf_error)?;
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let Some(&last_page) = pages.last() else {
        return Err(RenderError::Pdf("outline: document has no pages".into()));
    };

    let tree = Tree::new(entries);
    let root = doc.new_object_id();
    let ids: Vec<ObjectId> = entries.iter().map(|_| doc.new_object_id()).collect();

    for (i, entry) in entries.iter().enumerate() {
        let page = pages.get(entry.page).copied().unwrap_or(last_page);
        let mut item = dictionary! {
            "Title" => Object::string_literal(entry.title.clone()),
            "Parent" => tree.parents[i].map_or(root, |p| ids[p]),
            "Dest" => vec![Object::Reference(page), "Fit".into()],
        };
        if let Some(p) = tree.prev[i] {
            item.set("Prev", ids[p]);
        }
        if let Some(n) = tree.next[i] {
            item.set("Next", ids[n]);
        }
        if let (Some(&first), Some(&last)) = (tree.children[i].first(), tree.children[i].last()) {
            item.set("First", ids[first]);
            item.set("Last", ids[last]);
            item.set("Count", tree.descendants[i] as i64);
        }
        doc.set_object(ids[i], item);
    }

    let mut outlines = dictionary! {
        "Type" => "Outlines",
        "Count" => entries.len() as i64,
    };
    if let (Some(&first), Some(&last)) = (tree.top.first(), tree.top.last()) {
        outlines.set("First", ids[first]);
        outlines.set("Last", ids[last]);
    }
    doc.set_object(root, outlines);

    let catalog = doc.catalog_mut().map_err(pdf_error)?;
    catalog.set("Outlines", root);
    catalog.set("PageMode", "UseOutlines");

    let mut out = Vec::with_capacity(bytes.len() + entries.len() * 128);
    doc.save_to(&mut out).map_err(pdf_error)?;
    Ok(out)
}
