//! Canonical formatting of generated source text.
//!
//! [`canonicalize`] is the last step of every render. It parses the raw text
//! as a Rust file and prints it back in one fixed style, so that the same
//! model always produces byte-identical output.
//!
//! ## Pipeline
//!
//! 1. **Import ordering**: every top-level `use` item is hoisted into a single
//!    import block right after the file's inner attributes. Grouped imports
//!    are flattened to one `use` per imported name, exact duplicates are
//!    dropped, and the block is split into three groups separated by a blank
//!    line:
//!    - standard library (`std`, `core`, `alloc`)
//!    - third-party and runtime crates
//!    - local paths (`crate`, `self`, `super`)
//!
//!    Within a group, imports are sorted by their path.
//! 2. **Style normalization**: the remaining items are printed with
//!    `prettyplease`; header, import block and body are joined with a single
//!    blank line and the result ends with exactly one newline.
//!
//! The function is pure and idempotent:
//! `canonicalize(&canonicalize(x)?)? == canonicalize(x)?`.

use std::cmp::Ordering;

use proc_macro2::Ident;
use syn::{File, Item, ItemUse, UseGlob, UseName, UsePath, UseRename, UseTree};

use crate::errors::FormattingError;

/// Formats raw Rust source into its canonical form.
///
/// ## Examples
///
/// ```
/// use schemagen_gen::canonical::canonicalize;
///
/// let formatted = canonicalize("use b::B; use a::A;").unwrap();
/// assert_eq!(formatted, "use a::A;\nuse b::B;\n");
/// ```
///
/// ## Errors
///
/// Returns [`FormattingError`] if `raw` is not a syntactically valid Rust file.
pub fn canonicalize(raw: &str) -> Result<String, FormattingError> {
    let file = syn::parse_file(raw)?;
    Ok(print_file(file))
}

fn print_file(file: File) -> String {
    let File {
        shebang,
        attrs,
        items,
    } = file;

    let mut imports = Vec::new();
    let mut body = Vec::new();
    for item in items {
        match item {
            Item::Use(item_use) => imports.push(item_use),
            other => body.push(other),
        }
    }

    let header = prettyplease::unparse(&File {
        shebang,
        attrs,
        items: Vec::new(),
    });
    let import_block = print_imports(imports);
    let body = prettyplease::unparse(&File {
        shebang: None,
        attrs: Vec::new(),
        items: body,
    });

    join_sections(&[header, import_block, body])
}

fn join_sections(sections: &[String]) -> String {
    let parts: Vec<&str> = sections
        .iter()
        .map(|section| section.trim_end())
        .filter(|section| !section.is_empty())
        .collect();

    if parts.is_empty() {
        return String::new();
    }

    let mut out = parts.join("\n\n");
    out.push('\n');
    out
}

/// Import group, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ImportGroup {
    Std,
    External,
    Local,
}

#[derive(Debug)]
struct OrderedImport {
    group: ImportGroup,
    path: String,
    printed: String,
}

impl OrderedImport {
    fn new(item: ItemUse) -> Self {
        let group = import_group(&item);
        let path = path_key(&item.tree);
        let printed = prettyplease::unparse(&File {
            shebang: None,
            attrs: Vec::new(),
            items: vec![Item::Use(item)],
        });

        Self {
            group,
            path,
            printed,
        }
    }

    fn cmp_key(&self, other: &Self) -> Ordering {
        self.group
            .cmp(&other.group)
            .then_with(|| self.path.cmp(&other.path))
            .then_with(|| self.printed.cmp(&other.printed))
    }
}

fn print_imports(items: Vec<ItemUse>) -> String {
    let mut imports: Vec<OrderedImport> = items
        .iter()
        .flat_map(flatten_use)
        .map(OrderedImport::new)
        .collect();

    imports.sort_by(OrderedImport::cmp_key);
    imports.dedup_by(|a, b| a.printed == b.printed);

    let mut groups: Vec<String> = Vec::new();
    let mut current: Option<ImportGroup> = None;
    for import in imports {
        if current != Some(import.group) {
            groups.push(String::new());
            current = Some(import.group);
        }
        if let Some(block) = groups.last_mut() {
            block.push_str(&import.printed);
        }
    }

    groups.join("\n")
}

/// Splits a `use` item into one item per imported name.
fn flatten_use(item: &ItemUse) -> Vec<ItemUse> {
    let mut leaves = Vec::new();
    collect_leaves(&item.tree, &mut Vec::new(), &mut leaves);

    leaves
        .into_iter()
        .map(|tree| ItemUse {
            attrs: item.attrs.clone(),
            vis: item.vis.clone(),
            use_token: item.use_token,
            leading_colon: item.leading_colon,
            tree,
            semi_token: item.semi_token,
        })
        .collect()
}

fn collect_leaves(tree: &UseTree, prefix: &mut Vec<Ident>, out: &mut Vec<UseTree>) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.clone());
            collect_leaves(&path.tree, prefix, out);
            prefix.pop();
        }
        UseTree::Group(group) => {
            for item in &group.items {
                collect_leaves(item, prefix, out);
            }
        }
        UseTree::Name(name) => {
            // `a::{self}` imports `a` itself
            let (segments, ident) = match prefix.split_last() {
                Some((last, rest)) if name.ident == "self" => (rest, last.clone()),
                _ => (prefix.as_slice(), name.ident.clone()),
            };
            out.push(build_tree(segments, UseTree::Name(UseName { ident })));
        }
        UseTree::Rename(rename) => {
            let (segments, ident) = match prefix.split_last() {
                Some((last, rest)) if rename.ident == "self" => (rest, last.clone()),
                _ => (prefix.as_slice(), rename.ident.clone()),
            };
            out.push(build_tree(
                segments,
                UseTree::Rename(UseRename {
                    ident,
                    as_token: rename.as_token,
                    rename: rename.rename.clone(),
                }),
            ));
        }
        UseTree::Glob(glob) => {
            out.push(build_tree(
                prefix,
                UseTree::Glob(UseGlob {
                    star_token: glob.star_token,
                }),
            ));
        }
    }
}

fn build_tree(segments: &[Ident], leaf: UseTree) -> UseTree {
    segments.iter().rev().fold(leaf, |tree, ident| {
        UseTree::Path(UsePath {
            ident: ident.clone(),
            colon2_token: Default::default(),
            tree: Box::new(tree),
        })
    })
}

fn import_group(item: &ItemUse) -> ImportGroup {
    if item.leading_colon.is_some() {
        return ImportGroup::External;
    }

    let root = match &item.tree {
        UseTree::Path(path) => &path.ident,
        UseTree::Name(name) => &name.ident,
        UseTree::Rename(rename) => &rename.ident,
        UseTree::Glob(_) | UseTree::Group(_) => return ImportGroup::External,
    };

    match root.to_string().as_str() {
        "std" | "core" | "alloc" => ImportGroup::Std,
        "crate" | "self" | "super" => ImportGroup::Local,
        _ => ImportGroup::External,
    }
}

fn path_key(tree: &UseTree) -> String {
    match tree {
        UseTree::Path(path) => format!("{}::{}", path.ident, path_key(&path.tree)),
        UseTree::Name(name) => name.ident.to_string(),
        UseTree::Rename(rename) => format!("{} as {}", rename.ident, rename.rename),
        UseTree::Glob(_) => "*".to_string(),
        UseTree::Group(group) => group
            .items
            .iter()
            .map(path_key)
            .collect::<Vec<_>>()
            .join(", "),
    }
}
