//! Reference Pass
//!
//! Pushes property values into the reference markers of a rendered root.

use fos_dom::{DomResult, DomTree, NodeId};

/// Marker attribute naming the bound property (empty for companion markers)
pub const REF_ATTR: &str = "data-ref";
/// Prefix of companion attributes: `data-ref-<attr>="<property>"`
pub const REF_PREFIX: &str = "data-ref-";
/// Last value written into a content marker
pub const VALUE_ATTR: &str = "data-value";

/// Refresh every marker under `root`.
///
/// With `changed_key` set, content markers bound to other properties are
/// left alone; companion attributes are always refreshed. Properties that
/// `resolve` cannot produce are skipped. Returns the number of writes.
pub fn update_references<R>(
    tree: &mut DomTree,
    root: NodeId,
    changed_key: Option<&str>,
    resolve: R,
) -> DomResult<usize>
where
    R: Fn(&str) -> Option<String>,
{
    let markers: Vec<NodeId> = tree.descendants(root)
        .filter(|&id| tree.get_attribute(id, REF_ATTR).is_some())
        .collect();

    let mut written = 0;
    for marker in markers {
        let Some(key) = tree.get_attribute(marker, REF_ATTR).map(str::to_string) else {
            continue;
        };

        if key.is_empty() {
            for (attr, property) in companions(tree, marker) {
                if let Some(value) = resolve(&property) {
                    tree.set_attribute(marker, &attr, &value)?;
                    written += 1;
                }
            }
            continue;
        }

        if changed_key.is_some_and(|changed| changed != key) {
            continue;
        }
        let Some(value) = resolve(&key) else {
            continue;
        };

        tree.set_attribute(marker, VALUE_ATTR, &value)?;
        if tree.tag_name(marker) == Some("img") {
            tree.set_attribute(marker, "src", &value)?;
        } else {
            tree.set_text_content(marker, &value)?;
        }
        written += 1;
    }

    tracing::trace!(?root, ?changed_key, written, "updated references");
    Ok(written)
}

/// `(attribute, property)` pairs from a marker's `data-ref-*` attributes
fn companions(tree: &DomTree, marker: NodeId) -> Vec<(String, String)> {
    let Some(elem) = tree.element(marker) else {
        return Vec::new();
    };
    elem.attrs.iter()
        .filter_map(|attr| {
            let target = attr.name.strip_prefix(REF_PREFIX)?;
            (!target.is_empty()).then(|| (target.to_string(), attr.value.clone()))
        })
        .collect()
}
