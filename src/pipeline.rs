//! One processing pass over a document.
//!
//! For an element (`<definition>` root) the pass:
//! 1. renews the element's own uuid
//! 2. optionally removes every terminal, turning the element into a thumbnail
//! 3. reads each `<description>` child as a [`Part`], applies the configured
//!    transforms and validates it, dropping the ones that fail
//! 4. regenerates terminal or dynamic-text uuids when that class has a collision
//! 5. writes the surviving parts back and normalizes the metadata lists
//! 6. recalculates the definition header from the accumulated bounding box
//!
//! A directory (`<qet-directory>` root) only gets its names list normalized.

use std::collections::HashSet;

use crate::config::TransformConfig;
use crate::definition::{DefinitionHeader, THUMBNAIL};
use crate::errors::{DocumentError, PartError};
use crate::geometry::BoundingBox;
use crate::identity::new_uuid;
use crate::log::{debug, info, warn};
use crate::metadata::{AuthorInfo, ElementInfo, NamesList};
use crate::primitives::{Part, Primitive};
use crate::tree::{Element, Node};

/// Root tag of an element document
pub const ELEMENT_ROOT: &str = "definition";
/// Root tag of a directory document
pub const DIRECTORY_ROOT: &str = "qet-directory";

/// A primitive that was left out of the output
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedPart {
    pub tag: String,
    /// Position among the `<description>` child elements, from 0
    pub index: usize,
    pub reason: PartError,
}

/// Everything the pass recovered from without failing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessReport {
    pub dropped: Vec<DroppedPart>,
    pub regenerated_terminal_uuids: bool,
    pub regenerated_text_uuids: bool,
    /// Legacy `<input>` nodes rewritten as `<dynamic_text>`
    pub upgraded_inputs: usize,
}

impl ProcessReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
            && !self.regenerated_terminal_uuids
            && !self.regenerated_text_uuids
            && self.upgraded_inputs == 0
    }
}

/// Result of processing an element document
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedElement {
    pub header: DefinitionHeader,
    /// Surviving primitives in document order
    pub parts: Vec<Part>,
    pub bounds: BoundingBox,
    pub report: ProcessReport,
}

impl ProcessedElement {
    pub fn has_terminals(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, Part::Terminal(_)))
    }
}

/// The two document shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Processed {
    Element(ProcessedElement),
    Directory,
}

/// Process `root` in place according to its shape
pub fn process_document(
    root: &mut Element,
    config: &TransformConfig,
) -> Result<Processed, DocumentError> {
    match root.name.as_str() {
        ELEMENT_ROOT => Ok(Processed::Element(process_element(root, config))),
        DIRECTORY_ROOT => {
            process_directory(root);
            Ok(Processed::Directory)
        }
        other => Err(DocumentError::UnsupportedRoot {
            tag: other.to_string(),
        }),
    }
}

pub fn process_directory(root: &mut Element) {
    if let Some(names) = root.child_mut("names") {
        NamesList::from_node(names).write(names);
    }
}

/// A `<description>` child after dispatch
enum Slot {
    /// Not a primitive, written back untouched
    Passthrough(Node),
    Part(Element, Part),
}

/// Process an element document in place. `root` must be a `<definition>`.
pub fn process_element(root: &mut Element, config: &TransformConfig) -> ProcessedElement {
    let mut report = ProcessReport::default();
    renew_element_uuid(root);

    let mut header = DefinitionHeader::from_node(root);
    if config.remove_all_terminals {
        header.link_type = THUMBNAIL.to_string();
    }

    let mut slots = Vec::new();
    if let Some(description) = root.child_mut("description") {
        let children = std::mem::take(&mut description.children);
        slots = dispatch(children, config, &mut report);
    }

    reconcile_uuids(&mut slots, &mut report);

    let mut bounds = BoundingBox::new();
    let mut parts = Vec::new();
    let mut children = Vec::with_capacity(slots.len());
    for slot in slots {
        match slot {
            Slot::Passthrough(node) => children.push(node),
            Slot::Part(mut node, part) => {
                part.write(&mut node, config.decimals);
                part.extend_bounds(&mut bounds);
                children.push(Node::Element(node));
                parts.push(part);
            }
        }
    }
    if let Some(description) = root.child_mut("description") {
        description.children = children;
    }

    normalize_metadata(root);

    header.recalculate(&bounds);
    header.write(root);
    info!(
        parts = parts.len(),
        dropped = report.dropped.len(),
        "processed element"
    );

    ProcessedElement {
        header,
        parts,
        bounds,
        report,
    }
}

/// Set a fresh `<uuid uuid="..."/>`, creating it as the first child if needed
fn renew_element_uuid(root: &mut Element) {
    let uuid = new_uuid();
    match root.child_mut("uuid") {
        Some(node) => node.set_attr("uuid", uuid),
        None => root
            .children
            .insert(0, Node::Element(Element::new("uuid").with_attr("uuid", uuid))),
    }
}

/// Read, transform and validate every description child
fn dispatch(children: Vec<Node>, config: &TransformConfig, report: &mut ProcessReport) -> Vec<Slot> {
    let mut slots = Vec::with_capacity(children.len());
    let mut index = 0;
    for child in children {
        let Node::Element(node) = child else {
            slots.push(Slot::Passthrough(child));
            continue;
        };
        let position = index;
        index += 1;

        if config.remove_all_terminals && node.name == "terminal" {
            continue;
        }

        let part = Part::from_node(&node).and_then(|part| match part {
            Some(mut part) => {
                part.apply(config);
                part.finish(config).map(|()| Some(part))
            }
            None => Ok(None),
        });
        match part {
            Ok(Some(part)) => {
                if let Part::DynamicText(text) = &part {
                    if text.upgraded {
                        report.upgraded_inputs += 1;
                    }
                }
                slots.push(Slot::Part(node, part));
            }
            Ok(None) => slots.push(Slot::Passthrough(Node::Element(node))),
            Err(reason) => {
                warn!(tag = %node.name, index = position, %reason, "dropping invalid primitive");
                report.dropped.push(DroppedPart {
                    tag: node.name,
                    index: position,
                    reason,
                });
            }
        }
    }
    slots
}

fn has_duplicates<'a>(mut ids: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = HashSet::new();
    ids.any(|id| !seen.insert(id))
}

/// Regenerate every uuid of a class (terminals, dynamic texts) in which any
/// uuid appears twice
fn reconcile_uuids(slots: &mut [Slot], report: &mut ProcessReport) {
    let parts = || {
        slots.iter().filter_map(|slot| match slot {
            Slot::Part(_, part) => Some(part),
            Slot::Passthrough(_) => None,
        })
    };
    let terminals_clash = has_duplicates(parts().filter_map(|part| match part {
        Part::Terminal(t) => Some(t.uuid.as_str()),
        _ => None,
    }));
    let texts_clash = has_duplicates(parts().filter_map(|part| match part {
        Part::DynamicText(t) => Some(t.uuid.as_str()),
        _ => None,
    }));
    if !terminals_clash && !texts_clash {
        return;
    }

    for slot in slots.iter_mut() {
        match slot {
            Slot::Part(_, Part::Terminal(t)) if terminals_clash => t.uuid = new_uuid(),
            Slot::Part(_, Part::DynamicText(t)) if texts_clash => t.uuid = new_uuid(),
            _ => {}
        }
    }
    if terminals_clash {
        warn!("duplicate terminal uuids, regenerated all of them");
        report.regenerated_terminal_uuids = true;
    }
    if texts_clash {
        warn!("duplicate dynamic text uuids, regenerated all of them");
        report.regenerated_text_uuids = true;
    }
}

fn normalize_metadata(root: &mut Element) {
    if let Some(names) = root.child_mut("names") {
        NamesList::from_node(names).write(names);
    }
    if let Some(infos) = root.child_mut("elementInformations") {
        ElementInfo::from_node(infos).write(infos);
    }
    root.edit_child_or_insert("informations", |informations| {
        let mut author = AuthorInfo::from_node(informations);
        if author.stamp() {
            debug!("stamped author notes");
        }
        author.write(informations);
    });
}
