//! Non-geometric lists of an element: translated names, element
//! informations and the author notes.

use std::collections::BTreeMap;

use crate::tree::{Element, Node};

/// Line appended to the author notes of every edited element
pub const AUTHOR_STAMP: &str = "edited with elmt-scaler";

// ============================================================================
// Names
// ============================================================================

/// Display names keyed by language code, as in `<names><name lang="de">`.
///
/// A language given twice keeps the last name. Written sorted by language.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamesList {
    pub names: BTreeMap<String, String>,
}

impl NamesList {
    pub fn from_node(node: &Element) -> Self {
        let names = node
            .elements()
            .filter(|e| e.name == "name")
            .filter_map(|e| Some((e.attr("lang")?.to_string(), e.text())))
            .collect();
        Self { names }
    }

    pub fn insert(&mut self, lang: impl Into<String>, name: impl Into<String>) {
        self.names.insert(lang.into(), name.into());
    }

    /// Replace all `name[@lang]` children, keeping other children (including
    /// a `name` without `lang`) after them
    pub fn write(&self, node: &mut Element) {
        let others = std::mem::take(&mut node.children)
            .into_iter()
            .filter(|n| match n {
                Node::Element(e) => e.name != "name" || !e.has_attr("lang"),
                Node::Text(_) => false,
            });
        node.children = self
            .names
            .iter()
            .map(|(lang, name)| {
                let name = Element::new("name")
                    .with_attr("lang", lang.as_str())
                    .with_text(name.as_str());
                Node::Element(name)
            })
            .chain(others)
            .collect();
    }
}

// ============================================================================
// Element informations
// ============================================================================

/// One `<elementInformation name=".." show="..">value</elementInformation>`
#[derive(Debug, Clone, PartialEq)]
pub struct InfoEntry {
    pub name: String,
    pub show: Option<String>,
    pub value: String,
}

/// Informational entries, kept sorted by name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementInfo {
    pub entries: Vec<InfoEntry>,
}

impl ElementInfo {
    pub fn from_node(node: &Element) -> Self {
        let mut entries: Vec<InfoEntry> = node
            .elements()
            .filter(|e| e.name == "elementInformation")
            .map(|e| InfoEntry {
                name: e.attr("name").unwrap_or_default().to_string(),
                show: e.attr("show").map(str::to_string),
                value: e.text(),
            })
            .collect();
        // stable: entries sharing a name keep their order
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    pub fn write(&self, node: &mut Element) {
        node.retain_elements(|e| e.name != "elementInformation");
        let entries = self.entries.iter().map(|entry| {
            let mut e = Element::new("elementInformation").with_attr("name", entry.name.as_str());
            if let Some(show) = &entry.show {
                e.set_attr("show", show.as_str());
            }
            e.set_text(entry.value.as_str());
            Node::Element(e)
        });
        let others = std::mem::take(&mut node.children);
        node.children = entries.chain(others).collect();
    }
}

// ============================================================================
// Author notes
// ============================================================================

/// Free text of `<informations>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AuthorInfo {
    pub text: String,
}

impl AuthorInfo {
    pub fn from_node(node: &Element) -> Self {
        Self { text: node.text() }
    }

    /// Append [`AUTHOR_STAMP`] on its own line unless it is already there.
    /// Returns whether the text changed.
    pub fn stamp(&mut self) -> bool {
        if self.text.lines().any(|line| line.trim() == AUTHOR_STAMP) {
            return false;
        }
        let trimmed = self.text.trim_end();
        self.text = if trimmed.is_empty() {
            AUTHOR_STAMP.to_string()
        } else {
            format!("{trimmed}\n{AUTHOR_STAMP}")
        };
        true
    }

    pub fn write(&self, node: &mut Element) {
        node.set_text(self.text.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{parse_document, write_document};

    fn node(xml: &str) -> Element {
        parse_document(xml, "test").unwrap()
    }

    #[test]
    fn names_last_wins_and_sorted() {
        let mut names = node(
            r#"<names><name lang="fr">Bobine</name><name lang="de">Spule</name><name lang="fr">Relais</name><name>no lang</name></names>"#,
        );
        let list = NamesList::from_node(&names);
        assert_eq!(list.names.len(), 2);
        assert_eq!(list.names["fr"], "Relais");
        list.write(&mut names);
        insta::assert_snapshot!(write_document(&names).unwrap(), @r#"
        <names>
            <name lang="de">Spule</name>
            <name lang="fr">Relais</name>
            <name>no lang</name>
        </names>
        "#);
    }

    #[test]
    fn element_informations_sorted_by_name() {
        let mut infos = node(
            r#"<elementInformations><elementInformation name="supplier" show="1">ACME</elementInformation><elementInformation name="label" show="1">K</elementInformation><elementInformation name="description">a</elementInformation></elementInformations>"#,
        );
        let list = ElementInfo::from_node(&infos);
        let names: Vec<&str> = list.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["description", "label", "supplier"]);
        list.write(&mut infos);
        assert_eq!(ElementInfo::from_node(&infos), list);
        assert_eq!(infos.elements().count(), 3);
    }

    #[test]
    fn stamp_is_added_once() {
        let mut author = AuthorInfo {
            text: "Author: someone\n".to_string(),
        };
        assert!(author.stamp());
        assert_eq!(author.text, format!("Author: someone\n{AUTHOR_STAMP}"));
        assert!(!author.stamp());
        assert_eq!(author.text.matches(AUTHOR_STAMP).count(), 1);

        let mut empty = AuthorInfo::default();
        empty.stamp();
        assert_eq!(empty.text, AUTHOR_STAMP);
    }
}
