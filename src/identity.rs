//! Identifiers for elements, terminals and dynamic texts.

use uuid::Uuid;

/// A fresh random identifier in the element format's braced lower-case form,
/// e.g. `{1b4e28ba-2fa1-4d3b-a3f5-ef19b5a7633b}`.
pub fn new_uuid() -> String {
    format!("{{{}}}", Uuid::new_v4().hyphenated())
}
