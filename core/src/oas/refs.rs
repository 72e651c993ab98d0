#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Helpers for turning `$ref` strings into component names.
//!
//! Only local references (`#/components/{section}/{name}`) resolve. Absolute
//! URLs and relative document references are never fetched and therefore
//! never resolve.

use percent_encoding::percent_decode_str;
use url::Url;

/// Component section holding schemas.
pub const SCHEMAS: &str = "schemas";
/// Component section holding parameters.
pub const PARAMETERS: &str = "parameters";
/// Component section holding request bodies.
pub const REQUEST_BODIES: &str = "requestBodies";

/// Extracts the component name from a `$ref` pointing at `#/components/{section}/{name}`.
///
/// Returns `None` for external references or pointers into other sections.
pub fn component_name(reference: &str, section: &str) -> Option<String> {
    if classify(reference) != ReferenceKind::Local {
        return None;
    }
    let pointer = reference.strip_prefix("#/")?;
    let mut segments = pointer.split('/');

    if segments.next()? != "components" || segments.next()? != section {
        return None;
    }
    let name = decode_pointer_segment(segments.next()?);
    if segments.next().is_some() || name.is_empty() {
        return None;
    }
    Some(name)
}

/// Display name of a reference: its last pointer segment, decoded.
///
/// Used as the mapped type of a reference node, whether or not it resolves.
pub fn display_name(reference: &str) -> String {
    let last = reference.rsplit('/').next().unwrap_or(reference);
    let last = last.rsplit('#').next().unwrap_or(last);
    decode_pointer_segment(last)
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent-escapes).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Where a `$ref` points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `#/...` inside the current document.
    Local,
    /// Absolute URI (`https://...`).
    Remote,
    /// Another document relative to this one (`models.yaml#/...`).
    Relative,
}

/// Classifies a `$ref` string.
pub fn classify(reference: &str) -> ReferenceKind {
    if reference.starts_with('#') {
        ReferenceKind::Local
    } else if Url::parse(reference).is_ok() {
        ReferenceKind::Remote
    } else {
        ReferenceKind::Relative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_schema_ref() {
        assert_eq!(
            component_name("#/components/schemas/User", SCHEMAS).as_deref(),
            Some("User")
        );
    }

    #[test]
    fn test_wrong_section_does_not_resolve() {
        assert!(component_name("#/components/parameters/User", SCHEMAS).is_none());
        assert!(component_name("#/definitions/User", SCHEMAS).is_none());
        assert!(component_name("#/components/schemas/User/properties/id", SCHEMAS).is_none());
    }

    #[test]
    fn test_external_refs_never_resolve() {
        assert!(component_name("https://example.com/api.yaml#/components/schemas/User", SCHEMAS)
            .is_none());
        assert!(component_name("models.yaml#/components/schemas/User", SCHEMAS).is_none());
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("#/components/schemas/A"), ReferenceKind::Local);
        assert_eq!(classify("https://x.dev/a.yaml#/A"), ReferenceKind::Remote);
        assert_eq!(classify("a.yaml#/A"), ReferenceKind::Relative);
    }

    #[test]
    fn test_pointer_decoding() {
        assert_eq!(
            component_name("#/components/schemas/a~1b~0c", SCHEMAS).as_deref(),
            Some("a/b~c")
        );
        assert_eq!(
            component_name("#/components/schemas/My%20Type", SCHEMAS).as_deref(),
            Some("My Type")
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("#/components/schemas/Order"), "Order");
        assert_eq!(display_name("models.yaml#/Pet"), "Pet");
        assert_eq!(display_name("Bare"), "Bare");
    }
}
