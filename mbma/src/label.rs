//! Decoding of class labels returned by the label oracle.
//!
//! A class label has the shape `<tag>['+'<op>]['/'<inflection>]`, where `<op>` is one of
//! `D<text>` (delete), `I<text>` (insert) or `R<old>'>'<new>` (replace). Several alternative
//! labels may be packed into one answer, separated by `|`.

/// Label meaning "no information" for a character position.
pub const NO_INFORMATION: &str = "0";

/// Tag used for an unknown category.
pub const UNKNOWN_TAG: &str = "X";

/// Separator of packed alternative labels.
pub const ALTERNATIVE_SEPARATOR: char = '|';

/// Kind of a spelling-change operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditKind {
    /// No spelling change.
    #[default]
    None,

    /// Characters were inserted in the surface form.
    Insert,

    /// Characters were deleted from the surface form.
    Delete,

    /// Characters were replaced in the surface form.
    Replace,
}

/// Spelling-change operation recovered from a class label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditOperation {
    pub kind: EditKind,

    /// Text to restore before the current character.
    pub delete: String,

    /// Text of the surface form that does not belong to the morphemes.
    pub insert: String,
}

/// Result of decoding one class label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedLabel {
    /// Tag fragment with the edit part stripped. The inflection suffix is kept.
    pub fragment: String,

    pub edit: EditOperation,

    /// Whether a literal `e` must be added right after the restored text.
    pub insert_e: bool,
}

fn extract(line: &str, start: usize, to: char) -> &str {
    let rest = line.get(start..).unwrap_or("");
    match rest.find(to) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Decodes a class label into its tag fragment and spelling change.
///
/// # Arguments
///
/// * `label` - A single (unpacked) class label.
///
/// # Returns
///
/// The decoded label.
///
/// # Examples
///
/// ```
/// use mbma::label::{decode, EditKind};
///
/// let d = decode("N+Dag/G");
/// assert_eq!("N/G", d.fragment);
/// assert_eq!(EditKind::Delete, d.edit.kind);
/// assert_eq!("ag", d.edit.delete);
/// ```
pub fn decode(label: &str) -> DecodedLabel {
    let Some(plus) = label.find('+') else {
        return DecodedLabel {
            fragment: label.to_string(),
            ..Default::default()
        };
    };

    let code_pos = plus + 1;
    let mut edit = EditOperation::default();
    match label[code_pos..].chars().next() {
        Some('D') => {
            edit.kind = EditKind::Delete;
            edit.delete = extract(label, code_pos + 1, '/').to_string();
        }
        Some('I') => {
            edit.kind = EditKind::Insert;
            edit.insert = extract(label, code_pos + 1, '/').to_string();
        }
        Some('R') => {
            edit.kind = EditKind::Replace;
            let delete = extract(label, code_pos + 1, '>');
            edit.insert = extract(label, code_pos + 1 + delete.len() + 1, '/').to_string();
            edit.delete = delete.to_string();
        }
        _ => (),
    }

    let mut fragment = label[..plus].to_string();
    if let Some(slash) = label.find('/') {
        fragment.push_str(&label[slash..]);
    }

    // exceptions
    let mut insert_e = false;
    if edit.delete == "eeer" {
        edit.delete.remove(0);
    } else if edit.delete == "ere" {
        edit.delete.truncate(2);
        insert_e = true;
    }

    tracing::trace!(
        "decoded {}: fragment={} insert={} delete={}",
        label,
        fragment,
        edit.insert,
        edit.delete
    );

    DecodedLabel {
        fragment,
        edit,
        insert_e,
    }
}

/// Splits a packed label into its alternatives.
///
/// Empty parts are dropped. If nothing remains, the label itself is the only alternative.
pub fn split_alternatives(label: &str) -> Vec<&str> {
    let parts: Vec<&str> = label
        .split(ALTERNATIVE_SEPARATOR)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        vec![label]
    } else {
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_no_edit() {
        let d = decode("N/m");

        assert_eq!("N/m", d.fragment);
        assert_eq!(EditOperation::default(), d.edit);
        assert!(!d.insert_e);
    }

    #[test]
    fn test_decode_delete() {
        let d = decode("N+Dag/G");

        assert_eq!("N/G", d.fragment);
        assert_eq!(EditKind::Delete, d.edit.kind);
        assert_eq!("ag", d.edit.delete);
        assert_eq!("", d.edit.insert);
    }

    #[test]
    fn test_decode_insert() {
        let d = decode("N+Iën");

        assert_eq!("N", d.fragment);
        assert_eq!(EditKind::Insert, d.edit.kind);
        assert_eq!("ën", d.edit.insert);
        assert_eq!("", d.edit.delete);
    }

    #[test]
    fn test_decode_replace() {
        let d = decode("V+Rf>v/te");

        assert_eq!("V/te", d.fragment);
        assert_eq!(EditKind::Replace, d.edit.kind);
        assert_eq!("f", d.edit.delete);
        assert_eq!("v", d.edit.insert);
    }

    #[test]
    fn test_decode_replace_without_target() {
        let d = decode("V+Rf");

        assert_eq!("V", d.fragment);
        assert_eq!("f", d.edit.delete);
        assert_eq!("", d.edit.insert);
    }

    #[test]
    fn test_decode_unknown_code() {
        let d = decode("A+");

        assert_eq!("A", d.fragment);
        assert_eq!(EditKind::None, d.edit.kind);
    }

    #[test]
    fn test_decode_eeer_exception() {
        let d = decode("N+Deeer");

        assert_eq!("eer", d.edit.delete);
        assert!(!d.insert_e);
    }

    #[test]
    fn test_decode_ere_exception() {
        let d = decode("A+Dere/C");

        assert_eq!("er", d.edit.delete);
        assert!(d.insert_e);
        assert_eq!("A/C", d.fragment);
    }

    #[test]
    fn test_split_alternatives() {
        assert_eq!(vec!["N", "V/te"], split_alternatives("N|V/te"));
        assert_eq!(vec!["0"], split_alternatives("0"));
        assert_eq!(vec!["A"], split_alternatives("|A|"));
        assert_eq!(vec![""], split_alternatives(""));
    }
}
