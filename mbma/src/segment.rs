//! Reconstruction of morpheme segments from per-character labels.

use crate::label::{self, DecodedLabel, NO_INFORMATION};

/// Coarse part-of-speech codes that mark the start of a new morpheme.
pub const BASIC_TAGS: &str = "NAQVDOBPYIXZ";

/// A multi-character tag starting with a basic code that must not open a morpheme.
const NON_BOUNDARY_TAG: &str = "PE";

/// Inflection suffix of a final label that does not produce an extra segment.
const NON_INFLECTING_SUFFIX: &str = "E/P";

/// Prefix marking an inflectional tag.
pub const INFLECTION_MARK: char = 'i';

/// Inserted prefixes which stay part of the morphemes.
const KEPT_INSERTIONS: [&str; 2] = ["ge", "be"];

/// One segment of a word with its tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SegmentStep {
    pub text: String,
    pub tag: String,
}

impl SegmentStep {
    /// Whether the tag of this segment is inflectional.
    pub fn is_inflection(&self) -> bool {
        self.tag.starts_with(INFLECTION_MARK)
    }
}

pub(crate) fn is_basic_tag(tag: &str) -> bool {
    tag.chars().next().is_some_and(|c| BASIC_TAGS.contains(c))
}

/// Picks the class of one character position for the given alternative step.
///
/// # Arguments
///
/// * `step` - 1-based index of the alternative.
/// * `classes` - Alternatives at this position.
/// * `n_alternatives` - Largest number of alternatives over the whole word.
pub fn select_class<'a>(step: usize, classes: &[&'a str], n_alternatives: usize) -> &'a str {
    let Some(&first) = classes.first() else {
        return NO_INFORMATION;
    };
    if n_alternatives > 1 && classes.len() > 1 {
        if classes.len() >= step {
            classes[step - 1]
        } else {
            NO_INFORMATION
        }
    } else {
        first
    }
}

#[derive(Default)]
struct ScanState {
    segments: Vec<SegmentStep>,
    text: String,
    tag: Option<String>,
    to_be_ignored: usize,
    last_fragment: String,
}

impl ScanState {
    fn open(mut self, tag: String) -> Self {
        if let Some(prev) = self.tag.replace(tag) {
            self.segments.push(SegmentStep {
                text: std::mem::take(&mut self.text),
                tag: prev,
            });
        }
        self
    }

    fn step(mut self, c: char, decoded: DecodedLabel) -> Self {
        let DecodedLabel {
            fragment,
            edit,
            insert_e,
        } = decoded;

        // restore the deleted text
        self.text.push_str(&edit.delete);
        if self.to_be_ignored == 0 && !KEPT_INSERTIONS.contains(&edit.insert.as_str()) {
            self.to_be_ignored = edit.insert.chars().count();
        }

        if is_basic_tag(&fragment) && fragment != NON_BOUNDARY_TAG {
            self = self.open(fragment.clone());
        } else if !fragment.starts_with(NO_INFORMATION) {
            self = self.open(format!("{}{}", INFLECTION_MARK, fragment));
        }

        if insert_e {
            self.text.push('e');
        }
        if self.to_be_ignored == 0 {
            self.text.push(c);
        } else {
            self.to_be_ignored -= 1;
        }
        self.last_fragment = fragment;
        self
    }

    fn finish(mut self) -> Vec<SegmentStep> {
        self.segments.push(SegmentStep {
            text: self.text,
            tag: self.tag.unwrap_or_default(),
        });
        if let Some(slash) = self.last_fragment.find('/') {
            if self.last_fragment != NON_INFLECTING_SUFFIX {
                self.segments.push(SegmentStep {
                    text: String::new(),
                    tag: format!("{}{}", INFLECTION_MARK, &self.last_fragment[slash + 1..]),
                });
            }
        }
        self.segments
    }
}

/// Builds the segments of a word for one alternative step.
///
/// # Arguments
///
/// * `step` - 1-based index of the alternative.
/// * `word` - A lowercased word.
/// * `class_parts` - Alternatives of each character position.
/// * `n_alternatives` - Largest number of alternatives over the whole word.
///
/// # Returns
///
/// Segments in left-to-right order.
pub fn build_segments(
    step: usize,
    word: &str,
    class_parts: &[Vec<&str>],
    n_alternatives: usize,
) -> Vec<SegmentStep> {
    word.chars()
        .zip(class_parts)
        .fold(ScanState::default(), |state, (c, classes)| {
            let class = select_class(step, classes, n_alternatives);
            tracing::trace!("step {}: class {}", step, class);
            state.step(c, label::decode(class))
        })
        .finish()
}

/// Maps an inflection code to the coarse category it implies.
pub fn implied_tag(inflection: char) -> Option<char> {
    match inflection {
        'm' | 'e' | 'd' | 'G' | 'D' => Some('N'),
        'P' | 'C' | 'S' | 'E' => Some('A'),
        'i' | 'p' | 't' | 'v' | 'g' | 'a' => Some('V'),
        _ => None,
    }
}

/// Index of the segment preceding an inflection, or the segment itself at the start.
const fn previous_index(i: usize) -> usize {
    i.saturating_sub(1)
}

/// Rewrites the tag of each morpheme followed by an inflection that reveals its category.
///
/// # Arguments
///
/// * `segments` - Segments produced by [`build_segments()`].
///
/// # Returns
///
/// Segments with corrected tags.
pub fn resolve_inflections(mut segments: Vec<SegmentStep>) -> Vec<SegmentStep> {
    for i in 0..segments.len() {
        if !segments[i].is_inflection() {
            continue;
        }
        let Some(new_tag) = segments[i].tag.chars().nth(1).and_then(implied_tag) else {
            continue;
        };
        tracing::trace!("{} selects {}", segments[i].tag, new_tag);
        let prev = &mut segments[previous_index(i)];
        if is_basic_tag(&prev.tag) {
            // basic tags are ASCII
            prev.tag.replace_range(..1, &new_tag.to_string());
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts<'a>(labels: &[&'a str]) -> Vec<Vec<&'a str>> {
        labels.iter().map(|&l| label::split_alternatives(l)).collect()
    }

    fn seg(text: &str, tag: &str) -> SegmentStep {
        SegmentStep {
            text: text.to_string(),
            tag: tag.to_string(),
        }
    }

    #[test]
    fn test_select_class_single() {
        assert_eq!("N", select_class(2, &["N"], 2));
        assert_eq!("N", select_class(1, &["N"], 1));
    }

    #[test]
    fn test_select_class_alternatives() {
        assert_eq!("A", select_class(1, &["A", "N"], 3));
        assert_eq!("N", select_class(2, &["A", "N"], 3));
        assert_eq!("0", select_class(3, &["A", "N"], 3));
    }

    #[test]
    fn test_build_segments_stem_and_suffix() {
        let segments = build_segments(1, "werkte", &parts(&["V", "0", "0", "0", "ve", "0"]), 1);

        assert_eq!(vec![seg("werk", "V"), seg("te", "ive")], segments);
    }

    #[test]
    fn test_build_segments_compound() {
        let segments = build_segments(
            1,
            "huisdeur",
            &parts(&["N", "0", "0", "0", "N", "0", "0", "0"]),
            1,
        );

        assert_eq!(vec![seg("huis", "N"), seg("deur", "N")], segments);
    }

    #[test]
    fn test_build_segments_final_inflection() {
        let segments = build_segments(1, "boeken", &parts(&["N", "0", "0", "0", "0", "0/m"]), 1);

        assert_eq!(vec![seg("boeken", "N"), seg("", "im")], segments);
    }

    #[test]
    fn test_build_segments_no_final_inflection_for_e_p() {
        let segments = build_segments(1, "grote", &parts(&["A", "0", "0", "0", "E/P"]), 1);

        assert_eq!(vec![seg("grot", "A"), seg("e", "iE/P")], segments);
    }

    #[test]
    fn test_build_segments_delete_restores_text() {
        let segments = build_segments(1, "lopen", &parts(&["V", "0", "0+Do", "i", "0"]), 1);

        assert_eq!(vec![seg("loop", "V"), seg("en", "ii")], segments);
    }

    #[test]
    fn test_build_segments_delete_ends_closed_segment() {
        let segments = build_segments(1, "lopen", &parts(&["V", "0", "V+Do", "ti", "0"]), 1);

        assert_eq!(vec![seg("loo", "V"), seg("p", "V"), seg("en", "iti")], segments);
    }

    #[test]
    fn test_build_segments_eeer_restores_eer() {
        let segments = build_segments(1, "ab", &parts(&["N", "N+Deeer"]), 1);

        assert_eq!(vec![seg("aeer", "N"), seg("b", "N")], segments);
    }

    #[test]
    fn test_build_segments_replace() {
        let segments = build_segments(1, "leven", &parts(&["V", "0", "0+Rf>v", "i", "0"]), 1);

        assert_eq!(vec![seg("lef", "V"), seg("en", "ii")], segments);
    }

    #[test]
    fn test_build_segments_insert_skips_characters() {
        let segments = build_segments(
            1,
            "ideeën",
            &parts(&["N", "0", "0", "0", "N+Iën", "0"]),
            1,
        );

        assert_eq!(vec![seg("idee", "N"), seg("", "N")], segments);
    }

    #[test]
    fn test_build_segments_kept_prefix() {
        let segments = build_segments(
            1,
            "gewerkt",
            &parts(&["V+Ige", "0", "0", "0", "0", "0", "0"]),
            1,
        );

        assert_eq!(vec![seg("gewerkt", "V")], segments);
    }

    #[test]
    fn test_build_segments_pe_does_not_open_morpheme() {
        let segments = build_segments(1, "ab", &parts(&["N", "PE"]), 1);

        assert_eq!(vec![seg("a", "N"), seg("b", "iPE")], segments);
    }

    #[test]
    fn test_build_segments_ere_exception() {
        let segments = build_segments(1, "ab", &parts(&["A", "A+Dere"]), 1);

        assert_eq!(vec![seg("aer", "A"), seg("eb", "A")], segments);
    }

    #[test]
    fn test_build_segments_picks_alternative() {
        let class_parts = parts(&["V", "0", "0", "0", "ve|0", "0"]);

        assert_eq!(
            vec![seg("werkte", "V")],
            build_segments(2, "werkte", &class_parts, 2)
        );
        assert_eq!(
            vec![seg("werk", "V"), seg("te", "ive")],
            build_segments(1, "werkte", &class_parts, 2)
        );
    }

    #[test]
    fn test_resolve_inflections_rewrites_previous() {
        let segments = resolve_inflections(vec![seg("werk", "N"), seg("te", "ive")]);

        assert_eq!(vec![seg("werk", "V"), seg("te", "ive")], segments);
    }

    #[test]
    fn test_resolve_inflections_keeps_unmapped() {
        let segments = resolve_inflections(vec![seg("werk", "N"), seg("s", "is")]);

        assert_eq!(vec![seg("werk", "N"), seg("s", "is")], segments);
    }

    #[test]
    fn test_resolve_inflections_skips_inflectional_predecessor() {
        let segments =
            resolve_inflections(vec![seg("groot", "N_x"), seg("er", "iC"), seg("e", "iE")]);

        assert_eq!(
            vec![seg("groot", "A_x"), seg("er", "iC"), seg("e", "iE")],
            segments
        );
    }

    #[test]
    fn test_resolve_inflections_first_segment() {
        let segments = resolve_inflections(vec![seg("te", "iv")]);

        assert_eq!(vec![seg("te", "iv")], segments);
    }
}
