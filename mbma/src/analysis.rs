use std::fmt;

use crate::segment::{SegmentStep, INFLECTION_MARK};
use crate::tag_tables::{TagTables, UNKNOWN_MARKER};

/// One candidate analysis of a word.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MorphAnalysis {
    pub(crate) tag: String,
    pub(crate) inflection: String,
    pub(crate) morphemes: Vec<String>,
    pub(crate) description: String,
}

impl MorphAnalysis {
    /// Creates a new analysis.
    pub fn new<T, I, D>(tag: T, inflection: I, morphemes: Vec<String>, description: D) -> Self
    where
        T: Into<String>,
        I: Into<String>,
        D: Into<String>,
    {
        Self {
            tag: tag.into(),
            inflection: inflection.into(),
            morphemes,
            description: description.into(),
        }
    }

    /// Coarse tag of the analysis. Empty when the analysis carries no inflection.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Inflection codes of the analysis.
    pub fn inflection(&self) -> &str {
        &self.inflection
    }

    pub fn morphemes(&self) -> &[String] {
        &self.morphemes
    }

    /// Human-readable name of the coarse tag.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this is the empty candidate produced for analyses without inflection.
    pub fn is_empty(&self) -> bool {
        self.tag.is_empty() && self.inflection.is_empty() && self.morphemes.is_empty()
    }

    /// Renders the inflection codes as names, e.g. `"past tense, singular"`.
    pub fn inflection_description(&self, tables: &TagTables) -> String {
        self.inflection
            .chars()
            .map(|c| tables.inflection_name(c).unwrap_or("unknown"))
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MorphAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tag: {} infl: {} morphemes: ", self.tag, self.inflection)?;
        for m in &self.morphemes {
            write!(f, "[{}]", m)?;
        }
        write!(f, " description: {}", self.description)
    }
}

fn decode_inflection(tag: &str, tables: &TagTables) -> String {
    tag.chars()
        .skip(1)
        .filter(|&c| c != '/')
        .map(|c| match tables.inflection_name(c) {
            Some(_) => c,
            None => 'X',
        })
        .collect()
}

/// Tag of the last non-inflectional segment. If there is none, the first segment's tag.
fn final_tag(segments: &[SegmentStep]) -> &str {
    segments
        .iter()
        .rev()
        .find(|s| !s.is_inflection())
        .or_else(|| segments.first())
        .map_or("", |s| s.tag.as_str())
}

/// Merges the segments of one alternative into a candidate analysis.
///
/// # Arguments
///
/// * `segments` - Segments with resolved tags.
/// * `tables` - Tag tables.
///
/// # Returns
///
/// A candidate analysis, or the empty candidate if no inflection was found.
pub fn compose(segments: &[SegmentStep], tables: &TagTables) -> MorphAnalysis {
    let morphemes: Vec<String> = segments
        .iter()
        .filter(|s| !s.text.is_empty())
        .map(|s| s.text.clone())
        .collect();

    let mut inflection = String::new();
    for s in segments {
        if !inflection.is_empty() {
            break;
        }
        if s.tag.starts_with(INFLECTION_MARK) && !s.tag.contains('_') {
            inflection = decode_inflection(&s.tag, tables);
        }
    }

    if inflection.is_empty() {
        tracing::debug!("inflection: none");
        return MorphAnalysis::default();
    }

    let last = final_tag(segments);
    let tag = match last.find(['_', '/']) {
        Some(pos) => &last[..pos],
        None => last,
    };
    let analysis = match tables.tag_name(tag) {
        Some(name) => MorphAnalysis::new(tag, inflection, morphemes, name),
        None => MorphAnalysis::new(UNKNOWN_MARKER, inflection, morphemes, "unknown"),
    };
    tracing::debug!("inflection: {}", analysis);
    analysis
}
