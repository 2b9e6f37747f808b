use std::collections::BTreeMap;

use crate::analysis::MorphAnalysis;
use crate::document::PosAnnotation;
use crate::errors::{MbmaError, Result};
use crate::tag_tables::TagTables;

/// Morpheme lists chosen for a word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The whole word is one morpheme: no candidate matched the POS tag, or the word is not
    /// analysed at all.
    Unanalysed(Vec<String>),

    /// Exactly one candidate matched the POS tag.
    Unique(Vec<String>),

    /// Several candidates matched; the best scoring ones, ordered by their morpheme key.
    Best(Vec<Vec<String>>),

    /// Scoring left nothing to annotate.
    Empty,
}

impl Selection {
    /// Gets the morpheme lists, one per morphology layer.
    pub fn layers(&self) -> Vec<&[String]> {
        match self {
            Self::Unanalysed(m) | Self::Unique(m) => vec![m.as_slice()],
            Self::Best(ms) => ms.iter().map(Vec::as_slice).collect(),
            Self::Empty => vec![],
        }
    }

    /// Consumes the selection and returns the morpheme lists.
    pub fn into_layers(self) -> Vec<Vec<String>> {
        match self {
            Self::Unanalysed(m) | Self::Unique(m) => vec![m],
            Self::Best(ms) => ms,
            Self::Empty => vec![],
        }
    }
}

fn morpheme_key(morphemes: &[String]) -> String {
    let mut key = String::new();
    for m in morphemes {
        key.push_str(m);
        key.push('+');
    }
    key
}

/// Chooses the candidate analyses consistent with the POS tag of a word.
///
/// # Arguments
///
/// * `candidates` - Candidate analyses of the word.
/// * `word` - Text of the word, used as a single morpheme when nothing matches.
/// * `pos` - POS annotation of the word.
/// * `tables` - Tag tables.
///
/// # Errors
///
/// If the head tag of `pos` has no conversion, [`MbmaError::UnknownValue`] is returned.
pub fn disambiguate(
    candidates: &[MorphAnalysis],
    word: &str,
    pos: &PosAnnotation,
    tables: &TagTables,
) -> Result<Selection> {
    let head = pos.head();
    let Some(converted) = tables.convert(head) else {
        tracing::debug!("no match for {}", head);
        return Err(MbmaError::unknown_value(head));
    };

    let matches: Vec<&MorphAnalysis> = candidates
        .iter()
        .filter(|a| a.tag() == converted)
        .collect();
    tracing::debug!(
        "main tag {} matches {} morpho analyses",
        converted,
        matches.len()
    );

    match matches.len() {
        0 => Ok(Selection::Unanalysed(vec![word.to_lowercase()])),
        1 => Ok(Selection::Unique(matches[0].morphemes().to_vec())),
        _ => {
            let features: Vec<&str> = pos
                .features()
                .iter()
                .filter_map(|f| tables.convert(f))
                .collect();

            let mut max_count = 0;
            let mut best: BTreeMap<String, &[String]> = BTreeMap::new();
            for a in matches {
                let count = features
                    .iter()
                    .filter(|&&c| a.inflection().contains(c))
                    .count();
                tracing::debug!("score of {}: {} max was {}", a, count, max_count);
                if count >= max_count {
                    if count > max_count {
                        max_count = count;
                        best.clear();
                    }
                    best.entry(morpheme_key(a.morphemes()))
                        .or_insert_with(|| a.morphemes());
                }
            }

            if best.is_empty() {
                tracing::warn!("no possible morpheme sets for '{}'", word);
                return Ok(Selection::Empty);
            }
            Ok(Selection::Best(
                best.into_values().map(<[String]>::to_vec).collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> TagTables {
        TagTables::from_readers(&b"WW V\nN N\nADJ A\n"[..], &b"verl v\nev e\nmv m\n"[..]).unwrap()
    }

    fn analysis(tag: &str, infl: &str, morphemes: &[&str]) -> MorphAnalysis {
        MorphAnalysis::new(
            tag,
            infl,
            morphemes.iter().map(|m| m.to_string()).collect(),
            "",
        )
    }

    fn layer(morphemes: &[&str]) -> Vec<String> {
        morphemes.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn test_disambiguate_unknown_tag() {
        let pos = PosAnnotation::new("FOO", vec![]);
        let result = disambiguate(&[], "Werkte", &pos, &tables());

        assert!(matches!(result, Err(MbmaError::UnknownValue(_))));
    }

    #[test]
    fn test_disambiguate_fallback() {
        let pos = PosAnnotation::new("N", vec![]);
        let candidates = [analysis("V", "ve", &["werk", "te"]), MorphAnalysis::default()];

        assert_eq!(
            Selection::Unanalysed(layer(&["werkte"])),
            disambiguate(&candidates, "Werkte", &pos, &tables()).unwrap()
        );
    }

    #[test]
    fn test_disambiguate_unique() {
        let pos = PosAnnotation::new("WW", vec!["verl".into()]);
        let candidates = [
            analysis("N", "m", &["werk", "te"]),
            analysis("V", "ve", &["wer", "kte"]),
        ];

        assert_eq!(
            Selection::Unique(layer(&["wer", "kte"])),
            disambiguate(&candidates, "werkte", &pos, &tables()).unwrap()
        );
    }

    #[test]
    fn test_disambiguate_best_score() {
        let pos = PosAnnotation::new("WW", vec!["verl".into(), "ev".into()]);
        let candidates = [
            analysis("V", "vm", &["werkt", "e"]),
            analysis("V", "ve", &["werk", "te"]),
        ];

        assert_eq!(
            Selection::Best(vec![layer(&["werk", "te"])]),
            disambiguate(&candidates, "werkte", &pos, &tables()).unwrap()
        );
    }

    #[test]
    fn test_disambiguate_ties_are_kept_in_key_order() {
        let pos = PosAnnotation::new("WW", vec!["verl".into(), "unconverted".into()]);
        let candidates = [
            analysis("V", "ve", &["werkt", "e"]),
            analysis("V", "vm", &["werk", "te"]),
            analysis("V", "v", &["werk", "te"]),
        ];

        assert_eq!(
            Selection::Best(vec![layer(&["werk", "te"]), layer(&["werkt", "e"])]),
            disambiguate(&candidates, "werkte", &pos, &tables()).unwrap()
        );
    }

    #[test]
    fn test_disambiguate_zero_scores_are_ties() {
        let pos = PosAnnotation::new("WW", vec![]);
        let candidates = [
            analysis("V", "t", &["loop", "t"]),
            analysis("V", "v", &["loopt"]),
        ];
        let selection = disambiguate(&candidates, "loopt", &pos, &tables()).unwrap();

        assert_eq!(2, selection.layers().len());
    }
}
