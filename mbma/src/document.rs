//! Minimal document model receiving morphology layers.

use std::fmt;

use crate::errors::{MbmaError, Result};

/// Annotation type of morphology layers.
pub const MORPHOLOGICAL: &str = "morphological";

/// POS annotation of a word: a head tag and its sub-features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosAnnotation {
    head: String,
    features: Vec<String>,
}

impl PosAnnotation {
    pub fn new<S>(head: S, features: Vec<String>) -> Self
    where
        S: Into<String>,
    {
        Self {
            head: head.into(),
            features,
        }
    }

    /// Parses a CGN tag such as `WW(pv,verl,ev)` or a bare head tag.
    ///
    /// # Errors
    ///
    /// This function will return an error variant when:
    ///
    /// * the head tag is empty.
    /// * the feature list is not closed by `)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mbma::document::PosAnnotation;
    ///
    /// let pos = PosAnnotation::from_cgn("WW(pv,verl,ev)").unwrap();
    /// assert_eq!("WW", pos.head());
    /// assert_eq!(&["pv", "verl", "ev"], pos.features());
    /// ```
    pub fn from_cgn<S>(tag: S) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let tag = tag.as_ref().trim();
        let (head, features) = match tag.find('(') {
            Some(open) => {
                let Some(inner) = tag[open + 1..].strip_suffix(')') else {
                    return Err(MbmaError::invalid_argument(
                        "tag",
                        format!("unclosed feature list: {}", tag),
                    ));
                };
                let features = inner
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(String::from)
                    .collect();
                (&tag[..open], features)
            }
            None => (tag, vec![]),
        };
        if head.is_empty() {
            return Err(MbmaError::invalid_argument("tag", "empty head tag"));
        }
        Ok(Self::new(head, features))
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }
}

impl fmt::Display for PosAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({})", self.head, self.features.join(","))
    }
}

/// A morpheme and the character offset at which it starts within its word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    pub value: String,
    pub offset: usize,
}

/// One analysis of a word as a sequence of morphemes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MorphologyLayer {
    pub morphemes: Vec<Morpheme>,
}

impl MorphologyLayer {
    /// Creates a layer from morpheme strings, computing cumulative character offsets.
    pub fn from_morphemes<S>(morphemes: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        let mut offset = 0;
        let morphemes = morphemes
            .iter()
            .map(|m| {
                let value = m.as_ref().to_string();
                let morpheme = Morpheme { value, offset };
                offset += morpheme.value.chars().count();
                morpheme
            })
            .collect();
        Self { morphemes }
    }
}

impl fmt::Display for MorphologyLayer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for m in &self.morphemes {
            write!(f, "[{}]", m.value)?;
        }
        Ok(())
    }
}

/// A word with its POS annotation and morphology layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    text: String,
    pos: PosAnnotation,
    morphology: Vec<MorphologyLayer>,
}

impl Word {
    pub fn new<S>(text: S, pos: PosAnnotation) -> Self
    where
        S: Into<String>,
    {
        Self {
            text: text.into(),
            pos,
            morphology: vec![],
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn pos(&self) -> &PosAnnotation {
        &self.pos
    }

    pub fn morphology(&self) -> &[MorphologyLayer] {
        &self.morphology
    }
}

/// Declaration of an annotation type used in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub annotation_type: String,
    pub set: String,
    pub annotator: String,
    pub annotator_type: String,
}

/// A sequence of words and the annotation declarations that apply to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    declarations: Vec<Declaration>,
    words: Vec<Word>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_word(&mut self, word: Word) {
        self.words.push(word);
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Adds a declaration unless an identical one exists.
    ///
    /// # Returns
    ///
    /// `true` if the declaration was added.
    pub fn declare(&mut self, declaration: Declaration) -> bool {
        if self.declarations.contains(&declaration) {
            false
        } else {
            self.declarations.push(declaration);
            true
        }
    }

    /// Appends one morphology layer per morpheme list to a word.
    ///
    /// # Errors
    ///
    /// `index` must be a valid word position.
    pub fn append_morphology<S>(&mut self, index: usize, layers: &[Vec<S>]) -> Result<()>
    where
        S: AsRef<str>,
    {
        let n_words = self.words.len();
        let word = self.words.get_mut(index).ok_or_else(|| {
            MbmaError::invalid_argument(
                "index",
                format!("word {} out of range ({} words)", index, n_words),
            )
        })?;
        word.morphology
            .extend(layers.iter().map(|l| MorphologyLayer::from_morphemes(l.as_slice())));
        Ok(())
    }
}
