use std::sync::Arc;

#[cfg(feature = "multithreading")]
use std::thread;

#[cfg(feature = "multithreading")]
use crossbeam_channel::Sender;

use crate::analysis::{self, MorphAnalysis};
use crate::config::MbmaSettings;
use crate::disambiguator::{self, Selection};
use crate::document::{Declaration, Document, PosAnnotation, MORPHOLOGICAL};
use crate::errors::{MbmaError, Result};
use crate::label::{self, NO_INFORMATION, UNKNOWN_TAG};
use crate::oracle::LabelOracle;
use crate::segment;
use crate::tag_tables::TagTables;
use crate::window;

/// POS head tag of words that are never analysed.
pub const SPECIAL_TAG: &str = "SPEC";

const ANNOTATOR_TYPE: &str = "auto";

/// Morphological analyzer.
#[derive(Debug, Clone)]
pub struct Analyzer {
    tables: Arc<TagTables>,
    settings: MbmaSettings,
}

impl Analyzer {
    /// Creates a new analyzer.
    ///
    /// # Arguments
    ///
    /// * `tables` - Tag tables shared by all analyzers.
    /// * `settings` - Settings read from the configuration.
    ///
    /// # Returns
    ///
    /// A new analyzer.
    pub fn new(tables: Arc<TagTables>, settings: MbmaSettings) -> Self {
        Self { tables, settings }
    }

    pub fn tables(&self) -> &TagTables {
        &self.tables
    }

    pub fn settings(&self) -> &MbmaSettings {
        &self.settings
    }

    /// Builds one candidate per alternative from per-character labels.
    ///
    /// # Arguments
    ///
    /// * `word` - A lowercased word.
    /// * `labels` - One class label per character of `word`.
    ///
    /// # Returns
    ///
    /// Candidates, starting with the last alternative.
    pub fn candidates<S>(&self, word: &str, labels: &[S]) -> Vec<MorphAnalysis>
    where
        S: AsRef<str>,
    {
        let class_parts: Vec<Vec<&str>> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let l = l.as_ref();
                if i == 0 && l == NO_INFORMATION {
                    vec![UNKNOWN_TAG]
                } else {
                    label::split_alternatives(l)
                }
            })
            .collect();
        let n_alternatives = class_parts.iter().map(Vec::len).max().unwrap_or(1).max(1);
        tracing::debug!("{}: {} alternatives", word, n_alternatives);

        (1..=n_alternatives)
            .rev()
            .map(|step| {
                let segments = segment::build_segments(step, word, &class_parts, n_alternatives);
                tracing::debug!("step {}: {:?}", step, segments);
                let segments = segment::resolve_inflections(segments);
                analysis::compose(&segments, &self.tables)
            })
            .collect()
    }

    /// Classifies each character of a word and builds its candidates.
    ///
    /// # Errors
    ///
    /// An empty word is an error. Errors of the oracle are returned as is.
    pub fn analyze<O>(&self, oracle: &O, word: &str) -> Result<Vec<MorphAnalysis>>
    where
        O: LabelOracle + ?Sized,
    {
        let word = word.to_lowercase();
        if word.is_empty() {
            return Err(MbmaError::invalid_argument("word", "empty word"));
        }
        let labels = window::make_instances(&word)
            .iter()
            .map(|inst| oracle.classify(inst))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("{}: labels {:?}", word, labels);
        Ok(self.candidates(&word, &labels))
    }

    /// Selects the morpheme lists of a tagged word.
    ///
    /// # Arguments
    ///
    /// * `oracle` - Classifier of window instances.
    /// * `text` - Text of the word.
    /// * `pos` - POS annotation of the word.
    ///
    /// # Errors
    ///
    /// This function will return an error variant when:
    ///
    /// * `text` is empty.
    /// * the head tag of `pos` has no conversion.
    /// * the oracle fails.
    pub fn classify<O>(&self, oracle: &O, text: &str, pos: &PosAnnotation) -> Result<Selection>
    where
        O: LabelOracle + ?Sized,
    {
        if text.is_empty() {
            return Err(MbmaError::invalid_argument("text", "empty word"));
        }
        if pos.head() == SPECIAL_TAG {
            return Ok(Selection::Unanalysed(vec![text.to_string()]));
        }
        let candidates = self.analyze(oracle, text)?;
        disambiguator::disambiguate(&candidates, text, pos, &self.tables)
    }

    /// Declaration of the morphology layers produced by this analyzer.
    pub fn declaration(&self) -> Declaration {
        Declaration {
            annotation_type: MORPHOLOGICAL.to_string(),
            set: self.settings.set.clone(),
            annotator: self.settings.annotator(),
            annotator_type: ANNOTATOR_TYPE.to_string(),
        }
    }

    /// Appends morphology layers to every word of a document.
    ///
    /// # Returns
    ///
    /// Indices and errors of the words left unannotated.
    pub fn annotate_document<O>(&self, oracle: &O, doc: &mut Document) -> Vec<(usize, MbmaError)>
    where
        O: LabelOracle + ?Sized,
    {
        doc.declare(self.declaration());
        let mut errors = vec![];
        for i in 0..doc.words().len() {
            let word = &doc.words()[i];
            let result = self.classify(oracle, word.text(), word.pos());
            if let Err(e) = store(doc, i, result) {
                errors.push((i, e));
            }
        }
        errors
    }

    /// Creates a multithreading analyzer. This function is the alias of
    /// [`MultithreadAnalyzer::new()`].
    #[cfg(feature = "multithreading")]
    #[cfg_attr(docsrs, doc(cfg(feature = "multithreading")))]
    pub fn multithreading<O>(self, oracle: O, n_threads: usize) -> Result<MultithreadAnalyzer>
    where
        O: LabelOracle + Clone + Send + 'static,
    {
        MultithreadAnalyzer::new(self, oracle, n_threads)
    }
}

fn store(doc: &mut Document, index: usize, result: Result<Selection>) -> Result<()> {
    match result {
        Ok(selection) => doc.append_morphology(index, &selection.into_layers()),
        Err(e) => {
            tracing::warn!(
                "word {} ({}) left unannotated: {}",
                index,
                doc.words().get(index).map_or("", |w| w.text()),
                e
            );
            Err(e)
        }
    }
}

/// Analyzer for multithreading.
///
/// Worker threads only compute selections. The calling thread is the only writer to the
/// document.
#[cfg(feature = "multithreading")]
#[cfg_attr(docsrs, doc(cfg(feature = "multithreading")))]
pub struct MultithreadAnalyzer {
    analyzer: Arc<Analyzer>,
    task_tx: Sender<Task>,
}

/// A word to classify and the channel of the call waiting for it.
#[cfg(feature = "multithreading")]
type Task = (usize, String, PosAnnotation, Sender<(usize, Result<Selection>)>);

#[cfg(feature = "multithreading")]
impl MultithreadAnalyzer {
    /// Creates a multithreading analyzer.
    ///
    /// # Arguments
    ///
    /// * `analyzer` - A normal analyzer.
    /// * `oracle` - Classifier cloned into each thread.
    /// * `n_threads` - The number of threads.
    ///
    /// # Errors
    ///
    /// `n_threads` must be at least 1.
    pub fn new<O>(analyzer: Analyzer, oracle: O, n_threads: usize) -> Result<Self>
    where
        O: LabelOracle + Clone + Send + 'static,
    {
        if n_threads == 0 {
            return Err(MbmaError::invalid_argument(
                "n_threads",
                "must be at least 1",
            ));
        }
        let analyzer = Arc::new(analyzer);

        let (task_tx, task_rx) = crossbeam_channel::unbounded::<Task>();
        for _ in 0..n_threads {
            let analyzer = Arc::clone(&analyzer);
            let oracle = oracle.clone();
            let task_rx = task_rx.clone();
            thread::spawn(move || {
                for (i, text, pos, result_tx) in task_rx {
                    let result = analyzer.classify(&oracle, &text, &pos);
                    // the caller may have given up on this document
                    let _ = result_tx.send((i, result));
                }
            });
        }
        tracing::debug!("started {} analyzer threads", n_threads);

        Ok(Self { analyzer, task_tx })
    }

    /// Declaration of the morphology layers produced by this analyzer.
    pub fn declaration(&self) -> Declaration {
        self.analyzer.declaration()
    }

    /// Appends morphology layers to every word of a document.
    ///
    /// Layers are appended in word order, whatever order the threads finish in. Each call
    /// collects its results on its own channel, so several documents can be annotated at
    /// the same time from different threads.
    ///
    /// # Returns
    ///
    /// Indices and errors of the words left unannotated.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker threads are gone.
    pub fn annotate_document(&self, doc: &mut Document) -> Result<Vec<(usize, MbmaError)>> {
        doc.declare(self.analyzer.declaration());

        let n_words = doc.words().len();
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        for (i, word) in doc.words().iter().enumerate() {
            self.task_tx
                .send((
                    i,
                    word.text().to_string(),
                    word.pos().clone(),
                    result_tx.clone(),
                ))
                .map_err(|_| worker_gone())?;
        }
        drop(result_tx);
        let mut results: Vec<Option<Result<Selection>>> = (0..n_words).map(|_| None).collect();
        for _ in 0..n_words {
            let (i, result) = result_rx.recv().map_err(|_| worker_gone())?;
            results[i] = Some(result);
        }

        let mut errors = vec![];
        for (i, result) in results.into_iter().enumerate() {
            let Some(result) = result else {
                continue;
            };
            if let Err(e) = store(doc, i, result) {
                errors.push((i, e));
            }
        }
        Ok(errors)
    }
}

#[cfg(feature = "multithreading")]
fn worker_gone() -> MbmaError {
    MbmaError::IOError(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "analyzer threads terminated",
    ))
}
