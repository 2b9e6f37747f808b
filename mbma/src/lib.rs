#![cfg_attr(docsrs, feature(doc_cfg))]

//! # MBMA
//!
//! MBMA is a memory-based morphological analyzer for POS-tagged Dutch words.
//! Each character of a word is classified from its context window, and the class labels are
//! decoded into morphemes, spelling changes and inflections.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//! use std::sync::Arc;
//!
//! use mbma::document::PosAnnotation;
//! use mbma::{Analyzer, Configuration, InstanceBase, MbmaSettings, TagTables};
//!
//! let config = Configuration::read("frog.cfg").unwrap();
//! let settings = MbmaSettings::from_config(&config).unwrap();
//! let tables = TagTables::load(config.config_dir()).unwrap();
//!
//! let f = BufReader::new(File::open("mbma.instances").unwrap());
//! let oracle = InstanceBase::from_instances(f).unwrap();
//!
//! let analyzer = Analyzer::new(Arc::new(tables), settings);
//! let pos = PosAnnotation::from_cgn("WW(pv,verl,ev)").unwrap();
//! let selection = analyzer.classify(&oracle, "werkte", &pos).unwrap();
//! for layer in selection.layers() {
//!     println!("{:?}", layer);
//! }
//! ```
//!
//! Documents can be annotated in parallel with [`MultithreadAnalyzer`], which requires
//! **crate feature** `multithreading`.

mod analysis;
mod analyzer;
mod disambiguator;
mod tag_tables;

pub mod config;
pub mod document;
pub mod errors;
pub mod label;
pub mod oracle;
pub mod segment;
pub mod window;

pub use analysis::{compose, MorphAnalysis};
pub use analyzer::{Analyzer, SPECIAL_TAG};
pub use config::{Configuration, MbmaSettings};
pub use disambiguator::{disambiguate, Selection};
pub use errors::{MbmaError, Result};
pub use oracle::{InstanceBase, LabelOracle};
pub use tag_tables::TagTables;

#[cfg(feature = "multithreading")]
pub use analyzer::MultithreadAnalyzer;

