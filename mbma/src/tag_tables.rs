use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hashbrown::HashMap;

use crate::errors::{MbmaError, Result};

/// File name of the table converting POS head tags.
pub const MAIN_TABLE: &str = "cgntags.main";

/// File name of the table converting POS sub-features.
pub const SUB_TABLE: &str = "cgntags.sub";

/// Marker used for unknown tags and inflections.
pub const UNKNOWN_MARKER: &str = "X";

const TAG_NAMES: [(&str, &str); 13] = [
    ("N", "noun"),
    ("A", "adjective"),
    ("Q", "quantifier/numeral"),
    ("V", "verb"),
    ("D", "article"),
    ("O", "pronoun"),
    ("B", "adverb"),
    ("P", "preposition"),
    ("Y", "conjunction"),
    ("I", "interjection"),
    ("X", "unanalysed"),
    ("Z", "expression part"),
    ("PN", "proper noun"),
];

const INFLECTION_NAMES: [(char, &str); 21] = [
    ('X', ""),
    ('s', "separated"),
    ('e', "singular"),
    ('m', "plural"),
    ('d', "diminutive"),
    ('G', "genitive"),
    ('D', "dative"),
    ('P', "positive"),
    ('C', "comparative"),
    ('S', "superlative"),
    ('E', "suffix-e"),
    ('i', "infinitive"),
    ('p', "participle"),
    ('t', "present tense"),
    ('v', "past tense"),
    ('1', "1st person"),
    ('2', "2nd person"),
    ('3', "3rd person"),
    ('I', "inversed"),
    ('g', "imperative"),
    ('a', "subjunctive"),
];

/// Mappings between classifier tags, their names, inflection codes and the POS tagset.
///
/// The tables are built once and only read afterwards, so one instance can be shared by all
/// threads through an [`Arc`](std::sync::Arc).
#[derive(Debug, Clone)]
pub struct TagTables {
    tag_names: HashMap<&'static str, &'static str>,
    inflection_names: HashMap<char, &'static str>,
    tag_conversion: HashMap<String, String>,
}

impl Default for TagTables {
    fn default() -> Self {
        Self {
            tag_names: TAG_NAMES.into_iter().collect(),
            inflection_names: INFLECTION_NAMES.into_iter().collect(),
            tag_conversion: HashMap::new(),
        }
    }
}

impl TagTables {
    /// Creates tag tables from the contents of the main and sub conversion tables.
    ///
    /// # Arguments
    ///
    /// * `main` - Lines of `<code> <convertedCode>` for POS head tags.
    /// * `sub` - Lines of `<code> <convertedCode>` for POS sub-features.
    ///
    /// # Errors
    ///
    /// A line of `main` with fewer than two fields is an error. Malformed lines of `sub`
    /// are skipped.
    pub fn from_readers<M, S>(main: M, sub: S) -> Result<Self>
    where
        M: BufRead,
        S: BufRead,
    {
        let mut tables = Self::default();
        for line in main.lines() {
            let line = line?;
            let fields: Vec<&str> = line.split(' ').filter(|f| !f.is_empty()).collect();
            if fields.len() < 2 {
                tracing::error!("splitting '{}' failed", line);
                return Err(MbmaError::invalid_table(
                    MAIN_TABLE,
                    format!("splitting '{}' failed", line),
                ));
            }
            tables.add_conversion(fields[0], fields[1]);
        }
        for line in sub.lines() {
            let line = line?;
            let fields: Vec<&str> = line.split(' ').filter(|f| !f.is_empty()).collect();
            if fields.len() == 2 {
                tables.add_conversion(fields[0], fields[1]);
            }
        }
        Ok(tables)
    }

    /// Loads `cgntags.main` and `cgntags.sub` from a directory.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be opened or the main table is malformed.
    pub fn load<P>(dir: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let open = |name: &str| {
            let path = dir.join(name);
            File::open(&path)
                .map(BufReader::new)
                .map_err(|e| MbmaError::missing_table(path.display().to_string(), e))
        };
        let tables = Self::from_readers(open(MAIN_TABLE)?, open(SUB_TABLE)?)?;
        tracing::info!(
            "loaded {} tag conversions from {}",
            tables.n_conversions(),
            dir.display()
        );
        Ok(tables)
    }

    // The first occurrence of a code wins.
    fn add_conversion(&mut self, code: &str, converted: &str) {
        self.tag_conversion
            .entry(code.to_string())
            .or_insert_with(|| converted.to_string());
    }

    /// Gets the human-readable name of a classifier tag.
    pub fn tag_name(&self, tag: &str) -> Option<&'static str> {
        self.tag_names.get(tag).copied()
    }

    /// Gets the human-readable name of an inflection code.
    pub fn inflection_name(&self, code: char) -> Option<&'static str> {
        self.inflection_names.get(&code).copied()
    }

    /// Converts a POS tag or sub-feature to the analyzer's tag alphabet.
    pub fn convert(&self, code: &str) -> Option<&str> {
        self.tag_conversion.get(code).map(String::as_str)
    }

    /// Number of entries in the conversion table.
    pub fn n_conversions(&self) -> usize {
        self.tag_conversion.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: &[u8] = b"N N\nADJ A\nWW V\nTW Q\nSPEC PN\n";
    const SUB: &[u8] = b"ev e\nmv m\nverl v\ntgw t\nbroken\ndim d extra\n";

    #[test]
    fn test_fixed_tables() {
        let tables = TagTables::default();

        assert_eq!(Some("verb"), tables.tag_name("V"));
        assert_eq!(Some("proper noun"), tables.tag_name("PN"));
        assert_eq!(None, tables.tag_name("W"));
        assert_eq!(Some("past tense"), tables.inflection_name('v'));
        assert_eq!(Some(""), tables.inflection_name('X'));
        assert_eq!(None, tables.inflection_name('x'));
    }

    #[test]
    fn test_from_readers() {
        let tables = TagTables::from_readers(MAIN, SUB).unwrap();

        assert_eq!(Some("V"), tables.convert("WW"));
        assert_eq!(Some("v"), tables.convert("verl"));
        assert_eq!(None, tables.convert("broken"));
        assert_eq!(None, tables.convert("dim"));
        assert_eq!(9, tables.n_conversions());
    }

    #[test]
    fn test_from_readers_first_entry_wins() {
        let tables = TagTables::from_readers(&b"WW V\nWW N\n"[..], &b"WW A\n"[..]).unwrap();

        assert_eq!(Some("V"), tables.convert("WW"));
    }

    #[test]
    fn test_from_readers_malformed_main() {
        let result = TagTables::from_readers(&b"N N\nADJ\n"[..], SUB);

        assert!(matches!(result, Err(MbmaError::InvalidTable(_))));
        assert_eq!(
            "InvalidTableError: cgntags.main: splitting 'ADJ' failed",
            result.err().unwrap().to_string()
        );
    }

    #[test]
    fn test_load_missing_directory() {
        let result = TagTables::load("/nonexistent/mbma/config");

        assert!(matches!(result, Err(MbmaError::MissingTable(_))));
    }
}
