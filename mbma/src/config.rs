//! Configuration files and the analyzer settings read from them.
//!
//! A configuration file is a list of `[[section]]` headers followed by `key=value` lines.
//! Lines starting with `#` and blank lines are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use hashbrown::HashMap;

use crate::errors::{MbmaError, Result};

/// Name of the configuration section read by the analyzer.
pub const SECTION: &str = "mbma";

const DEFAULT_VERSION: &str = "1.0";
const DEFAULT_SET: &str = "http://ilk.uvt.nl/folia/sets/frog-mbma-nl";
const DEFAULT_TREE_FILE: &str = "mbma.igtree";
const DEFAULT_CLASSIFIER_OPTIONS: &str = "-a1";

/// Flags appended to the classifier options to keep the classifier quiet.
const QUIET_OPTIONS: &str = " +vs -vf";

/// Parsed configuration file.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    config_dir: PathBuf,
    sections: HashMap<String, HashMap<String, String>>,
}

impl Configuration {
    /// Parses a configuration from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    /// * `config_dir` - Directory relative file names are resolved against.
    ///
    /// # Errors
    ///
    /// A non-empty line that is neither a comment, a section header nor a `key=value` pair
    /// is an error.
    pub fn from_reader<R, P>(rdr: R, config_dir: P) -> Result<Self>
    where
        R: BufRead,
        P: Into<PathBuf>,
    {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current = String::from("global");
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line
                .strip_prefix("[[")
                .and_then(|rest| rest.strip_suffix("]]"))
            {
                current = name.trim().to_string();
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(MbmaError::invalid_argument(
                    "config",
                    format!("line {}: expected key=value: {}", i + 1, line),
                ));
            };
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            sections
                .entry(current.clone())
                .or_default()
                .insert(key.trim().to_string(), value.to_string());
        }
        Ok(Self {
            config_dir: config_dir.into(),
            sections,
        })
    }

    /// Reads a configuration file. Its directory becomes the configuration directory.
    pub fn read<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let config_dir = path
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf);
        Self::from_reader(BufReader::new(File::open(path)?), config_dir)
    }

    /// Looks up a key of a section.
    pub fn look_up(&self, key: &str, section: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    /// Sets a key of a section, replacing any existing value.
    pub fn set<K, V>(&mut self, key: K, value: V, section: &str)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Settings of the morphological analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbmaSettings {
    /// Verbosity of diagnostics.
    pub debug: u32,

    /// Version reported in the annotator name.
    pub version: String,

    /// Tagset identifier of the morphology layers.
    pub set: String,

    /// Path of the classifier model.
    pub tree_file: PathBuf,

    /// Options passed to the classifier.
    pub classifier_options: String,

    /// Directory containing the tag tables.
    pub config_dir: PathBuf,
}

impl Default for MbmaSettings {
    fn default() -> Self {
        Self {
            debug: 0,
            version: DEFAULT_VERSION.to_string(),
            set: DEFAULT_SET.to_string(),
            tree_file: PathBuf::from(DEFAULT_TREE_FILE),
            classifier_options: format!("{}{}", DEFAULT_CLASSIFIER_OPTIONS, QUIET_OPTIONS),
            config_dir: PathBuf::new(),
        }
    }
}

impl MbmaSettings {
    /// Reads the `mbma` section of a configuration.
    ///
    /// # Errors
    ///
    /// `debug` must be a non-negative integer.
    pub fn from_config(config: &Configuration) -> Result<Self> {
        let debug = match config.look_up("debug", SECTION) {
            Some(v) => v.parse().map_err(|_| {
                MbmaError::invalid_argument("debug", format!("not a number: {}", v))
            })?,
            None => 0,
        };
        let non_empty = |key| config.look_up(key, SECTION).filter(|v| !v.is_empty());
        let tree_file = non_empty("treeFile").unwrap_or(DEFAULT_TREE_FILE);
        let options = non_empty("timblOpts").unwrap_or(DEFAULT_CLASSIFIER_OPTIONS);
        Ok(Self {
            debug,
            version: non_empty("version").unwrap_or(DEFAULT_VERSION).to_string(),
            set: non_empty("set").unwrap_or(DEFAULT_SET).to_string(),
            tree_file: config.config_dir().join(tree_file),
            classifier_options: format!("{}{}", options, QUIET_OPTIONS),
            config_dir: config.config_dir().to_path_buf(),
        })
    }

    /// Name of the annotator recorded in the declaration.
    pub fn annotator(&self) -> String {
        format!("frog-mbma-{}", self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "\
# frog configuration
[[mbma]]
version=2.1
treeFile = mbma-merged.igtree
timblOpts=\"-a1 +D\"
debug=3

[[tagger]]
set=http://example.org/cgn
";

    #[test]
    fn test_configuration_look_up() {
        let config = Configuration::from_reader(CONFIG.as_bytes(), "/etc/frog").unwrap();

        assert_eq!(Some("2.1"), config.look_up("version", "mbma"));
        assert_eq!(Some("-a1 +D"), config.look_up("timblOpts", "mbma"));
        assert_eq!(Some("http://example.org/cgn"), config.look_up("set", "tagger"));
        assert_eq!(None, config.look_up("set", "mbma"));
        assert_eq!(Path::new("/etc/frog"), config.config_dir());
    }

    #[test]
    fn test_configuration_invalid_line() {
        let result = Configuration::from_reader("[[mbma]]\nversion\n".as_bytes(), "");

        assert!(result.is_err());
    }

    #[test]
    fn test_settings_from_config() {
        let config = Configuration::from_reader(CONFIG.as_bytes(), "/etc/frog").unwrap();
        let settings = MbmaSettings::from_config(&config).unwrap();

        assert_eq!(3, settings.debug);
        assert_eq!("frog-mbma-2.1", settings.annotator());
        assert_eq!(DEFAULT_SET, settings.set);
        assert_eq!(Path::new("/etc/frog/mbma-merged.igtree"), settings.tree_file);
        assert_eq!("-a1 +D +vs -vf", settings.classifier_options);
    }

    #[test]
    fn test_settings_defaults() {
        let config = Configuration::from_reader("".as_bytes(), "conf").unwrap();
        let settings = MbmaSettings::from_config(&config).unwrap();

        assert_eq!(0, settings.debug);
        assert_eq!("1.0", settings.version);
        assert_eq!(Path::new("conf/mbma.igtree"), settings.tree_file);
        assert_eq!("-a1 +vs -vf", settings.classifier_options);
    }

    #[test]
    fn test_settings_override() {
        let mut config = Configuration::from_reader(CONFIG.as_bytes(), "").unwrap();
        config.set("debug", "x", SECTION);

        assert!(MbmaSettings::from_config(&config).is_err());
    }
}
