//! Classifiers mapping window instances to class labels.

use std::io::{BufRead, Read, Write};
use std::sync::Arc;

use bincode::{Decode, Encode};
use hashbrown::HashMap;

use crate::errors::{MbmaError, Result};
use crate::label::NO_INFORMATION;
use crate::window::{FIELD_SEPARATOR, QUERY_MARKER, WINDOW_SIZE};

/// A classifier returning one class label per window instance.
pub trait LabelOracle {
    /// Classifies one instance produced by [`make_instances()`](crate::window::make_instances).
    ///
    /// # Errors
    ///
    /// Implementations backed by an external classifier may fail.
    fn classify(&self, instance: &str) -> Result<String>;
}

impl<F> LabelOracle for F
where
    F: Fn(&str) -> String,
{
    fn classify(&self, instance: &str) -> Result<String> {
        Ok(self(instance))
    }
}

#[derive(Decode, Encode)]
struct InstanceBaseData {
    entries: Vec<(String, String)>,
    default_label: String,
}

/// Exact-match instance memory.
///
/// Cloning shares the stored instances.
#[derive(Debug, Clone)]
pub struct InstanceBase {
    labels: Arc<HashMap<String, String>>,
    default_label: String,
}

impl Default for InstanceBase {
    fn default() -> Self {
        Self {
            labels: Arc::new(HashMap::new()),
            default_label: NO_INFORMATION.to_string(),
        }
    }
}

impl InstanceBase {
    /// Builds an instance base from a text instance file.
    ///
    /// Each line holds the window fields, each followed by a comma, and then the class label.
    /// When an instance occurs with several labels, the most frequent one is kept.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Errors
    ///
    /// A line with a wrong number of fields or without a label is an error.
    pub fn from_instances<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        // label counts in order of first appearance
        let mut counts: HashMap<String, Vec<(String, usize)>> = HashMap::new();
        for (i, line) in rdr.lines().enumerate() {
            let line = line?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let (fields, label) = line
                .rsplit_once(FIELD_SEPARATOR)
                .filter(|(_, label)| !label.is_empty())
                .ok_or_else(|| {
                    MbmaError::invalid_argument(
                        "instances",
                        format!("line {}: no class label: {}", i + 1, line),
                    )
                })?;
            let n_fields = fields.split(FIELD_SEPARATOR).count();
            if n_fields != WINDOW_SIZE {
                return Err(MbmaError::invalid_argument(
                    "instances",
                    format!(
                        "line {}: expected {} fields, got {}",
                        i + 1,
                        WINDOW_SIZE,
                        n_fields
                    ),
                ));
            }
            let key = format!("{}{}{}", fields, FIELD_SEPARATOR, QUERY_MARKER);
            let entry = counts.entry(key).or_default();
            match entry.iter_mut().find(|(l, _)| l == label) {
                Some((_, n)) => *n += 1,
                None => entry.push((label.to_string(), 1)),
            }
        }

        let mut labels = HashMap::with_capacity(counts.len());
        for (key, candidates) in counts {
            let mut best: Option<(String, usize)> = None;
            for (label, n) in candidates {
                if best.as_ref().map_or(true, |(_, m)| n > *m) {
                    best = Some((label, n));
                }
            }
            if let Some((label, _)) = best {
                labels.insert(key, label);
            }
        }
        tracing::info!("{} instances loaded", labels.len());
        Ok(Self {
            labels: Arc::new(labels),
            default_label: NO_INFORMATION.to_string(),
        })
    }

    /// Number of stored instances.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Exports the instance base.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        let mut entries: Vec<(String, String)> = self
            .labels
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_unstable();
        let data = InstanceBaseData {
            entries,
            default_label: self.default_label.clone(),
        };
        bincode::encode_into_std_write(data, wtr, bincode::config::standard())?;
        Ok(())
    }

    /// Creates an instance base from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// An instance base read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is. An instance that does not end
    /// with the query marker or an empty default label is an error.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let data: InstanceBaseData =
            bincode::decode_from_std_read(rdr, bincode::config::standard())?;
        if data.default_label.is_empty() {
            return Err(MbmaError::invalid_model("empty default label"));
        }
        let mut labels = HashMap::with_capacity(data.entries.len());
        for (key, label) in data.entries {
            if !key.ends_with(QUERY_MARKER) {
                return Err(MbmaError::invalid_model(format!(
                    "malformed instance: {}",
                    key
                )));
            }
            labels.insert(key, label);
        }
        Ok(Self {
            labels: Arc::new(labels),
            default_label: data.default_label,
        })
    }
}

impl LabelOracle for InstanceBase {
    fn classify(&self, instance: &str) -> Result<String> {
        Ok(self
            .labels
            .get(instance)
            .unwrap_or(&self.default_label)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTANCES: &str = "\
_,_,_,_,_,_,w,e,r,k,t,e,_,V
_,_,_,_,_,w,e,r,k,t,e,_,_,0
_,_,_,_,_,w,e,r,k,t,e,_,_,N

_,_,_,_,_,w,e,r,k,t,e,_,_,N
_,_,w,e,r,k,t,e,_,_,_,_,_,ve
_,_,w,e,r,k,t,e,_,_,_,_,_,0
";

    #[test]
    fn test_from_instances_majority() {
        let base = InstanceBase::from_instances(INSTANCES.as_bytes()).unwrap();

        assert_eq!(3, base.len());
        assert_eq!(
            "V",
            base.classify("_,_,_,_,_,_,w,e,r,k,t,e,_,?").unwrap()
        );
        assert_eq!(
            "N",
            base.classify("_,_,_,_,_,w,e,r,k,t,e,_,_,?").unwrap()
        );
    }

    #[test]
    fn test_from_instances_tie_keeps_first() {
        let base = InstanceBase::from_instances(INSTANCES.as_bytes()).unwrap();

        assert_eq!(
            "ve",
            base.classify("_,_,w,e,r,k,t,e,_,_,_,_,_,?").unwrap()
        );
    }

    #[test]
    fn test_classify_unseen() {
        let base = InstanceBase::from_instances(INSTANCES.as_bytes()).unwrap();

        assert_eq!("0", base.classify("a,b,c,?").unwrap());
        assert_eq!("0", InstanceBase::default().classify("").unwrap());
    }

    #[test]
    fn test_from_instances_missing_label() {
        let result = InstanceBase::from_instances("_,_,_,_,_,_,w,e,r,k,t,e,_,\n".as_bytes());

        assert!(matches!(result, Err(MbmaError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_instances_wrong_field_count() {
        let result = InstanceBase::from_instances("w,e,r,V\n".as_bytes());

        assert!(matches!(result, Err(MbmaError::InvalidArgument(_))));
    }

    #[test]
    fn test_write_read() {
        let base = InstanceBase::from_instances(INSTANCES.as_bytes()).unwrap();
        let mut buf = vec![];
        base.write(&mut buf).unwrap();
        let loaded = InstanceBase::read(&mut buf.as_slice()).unwrap();

        assert_eq!(base.len(), loaded.len());
        assert_eq!(
            "ve",
            loaded.classify("_,_,w,e,r,k,t,e,_,_,_,_,_,?").unwrap()
        );
    }

    #[test]
    fn test_read_truncated() {
        let base = InstanceBase::from_instances(INSTANCES.as_bytes()).unwrap();
        let mut buf = vec![];
        base.write(&mut buf).unwrap();
        buf.truncate(buf.len() / 2);

        assert!(InstanceBase::read(&mut buf.as_slice()).is_err());
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |instance: &str| {
            if instance.starts_with('_') {
                "0".to_string()
            } else {
                "N".to_string()
            }
        };

        assert_eq!("N", oracle.classify("a,?").unwrap());
        assert_eq!("0", oracle.classify("_,?").unwrap());
    }
}
