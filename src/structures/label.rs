// Released under MIT License.

//! Implementation of atom labels and of the label index.
//!
//! Atoms are identified by their element symbol followed by a 1-based
//! counter of that element in file order, e.g. `Si2` is the second silicon atom.
//! Labels are only meaningful for the atom ordering of one particular file.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::errors::AtomLabelError;

fn label_regex() -> &'static Regex {
    static LABEL: OnceLock<Regex> = OnceLock::new();
    LABEL.get_or_init(|| {
        Regex::new(r"^([A-Za-z][A-Za-z_]*)([1-9][0-9]*)$")
            .expect("FATAL POSCAR ERROR | label::label_regex | Invalid regex.")
    })
}

/// Structured atom label: element symbol and 1-based occurrence of that element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AtomLabel {
    element: String,
    occurrence: usize,
}

impl AtomLabel {
    /// Create a new atom label.
    ///
    /// ## Panics
    /// Panics if `occurrence` is zero.
    pub fn new(element: &str, occurrence: usize) -> Self {
        if occurrence == 0 {
            panic!("FATAL POSCAR ERROR | AtomLabel::new | Occurrence must be positive.");
        }

        AtomLabel {
            element: element.to_owned(),
            occurrence,
        }
    }

    /// Get the element symbol of the label.
    pub fn get_element(&self) -> &str {
        &self.element
    }

    /// Get the 1-based occurrence of the element.
    pub fn get_occurrence(&self) -> usize {
        self.occurrence
    }
}

impl FromStr for AtomLabel {
    type Err = AtomLabelError;

    /// Parse a label such as `Si2`.
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// #
    /// let label: AtomLabel = "Si12".parse().unwrap();
    /// assert_eq!(label.get_element(), "Si");
    /// assert_eq!(label.get_occurrence(), 12);
    ///
    /// assert!("Si0".parse::<AtomLabel>().is_err());
    /// assert!("12".parse::<AtomLabel>().is_err());
    /// ```
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let caps = label_regex()
            .captures(string.trim())
            .ok_or_else(|| AtomLabelError::InvalidLabel(string.to_owned()))?;

        let occurrence = caps[2]
            .parse::<usize>()
            .map_err(|_| AtomLabelError::InvalidLabel(string.to_owned()))?;

        Ok(AtomLabel {
            element: caps[1].to_owned(),
            occurrence,
        })
    }
}

impl fmt::Display for AtomLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // padding applies to the whole label
        f.pad(&format!("{}{}", self.element, self.occurrence))
    }
}

/// Parse a list of label strings, failing on the first malformed label.
pub fn parse_labels<S: AsRef<str>>(strings: &[S]) -> Result<Vec<AtomLabel>, AtomLabelError> {
    strings.iter().map(|s| s.as_ref().parse()).collect()
}

/// Ordered mapping of atom labels to positions (line numbers or atom indices).
/// Iteration follows file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelIndex(IndexMap<AtomLabel, usize>);

impl LabelIndex {
    /// Assign consecutive positions starting at `start` to the atoms described by
    /// ordered element symbols and their counts.
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// #
    /// let symbols = vec!["Si".to_string(), "O".to_string()];
    /// let index = LabelIndex::build(&symbols, &[2, 1], 8);
    ///
    /// assert_eq!(index.get(&"Si1".parse().unwrap()), Some(8));
    /// assert_eq!(index.get(&"Si2".parse().unwrap()), Some(9));
    /// assert_eq!(index.get(&"O1".parse().unwrap()), Some(10));
    /// assert_eq!(index.get(&"O2".parse().unwrap()), None);
    /// ```
    ///
    /// ## Notes
    /// - If an element symbol is repeated in the header, its counter continues
    ///   from the previous block so that labels stay unique.
    pub fn build(symbols: &[String], counts: &[usize], start: usize) -> Self {
        let capacity = counts
            .iter()
            .try_fold(0usize, |total, &count| total.checked_add(count))
            .unwrap_or(0);
        let mut map = IndexMap::with_capacity(capacity);
        let mut seen: hashbrown::HashMap<&str, usize> = hashbrown::HashMap::new();
        let mut position = start;

        for (symbol, &count) in symbols.iter().zip(counts.iter()) {
            let counter = seen.entry(symbol.as_str()).or_insert(0);
            for _ in 0..count {
                *counter += 1;
                map.insert(AtomLabel::new(symbol, *counter), position);
                position += 1;
            }
        }

        LabelIndex(map)
    }

    /// Get the position assigned to a label.
    pub fn get(&self, label: &AtomLabel) -> Option<usize> {
        self.0.get(label).copied()
    }

    /// Get the position assigned to a label.
    ///
    /// ## Returns
    /// Position if the label exists. Otherwise `AtomLabelError::NotFound`.
    pub fn resolve(&self, label: &AtomLabel) -> Result<usize, AtomLabelError> {
        self.get(label)
            .ok_or_else(|| AtomLabelError::NotFound(label.to_string()))
    }

    /// Resolve every label. No position is returned unless all labels exist.
    pub fn resolve_all(&self, labels: &[AtomLabel]) -> Result<Vec<usize>, AtomLabelError> {
        labels.iter().map(|label| self.resolve(label)).collect()
    }

    /// Get the label assigned to a position.
    pub fn label_at(&self, position: usize) -> Option<&AtomLabel> {
        self.0
            .iter()
            .find_map(|(label, &pos)| (pos == position).then_some(label))
    }

    /// Number of labelled atoms.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no atoms are labelled.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over labels and positions in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&AtomLabel, usize)> {
        self.0.iter().map(|(label, &pos)| (label, pos))
    }

    /// Iterate over labels in file order.
    pub fn labels(&self) -> impl Iterator<Item = &AtomLabel> {
        self.0.keys()
    }

    /// Return a copy of the index in which every position is shifted so that the first atom maps to `start`.
    pub fn rebased(&self, start: usize) -> LabelIndex {
        LabelIndex(
            self.0
                .iter()
                .enumerate()
                .map(|(i, (label, _))| (label.clone(), start + i))
                .collect(),
        )
    }
}
