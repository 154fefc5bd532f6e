// Released under MIT License.

//! Implementation of selective dynamics flags.

use std::fmt;
use std::str::FromStr;

use crate::errors::MobilityTagError;

/// Per-axis selective dynamics flags.
/// `true` (`T`) means the atom may relax along the axis, `false` (`F`) means it is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MobilityTag([bool; 3]);

impl Default for MobilityTag {
    /// All axes free (`T T T`).
    fn default() -> Self {
        MobilityTag([true; 3])
    }
}

impl From<[bool; 3]> for MobilityTag {
    fn from(arr: [bool; 3]) -> Self {
        MobilityTag(arr)
    }
}

impl MobilityTag {
    /// Tag freezing all three axes.
    pub const FROZEN: MobilityTag = MobilityTag([false; 3]);
    /// Tag releasing all three axes.
    pub const FREE: MobilityTag = MobilityTag([true; 3]);

    /// Check whether the atom may move along the axis with the given index.
    ///
    /// ## Panics
    /// Panics if `axis` is larger than 2.
    pub fn is_free(&self, axis: usize) -> bool {
        self.0[axis]
    }

    /// Get the flags as an array.
    pub fn get_flags(&self) -> [bool; 3] {
        self.0
    }

    /// Compact representation of the tag, e.g. `FFT`.
    pub fn compact(&self) -> String {
        self.0.iter().map(|&f| flag_char(f)).collect()
    }

    /// Parse three separate flag tokens as they appear at the end of a POSCAR coordinate line.
    pub fn from_tokens(tokens: &[&str]) -> Result<Self, MobilityTagError> {
        tokens.concat().parse()
    }
}

fn flag_char(flag: bool) -> char {
    if flag {
        'T'
    } else {
        'F'
    }
}

impl FromStr for MobilityTag {
    type Err = MobilityTagError;

    /// Parse a tag written either compactly (`FFT`) or separated by whitespace (`F F T`).
    /// Flags are case-insensitive.
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// #
    /// let tag: MobilityTag = "fFt".parse().unwrap();
    /// assert_eq!(tag.get_flags(), [false, false, true]);
    /// assert_eq!(tag.to_string(), "F   F   T");
    ///
    /// assert!("FF".parse::<MobilityTag>().is_err());
    /// assert!("FFX".parse::<MobilityTag>().is_err());
    /// ```
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = string.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != 3 {
            return Err(MobilityTagError::InvalidLength(string.to_owned()));
        }

        let mut flags = [true; 3];
        for (flag, &c) in flags.iter_mut().zip(chars.iter()) {
            *flag = match c {
                'T' | 't' => true,
                'F' | 'f' => false,
                other => return Err(MobilityTagError::InvalidFlag(string.to_owned(), other)),
            };
        }

        Ok(MobilityTag(flags))
    }
}

impl fmt::Display for MobilityTag {
    /// Flags separated by three spaces, as written into POSCAR files.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}   {}   {}",
            flag_char(self.0[0]),
            flag_char(self.0[1]),
            flag_char(self.0[2])
        )
    }
}
