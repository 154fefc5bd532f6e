// Released under MIT License.

//! Implementation of functions for reading and writing POSCAR files.
//!
//! Two views of a file are provided:
//! - [`PoscarFile`] keeps the raw lines of the file together with its parsed header
//!   and is used when lines must be reproduced verbatim.
//! - [`Structure`] is the fully parsed crystal structure.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::errors::{ParsePoscarError, WritePoscarError};
use crate::io::write_atomically;
use crate::structures::{
    atom::Atom, label::LabelIndex, lattice::Lattice, mobility::MobilityTag, vector3d::Vector3D,
};
use crate::structure::Structure;

/// Index of the line containing element symbols.
const SYMBOLS_LINE: usize = 5;
/// Index of the line containing atom counts.
const COUNTS_LINE: usize = 6;
/// Index of the optional selective dynamics line.
const SELECTIVE_LINE: usize = 7;

/// Element symbols and per-element atom counts declared in a POSCAR header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoscarHeader {
    symbols: Vec<String>,
    counts: Vec<usize>,
}

impl PoscarHeader {
    /// Get the element symbols in header order.
    pub fn get_symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Get the atom counts in header order.
    pub fn get_counts(&self) -> &[usize] {
        &self.counts
    }

    /// Get the total number of atoms.
    ///
    /// ## Notes
    /// - The sum cannot overflow: `parse_header` rejects counts whose total exceeds `usize::MAX`.
    pub fn get_n_atoms(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Parse element symbols (line 5) and atom counts (line 6) of a POSCAR file.
///
/// ## Returns
/// `PoscarHeader` if the header is valid. Otherwise `ParsePoscarError`.
///
/// ## Example
/// ```
/// # use poscar_tools::io::poscar_io::parse_header;
/// #
/// let lines: Vec<String> = ["Si O", "1.0", "5 0 0", "0 5 0", "0 0 5", "Si O", "2 1", "Direct"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
///
/// let header = parse_header(&lines).unwrap();
/// assert_eq!(header.get_symbols(), ["Si", "O"]);
/// assert_eq!(header.get_counts(), [2, 1]);
/// ```
pub fn parse_header<S: AsRef<str>>(lines: &[S]) -> Result<PoscarHeader, ParsePoscarError> {
    let (symbols_line, counts_line) = match (lines.get(SYMBOLS_LINE), lines.get(COUNTS_LINE)) {
        (Some(s), Some(c)) => (s.as_ref(), c.as_ref()),
        _ => return Err(ParsePoscarError::LineNotFound(Box::from(Path::new("")))),
    };

    let symbols: Vec<String> = symbols_line
        .split_whitespace()
        .map(|s| s.to_owned())
        .collect();

    if symbols.is_empty()
        || symbols
            .iter()
            .any(|s| !s.starts_with(|c: char| c.is_ascii_alphabetic()))
    {
        return Err(ParsePoscarError::ParseSymbolsErr(
            symbols_line.trim_end().to_owned(),
        ));
    }

    let counts = counts_line
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<Result<Vec<usize>, _>>()
        .map_err(|_| ParsePoscarError::ParseCountsErr(counts_line.trim_end().to_owned()))?;

    if symbols.len() != counts.len() {
        return Err(ParsePoscarError::CountMismatch(symbols.len(), counts.len()));
    }

    if counts
        .iter()
        .try_fold(0usize, |total, &count| total.checked_add(count))
        .is_none()
    {
        return Err(ParsePoscarError::ParseCountsErr(
            counts_line.trim_end().to_owned(),
        ));
    }

    Ok(PoscarHeader { symbols, counts })
}

/// Check whether the line declares selective dynamics (first character `s` or `S`).
pub fn is_selective_line(line: &str) -> bool {
    matches!(line.trim_start().chars().next(), Some('s') | Some('S'))
}

/// Raw lines of a POSCAR file together with its parsed header.
#[derive(Debug, Clone, PartialEq)]
pub struct PoscarFile {
    /// Lines including their original line terminators.
    lines: Vec<String>,
    header: PoscarHeader,
    selective: bool,
}

impl PoscarFile {
    /// Read a POSCAR file keeping all of its lines.
    ///
    /// ## Returns
    /// `PoscarFile` if the header is valid and the file contains a coordinate line
    /// for every declared atom. Otherwise `ParsePoscarError`.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, ParsePoscarError> {
        let path = filename.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|_| ParsePoscarError::FileNotFound(Box::from(path)))?;

        PoscarFile::parse(&content).map_err(|e| match e {
            ParsePoscarError::LineNotFound(_) => ParsePoscarError::LineNotFound(Box::from(path)),
            other => other,
        })
    }

    /// Parse the content of a POSCAR file.
    pub fn parse(content: &str) -> Result<Self, ParsePoscarError> {
        let lines: Vec<String> = content.split_inclusive('\n').map(|s| s.to_owned()).collect();

        let header = parse_header(&lines)?;
        let selective = lines
            .get(SELECTIVE_LINE)
            .map(|line| is_selective_line(line))
            .ok_or_else(|| ParsePoscarError::LineNotFound(Box::from(Path::new(""))))?;

        let file = PoscarFile {
            lines,
            header,
            selective,
        };

        if file.lines.len() <= file.mode_line() {
            return Err(ParsePoscarError::LineNotFound(Box::from(Path::new(""))));
        }

        let n_atoms = file.header.get_n_atoms();
        if file.lines.len() - file.first_atom_line() < n_atoms {
            return Err(ParsePoscarError::LineNotFound(Box::from(Path::new(""))));
        }

        // validate every coordinate line before anybody relies on it
        for i in 0..n_atoms {
            file.coordinate_fields(i)?;
            if file.selective {
                file.existing_flags(i)?;
            }
        }

        if file.lines[file.first_atom_line() + n_atoms..]
            .iter()
            .any(|line| !line.trim().is_empty())
        {
            log::debug!("POSCAR file contains additional data after the coordinate block.");
        }

        Ok(file)
    }

    /// Get all lines of the file (including line terminators).
    pub fn get_lines(&self) -> &[String] {
        &self.lines
    }

    /// Get the parsed header.
    pub fn get_header(&self) -> &PoscarHeader {
        &self.header
    }

    /// Returns `true` if the file declares selective dynamics.
    pub fn is_selective(&self) -> bool {
        self.selective
    }

    /// Index of the line specifying the coordinate mode (`Direct` or `Cartesian`).
    pub fn mode_line(&self) -> usize {
        SELECTIVE_LINE + usize::from(self.selective)
    }

    /// Index of the line containing coordinates of the first atom.
    pub fn first_atom_line(&self) -> usize {
        self.mode_line() + 1
    }

    /// Number of atoms declared in the header.
    pub fn get_n_atoms(&self) -> usize {
        self.header.get_n_atoms()
    }

    /// Build the mapping of atom labels to line numbers of this file.
    pub fn label_index(&self) -> LabelIndex {
        LabelIndex::build(
            &self.header.symbols,
            &self.header.counts,
            self.first_atom_line(),
        )
    }

    /// Get the coordinate line of the atom with the given index.
    fn atom_line(&self, index: usize) -> &str {
        &self.lines[self.first_atom_line() + index]
    }

    /// Get the first three whitespace-separated fields of an atom's coordinate line.
    pub fn coordinate_fields(&self, index: usize) -> Result<[&str; 3], ParsePoscarError> {
        let line = self.atom_line(index);
        let mut split = line.split_whitespace();
        match (split.next(), split.next(), split.next()) {
            (Some(x), Some(y), Some(z)) => Ok([x, y, z]),
            _ => Err(ParsePoscarError::ParseAtomLineErr(line.trim_end().to_owned())),
        }
    }

    /// Get the coordinates of an atom exactly as listed in the file
    /// (fractional or Cartesian, depending on the coordinate mode, without scaling).
    pub fn coordinates(&self, index: usize) -> Result<Vector3D, ParsePoscarError> {
        let line = self.atom_line(index);
        line_as_vector(line)
            .map(Vector3D::from)
            .ok_or_else(|| ParsePoscarError::ParseAtomLineErr(line.trim_end().to_owned()))
    }

    /// Get the line terminator used by the file (`\r\n` or `\n`), judged by the coordinate mode line.
    pub fn line_ending(&self) -> &'static str {
        if self.lines[self.mode_line()].ends_with("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Get the selective dynamics flags of an atom as declared in the file.
    ///
    /// ## Returns
    /// `None` if the file does not declare selective dynamics.
    pub fn existing_flags(&self, index: usize) -> Result<Option<MobilityTag>, ParsePoscarError> {
        if !self.selective {
            return Ok(None);
        }

        let line = self.atom_line(index);
        let tokens: Vec<&str> = line.split_whitespace().skip(3).take(3).collect();
        if tokens.len() != 3 {
            return Err(ParsePoscarError::ParseFlagsErr(line.trim_end().to_owned()));
        }

        MobilityTag::from_tokens(&tokens)
            .map(Some)
            .map_err(|_| ParsePoscarError::ParseFlagsErr(line.trim_end().to_owned()))
    }
}

/// Read a POSCAR file and construct a `Structure`.
///
/// ## Notes
/// - Cartesian coordinates are converted into fractional coordinates.
/// - Positions are **not** wrapped into the unit cell.
pub fn read_poscar(filename: impl AsRef<Path>) -> Result<Structure, ParsePoscarError> {
    let path = filename.as_ref();
    let file = PoscarFile::from_file(path)?;
    let structure = structure_from_file(&file)?;
    log::debug!(
        "Read {} atoms of {} species from `{}`.",
        structure.get_n_atoms(),
        file.get_header().get_symbols().len(),
        path.display()
    );

    Ok(structure)
}

/// Construct a `Structure` from an already read POSCAR file.
pub fn structure_from_file(file: &PoscarFile) -> Result<Structure, ParsePoscarError> {
    let lines = file.get_lines();

    let name = lines[0].trim().to_owned();

    let scale = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|s| *s != 0.0)
        .ok_or_else(|| ParsePoscarError::ParseScaleErr(lines[1].trim_end().to_owned()))?;

    let mut vectors = [[0.0; 3]; 3];
    for (i, vector) in vectors.iter_mut().enumerate() {
        *vector = line_as_vector(&lines[2 + i])
            .ok_or_else(|| ParsePoscarError::ParseLatticeErr(lines[2 + i].trim_end().to_owned()))?;
    }
    let lattice = Lattice::from_poscar(vectors, scale)?;

    let cartesian = matches!(
        lines[file.mode_line()].trim_start().chars().next(),
        Some('c') | Some('C') | Some('k') | Some('K')
    );

    // Cartesian coordinates are scaled by the universal scaling factor as well
    let cartesian_factor = if cartesian {
        lattice.volume().cbrt() / Lattice::new(vectors)?.volume().cbrt()
    } else {
        1.0
    };

    let header = file.get_header();
    let mut atoms = Vec::with_capacity(header.get_n_atoms());
    let mut index = 0;
    for (symbol, &count) in header.get_symbols().iter().zip(header.get_counts()) {
        for _ in 0..count {
            let line = &lines[file.first_atom_line() + index];
            let raw = line_as_vector(line)
                .ok_or_else(|| ParsePoscarError::ParseAtomLineErr(line.trim_end().to_owned()))?;

            let position = if cartesian {
                lattice.to_fractional(&Vector3D::from(raw).scale(cartesian_factor))
            } else {
                Vector3D::from(raw)
            };

            let mut atom = Atom::new(symbol, position);
            if let Some(tag) = file.existing_flags(index)? {
                atom = atom.with_mobility(tag);
            }
            atoms.push(atom);
            index += 1;
        }
    }

    Ok(Structure::new(&name, lattice, atoms, file.is_selective()))
}

/// Parse the first three fields of a line as floats.
fn line_as_vector(line: &str) -> Option<[f64; 3]> {
    let mut vector = [0.0; 3];
    let mut split = line.split_whitespace();
    for item in vector.iter_mut() {
        *item = split.next()?.parse::<f64>().ok()?;
    }

    Some(vector)
}

/// ## Methods for writing POSCAR files.
impl Structure {
    /// Write the structure into a POSCAR file (VASP 5 format, direct coordinates).
    ///
    /// ## Returns
    /// `Ok` if writing has been successful. Otherwise `WritePoscarError`.
    ///
    /// ## Example
    /// ```no_run
    /// # use poscar_tools::prelude::*;
    /// #
    /// let structure = Structure::from_file("POSCAR").unwrap();
    /// if let Err(e) = structure.write_poscar("POSCAR_copy.vasp") {
    ///     eprintln!("{}", e);
    ///     return;
    /// }
    /// ```
    ///
    /// ## Notes
    /// - The scaling factor is always written as 1.0 with the scaled lattice vectors.
    /// - The selective dynamics block is only written if the structure uses selective dynamics;
    ///   atoms without flags are then written as `T T T`.
    /// - The output file is replaced atomically.
    pub fn write_poscar(&self, filename: impl AsRef<Path>) -> Result<(), WritePoscarError> {
        write_atomically(filename, |writer| {
            self.write_poscar_into(writer)
                .map_err(|_| WritePoscarError::CouldNotWrite)
        })
    }

    /// Write the structure in POSCAR format into any writer.
    pub fn write_poscar_into(&self, writer: &mut impl Write) -> std::io::Result<()> {
        writeln!(writer, "{}", self.get_name())?;
        writeln!(writer, "1.0")?;

        for i in 0..3 {
            let vector = self.get_lattice().get_vector(i);
            writeln!(
                writer,
                "  {:>20.12}  {:>20.12}  {:>20.12}",
                vector.x, vector.y, vector.z
            )?;
        }

        let species = self.species();
        let symbols: Vec<&str> = species.iter().map(|(s, _)| s.as_str()).collect();
        let counts: Vec<String> = species.iter().map(|(_, c)| c.to_string()).collect();
        writeln!(writer, "  {}", symbols.join("  "))?;
        writeln!(writer, "  {}", counts.join("  "))?;

        if self.is_selective() {
            writeln!(writer, "Selective dynamics")?;
        }
        writeln!(writer, "Direct")?;

        for atom in self.get_atoms() {
            let pos = atom.get_position();
            write!(writer, "  {:.10}  {:.10}  {:.10}", pos.x, pos.y, pos.z)?;
            if self.is_selective() {
                write!(writer, "   {}", atom.get_mobility().unwrap_or_default())?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/


#[cfg(test)]
mod tests_write {
    use super::*;
    use file_diff::diff_files;
    use float_cmp::assert_approx_eq;
    use std::fs::File;

    #[test]
    fn write_plain() {
        let structure = read_poscar("test_files/SiO.vasp").unwrap();
        let output = tempfile::NamedTempFile::new().unwrap();
        let path_to_output = output.path();

        structure.write_poscar(path_to_output).unwrap();

        let mut result = File::open(path_to_output).unwrap();
        let mut expected = File::open("test_files/SiO_written.vasp").unwrap();

        assert!(diff_files(&mut result, &mut expected));
    }

    #[test]
    fn write_selective() {
        let structure = read_poscar("test_files/SiO_selective.vasp").unwrap();
        let output = tempfile::NamedTempFile::new().unwrap();
        let path_to_output = output.path();

        structure.write_poscar(path_to_output).unwrap();

        let mut result = File::open(path_to_output).unwrap();
        let mut expected = File::open("test_files/SiO_selective_written.vasp").unwrap();

        assert!(diff_files(&mut result, &mut expected));
    }

    #[test]
    fn write_read_roundtrip() {
        let structure = read_poscar("test_files/SiO_cartesian.vasp").unwrap();
        let output = tempfile::NamedTempFile::new().unwrap();
        structure.write_poscar(output.path()).unwrap();

        let reread = read_poscar(output.path()).unwrap();
        assert_eq!(reread.label_index(), structure.label_index());
        for (a, b) in reread.get_atoms().iter().zip(structure.get_atoms()) {
            assert_eq!(a.get_element(), b.get_element());
            assert_approx_eq!(f64, a.get_position().x, b.get_position().x, epsilon = 1e-9);
            assert_approx_eq!(f64, a.get_position().y, b.get_position().y, epsilon = 1e-9);
            assert_approx_eq!(f64, a.get_position().z, b.get_position().z, epsilon = 1e-9);
        }
    }
}
