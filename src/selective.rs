// Released under MIT License.

//! Implementation of the selective dynamics editor.
//!
//! The editor rewrites the coordinate block of a POSCAR file, setting the mobility flags
//! of selected atoms while reproducing every other line of the file verbatim.

use std::io::Write;
use std::path::Path;

use getset::{CopyGetters, Getters};
use hashbrown::HashSet;

use crate::auxiliary::{is_all_selection, SELECTIVE_DYNAMICS_LINE};
use crate::errors::{AtomLabelError, SelectiveDynamicsError, WritePoscarError};
use crate::io::{poscar_io::PoscarFile, write_atomically};
use crate::structures::{
    label::{parse_labels, AtomLabel},
    mobility::MobilityTag,
    vector3d::Vector3D,
};

/// Atoms whose flags should be changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every atom of the file.
    All,
    /// Atoms with the given labels. May be empty.
    Labels(Vec<AtomLabel>),
}

impl Selection {
    /// Parse a selection from whitespace-separated tokens.
    /// A single `All` or `all` token selects every atom.
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::selective::Selection;
    /// #
    /// assert_eq!(Selection::parse(&["all"]).unwrap(), Selection::All);
    /// assert!(matches!(Selection::parse(&["Si1", "O2"]).unwrap(), Selection::Labels(x) if x.len() == 2));
    /// assert!(Selection::parse(&["Si"]).is_err());
    /// ```
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, AtomLabelError> {
        if is_all_selection(tokens) {
            Ok(Selection::All)
        } else {
            Ok(Selection::Labels(parse_labels(tokens)?))
        }
    }

    /// Returns `true` if no atom is selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Labels(x) if x.is_empty())
    }
}

/// Flags assigned to a selected atom.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Assignment {
    #[getset(get = "pub")]
    label: AtomLabel,
    /// Index of the line of the input file containing the atom.
    #[getset(get_copy = "pub")]
    line: usize,
    /// Coordinates of the atom as listed in the input file.
    #[getset(get_copy = "pub")]
    position: Vector3D,
    #[getset(get_copy = "pub")]
    tag: MobilityTag,
}

/// Rewritten content of a POSCAR file.
#[derive(Debug, Clone, PartialEq)]
pub struct EditedPoscar {
    content: String,
    assignments: Vec<Assignment>,
}

impl EditedPoscar {
    /// Get the full text of the rewritten file.
    pub fn get_content(&self) -> &str {
        &self.content
    }

    /// Get the flags assigned to the selected atoms, in file order.
    pub fn get_assignments(&self) -> &[Assignment] {
        &self.assignments
    }
}

/// Set selective dynamics flags of the selected atoms.
///
/// ## Returns
/// `EditedPoscar` containing the rewritten file and the resolved assignments.
/// `SelectiveDynamicsError::Label` if any of the labels does not exist in the file;
/// in that case nothing is produced.
///
/// ## Example
/// ```no_run
/// # use poscar_tools::prelude::*;
/// # use poscar_tools::selective::{apply_selective_dynamics, Selection};
/// #
/// let file = PoscarFile::from_file("POSCAR").unwrap();
/// let selection = Selection::parse(&["Si1", "O2"]).unwrap();
/// let edited = apply_selective_dynamics(&file, &selection, "FFF".parse().unwrap()).unwrap();
///
/// print!("{}", edited.get_content());
/// ```
///
/// ## Notes
/// - All lines of the header are copied verbatim. If the file does not declare selective dynamics,
///   the declaration is inserted in front of the coordinate mode line.
/// - Coordinate lines are rewritten as their first three fields, each preceded by two spaces,
///   followed by the three flags, each preceded by three spaces.
/// - Atoms that are not selected keep their flags, or become `T T T` if the file has none.
/// - Lines following the coordinate block (e.g. velocities in a CONTCAR) are copied verbatim.
/// - New lines use the line terminator of the coordinate mode line.
pub fn apply_selective_dynamics(
    file: &PoscarFile,
    selection: &Selection,
    tag: MobilityTag,
) -> Result<EditedPoscar, SelectiveDynamicsError> {
    let index = file.label_index();

    // every label is resolved before anything is written
    let selected: HashSet<usize> = match selection {
        Selection::All => index.iter().map(|(_, line)| line).collect(),
        Selection::Labels(labels) => index.resolve_all(labels)?.into_iter().collect(),
    };

    let lines = file.get_lines();
    let mode_line = file.mode_line();
    let first_atom = file.first_atom_line();
    let n_atoms = file.get_n_atoms();
    let eol = file.line_ending();

    let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 16).sum());
    content.extend(lines[..file.mode_line()].iter().map(|l| l.as_str()));
    if !file.is_selective() {
        content.push_str(SELECTIVE_DYNAMICS_LINE);
        content.push_str(eol);
    }

    content.push_str(&lines[mode_line]);
    if !lines[mode_line].ends_with('\n') {
        content.push_str(eol);
    }

    let mut assignments = Vec::with_capacity(selected.len());
    for (label, line) in index.iter() {
        let atom = line - first_atom;
        let [x, y, z] = file.coordinate_fields(atom)?;

        let flags = if selected.contains(&line) {
            assignments.push(Assignment {
                label: label.clone(),
                line,
                position: file.coordinates(atom)?,
                tag,
            });
            tag
        } else {
            file.existing_flags(atom)?.unwrap_or_default()
        };

        content.push_str(&format!("  {}  {}  {}   {}{}", x, y, z, flags, eol));
    }

    content.extend(lines[first_atom + n_atoms..].iter().map(|l| l.as_str()));

    log::debug!(
        "Assigned flags `{}` to {} of {} atoms.",
        tag.compact(),
        assignments.len(),
        n_atoms
    );

    Ok(EditedPoscar {
        content,
        assignments,
    })
}

/// Read a POSCAR file, set selective dynamics flags of the selected atoms
/// and write the result into a new file.
///
/// ## Returns
/// Assignments of flags to the selected atoms. `SelectiveDynamicsError` if the input
/// could not be read, any label does not exist or the output could not be written.
///
/// ## Example
/// ```no_run
/// # use poscar_tools::selective::{write_selective_dynamics, Selection};
/// #
/// let selection = Selection::parse(&["All"]).unwrap();
/// write_selective_dynamics("POSCAR", "POSCAR_frozen.vasp", &selection, "FFF".parse().unwrap()).unwrap();
/// ```
///
/// ## Notes
/// - The output is only created once the whole file has been rewritten in memory
///   and is replaced atomically.
/// - The input file is never modified, unless it is also the output file.
pub fn write_selective_dynamics(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    selection: &Selection,
    tag: MobilityTag,
) -> Result<Vec<Assignment>, SelectiveDynamicsError> {
    let file = PoscarFile::from_file(input)?;
    let edited = apply_selective_dynamics(&file, selection, tag)?;

    write_atomically(output, |writer| {
        writer
            .write_all(edited.content.as_bytes())
            .map_err(|_| WritePoscarError::CouldNotWrite)
    })?;

    Ok(edited.assignments)
}

/// Construct the default name of the output file, e.g. `SelDy_FFT_Si1_O2.vasp` or `SelDy_FFF_All.vasp`.
pub fn default_output_name(selection: &Selection, tag: MobilityTag) -> String {
    let atoms = match selection {
        Selection::All => String::from("All"),
        Selection::Labels(labels) => labels
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<String>>()
            .join("_"),
    };

    format!("SelDy_{}_{}.vasp", tag.compact(), atoms)
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{MobilityTagError, ParsePoscarError};
    use crate::io::poscar_io::is_selective_line;
    use file_diff::diff_files;
    use std::fs::{self, File};

    fn edit(path: &str, selection: &[&str], tag: &str) -> EditedPoscar {
        let file = PoscarFile::from_file(path).unwrap();
        apply_selective_dynamics(
            &file,
            &Selection::parse(selection).unwrap(),
            tag.parse().unwrap(),
        )
        .unwrap()
    }

    fn flags_of(content: &str) -> Vec<Option<MobilityTag>> {
        let file = PoscarFile::parse(content).unwrap();
        (0..file.get_n_atoms())
            .map(|i| file.existing_flags(i).unwrap())
            .collect()
    }

    #[test]
    fn concrete_scenario() {
        let edited = edit("test_files/SiO_plain.vasp", &["Si2"], "FFF");
        let lines: Vec<&str> = edited.get_content().lines().collect();

        assert_eq!(lines[7], "Selective dynamics ");
        assert_eq!(lines[8], "Direct");
        assert_eq!(lines[9], "  0.0  0.0  0.0   T   T   T");
        assert_eq!(lines[10], "  0.5  0.5  0.5   F   F   F");
        assert_eq!(lines[11], "  0.25  0.25  0.25   T   T   T");
        assert_eq!(lines.len(), 12);

        assert_eq!(edited.get_assignments().len(), 1);
        assert_eq!(edited.get_assignments()[0].label().to_string(), "Si2");
        assert_eq!(edited.get_assignments()[0].line(), 9);
        assert_eq!(
            edited.get_assignments()[0].position(),
            Vector3D::new(0.5, 0.5, 0.5)
        );
    }

    #[test]
    fn written_file_matches() {
        let output = tempfile::NamedTempFile::new().unwrap();
        let path_to_output = output.path();

        write_selective_dynamics(
            "test_files/SiO_plain.vasp",
            path_to_output,
            &Selection::parse(&["Si2"]).unwrap(),
            "FFF".parse().unwrap(),
        )
        .unwrap();

        let mut result = File::open(path_to_output).unwrap();
        let mut expected = File::open("test_files/SiO_plain_Si2_FFF.vasp").unwrap();

        assert!(diff_files(&mut result, &mut expected));
    }

    #[test]
    fn empty_selection_is_noop() {
        let original = PoscarFile::from_file("test_files/SiO_selective.vasp").unwrap();
        let edited = edit("test_files/SiO_selective.vasp", &[], "TTT");

        let expected: Vec<Option<MobilityTag>> = (0..original.get_n_atoms())
            .map(|i| original.existing_flags(i).unwrap())
            .collect();
        assert_eq!(flags_of(edited.get_content()), expected);
        assert!(edited.get_assignments().is_empty());

        // header is untouched, no second declaration
        let edited_lines: Vec<&str> = edited.get_content().split_inclusive('\n').collect();
        assert_eq!(&edited_lines[..9], &original.get_lines()[..9]);
    }

    #[test]
    fn repeated_noop_is_stable() {
        let once = edit("test_files/SiO_selective.vasp", &[], "TTT");
        let file = PoscarFile::parse(once.get_content()).unwrap();
        let twice = apply_selective_dynamics(&file, &Selection::Labels(vec![]), MobilityTag::FREE).unwrap();

        assert_eq!(once.get_content(), twice.get_content());
    }

    #[test]
    fn all_inserts_one_declaration() {
        let edited = edit("test_files/SiO.vasp", &["All"], "TTT");

        let declarations = edited
            .get_content()
            .lines()
            .filter(|line| is_selective_line(line))
            .count();
        assert_eq!(declarations, 1);
        assert_eq!(
            flags_of(edited.get_content()),
            vec![Some(MobilityTag::FREE); 3]
        );
        assert_eq!(edited.get_assignments().len(), 3);
    }

    #[test]
    fn all_lowercase() {
        let edited = edit("test_files/SiO_selective.vasp", &["all"], "FFF");
        assert_eq!(
            flags_of(edited.get_content()),
            vec![Some(MobilityTag::FROZEN); 3]
        );
    }

    #[test]
    fn single_atom_keeps_others() {
        let edited = edit("test_files/SiO_selective.vasp", &["Si1"], "FFT");
        assert_eq!(
            flags_of(edited.get_content()),
            vec![
                Some("FFT".parse().unwrap()),
                Some("TTF".parse().unwrap()),
                Some("TTT".parse().unwrap()),
            ]
        );

        let lines: Vec<&str> = edited.get_content().lines().collect();
        assert!(lines[9].ends_with("F   F   T"));
        assert!(lines[10].ends_with("T   T   F"));
    }

    #[test]
    fn single_atom_default_flags() {
        let edited = edit("test_files/SiO.vasp", &["Si1"], "FFT");
        assert_eq!(
            flags_of(edited.get_content()),
            vec![
                Some("FFT".parse().unwrap()),
                Some(MobilityTag::FREE),
                Some(MobilityTag::FREE),
            ]
        );
    }

    #[test]
    fn label_resolution() {
        let file = PoscarFile::from_file("test_files/SiO.vasp").unwrap();
        let index = file.label_index();

        assert_eq!(index.get(&"Si1".parse().unwrap()), Some(8));
        assert_eq!(index.get(&"Si2".parse().unwrap()), Some(9));
        assert_eq!(index.get(&"O1".parse().unwrap()), Some(10));

        let selection = Selection::parse(&["O2"]).unwrap();
        assert_eq!(
            apply_selective_dynamics(&file, &selection, MobilityTag::FROZEN),
            Err(SelectiveDynamicsError::Label(AtomLabelError::NotFound(
                "O2".to_string()
            )))
        );
    }

    #[test]
    fn unknown_label_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.vasp");

        let result = write_selective_dynamics(
            "test_files/SiO.vasp",
            &output,
            &Selection::parse(&["Si1", "Ge1"]).unwrap(),
            MobilityTag::FROZEN,
        );

        assert_eq!(
            result,
            Err(SelectiveDynamicsError::Label(AtomLabelError::NotFound(
                "Ge1".to_string()
            )))
        );
        assert!(!output.exists());
    }

    #[test]
    fn missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_selective_dynamics(
            "test_files/nonexistent.vasp",
            dir.path().join("out.vasp"),
            &Selection::All,
            MobilityTag::FREE,
        );

        assert!(matches!(
            result,
            Err(SelectiveDynamicsError::Parse(ParsePoscarError::FileNotFound(_)))
        ));
    }

    #[test]
    fn invalid_tag() {
        assert_eq!(
            "FT".parse::<MobilityTag>().map_err(SelectiveDynamicsError::from),
            Err(SelectiveDynamicsError::Tag(MobilityTagError::InvalidLength(
                "FT".to_string()
            )))
        );
    }

    #[test]
    fn roundtrip_index() {
        let file = PoscarFile::from_file("test_files/SiO.vasp").unwrap();
        let edited = apply_selective_dynamics(&file, &Selection::All, MobilityTag::FREE).unwrap();
        let reread = PoscarFile::parse(edited.get_content()).unwrap();

        assert_eq!(reread.label_index(), file.label_index().rebased(9));
        assert_eq!(
            reread.label_index().labels().collect::<Vec<_>>(),
            file.label_index().labels().collect::<Vec<_>>()
        );
    }

    #[test]
    fn trailing_data_kept() {
        let original = fs::read_to_string("test_files/CONTCAR_velocities").unwrap();
        let edited = edit("test_files/CONTCAR_velocities", &["O1"], "FFF");

        let original_tail: Vec<&str> = original.lines().skip(12).collect();
        let edited_tail: Vec<&str> = edited.get_content().lines().skip(12).collect();
        assert_eq!(original_tail, edited_tail);
        assert_eq!(original_tail.len(), 4);
    }

    #[test]
    fn mode_line_without_newline() {
        let file = PoscarFile::parse("c\n1.0\n5 0 0\n0 5 0\n0 0 5\nSi\n0\nDirect").unwrap();
        let edited = apply_selective_dynamics(&file, &Selection::All, MobilityTag::FREE).unwrap();
        assert_eq!(
            edited.get_content(),
            "c\n1.0\n5 0 0\n0 5 0\n0 0 5\nSi\n0\nSelective dynamics \nDirect\n"
        );
    }

    #[test]
    fn crlf_line_endings_kept() {
        let file = PoscarFile::parse(
            "c\r\n1.0\r\n5 0 0\r\n0 5 0\r\n0 0 5\r\nSi O\r\n1 1\r\nDirect\r\n0 0 0\r\n0.5 0.5 0.5\r\n",
        )
        .unwrap();
        let edited =
            apply_selective_dynamics(&file, &Selection::parse(&["O1"]).unwrap(), MobilityTag::FROZEN)
                .unwrap();

        assert_eq!(
            edited.get_content(),
            "c\r\n1.0\r\n5 0 0\r\n0 5 0\r\n0 0 5\r\nSi O\r\n1 1\r\nSelective dynamics \r\nDirect\r\n  0  0  0   T   T   T\r\n  0.5  0.5  0.5   F   F   F\r\n"
        );
        assert_eq!(edited.get_content().matches('\n').count(), edited.get_content().matches("\r\n").count());
    }

    #[test]
    fn output_names() {
        assert_eq!(
            default_output_name(&Selection::parse(&["Si1", "O2"]).unwrap(), "FFT".parse().unwrap()),
            "SelDy_FFT_Si1_O2.vasp"
        );
        assert_eq!(
            default_output_name(&Selection::All, MobilityTag::FROZEN),
            "SelDy_FFF_All.vasp"
        );
    }

    #[test]
    fn selection_parsing() {
        assert!(Selection::parse::<&str>(&[]).unwrap().is_empty());
        assert!(!Selection::All.is_empty());
        assert_eq!(
            Selection::parse(&["All", "Si1"]),
            Err(AtomLabelError::InvalidLabel("All".to_string()))
        );
    }
}
