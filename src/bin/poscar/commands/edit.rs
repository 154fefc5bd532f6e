// Released under MIT License.

//! Commands writing new POSCAR files.

use std::error::Error;
use std::io;
use std::path::PathBuf;

use rand::{rngs::StdRng, SeedableRng};

use poscar_tools::errors::DefectError;
use poscar_tools::prelude::*;
use poscar_tools::selective::{default_output_name, write_selective_dynamics, Selection};

use super::{check_radius, CommandResult};
use crate::cli::{DefectArgs, DefectKind, PerturbArgs, SeldyArgs};
use crate::display;
use crate::error::CliError;
use crate::prompt;

/// Collect the selection and the tag, asking for missing ones (atoms first, then the tag).
fn seldy_input(
    atoms: Option<String>,
    tag: Option<String>,
    mut ask: impl FnMut(&str, &str) -> Result<String, CliError>,
) -> Result<(Selection, MobilityTag), Box<dyn Error>> {
    let atoms = match atoms {
        Some(atoms) => atoms,
        None => ask(
            "For which atoms do you want to apply this tag?",
            "Separate with spaces: ex) 'Si1 Si2 O1 O3'\nFor all atoms, write 'All'",
        )?,
    };
    let selection = Selection::parse(&prompt::tokens(&atoms))?;

    let tag = match tag {
        Some(tag) => tag,
        None => ask(
            "Which tag do you want to apply for selective dynamics?",
            "ex) TTT, FFF, FFT",
        )?,
    };

    Ok((selection, tag.parse()?))
}

pub fn run_seldy(args: SeldyArgs) -> CommandResult {
    let (selection, tag) = seldy_input(args.atoms, args.tag, prompt::ask)?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_output_name(&selection, tag)));

    let assignments = write_selective_dynamics(&args.file, &output, &selection, tag)?;

    let mut out = io::stdout().lock();
    display::print_assignments(&mut out, &selection, tag, &assignments)?;
    display::print_written(&mut out, &output)?;
    Ok(())
}

fn defect_from_kind(kind: DefectKind) -> Result<Defect, DefectError> {
    match (kind.vacancy, kind.substitute, kind.interstitial) {
        (Some(label), _, _) => Ok(Defect::Vacancy(label.parse()?)),
        (_, Some(spec), _) if spec.contains('=') => spec.parse(),
        (_, Some(spec), _) => Err(DefectError::InvalidSpecification(spec)),
        (_, _, Some(spec)) if spec.contains('@') => spec.parse(),
        (_, _, spec) => Err(DefectError::InvalidSpecification(
            spec.unwrap_or_default(),
        )),
    }
}

pub fn run_defect(args: DefectArgs) -> CommandResult {
    let defect = defect_from_kind(args.kind)?;

    let structure = Structure::from_file(&args.file)?;
    let defective = structure.create_defect(&defect)?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("Defect_{}.vasp", defect.file_stem())));
    defective.write_poscar(&output)?;

    display::print_written(&mut io::stdout().lock(), &output)?;
    Ok(())
}

pub fn run_perturb(args: PerturbArgs) -> CommandResult {
    let label: AtomLabel = args.label.parse()?;
    let radius = check_radius(args.radius)?;
    let mut structure = Structure::from_file(&args.file)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let moves = structure.perturb_neighbors(&label, radius, args.magnitude, &mut rng)?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("Perturbed_{}.vasp", label)));
    structure.write_poscar(&output)?;

    let mut out = io::stdout().lock();
    display::print_moves(&mut out, &moves)?;
    display::print_written(&mut out, &output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(vacancy: Option<&str>, substitute: Option<&str>, interstitial: Option<&str>) -> DefectKind {
        DefectKind {
            vacancy: vacancy.map(String::from),
            substitute: substitute.map(String::from),
            interstitial: interstitial.map(String::from),
        }
    }

    #[test]
    fn seldy_asks_atoms_before_tag() {
        let mut questions = Vec::new();
        let mut answers = vec!["FFT", "Si1 O1"];
        let (selection, tag) = seldy_input(None, None, |question, _| {
            questions.push(question.to_owned());
            Ok(answers.pop().unwrap_or_default().to_owned())
        })
        .unwrap();

        assert_eq!(
            questions,
            vec![
                "For which atoms do you want to apply this tag?",
                "Which tag do you want to apply for selective dynamics?",
            ]
        );
        assert_eq!(selection, Selection::parse(&["Si1", "O1"]).unwrap());
        assert_eq!(tag, "FFT".parse().unwrap());
    }

    #[test]
    fn seldy_arguments_skip_prompts() {
        let (selection, tag) = seldy_input(Some("All".to_string()), Some("FFF".to_string()), |_, _| {
            Err(CliError::StdinFailed)
        })
        .unwrap();

        assert_eq!(selection, Selection::All);
        assert_eq!(tag, MobilityTag::FROZEN);
    }

    #[test]
    fn defect_kinds() {
        assert_eq!(
            defect_from_kind(kind(Some("O1"), None, None)),
            Ok(Defect::Vacancy("O1".parse().unwrap()))
        );
        assert_eq!(
            defect_from_kind(kind(None, Some("Si1=Ge"), None)),
            Ok(Defect::Substitution("Si1".parse().unwrap(), "Ge".to_string()))
        );
        assert_eq!(
            defect_from_kind(kind(None, None, Some("O@0.5,0.5,0.5"))),
            Ok(Defect::Interstitial("O".to_string(), Vector3D::new(0.5, 0.5, 0.5)))
        );
    }

    #[test]
    fn defect_kind_mismatch() {
        assert_eq!(
            defect_from_kind(kind(None, Some("Si1"), None)),
            Err(DefectError::InvalidSpecification("Si1".to_string()))
        );
        assert_eq!(
            defect_from_kind(kind(None, None, Some("Si1=Ge"))),
            Err(DefectError::InvalidSpecification("Si1=Ge".to_string()))
        );
    }
}
