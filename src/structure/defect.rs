// Released under MIT License.

//! Implementation of point defect creation.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::DefectError;
use crate::structure::Structure;
use crate::structures::{atom::Atom, label::AtomLabel, mobility::MobilityTag, vector3d::Vector3D};

fn element_regex() -> &'static Regex {
    static ELEMENT: OnceLock<Regex> = OnceLock::new();
    ELEMENT.get_or_init(|| {
        Regex::new(r"^[A-Z][a-z]{0,2}(_[a-z]+)?$")
            .expect("FATAL POSCAR ERROR | defect::element_regex | Invalid regex.")
    })
}

/// Check that the string looks like an element symbol (optionally with a POTCAR suffix such as `_sv`).
fn validate_element(element: &str) -> Result<(), DefectError> {
    if element_regex().is_match(element) {
        Ok(())
    } else {
        Err(DefectError::InvalidElement(element.to_owned()))
    }
}

/// Point defect to be introduced into a structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Defect {
    /// Remove the atom.
    Vacancy(AtomLabel),
    /// Replace the element of the atom.
    Substitution(AtomLabel, String),
    /// Add an atom of the element at the fractional position.
    Interstitial(String, Vector3D),
}

impl Defect {
    /// Short description of the defect used for naming output files, e.g. `Vac_Si1`.
    pub fn file_stem(&self) -> String {
        match self {
            Defect::Vacancy(label) => format!("Vac_{}", label),
            Defect::Substitution(label, element) => format!("Sub_{}_{}", label, element),
            Defect::Interstitial(element, _) => format!("Int_{}", element),
        }
    }
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::Vacancy(label) => write!(f, "vacancy at {}", label),
            Defect::Substitution(label, element) => write!(f, "{} substituted by {}", label, element),
            Defect::Interstitial(element, position) => {
                write!(f, "{} interstitial at {}", element, position)
            }
        }
    }
}

impl FromStr for Defect {
    type Err = DefectError;

    /// Parse a defect specification.
    ///
    /// - `Si1` (vacancy),
    /// - `Si1=Ge` (substitution),
    /// - `O@0.5,0.5,0.5` (interstitial).
    ///
    /// ## Example
    /// ```
    /// # use poscar_tools::prelude::*;
    /// #
    /// let defect: Defect = "Si1=Ge".parse().unwrap();
    /// assert_eq!(defect, Defect::Substitution("Si1".parse().unwrap(), "Ge".to_string()));
    /// ```
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let string = string.trim();

        if let Some((element, position)) = string.split_once('@') {
            validate_element(element)?;

            let coords = position
                .split(',')
                .map(|s| s.trim().parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|_| DefectError::InvalidSpecification(string.to_owned()))?;

            if coords.len() != 3 {
                return Err(DefectError::InvalidSpecification(string.to_owned()));
            }

            return Ok(Defect::Interstitial(
                element.to_owned(),
                Vector3D::new(coords[0], coords[1], coords[2]),
            ));
        }

        if let Some((label, element)) = string.split_once('=') {
            validate_element(element)?;
            return Ok(Defect::Substitution(label.parse()?, element.to_owned()));
        }

        Ok(Defect::Vacancy(string.parse()?))
    }
}

/// Insert an atom behind the last atom of the same element, or at the end if there is none.
fn insert_grouped(atoms: &mut Vec<Atom>, atom: Atom) {
    match atoms
        .iter()
        .rposition(|a| a.get_element() == atom.get_element())
    {
        Some(i) => atoms.insert(i + 1, atom),
        None => atoms.push(atom),
    }
}

/// ## Methods for creating point defects.
impl Structure {
    /// Create a copy of the structure containing the specified point defect.
    ///
    /// ## Returns
    /// New `Structure` with the defect. `DefectError` if the defect cannot be created.
    ///
    /// ## Example
    /// ```no_run
    /// # use poscar_tools::prelude::*;
    /// #
    /// let structure = Structure::from_file("POSCAR").unwrap();
    /// let defective = structure
    ///     .create_defect(&Defect::Vacancy("O3".parse().unwrap()))
    ///     .unwrap();
    ///
    /// defective.write_poscar("POSCAR_vac_O3.vasp").unwrap();
    /// ```
    ///
    /// ## Notes
    /// - Labels of the new structure are recomputed: removing `Si1` turns `Si2` into `Si1`.
    /// - Substituted and interstitial atoms are placed in the block of their element
    ///   so that the structure stays grouped by species.
    /// - Interstitial atoms are wrapped into the unit cell and, in structures using
    ///   selective dynamics, are free to move along all axes.
    pub fn create_defect(&self, defect: &Defect) -> Result<Structure, DefectError> {
        let mut new = self.clone();

        match defect {
            Defect::Vacancy(label) => {
                let index = self.get_index(label)?;
                if self.get_n_atoms() == 1 {
                    return Err(DefectError::EmptyStructure(label.to_string()));
                }
                new.get_atoms_mut().remove(index);
            }
            Defect::Substitution(label, element) => {
                validate_element(element)?;
                let index = self.get_index(label)?;
                let mut atom = new.get_atoms_mut().remove(index);
                atom.set_element(element);
                insert_grouped(new.get_atoms_mut(), atom);
            }
            Defect::Interstitial(element, position) => {
                validate_element(element)?;
                let mut atom = Atom::new(element, *position);
                atom.wrap();
                if self.is_selective() {
                    atom = atom.with_mobility(MobilityTag::FREE);
                }
                insert_grouped(new.get_atoms_mut(), atom);
            }
        }

        log::info!("Created {}.", defect);
        Ok(new)
    }
}
