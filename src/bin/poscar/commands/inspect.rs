// Released under MIT License.

//! Commands printing information about structures.

use std::io;

use poscar_tools::auxiliary::{
    extract_key_value, join_comma_tokens, DEFAULT_DISPLACEMENT_THRESHOLD, DEFAULT_NEIGHBOR_RADIUS,
};
use poscar_tools::errors::CompareError;
use poscar_tools::prelude::*;

use super::{check_radius, CommandResult};
use crate::cli::{CompareArgs, CoordsArgs, NeighborsArgs};
use crate::display;
use crate::error::CliError;
use crate::prompt;

const LABELS_EXAMPLE: &str = "Separate with spaces: ex) 'Si1 Si2 O1 O3'";

/// Center of a neighbor search.
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Label(AtomLabel),
    Point(Vector3D),
}

fn parse_point(string: &str) -> Result<Vector3D, CliError> {
    let coords = string
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| CliError::InvalidPoint(string.to_owned()))?;

    match coords.as_slice() {
        [x, y, z] => Ok(Vector3D::new(*x, *y, *z)),
        _ => Err(CliError::InvalidPoint(string.to_owned())),
    }
}

/// Split neighbor search tokens into search centers and the optional `r=` radius.
fn parse_entries(tokens: &[String]) -> Result<(Vec<Entry>, Option<f64>), Box<dyn std::error::Error>> {
    let (radius, rest) = extract_key_value(tokens, "r");
    let radius = radius
        .map(|r| match r.parse::<f64>() {
            Ok(x) => check_radius(x),
            Err(_) => Err(CliError::InvalidRadius(r)),
        })
        .transpose()?;

    let mut entries = Vec::new();
    for entry in join_comma_tokens(&rest) {
        if entry.starts_with(|c: char| c.is_ascii_alphabetic()) {
            entries.push(Entry::Label(entry.parse()?));
        } else {
            entries.push(Entry::Point(parse_point(&entry)?));
        }
    }

    Ok((entries, radius))
}

/// Use the tokens, or ask for them on standard input if there are none.
fn tokens_or_prompt(tokens: Vec<String>, question: &str) -> Result<Vec<String>, CliError> {
    if !tokens.is_empty() {
        return Ok(tokens);
    }

    Ok(prompt::tokens(&prompt::ask(question, LABELS_EXAMPLE)?))
}

pub fn run_coords(args: CoordsArgs) -> CommandResult {
    let structure = Structure::from_file(&args.file)?;

    let tokens = tokens_or_prompt(args.labels, "Which atom do you want to get coordinate?")?;
    let labels = parse_labels(&tokens)?;
    let coordinates = structure.get_coordinates(&labels)?;

    display::print_coordinates(&mut io::stdout().lock(), &coordinates)?;
    Ok(())
}

pub fn run_neighbors(args: NeighborsArgs) -> CommandResult {
    let structure = Structure::from_file(&args.file)?;

    let tokens = tokens_or_prompt(args.entries, "Of which atoms do you want to get neighbors?")?;
    let (entries, token_radius) = parse_entries(&tokens)?;
    if entries.is_empty() {
        return Err(Box::new(CliError::NoEntries));
    }

    let radius = match args.radius {
        Some(radius) => check_radius(radius)?,
        None => token_radius.unwrap_or(DEFAULT_NEIGHBOR_RADIUS),
    };

    let mut out = io::stdout().lock();
    display::print_neighbors_header(&mut out, radius)?;
    for entry in entries {
        match entry {
            Entry::Label(label) => {
                let position = *structure.get_atom(&label)?.get_position();
                let neighbors = structure.neighbors(&label, radius)?;
                display::print_neighbors(&mut out, &label.to_string(), &position, &neighbors)?;
            }
            Entry::Point(point) => {
                let sites = structure.sites_in_sphere(&point, radius)?;
                display::print_neighbors(&mut out, "coords", &point, &sites)?;
            }
        }
    }

    Ok(())
}

fn parse_threshold(options: &[String], flag: Option<f64>) -> Result<f64, CompareError> {
    let (token, rest) = extract_key_value(options, "t");
    if !rest.is_empty() {
        log::warn!("Ignoring unrecognized arguments: {}.", rest.join(" "));
    }

    let threshold = match (flag, token) {
        (Some(x), _) => x,
        (None, Some(t)) => t
            .parse::<f64>()
            .map_err(|_| CompareError::InvalidThreshold(t.clone()))?,
        (None, None) => DEFAULT_DISPLACEMENT_THRESHOLD,
    };

    if threshold.is_nan() || threshold < 0.0 {
        return Err(CompareError::InvalidThreshold(threshold.to_string()));
    }

    Ok(threshold)
}

pub fn run_compare(args: CompareArgs) -> CommandResult {
    let threshold = parse_threshold(&args.options, args.threshold)?;

    let first = Structure::from_file(&args.file1)?;
    let second = Structure::from_file(&args.file2)?;
    let displacements = first.compare(&second, threshold)?;

    display::print_displacements(
        &mut io::stdout().lock(),
        &args.file1.to_string_lossy(),
        &args.file2.to_string_lossy(),
        threshold,
        &displacements,
    )?;

    Ok(())
}
