// Released under MIT License.

use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

use poscar_tools::prelude::*;
use poscar_tools::selective::{Assignment, Selection};

/// Width of one filename column in the header of the displacement table.
const NAME_COLUMN: usize = 24;

pub fn print_error(err: &dyn Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{} {}", "error:".red().bold(), err.to_string().red());
}

pub fn print_written(out: &mut impl Write, path: &Path) -> io::Result<()> {
    writeln!(
        out,
        "{} {}",
        "Following POSCAR is written:".green(),
        path.display()
    )
}

fn coordinates_row(position: &Vector3D) -> String {
    format!("{:>7.4} {:>7.4} {:>7.4}", position.x, position.y, position.z)
}

pub fn print_coordinates(out: &mut impl Write, coordinates: &[(AtomLabel, Vector3D)]) -> io::Result<()> {
    writeln!(out, "{}", "   Atom label |     x       y       z    ".bold())?;
    writeln!(out, "   ───────────┼─────────────────────────")?;
    for (label, position) in coordinates {
        writeln!(out, "   {:>10} | {}", label, coordinates_row(position))?;
    }

    Ok(())
}

pub fn print_neighbors_header(out: &mut impl Write, radius: f64) -> io::Result<()> {
    writeln!(out, "{} {:.2} Å", "Search radius:".bold(), radius)?;
    writeln!(out, "{}", "   Atom label |     x       y       z    | Distance ".bold())?;
    writeln!(out, "   ───────────┼─────────────────────────┼──────────")
}

/// Print the center of the search followed by its neighbors.
pub fn print_neighbors(
    out: &mut impl Write,
    center: &str,
    position: &Vector3D,
    neighbors: &[Neighbor],
) -> io::Result<()> {
    writeln!(
        out,
        "   {} | {} |  ------",
        format!("{:>10}", center).cyan(),
        coordinates_row(position)
    )?;

    for neighbor in neighbors {
        writeln!(
            out,
            "      └{:>6} | {} | {:>8.4}",
            neighbor.label(),
            coordinates_row(&neighbor.position()),
            neighbor.distance()
        )?;
    }

    Ok(())
}

/// Split a filename into columns of fixed width.
fn name_chunks(name: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    if chars.is_empty() {
        return vec![" ".repeat(width)];
    }

    chars
        .chunks(width)
        .map(|c| format!("{:<width$}", c.iter().collect::<String>()))
        .collect()
}

pub fn print_displacements(
    out: &mut impl Write,
    name1: &str,
    name2: &str,
    threshold: f64,
    displacements: &[Displacement],
) -> io::Result<()> {
    let mut chunks1 = name_chunks(name1, NAME_COLUMN);
    let mut chunks2 = name_chunks(name2, NAME_COLUMN);
    let rows = chunks1.len().max(chunks2.len());
    chunks1.resize(rows, " ".repeat(NAME_COLUMN));
    chunks2.resize(rows, " ".repeat(NAME_COLUMN));

    for (i, (c1, c2)) in chunks1.iter().zip(chunks2.iter()).enumerate() {
        if i + 1 == rows {
            writeln!(out, "              | Thres.= {:.2} | {} | {} |", threshold, c1, c2)?;
        } else {
            writeln!(out, "              |              | {} | {} |", c1, c2)?;
        }
    }

    writeln!(
        out,
        "{}",
        "   Atom label | Displ. (Å)   |     x       y       z    |     x       y       z    |".bold()
    )?;
    writeln!(
        out,
        "   ───────────┼──────────────┼──────────────────────────┼──────────────────────────┤"
    )?;

    for displacement in displacements {
        writeln!(
            out,
            "   {:>10} | {:>10.4}   | {}  | {}  |",
            displacement.label(),
            displacement.distance(),
            coordinates_row(&displacement.position1()),
            coordinates_row(&displacement.position2())
        )?;
    }

    Ok(())
}

/// Print the atoms whose flags were changed. Selecting every atom is summarized in one line.
pub fn print_assignments(
    out: &mut impl Write,
    selection: &Selection,
    tag: MobilityTag,
    assignments: &[Assignment],
) -> io::Result<()> {
    writeln!(out)?;
    if *selection == Selection::All {
        return writeln!(
            out,
            "   All atoms selective dynamics tag is set to {}",
            tag.compact().bold()
        );
    }

    writeln!(out, "   Modified atom list")?;
    writeln!(out, "{}", "   Atom label |     x       y       z    | tag ".bold())?;
    writeln!(out, "   ───────────┼─────────────────────────┼─────")?;
    for assignment in assignments {
        writeln!(
            out,
            "   {:>10} | {} | {}",
            assignment.label(),
            coordinates_row(&assignment.position()),
            assignment.tag().compact()
        )?;
    }

    Ok(())
}

pub fn print_moves(out: &mut impl Write, moves: &[Move]) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        "   Atom label |   x (old) y       z    |   x (new) y       z    ".bold()
    )?;
    writeln!(out, "   ───────────┼─────────────────────────┼─────────────────────────")?;
    for m in moves {
        writeln!(
            out,
            "   {:>10} | {} | {}",
            m.label(),
            coordinates_row(&m.old()),
            coordinates_row(&m.new())
        )?;
    }

    Ok(())
}
