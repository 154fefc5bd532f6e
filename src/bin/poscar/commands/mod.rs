// Released under MIT License.

mod edit;
mod inspect;

use std::error::Error;

use crate::cli::Command;
use crate::error::CliError;

pub type CommandResult = Result<(), Box<dyn Error>>;

/// Accept only positive finite search radii.
fn check_radius(radius: f64) -> Result<f64, CliError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(CliError::InvalidRadius(radius.to_string()))
    }
}

pub fn dispatch(command: Command) -> CommandResult {
    match command {
        Command::Coords(args) => inspect::run_coords(args),
        Command::Neighbors(args) => inspect::run_neighbors(args),
        Command::Compare(args) => inspect::run_compare(args),
        Command::Seldy(args) => edit::run_seldy(args),
        Command::Defect(args) => edit::run_defect(args),
        Command::Perturb(args) => edit::run_perturb(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_checks() {
        assert_eq!(check_radius(2.5), Ok(2.5));
        assert_eq!(check_radius(0.0), Err(CliError::InvalidRadius("0".to_string())));
        assert_eq!(check_radius(-1.0), Err(CliError::InvalidRadius("-1".to_string())));
        assert_eq!(
            check_radius(f64::INFINITY),
            Err(CliError::InvalidRadius("inf".to_string()))
        );
        assert_eq!(check_radius(f64::NAN), Err(CliError::InvalidRadius("NaN".to_string())));
    }
}
