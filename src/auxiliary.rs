// Released under MIT License.

//! Simple, auxiliary functions and constants used through the `poscar_tools` library.

use std::path::Path;

use regex::Regex;

/******************************/
/*         CONSTANTS          */
/******************************/

/// Default radius (in Å) used when searching for neighbors.
pub const DEFAULT_NEIGHBOR_RADIUS: f64 = 2.5;

/// Default threshold (in Å) below which displacements between two structures are not reported.
pub const DEFAULT_DISPLACEMENT_THRESHOLD: f64 = 0.01;

/// Default strength of random perturbation (in Å²).
/// The displacement of each neighbor is this value divided by its distance from the center.
pub const DEFAULT_PERTURB_MAGNITUDE: f64 = 0.15;

/// Declaration line (without terminator) inserted into POSCAR files which do not declare selective dynamics.
pub(crate) const SELECTIVE_DYNAMICS_LINE: &str = "Selective dynamics ";

/// Two lattices are considered equivalent if no matrix element differs by more than this (in Å).
pub(crate) const LATTICE_EPSILON: f64 = 1e-6;

/// Sentinel selecting every atom of the structure.
pub const ALL_ATOMS: [&str; 2] = ["All", "all"];

/******************************/
/*      KEY=VALUE ARGUMENTS   */
/******************************/

/// Split command-line tokens into `key=value` options with the specified key and the remaining tokens.
///
/// ## Returns
/// The value of the last `key=value` token (if any) and the remaining tokens in their original order.
///
/// ## Example
/// ```
/// # use poscar_tools::auxiliary::extract_key_value;
/// #
/// let tokens = vec!["Si1".to_string(), "r=2.0".to_string(), "O3".to_string()];
/// let (radius, rest) = extract_key_value(&tokens, "r");
///
/// assert_eq!(radius.as_deref(), Some("2.0"));
/// assert_eq!(rest, vec!["Si1", "O3"]);
/// ```
pub fn extract_key_value(tokens: &[String], key: &str) -> (Option<String>, Vec<String>) {
    let pattern = Regex::new(&format!(r"^{}=(.*)$", regex::escape(key)))
        .expect("FATAL POSCAR ERROR | auxiliary::extract_key_value | Invalid regex.");

    let mut value = None;
    let mut rest = Vec::with_capacity(tokens.len());
    for token in tokens {
        match pattern.captures(token) {
            Some(caps) => value = Some(caps[1].to_owned()),
            None => rest.push(token.clone()),
        }
    }

    (value, rest)
}

/// Join tokens that were split on whitespace inside a comma-separated list.
/// A token ending with `,` is merged with the token that follows it.
///
/// ## Example
/// ```
/// # use poscar_tools::auxiliary::join_comma_tokens;
/// #
/// let tokens = vec!["Si1", "0.5,", "0.5,", "0.5", "O2"];
/// assert_eq!(join_comma_tokens(&tokens), vec!["Si1", "0.5,0.5,0.5", "O2"]);
/// ```
pub fn join_comma_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut joined: Vec<String> = Vec::new();
    let mut append = false;

    for token in tokens {
        let token = token.as_ref();
        match joined.last_mut() {
            Some(last) if append => last.push_str(token),
            _ => joined.push(token.to_owned()),
        }
        append = token.ends_with(',');
    }

    joined
}

/// Check that the selection consists of the `All`/`all` sentinel only.
pub fn is_all_selection<S: AsRef<str>>(tokens: &[S]) -> bool {
    tokens.len() == 1 && ALL_ATOMS.contains(&tokens[0].as_ref())
}

/// Directory in which a temporary file for the given output path should be created.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(x) if !x.as_os_str().is_empty() => x,
        _ => Path::new("."),
    }
}
