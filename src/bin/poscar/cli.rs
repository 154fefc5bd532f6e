// Released under MIT License.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use poscar_tools::auxiliary::{DEFAULT_NEIGHBOR_RADIUS, DEFAULT_PERTURB_MAGNITUDE};

#[derive(Parser)]
#[command(
    name = "poscar",
    about = "Inspect and edit VASP POSCAR/CONTCAR files",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print fractional coordinates of labelled atoms
    #[command(visible_alias = "c")]
    Coords(CoordsArgs),

    /// List atoms within a radius of labelled atoms or fractional points
    #[command(visible_alias = "n")]
    Neighbors(NeighborsArgs),

    /// Print displacements of atoms between two structures
    Compare(CompareArgs),

    /// Set selective dynamics flags of atoms
    #[command(visible_alias = "sd")]
    Seldy(SeldyArgs),

    /// Create a vacancy, substitution or interstitial
    Defect(DefectArgs),

    /// Randomly displace atoms surrounding a site
    Perturb(PerturbArgs),
}

#[derive(Args)]
pub struct CoordsArgs {
    /// POSCAR file
    #[arg(value_name = "POSCAR")]
    pub file: PathBuf,

    /// Atom labels, e.g. `Si1 O3` (prompted for if omitted)
    #[arg(value_name = "LABEL")]
    pub labels: Vec<String>,
}

#[derive(Args)]
pub struct NeighborsArgs {
    /// POSCAR file
    #[arg(value_name = "POSCAR")]
    pub file: PathBuf,

    /// Atom labels or fractional points (`0.5,0.5,0.5`), optionally `r=<radius>`
    #[arg(value_name = "ENTRY", allow_hyphen_values = true)]
    pub entries: Vec<String>,

    /// Search radius in Å [default: 2.5, or the `r=` entry]
    #[arg(short, long, value_name = "Å")]
    pub radius: Option<f64>,
}

#[derive(Args)]
pub struct CompareArgs {
    /// First POSCAR file
    #[arg(value_name = "POSCAR1")]
    pub file1: PathBuf,

    /// Second POSCAR file
    #[arg(value_name = "POSCAR2")]
    pub file2: PathBuf,

    /// Optional `t=<threshold>` entry
    #[arg(value_name = "OPTION")]
    pub options: Vec<String>,

    /// Smallest reported displacement in Å [default: 0.01, or the `t=` entry]
    #[arg(short, long, value_name = "Å")]
    pub threshold: Option<f64>,
}

#[derive(Args)]
pub struct SeldyArgs {
    /// Input POSCAR file
    #[arg(value_name = "POSCAR")]
    pub file: PathBuf,

    /// Output file [default: SelDy_<tag>_<labels>.vasp]
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Atoms to tag, e.g. "Si1 Si2 O1", or "All" (prompted for if omitted)
    #[arg(short, long, value_name = "LABELS")]
    pub atoms: Option<String>,

    /// Flags to apply, e.g. TTT, FFF, FFT (prompted for if omitted)
    #[arg(short, long, value_name = "TAG")]
    pub tag: Option<String>,
}

#[derive(Args)]
pub struct DefectArgs {
    /// Input POSCAR file
    #[arg(value_name = "POSCAR")]
    pub file: PathBuf,

    /// Output file [default: Defect_<kind>_<label>.vasp]
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub kind: DefectKind,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct DefectKind {
    /// Remove the atom, e.g. `O3`
    #[arg(long, value_name = "LABEL")]
    pub vacancy: Option<String>,

    /// Replace the element of an atom, e.g. `Si1=Ge`
    #[arg(long, value_name = "LABEL=ELEMENT")]
    pub substitute: Option<String>,

    /// Add an atom at a fractional position, e.g. `O@0.5,0.5,0.5`
    #[arg(long, value_name = "ELEMENT@X,Y,Z", allow_hyphen_values = true)]
    pub interstitial: Option<String>,
}

#[derive(Args)]
pub struct PerturbArgs {
    /// Input POSCAR file
    #[arg(value_name = "POSCAR")]
    pub file: PathBuf,

    /// Atom at the center of the perturbation
    #[arg(value_name = "LABEL")]
    pub label: String,

    /// Output file [default: Perturbed_<label>.vasp]
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Radius in Å within which atoms are displaced
    #[arg(short, long, value_name = "Å", default_value_t = DEFAULT_NEIGHBOR_RADIUS)]
    pub radius: f64,

    /// Displacement of an atom at 1 Å from the center, in Å²
    #[arg(short, long, value_name = "Å²", default_value_t = DEFAULT_PERTURB_MAGNITUDE)]
    pub magnitude: f64,

    /// Seed of the random number generator
    #[arg(short, long)]
    pub seed: Option<u64>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
