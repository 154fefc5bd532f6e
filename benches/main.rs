// Released under MIT License.

use criterion::{criterion_group, criterion_main, Criterion};
use poscar_tools::prelude::*;
use poscar_tools::selective::{apply_selective_dynamics, Selection};

/// Simple cubic supercell with `n`^3 atoms split between two elements.
fn supercell(n: usize) -> Structure {
    let a = 2.5 * n as f64;
    let lattice = Lattice::new([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]).unwrap();

    let mut atoms = Vec::with_capacity(n * n * n);
    for element in ["Si", "O"] {
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    if ((i + j + k) % 2 == 0) == (element == "Si") {
                        let position = [i as f64, j as f64, k as f64].map(|x| x / n as f64);
                        atoms.push(Atom::new(element, position.into()));
                    }
                }
            }
        }
    }

    Structure::new("bench", lattice, atoms, false)
}

fn benchmark(c: &mut Criterion) {
    let structure = supercell(8);
    let center: AtomLabel = "Si1".parse().unwrap();

    c.bench_function("Structure::neighbors (512 atoms, 5 Å)", |b| {
        b.iter(|| std::hint::black_box(structure.neighbors(&center, 5.0).unwrap()))
    });

    c.bench_function("Structure::label_index (512 atoms)", |b| {
        b.iter(|| std::hint::black_box(structure.label_index()))
    });

    let other = structure.clone();
    c.bench_function("Structure::compare (512 atoms)", |b| {
        b.iter(|| std::hint::black_box(structure.compare(&other, 0.0).unwrap()))
    });

    let mut content = Vec::new();
    structure.write_poscar_into(&mut content).unwrap();
    let file = PoscarFile::parse(&String::from_utf8(content).unwrap()).unwrap();
    c.bench_function("apply_selective_dynamics (512 atoms, All)", |b| {
        b.iter(|| {
            std::hint::black_box(
                apply_selective_dynamics(&file, &Selection::All, MobilityTag::FROZEN).unwrap(),
            )
        })
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
