//! Synthetic parameters and small molecules shared by the unit tests.
use crate::constants::ANGS_TO_BOHR;
use crate::initialization::parameter_handling::SkfParameters;
use crate::initialization::parameters::SkfHandler;
use crate::initialization::{Atom, System};
use crate::io::settings::Configuration;
use crate::param::Element;

/// Slater-Koster file for a hydrogen pair: overlap exp(-r/2), Hamiltonian
/// -0.6 exp(-r/2) on a grid of 100 points with a spacing of 0.1 bohr, and a
/// repulsive potential made of two intervals.
pub fn h_h_skf() -> String {
    let mut skf: String = String::from("0.1 100\n");
    skf.push_str("0.0 0.0 -0.2386 0.0 0.0 0.0 0.4195 0.0 0.0 1.0\n");
    skf.push_str("1.008 19*0.0\n");
    for i in 1..=100 {
        let r: f64 = 0.1 * i as f64;
        let s: f64 = (-0.5 * r).exp();
        skf.push_str(&format!("9*0.0 {:.12} 9*0.0 {:.12}\n", -0.6 * s, s));
    }
    skf.push_str("Spline\n");
    skf.push_str("2 3.0\n");
    skf.push_str("2.0 1.0 0.0\n");
    skf.push_str("1.0 2.0 0.1 -0.05 0.0 0.0\n");
    skf.push_str("2.0 3.0 0.05 -0.05 0.0 0.0 0.0 0.0\n");
    skf
}

pub const H_C_SKF: &str = "1.0 5
12.0 19*0.0
8*0.0 -0.2 -0.3 8*0.0 0.3 0.4
8*0.0 -0.2 -0.3 8*0.0 0.3 0.4
8*0.0 -0.2 -0.3 8*0.0 0.3 0.4
8*0.0 -0.2 -0.3 8*0.0 0.3 0.4
8*0.0 -0.2 -0.3 8*0.0 0.3 0.4
";

pub const C_H_SKF: &str = "1.0 5
12.0 19*0.0
8*0.0 0.1 -0.3 8*0.0 0.1 0.4
8*0.0 0.1 -0.3 8*0.0 0.1 0.4
8*0.0 0.1 -0.3 8*0.0 0.1 0.4
8*0.0 0.1 -0.3 8*0.0 0.1 0.4
8*0.0 0.1 -0.3 8*0.0 0.1 0.4
";

pub fn hydrogen_parameters() -> SkfParameters {
    let handler = SkfHandler::from_string(Element::H, Element::H, h_h_skf());
    SkfParameters::from_handlers(&[handler]).unwrap()
}

pub fn get_config() -> Configuration {
    toml::from_str("").unwrap()
}

/// Hydrogen atoms at the given positions in Angstrom.
pub fn hydrogen_atoms(params: &SkfParameters, positions: &[[f64; 3]]) -> Vec<Atom> {
    positions
        .iter()
        .map(|xyz| {
            let mut atom: Atom = params.atom(Element::H).unwrap().clone();
            atom.position_from_slice(&[
                xyz[0] * ANGS_TO_BOHR,
                xyz[1] * ANGS_TO_BOHR,
                xyz[2] * ANGS_TO_BOHR,
            ]);
            atom
        })
        .collect()
}

/// H2 molecule (bond length 0.74 A along x) displaced by `offset` Angstrom along z.
pub fn h2_system(params: &SkfParameters, offset: f64) -> System {
    let atoms = hydrogen_atoms(params, &[[0.0, 0.0, offset], [0.74, 0.0, offset]]);
    System::new(atoms, params, &get_config()).unwrap()
}

/// Linear H4 chain along x displaced by `offset` Angstrom along z. It has two occupied
/// and two virtual orbitals.
pub fn h4_system(params: &SkfParameters, offset: f64) -> System {
    let atoms = hydrogen_atoms(
        params,
        &[
            [0.0, 0.0, offset],
            [0.9, 0.0, offset],
            [1.8, 0.0, offset],
            [2.7, 0.0, offset],
        ],
    );
    System::new(atoms, params, &get_config()).unwrap()
}
