//! Excitonic couplings between two chromophores A and B.
//!
//! All energies are in Hartree and all input geometries in bohr, unless a function states
//! otherwise.
pub use charge_transfer::{ct_coupling, transfer_ct, transfer_sym, CtCoupling};
pub use coulomb::{coulomb_coupling, jk_integrals, lowdin_transition_charges, CoulombCoupling};
pub use multipole::{point_dipole_coupling, transition_monopole_coupling};

mod charge_transfer;
mod coulomb;
mod multipole;

use crate::initialization::System;
use crate::scc::h0_and_s::h0_and_s;
use anyhow::Result;
use ndarray::prelude::*;

/// The overlap matrix of a molecule. It is taken from the ground state calculation if one
/// was done before.
fn overlap(system: &System) -> Result<Array2<f64>> {
    match system.properties.s() {
        Some(s) => Ok(s.to_owned()),
        None => Ok(h0_and_s(system.n_orbs, &system.atoms, &system.slako)?.0),
    }
}
