//! Ground and excited state calculations of the monomers and the dimer, and the complete
//! set of couplings between two monomers.
use crate::constants::BOHR_TO_ANGS;
use crate::coupling::*;
use crate::initialization::parameter_handling::SkfParameters;
use crate::initialization::{center_of_mass, get_xyz_2d, Atom, System};
use crate::io::settings::Configuration;
use crate::io::{write_transition_density, CouplingReport};
use crate::scc::RestrictedScc;
use anyhow::{ensure, Context, Result};
use log::info;
use ndarray::prelude::*;
use serde::Serialize;

/// Excited state properties of the requested states of one molecule.
#[derive(Serialize, Clone, Debug)]
pub struct TddftResult {
    /// the requested states (0 is the lowest excited state)
    pub states: Vec<usize>,
    /// excitation energies in Hartree
    pub energies: Array1<f64>,
    /// transition dipole moments in a.u., shape [n_states, 3]
    pub transition_dipoles: Array2<f64>,
    pub oscillator_strengths: Array1<f64>,
    /// transition density of the first requested state in the AO basis
    pub tdm_ao: Array2<f64>,
}

/// Ground state of a single molecule.
pub fn do_dft(atoms: Vec<Atom>, parameters: &SkfParameters, config: &Configuration) -> Result<System> {
    let mut system: System = System::new(atoms, parameters, config)?;
    system.prepare_scc()?;
    system.run_scc()?;
    Ok(system)
}

/// Ground state of the supermolecule of both monomers.
pub fn dimer_dft(system_a: &System, system_b: &System) -> Result<System> {
    let mut dimer: System = System::dimer(system_a, system_b)?;
    dimer.prepare_scc()?;
    dimer.run_scc()?;
    Ok(dimer)
}

/// Singlet excited states of a molecule with a converged ground state. The lowest
/// `max(states) + 1` states are computed.
pub fn do_tddft(system: &mut System, states: &[usize]) -> Result<TddftResult> {
    let n_roots: usize = states
        .iter()
        .max()
        .map(|state| state + 1)
        .context("at least one excited state has to be requested")?;
    let dim: usize = system.occ_indices.len() * system.virt_indices.len();
    ensure!(
        n_roots <= dim,
        "{} excited states were requested, but the molecule has only {} single excitations",
        n_roots,
        dim
    );

    let excited = system.config.excited;
    system.prepare_tda()?;
    let result = system.run_tda(
        n_roots,
        excited.davidson_iterations,
        excited.davidson_convergence,
        excited.davidson_subspace_multiplier,
    )?;

    Ok(TddftResult {
        states: states.to_vec(),
        energies: result.energies.select(Axis(0), states),
        transition_dipoles: result.tr_dip.t().select(Axis(0), states),
        oscillator_strengths: result.f.select(Axis(0), states),
        tdm_ao: result.transition_density_ao(states[0]),
    })
}

/// Vector between the centers of mass of two molecules in Angstrom.
pub fn separation(system_a: &System, system_b: &System) -> Array1<f64> {
    let r = center_of_mass(&system_a.atoms) - center_of_mass(&system_b.atoms);
    array![r.x, r.y, r.z] * BOHR_TO_ANGS
}

/// All couplings between the configured excited states of two monomers whose ground
/// states are converged. `r_ab` is the separation of the monomers in Angstrom.
pub fn compute_couplings(
    system_a: &mut System,
    system_b: &mut System,
    r_ab: ArrayView1<f64>,
    frame: Option<usize>,
) -> Result<CouplingReport> {
    let config = system_a.config.coupling.clone();

    let tddft_a: TddftResult = do_tddft(system_a, &[config.state_a])?;
    let tddft_b: TddftResult = do_tddft(system_b, &[config.state_b])?;
    if config.write_transition_densities {
        let suffix: String = frame.map_or_else(String::new, |f| format!("_{}", f));
        write_transition_density(&format!("tdm_a{}.npy", suffix), tddft_a.tdm_ao.view())?;
        write_transition_density(&format!("tdm_b{}.npy", suffix), tddft_b.tdm_ao.view())?;
    }

    // Coulomb coupling of the transition densities
    let coulomb: CoulombCoupling = coulomb_coupling(
        system_a,
        system_b,
        tddft_a.tdm_ao.view(),
        tddft_b.tdm_ao.view(),
        config.calculate_exchange,
    )?;

    // transition monopoles
    let q_a: Array1<f64> = lowdin_transition_charges(system_a, tddft_a.tdm_ao.view())?;
    let q_b: Array1<f64> = lowdin_transition_charges(system_b, tddft_b.tdm_ao.view())?;
    let monopole: f64 = transition_monopole_coupling(
        get_xyz_2d(&system_a.atoms).view(),
        get_xyz_2d(&system_b.atoms).view(),
        q_a.view(),
        q_b.view(),
    )?;

    // point dipoles
    let mu_a: ArrayView1<f64> = tddft_a.transition_dipoles.row(0);
    let mu_b: ArrayView1<f64> = tddft_b.transition_dipoles.row(0);
    let point_dipole: f64 = point_dipole_coupling(mu_a, mu_b, r_ab)?;

    // charge transfer
    let (te, th) = transfer_ct(system_a, system_b)?;
    let (ct, symmetric) = if config.use_optical_gap {
        let dimer: System = dimer_dft(system_a, system_b)?;
        let ct: CtCoupling = ct_coupling(te, th, r_ab, Some((&dimer, tddft_a.energies[0])))?;
        (ct, Some(transfer_sym(&dimer)?))
    } else {
        (ct_coupling(te, th, r_ab, None)?, None)
    };

    let report = CouplingReport {
        frame,
        state_a: config.state_a,
        state_b: config.state_b,
        energy_a: tddft_a.energies[0],
        energy_b: tddft_b.energies[0],
        oscillator_strength_a: tddft_a.oscillator_strengths[0],
        oscillator_strength_b: tddft_b.oscillator_strengths[0],
        dipole_a: mu_a.to_vec(),
        dipole_b: mu_b.to_vec(),
        r_ab: r_ab.to_vec(),
        coulomb_integral: coulomb.coulomb_integral,
        exchange_integral: coulomb.exchange_integral,
        coulomb: coulomb.coupling,
        monopole,
        point_dipole,
        te,
        th,
        ct,
        te_sym: symmetric.map(|(te, _)| te),
        th_sym: symmetric.map(|(_, th)| th),
    };
    info!("{}", report);
    Ok(report)
}
