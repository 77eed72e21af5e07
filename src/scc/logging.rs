use crate::constants::HARTREE_TO_EV;
use crate::scc::get_homo_lumo_gap;
use crate::utils::Timer;
use log::{debug, info};
use ndarray::ArrayView1;

const TABLE_WIDTH: usize = 64;

/// Summary of the molecule and the SCC settings, followed by the head of the iteration table.
pub fn print_scc_init(
    n_atoms: usize,
    n_orbs: usize,
    n_elec: usize,
    r_lr: Option<f64>,
    max_iter: usize,
    temperature: f64,
    rep_energy: f64,
) {
    info!("{:^80}", "");
    info!("{: ^80}", "SCC ground state");
    info!("{:-^80}", "");
    info!("{: <28} {} / {} / {}", "atoms / orbitals / electrons:", n_atoms, n_orbs, n_elec);
    match r_lr {
        Some(r) => info!("{: <28} on, R_lr = {:.3} bohr", "long-range correction:", r),
        None => info!("{: <28} off", "long-range correction:"),
    }
    info!("{: <28} {}", "max. iterations:", max_iter);
    info!("{: <28} {} K", "electronic temperature:", temperature);
    info!("{: <28} {:.12} Hartree", "repulsive energy:", rep_energy);
    info!("{:-^w$}", "", w = TABLE_WIDTH);
    info!(
        "{: <6} {: >18} {: >18} {: >18}",
        "Iter.", "E_total / Ha", "dE / Ha", "rms(dq)"
    );
    info!("{:-^w$}", "", w = TABLE_WIDTH);
}

/// Mulliken charges of the current iteration (debug level).
pub fn print_charges(q: ArrayView1<f64>, dq: ArrayView1<f64>) {
    debug!("{: <6} {: >16} {: >16}", "atom", "q", "dq");
    for (idx, (qi, dqi)) in q.iter().zip(dq.iter()).enumerate() {
        debug!("{: >6} {:>16.10} {:>16.10}", idx + 1, qi, dqi);
    }
}

/// One row of the iteration table. The energy change of the first iteration is not defined.
pub fn print_energies_at_iteration(
    iter: usize,
    total_energy: f64,
    energy_diff: Option<f64>,
    dq_rmsd: f64,
) {
    match energy_diff {
        Some(diff) => info!(
            "{: >6} {:>18.10} {:>18.6e} {:>18.6e}",
            iter + 1,
            total_energy,
            diff,
            dq_rmsd
        ),
        None => info!(
            "{: >6} {:>18.10} {:>18} {:>18.6e}",
            iter + 1,
            total_energy,
            "-",
            dq_rmsd
        ),
    }
}

/// Energies of the converged ground state and the frontier orbitals that enter the
/// charge transfer couplings.
pub fn print_scc_end(
    timer: Timer,
    n_iterations: usize,
    scf_energy: f64,
    rep_energy: f64,
    orbe: ArrayView1<f64>,
    n_elec: usize,
) {
    info!("{:-^w$}", "", w = TABLE_WIDTH);
    info!("SCC converged in {} iterations", n_iterations);
    info!("{: <20} {:18.12} Hartree", "electronic energy:", scf_energy);
    info!("{: <20} {:18.12} Hartree", "repulsive energy:", rep_energy);
    info!("{: <20} {:18.12} Hartree", "total energy:", scf_energy + rep_energy);
    print_frontier_orbitals(orbe, n_elec);
    info!("{}", timer);
}

/// Name of orbital `idx` relative to the HOMO and LUMO, e.g. `HOMO-1` or `LUMO`.
fn frontier_label(idx: usize, n_occ: usize) -> String {
    if idx < n_occ {
        match n_occ - 1 - idx {
            0 => String::from("HOMO"),
            n => format!("HOMO-{}", n),
        }
    } else {
        match idx - n_occ {
            0 => String::from("LUMO"),
            n => format!("LUMO+{}", n),
        }
    }
}

fn print_frontier_orbitals(orbe: ArrayView1<f64>, n_elec: usize) {
    let n_occ: usize = n_elec / 2;
    let first: usize = n_occ.saturating_sub(2);
    let last: usize = (n_occ + 2).min(orbe.len());
    for idx in first..last {
        info!(
            "{: <8} {:>14.8} Hartree {:>10.4} eV",
            frontier_label(idx, n_occ),
            orbe[idx],
            orbe[idx] * HARTREE_TO_EV
        );
    }
    if let Some(gap) = get_homo_lumo_gap(orbe, n_elec) {
        info!("{: <8} {:>14.8} Hartree {:>10.4} eV", "gap", gap, gap * HARTREE_TO_EV);
    }
}
