use crate::properties::Properties;
use ndarray::prelude::*;

impl Properties {
    /// Returns a view of the reference Hamiltonian in the AO basis.
    pub fn h0(&self) -> Option<ArrayView2<f64>> {
        self.get("H0")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    /// Returns a view of the overlap matrix in the AO basis.
    pub fn s(&self) -> Option<ArrayView2<f64>> {
        self.get("S")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    /// Returns a view of the density matrix in the AO basis.
    pub fn p(&self) -> Option<ArrayView2<f64>> {
        self.get("P")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    /// Returns a view of the reference density matrix (neutral atoms).
    pub fn p_ref(&self) -> Option<ArrayView2<f64>> {
        self.get("P_ref")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    pub fn gamma(&self) -> Option<ArrayView2<f64>> {
        self.get("gamma_atom_wise")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    /// Returns a view of the screened (long-range) gamma matrix.
    pub fn gamma_lr(&self) -> Option<ArrayView2<f64>> {
        self.get("gamma_lr_atom_wise")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    pub fn gamma_lr_ao(&self) -> Option<ArrayView2<f64>> {
        self.get("gamma_lr_ao_wise")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    /// Returns a view of the MO coefficients, one orbital per column.
    pub fn orbs(&self) -> Option<ArrayView2<f64>> {
        self.get("orbs")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    /// Returns a view of the occupied-virtual transition charges [n_atoms, n_occ * n_virt].
    pub fn q_ov(&self) -> Option<ArrayView2<f64>> {
        self.get("q_ov")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    pub fn q_oo(&self) -> Option<ArrayView2<f64>> {
        self.get("q_oo")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    pub fn q_vv(&self) -> Option<ArrayView2<f64>> {
        self.get("q_vv")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    /// Returns a view of the excitation vectors, one state per column.
    pub fn ci_coefficients(&self) -> Option<ArrayView2<f64>> {
        self.get("ci_coefficients")
            .and_then(|value| value.as_array2())
            .map(|value| value.view())
    }

    /// Returns a view of the Mulliken charge differences.
    pub fn dq(&self) -> Option<ArrayView1<f64>> {
        self.get("dq")
            .and_then(|value| value.as_array1())
            .map(|value| value.view())
    }

    /// Returns a view of the orbital energies.
    pub fn orbe(&self) -> Option<ArrayView1<f64>> {
        self.get("orbe")
            .and_then(|value| value.as_array1())
            .map(|value| value.view())
    }

    pub fn occupation(&self) -> Option<ArrayView1<f64>> {
        self.get("occupation")
            .and_then(|value| value.as_array1())
            .map(|value| value.view())
    }

    /// Returns a view of the orbital energy differences of the single excitations.
    pub fn omega(&self) -> Option<ArrayView1<f64>> {
        self.get("omega")
            .and_then(|value| value.as_array1())
            .map(|value| value.view())
    }

    /// Returns a view of the excitation energies.
    pub fn ci_eigenvalues(&self) -> Option<ArrayView1<f64>> {
        self.get("ci_eigenvalues")
            .and_then(|value| value.as_array1())
            .map(|value| value.view())
    }

    /// Returns the total SCC energy of the last iteration.
    pub fn last_energy(&self) -> Option<f64> {
        self.get("last_scc_energy")
            .and_then(|value| value.as_double())
            .copied()
    }

    pub fn n_iterations(&self) -> Option<usize> {
        self.get("n_iterations").and_then(|value| value.as_usize()).copied()
    }
}
