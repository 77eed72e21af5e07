use crate::properties::Properties;
use ndarray::prelude::*;

impl Properties {
    pub fn set_h0(&mut self, h0: Array2<f64>) {
        self.set("H0", h0.into())
    }

    pub fn set_s(&mut self, s: Array2<f64>) {
        self.set("S", s.into())
    }

    pub fn set_p(&mut self, p: Array2<f64>) {
        self.set("P", p.into())
    }

    pub fn set_p_ref(&mut self, p_ref: Array2<f64>) {
        self.set("P_ref", p_ref.into())
    }

    pub fn set_gamma(&mut self, gamma: Array2<f64>) {
        self.set("gamma_atom_wise", gamma.into())
    }

    pub fn set_gamma_lr(&mut self, gamma_lr: Array2<f64>) {
        self.set("gamma_lr_atom_wise", gamma_lr.into())
    }

    pub fn set_gamma_lr_ao(&mut self, gamma_lr_ao: Array2<f64>) {
        self.set("gamma_lr_ao_wise", gamma_lr_ao.into())
    }

    pub fn set_orbs(&mut self, orbs: Array2<f64>) {
        self.set("orbs", orbs.into())
    }

    pub fn set_q_ov(&mut self, q_ov: Array2<f64>) {
        self.set("q_ov", q_ov.into())
    }

    pub fn set_q_oo(&mut self, q_oo: Array2<f64>) {
        self.set("q_oo", q_oo.into())
    }

    pub fn set_q_vv(&mut self, q_vv: Array2<f64>) {
        self.set("q_vv", q_vv.into())
    }

    pub fn set_ci_coefficients(&mut self, ci_coefficients: Array2<f64>) {
        self.set("ci_coefficients", ci_coefficients.into())
    }

    pub fn set_dq(&mut self, dq: Array1<f64>) {
        self.set("dq", dq.into())
    }

    pub fn set_orbe(&mut self, orbe: Array1<f64>) {
        self.set("orbe", orbe.into())
    }

    pub fn set_occupation(&mut self, occupation: Array1<f64>) {
        self.set("occupation", occupation.into())
    }

    pub fn set_omega(&mut self, omega: Array1<f64>) {
        self.set("omega", omega.into())
    }

    pub fn set_ci_eigenvalues(&mut self, ci_eigenvalues: Array1<f64>) {
        self.set("ci_eigenvalues", ci_eigenvalues.into())
    }

    pub fn set_last_energy(&mut self, energy: f64) {
        self.set("last_scc_energy", energy.into())
    }

    pub fn set_n_iterations(&mut self, n_iterations: usize) {
        self.set("n_iterations", n_iterations.into())
    }
}
