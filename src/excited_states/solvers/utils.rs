/*!

## Auxiliar functions of the iterative eigensolver

 */

use crate::utils::array_helper::argsort;
use log::info;
use ndarray::prelude::*;
use std::time::Instant;

/// Generate the initial subspace vectors. These correspond to the `dim` lowest
/// diagonal elements of the matrix that will be diagonalized.
pub fn initial_subspace(diag: ArrayView1<f64>, dim: usize) -> Array2<f64> {
    let order: Vec<usize> = argsort(diag);
    let mut mtx: Array2<f64> = Array2::zeros([diag.len(), dim]);
    for (idx, i) in order.into_iter().enumerate().take(dim) {
        mtx[[i, idx]] = 1.0;
    }
    mtx
}

pub fn print_davidson_init(max_iter: usize, nroots: usize, tolerance: f64) {
    info!("{:^80}", "");
    info!("{: ^80}", "Iterative Davidson Routine");
    info!("{:-^80}", "");
    info!(
        "{: <25} {:4.2e}",
        "Energy is converged when residual is below:", tolerance
    );
    info!("{: <25} {}", "Maximum number of iterations:", max_iter);
    if nroots == 1 {
        info!("{: >4} {: <25}", nroots, " Root will be computed.");
    } else {
        info!("{: >4} {: <25}", nroots, " Roots will be computed.");
    }
    info!("{:-^75} ", "");
    info!(
        "{: <5}{: >14}{: >14}{: >14}{: >14}{: >14}",
        "Iter.", "Roots conv.", "Roots left", "#subsp. Vec.", "Total dev.", "Max dev."
    );
    info!("{:-^75} ", "");
}

pub fn print_davidson_iteration(
    iter: usize,
    roots_cvd: usize,
    roots_lft: usize,
    nvec: usize,
    t_dev: f64,
    max_dev: f64,
) {
    info!(
        "{: >5}{:>14}{:>14}{:>14}{:>14.8}{:>14.8}",
        iter + 1,
        roots_cvd,
        roots_lft,
        nvec,
        t_dev,
        max_dev
    );
}

pub fn print_davidson_end(result_is_ok: bool, time: Instant) {
    info!("{:-^75} ", "");
    if result_is_ok {
        info!("Davidson routine converged")
    } else {
        info!("Davidson routine did not converge!")
    }
    info!(
        "{:>68} {:>8.2} s",
        "elapsed time:",
        time.elapsed().as_secs_f32()
    );
    info!("{:-^80}", "");
    info!("{:^80}", "");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_vectors_of_lowest_diagonal_elements() {
        let guess = initial_subspace(array![3.0, 1.0, 2.0, 0.5].view(), 2);
        assert_eq!(guess.dim(), (4, 2));
        assert_eq!(guess[[3, 0]], 1.0);
        assert_eq!(guess[[1, 1]], 1.0);
        assert_eq!(guess.sum(), 2.0);
    }
}
