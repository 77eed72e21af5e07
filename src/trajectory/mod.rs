//! Extraction of the monomers from a molecular dynamics trajectory of a DNA strand and
//! the coupling calculation for every frame.
pub use md::{process_md, residue_separation};

mod md;

use crate::drivers::{compute_couplings, do_dft};
use crate::initialization::parameter_handling::SkfParameters;
use crate::initialization::Atom;
use crate::io::settings::{Configuration, TrajectoryConfig};
use crate::io::{atoms_from_string, elements_in_string, CouplingReport};
use crate::param::Element;
use anyhow::{anyhow, ensure, Context, Result};
use chemfiles::{Frame, Trajectory};
use log::{info, warn};
use ndarray::prelude::*;

/// Read the DFTB parameters of all elements that occur in the monomers.
fn parameters_for(atom_strings: &[&str], config: &Configuration) -> Result<SkfParameters> {
    let mut elements: Vec<Element> = Vec::new();
    for atom_string in atom_strings.iter() {
        elements.extend(elements_in_string(atom_string)?);
    }
    SkfParameters::from_directory(&elements, &config.slater_koster.skf_directory)
}

/// Couplings between the monomers of a single frame.
pub fn couplings_of_frame(
    frame: &Frame,
    frame_index: usize,
    config: &Configuration,
) -> Result<CouplingReport> {
    let settings: &TrajectoryConfig = &config.trajectory;
    let string_a: String =
        process_md(frame, settings.residue_a, frame_index, &settings.coord_path)?;
    let string_b: String =
        process_md(frame, settings.residue_b, frame_index, &settings.coord_path)?;
    let r_ab: [f64; 3] = residue_separation(frame, settings.residue_a, settings.residue_b)?;

    let parameters: SkfParameters = parameters_for(&[&string_a, &string_b], config)?;
    let atoms_a: Vec<Atom> = atoms_from_string(&string_a, &parameters)?;
    let atoms_b: Vec<Atom> = atoms_from_string(&string_b, &parameters)?;
    let mut system_a = do_dft(atoms_a, &parameters, config)
        .with_context(|| format!("ground state of residue {}", settings.residue_a))?;
    let mut system_b = do_dft(atoms_b, &parameters, config)
        .with_context(|| format!("ground state of residue {}", settings.residue_b))?;
    compute_couplings(
        &mut system_a,
        &mut system_b,
        Array1::from(r_ab.to_vec()).view(),
        Some(frame_index),
    )
}

/// Indices of the frames `first_frame, first_frame + stride, ...` up to `last_frame` or the
/// last of the `n_steps` frames of the trajectory. A stride of zero is treated as one.
fn selected_frames(settings: &TrajectoryConfig, n_steps: usize) -> Vec<usize> {
    let end: usize = match settings.last_frame {
        Some(last) if last >= n_steps => {
            warn!(
                "the last frame {} is beyond the end of the trajectory with {} frames",
                last, n_steps
            );
            n_steps
        }
        Some(last) => last + 1,
        None => n_steps,
    };
    (settings.first_frame..end)
        .step_by(settings.stride.max(1))
        .collect()
}

/// Couplings for the selected frames of a trajectory. A frame that cannot be read or whose
/// couplings fail is skipped with a warning, the reports of all other frames are returned.
pub fn process_trajectory(filename: &str, config: &Configuration) -> Result<Vec<CouplingReport>> {
    let mut trajectory = Trajectory::open(filename, 'r')
        .map_err(|e| anyhow!("could not open the trajectory {}: {}", filename, e))?;
    let n_steps: usize = trajectory.nsteps();
    let frames: Vec<usize> = selected_frames(&config.trajectory, n_steps);
    info!(
        "{} of the {} frames of {} are processed",
        frames.len(),
        n_steps,
        filename
    );

    let mut reports: Vec<CouplingReport> = Vec::new();
    let mut frame = Frame::new();
    for step in frames {
        if let Err(error) = trajectory.read_step(step, &mut frame) {
            warn!("frame {} of {} could not be read: {}", step, filename, error);
            continue;
        }
        info!("processing frame {}", step);
        match couplings_of_frame(&frame, step, config) {
            Ok(report) => reports.push(report),
            Err(error) => warn!("frame {} is skipped: {:#}", step, error),
        }
    }
    ensure!(
        !reports.is_empty(),
        "no frame of the trajectory {} was processed",
        filename
    );
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::{get_config, h_h_skf};
    use approx::assert_abs_diff_eq;
    use chemfiles::{Atom, Residue};
    use std::fs;
    use std::path::PathBuf;

    /// A frame with an H4 chain for each of the given residues, stacked 4 A apart along z.
    fn stacked_chains(residues: &[i64]) -> Frame {
        let mut frame = Frame::new();
        for (n, id) in residues.iter().enumerate() {
            let mut residue = Residue::with_id("HHH", *id);
            for i in 0..4 {
                let mut atom = Atom::new(format!("H{}", i + 1).as_str());
                atom.set_atomic_type("H");
                residue.add_atom(frame.size());
                frame.add_atom(&atom, [0.9 * i as f64, 0.0, 4.0 * n as f64], None);
            }
            frame.add_residue(&residue).unwrap();
        }
        frame
    }

    /// A working directory with the hydrogen parameters and a trajectory of the given frames.
    fn setup(name: &str, frames: &[Frame]) -> (PathBuf, Configuration) {
        let dir = std::env::temp_dir().join(format!("excoupling_traj_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("H-H.skf"), h_h_skf()).unwrap();
        {
            let mut trajectory = Trajectory::open(dir.join("md.pdb"), 'w').unwrap();
            for frame in frames.iter() {
                trajectory.write(frame).unwrap();
            }
        }
        let mut config = get_config();
        config.slater_koster.skf_directory = dir.display().to_string();
        config.trajectory.residue_a = 1;
        config.trajectory.residue_b = 2;
        config.trajectory.coord_path = format!("{}/coords/", dir.display());
        (dir, config)
    }

    fn processed(reports: &[CouplingReport]) -> Vec<Option<usize>> {
        reports.iter().map(|report| report.frame).collect()
    }

    #[test]
    fn frames_are_selected_by_range_and_stride() {
        let mut settings = get_config().trajectory;
        assert_eq!(selected_frames(&settings, 4), vec![0, 1, 2, 3]);
        settings.first_frame = 1;
        settings.stride = 2;
        assert_eq!(selected_frames(&settings, 6), vec![1, 3, 5]);
        settings.last_frame = Some(3);
        assert_eq!(selected_frames(&settings, 6), vec![1, 3]);
        settings.stride = 0;
        assert_eq!(selected_frames(&settings, 6), vec![1, 2, 3]);
        settings.last_frame = Some(10);
        assert_eq!(selected_frames(&settings, 3), vec![1, 2]);
        settings.first_frame = 5;
        assert!(selected_frames(&settings, 3).is_empty());
    }

    #[test]
    fn couplings_of_a_single_frame() {
        let (dir, config) = setup("single", &[]);
        let report = couplings_of_frame(&stacked_chains(&[1, 2]), 4, &config).unwrap();
        assert_eq!(report.frame, Some(4));
        assert_abs_diff_eq!(report.r_ab[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(report.r_ab[2], -4.0, epsilon = 1e-12);
        assert!(report.coulomb.is_finite());
        assert!(dir.join("coords").join("14.csv").exists());
        assert!(dir.join("coords").join("24.csv").exists());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn trajectory_is_processed_with_stride() {
        let frames: Vec<Frame> = (0..3).map(|_| stacked_chains(&[1, 2])).collect();
        let (dir, mut config) = setup("stride", &frames);
        config.trajectory.stride = 2;
        let filename: String = dir.join("md.pdb").display().to_string();
        let reports = process_trajectory(&filename, &config).unwrap();
        assert_eq!(processed(&reports), vec![Some(0), Some(2)]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn failing_frame_is_skipped() {
        // the second residue is missing in frame 1
        let frames: Vec<Frame> = vec![
            stacked_chains(&[1, 2]),
            stacked_chains(&[1]),
            stacked_chains(&[1, 2]),
        ];
        let (dir, mut config) = setup("failing", &frames);
        let filename: String = dir.join("md.pdb").display().to_string();
        let reports = process_trajectory(&filename, &config).unwrap();
        assert_eq!(processed(&reports), vec![Some(0), Some(2)]);

        // nothing is left when only the broken frame is selected
        config.trajectory.first_frame = 1;
        config.trajectory.last_frame = Some(1);
        assert!(process_trajectory(&filename, &config).is_err());
        // or when the range starts behind the last frame
        config.trajectory.first_frame = 5;
        config.trajectory.last_frame = None;
        assert!(process_trajectory(&filename, &config).is_err());
        fs::remove_dir_all(dir).unwrap();
    }
}
