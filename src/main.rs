use crate::drivers::{compute_couplings, do_dft, do_tddft, separation};
use crate::initialization::parameter_handling::SkfParameters;
use crate::initialization::{Atom, System};
use crate::io::{
    elements_in_frame, frame_to_atoms, read_file_to_frame, read_input, write_footer,
    write_header, write_report, Configuration, CouplingReport,
};
use crate::param::Element;
use crate::trajectory::process_trajectory;
use crate::utils::Timer;
use anyhow::{bail, Context, Result};
use chemfiles::Frame;
use clap::{Arg, Command};
use env_logger::Builder;
use log::LevelFilter;
use ndarray::prelude::*;
use std::io::Write;
use std::process;

mod constants;
mod coupling;
mod defaults;
mod drivers;
mod excited_states;
mod initialization;
mod io;
mod param;
mod properties;
mod scc;
mod trajectory;
mod utils;

#[macro_use]
extern crate clap;

/// Read the geometry files and the parameters of all elements that occur in them.
fn read_geometries(
    filenames: &[&str],
    config: &Configuration,
) -> Result<(Vec<Vec<Atom>>, SkfParameters)> {
    let frames: Vec<Frame> = filenames
        .iter()
        .map(|filename| read_file_to_frame(filename))
        .collect::<Result<Vec<Frame>>>()?;
    let mut elements: Vec<Element> = Vec::new();
    for frame in frames.iter() {
        elements.extend(elements_in_frame(frame)?);
    }
    let parameters: SkfParameters =
        SkfParameters::from_directory(&elements, &config.slater_koster.skf_directory)?;
    let atoms: Vec<Vec<Atom>> = frames
        .iter()
        .map(|frame| frame_to_atoms(frame, &parameters))
        .collect::<Result<Vec<Vec<Atom>>>>()?;
    Ok((atoms, parameters))
}

fn run() -> Result<()> {
    // Input.
    let matches = Command::new(crate_name!())
        .version(crate_version!())
        .about("excitation energy transfer couplings between two chromophores")
        .arg(
            Arg::new("geometry")
                .help(
                    "Geometry file (sp), the geometry files of both monomers (coupling) \
                     or the trajectory file (trajectory)",
                )
                .required(true)
                .multiple_values(true)
                .index(1),
        )
        .get_matches();
    let filenames: Vec<&str> = matches
        .values_of("geometry")
        .map(|values| values.collect())
        .unwrap_or_default();
    let config: Configuration = read_input()?;

    // Multithreading.
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.parallelization.number_of_cores)
        .build_global()
        .context("the thread pool could not be initialized")?;

    // Logging.
    // The log level is set.
    let log_level: LevelFilter = match config.verbose {
        2 => LevelFilter::Trace,
        1 => LevelFilter::Debug,
        0 => LevelFilter::Info,
        -1 => LevelFilter::Warn,
        -2 => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    // and the logger is build.
    Builder::new()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .filter(None, log_level)
        .init();

    // The program header is written to the command line.
    write_header();
    // and the total wall-time timer is started.
    let timer: Timer = Timer::start();

    // Computations.
    // ................................................................
    match (config.jobtype.as_str(), filenames.as_slice()) {
        ("sp", [filename]) => {
            let (mut atoms, parameters) = read_geometries(&[*filename], &config)?;
            let mut system: System = do_dft(atoms.remove(0), &parameters, &config)?;
            // Calculate the excited state energies
            if config.excited.calculate_excited_states {
                let states: Vec<usize> = (0..config.excited.nstates).collect();
                do_tddft(&mut system, &states)?;
            }
        }
        ("coupling", [file_a, file_b]) => {
            let (mut atoms, parameters) = read_geometries(&[*file_a, *file_b], &config)?;
            let atoms_b: Vec<Atom> = atoms.remove(1);
            let atoms_a: Vec<Atom> = atoms.remove(0);
            let mut system_a: System = do_dft(atoms_a, &parameters, &config)?;
            let mut system_b: System = do_dft(atoms_b, &parameters, &config)?;
            let r_ab: Array1<f64> = separation(&system_a, &system_b);
            let report: CouplingReport =
                compute_couplings(&mut system_a, &mut system_b, r_ab.view(), None)?;
            write_report(&config.coupling.report_file, &[report])?;
        }
        ("trajectory", [filename]) => {
            let reports: Vec<CouplingReport> = process_trajectory(filename, &config)?;
            write_report(&config.coupling.report_file, &reports)?;
        }
        ("sp", _) | ("trajectory", _) => bail!(
            "the job {} needs exactly one input file, {} were given",
            config.jobtype,
            filenames.len()
        ),
        ("coupling", _) => bail!(
            "the coupling job needs the geometry files of both monomers, {} were given",
            filenames.len()
        ),
        (jtype, _) => bail!("The specified jobtype {} is not implemented.", jtype),
    }

    write_footer(timer);
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("Error: {:?}", error);
        process::exit(1);
    }
}
