use crate::defaults::CAP_OFFSET;
use anyhow::{anyhow, bail, Context, Result};
use chemfiles::{Frame, Selection};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Atoms of the phosphate group that are removed from a nucleotide.
const PHOSPHATE_ATOMS: [&str; 3] = ["P", "OP1", "OP2"];
/// Terminal oxygens that are capped with a hydrogen. The O3' cap is added first.
const CAPPED_ATOMS: [[&str; 2]; 2] = [["O3'", "O3*"], ["O5'", "O5*"]];
/// Renaming of the atoms in the written coordinates.
const RENAMED_ATOMS: [(&str, &str); 4] = [
    ("O5'", "O5*"),
    ("O3'", "O3*"),
    ("OP1", "O^1"),
    ("OP2", "O^2"),
];

/// Indices of the atoms of a residue.
fn residue_atoms(frame: &Frame, residue: u64) -> Result<Vec<usize>> {
    let mut selection = Selection::new(format!("resid {}", residue).as_str())
        .map_err(|e| anyhow!("invalid residue selection {}: {}", residue, e))?;
    let indices: Vec<usize> = selection
        .list(frame)
        .into_iter()
        .map(|index| index as usize)
        .collect();
    if indices.is_empty() {
        bail!("the residue {} does not contain any atom", residue);
    }
    Ok(indices)
}

fn rename(name: &str) -> String {
    RENAMED_ATOMS
        .iter()
        .fold(name.to_owned(), |name, (old, new)| name.replace(old, new))
}

/// Extract a nucleotide from a frame of the trajectory: the phosphate atoms are removed, the
/// O3' and O5' atoms are capped with hydrogens and the atoms are renamed. The coordinates are
/// written as `NAME x y z; NAME x y z; ...` (Angstrom) to the file
/// `{coord_path}{residue}{frame_index}.csv` and returned.
pub fn process_md(frame: &Frame, residue: u64, frame_index: usize, coord_path: &str) -> Result<String> {
    let positions: &[[f64; 3]] = frame.positions();
    let mut atoms: Vec<(String, [f64; 3])> = Vec::new();
    let mut caps: Vec<Option<[f64; 3]>> = vec![None; CAPPED_ATOMS.len()];
    for index in residue_atoms(frame, residue)? {
        let name: String = frame.atom(index).name();
        let xyz: [f64; 3] = positions[index];
        if let Some(cap) = CAPPED_ATOMS
            .iter()
            .position(|names| names.contains(&name.as_str()))
        {
            caps[cap] = Some(xyz.map(|x| x + CAP_OFFSET));
        }
        if !PHOSPHATE_ATOMS.contains(&name.as_str()) {
            atoms.push((rename(&name), xyz));
        }
    }
    for (cap, names) in caps.into_iter().zip(CAPPED_ATOMS.iter()) {
        match cap {
            Some(xyz) => atoms.push((String::from("H"), xyz)),
            None => warn!(
                "residue {} has no {} atom, it is not capped there",
                residue, names[0]
            ),
        }
    }

    let atom_string: String = atoms
        .iter()
        .map(|(name, xyz)| format!("{} {:.6} {:.6} {:.6}", name, xyz[0], xyz[1], xyz[2]))
        .collect::<Vec<String>>()
        .join("; ");

    let filename: String = format!("{}{}{}.csv", coord_path, residue, frame_index);
    if let Some(directory) = Path::new(&filename).parent() {
        if !directory.as_os_str().is_empty() {
            fs::create_dir_all(directory)
                .with_context(|| format!("Unable to create directory {}", directory.display()))?;
        }
    }
    fs::write(&filename, &atom_string)
        .with_context(|| format!("Unable to write the coordinates to {}", filename))?;
    debug!("coordinates of residue {} written to {}", residue, filename);
    Ok(atom_string)
}

/// Mass-weighted center of a residue in Angstrom.
pub fn center_of_mass(frame: &Frame, residue: u64) -> Result<[f64; 3]> {
    let positions: &[[f64; 3]] = frame.positions();
    let mut center: [f64; 3] = [0.0; 3];
    let mut total: f64 = 0.0;
    for index in residue_atoms(frame, residue)? {
        let mass: f64 = frame.atom(index).mass();
        for (c, x) in center.iter_mut().zip(positions[index].iter()) {
            *c += mass * x;
        }
        total += mass;
    }
    if total <= 0.0 {
        bail!("the atoms of residue {} have no mass", residue);
    }
    Ok(center.map(|c| c / total))
}

/// Vector between the centers of mass of two residues, COM_A - COM_B, in Angstrom.
pub fn residue_separation(frame: &Frame, residue_a: u64, residue_b: u64) -> Result<[f64; 3]> {
    let com_a: [f64; 3] = center_of_mass(frame, residue_a)?;
    let com_b: [f64; 3] = center_of_mass(frame, residue_b)?;
    Ok([com_a[0] - com_b[0], com_a[1] - com_b[1], com_a[2] - com_b[2]])
}
