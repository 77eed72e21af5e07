use crate::constants::ANGS_TO_BOHR;
use crate::initialization::parameter_handling::SkfParameters;
use crate::initialization::Atom;
use crate::param::Element;
use anyhow::{anyhow, bail, Context, Result};
use chemfiles::{Frame, Trajectory};
use ndarray::Array2;
use std::convert::TryFrom;

/// Extract the atomic numbers and positions (in bohr) from a [Frame](chemfiles::Frame)
pub fn frame_to_coordinates(frame: &Frame) -> (Vec<u8>, Array2<f64>) {
    let positions: Array2<f64> =
        Array2::from_shape_fn((frame.size(), 3), |(i, j)| frame.positions()[i][j] * ANGS_TO_BOHR);
    let atomic_numbers: Vec<u8> = (0..frame.size())
        .map(|i| frame.atom(i).atomic_number() as u8)
        .collect();
    (atomic_numbers, positions)
}

/// Convert the content of a [Frame](chemfiles::Frame) into [Atom]s with the parameters of
/// their element. The positions are stored in bohr.
pub fn frame_to_atoms(frame: &Frame, parameters: &SkfParameters) -> Result<Vec<Atom>> {
    let (numbers, positions) = frame_to_coordinates(frame);
    numbers
        .iter()
        .zip(positions.outer_iter())
        .enumerate()
        .map(|(idx, (number, position))| {
            let element: Element = Element::try_from(*number)
                .with_context(|| format!("atom {} of the geometry", idx + 1))?;
            let mut atom: Atom = parameters.atom(element)?.clone();
            atom.position_from_slice(&[position[0], position[1], position[2]]);
            Ok(atom)
        })
        .collect()
}

/// Read a xyz-geometry file like .xyz or .pdb and returns a [Frame](chemfiles::Frame)
pub fn read_file_to_frame(filename: &str) -> Result<Frame> {
    let mut trajectory = Trajectory::open(filename, 'r')
        .map_err(|e| anyhow!("could not open the geometry file {}: {}", filename, e))?;
    let mut frame = Frame::new();
    // if multiple geometries are contained in the file, we will only use the first one
    trajectory
        .read(&mut frame)
        .map_err(|e| anyhow!("could not read a frame from {}: {}", filename, e))?;
    Ok(frame)
}

/// Parse a molecule written as `NAME x y z; NAME x y z; ...` with the coordinates in
/// Angstrom. The element of each atom is derived from its name.
pub fn atoms_from_string(
    atom_string: &str,
    parameters: &SkfParameters,
) -> Result<Vec<Atom>> {
    let mut atoms: Vec<Atom> = Vec::new();
    for (idx, entry) in atom_string
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
    {
        let fields: Vec<&str> = entry.split_whitespace().collect();
        if fields.len() != 4 {
            bail!(
                "atom {} '{}' needs a name and three coordinates",
                idx + 1,
                entry
            );
        }
        let element: Element = Element::from_atom_name(fields[0])?;
        let mut xyz: [f64; 3] = [0.0; 3];
        for (value, field) in xyz.iter_mut().zip(fields[1..].iter()) {
            *value = field
                .parse::<f64>()
                .with_context(|| format!("invalid coordinate '{}' of atom {}", field, idx + 1))?
                * ANGS_TO_BOHR;
        }
        let mut atom: Atom = parameters.atom(element)?.clone();
        atom.position_from_slice(&xyz);
        atoms.push(atom);
    }
    if atoms.is_empty() {
        bail!("the atom string does not contain any atom");
    }
    Ok(atoms)
}

/// Elements of the atoms in a `NAME x y z; ...` string.
pub fn elements_in_string(atom_string: &str) -> Result<Vec<Element>> {
    atom_string
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .split_whitespace()
                .next()
                .ok_or_else(|| anyhow!("empty atom entry"))
                .and_then(Element::from_atom_name)
        })
        .collect()
}

/// Elements present in a [Frame](chemfiles::Frame).
pub fn elements_in_frame(frame: &Frame) -> Result<Vec<Element>> {
    (0..frame.size())
        .map(|i| Element::try_from(frame.atom(i).atomic_number() as u8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tests::hydrogen_parameters;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parse_atom_string() {
        let params = hydrogen_parameters();
        let atoms = atoms_from_string("H1 0.0 0.0 0.0; H2 0.0 0.0 0.74;", &params).unwrap();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[1].kind, Element::H);
        assert_abs_diff_eq!(atoms[1].xyz.z, 0.74 * ANGS_TO_BOHR, epsilon = 1e-12);
    }

    #[test]
    fn malformed_atom_strings_are_rejected() {
        let params = hydrogen_parameters();
        assert!(atoms_from_string("H1 0.0 0.0", &params).is_err());
        assert!(atoms_from_string("H1 0.0 x 0.0", &params).is_err());
        assert!(atoms_from_string(" ; ", &params).is_err());
        // no parameters for carbon
        assert!(atoms_from_string("C1 0.0 0.0 0.0", &params).is_err());
    }

    #[test]
    fn elements_of_an_atom_string() {
        let elements = elements_in_string("C5' 0 0 0; O^1 1 0 0; H5'' 0 1 0").unwrap();
        assert_eq!(elements, vec![Element::C, Element::O, Element::H]);
    }
}
