use crate::constants::{PP_PI, PP_SIGMA, PS_SIGMA, SP_SIGMA, SS_SIGMA};
use hashbrown::HashMap;
use nalgebra::Vector3;
use splines::Spline;

/// compute directional cosines for the vector going from
/// pos1 to pos2
/// Returns:
/// ========
/// r: length of vector
/// x,y,z: directional cosines
pub fn directional_cosines(pos1: &Vector3<f64>, pos2: &Vector3<f64>) -> (f64, f64, f64, f64) {
    let diff: Vector3<f64> = pos2 - pos1;
    let r: f64 = diff.norm();
    if r > 0.0 {
        (r, diff.x / r, diff.y / r, diff.z / r)
    } else {
        (r, 0.0, 0.0, 1.0)
    }
}

/// Radial Slater-Koster integral `key` at distance `r`. Distances beyond the
/// tabulated grid give zero.
#[inline]
fn radial(s_or_h: &HashMap<u8, Spline<f64, f64>>, key: u8, r: f64) -> f64 {
    s_or_h
        .get(&key)
        .and_then(|spline| {
            let last = spline.keys().last()?.t;
            if r > last {
                Some(0.0)
            } else {
                spline.clamped_sample(r)
            }
        })
        .unwrap_or(0.0)
}

/// transformation rules for matrix elements between s and p orbitals
/// x,y,z are directional cosines, r is the distance between the two centers
/// the real p orbitals are ordered as m = -1 (p_y), 0 (p_z), 1 (p_x)
pub fn slako_transformation(
    r: f64,
    x: f64,
    y: f64,
    z: f64,
    s_or_h: &HashMap<u8, Spline<f64, f64>>,
    l1: i8,
    m1: i8,
    l2: i8,
    m2: i8,
) -> f64 {
    let cosine = |m: i8| -> f64 {
        match m {
            -1 => y,
            0 => z,
            _ => x,
        }
    };
    match (l1, l2) {
        (0, 0) => radial(s_or_h, SS_SIGMA, r),
        (0, 1) => cosine(m2) * radial(s_or_h, SP_SIGMA, r),
        (1, 0) => cosine(m1) * radial(s_or_h, PS_SIGMA, r),
        (1, 1) => {
            let (c1, c2) = (cosine(m1), cosine(m2));
            let pi: f64 = radial(s_or_h, PP_PI, r);
            let sigma: f64 = radial(s_or_h, PP_SIGMA, r);
            if m1 == m2 {
                (1.0 - c1 * c1) * pi + c1 * c1 * sigma
            } else {
                c1 * c2 * (sigma - pi)
            }
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use splines::{Interpolation, Key};

    fn constant_tables() -> HashMap<u8, Spline<f64, f64>> {
        let mut map: HashMap<u8, Spline<f64, f64>> = HashMap::new();
        for (key, value) in [
            (SS_SIGMA, 1.0),
            (SP_SIGMA, 2.0),
            (PS_SIGMA, -2.0),
            (PP_PI, 3.0),
            (PP_SIGMA, 5.0),
        ] {
            let keys: Vec<Key<f64, f64>> = (0..10)
                .map(|i| Key::new(i as f64, value, Interpolation::Linear))
                .collect();
            map.insert(key, Spline::from_vec(keys));
        }
        map
    }

    #[test]
    fn directional_cosines_of_axis_vector() {
        let (r, x, y, z) =
            directional_cosines(&Vector3::new(1.0, 1.0, 1.0), &Vector3::new(1.0, 1.0, 3.0));
        assert_abs_diff_eq!(r, 2.0, epsilon = 1e-14);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(z, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn p_orbitals_along_the_bond_axis() {
        let tables = constant_tables();
        // bond along z: p_z - p_z is a pure sigma bond, p_x - p_x a pure pi bond
        assert_abs_diff_eq!(
            slako_transformation(1.5, 0.0, 0.0, 1.0, &tables, 1, 0, 1, 0),
            5.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            slako_transformation(1.5, 0.0, 0.0, 1.0, &tables, 1, 1, 1, 1),
            3.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            slako_transformation(1.5, 0.0, 0.0, 1.0, &tables, 1, 1, 1, 0),
            0.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            slako_transformation(1.5, 0.0, 0.0, 1.0, &tables, 0, 0, 1, 0),
            2.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            slako_transformation(1.5, 0.0, 0.0, 1.0, &tables, 0, 0, 1, -1),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn matrix_elements_vanish_outside_grid() {
        let tables = constant_tables();
        assert_eq!(
            slako_transformation(20.0, 0.0, 0.0, 1.0, &tables, 0, 0, 0, 0),
            0.0
        );
    }
}
