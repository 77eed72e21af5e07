/// Brent's method: find the root of `func` known to lie between `x1` and `x2`.
/// The root is refined until its accuracy is `tol`. `None` is returned if the
/// root is not bracketed by the interval.
///
/// Numerical Recipes in C: The Art of Scientific Computing. W. H. Press,
/// S. A. Teukolsky, W. T. Vetterling, B. P. Flannery. Cambridge University Press 1992
pub fn zbrent<F: Fn(f64) -> f64>(
    func: F,
    x1: f64,
    x2: f64,
    tol: f64,
    maxiter: usize,
) -> Option<f64> {
    let eps: f64 = f64::EPSILON.sqrt();
    let (mut a, mut b, mut c) = (x1, x2, x2);
    let (mut d, mut e): (f64, f64) = (0.0, 0.0);
    let mut fa: f64 = func(a);
    let mut fb: f64 = func(b);

    if (fa > 0.0 && fb > 0.0) || (fa < 0.0 && fb < 0.0) {
        return None;
    }
    let mut fc: f64 = fb;
    for _ in 0..maxiter {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            // rename a, b, c and adjust the bounding interval d
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol1: f64 = 2.0 * eps * b.abs() + 0.5 * tol;
        let xm: f64 = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Some(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // inverse quadratic interpolation
            let s: f64 = fb / fa;
            let (mut p, mut q): (f64, f64) = if (a - c).abs() < eps {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q: f64 = fa / fc;
                let r: f64 = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1: f64 = 3.0 * xm * q - (tol1 * q).abs();
            let min2: f64 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            // bisection
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol1 {
            d
        } else {
            tol1.copysign(xm)
        };
        fb = func(b);
    }
    Some(b)
}

#[cfg(test)]
mod tests {
    use super::zbrent;

    #[test]
    fn roots_of_test_functions() {
        let t: f64 = 10.0 * f64::EPSILON.sqrt();

        let f_01 = |x: f64| x.sin() - 0.5 * x;
        let x: f64 = zbrent(f_01, 1.0, 2.0, t, 100).unwrap();
        assert!((x - 1.895494267034).abs() < 1e-6);

        let f_02 = |x: f64| 2.0 * x - (-x).exp();
        let x: f64 = zbrent(f_02, 0.0, 1.0, t, 100).unwrap();
        assert!((x - 0.351733711249).abs() < 1e-6);

        let f_05 = |x: f64| (x + 3.0) * (x - 1.0) * (x - 1.0);
        let x: f64 = zbrent(f_05, -5.0, 2.0, t, 100).unwrap();
        assert!((x + 3.0).abs() < 1e-6);
    }

    #[test]
    fn unbracketed_root_is_rejected() {
        assert!(zbrent(|x: f64| x * x + 1.0, -1.0, 1.0, 1e-8, 100).is_none());
    }
}
