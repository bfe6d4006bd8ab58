//! Small dense linear-algebra helpers over row-major `Vec<f64>` matrices.
//!
//! Dimensions here are context widths (typically < 100), so plain loops are
//! fine.  The mean update never materialises `B^{-1}`: it solves `B x = f`
//! through a Cholesky factor instead.

pub(crate) fn identity(dim: usize) -> Vec<f64> {
    let mut m = vec![0.0; dim * dim];
    for i in 0..dim {
        m[i * dim + i] = 1.0;
    }
    m
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    let mut s = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        s += x * y;
    }
    s
}

#[cfg(test)]
pub(crate) fn mat_vec(a: &[f64], dim: usize, x: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; dim];
    for i in 0..dim {
        let row = &a[i * dim..(i + 1) * dim];
        out[i] = dot(row, x);
    }
    out
}

/// `a <- a + x x^T`.
pub(crate) fn add_outer(a: &mut [f64], dim: usize, x: &[f64]) {
    for i in 0..dim {
        for j in 0..dim {
            a[i * dim + j] += x[i] * x[j];
        }
    }
}

/// Lower-triangular Cholesky factor `L` with `a = L L^T`.
///
/// Returns `None` if `a` is not (numerically) symmetric positive-definite.
pub(crate) fn cholesky(a: &[f64], dim: usize) -> Option<Vec<f64>> {
    let mut l = vec![0.0; dim * dim];
    for j in 0..dim {
        let mut diag = a[j * dim + j];
        for k in 0..j {
            diag -= l[j * dim + k] * l[j * dim + k];
        }
        if !diag.is_finite() || diag <= 0.0 {
            return None;
        }
        let ljj = diag.sqrt();
        l[j * dim + j] = ljj;
        for i in (j + 1)..dim {
            let mut s = a[i * dim + j];
            for k in 0..j {
                s -= l[i * dim + k] * l[j * dim + k];
            }
            l[i * dim + j] = s / ljj;
        }
    }
    Some(l)
}

/// Forward substitution: solve `L y = b`.
pub(crate) fn solve_lower(l: &[f64], dim: usize, b: &[f64]) -> Vec<f64> {
    let mut y = vec![0.0; dim];
    for i in 0..dim {
        let mut s = b[i];
        for k in 0..i {
            s -= l[i * dim + k] * y[k];
        }
        y[i] = s / l[i * dim + i];
    }
    y
}

/// Back substitution: solve `L^T x = y`.
pub(crate) fn solve_lower_transpose(l: &[f64], dim: usize, y: &[f64]) -> Vec<f64> {
    let mut x = vec![0.0; dim];
    for i in (0..dim).rev() {
        let mut s = y[i];
        for k in (i + 1)..dim {
            // (L^T)[i][k] = L[k][i]
            s -= l[k * dim + i] * x[k];
        }
        x[i] = s / l[i * dim + i];
    }
    x
}

/// Solve `a x = b` for symmetric positive-definite `a`.
pub(crate) fn spd_solve(a: &[f64], dim: usize, b: &[f64]) -> Option<Vec<f64>> {
    let l = cholesky(a, dim)?;
    let y = solve_lower(&l, dim, b);
    let x = solve_lower_transpose(&l, dim, &y);
    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}
