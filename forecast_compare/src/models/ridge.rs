//! Penalised least squares via the normal equations

use crate::error::{ForecastError, Result};

/// Solve `(XᵀX + diag(penalties)) β = Xᵀy` for β.
///
/// `x` is row-major with one penalty per column. The system is solved by
/// Cholesky decomposition, so it must be positive definite.
pub(crate) fn ridge_solve(x: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    let p = penalties.len();
    if x.len() != y.len() {
        return Err(ForecastError::FitError(format!(
            "Design rows ({}) doesn't match targets ({})",
            x.len(),
            y.len()
        )));
    }
    if let Some(row) = x.iter().find(|row| row.len() != p) {
        return Err(ForecastError::FitError(format!(
            "Design row has {} columns, expected {}",
            row.len(),
            p
        )));
    }

    // Normal equations
    let mut a = vec![vec![0.0; p]; p];
    let mut b = vec![0.0; p];
    for (row, &target) in x.iter().zip(y) {
        for i in 0..p {
            b[i] += row[i] * target;
            for j in 0..=i {
                a[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..p {
        a[i][i] += penalties[i];
    }

    // Lower-triangular factor, in place
    for j in 0..p {
        let mut diag = a[j][j];
        for k in 0..j {
            diag -= a[j][k] * a[j][k];
        }
        if !(diag > 0.0) || !diag.is_finite() {
            return Err(ForecastError::FitError(
                "Regression system is not positive definite".to_string(),
            ));
        }
        let diag = diag.sqrt();
        a[j][j] = diag;
        for i in j + 1..p {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= a[i][k] * a[j][k];
            }
            a[i][j] = sum / diag;
        }
    }

    // Forward then backward substitution
    let mut z = vec![0.0; p];
    for i in 0..p {
        let mut sum = b[i];
        for k in 0..i {
            sum -= a[i][k] * z[k];
        }
        z[i] = sum / a[i][i];
    }
    let mut beta = vec![0.0; p];
    for i in (0..p).rev() {
        let mut sum = z[i];
        for k in i + 1..p {
            sum -= a[k][i] * beta[k];
        }
        beta[i] = sum / a[i][i];
    }

    Ok(beta)
}

/// Dot product of a design row with coefficients
pub(crate) fn dot(row: &[f64], coef: &[f64]) -> f64 {
    row.iter().zip(coef).map(|(a, b)| a * b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_recovers_linear_fit() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![1.0, i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| 3.0 + 2.0 * i as f64).collect();
        let beta = ridge_solve(&x, &y, &[1e-10, 1e-10]).unwrap();
        assert_relative_eq!(beta[0], 3.0, epsilon = 1e-6);
        assert_relative_eq!(beta[1], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_penalty_shrinks_coefficient() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let loose = ridge_solve(&x, &y, &[1e-10]).unwrap();
        let tight = ridge_solve(&x, &y, &[1000.0]).unwrap();
        assert!(tight[0].abs() < loose[0].abs());
    }

    #[test]
    fn test_singular_system_fails() {
        let x = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        let y = vec![1.0, 2.0];
        assert!(ridge_solve(&x, &y, &[0.0, 0.0]).is_err());
    }
}
