// 📐 Ordinary Least Squares - Classical (homoskedastic) inference
//
// β = (X'X)⁻¹ X'y, Var(β) = σ² (X'X)⁻¹ with σ² = SSR / (n - k).
// The routine reports; it does not judge. A singular fit is returned as an
// error to the caller unchanged.

use crate::error::OlsError;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

pub const INTERCEPT: &str = "const";

/// One row of the coefficient table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub term: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    pub coefficients: Vec<Coefficient>,
    pub nobs: usize,
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub durbin_watson: f64,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
}

impl OlsFit {
    /// Coefficient by term name
    pub fn param(&self, term: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.term == term)
    }
}

/// Fit `y` on the named regressors, optionally with an intercept column first.
pub fn fit(
    y: &[f64],
    regressors: &[(&str, Vec<f64>)],
    with_intercept: bool,
) -> Result<OlsFit, OlsError> {
    let n = y.len();
    for (_, column) in regressors {
        if column.len() != n {
            return Err(OlsError::DimensionMismatch {
                rows: column.len(),
                len: n,
            });
        }
    }

    let mut terms: Vec<String> = Vec::with_capacity(regressors.len() + 1);
    if with_intercept {
        terms.push(INTERCEPT.to_string());
    }
    terms.extend(regressors.iter().map(|(name, _)| name.to_string()));

    let k = terms.len();
    if n <= k {
        return Err(OlsError::InsufficientObservations {
            observations: n,
            parameters: k,
        });
    }

    let offset = usize::from(with_intercept);
    let x = DMatrix::from_fn(n, k, |row, col| {
        if with_intercept && col == 0 {
            1.0
        } else {
            regressors[col - offset].1[row]
        }
    });
    let y = DVector::from_column_slice(y);

    let xtx_inv = (x.transpose() * &x).try_inverse().ok_or(OlsError::Singular)?;
    let beta = &xtx_inv * (x.transpose() * &y);

    let fitted = &x * &beta;
    let residuals = &y - &fitted;

    let nf = n as f64;
    let df_resid = n - k;
    let df_model = k - offset;
    let ssr = residuals.dot(&residuals);
    let sigma2 = ssr / df_resid as f64;

    // Centered TSS with an intercept, uncentered without
    let tss = if with_intercept {
        let mean = y.mean();
        y.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
    } else {
        y.dot(&y)
    };

    let r_squared = 1.0 - ssr / tss;
    let adj_r_squared = if with_intercept {
        1.0 - (nf - 1.0) / df_resid as f64 * (1.0 - r_squared)
    } else {
        1.0 - nf / df_resid as f64 * (1.0 - r_squared)
    };

    let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
        .map_err(|e| OlsError::Distribution(e.to_string()))?;
    let t_crit = t_dist.inverse_cdf(0.975);

    let coefficients = terms
        .into_iter()
        .enumerate()
        .map(|(j, term)| {
            let coefficient = beta[j];
            let std_error = (sigma2 * xtx_inv[(j, j)]).sqrt();
            let t_statistic = coefficient / std_error;
            Coefficient {
                term,
                coefficient,
                std_error,
                t_statistic,
                p_value: 2.0 * t_dist.sf(t_statistic.abs()),
                ci_lower: coefficient - t_crit * std_error,
                ci_upper: coefficient + t_crit * std_error,
            }
        })
        .collect();

    let (f_statistic, f_p_value) = if df_model > 0 {
        let ess = tss - ssr;
        let f = (ess / df_model as f64) / sigma2;
        let f_dist = FisherSnedecor::new(df_model as f64, df_resid as f64)
            .map_err(|e| OlsError::Distribution(e.to_string()))?;
        (f, f_dist.sf(f))
    } else {
        (f64::NAN, f64::NAN)
    };

    let log_likelihood =
        -nf / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ssr / nf).ln() + 1.0);
    let aic = -2.0 * log_likelihood + 2.0 * k as f64;
    let bic = -2.0 * log_likelihood + nf.ln() * k as f64;

    let durbin_watson = residuals
        .as_slice()
        .windows(2)
        .map(|w| (w[1] - w[0]).powi(2))
        .sum::<f64>()
        / ssr;

    Ok(OlsFit {
        coefficients,
        nobs: n,
        df_model,
        df_resid,
        r_squared,
        adj_r_squared,
        f_statistic,
        f_p_value,
        log_likelihood,
        aic,
        bic,
        durbin_watson,
        fitted: fitted.iter().copied().collect(),
        residuals: residuals.iter().copied().collect(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
