//! Natural cubic spline interpolation (zero second derivative at both ends).

use thiserror::Error;

/// Interpolating cubic spline with natural boundary conditions.
///
/// Evaluation outside `[x_0, x_{n-1}]` returns `None`; the spline never extrapolates.
#[derive(Clone, Debug)]
pub struct NaturalCubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    m: Vec<f64>, // second derivatives at nodes
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplineError {
    #[error("x and y must have the same length >= 2")]
    LengthMismatch,
    #[error("x must be strictly increasing")]
    NonIncreasingX,
    #[error("x and y must be finite")]
    NonFiniteInput,
}

impl NaturalCubicSpline {
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self, SplineError> {
        let n = x.len();
        if n < 2 || y.len() != n {
            return Err(SplineError::LengthMismatch);
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(SplineError::NonFiniteInput);
        }
        if x.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SplineError::NonIncreasingX);
        }

        let mut m = vec![0.0; n];
        if n > 2 {
            // Thomas algorithm on the interior nodes 1..n-1
            let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
            let interior = n - 2;
            let mut diag = vec![0.0; interior];
            let mut upper = vec![0.0; interior];
            let mut rhs = vec![0.0; interior];
            for i in 0..interior {
                let (h0, h1) = (h[i], h[i + 1]);
                diag[i] = 2.0 * (h0 + h1);
                upper[i] = h1;
                rhs[i] = 6.0 * ((y[i + 2] - y[i + 1]) / h1 - (y[i + 1] - y[i]) / h0);
            }
            for i in 1..interior {
                let lower = h[i];
                let w = lower / diag[i - 1];
                diag[i] -= w * upper[i - 1];
                rhs[i] -= w * rhs[i - 1];
            }
            m[interior] = rhs[interior - 1] / diag[interior - 1];
            for i in (0..interior - 1).rev() {
                m[i + 1] = (rhs[i] - upper[i] * m[i + 2]) / diag[i];
            }
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn evaluate(&self, xq: f64) -> Option<f64> {
        let (lo, hi) = self.domain();
        if !xq.is_finite() || xq < lo || xq > hi {
            return None;
        }
        let i = match self.x.partition_point(|&v| v <= xq) {
            0 => 0,
            p => (p - 1).min(self.x.len() - 2),
        };
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - xq) / h;
        let b = (xq - self.x[i]) / h;
        Some(
            a * self.y[i]
                + b * self.y[i + 1]
                + ((a * a * a - a) * self.m[i] + (b * b * b - b) * self.m[i + 1]) * h * h / 6.0,
        )
    }
}
