//! Dense univariate polynomials in a local coordinate

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg};

/// Polynomial with coefficients in ascending powers: `c[0] + c[1] t + c[2] t^2 + ...`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Create from ascending coefficients
    pub fn new(coeffs: Vec<f64>) -> Self {
        let mut p = Self { coeffs };
        p.trim();
        p
    }

    /// The zero polynomial
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Constant polynomial
    pub fn constant(c: f64) -> Self {
        Self::new(vec![c])
    }

    /// Single term `c t^n`
    pub fn monomial(c: f64, n: usize) -> Self {
        let mut coeffs = vec![0.0; n + 1];
        coeffs[n] = c;
        Self::new(coeffs)
    }

    /// Ascending coefficients
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// Degree, `None` for the zero polynomial
    pub fn degree(&self) -> Option<usize> {
        if self.coeffs.is_empty() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    fn trim(&mut self) {
        while matches!(self.coeffs.last(), Some(c) if *c == 0.0) {
            self.coeffs.pop();
        }
    }

    /// Evaluate with Horner's scheme
    pub fn eval(&self, t: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
    }

    /// Antiderivative with zero constant term
    pub fn integrate(&self) -> Self {
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + 1);
        coeffs.push(0.0);
        for (k, &c) in self.coeffs.iter().enumerate() {
            coeffs.push(c / (k as f64 + 1.0));
        }
        Self::new(coeffs)
    }

    pub fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, &c)| c * k as f64)
            .collect();
        Self::new(coeffs)
    }

    /// Re-express about a new origin: returns `q` with `q(s) = p(s + d)`
    pub fn shifted(&self, d: f64) -> Self {
        if d == 0.0 || self.coeffs.len() < 2 {
            return self.clone();
        }
        // Repeated synthetic division (Taylor shift)
        let mut c = self.coeffs.clone();
        let n = c.len();
        for i in 0..n {
            for j in (i..n - 1).rev() {
                c[j] += d * c[j + 1];
            }
        }
        Self::new(c)
    }

    /// Multiply by `(t + d)`
    pub fn times_linear(&self, d: f64) -> Self {
        let mut coeffs = vec![0.0; self.coeffs.len() + 1];
        for (k, &c) in self.coeffs.iter().enumerate() {
            coeffs[k] += c * d;
            coeffs[k + 1] += c;
        }
        Self::new(coeffs)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.coeffs.iter().map(|c| c * factor).collect())
    }

    /// Product of two polynomials
    pub fn product(&self, other: &Polynomial) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut coeffs = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Self::new(coeffs)
    }

    /// Definite integral over `[0, length]`
    pub fn definite_integral(&self, length: f64) -> f64 {
        self.integrate().eval(length)
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let coeffs = (0..n)
            .map(|k| self.coeffs.get(k).copied().unwrap_or(0.0) + rhs.coeffs.get(k).copied().unwrap_or(0.0))
            .collect();
        Polynomial::new(coeffs)
    }
}

impl Mul<f64> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: f64) -> Polynomial {
        self.scaled(rhs)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scaled(-1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_eval_and_integrate() {
        // 5 + 2t
        let p = Polynomial::new(vec![5.0, 2.0]);
        assert_relative_eq!(p.eval(2.0), 9.0);
        let ip = p.integrate();
        assert_eq!(ip.coeffs(), &[0.0, 5.0, 1.0]);
        assert_relative_eq!(p.definite_integral(2.0), 14.0);
        assert_eq!(ip.derivative(), p);
    }

    #[test]
    fn test_shift() {
        // p(t) = t^2, q(s) = (s + 3)^2 = s^2 + 6s + 9
        let p = Polynomial::monomial(1.0, 2);
        let q = p.shifted(3.0);
        assert_eq!(q.coeffs(), &[9.0, 6.0, 1.0]);
        for s in [-1.0, 0.0, 0.5, 4.0] {
            assert_relative_eq!(q.eval(s), p.eval(s + 3.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_trailing_zeros_trimmed() {
        let p = Polynomial::new(vec![1.0, 0.0, 0.0]);
        assert_eq!(p.degree(), Some(0));
        let zero = &p + &Polynomial::constant(-1.0);
        assert!(zero.is_zero());
        assert_eq!(zero.degree(), None);
    }

    #[test]
    fn test_product_and_linear_factor() {
        let p = Polynomial::new(vec![1.0, 1.0]);
        assert_eq!(p.product(&p).coeffs(), &[1.0, 2.0, 1.0]);
        assert_eq!(p.times_linear(2.0).coeffs(), &[2.0, 3.0, 1.0]);
    }
}
