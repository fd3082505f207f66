//! Piecewise functions of the beam coordinate built from Macaulay terms
//!
//! A [`Piecewise`] is a sorted list of breakpoints with one segment per
//! interval. Segment `0` covers `(-inf, b0)`, segment `k` covers
//! `[b(k-1), bk)` and the last segment extends to `+inf`, so evaluation is
//! right-continuous: `<x - a>^0` is already `1` at `x = a`.
//!
//! Each segment holds a polynomial in the local coordinate `t = x - anchor`
//! (the segment start, or `b0` for the first segment) plus optional numeric
//! kernel terms for load expressions that have no polynomial form.
//! Concentrated effects `c <x - a>^-1` are kept as impulses and turn into
//! steps on integration.

use std::ops::Add;
use std::sync::Arc;

use super::expression::LoadExpression;
use super::gauss_legendre;
use super::polynomial::Polynomial;

/// Repeated integral of a load expression measured from its start.
///
/// Order 0 is the expression itself; order `n >= 1` is
/// `1/(n-1)! * integral from origin to x of (x - t)^(n-1) f(t) dt`,
/// which is the n-fold antiderivative pinned to zero at `origin`.
#[derive(Debug)]
pub struct Kernel {
    expr: LoadExpression,
    origin: f64,
    panels: usize,
}

impl Kernel {
    pub fn new(expr: LoadExpression, origin: f64, panels: usize) -> Self {
        Self {
            expr,
            origin,
            panels: panels.max(1),
        }
    }

    pub fn value(&self, order: u32, x: f64) -> f64 {
        if order == 0 {
            return self.expr.eval(x);
        }
        if x <= self.origin {
            return 0.0;
        }
        let n = order - 1;
        let factorial: f64 = (1..=n).map(|k| k as f64).product();
        gauss_legendre(self.origin, x, self.panels, |t| {
            (x - t).powi(n as i32) * self.expr.eval(t)
        }) / factorial
    }
}

#[derive(Debug, Clone)]
struct KernelTerm {
    kernel: Arc<Kernel>,
    order: u32,
    scale: f64,
}

#[derive(Debug, Clone, Default)]
struct Segment {
    poly: Polynomial,
    kernels: Vec<KernelTerm>,
}

impl Segment {
    fn eval(&self, x: f64, anchor: f64) -> f64 {
        let mut v = self.poly.eval(x - anchor);
        for term in &self.kernels {
            v += term.scale * term.kernel.value(term.order, x);
        }
        v
    }

    fn reanchored(&self, from: f64, to: f64) -> Segment {
        Segment {
            poly: self.poly.shifted(to - from),
            kernels: self.kernels.clone(),
        }
    }

    fn sum(&self, other: &Segment) -> Segment {
        let mut kernels = self.kernels.clone();
        for term in &other.kernels {
            match kernels
                .iter_mut()
                .find(|k| Arc::ptr_eq(&k.kernel, &term.kernel) && k.order == term.order)
            {
                Some(existing) => existing.scale += term.scale,
                None => kernels.push(term.clone()),
            }
        }
        kernels.retain(|k| k.scale != 0.0);
        Segment {
            poly: &self.poly + &other.poly,
            kernels,
        }
    }

    fn scaled(&self, factor: f64) -> Segment {
        Segment {
            poly: self.poly.scaled(factor),
            kernels: self
                .kernels
                .iter()
                .filter(|_| factor != 0.0)
                .map(|k| KernelTerm {
                    kernel: Arc::clone(&k.kernel),
                    order: k.order,
                    scale: k.scale * factor,
                })
                .collect(),
        }
    }

    fn is_zero(&self) -> bool {
        self.poly.is_zero() && self.kernels.is_empty()
    }
}

/// Piecewise function of one real variable, closed under addition, scaling
/// and integration.
#[derive(Debug, Clone)]
pub struct Piecewise {
    breaks: Vec<f64>,
    segments: Vec<Segment>,
    /// Concentrated terms `(position, magnitude)`
    impulses: Vec<(f64, f64)>,
}

impl Default for Piecewise {
    fn default() -> Self {
        Self::zero()
    }
}

impl Piecewise {
    /// The zero function
    pub fn zero() -> Self {
        Self {
            breaks: Vec::new(),
            segments: vec![Segment::default()],
            impulses: Vec::new(),
        }
    }

    /// A single polynomial in global `x`, valid everywhere
    pub fn polynomial(poly: Polynomial) -> Self {
        Self {
            breaks: Vec::new(),
            segments: vec![Segment {
                poly,
                kernels: Vec::new(),
            }],
            impulses: Vec::new(),
        }
    }

    /// Singularity function `c <x - a>^n` for `n >= -1`
    pub fn macaulay(c: f64, a: f64, n: i32) -> Self {
        if n < 0 {
            return Self::impulse(c, a);
        }
        Self {
            breaks: vec![a],
            segments: vec![
                Segment::default(),
                Segment {
                    poly: Polynomial::monomial(c, n as usize),
                    kernels: Vec::new(),
                },
            ],
            impulses: Vec::new(),
        }
    }

    /// Concentrated term `c <x - a>^-1`
    pub fn impulse(c: f64, a: f64) -> Self {
        let mut f = Self::zero();
        if c != 0.0 {
            f.impulses.push((a, c));
        }
        f
    }

    /// Polynomial in global `x` on `[a, b)`, zero elsewhere
    pub fn span(poly: &Polynomial, a: f64, b: f64) -> Self {
        Self {
            breaks: vec![a, b],
            segments: vec![
                Segment::default(),
                Segment {
                    poly: poly.shifted(a),
                    kernels: Vec::new(),
                },
                Segment::default(),
            ],
            impulses: Vec::new(),
        }
    }

    /// Load expression on `[a, b)`, zero elsewhere.
    ///
    /// Polynomial expressions stay exact; others become a numeric kernel
    /// integrated with `panels` Gauss-Legendre panels.
    pub fn span_expression(expr: &LoadExpression, a: f64, b: f64, panels: usize) -> Self {
        if let Some(poly) = expr.polynomial() {
            return Self::span(poly, a, b);
        }
        let kernel = Arc::new(Kernel::new(expr.clone(), a, panels));
        Self {
            breaks: vec![a, b],
            segments: vec![
                Segment::default(),
                Segment {
                    poly: Polynomial::zero(),
                    kernels: vec![KernelTerm {
                        kernel,
                        order: 0,
                        scale: 1.0,
                    }],
                },
                Segment::default(),
            ],
            impulses: Vec::new(),
        }
    }

    /// Breakpoints in ascending order
    pub fn breakpoints(&self) -> &[f64] {
        &self.breaks
    }

    pub fn is_zero(&self) -> bool {
        self.impulses.is_empty() && self.segments.iter().all(Segment::is_zero)
    }

    fn anchor(&self, k: usize) -> f64 {
        anchor_of(&self.breaks, k)
    }

    fn segment_index(&self, x: f64) -> usize {
        self.breaks.partition_point(|b| *b <= x)
    }

    /// Segment `k` of `breaks`, taken from this function and re-anchored.
    /// `breaks` must contain every breakpoint of `self`.
    fn segment_on(&self, breaks: &[f64], k: usize) -> Segment {
        let start = if k == 0 { f64::NEG_INFINITY } else { breaks[k - 1] };
        let own = if k == 0 { 0 } else { self.segment_index(start) };
        self.segments[own].reanchored(self.anchor(own), anchor_of(breaks, k))
    }

    /// Copy of this function with extra breakpoints inserted
    fn refined(&self, extra: &[f64]) -> Piecewise {
        let breaks = merge_breaks(&self.breaks, extra);
        if breaks.len() == self.breaks.len() {
            return self.clone();
        }
        let segments = (0..=breaks.len())
            .map(|k| self.segment_on(&breaks, k))
            .collect();
        Piecewise {
            breaks,
            segments,
            impulses: self.impulses.clone(),
        }
    }

    /// Evaluate at `x`. Impulses contribute nothing to point values.
    pub fn eval(&self, x: f64) -> f64 {
        let k = self.segment_index(x);
        self.segments[k].eval(x, self.anchor(k))
    }

    /// Limit from the left at `x`
    pub fn eval_left(&self, x: f64) -> f64 {
        let k = self.breaks.partition_point(|b| *b < x);
        self.segments[k].eval(x, self.anchor(k))
    }

    /// Antiderivative that is zero left of the first breakpoint and
    /// continuous everywhere except at impulses, which become steps.
    pub fn integrate(&self) -> Piecewise {
        let positions: Vec<f64> = self.impulses.iter().map(|(a, _)| *a).collect();
        let src = self.refined(&positions);

        let mut segments: Vec<Segment> = Vec::with_capacity(src.segments.len());
        for (k, seg) in src.segments.iter().enumerate() {
            let anchor = src.anchor(k);
            let mut start_value = 0.0;
            if k > 0 {
                let prev = &segments[k - 1];
                start_value = prev.eval(anchor, src.anchor(k - 1));
                start_value += src
                    .impulses
                    .iter()
                    .filter(|(a, _)| *a == anchor)
                    .map(|(_, c)| c)
                    .sum::<f64>();
            }

            let mut kernels = Vec::with_capacity(seg.kernels.len());
            for term in &seg.kernels {
                start_value -= term.scale * term.kernel.value(term.order + 1, anchor);
                kernels.push(KernelTerm {
                    kernel: Arc::clone(&term.kernel),
                    order: term.order + 1,
                    scale: term.scale,
                });
            }
            let poly = &seg.poly.integrate() + &Polynomial::constant(start_value);
            segments.push(Segment { poly, kernels });
        }

        Piecewise {
            breaks: src.breaks,
            segments,
            impulses: Vec::new(),
        }
    }

    pub fn scaled(&self, factor: f64) -> Piecewise {
        Piecewise {
            breaks: self.breaks.clone(),
            segments: self.segments.iter().map(|s| s.scaled(factor)).collect(),
            impulses: self
                .impulses
                .iter()
                .filter(|_| factor != 0.0)
                .map(|(a, c)| (*a, c * factor))
                .collect(),
        }
    }

    /// Integral of `f(x) * x` over the bounded segments plus impulse moments
    pub fn first_moment(&self) -> f64 {
        self.bounded_integral(|x| x, |poly, anchor| poly.times_linear(anchor))
            + self.impulses.iter().map(|(a, c)| a * c).sum::<f64>()
    }

    /// Integral of `f(x)` over the bounded segments plus impulse magnitudes
    pub fn total(&self) -> f64 {
        self.bounded_integral(|_| 1.0, |poly, _| poly.clone())
            + self.impulses.iter().map(|(_, c)| c).sum::<f64>()
    }

    fn bounded_integral(
        &self,
        weight: impl Fn(f64) -> f64,
        weighted_poly: impl Fn(&Polynomial, f64) -> Polynomial,
    ) -> f64 {
        let mut total = 0.0;
        for k in 1..self.breaks.len() {
            let (start, end) = (self.breaks[k - 1], self.breaks[k]);
            let seg = &self.segments[k];
            total += weighted_poly(&seg.poly, start).definite_integral(end - start);
            for term in &seg.kernels {
                total += term.scale
                    * gauss_legendre(start, end, term.kernel.panels, |x| {
                        term.kernel.value(term.order, x) * weight(x)
                    });
            }
        }
        total
    }

    /// Uniform grid of `n` points over `[start, end]`, evaluated in one sweep
    pub fn sample(&self, start: f64, end: f64, n: usize) -> Vec<(f64, f64)> {
        let n = n.max(2);
        let step = (end - start) / (n - 1) as f64;
        let mut k = 0;
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let x = if i == n - 1 { end } else { start + step * i as f64 };
            while k < self.breaks.len() && self.breaks[k] <= x {
                k += 1;
            }
            out.push((x, self.segments[k].eval(x, self.anchor(k))));
        }
        out
    }

    /// Minimum and maximum over `[start, end]`, scanning a grid of `n`
    /// points plus both sides of every interior breakpoint.
    pub fn extrema(&self, start: f64, end: f64, n: usize) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut visit = |v: f64| {
            min = min.min(v);
            max = max.max(v);
        };
        for (_, v) in self.sample(start, end, n) {
            visit(v);
        }
        for &b in self.breaks.iter().filter(|b| **b >= start && **b <= end) {
            visit(self.eval(b));
            if b > start {
                visit(self.eval_left(b));
            }
        }
        (min, max)
    }
}

fn anchor_of(breaks: &[f64], k: usize) -> f64 {
    match k {
        0 => breaks.first().copied().unwrap_or(0.0),
        _ => breaks[k - 1],
    }
}

fn merge_breaks(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    out.sort_by(|x, y| x.total_cmp(y));
    out.dedup();
    out
}

impl Add for &Piecewise {
    type Output = Piecewise;

    fn add(self, rhs: &Piecewise) -> Piecewise {
        let breaks = merge_breaks(&self.breaks, &rhs.breaks);
        let segments = (0..=breaks.len())
            .map(|k| self.segment_on(&breaks, k).sum(&rhs.segment_on(&breaks, k)))
            .collect();
        let mut impulses = self.impulses.clone();
        for &(a, c) in &rhs.impulses {
            match impulses.iter_mut().find(|(p, _)| *p == a) {
                Some(existing) => existing.1 += c,
                None => impulses.push((a, c)),
            }
        }
        impulses.retain(|(_, c)| *c != 0.0);
        Piecewise {
            breaks,
            segments,
            impulses,
        }
    }
}

impl Add for Piecewise {
    type Output = Piecewise;

    fn add(self, rhs: Piecewise) -> Piecewise {
        &self + &rhs
    }
}

impl std::iter::Sum for Piecewise {
    fn sum<I: Iterator<Item = Piecewise>>(iter: I) -> Piecewise {
        iter.fold(Piecewise::zero(), |acc, f| &acc + &f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_macaulay_is_right_continuous() {
        let step = Piecewise::macaulay(2.0, 1.5, 0);
        assert_eq!(step.eval(1.0), 0.0);
        assert_eq!(step.eval(1.5), 2.0);
        assert_eq!(step.eval_left(1.5), 0.0);

        let ramp = Piecewise::macaulay(3.0, 1.0, 1);
        assert_relative_eq!(ramp.eval(3.0), 6.0);
        assert_eq!(ramp.eval(0.5), 0.0);
    }

    #[test]
    fn test_impulse_integrates_to_step() {
        let point = Piecewise::impulse(-10.0, 2.5);
        assert_eq!(point.eval(2.5), 0.0);
        let shear = point.integrate();
        assert_eq!(shear.eval(2.0), 0.0);
        assert_eq!(shear.eval(2.5), -10.0);
        assert_eq!(shear.eval(4.0), -10.0);
        let moment = shear.integrate();
        assert_relative_eq!(moment.eval(4.5), -20.0, epsilon = 1e-12);
    }

    #[test]
    fn test_span_integral_held_beyond_end() {
        // Uniform 2.0 on [1, 4): the first integral is 0 before 1,
        // ramps to 6 at 4 and stays there.
        let w = Piecewise::span(&Polynomial::constant(2.0), 1.0, 4.0);
        let v = w.integrate();
        assert_eq!(v.eval(0.5), 0.0);
        assert_relative_eq!(v.eval(2.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(v.eval(4.0), 6.0, epsilon = 1e-12);
        assert_relative_eq!(v.eval(9.0), 6.0, epsilon = 1e-12);

        // Second integral continues linearly past the span
        let m = v.integrate();
        assert_relative_eq!(m.eval(4.0), 9.0, epsilon = 1e-12);
        assert_relative_eq!(m.eval(6.0), 21.0, epsilon = 1e-12);
    }

    #[test]
    fn test_superposition_and_scaling() {
        let a = Piecewise::macaulay(1.0, 1.0, 1);
        let b = Piecewise::macaulay(-2.0, 3.0, 0);
        let sum = &a + &b;
        for x in [0.0, 1.0, 2.0, 3.0, 5.0] {
            assert_relative_eq!(sum.eval(x), a.eval(x) + b.eval(x), epsilon = 1e-12);
        }
        let scaled = sum.scaled(-0.5);
        assert_relative_eq!(scaled.eval(5.0), -0.5 * (4.0 - 2.0), epsilon = 1e-12);
        assert_eq!(sum.breakpoints(), &[1.0, 3.0]);
    }

    #[test]
    fn test_first_moment_and_total() {
        // Triangle 0 -> 3 over [0, 3]: total 4.5, centroid at 2
        let w = Piecewise::span(&Polynomial::new(vec![0.0, 1.0]), 0.0, 3.0);
        assert_relative_eq!(w.total(), 4.5, epsilon = 1e-12);
        assert_relative_eq!(w.first_moment(), 9.0, epsilon = 1e-12);

        let p = Piecewise::impulse(5.0, 2.0);
        assert_relative_eq!(p.first_moment(), 10.0);
        assert_relative_eq!(p.total(), 5.0);
    }

    #[test]
    fn test_kernel_matches_polynomial_integration() {
        // sin has no polynomial form, so this exercises the numeric kernel
        let expr = LoadExpression::parse("sin(x)").unwrap();
        let w = Piecewise::span_expression(&expr, 0.0, std::f64::consts::PI, 16);
        assert_relative_eq!(w.total(), 2.0, epsilon = 1e-9);

        let v = w.integrate();
        assert_relative_eq!(v.eval(1.0), 1.0 - 1.0_f64.cos(), epsilon = 1e-9);
        assert_relative_eq!(v.eval(5.0), 2.0, epsilon = 1e-9);

        // Second integral: x - sin(x) on the span, linear afterwards
        let m = v.integrate();
        assert_relative_eq!(m.eval(2.0), 2.0 - 2.0_f64.sin(), epsilon = 1e-9);
        let pi = std::f64::consts::PI;
        assert_relative_eq!(m.eval(4.0), pi + 2.0 * (4.0 - pi), epsilon = 1e-9);
    }

    #[test]
    fn test_sample_and_extrema() {
        let f = Piecewise::macaulay(1.0, 0.0, 1) + Piecewise::macaulay(-2.0, 2.5, 1);
        let samples = f.sample(0.0, 5.0, 11);
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0].0, 0.0);
        assert_eq!(samples[10].0, 5.0);
        // Peak at the breakpoint even though 2.5 is on the grid anyway
        let (min, max) = f.extrema(0.0, 5.0, 1000);
        assert_relative_eq!(max, 2.5, epsilon = 1e-12);
        assert_relative_eq!(min, 0.0, epsilon = 1e-12);
    }
}
