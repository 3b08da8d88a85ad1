//! An immutable random variable realized across simulation paths.
//!
//! A [`RandomVariable`] represents one scalar quantity observed at a fixed
//! time, either deterministic (a single value common to all paths) or
//! pathwise (one value per path).  Every operation returns a new value;
//! nothing is ever mutated in place, so instances can be shared freely
//! across threads.

use irmc_core::{Real, Time};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Values {
    /// A deterministic value, identical on every path.
    Constant(Real),
    /// One realization per path.  Shared, never mutated.
    Paths(Arc<[Real]>),
}

/// A scalar quantity realized independently across all simulation paths at a
/// fixed observation time.
#[derive(Debug, Clone)]
pub struct RandomVariable {
    time: Time,
    values: Values,
}

impl RandomVariable {
    // ── Construction ─────────────────────────────────────────────────────

    /// A deterministic value, measurable at any time.
    pub fn constant(value: Real) -> Self {
        Self {
            time: Time::NEG_INFINITY,
            values: Values::Constant(value),
        }
    }

    /// A deterministic value observed at `time`.
    pub fn constant_at(time: Time, value: Real) -> Self {
        Self {
            time,
            values: Values::Constant(value),
        }
    }

    /// A pathwise realization observed at `time`.
    pub fn from_vec(time: Time, values: Vec<Real>) -> Self {
        Self {
            time,
            values: Values::Paths(values.into()),
        }
    }

    // ── Inspection ───────────────────────────────────────────────────────

    /// The time this quantity is observed at.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Whether the value is deterministic (path-independent).
    pub fn is_deterministic(&self) -> bool {
        matches!(self.values, Values::Constant(_))
    }

    /// The number of paths, or `None` for a deterministic value.
    pub fn path_count(&self) -> Option<usize> {
        match &self.values {
            Values::Constant(_) => None,
            Values::Paths(v) => Some(v.len()),
        }
    }

    /// The realization on path `i` (a deterministic value broadcasts).
    pub fn get(&self, i: usize) -> Real {
        match &self.values {
            Values::Constant(c) => *c,
            Values::Paths(v) => v[i],
        }
    }

    // ── Elementwise maps ─────────────────────────────────────────────────

    fn map(&self, f: impl Fn(Real) -> Real) -> Self {
        match &self.values {
            Values::Constant(c) => Self {
                time: self.time,
                values: Values::Constant(f(*c)),
            },
            Values::Paths(v) => Self {
                time: self.time,
                values: Values::Paths(v.iter().map(|&x| f(x)).collect()),
            },
        }
    }

    fn zip(&self, other: &Self, f: impl Fn(Real, Real) -> Real) -> Self {
        let time = self.time.max(other.time);
        match (&self.values, &other.values) {
            (Values::Constant(a), Values::Constant(b)) => Self {
                time,
                values: Values::Constant(f(*a, *b)),
            },
            (Values::Constant(a), Values::Paths(b)) => Self {
                time,
                values: Values::Paths(b.iter().map(|&y| f(*a, y)).collect()),
            },
            (Values::Paths(a), Values::Constant(b)) => Self {
                time,
                values: Values::Paths(a.iter().map(|&x| f(x, *b)).collect()),
            },
            (Values::Paths(a), Values::Paths(b)) => {
                assert_eq!(
                    a.len(),
                    b.len(),
                    "path count mismatch: {} vs {}",
                    a.len(),
                    b.len()
                );
                Self {
                    time,
                    values: Values::Paths(
                        a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect(),
                    ),
                }
            }
        }
    }

    // ── Arithmetic ───────────────────────────────────────────────────────

    /// Elementwise sum.
    pub fn add(&self, other: &Self) -> Self {
        self.zip(other, |x, y| x + y)
    }

    /// Elementwise difference.
    pub fn sub(&self, other: &Self) -> Self {
        self.zip(other, |x, y| x - y)
    }

    /// Elementwise product.
    pub fn mult(&self, other: &Self) -> Self {
        self.zip(other, |x, y| x * y)
    }

    /// Elementwise quotient.
    pub fn div(&self, other: &Self) -> Self {
        self.zip(other, |x, y| x / y)
    }

    /// Add a scalar on every path.
    pub fn add_scalar(&self, x: Real) -> Self {
        self.map(|v| v + x)
    }

    /// Subtract a scalar on every path.
    pub fn sub_scalar(&self, x: Real) -> Self {
        self.map(|v| v - x)
    }

    /// Scale by a scalar on every path.
    pub fn mult_scalar(&self, x: Real) -> Self {
        self.map(|v| v * x)
    }

    /// Divide by a scalar on every path.
    pub fn div_scalar(&self, x: Real) -> Self {
        self.map(|v| v / x)
    }

    /// `self + factor * scale`, elementwise.
    pub fn add_product(&self, factor: &Self, scale: Real) -> Self {
        self.zip(factor, |x, y| x + y * scale)
    }

    /// Elementwise exponential.
    pub fn exp(&self) -> Self {
        self.map(Real::exp)
    }

    /// Elementwise reciprocal.
    pub fn invert(&self) -> Self {
        self.map(|v| 1.0 / v)
    }

    /// Elementwise power.
    pub fn pow(&self, exponent: Real) -> Self {
        self.map(|v| v.powf(exponent))
    }

    /// Per-path ternary selection keyed on the sign of `self`:
    /// `if_nonnegative` wherever `self >= 0`, `if_negative` otherwise.
    pub fn choose(&self, if_nonnegative: &Self, if_negative: &Self) -> Self {
        let time = self
            .time
            .max(if_nonnegative.time)
            .max(if_negative.time);
        let operands = [self, if_nonnegative, if_negative];
        let n = operands.iter().filter_map(|rv| rv.path_count()).max();
        match n {
            None => Self {
                time,
                values: Values::Constant(if self.get(0) >= 0.0 {
                    if_nonnegative.get(0)
                } else {
                    if_negative.get(0)
                }),
            },
            Some(n) => {
                for rv in operands {
                    if let Some(m) = rv.path_count() {
                        assert_eq!(m, n, "path count mismatch: {m} vs {n}");
                    }
                }
                let values = (0..n)
                    .map(|i| {
                        if self.get(i) >= 0.0 {
                            if_nonnegative.get(i)
                        } else {
                            if_negative.get(i)
                        }
                    })
                    .collect();
                Self {
                    time,
                    values: Values::Paths(values),
                }
            }
        }
    }

    // ── Reductions ───────────────────────────────────────────────────────

    /// Equally weighted mean over paths.
    pub fn average(&self) -> Real {
        match &self.values {
            Values::Constant(c) => *c,
            Values::Paths(v) => v.iter().sum::<Real>() / v.len() as Real,
        }
    }

    /// Population variance over paths (zero for a deterministic value).
    pub fn variance(&self) -> Real {
        match &self.values {
            Values::Constant(_) => 0.0,
            Values::Paths(v) => {
                let n = v.len() as Real;
                let mean = v.iter().sum::<Real>() / n;
                v.iter().map(|&x| (x - mean) * (x - mean)).sum::<Real>() / n
            }
        }
    }

    /// Standard deviation over paths.
    pub fn standard_deviation(&self) -> Real {
        self.variance().sqrt()
    }

    /// Monte Carlo standard error: standard deviation divided by √paths.
    pub fn standard_error(&self) -> Real {
        match self.path_count() {
            None => 0.0,
            Some(n) => self.standard_deviation() / (n as Real).sqrt(),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
