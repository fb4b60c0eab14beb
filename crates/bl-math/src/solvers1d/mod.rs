//! 1D root-finding solvers.
//!
//! The free functions take their accuracy and iteration budget explicitly;
//! [`Solver1D`] bundles a method choice with those settings and adds a
//! bracket search around an initial guess, so callers that depend on
//! convergence (the short-rate calibration) never rely on hidden defaults.

use bl_core::{
    ensure,
    errors::{Error, Result},
    Real,
};

/// Factor by which a failing bracket is widened on each expansion.
const BRACKET_GROWTH: Real = 1.6;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Root-finding algorithm selected by a [`Solver1D`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverMethod {
    /// Brent's method (bisection / secant / inverse quadratic).
    Brent,
    /// Plain bisection.
    Bisection,
    /// Secant iteration started from `guess` and `guess + step`.
    Secant,
    /// Ridder's exponential-fit method.
    Ridder,
}

/// A configured one-dimensional root finder.
///
/// ```
/// use bl_math::{Solver1D, SolverMethod};
///
/// let solver = Solver1D::new(SolverMethod::Brent)
///     .with_accuracy(1e-12)
///     .with_max_iterations(200);
/// let root = solver.solve(|x| x * x - 2.0, 1.0, 0.1).unwrap();
/// assert!((root - 2.0_f64.sqrt()).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solver1D {
    method: SolverMethod,
    accuracy: Real,
    max_iterations: u32,
    max_bracket_expansions: u32,
}

impl Default for Solver1D {
    fn default() -> Self {
        Self {
            method: SolverMethod::Brent,
            accuracy: 1.0e-12,
            max_iterations: 100,
            max_bracket_expansions: 50,
        }
    }
}

impl Solver1D {
    /// A solver using `method` with the default accuracy (1e-12),
    /// iteration budget (100) and bracket search budget (50).
    pub fn new(method: SolverMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Set the absolute accuracy on the root.
    pub fn with_accuracy(mut self, accuracy: Real) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the maximum number of solver iterations.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set how many times the bracket may be widened in [`Solver1D::solve`].
    pub fn with_max_bracket_expansions(mut self, expansions: u32) -> Self {
        self.max_bracket_expansions = expansions;
        self
    }

    /// The selected method.
    pub fn method(&self) -> SolverMethod {
        self.method
    }

    /// Absolute accuracy on the root.
    pub fn accuracy(&self) -> Real {
        self.accuracy
    }

    /// Maximum number of solver iterations.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Maximum number of bracket expansions.
    pub fn max_bracket_expansions(&self) -> u32 {
        self.max_bracket_expansions
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.accuracy > 0.0,
            "solver accuracy must be positive, got {}",
            self.accuracy
        );
        ensure!(self.max_iterations > 0, "solver needs at least one iteration");
        Ok(())
    }

    /// Find a root of `f` inside `[x_min, x_max]`.
    ///
    /// For [`SolverMethod::Secant`] the two bounds are used as starting
    /// points and need not bracket the root.
    pub fn solve_bracketed<F>(&self, f: F, x_min: Real, x_max: Real) -> Result<Real>
    where
        F: Fn(Real) -> Real,
    {
        self.validate()?;
        let (acc, it) = (self.accuracy, self.max_iterations);
        match self.method {
            SolverMethod::Brent => brent(f, x_min, x_max, acc, it),
            SolverMethod::Bisection => bisection(f, x_min, x_max, acc, it),
            SolverMethod::Secant => secant(f, x_min, x_max, acc, it),
            SolverMethod::Ridder => ridder(f, x_min, x_max, acc, it),
        }
    }

    /// Find a root of `f` starting from `guess`.
    ///
    /// Bracketing methods first search for a sign change by widening
    /// `[guess - step, guess + step]`; secant starts from `guess` and
    /// `guess + step` directly.
    pub fn solve<F>(&self, f: F, guess: Real, step: Real) -> Result<Real>
    where
        F: Fn(Real) -> Real,
    {
        self.validate()?;
        ensure!(step > 0.0, "bracket step must be positive, got {step}");
        if self.method == SolverMethod::Secant {
            return self.solve_bracketed(f, guess, guess + step);
        }
        let (x_min, x_max) = bracket(&f, guess, step, self.max_bracket_expansions)?;
        tracing::trace!(x_min, x_max, "root bracketed");
        self.solve_bracketed(f, x_min, x_max)
    }
}

/// Search outward from `guess` for an interval where `f` changes sign.
fn bracket<F>(f: &F, guess: Real, step: Real, max_expansions: u32) -> Result<(Real, Real)>
where
    F: Fn(Real) -> Real,
{
    let mut x_min = guess - step;
    let mut x_max = guess + step;
    let mut f_min = f(x_min);
    let mut f_max = f(x_max);

    for _ in 0..=max_expansions {
        if !(f_min.is_finite() && f_max.is_finite()) {
            break;
        }
        if f_min * f_max <= 0.0 {
            return Ok((x_min, x_max));
        }
        // Widen towards the endpoint closer to zero.
        if f_min.abs() < f_max.abs() {
            x_min += BRACKET_GROWTH * (x_min - x_max);
            f_min = f(x_min);
        } else {
            x_max += BRACKET_GROWTH * (x_max - x_min);
            f_max = f(x_max);
        }
    }
    Err(Error::Precondition(format!(
        "unable to bracket a root around {guess} (last interval [{x_min}, {x_max}])"
    )))
}

/// Fails unless `[a, b]` brackets a root; returns an endpoint that already
/// is one.
fn endpoint_root(solver: &str, a: Real, fa: Real, b: Real, fb: Real) -> Result<Option<Real>> {
    if fa * fb > 0.0 {
        return Err(Error::Precondition(format!(
            "{solver}: f({a}) = {fa} and f({b}) = {fb} do not bracket a root"
        )));
    }
    Ok(if fa == 0.0 {
        Some(a)
    } else if fb == 0.0 {
        Some(b)
    } else {
        None
    })
}

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method for finding a root of `f(x)` in `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation.
pub fn brent<F>(f: F, x_min: Real, x_max: Real, accuracy: Real, max_iterations: u32) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let (mut a, mut b) = (x_min, x_max);
    let (mut fa, mut fb) = (f(a), f(b));
    if let Some(root) = endpoint_root("Brent", a, fa, b, fb)? {
        return Ok(root);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iterations {
        if fb * fc > 0.0 {
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
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * accuracy;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                let q = (q - 1.0) * (r - 1.0) * (s - 1.0);
                (p, q)
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = f(b);
    }
    Err(Error::NoConvergence {
        solver: "Brent",
        iterations: max_iterations,
    })
}

// ── Bisection ────────────────────────────────────────────────────────────────

/// Bisection on `[x_min, x_max]`, halving until the interval is below
/// `accuracy`.
pub fn bisection<F>(f: F, x_min: Real, x_max: Real, accuracy: Real, max_iterations: u32) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let (f_min, f_max) = (f(x_min), f(x_max));
    if let Some(root) = endpoint_root("Bisection", x_min, f_min, x_max, f_max)? {
        return Ok(root);
    }

    // f(neg) < 0 < f(pos)
    let (mut neg, mut pos) = if f_min < 0.0 { (x_min, x_max) } else { (x_max, x_min) };
    for _ in 0..max_iterations {
        let mid = 0.5 * (neg + pos);
        let f_mid = f(mid);
        if f_mid == 0.0 || 0.5 * (pos - neg).abs() < accuracy {
            return Ok(mid);
        }
        if f_mid < 0.0 {
            neg = mid;
        } else {
            pos = mid;
        }
    }
    Err(Error::NoConvergence {
        solver: "Bisection",
        iterations: max_iterations,
    })
}

// ── Secant ────────────────────────────────────────────────────────────────────

/// Secant method started from `x0` and `x1`.
pub fn secant<F>(f: F, x0: Real, x1: Real, accuracy: Real, max_iterations: u32) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let mut x0 = x0;
    let mut x1 = x1;
    let mut f0 = f(x0);
    let mut f1 = f(x1);

    if f0.abs() < accuracy {
        return Ok(x0);
    }
    if f1.abs() < accuracy {
        return Ok(x1);
    }

    for _ in 0..max_iterations {
        let denom = f1 - f0;
        if denom.abs() < f64::EPSILON {
            return Err(Error::Precondition(
                "Secant: derivative vanishes (f(x0) ≈ f(x1))".into(),
            ));
        }
        let x2 = x1 - f1 * (x1 - x0) / denom;
        let f2 = f(x2);

        if f2.abs() < accuracy || (x2 - x1).abs() < accuracy {
            return Ok(x2);
        }

        x0 = x1;
        f0 = f1;
        x1 = x2;
        f1 = f2;
    }

    Err(Error::NoConvergence {
        solver: "Secant",
        iterations: max_iterations,
    })
}

// ── Ridder ────────────────────────────────────────────────────────────────────

/// Ridder's method for root finding.
///
/// Requires that `f(x_min)` and `f(x_max)` have opposite signs.
pub fn ridder<F>(f: F, x_min: Real, x_max: Real, accuracy: Real, max_iterations: u32) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let (mut a, mut b) = (x_min, x_max);
    let (mut fa, mut fb) = (f(a), f(b));
    if let Some(root) = endpoint_root("Ridder", a, fa, b, fb)? {
        return Ok(root);
    }

    for _ in 0..max_iterations {
        let mid = 0.5 * (a + b);
        let fm = f(mid);

        let s = (fm * fm - fa * fb).sqrt();
        if s == 0.0 {
            return Ok(mid);
        }

        let sign = if fa < fb { 1.0 } else { -1.0 };
        let x_new = mid + (mid - a) * sign * fm / s;
        let f_new = f(x_new);

        if f_new.abs() < accuracy || (b - a).abs() < accuracy {
            return Ok(x_new);
        }

        if fm * f_new < 0.0 {
            a = mid;
            fa = fm;
            b = x_new;
            fb = f_new;
        } else if fa * f_new < 0.0 {
            b = x_new;
            fb = f_new;
        } else {
            a = x_new;
            fa = f_new;
        }

        if (b - a).abs() < accuracy {
            return Ok(0.5 * (a + b));
        }
    }

    Err(Error::NoConvergence {
        solver: "Ridder",
        iterations: max_iterations,
    })
}
