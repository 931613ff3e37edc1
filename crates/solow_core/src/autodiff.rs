use crate::traits::{DynamicalSystem, Scalar};
use num_traits::{One, Zero};
use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

/// Simple Dual Number for Forward Mode AD
/// val: real part
/// eps: infinitesimal part
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Dual {
    pub val: f64,
    pub eps: f64,
}

impl Dual {
    pub fn new(val: f64, eps: f64) -> Self {
        Self { val, eps }
    }

    /// A variable seeded with unit derivative.
    pub fn variable(val: f64) -> Self {
        Self::new(val, 1.0)
    }
}

impl Zero for Dual {
    fn zero() -> Self {
        Self::new(0.0, 0.0)
    }
    fn is_zero(&self) -> bool {
        self.val == 0.0 && self.eps == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Self::new(1.0, 0.0)
    }
}

impl Add for Dual {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.val + rhs.val, self.eps + rhs.eps)
    }
}

impl Sub for Dual {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.val - rhs.val, self.eps - rhs.eps)
    }
}

impl Mul for Dual {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.val * rhs.val, self.val * rhs.eps + self.eps * rhs.val)
    }
}

impl Div for Dual {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let denom = rhs.val * rhs.val;
        Self::new(
            self.val / rhs.val,
            (self.eps * rhs.val - self.val * rhs.eps) / denom,
        )
    }
}

impl Neg for Dual {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.val, -self.eps)
    }
}

impl Rem for Dual {
    type Output = Self;
    fn rem(self, rhs: Self) -> Self {
        // Piecewise constant offset, so the derivative passes through.
        Self::new(self.val % rhs.val, self.eps)
    }
}

impl Scalar for Dual {
    fn constant(value: f64) -> Self {
        Self::new(value, 0.0)
    }

    fn value(self) -> f64 {
        self.val
    }

    fn powf(self, exponent: f64) -> Self {
        // d(x^p) = p * x^(p-1) dx
        let val_pow = self.val.powf(exponent);
        let slope = if exponent == 0.0 {
            0.0
        } else {
            exponent * self.val.powf(exponent - 1.0)
        };
        Self::new(val_pow, slope * self.eps)
    }

    fn is_finite(self) -> bool {
        self.val.is_finite() && self.eps.is_finite()
    }
}

/// Evaluates the Jacobian of `system` at `state` column by column, seeding one
/// coordinate at a time. The result is row-major: `jacobian[i * dim + j] = ∂f_i/∂x_j`.
pub fn jacobian<S>(system: &S, state: &[f64]) -> Vec<f64>
where
    S: DynamicalSystem<Dual>,
{
    let dim = state.len();
    let mut jacobian = vec![0.0; dim * dim];
    let mut dual_state = vec![Dual::zero(); dim];
    let mut dual_out = vec![Dual::zero(); dim];

    for j in 0..dim {
        for i in 0..dim {
            dual_state[i] = Dual::new(state[i], if i == j { 1.0 } else { 0.0 });
        }
        system.apply(&dual_state, &mut dual_out);
        for i in 0..dim {
            jacobian[i * dim + j] = dual_out[i].eps;
        }
    }

    jacobian
}
