use num_traits::{NumOps, One, Zero};
use std::fmt::Debug;
use std::ops::Neg;

/// A trait for types that the laws of motion can be evaluated on.
/// Implemented for `f64` and for `Dual`, which carries a derivative alongside the value.
pub trait Scalar: Copy + Debug + PartialOrd + Zero + One + NumOps + Neg<Output = Self> + 'static {
    /// Lifts a plain constant (a parameter, say) into the scalar type.
    fn constant(value: f64) -> Self;

    /// The real part of the scalar.
    fn value(self) -> f64;

    /// Raises the scalar to a real, constant exponent.
    fn powf(self, exponent: f64) -> Self;

    fn is_finite(self) -> bool {
        self.value().is_finite()
    }
}

impl Scalar for f64 {
    fn constant(value: f64) -> Self {
        value
    }

    fn value(self) -> f64 {
        self
    }

    fn powf(self, exponent: f64) -> Self {
        f64::powf(self, exponent)
    }
}

/// Represents an autonomous discrete map x_{t+1} = f(x_t).
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the map.
    /// x: current state
    /// out: buffer to write x_{t+1}
    fn apply(&self, x: &[T], out: &mut [T]);
}
