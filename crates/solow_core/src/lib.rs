pub mod autodiff;
pub mod error;
pub mod nullcline;
pub mod params;
pub mod production;
pub mod series;
pub mod simulator;
pub mod state;
pub mod steady_state;
/// The `solow_core` crate simulates the discrete-time Solow growth model extended with
/// human capital, expressed per effective worker.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem` (two-dimensional maps).
/// - **Production**: Cobb-Douglas and CES laws of motion, generic over `f64` and Dual numbers.
/// - **Simulator**: fixed-point iteration of a transition map with a convergence test.
/// - **Steady state**: closed-form Cobb-Douglas solution, Newton solver and stability analysis.
/// - **Series**: named descriptive transforms over macroeconomic time series.
pub mod traits;

pub use error::{ParameterError, SimulationError};
pub use params::{ModelParameters, SimulationSettings};
pub use production::{GrowthSystem, Technology, TransitionMap};
pub use simulator::{run, run_default};
pub use state::{ConvergenceResult, State, Trajectory};
pub use steady_state::steady_state;
