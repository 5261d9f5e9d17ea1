pub mod integrator;
pub mod runner;
pub mod event;

pub use runner::{simulate, simulate_with, Sample, SimConfig, StepOutcome, Stepper, Trajectory};
pub use integrator::{rk4_step, StepSchedule};
pub use event::{ArrivalDetector, EventDetector, StopReason};
