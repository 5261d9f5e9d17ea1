pub mod linalg;
pub mod error;
pub mod dynamics;
pub mod gnc;
pub mod sim;
pub mod api;
pub mod session;
pub mod io;
pub mod config;

pub use error::{Result, SimError};
pub use session::SessionStore;

pub mod types {
    pub use crate::dynamics::state::{Aquadron, StateVector, VehicleParams};
    pub use crate::gnc::GuidanceTarget;
    pub use crate::sim::{Sample, SimConfig, StopReason, Trajectory};
}
