pub mod state;
pub mod kinematics;
pub mod vector_field;

pub use state::{Aquadron, StateVector, VehicleParams};
pub use vector_field::derivatives;
