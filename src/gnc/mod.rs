pub mod controller;
pub mod guidance;
pub mod feedback;

pub use controller::Controller;
pub use guidance::{approach_speed, desired_heading, BearingMode, GuidanceTarget};
pub use feedback::{ControlGains, FeedbackLinearization};
