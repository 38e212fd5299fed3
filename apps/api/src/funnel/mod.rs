// Step Controller: the five-step funnel and the per-session state behind it.

pub mod handlers;
pub mod session;
pub mod steps;

pub use session::{FunnelSession, SessionRegistry, SessionSnapshot};
pub use steps::Step;
