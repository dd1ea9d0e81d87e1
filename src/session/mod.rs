pub mod drill;
pub mod input;
pub mod practice;
pub mod result;
pub mod selection;
pub mod timer;

pub use practice::{KeyOutcome, PracticeSession, SessionStatus};
pub use result::{LiveMetrics, PracticeResult};
pub use selection::SelectionModel;
