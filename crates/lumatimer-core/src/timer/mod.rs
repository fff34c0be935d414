mod completion;
mod engine;
mod mode;

pub use completion::{Completion, AUTO_ADVANCE_DELAY};
pub use engine::{SessionContext, TickOutcome, TimerEngine};
pub use mode::TimerMode;
