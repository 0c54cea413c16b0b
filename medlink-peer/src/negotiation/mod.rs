mod callee;
mod caller;
mod gate;
mod handle;
mod session;
mod state;
mod supervisor;

pub use callee::start_as_callee;
pub use caller::start_as_caller;
pub use handle::CallHandle;
pub use state::{CallState, FailureReason};
pub use supervisor::PollSupervisor;
