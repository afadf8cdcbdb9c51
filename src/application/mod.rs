pub mod clock;
pub mod config;
pub mod reveal;
pub mod scheduler;
pub mod session;
pub mod traces;

pub use clock::*;
pub use config::*;
pub use reveal::*;
pub use scheduler::*;
pub use session::*;
pub use traces::*;
