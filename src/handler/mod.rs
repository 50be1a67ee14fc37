mod session_router;

pub use session_router::{RouterStats, SessionRouter};
