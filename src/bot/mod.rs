// Transport adapter
// Parses chat input, gates it through sessions and the rate limiter,
// and dispatches to the managers. Rendering the replies into message
// text is the host bot's job, not ours.

pub mod callback;
pub mod commands;
pub mod router;
pub mod security;
pub mod session;

pub use callback::{AdminAction, CallbackAction};
pub use commands::Command;
pub use router::{Reply, Router};
pub use security::{RateLimiter, RateLimiterConfig, Verdict};
pub use session::{SessionMap, SessionState};
