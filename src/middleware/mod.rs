pub mod pipeline;
pub mod require;
pub mod resolve;
pub mod scope;

pub use pipeline::{compose, run_pipeline, Flow, Pipeline, Step};
pub use require::RequireUser;
pub use resolve::ResolveSession;
pub use scope::{CurrentUser, Principal, RequestScope};
