//! The three keyed stores a server owns: the method registry, the
//! capability catalog and the error catalog. All share the same contract:
//! unique keys, add-on-duplicate refuses without overwriting, delete-on-
//! missing refuses.

mod capabilities;
mod errors;
mod methods;

pub use capabilities::{Capabilities, Capability};
pub use errors::Errors;
pub use methods::Methods;
