mod artifact;
mod batch;
mod plan;
mod session;

pub use artifact::*;
pub use batch::*;
pub use plan::*;
pub use session::*;
