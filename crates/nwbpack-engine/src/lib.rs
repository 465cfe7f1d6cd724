mod reconcile;

pub use reconcile::{PlanOptions, plan};
