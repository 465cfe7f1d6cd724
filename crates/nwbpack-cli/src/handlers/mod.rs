mod find_missing;
mod package;

pub use find_missing::find_missing;
pub use package::package;
