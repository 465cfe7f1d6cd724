mod args;
mod context;
mod handlers;
pub mod output;
pub mod types;

pub use args::{CatalogArgs, FindMissingArgs, PackageArgs};
pub use handlers::{find_missing, package};

/// Reset SIGPIPE to default behavior to prevent panic on broken pipe
/// (e.g., when piping to `head` or `less` that exits early)
#[cfg(unix)]
pub fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

#[cfg(not(unix))]
pub fn reset_sigpipe() {}
