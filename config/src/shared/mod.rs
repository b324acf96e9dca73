mod base;
mod connection;
mod updater;

pub use base::*;
pub use connection::*;
pub use updater::*;
