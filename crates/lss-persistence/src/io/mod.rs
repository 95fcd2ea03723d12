//! File I/O for the options document.

mod load;
mod save;

pub use load::load_options_file;
pub use save::save_options_file;
