mod logger;
mod path_utils;

pub use logger::{init_logger, init_logger_exe};
pub use path_utils::to_absolute_path;
