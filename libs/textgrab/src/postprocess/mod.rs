mod strict;
mod types;
mod utils;

pub use strict::apply_strict_filter;
pub use types::{PostProcessConfig, DEFAULT_DENYLIST};
pub use utils::{group_lines, is_denied, post_process, prepare_lines};
