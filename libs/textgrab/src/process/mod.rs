mod types;
mod utils;

pub use types::ProcessorConfig;
pub use utils::{
    load_image_from_path, process_image, process_image_from_path, process_image_groups,
};
