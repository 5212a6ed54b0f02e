pub mod environment;
pub mod paths;
pub mod terminal;

pub use environment::get_config_path;
pub use paths::{
    DEFAULT_MAX_FILE_SIZE_BYTES, format_path_with_tilde, safe_open_file, validate_file_size,
};
pub use terminal::strip_ansi_codes;
