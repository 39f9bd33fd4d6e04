pub mod file_format;
pub mod log_setup;
pub mod test_utils;

pub use file_format::{
    deserialize, load_from_file, save_to_file, serialize, FileExtensionError, SerdeFormat,
    SerdeFormatError, SerdeFormatResult,
};

pub fn is_debug() -> bool {
    cfg!(debug_assertions)
}
