//! Conversion of decoded payloads into domain values.

mod error;
pub use self::error::ErrorDenormalizer;

mod resource;
pub use self::resource::ResourceDenormalizer;
