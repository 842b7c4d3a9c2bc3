//! Small helpers shared by the renderer and the data layer.
//!
//! - **Text**: terminal width measurement, truncation and control character
//!   stripping for untrusted strings
//! - **Time**: compact "3h" style ages for list rows
//! - **URLs**: checks before opening links or trusting an API base URL
//!
//! ```
//! use hnr::util::{display_width, truncate_to_width, validate_url_for_open};
//!
//! assert!(validate_url_for_open("https://news.ycombinator.com").is_ok());
//! assert_eq!(display_width("Hello 世界"), 10);
//! assert_eq!(truncate_to_width("A long story title", 10), "A long ...");
//! ```

mod text;
mod time;
mod url_validator;

pub use text::{display_width, strip_control_chars, truncate_to_width};
pub use time::{age, format_age};
pub use url_validator::{is_loopback, validate_url_for_open, UrlValidationError};
