#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default
)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod media;
pub mod prompt;
pub mod session;
pub mod upstream;

pub use config::Config;
pub use error::{ServiceError, TemplateError};
