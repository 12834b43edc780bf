//! pictor-core: shared types, errors and configuration.
//!
//! This crate provides the vocabulary used across pictor:
//!
//! - **Image types**: [`ImageType`] with its per-variant storage directory and
//!   dimension cap
//! - **Pipeline outcomes**: [`ImageError`] and [`ErrorKind`]
//! - **Authorization**: the [`Authorization`] capability handed to the pipeline
//! - **Configuration**: the [`config::Config`] tree
//! - **Error handling**: the infrastructure [`Error`] and [`Result`] alias
//!
//! # Examples
//!
//! ```
//! use pictor_core::ImageType;
//!
//! assert_eq!(ImageType::UserAvatar.directory(), "avatars");
//! assert_eq!(ImageType::UserAvatar.max_single_dimension(), 512);
//! ```

pub mod authorization;
pub mod config;
pub mod error;
pub mod image_error;
pub mod types;

pub use authorization::{Anonymous, Authorization};
pub use error::{Error, Result};
pub use image_error::{ErrorKind, ImageError};
pub use types::ImageType;
