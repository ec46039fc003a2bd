//! Image decoding for Pixmill.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and WebP bytes to RGB pixel buffers
//! - Applying EXIF orientation so pixels match what the browser displays
//! - Sniffing the container format of user-supplied bytes
//!
//! # Architecture
//!
//! Decoding is the first half of the codec adapter. A failed decode never
//! yields a partially populated image: callers either get a complete
//! `DecodedImage` or a `DecodeError`.
//!
//! # Examples
//!
//! ```ignore
//! use pixmill_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, detect_format};
pub use types::{DecodeError, DecodedImage, Dimensions, ExifOrientation, FilterType};
