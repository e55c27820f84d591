//! Read and write Vorbis comments in OGG Vorbis and OGG Opus files.
//!
//! Only the comment header packet is ever replaced. Every other page of the stream is copied,
//! with at most its sequence number (and checksum) updated.
//!
//! # Examples
//!
//! ## Reading a file
//!
//! ### Using a path
//!
//! ```rust,no_run
//! # fn main() -> oggtag::error::Result<()> {
//! use oggtag::config::ParseOptions;
//! use oggtag::read_from_path;
//!
//! // The format is determined by the comment header, not the extension
//! let tag = read_from_path("test.opus", ParseOptions::new())?;
//!
//! println!("Artist: {:?}", tag.artist());
//! println!("Format: {:?}", tag.format());
//! # Ok(())
//! # }
//! ```
//!
//! ### Using an existing reader
//!
//! ```rust,no_run
//! # fn main() -> oggtag::error::Result<()> {
//! use oggtag::config::ParseOptions;
//! use oggtag::read_from;
//! use std::fs::File;
//!
//! let mut file = File::open("test.ogg")?;
//!
//! // A tag read from a reader has no path, so it can't be saved directly
//! let tag = read_from(&mut file, ParseOptions::new())?;
//! assert!(tag.path().is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing a file
//!
//! ```rust,no_run
//! # fn main() -> oggtag::error::Result<()> {
//! use oggtag::config::{ParseOptions, WriteOptions};
//! use oggtag::picture::Picture;
//! use oggtag::read_from_path;
//! use std::fs::File;
//!
//! let mut tag = read_from_path("test.ogg", ParseOptions::new())?;
//! tag.set_title(String::from("Foo title"));
//! tag.set_picture(Picture::from_reader(&mut File::open("cover.jpg")?)?);
//!
//! // The file is only replaced once the new one is fully written
//! tag.save(WriteOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Clearing a file
//!
//! ```rust,no_run
//! # fn main() -> oggtag::error::Result<()> {
//! use oggtag::ogg::{OggFormat, clear_tags};
//!
//! clear_tags("test.opus", OggFormat::Opus)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Important format-specific notes
//!
//! ## OGG Opus
//!
//! The `COMMENT` field is never written to Opus files.
//!
//! ## Cover art
//!
//! A single picture is written, as a JPEG front cover. See [`Tag::set_picture`].
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub(crate) mod macros;
pub mod ogg;
pub mod picture;
pub mod tag;
mod util;

pub use crate::ogg::read::{read_from, read_from_path};
pub use crate::ogg::{clear_tags, save_opus, save_vorbis};
pub use crate::tag::Tag;
