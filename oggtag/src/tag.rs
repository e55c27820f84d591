//! The format-agnostic view of a comment header
//!
//! A [`Tag`] only holds the handful of fields this crate knows how to write, see
//! [`VorbisComments`] for full access to a comment header.

use crate::config::WriteOptions;
use crate::error::Result;
use crate::macros::err;
use crate::ogg::{OggFormat, VorbisComments, save_opus, save_vorbis};
use crate::picture::Picture;

use std::path::{Path, PathBuf};

macro_rules! impl_accessor {
	($($name:ident => $description:literal;)+) => {
		paste::paste! {
			$(
				#[doc = "Returns the " $description]
				pub fn $name(&self) -> Option<&str> {
					self.$name.as_deref()
				}

				#[doc = "Sets the " $description]
				pub fn [<set_ $name>](&mut self, value: String) {
					self.$name = Some(value)
				}

				#[doc = "Removes the " $description]
				pub fn [<remove_ $name>](&mut self) {
					self.$name = None
				}
			)+
		}
	}
}

/// The fields of a comment header, along with the file they came from
///
/// ## Conversions
///
/// ### From `VorbisComments`
///
/// Only the following keys are used, all others are discarded. When a key appears multiple
/// times, the first occurrence wins.
///
/// | Key           | Field          |
/// |---------------|----------------|
/// | `ALBUM`       | `album`        |
/// | `ARTIST`      | `artist`       |
/// | `ALBUMARTIST` | `album_artist` |
/// | `DATE`        | `date`         |
/// | `TITLE`       | `title`        |
/// | `GENRE`       | `genre`        |
/// | `COMMENT`     | `comment`      |
///
/// The first picture is used, regardless of its type.
///
/// # Examples
///
/// ```rust
/// use oggtag::Tag;
///
/// let mut tag = Tag::new();
/// tag.set_title(String::from("Foo title"));
/// assert_eq!(tag.title(), Some("Foo title"));
///
/// tag.remove_title();
/// assert!(tag.title().is_none());
/// ```
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct Tag {
	artist: Option<String>,
	album_artist: Option<String>,
	album: Option<String>,
	title: Option<String>,
	genre: Option<String>,
	comment: Option<String>,
	date: Option<String>,
	picture: Option<Picture>,
	path: Option<PathBuf>,
	format: Option<OggFormat>,
}

impl Tag {
	/// Create an empty `Tag`
	pub fn new() -> Self {
		Self::default()
	}

	impl_accessor!(
		artist       => "artist";
		album_artist => "album artist";
		album        => "album title";
		title        => "track title";
		genre        => "genre";
		comment      => "comment";
		date         => "recording date";
	);

	/// Returns the attached picture
	pub fn picture(&self) -> Option<&Picture> {
		self.picture.as_ref()
	}

	/// Sets the attached picture
	///
	/// NOTE: When writing, the picture is always stored as a JPEG front cover. Other image
	///       formats are converted, and data that can't be decoded will not be written. See
	///       [`Picture::front_cover`].
	pub fn set_picture(&mut self, picture: Picture) {
		self.picture = Some(picture)
	}

	/// Removes the attached picture
	pub fn remove_picture(&mut self) {
		self.picture = None
	}

	/// The path of the file this tag is written to
	///
	/// This is set by [`read_from_path`](crate::read_from_path).
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Set the path of the file this tag is written to
	pub fn set_path(&mut self, path: Option<PathBuf>) {
		self.path = path
	}

	/// The format of the file this tag was read from
	pub fn format(&self) -> Option<OggFormat> {
		self.format
	}

	/// Set the format used by [`Tag::save`]
	pub fn set_format(&mut self, format: Option<OggFormat>) {
		self.format = format
	}

	/// Whether none of the fields are set
	///
	/// NOTE: The path and format are not considered.
	pub fn is_empty(&self) -> bool {
		self.artist.is_none()
			&& self.album_artist.is_none()
			&& self.album.is_none()
			&& self.title.is_none()
			&& self.genre.is_none()
			&& self.comment.is_none()
			&& self.date.is_none()
			&& self.picture.is_none()
	}

	/// Write the tag to [`Tag::path`], in the format it was read as
	///
	/// See [`save_vorbis`] and [`save_opus`].
	///
	/// # Errors
	///
	/// * [`ErrorKind::UnknownFormat`](crate::error::ErrorKind::UnknownFormat) if the tag has no
	///   format
	/// * See [`save_vorbis`]
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use oggtag::config::{ParseOptions, WriteOptions};
	///
	/// # fn main() -> oggtag::error::Result<()> {
	/// let mut tag = oggtag::read_from_path("foo.ogg", ParseOptions::new())?;
	/// tag.set_artist(String::from("Foo artist"));
	///
	/// tag.save(WriteOptions::default())?;
	/// # Ok(()) }
	/// ```
	pub fn save(&self, write_options: WriteOptions) -> Result<()> {
		match self.format {
			Some(OggFormat::Vorbis) => save_vorbis(self, write_options),
			Some(OggFormat::Opus) => save_opus(self, write_options),
			None => err!(UnknownFormat),
		}
	}
}

impl From<VorbisComments> for Tag {
	fn from(mut input: VorbisComments) -> Self {
		let field = |key: &str| input.get(key).map(str::to_owned);

		let mut tag = Self {
			artist: field("ARTIST"),
			album_artist: field("ALBUMARTIST"),
			album: field("ALBUM"),
			title: field("TITLE"),
			genre: field("GENRE"),
			comment: field("COMMENT"),
			date: field("DATE"),
			..Self::default()
		};

		tag.picture = input
			.remove_pictures()
			.into_iter()
			.next()
			.map(|(picture, _)| picture);

		tag
	}
}
