//! Contains the errors that can arise within oggtag
//!
//! The primary error is [`OggTagError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.

use crate::ogg::OggFormat;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

use ogg_pager::PageError;

/// Alias for `Result<T, OggTagError>`
pub type Result<T> = std::result::Result<T, OggTagError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// File format related errors
	/// Unable to determine the format, or the comment header is not where it should be
	UnknownFormat,

	// File data related errors
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// Expected the data to be a different size than provided
	///
	/// This occurs when the size of an item is written as one value, but that size is either too
	/// big or small to be valid within the bounds of that item.
	SizeMismatch,
	/// Errors that occur while decoding a file
	FileDecoding(FileDecodingError),
	/// Errors that occur while encoding a file
	FileEncoding(FileEncodingError),

	// Picture related errors
	/// Provided an invalid picture
	NotAPicture,
	/// Encountered a picture type outside of the known range (0..=20)
	InvalidPictureType(u32),

	// Tag related errors
	/// Errors that arise while decoding text
	TextDecode(&'static str),

	// Conversions for external errors
	/// Errors that arise while parsing OGG pages
	OggPage(PageError),
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Unable to convert bytes to a str
	StrFromUtf8(std::str::Utf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// Unable to move a temporary file over the original
	TempFile(tempfile::PersistError),
	/// Unable to decode or re-encode an image
	Image(image::ImageError),
}

/// An error that arises while decoding a file
pub struct FileDecodingError {
	format: Option<OggFormat>,
	description: &'static str,
}

impl FileDecodingError {
	/// Create a `FileDecodingError` from an [`OggFormat`] and description
	#[must_use]
	pub const fn new(format: OggFormat, description: &'static str) -> Self {
		Self {
			format: Some(format),
			description,
		}
	}

	/// Create a `FileDecodingError` without binding it to an [`OggFormat`]
	pub fn from_description(description: &'static str) -> Self {
		Self {
			format: None,
			description,
		}
	}

	/// Returns the associated [`OggFormat`], if one exists
	pub fn format(&self) -> Option<OggFormat> {
		self.format
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(format) = self.format {
			write!(f, "{:?}: {:?}", format, self.description)
		} else {
			write!(f, "{:?}", self.description)
		}
	}
}

impl Display for FileDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(format) = self.format {
			write!(f, "{:?}: {}", format, self.description)
		} else {
			write!(f, "{}", self.description)
		}
	}
}

/// An error that arises while encoding a file
pub struct FileEncodingError {
	format: Option<OggFormat>,
	description: &'static str,
}

impl FileEncodingError {
	/// Create a `FileEncodingError` from an [`OggFormat`] and description
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::error::FileEncodingError;
	/// use oggtag::ogg::OggFormat;
	///
	/// // This error is bounded to `OggFormat::Opus`, which will be displayed when the error is formatted
	/// let opus_error = FileEncodingError::new(OggFormat::Opus, "Something went wrong in the Opus file!");
	/// ```
	#[must_use]
	pub const fn new(format: OggFormat, description: &'static str) -> Self {
		Self {
			format: Some(format),
			description,
		}
	}

	/// Create a `FileEncodingError` without binding it to an [`OggFormat`]
	pub fn from_description(description: &'static str) -> Self {
		Self {
			format: None,
			description,
		}
	}

	/// Returns the associated [`OggFormat`], if one exists
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::error::FileEncodingError;
	/// use oggtag::ogg::OggFormat;
	///
	/// let opus_error = FileEncodingError::new(OggFormat::Opus, "Something went wrong in the Opus file!");
	///
	/// assert_eq!(opus_error.format(), Some(OggFormat::Opus));
	/// ```
	pub fn format(&self) -> Option<OggFormat> {
		self.format
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for FileEncodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(format) = self.format {
			write!(f, "{:?}: {:?}", format, self.description)
		} else {
			write!(f, "{:?}", self.description)
		}
	}
}

impl Display for FileEncodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		if let Some(format) = self.format {
			write!(f, "{:?}: {}", format, self.description)
		} else {
			write!(f, "{}", self.description)
		}
	}
}

/// Errors that could occur within oggtag
pub struct OggTagError {
	pub(crate) kind: ErrorKind,
}

impl OggTagError {
	/// Create an `OggTagError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::error::{ErrorKind, OggTagError};
	///
	/// let unknown_format = OggTagError::new(ErrorKind::UnknownFormat);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::error::{ErrorKind, OggTagError};
	///
	/// let unknown_format = OggTagError::new(ErrorKind::UnknownFormat);
	/// if let ErrorKind::UnknownFormat = unknown_format.kind() {
	/// 	println!("What's the format?");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for OggTagError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self.kind {
			ErrorKind::OggPage(ref err) => Some(err),
			ErrorKind::StringFromUtf8(ref err) => Some(err),
			ErrorKind::StrFromUtf8(ref err) => Some(err),
			ErrorKind::Io(ref err) => Some(err),
			ErrorKind::Alloc(ref err) => Some(err),
			ErrorKind::TempFile(ref err) => Some(err),
			ErrorKind::Image(ref err) => Some(err),
			_ => None,
		}
	}
}

impl Debug for OggTagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<FileDecodingError> for OggTagError {
	fn from(input: FileDecodingError) -> Self {
		Self {
			kind: ErrorKind::FileDecoding(input),
		}
	}
}

impl From<FileEncodingError> for OggTagError {
	fn from(input: FileEncodingError) -> Self {
		Self {
			kind: ErrorKind::FileEncoding(input),
		}
	}
}

impl From<PageError> for OggTagError {
	fn from(input: PageError) -> Self {
		Self {
			kind: ErrorKind::OggPage(input),
		}
	}
}

impl From<std::io::Error> for OggTagError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for OggTagError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl From<std::str::Utf8Error> for OggTagError {
	fn from(input: std::str::Utf8Error) -> Self {
		Self {
			kind: ErrorKind::StrFromUtf8(input),
		}
	}
}

impl From<TryReserveError> for OggTagError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<tempfile::PersistError> for OggTagError {
	fn from(input: tempfile::PersistError) -> Self {
		Self {
			kind: ErrorKind::TempFile(input),
		}
	}
}

impl From<image::ImageError> for OggTagError {
	fn from(input: image::ImageError) -> Self {
		Self {
			kind: ErrorKind::Image(input),
		}
	}
}

impl Display for OggTagError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::OggPage(ref err) => write!(f, "{err}"),
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::StrFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),
			ErrorKind::TempFile(ref err) => write!(f, "Unable to replace the original file: {err}"),
			ErrorKind::Image(ref err) => write!(f, "Picture: {err}"),

			ErrorKind::UnknownFormat => {
				write!(f, "No OGG Vorbis or Opus comment header could be found")
			},
			ErrorKind::NotAPicture => write!(f, "Picture: Encountered invalid data"),
			ErrorKind::InvalidPictureType(ty) => {
				write!(f, "Picture: Encountered an unknown picture type ({ty})")
			},
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),

			// Files
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),
			ErrorKind::FileDecoding(ref file_decode_err) => write!(f, "{file_decode_err}"),
			ErrorKind::FileEncoding(ref file_encode_err) => write!(f, "{file_encode_err}"),
		}
	}
}
