/// Options to control how oggtag writes to a file
///
/// This is best used as an application global config that gets set once.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) write_cover_art: bool,
	pub(crate) preserve_vendor: bool,
}

impl WriteOptions {
	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			write_cover_art: true,
			preserve_vendor: false,
		}
	}

	/// Whether to write the tag's cover art
	///
	/// When disabled, any existing cover art is removed from the file.
	///
	/// NOTE: Only JPEG images can be written. Any other image is dropped with a warning.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use oggtag::config::{ParseOptions, WriteOptions};
	///
	/// # fn main() -> oggtag::error::Result<()> {
	/// let mut tag = oggtag::read_from_path("test.ogg", ParseOptions::new())?;
	/// tag.set_title(String::from("Foo title"));
	///
	/// // I want my files to stay small
	/// let options = WriteOptions::new().write_cover_art(false);
	/// tag.save(options)?;
	/// # Ok(()) }
	/// ```
	pub fn write_cover_art(mut self, write_cover_art: bool) -> Self {
		self.write_cover_art = write_cover_art;
		self
	}

	/// Whether to keep the vendor string of the file being written
	///
	/// By default, the vendor string is replaced with one identifying this library.
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use oggtag::config::{ParseOptions, WriteOptions};
	///
	/// # fn main() -> oggtag::error::Result<()> {
	/// let mut tag = oggtag::read_from_path("test.opus", ParseOptions::new())?;
	/// tag.set_artist(String::from("Foo artist"));
	///
	/// // Keep the encoder's vendor string around
	/// let options = WriteOptions::new().preserve_vendor(true);
	/// tag.save(options)?;
	/// # Ok(()) }
	/// ```
	pub fn preserve_vendor(mut self, preserve_vendor: bool) -> Self {
		self.preserve_vendor = preserve_vendor;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     write_cover_art: true,
	///     preserve_vendor: false,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
