use crate::ogg::read::valid_vorbis_comments_key;
use crate::picture::{Picture, PictureInformation};

/// A Vorbis comment block, as found in the comment header of OGG Vorbis and OGG Opus
///
/// Fields are stored as ordered `KEY=VALUE` pairs, keys compare case-insensitively. Attached
/// pictures are kept separate from the text fields.
#[derive(Default, PartialEq, Eq, Debug, Clone)]
pub struct VorbisComments {
	/// An identifier for the encoding software
	pub(crate) vendor: String,
	/// A collection of key-value pairs
	pub(crate) items: Vec<(String, String)>,
	/// A collection of all pictures
	pub(crate) pictures: Vec<(Picture, PictureInformation)>,
}

impl VorbisComments {
	/// Create a new empty `VorbisComments`
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::ogg::VorbisComments;
	///
	/// let vorbis_comments_tag = VorbisComments::new();
	/// assert!(vorbis_comments_tag.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a new empty `VorbisComments` with a vendor string
	pub fn with_vendor(vendor: impl Into<String>) -> Self {
		Self {
			vendor: vendor.into(),
			..Self::default()
		}
	}

	/// Returns the vendor string
	///
	/// ```rust
	/// use oggtag::ogg::VorbisComments;
	///
	/// let vorbis_comments = VorbisComments::default();
	/// assert!(vorbis_comments.vendor().is_empty());
	///
	/// let vorbis_comments = VorbisComments::with_vendor("FooBar");
	/// assert_eq!(vorbis_comments.vendor(), "FooBar");
	/// ```
	pub fn vendor(&self) -> &str {
		&self.vendor
	}

	/// Get all items
	///
	/// Returns an [`Iterator`] over the stored key/value pairs, in the order they were added.
	pub fn items(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + Clone {
		self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Gets the first item with `key`
	///
	/// NOTE: There can be multiple items with the same key, this grabs whichever happens to be the first
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::ogg::VorbisComments;
	///
	/// let mut vorbis_comments = VorbisComments::default();
	///
	/// // Vorbis comments allows multiple fields with the same key, such as artist
	/// vorbis_comments.push(String::from("ARTIST"), String::from("Foo artist"));
	/// vorbis_comments.push(String::from("artist"), String::from("Bar artist"));
	///
	/// assert_eq!(vorbis_comments.get("Artist"), Some("Foo artist"));
	/// ```
	pub fn get(&self, key: &str) -> Option<&str> {
		if !verify_key(key) {
			return None;
		}

		self.items
			.iter()
			.find(|(k, _)| k.eq_ignore_ascii_case(key))
			.map(|(_, v)| v.as_str())
	}

	/// Appends an item
	///
	/// NOTE: This will do nothing if the key is invalid.
	pub fn push(&mut self, key: String, value: String) {
		if !verify_key(&key) {
			return;
		}

		self.items.push((key, value))
	}

	/// Returns the stored pictures and their information
	pub fn pictures(&self) -> &[(Picture, PictureInformation)] {
		&self.pictures
	}

	/// Appends a picture
	///
	/// The [`PictureInformation`] is written as-is, it is not checked against the picture data.
	pub fn push_picture(&mut self, picture: Picture, information: PictureInformation) {
		self.pictures.push((picture, information))
	}

	/// Removes all pictures, returning them
	pub fn remove_pictures(&mut self) -> Vec<(Picture, PictureInformation)> {
		std::mem::take(&mut self.pictures)
	}

	/// The number of fields, including pictures
	pub fn len(&self) -> usize {
		self.items.len() + self.pictures.len()
	}

	/// Whether there are no fields or pictures
	///
	/// NOTE: The vendor string is not considered.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty() && self.pictures.is_empty()
	}
}

// Keys are checked on insertion, and compared case-insensitively on lookup
pub(crate) fn verify_key(key: &str) -> bool {
	valid_vorbis_comments_key(key.as_bytes())
}
