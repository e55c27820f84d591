//! Cover art handling
//!
//! Pictures are stored in Vorbis comments as a base64 encoded FLAC `METADATA_BLOCK_PICTURE`,
//! under the key of the same name. See [`Picture::as_flac_bytes`] and [`Picture::from_flac_bytes`].

use crate::config::ParsingMode;
use crate::error::{ErrorKind, OggTagError, Result};
use crate::macros::{err, try_vec};
use crate::util::text::utf8_decode_str;

use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt as _};
use data_encoding::BASE64;
use image::{DynamicImage, ImageDecoder as _, ImageFormat, ImageReader};

/// The description given to cover art created by [`Picture::front_cover`]
pub const DEFAULT_COVER_DESCRIPTION: &str = "Cover";

/// MIME types for pictures.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum MimeType {
	/// PNG image
	Png,
	/// JPEG image
	Jpeg,
	/// GIF image
	Gif,
	/// Some unknown MIME type
	Unknown(String),
}

impl MimeType {
	/// Get a `MimeType` from a string
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::picture::MimeType;
	///
	/// let jpeg_mimetype_str = "image/jpeg";
	/// assert_eq!(MimeType::from_str(jpeg_mimetype_str), MimeType::Jpeg);
	/// ```
	#[must_use]
	#[allow(clippy::should_implement_trait)] // Infallible in contrast to FromStr
	pub fn from_str(mime_type: &str) -> Self {
		match &*mime_type.to_lowercase() {
			"image/jpeg" | "image/jpg" => Self::Jpeg,
			"image/png" => Self::Png,
			"image/gif" => Self::Gif,
			_ => Self::Unknown(mime_type.to_owned()),
		}
	}

	/// Get a &str from a `MimeType`
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::picture::MimeType;
	///
	/// let jpeg_mimetype = MimeType::Jpeg;
	/// assert_eq!(jpeg_mimetype.as_str(), "image/jpeg")
	/// ```
	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			MimeType::Jpeg => "image/jpeg",
			MimeType::Png => "image/png",
			MimeType::Gif => "image/gif",
			MimeType::Unknown(unknown) => unknown,
		}
	}

	/// Returns the file extension for the `MimeType` if it is known
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::picture::MimeType;
	///
	/// assert_eq!(MimeType::Jpeg.ext(), Some("jpg"));
	/// assert_eq!(MimeType::from_str("image/webp").ext(), None);
	/// ```
	pub fn ext(&self) -> Option<&str> {
		match self {
			MimeType::Jpeg => Some("jpg"),
			MimeType::Png => Some("png"),
			MimeType::Gif => Some("gif"),
			MimeType::Unknown(_) => None,
		}
	}
}

impl Display for MimeType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The picture type, according to ID3v2 APIC
///
/// FLAC and Vorbis comments share this list. Any code outside of it is invalid.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PictureType {
	Other,
	Icon,
	OtherIcon,
	CoverFront,
	CoverBack,
	Leaflet,
	Media,
	LeadArtist,
	Artist,
	Conductor,
	Band,
	Composer,
	Lyricist,
	RecordingLocation,
	DuringRecording,
	DuringPerformance,
	ScreenCapture,
	BrightFish,
	Illustration,
	BandLogo,
	PublisherLogo,
}

impl PictureType {
	/// Get the picture type code
	pub fn as_u32(self) -> u32 {
		match self {
			Self::Other => 0,
			Self::Icon => 1,
			Self::OtherIcon => 2,
			Self::CoverFront => 3,
			Self::CoverBack => 4,
			Self::Leaflet => 5,
			Self::Media => 6,
			Self::LeadArtist => 7,
			Self::Artist => 8,
			Self::Conductor => 9,
			Self::Band => 10,
			Self::Composer => 11,
			Self::Lyricist => 12,
			Self::RecordingLocation => 13,
			Self::DuringRecording => 14,
			Self::DuringPerformance => 15,
			Self::ScreenCapture => 16,
			Self::BrightFish => 17,
			Self::Illustration => 18,
			Self::BandLogo => 19,
			Self::PublisherLogo => 20,
		}
	}

	/// Get a `PictureType` from its code, must be 0-20 inclusive
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::picture::PictureType;
	///
	/// assert_eq!(PictureType::from_u32(3), Some(PictureType::CoverFront));
	/// assert_eq!(PictureType::from_u32(255), None);
	/// ```
	pub fn from_u32(code: u32) -> Option<Self> {
		let ty = match code {
			0 => Self::Other,
			1 => Self::Icon,
			2 => Self::OtherIcon,
			3 => Self::CoverFront,
			4 => Self::CoverBack,
			5 => Self::Leaflet,
			6 => Self::Media,
			7 => Self::LeadArtist,
			8 => Self::Artist,
			9 => Self::Conductor,
			10 => Self::Band,
			11 => Self::Composer,
			12 => Self::Lyricist,
			13 => Self::RecordingLocation,
			14 => Self::DuringRecording,
			15 => Self::DuringPerformance,
			16 => Self::ScreenCapture,
			17 => Self::BrightFish,
			18 => Self::Illustration,
			19 => Self::BandLogo,
			20 => Self::PublisherLogo,
			_ => return None,
		};

		Some(ty)
	}
}

/// Information about a [`Picture`]
///
/// This information is necessary for FLAC's `METADATA_BLOCK_PICTURE`.
/// See [`Picture::as_flac_bytes`] for more information.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct PictureInformation {
	/// The picture's width in pixels
	pub width: u32,
	/// The picture's height in pixels
	pub height: u32,
	/// The picture's color depth in bits per pixel
	pub color_depth: u32,
	/// The number of colors used
	pub num_colors: u32,
}

impl PictureInformation {
	/// Attempt to extract [`PictureInformation`] from an image
	///
	/// The format is guessed from the data, and only the image header is decoded.
	///
	/// # Errors
	///
	/// * The format of `data` is unknown, or not supported
	/// * The image header is invalid
	///
	/// # Examples
	///
	/// ```rust,no_run
	/// use oggtag::picture::PictureInformation;
	///
	/// # fn main() -> oggtag::error::Result<()> {
	/// let png_data = std::fs::read("cover.png")?;
	///
	/// let information = PictureInformation::from_image(&png_data)?;
	/// println!("{}x{}", information.width, information.height);
	/// # Ok(()) }
	/// ```
	pub fn from_image(data: &[u8]) -> Result<Self> {
		let decoder = ImageReader::new(Cursor::new(data))
			.with_guessed_format()?
			.into_decoder()?;

		let (width, height) = decoder.dimensions();
		Ok(Self {
			width,
			height,
			color_depth: u32::from(decoder.color_type().bits_per_pixel()),
			num_colors: 0,
		})
	}
}

/// Builder for a [`Picture`]
///
/// This is created through [`Picture::unchecked()`].
pub struct PictureBuilder {
	pic_type: PictureType,
	mime_type: Option<MimeType>,
	description: Option<Cow<'static, str>>,
	data: Cow<'static, [u8]>,
}

impl PictureBuilder {
	fn new(data: Cow<'static, [u8]>) -> Self {
		Self {
			pic_type: PictureType::Other,
			mime_type: None,
			description: None,
			data,
		}
	}

	/// Set the [`PictureType`] for this picture
	pub fn pic_type(mut self, pic_type: PictureType) -> Self {
		self.pic_type = pic_type;
		self
	}

	/// Set the [`MimeType`] for this picture
	pub fn mime_type(mut self, mime_type: MimeType) -> Self {
		self.mime_type = Some(mime_type);
		self
	}

	/// Set the description for this picture
	pub fn description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
		self.description = Some(description.into());
		self
	}

	/// Convert this builder into a [`Picture`]
	pub fn build(self) -> Picture {
		self.into()
	}
}

impl From<PictureBuilder> for Picture {
	fn from(builder: PictureBuilder) -> Self {
		Self {
			pic_type: builder.pic_type,
			mime_type: builder.mime_type,
			description: builder.description,
			data: builder.data,
		}
	}
}

/// Represents a picture.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Picture {
	/// The picture type according to ID3v2 APIC
	pub(crate) pic_type: PictureType,
	/// The picture's mimetype
	pub(crate) mime_type: Option<MimeType>,
	/// The picture's description
	pub(crate) description: Option<Cow<'static, str>>,
	/// The binary data of the picture
	pub(crate) data: Cow<'static, [u8]>,
}

impl Debug for Picture {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Picture")
			.field("pic_type", &self.pic_type)
			.field("mime_type", &self.mime_type)
			.field("description", &self.description)
			.field("data", &format!("<{} bytes>", self.data.len()))
			.finish()
	}
}

impl Picture {
	/// Create a [`Picture`] from a reader
	///
	/// NOTES:
	///
	/// * This is for reading picture data only, from a [`File`](std::fs::File) for example.
	/// * `pic_type` will always be [`PictureType::Other`], be sure to change it accordingly if
	///   writing.
	///
	/// # Errors
	///
	/// * `reader` contains less than 8 bytes
	/// * `reader` does not contain a supported format. See [`MimeType`] for valid formats
	pub fn from_reader<R>(reader: &mut R) -> Result<Self>
	where
		R: Read,
	{
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;

		if data.len() < 8 {
			err!(NotAPicture);
		}

		let mime_type = Self::mimetype_from_bin(&data[..8])?;

		Ok(Self {
			pic_type: PictureType::Other,
			mime_type: Some(mime_type),
			description: None,
			data: data.into(),
		})
	}

	/// Create a new `Picture` with no verification
	///
	/// This will **not** verify `data`'s signature.
	///
	/// This should only be used if all data has been verified beforehand.
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::picture::{MimeType, Picture, PictureType};
	///
	/// let picture = Picture::unchecked(vec![0xFF, 0xD8, 0xFF, 0xD9])
	/// 	.pic_type(PictureType::Band)
	/// 	.mime_type(MimeType::Jpeg)
	/// 	.description("The band on stage")
	/// 	.build();
	///
	/// assert_eq!(picture.description(), Some("The band on stage"));
	/// ```
	pub fn unchecked(data: Vec<u8>) -> PictureBuilder {
		PictureBuilder::new(Cow::Owned(data))
	}

	/// Create front cover art from an image
	///
	/// JPEG data is used as-is. Any other format supported by the `image` crate is decoded and
	/// re-encoded as a JPEG, dropping its alpha channel.
	///
	/// The picture will have the type [`PictureType::CoverFront`], the MIME type `image/jpeg`,
	/// and the description [`DEFAULT_COVER_DESCRIPTION`]. The color depth is always 24 and the
	/// number of colors 0.
	///
	/// # Errors
	///
	/// * The format of `data` is unknown, or not supported
	/// * `data` cannot be decoded, or re-encoded as a JPEG
	pub fn front_cover(data: Vec<u8>) -> Result<(Self, PictureInformation)> {
		let format = image::guess_format(&data)?;

		let (data, width, height) = if format == ImageFormat::Jpeg {
			let PictureInformation { width, height, .. } = PictureInformation::from_image(&data)?;
			(data, width, height)
		} else {
			log::debug!("Picture: Converting {format:?} cover art to JPEG");

			let decoded = image::load_from_memory_with_format(&data, format)?;

			let mut jpeg = Vec::new();
			DynamicImage::ImageRgb8(decoded.to_rgb8())
				.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)?;

			(jpeg, decoded.width(), decoded.height())
		};

		let picture = Self::unchecked(data)
			.pic_type(PictureType::CoverFront)
			.mime_type(MimeType::Jpeg)
			.description(DEFAULT_COVER_DESCRIPTION)
			.build();

		let information = PictureInformation {
			width,
			height,
			color_depth: 24,
			num_colors: 0,
		};

		Ok((picture, information))
	}

	/// Returns the [`PictureType`]
	pub fn pic_type(&self) -> PictureType {
		self.pic_type
	}

	/// Sets the [`PictureType`]
	pub fn set_pic_type(&mut self, pic_type: PictureType) {
		self.pic_type = pic_type
	}

	/// Returns the [`MimeType`]
	pub fn mime_type(&self) -> Option<&MimeType> {
		self.mime_type.as_ref()
	}

	fn mime_str(&self) -> &str {
		match self.mime_type.as_ref() {
			Some(mime_type) => mime_type.as_str(),
			None => "",
		}
	}

	/// Returns the description
	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	/// Sets the description
	pub fn set_description(&mut self, description: Option<String>) {
		self.description = description.map(Cow::from);
	}

	/// Returns the [`Picture`] data as borrowed bytes.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Consumes a [`Picture`], returning the data as [`Vec`] without clones or allocation.
	pub fn into_data(self) -> Vec<u8> {
		self.data.into_owned()
	}

	/// Convert a [`Picture`] to a FLAC `METADATA_BLOCK_PICTURE`
	///
	/// Use `encode` to convert the picture to a base64 encoded String ([RFC 4648 §4](http://www.faqs.org/rfcs/rfc4648.html))
	///
	/// All integers are stored big endian:
	///
	/// | Field            | Size           |
	/// |------------------|----------------|
	/// | Picture type     | 4              |
	/// | MIME type length | 4              |
	/// | MIME type        | length         |
	/// | Description len  | 4              |
	/// | Description      | length (UTF-8) |
	/// | Width            | 4              |
	/// | Height           | 4              |
	/// | Color depth      | 4              |
	/// | Colors used      | 4              |
	/// | Data length      | 4              |
	/// | Data             | length         |
	///
	/// NOTES:
	///
	/// * This does not include a key
	/// * When writing to Vorbis comments, the data **must** be base64 encoded
	pub fn as_flac_bytes(&self, picture_information: PictureInformation, encode: bool) -> Vec<u8> {
		let mut data = Vec::<u8>::new();

		let mime_str = self.mime_str();
		let mime_len = mime_str.len() as u32;

		data.extend(self.pic_type.as_u32().to_be_bytes());
		data.extend(mime_len.to_be_bytes());
		data.extend(mime_str.as_bytes());

		if let Some(desc) = &self.description {
			let desc_len = desc.len() as u32;

			data.extend(desc_len.to_be_bytes());
			data.extend(desc.as_bytes());
		} else {
			data.extend([0; 4]);
		}

		data.extend(picture_information.width.to_be_bytes());
		data.extend(picture_information.height.to_be_bytes());
		data.extend(picture_information.color_depth.to_be_bytes());
		data.extend(picture_information.num_colors.to_be_bytes());

		let pic_data = &self.data;
		let pic_data_len = pic_data.len() as u32;

		data.extend(pic_data_len.to_be_bytes());
		data.extend(pic_data.iter());

		if encode {
			BASE64.encode(&data).into_bytes()
		} else {
			data
		}
	}

	/// Get a [`Picture`] from FLAC `METADATA_BLOCK_PICTURE` bytes:
	///
	/// NOTE: This takes both the base64 encoded string from Vorbis comments, and
	/// the raw block data, specified with `encoded`.
	///
	/// # Errors
	///
	/// * [`InvalidPictureType`](ErrorKind::InvalidPictureType) if the picture type is not within 0-20,
	///   regardless of `parse_mode`
	/// * [`SizeMismatch`](ErrorKind::SizeMismatch) if a length runs past the end of the block
	/// * [`NotAPicture`](ErrorKind::NotAPicture) if at any other point it's unable to parse the data
	///
	/// # Examples
	///
	/// ```rust
	/// use oggtag::config::ParsingMode;
	/// use oggtag::picture::{MimeType, Picture, PictureInformation, PictureType};
	///
	/// # fn main() -> oggtag::error::Result<()> {
	/// let picture = Picture::unchecked(vec![1, 2, 3])
	/// 	.pic_type(PictureType::CoverBack)
	/// 	.mime_type(MimeType::Png)
	/// 	.build();
	///
	/// let bytes = picture.as_flac_bytes(PictureInformation::default(), true);
	///
	/// let (read, _) = Picture::from_flac_bytes(&bytes, true, ParsingMode::Strict)?;
	/// assert_eq!(read, picture);
	/// # Ok(()) }
	/// ```
	pub fn from_flac_bytes(
		bytes: &[u8],
		encoded: bool,
		parse_mode: ParsingMode,
	) -> Result<(Self, PictureInformation)> {
		if encoded {
			let data = BASE64
				.decode(bytes)
				.map_err(|_| OggTagError::new(ErrorKind::NotAPicture))?;
			Self::from_flac_bytes_inner(&data, parse_mode)
		} else {
			Self::from_flac_bytes_inner(bytes, parse_mode)
		}
	}

	fn from_flac_bytes_inner(
		content: &[u8],
		parse_mode: ParsingMode,
	) -> Result<(Self, PictureInformation)> {
		// Eight 32-bit fields, with every string and the data being empty
		const MIN_SIZE: usize = 32;

		if content.len() < MIN_SIZE {
			err!(NotAPicture);
		}

		let reader = &mut &content[..];

		let pic_ty = reader.read_u32::<BigEndian>()?;
		let Some(pic_type) = PictureType::from_u32(pic_ty) else {
			err!(InvalidPictureType(pic_ty));
		};

		let mime_type_bytes = read_sized(reader)?;
		let mime_type_str = utf8_decode_str(mime_type_bytes)?;

		let description_bytes = read_sized(reader)?;
		let description = match utf8_decode_str(description_bytes) {
			Ok("") => None,
			Ok(desc) => Some(Cow::Owned(desc.to_owned())),
			Err(e) => {
				if parse_mode == ParsingMode::Strict {
					return Err(e);
				}

				log::warn!("Picture description is not valid UTF-8, discarding");
				None
			},
		};

		let width = reader.read_u32::<BigEndian>()?;
		let height = reader.read_u32::<BigEndian>()?;
		let color_depth = reader.read_u32::<BigEndian>()?;
		let num_colors = reader.read_u32::<BigEndian>()?;

		let data_len = reader.read_u32::<BigEndian>()? as usize;
		if data_len > reader.len() {
			err!(SizeMismatch);
		}

		let mut data = try_vec![0; data_len];
		reader.read_exact(&mut data)?;

		if !reader.is_empty() {
			log::warn!(
				"Picture block has {} trailing bytes, discarding",
				reader.len()
			);
		}

		let mime_type = if mime_type_str.is_empty() {
			None
		} else {
			Some(MimeType::from_str(mime_type_str))
		};

		Ok((
			Self {
				pic_type,
				mime_type,
				description,
				data: Cow::from(data),
			},
			PictureInformation {
				width,
				height,
				color_depth,
				num_colors,
			},
		))
	}

	pub(crate) fn mimetype_from_bin(bytes: &[u8]) -> Result<MimeType> {
		match bytes {
			[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Ok(MimeType::Png),
			[0xFF, 0xD8, ..] => Ok(MimeType::Jpeg),
			[b'G', b'I', b'F', 0x38, 0x37 | 0x39, b'a', ..] => Ok(MimeType::Gif),
			_ => err!(NotAPicture),
		}
	}
}

// A big endian u32 length, followed by that many bytes
fn read_sized<'a>(reader: &mut &'a [u8]) -> Result<&'a [u8]> {
	let len = reader.read_u32::<BigEndian>()? as usize;
	if len > reader.len() {
		err!(SizeMismatch);
	}

	let (content, remaining) = reader.split_at(len);
	*reader = remaining;

	Ok(content)
}
