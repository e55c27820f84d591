use super::tag::VorbisComments;
use super::{OggFormat, verify_signature};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{ErrorKind, OggTagError, Result};
use crate::macros::{decode_err, err, parse_mode_choice, try_vec};
use crate::ogg::constants::PICTURE_KEY;
use crate::picture::Picture;
use crate::tag::Tag;
use crate::util::text::{utf8_decode, utf8_decode_str, utf16_decode};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use ogg_pager::Demuxer;

pub(crate) fn read_comments<R>(
	data: &mut R,
	mut len: u64,
	parse_options: ParseOptions,
) -> Result<VorbisComments>
where
	R: Read,
{
	let parse_mode = parse_options.parsing_mode;

	let vendor_len = data.read_u32::<LittleEndian>()?;
	if u64::from(vendor_len) > len {
		err!(SizeMismatch);
	}

	let mut vendor_bytes = try_vec![0; vendor_len as usize];
	data.read_exact(&mut vendor_bytes)?;

	len -= u64::from(vendor_len);

	let vendor = match utf8_decode(vendor_bytes) {
		Ok(v) => v,
		Err(e) => {
			if parse_mode == ParsingMode::Strict {
				return Err(e);
			}

			log::warn!("Possibly corrupt vendor string, attempting to recover");

			// Some encoders write a mix of UTF-8 and UTF-16, widening every byte
			// preserves the string where the replacement character would not
			let OggTagError {
				kind: ErrorKind::StringFromUtf8(e),
			} = e
			else {
				return Err(e);
			};
			let s = e
				.as_bytes()
				.iter()
				.map(|c| u16::from(*c))
				.collect::<Vec<_>>();

			match utf16_decode(&s) {
				Ok(v) => {
					log::warn!("Vendor string recovered as: '{v}'");
					v
				},
				Err(_) => decode_err!(@BAIL "OGG: File has an invalid vendor string"),
			}
		},
	};

	let number_of_items = data.read_u32::<LittleEndian>()?;
	// Every field needs at least its 4 byte length
	if u64::from(number_of_items) > (len >> 2) {
		err!(SizeMismatch);
	}

	let mut tag = VorbisComments {
		vendor,
		items: Vec::with_capacity(number_of_items as usize),
		pictures: Vec::new(),
	};

	for _ in 0..number_of_items {
		let comment_len = data.read_u32::<LittleEndian>()?;
		if u64::from(comment_len) > len {
			err!(SizeMismatch);
		}

		let mut comment_bytes = try_vec![0; comment_len as usize];
		data.read_exact(&mut comment_bytes)?;

		len -= u64::from(comment_len);

		// KEY=VALUE
		let mut comment_split = comment_bytes.splitn(2, |b| *b == b'=');

		let Some(key) = comment_split.next() else {
			continue;
		};

		let Some(value) = comment_split.next() else {
			parse_mode_choice!(
				parse_mode,
				STRICT: decode_err!(@BAIL "OGG: Vorbis comments contain a field without a separator"),
				DEFAULT: {
					log::warn!("No separator found in field, discarding");
					continue;
				}
			)
		};

		match key {
			k if k.eq_ignore_ascii_case(PICTURE_KEY.as_bytes()) => {
				if !parse_options.read_cover_art {
					continue;
				}

				match Picture::from_flac_bytes(value, true, parse_mode) {
					Ok(picture) => tag.pictures.push(picture),
					// An unknown picture type is never recoverable
					Err(e) if matches!(e.kind(), ErrorKind::InvalidPictureType(_)) => {
						return Err(e);
					},
					Err(e) => {
						if parse_mode == ParsingMode::Strict {
							return Err(e);
						}

						log::warn!("Failed to decode FLAC picture, discarding field");
						continue;
					},
				}
			},
			k if valid_vorbis_comments_key(k) => {
				let key = utf8_decode_str(k)?.to_owned();

				match utf8_decode_str(value) {
					Ok(value) => tag.items.push((key, value.to_owned())),
					Err(e) => {
						if parse_mode == ParsingMode::Strict {
							return Err(e);
						}

						log::warn!("Non UTF-8 value found, discarding field {key:?}");
						continue;
					},
				}
			},
			_ => {
				parse_mode_choice!(
					parse_mode,
					STRICT: decode_err!(@BAIL "OGG: Vorbis comments contain an invalid key"),
					DEFAULT: log::warn!("Invalid key found, discarding field")
				)
			},
		}
	}

	Ok(tag)
}

pub(super) fn valid_vorbis_comments_key(key: &[u8]) -> bool {
	// The valid range is 0x20..=0x7D not including 0x3D
	!key.is_empty() && key.iter().all(|c| (b' '..=b'}').contains(c) && *c != b'=')
}

/// Read the [`VorbisComments`] of an OGG Vorbis or OGG Opus stream
///
/// The format is determined by the magic signature of the comment header, the second packet of
/// the first logical bitstream. Pages of other bitstreams are skipped.
///
/// # Errors
///
/// * [`ErrorKind::UnknownFormat`] if the second packet is not a Vorbis or Opus comment header
/// * The identification header does not match the format of the comment header
/// * The stream ends before both headers are read
/// * See [`ogg_pager::Demuxer::read_page`]
///
/// # Examples
///
/// ```rust,no_run
/// use oggtag::config::ParseOptions;
/// use oggtag::ogg::{OggFormat, read_vorbis_comments};
/// use std::fs::File;
///
/// # fn main() -> oggtag::error::Result<()> {
/// let mut file = File::open("foo.opus")?;
///
/// let (format, comments) = read_vorbis_comments(&mut file, ParseOptions::new())?;
/// assert_eq!(format, OggFormat::Opus);
/// println!("Vendor: {}", comments.vendor());
/// # Ok(()) }
/// ```
pub fn read_vorbis_comments<R>(
	reader: &mut R,
	parse_options: ParseOptions,
) -> Result<(OggFormat, VorbisComments)>
where
	R: Read,
{
	let mut demuxer = Demuxer::new();
	let mut stream_serial = None;

	// Identification and comment headers
	let mut packets = Vec::with_capacity(2);
	while packets.len() < 2 {
		let Some(page) = demuxer.read_page(reader)? else {
			decode_err!(@BAIL "OGG: Stream ended before the comment header");
		};

		let serial = page.page().header().stream_serial;
		if *stream_serial.get_or_insert(serial) != serial {
			continue;
		}

		packets.extend(page.into_packets());
	}

	let [identification, comment, ..] = packets.as_slice() else {
		decode_err!(@BAIL "OGG: Expected identification and comment packets");
	};

	let Some(format) = OggFormat::from_comment_packet(comment) else {
		err!(UnknownFormat);
	};
	verify_signature(identification, format.ident_signature(), format)?;

	log::debug!("OGG: Found {format:?} comment header ({} bytes)", comment.len());

	let reader = &mut &comment[format.comment_signature().len()..];
	let tag = read_comments(reader, reader.len() as u64, parse_options)?;

	Ok((format, tag))
}

/// Read a [`Tag`] from a reader
///
/// This works for both OGG Vorbis and OGG Opus, see [`read_vorbis_comments`]. The returned [`Tag`]
/// has its format set, but no path.
///
/// # Errors
///
/// See [`read_vorbis_comments`]
///
/// # Examples
///
/// ```rust,no_run
/// use oggtag::config::ParseOptions;
/// use std::fs::File;
///
/// # fn main() -> oggtag::error::Result<()> {
/// let mut file = File::open("foo.ogg")?;
///
/// let tag = oggtag::read_from(&mut file, ParseOptions::new())?;
/// println!("Title: {:?}", tag.title());
/// # Ok(()) }
/// ```
pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Tag>
where
	R: Read,
{
	let (format, comments) = read_vorbis_comments(reader, parse_options)?;

	let mut tag = Tag::from(comments);
	tag.set_format(Some(format));

	Ok(tag)
}

/// Read a [`Tag`] from a path
///
/// This is the same as [`read_from`], except the path is also stored in the [`Tag`], so it can
/// later be saved with [`Tag::save`].
///
/// # Errors
///
/// * `path` does not exist
/// * See [`read_from`]
///
/// # Examples
///
/// ```rust,no_run
/// use oggtag::config::ParseOptions;
///
/// # fn main() -> oggtag::error::Result<()> {
/// let tag = oggtag::read_from_path("foo.opus", ParseOptions::new())?;
/// assert_eq!(tag.path().map(|p| p.to_str()), Some(Some("foo.opus")));
/// # Ok(()) }
/// ```
pub fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Tag>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();
	let mut reader = BufReader::new(File::open(path)?);

	let mut tag = read_from(&mut reader, parse_options)?;
	tag.set_path(Some(path.to_path_buf()));

	Ok(tag)
}
