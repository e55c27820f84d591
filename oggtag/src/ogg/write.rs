use super::OggFormat;
use super::read::read_vorbis_comments;
use super::rewrite::rewrite;
use super::tag::VorbisComments;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::macros::{encode_err, err};
use crate::ogg::constants::{DEFAULT_VENDOR, PICTURE_KEY};
use crate::picture::{Picture, PictureInformation};
use crate::tag::Tag;

use std::fs::{File, Permissions};
use std::io::{BufReader, BufWriter, Cursor, IntoInnerError, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use tempfile::NamedTempFile;

/// Create a comment header packet
///
/// The packet starts with the comment signature of `format`, followed by the vendor string,
/// every item and every picture (as a base64 encoded `METADATA_BLOCK_PICTURE`). Items with
/// empty values are skipped. For OGG Vorbis, the packet ends with a framing bit.
///
/// # Errors
///
/// * An item is too large to be stored
///
/// # Examples
///
/// ```rust
/// use oggtag::ogg::{OggFormat, VorbisComments, create_metadata_packet};
///
/// # fn main() -> oggtag::error::Result<()> {
/// let mut comments = VorbisComments::with_vendor("oggtag");
/// comments.push(String::from("TITLE"), String::from("Foo"));
///
/// let packet = create_metadata_packet(&comments, OggFormat::Opus)?;
/// assert!(packet.starts_with(b"OpusTags"));
/// # Ok(()) }
/// ```
pub fn create_metadata_packet(tag: &VorbisComments, format: OggFormat) -> Result<Vec<u8>> {
	let mut new_comment_packet = Cursor::new(Vec::new());

	let vendor_bytes = tag.vendor.as_bytes();
	let Ok(vendor_len) = u32::try_from(vendor_bytes.len()) else {
		err!(TooMuchData);
	};

	new_comment_packet.write_all(format.comment_signature())?;
	new_comment_packet.write_u32::<LittleEndian>(vendor_len)?;
	new_comment_packet.write_all(vendor_bytes)?;

	// Zero out the item count for later
	let item_count_pos = new_comment_packet.stream_position()?;
	new_comment_packet.write_u32::<LittleEndian>(0)?;

	let mut count = 0;
	create_comments(&mut new_comment_packet, &mut count, tag.items())?;
	create_pictures(&mut new_comment_packet, &mut count, tag.pictures())?;

	// Seek back and write the item count
	new_comment_packet.seek(SeekFrom::Start(item_count_pos))?;
	new_comment_packet.write_u32::<LittleEndian>(count)?;

	if format.has_framing_bit() {
		// https://xiph.org/vorbis/doc/Vorbis_I_spec.html#x1-590004
		new_comment_packet.get_mut().push(1);
	}

	Ok(new_comment_packet.into_inner())
}

fn create_comments<'a>(
	packet: &mut impl Write,
	count: &mut u32,
	items: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<()> {
	for (k, v) in items {
		if v.is_empty() {
			continue;
		}

		let comment = format!("{k}={v}");
		let comment_bytes = comment.as_bytes();

		let Ok(bytes_len) = u32::try_from(comment_bytes.len()) else {
			err!(TooMuchData);
		};

		*count += 1;

		packet.write_u32::<LittleEndian>(bytes_len)?;
		packet.write_all(comment_bytes)?;
	}

	Ok(())
}

fn create_pictures(
	packet: &mut impl Write,
	count: &mut u32,
	pictures: &[(Picture, PictureInformation)],
) -> Result<()> {
	for (pic, info) in pictures {
		let picture = pic.as_flac_bytes(*info, true);

		// KEY=VALUE
		let Ok(bytes_len) = u32::try_from(PICTURE_KEY.len() + 1 + picture.len()) else {
			err!(TooMuchData);
		};

		*count += 1;

		packet.write_u32::<LittleEndian>(bytes_len)?;
		packet.write_all(PICTURE_KEY.as_bytes())?;
		packet.write_u8(b'=')?;
		packet.write_all(&picture)?;
	}

	Ok(())
}

/// Build the comments written for `tag`
///
/// Fields are always written in the same order, the cover art (if any) last.
pub(crate) fn create_vorbis_comments(
	tag: &Tag,
	format: OggFormat,
	write_options: WriteOptions,
	vendor: String,
) -> VorbisComments {
	let mut comments = VorbisComments::with_vendor(vendor);

	let fields = [
		("ALBUM", tag.album()),
		("ARTIST", tag.artist()),
		("GENRE", tag.genre()),
		("TITLE", tag.title()),
		("DATE", tag.date()),
		("ALBUMARTIST", tag.album_artist()),
	];

	for (key, value) in fields {
		if let Some(value) = value {
			comments.push(String::from(key), value.to_owned());
		}
	}

	if format.supports_comment_field() {
		if let Some(comment) = tag.comment() {
			comments.push(String::from("COMMENT"), comment.to_owned());
		}
	}

	if !write_options.write_cover_art {
		return comments;
	}

	if let Some(picture) = tag.picture() {
		match Picture::front_cover(picture.data().to_vec()) {
			Ok((cover, information)) => comments.push_picture(cover, information),
			Err(e) => log::warn!("Unable to decode the cover art, not writing it: {e}"),
		}
	}

	comments
}

/// Write a [`Tag`] to the file at [`Tag::path`] as OGG Vorbis comments
///
/// The file is written in two passes. The first strips the existing comment header down to its
/// vendor string, the second writes the new fields. Both passes write to temporary files in the
/// same directory as the target, which is only replaced once, by renaming the final file over it.
/// On any error, the original file is left untouched.
///
/// The vendor string is [`DEFAULT_VENDOR`], unless [`WriteOptions::preserve_vendor`] is set.
///
/// # Errors
///
/// * The tag has no path
/// * The file is not a valid OGG Vorbis stream
/// * [`std::io::Error`] while writing
/// * The temporary file cannot be moved over the original
pub fn save_vorbis(tag: &Tag, write_options: WriteOptions) -> Result<()> {
	save_tags(tag, OggFormat::Vorbis, write_options)
}

/// Write a [`Tag`] to the file at [`Tag::path`] as OGG Opus comments
///
/// This is the same as [`save_vorbis`], except the `COMMENT` field is not written.
///
/// # Errors
///
/// See [`save_vorbis`]
pub fn save_opus(tag: &Tag, write_options: WriteOptions) -> Result<()> {
	save_tags(tag, OggFormat::Opus, write_options)
}

pub(crate) fn save_tags(tag: &Tag, format: OggFormat, write_options: WriteOptions) -> Result<()> {
	let Some(path) = tag.path() else {
		encode_err!(@BAIL "Tag has no associated file path");
	};

	let vendor = if write_options.preserve_vendor {
		let mut reader = BufReader::new(File::open(path)?);
		let (_, comments) =
			read_vorbis_comments(&mut reader, ParseOptions::new().read_cover_art(false))?;
		comments.vendor
	} else {
		String::from(DEFAULT_VENDOR)
	};

	let cleared_packet =
		create_metadata_packet(&VorbisComments::with_vendor(vendor.clone()), format)?;
	let comments = create_vorbis_comments(tag, format, write_options, vendor);
	let filled_packet = create_metadata_packet(&comments, format)?;

	let dir = parent_dir(path);
	let original = File::open(path)?;
	let permissions = original.metadata()?.permissions();

	log::debug!("OGG: Clearing comments of {}", path.display());
	let mut writer = BufWriter::new(tempfile::tempfile_in(dir)?);
	rewrite(&mut BufReader::new(original), &mut writer, format, &cleared_packet)?;

	let mut cleared = writer.into_inner().map_err(IntoInnerError::into_error)?;
	cleared.rewind()?;

	log::debug!("OGG: Writing {} field(s) to {}", comments.len(), path.display());
	let mut writer = BufWriter::new(NamedTempFile::new_in(dir)?);
	rewrite(&mut BufReader::new(cleared), &mut writer, format, &filled_packet)?;

	replace_original(writer, permissions, path)
}

/// Remove all fields from the comment header of a file
///
/// Only the vendor string remains, set to [`DEFAULT_VENDOR`]. As with [`save_vorbis`] and
/// [`save_opus`], the file is replaced atomically.
///
/// # Errors
///
/// * `path` does not exist
/// * The file is not a valid OGG stream of `format`
/// * [`std::io::Error`] while writing
/// * The temporary file cannot be moved over the original
///
/// # Examples
///
/// ```rust,no_run
/// use oggtag::ogg::{OggFormat, clear_tags};
///
/// # fn main() -> oggtag::error::Result<()> {
/// clear_tags("foo.ogg", OggFormat::Vorbis)?;
/// # Ok(()) }
/// ```
pub fn clear_tags<P>(path: P, format: OggFormat) -> Result<()>
where
	P: AsRef<Path>,
{
	let path = path.as_ref();

	let cleared_packet =
		create_metadata_packet(&VorbisComments::with_vendor(DEFAULT_VENDOR), format)?;

	let original = File::open(path)?;
	let permissions = original.metadata()?.permissions();

	let mut writer = BufWriter::new(NamedTempFile::new_in(parent_dir(path))?);
	rewrite(&mut BufReader::new(original), &mut writer, format, &cleared_packet)?;

	replace_original(writer, permissions, path)
}

// The temporary file has to be on the same filesystem for the rename to be atomic
fn parent_dir(path: &Path) -> &Path {
	match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	}
}

fn replace_original(
	writer: BufWriter<NamedTempFile>,
	permissions: Permissions,
	path: &Path,
) -> Result<()> {
	let file = writer.into_inner().map_err(IntoInnerError::into_error)?;

	file.as_file().sync_all()?;
	file.as_file().set_permissions(permissions)?;
	file.persist(path)?;

	Ok(())
}
