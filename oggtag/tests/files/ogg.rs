use crate::util::{comment_packet, encoded_image, read_packets, read_pages, stream, write_file};
use oggtag::Tag;
use oggtag::config::{ParseOptions, WriteOptions};
use oggtag::error::ErrorKind;
use oggtag::ogg::{
	OggFormat, VorbisComments, clear_tags, create_metadata_packet, read_vorbis_comments,
};
use oggtag::picture::{MimeType, Picture, PictureInformation, PictureType};

use std::path::Path;

use image::ImageFormat;
use ogg_pager::PageError;

fn read_comments(path: &Path) -> (OggFormat, oggtag::ogg::VorbisComments) {
	let mut file = std::fs::File::open(path).unwrap();
	read_vorbis_comments(&mut file, ParseOptions::new()).unwrap()
}

fn set_fields(tag: &mut Tag) {
	tag.set_artist(String::from("A"));
	tag.set_album(String::from("B"));
	tag.set_title(String::from("C"));
	tag.set_genre(String::from("D"));
	tag.set_date(String::from("2024"));
	tag.set_album_artist(String::from("E"));
}

fn verify_fields(tag: &Tag) {
	assert_eq!(tag.artist(), Some("A"));
	assert_eq!(tag.album(), Some("B"));
	assert_eq!(tag.title(), Some("C"));
	assert_eq!(tag.genre(), Some("D"));
	assert_eq!(tag.date(), Some("2024"));
	assert_eq!(tag.album_artist(), Some("E"));
}

#[test_log::test]
fn vorbis_read() {
	let dir = tempfile::tempdir().unwrap();
	let comment = comment_packet(
		OggFormat::Vorbis,
		"Xiph.Org libVorbis I 20200704 (Reducing Environment)",
		&[("TITLE", "Foo title"), ("ARTIST", "Bar artist"), ("COMMENT", "Baz")],
	);
	let path = write_file(dir.path(), "test.ogg", &stream(OggFormat::Vorbis, &comment));

	let tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	assert_eq!(tag.format(), Some(OggFormat::Vorbis));
	assert_eq!(tag.path(), Some(path.as_path()));
	assert_eq!(tag.title(), Some("Foo title"));
	assert_eq!(tag.artist(), Some("Bar artist"));
	assert_eq!(tag.comment(), Some("Baz"));
	assert!(tag.picture().is_none());

	let (_, comments) = read_comments(&path);
	assert_eq!(
		comments.vendor(),
		"Xiph.Org libVorbis I 20200704 (Reducing Environment)"
	);
}

#[test_log::test]
fn opus_read() {
	let comment = comment_packet(OggFormat::Opus, "libopus 1.3", &[("ALBUM", "Foo album")]);
	let content = stream(OggFormat::Opus, &comment);

	let tag = oggtag::read_from(&mut &content[..], ParseOptions::new()).unwrap();
	assert_eq!(tag.format(), Some(OggFormat::Opus));
	assert_eq!(tag.album(), Some("Foo album"));
	assert!(tag.path().is_none());
}

#[test_log::test]
fn vorbis_write() {
	let dir = tempfile::tempdir().unwrap();
	let comment = comment_packet(OggFormat::Vorbis, "vendor", &[("TITLE", "Old title")]);
	let path = write_file(dir.path(), "test.ogg", &stream(OggFormat::Vorbis, &comment));

	let mut tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	assert_eq!(tag.title(), Some("Old title"));

	set_fields(&mut tag);
	tag.set_comment(String::from("Comment"));
	tag.save(WriteOptions::default()).unwrap();

	let tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	verify_fields(&tag);
	assert_eq!(tag.comment(), Some("Comment"));

	let (format, comments) = read_comments(&path);
	assert_eq!(format, OggFormat::Vorbis);
	assert_eq!(comments.vendor(), "oggtag");
	assert_eq!(
		comments.items().collect::<Vec<_>>(),
		vec![
			("ALBUM", "B"),
			("ARTIST", "A"),
			("GENRE", "D"),
			("TITLE", "C"),
			("DATE", "2024"),
			("ALBUMARTIST", "E"),
			("COMMENT", "Comment"),
		]
	);
}

#[test_log::test]
fn opus_write() {
	let dir = tempfile::tempdir().unwrap();
	let comment = comment_packet(OggFormat::Opus, "libopus 1.3", &[]);
	let path = write_file(dir.path(), "test.opus", &stream(OggFormat::Opus, &comment));

	let mut tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	set_fields(&mut tag);
	tag.set_comment(String::from("Not written"));
	tag.save(WriteOptions::default()).unwrap();

	let tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	assert_eq!(tag.format(), Some(OggFormat::Opus));
	verify_fields(&tag);
	assert_eq!(tag.comment(), None);

	let (_, comments) = read_comments(&path);
	assert_eq!(comments.items().len(), 6);
}

#[test_log::test]
fn write_picture() {
	let dir = tempfile::tempdir().unwrap();
	let comment = comment_packet(OggFormat::Vorbis, "vendor", &[]);
	let path = write_file(dir.path(), "test.ogg", &stream(OggFormat::Vorbis, &comment));

	let jpeg = encoded_image(3, 2, ImageFormat::Jpeg);

	let mut tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	tag.set_picture(Picture::from_reader(&mut &jpeg[..]).unwrap());
	tag.save(WriteOptions::default()).unwrap();

	let tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	let picture = tag.picture().unwrap();
	assert_eq!(picture.pic_type(), PictureType::CoverFront);
	assert_eq!(picture.mime_type(), Some(&MimeType::Jpeg));
	assert_eq!(picture.mime_type().and_then(MimeType::ext), Some("jpg"));
	assert_eq!(picture.description(), Some("Cover"));
	assert_eq!(picture.data(), jpeg.as_slice());

	let (_, comments) = read_comments(&path);
	let (_, information) = &comments.pictures()[0];
	assert_eq!(information.width, 3);
	assert_eq!(information.height, 2);
	assert_eq!(information.color_depth, 24);
	assert_eq!(information.num_colors, 0);

	// Pictures can be skipped entirely
	let tag = oggtag::read_from_path(&path, ParseOptions::new().read_cover_art(false)).unwrap();
	assert!(tag.picture().is_none());

	let mut tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	tag.save(WriteOptions::new().write_cover_art(false)).unwrap();

	let (_, comments) = read_comments(&path);
	assert!(comments.pictures().is_empty());
}

#[test_log::test]
fn png_picture_kept_on_save() {
	let dir = tempfile::tempdir().unwrap();

	let png = Picture::from_reader(&mut &encoded_image(4, 3, ImageFormat::Png)[..]).unwrap();
	assert_eq!(png.mime_type(), Some(&MimeType::Png));

	let mut comments = VorbisComments::with_vendor("vendor");
	comments.push(String::from("TITLE"), String::from("Title"));
	comments.push_picture(png.clone(), PictureInformation::default());
	let comment = create_metadata_packet(&comments, OggFormat::Opus).unwrap();
	let path = write_file(dir.path(), "test.opus", &stream(OggFormat::Opus, &comment));

	let tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	assert_eq!(tag.picture(), Some(&png));
	tag.save(WriteOptions::default()).unwrap();

	// Converted to a JPEG front cover
	let tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	assert_eq!(tag.title(), Some("Title"));
	let picture = tag.picture().unwrap().clone();
	assert_eq!(picture.pic_type(), PictureType::CoverFront);
	assert_eq!(picture.mime_type(), Some(&MimeType::Jpeg));
	assert!(picture.data().starts_with(&[0xFF, 0xD8, 0xFF]));

	let (_, comments) = read_comments(&path);
	let (_, information) = &comments.pictures()[0];
	assert_eq!((information.width, information.height), (4, 3));
	assert_eq!(information.color_depth, 24);

	// Saving again keeps the JPEG as is
	tag.save(WriteOptions::default()).unwrap();

	let tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	assert_eq!(tag.picture(), Some(&picture));
}

#[test_log::test]
fn non_comment_pages_preserved() {
	let dir = tempfile::tempdir().unwrap();
	let comment = comment_packet(OggFormat::Vorbis, "vendor", &[("TITLE", "Title")]);
	let original = stream(OggFormat::Vorbis, &comment);
	let path = write_file(dir.path(), "test.ogg", &original);

	let mut tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	tag.set_title(String::from("A different title"));
	tag.save(WriteOptions::default()).unwrap();

	let written = std::fs::read(&path).unwrap();

	let original_pages = read_pages(&original);
	let written_pages = read_pages(&written);
	assert_eq!(original_pages.len(), written_pages.len());

	// Identification header
	assert_eq!(original_pages[0].as_bytes(), written_pages[0].as_bytes());
	// Audio
	for (original, written) in original_pages[2..].iter().zip(&written_pages[2..]) {
		assert_eq!(original.as_bytes(), written.as_bytes());
	}

	// The setup header follows the new comment header
	let original_packets = read_packets(&original);
	let written_packets = read_packets(&written);
	assert_ne!(original_packets[1], written_packets[1]);
	assert_eq!(original_packets[2], written_packets[2]);
}

#[test_log::test]
fn oversized_comment() {
	let dir = tempfile::tempdir().unwrap();
	let comment = comment_packet(OggFormat::Vorbis, "oggtag", &[]);
	let original = stream(OggFormat::Vorbis, &comment);
	let path = write_file(dir.path(), "test.ogg", &original);

	// Too large for a single page
	let large = "x".repeat(150_000);

	let mut tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	tag.set_comment(large.clone());
	tag.save(WriteOptions::default()).unwrap();

	let written = std::fs::read(&path).unwrap();
	let written_pages = read_pages(&written);
	assert_eq!(written_pages.len(), read_pages(&original).len() + 2);

	for (i, page) in written_pages.iter().enumerate() {
		assert_eq!(page.header().sequence_number, i as u32);
	}
	assert!(written_pages.last().unwrap().header().is_last_page());

	let tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	assert_eq!(tag.comment(), Some(large.as_str()));

	// Shrinking it again restores the original layout
	let mut tag = tag;
	tag.remove_comment();
	tag.save(WriteOptions::new().preserve_vendor(true)).unwrap();

	assert_eq!(std::fs::read(&path).unwrap(), original);

	let original_packets = read_packets(&original);
	let written_packets = read_packets(&std::fs::read(&path).unwrap());
	assert_eq!(original_packets[2..], written_packets[2..]);
}

#[test_log::test]
fn preserve_vendor() {
	let dir = tempfile::tempdir().unwrap();
	let comment = comment_packet(OggFormat::Opus, "libopus 1.3", &[]);
	let path = write_file(dir.path(), "test.opus", &stream(OggFormat::Opus, &comment));

	let mut tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	tag.set_title(String::from("Title"));
	tag.save(WriteOptions::new().preserve_vendor(true)).unwrap();

	let (_, comments) = read_comments(&path);
	assert_eq!(comments.vendor(), "libopus 1.3");

	tag.save(WriteOptions::new()).unwrap();

	let (_, comments) = read_comments(&path);
	assert_eq!(comments.vendor(), "oggtag");
}

#[test_log::test]
fn clear() {
	let dir = tempfile::tempdir().unwrap();
	let comment = comment_packet(
		OggFormat::Vorbis,
		"vendor",
		&[("TITLE", "Title"), ("ARTIST", "Artist")],
	);
	let path = write_file(dir.path(), "test.ogg", &stream(OggFormat::Vorbis, &comment));

	let mut tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	let jpeg = encoded_image(3, 2, ImageFormat::Jpeg);
	tag.set_picture(Picture::from_reader(&mut &jpeg[..]).unwrap());
	tag.save(WriteOptions::default()).unwrap();

	let (_, comments) = read_comments(&path);
	assert_eq!(comments.pictures().len(), 1);

	clear_tags(&path, OggFormat::Vorbis).unwrap();

	let (format, comments) = read_comments(&path);
	assert_eq!(format, OggFormat::Vorbis);
	assert_eq!(comments.vendor(), "oggtag");
	assert!(comments.is_empty());

	let tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	assert!(tag.is_empty());

	// Nothing is left behind
	assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test_log::test]
fn failed_save_leaves_original() {
	let dir = tempfile::tempdir().unwrap();
	let comment = comment_packet(OggFormat::Opus, "libopus 1.3", &[("TITLE", "Title")]);
	let original = stream(OggFormat::Opus, &comment);
	let path = write_file(dir.path(), "test.opus", &original);

	let mut tag = oggtag::read_from_path(&path, ParseOptions::new()).unwrap();
	tag.set_title(String::from("New title"));

	// Not a Vorbis file
	assert!(oggtag::save_vorbis(&tag, WriteOptions::default()).is_err());
	assert!(clear_tags(&path, OggFormat::Vorbis).is_err());

	assert_eq!(std::fs::read(&path).unwrap(), original);
	assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

	// Truncated in the middle of the audio
	let path = write_file(dir.path(), "truncated.opus", &original[..original.len() - 5]);
	tag.set_path(Some(path.clone()));

	assert!(tag.save(WriteOptions::default()).is_err());
	assert_eq!(
		std::fs::read(&path).unwrap(),
		&original[..original.len() - 5]
	);
	assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test_log::test]
fn save_without_path() {
	let mut tag = Tag::new();
	tag.set_format(Some(OggFormat::Vorbis));
	tag.set_title(String::from("Title"));

	let err = tag.save(WriteOptions::default()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FileEncoding(_)));
}

#[test_log::test]
fn unknown_format() {
	let mut muxer = ogg_pager::Muxer::new(1, Vec::new());
	muxer.encode_bos(0, [&b"\x80theora"[..]]).unwrap();
	muxer.encode_eos(0, [&b"\x81theora comments"[..]]).unwrap();
	let content = muxer.into_inner();

	let err = oggtag::read_from(&mut &content[..], ParseOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::UnknownFormat));
}

#[test_log::test]
fn mismatched_headers() {
	// An Opus identification header followed by a Vorbis comment header
	let mut muxer = ogg_pager::Muxer::new(1, Vec::new());
	muxer
		.encode_bos(0, [&crate::util::ident_packet(OggFormat::Opus)[..]])
		.unwrap();
	muxer
		.encode_eos(0, [&comment_packet(OggFormat::Vorbis, "", &[])[..]])
		.unwrap();
	let content = muxer.into_inner();

	let err = oggtag::read_from(&mut &content[..], ParseOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FileDecoding(_)));
}

#[test_log::test]
fn corrupt_page() {
	let comment = comment_packet(OggFormat::Vorbis, "vendor", &[("TITLE", "Title")]);
	let mut content = stream(OggFormat::Vorbis, &comment);

	// Somewhere in the comment header
	let pos = read_pages(&content)[0].as_bytes().len() + 40;
	content[pos] ^= 0xFF;

	let err = oggtag::read_from(&mut &content[..], ParseOptions::new()).unwrap_err();
	assert!(matches!(
		err.kind(),
		ErrorKind::OggPage(PageError::ChecksumMismatch { .. })
	));
}

#[test_log::test]
fn empty_file() {
	let err = oggtag::read_from(&mut std::io::empty(), ParseOptions::new()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::FileDecoding(_)));
}
