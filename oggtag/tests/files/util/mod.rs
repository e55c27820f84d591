use oggtag::ogg::{OggFormat, VorbisComments, create_metadata_packet};

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use ogg_pager::{Demuxer, Muxer, Page};

pub const STREAM_SERIAL: u32 = 1_234_567;

/// A `width`x`height` image, half transparent where the format allows it
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
	let image = RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 128]));
	let image = match format {
		ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image).to_rgb8()),
		_ => DynamicImage::ImageRgba8(image),
	};

	let mut data = Vec::new();
	image.write_to(&mut Cursor::new(&mut data), format).unwrap();
	data
}

/// The identification header for `format`, only the signature is meaningful
pub fn ident_packet(format: OggFormat) -> Vec<u8> {
	let mut packet = format.ident_signature().to_vec();
	packet.extend([0x02, 0x44, 0xAC, 0x00, 0x00]);
	packet.resize(30, 0);
	packet
}

/// A comment header with `vendor` and `fields`, in order
pub fn comment_packet(format: OggFormat, vendor: &str, fields: &[(&str, &str)]) -> Vec<u8> {
	let mut comments = VorbisComments::with_vendor(vendor);
	for (key, value) in fields {
		comments.push(String::from(*key), String::from(*value));
	}

	create_metadata_packet(&comments, format).unwrap()
}

/// Build a minimal stream, with every page holding distinct content
///
/// * Vorbis: identification | comment + setup | audio | audio (EOS)
/// * Opus: identification | comment | audio | audio (EOS)
pub fn stream(format: OggFormat, comment: &[u8]) -> Vec<u8> {
	let mut muxer = Muxer::new(STREAM_SERIAL, Vec::new());
	muxer.encode_bos(0, [&ident_packet(format)[..]]).unwrap();

	match format {
		OggFormat::Vorbis => {
			let setup = b"\x05vorbis setup header";
			muxer.encode(0, [comment, &setup[..]]).unwrap();
		},
		OggFormat::Opus => {
			muxer.encode(0, [comment]).unwrap();
		},
	}

	let audio = (0..=255).collect::<Vec<u8>>();
	muxer.encode(960, [&audio[..100], &audio[100..]]).unwrap();
	muxer.encode_eos(1920, [&audio[..10]]).unwrap();

	muxer.into_inner()
}

/// Write `content` to a new file in `dir`
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, content).unwrap();
	path
}

/// Read every page, verifying the checksums
pub fn read_pages(stream: &[u8]) -> Vec<Page> {
	let reader = &mut &stream[..];

	let mut pages = Vec::new();
	while let Some(page) = Page::read(reader).unwrap() {
		pages.push(page);
	}

	pages
}

/// Read every packet of the stream
pub fn read_packets(stream: &[u8]) -> Vec<Vec<u8>> {
	let mut demuxer = Demuxer::new();
	let reader = &mut &stream[..];

	let mut packets = Vec::new();
	while let Some(page) = demuxer.read_page(reader).unwrap() {
		packets.extend(page.into_packets());
	}

	packets
}
