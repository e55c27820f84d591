use super::OggFormat;
use crate::error::{FileDecodingError, Result};
use crate::macros::decode_err;

use std::io::{Read, Write};

use ogg_pager::{Demuxer, Muxer, Page};

enum State {
	// Looking for the page that completes the comment header
	Seeking,
	// The comment header page left a packet open
	Continuing,
	// Everything else is passed through
	Done,
}

/// Copy an OGG stream, replacing its comment header packet
///
/// The stream is processed one page at a time:
///
/// * The first page, holding the identification header, is passed through.
/// * Pages that do not complete a packet are held back until the comment header is found. Since
///   they can only hold the beginning of the old comment header, they are discarded.
/// * The page completing the comment header is re-encoded with `new_comment_packet` in its place.
///   Any other packets completed on the page follow it, and the page's granule position is kept.
/// * If that page ends in the middle of a packet, the following continuation pages are not
///   copied. Their completed packets are re-encoded instead.
/// * All remaining pages are copied, only their sequence numbers (and checksums) are
///   changed, if the comment header now spans a different number of pages.
///
/// Pages of other logical bitstreams are always copied verbatim.
///
/// # Errors
///
/// * The stream is empty, or its first page ends in the middle of a packet
/// * No comment header with the signature of `format` is found
/// * The stream ends in the middle of a packet following the comment header
/// * See [`Demuxer::read_page`] and [`Muxer::write_page`]
///
/// # Examples
///
/// ```rust,no_run
/// use oggtag::ogg::{OggFormat, VorbisComments, create_metadata_packet, rewrite};
/// use std::fs::File;
/// use std::io::{BufReader, BufWriter};
///
/// # fn main() -> oggtag::error::Result<()> {
/// let mut reader = BufReader::new(File::open("foo.ogg")?);
/// let mut writer = BufWriter::new(File::create("bar.ogg")?);
///
/// let comment_packet =
/// 	create_metadata_packet(&VorbisComments::with_vendor("oggtag"), OggFormat::Vorbis)?;
/// rewrite(&mut reader, &mut writer, OggFormat::Vorbis, &comment_packet)?;
/// # Ok(()) }
/// ```
pub fn rewrite<R, W>(
	reader: &mut R,
	writer: &mut W,
	format: OggFormat,
	new_comment_packet: &[u8],
) -> Result<()>
where
	R: Read,
	W: Write,
{
	let mut demuxer = Demuxer::new();

	let Some(first_page) = demuxer.read_page(reader)? else {
		decode_err!(@BAIL "OGG: Stream is empty");
	};

	let first_page = first_page.page();
	let first_header = first_page.header();
	if first_header.ends_with_open_packet() {
		decode_err!(@BAIL "OGG: Identification header is not alone on the first page");
	}

	let stream_serial = first_header.stream_serial;
	let mut muxer =
		Muxer::new(stream_serial, writer).with_sequence_number(first_header.sequence_number);
	muxer.write_page(first_page)?;

	let mut held_pages: Vec<Page> = Vec::new();
	let mut state = State::Seeking;

	while let Some(demuxed) = demuxer.read_page(reader)? {
		let (page, packets) = demuxed.into_parts();
		let header = page.header();

		if header.stream_serial != stream_serial {
			muxer.write_page(&page)?;
			continue;
		}

		match state {
			State::Seeking => {
				let Some(first_packet) = packets.first() else {
					held_pages.push(page);
					continue;
				};

				if !first_packet.starts_with(format.comment_signature()) {
					log::warn!(
						"OGG: Expected a {format:?} comment header, found a packet of {} bytes",
						first_packet.len()
					);

					for held_page in held_pages.drain(..) {
						muxer.write_page(&held_page)?;
					}
					muxer.write_page(&page)?;
					continue;
				}

				log::debug!(
					"OGG: Replacing comment header, spanning {} page(s)",
					held_pages.len() + 1
				);
				held_pages.clear();

				let packets = std::iter::once(new_comment_packet)
					.chain(packets[1..].iter().map(Vec::as_slice));
				encode_page_packets(&mut muxer, &page, packets)?;

				state = if header.ends_with_open_packet() {
					State::Continuing
				} else {
					State::Done
				};
			},
			State::Continuing => {
				if !header.is_continuation() {
					decode_err!(@BAIL "OGG: Expected a continuation of the packet following the comment header");
				}

				// Nothing to write until the packet is complete
				if !packets.is_empty() {
					encode_page_packets(&mut muxer, &page, packets.iter().map(Vec::as_slice))?;
				}

				if !header.ends_with_open_packet() {
					state = State::Done;
				}
			},
			State::Done => muxer.write_page(&page)?,
		}
	}

	match state {
		State::Seeking => Err(FileDecodingError::new(format, "Unable to find the comment header").into()),
		State::Continuing => {
			Err(FileDecodingError::new(format, "Stream ended in the middle of a packet").into())
		},
		State::Done => {
			log::debug!("OGG: Wrote {} page(s)", muxer.pages_written());
			Ok(())
		},
	}
}

// Re-encode the packets completed on `page`, keeping its granule position and end of stream flag
fn encode_page_packets<'a, W, I>(muxer: &mut Muxer<W>, page: &Page, packets: I) -> Result<()>
where
	W: Write,
	I: IntoIterator<Item = &'a [u8]>,
{
	let header = page.header();
	if header.is_last_page() {
		muxer.encode_eos(header.abgp, packets)?;
	} else {
		muxer.encode(header.abgp, packets)?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::rewrite;
	use crate::ogg::OggFormat;

	use ogg_pager::{Muxer, Page};

	const IDENT: &[u8] = b"\x01vorbis ident";
	const SETUP: &[u8] = b"\x05vorbis setup";

	fn comment_packet(content: &[u8]) -> Vec<u8> {
		let mut packet = b"\x03vorbis".to_vec();
		packet.extend(content);
		packet
	}

	fn read_pages(stream: &[u8]) -> Vec<Page> {
		let reader = &mut &stream[..];

		let mut pages = Vec::new();
		while let Some(page) = Page::read(reader).unwrap() {
			pages.push(page);
		}

		pages
	}

	// ident | comment + setup | audio | audio (EOS)
	fn stream(comment: &[u8]) -> Vec<u8> {
		let mut muxer = Muxer::new(42, Vec::new());
		muxer.encode_bos(0, [IDENT]).unwrap();
		muxer.encode(0, [comment, SETUP]).unwrap();
		muxer.encode(1024, [&[1; 100][..]]).unwrap();
		muxer.encode_eos(2048, [&[2; 100][..]]).unwrap();
		muxer.into_inner()
	}

	#[test_log::test]
	fn same_size_comment() {
		let original = stream(&comment_packet(b"old"));
		let expected = stream(&comment_packet(b"new"));

		let mut output = Vec::new();
		rewrite(
			&mut &original[..],
			&mut output,
			OggFormat::Vorbis,
			&comment_packet(b"new"),
		)
		.unwrap();

		assert_eq!(output, expected);

		let original_pages = read_pages(&original);
		let output_pages = read_pages(&output);
		assert_eq!(original_pages[0], output_pages[0]);
		assert_eq!(original_pages[2..], output_pages[2..]);
	}

	#[test_log::test]
	fn comment_grows_across_pages() {
		let original = stream(&comment_packet(b"small"));
		let large = comment_packet(&vec![b'x'; 100_000]);

		let mut output = Vec::new();
		rewrite(&mut &original[..], &mut output, OggFormat::Vorbis, &large).unwrap();

		let pages = read_pages(&output);
		assert_eq!(pages.len(), 5);

		for (i, page) in pages.iter().enumerate() {
			assert_eq!(page.header().sequence_number, i as u32);
		}

		// The audio pages only moved
		let original_pages = read_pages(&original);
		assert_eq!(pages[3].content(), original_pages[2].content());
		assert_eq!(pages[4].content(), original_pages[3].content());
		assert!(pages[4].header().is_last_page());
		assert_eq!(pages[4].header().abgp, 2048);
	}

	#[test_log::test]
	fn comment_shrinks() {
		let original = stream(&comment_packet(&vec![b'x'; 100_000]));

		let mut output = Vec::new();
		rewrite(
			&mut &original[..],
			&mut output,
			OggFormat::Vorbis,
			&comment_packet(b"small"),
		)
		.unwrap();

		assert_eq!(output, stream(&comment_packet(b"small")));
	}

	#[test_log::test]
	fn open_packet_after_comment() {
		// The setup header starts on the comment page and ends on the next one
		let setup = vec![5; 70_000];

		let mut muxer = Muxer::new(1, Vec::new());
		muxer.encode_bos(0, [IDENT]).unwrap();
		muxer
			.encode(0, [&comment_packet(b"old")[..], &setup[..]])
			.unwrap();
		muxer.encode_eos(960, [&[1; 10][..]]).unwrap();
		let original = muxer.into_inner();

		let mut output = Vec::new();
		rewrite(
			&mut &original[..],
			&mut output,
			OggFormat::Vorbis,
			&comment_packet(b"new"),
		)
		.unwrap();

		let mut demuxer = ogg_pager::Demuxer::new();
		let reader = &mut &output[..];
		let mut packets = Vec::new();
		while let Some(page) = demuxer.read_page(reader).unwrap() {
			packets.extend(page.into_packets());
		}

		assert_eq!(
			packets,
			vec![IDENT.to_vec(), comment_packet(b"new"), setup, vec![1; 10]]
		);
	}

	#[test_log::test]
	fn foreign_streams_untouched() {
		let mut video = Muxer::new(7, Vec::new());
		video.encode_bos(0, [&b"video header"[..]]).unwrap();
		video.encode(10, [&b"frame"[..]]).unwrap();
		let video = read_pages(&video.into_inner());

		let audio = read_pages(&stream(&comment_packet(b"old")));

		let mut original = Vec::new();
		original.extend(audio[0].as_bytes());
		original.extend(video[0].as_bytes());
		original.extend(audio[1].as_bytes());
		original.extend(video[1].as_bytes());
		original.extend(audio[2].as_bytes());
		original.extend(audio[3].as_bytes());

		let mut output = Vec::new();
		rewrite(
			&mut &original[..],
			&mut output,
			OggFormat::Vorbis,
			&comment_packet(b"new"),
		)
		.unwrap();

		let pages = read_pages(&output);
		assert_eq!(pages.len(), 6);
		assert_eq!(pages[1], video[0]);
		assert_eq!(pages[3], video[1]);
	}

	#[test_log::test]
	fn wrong_format() {
		let original = stream(&comment_packet(b"old"));

		let mut output = Vec::new();
		let result = rewrite(
			&mut &original[..],
			&mut output,
			OggFormat::Opus,
			b"OpusTags\0\0\0\0\0\0\0\0",
		);
		assert!(result.is_err());
	}

	#[test_log::test]
	fn empty_stream() {
		let mut output = Vec::new();
		assert!(rewrite(&mut std::io::empty(), &mut output, OggFormat::Vorbis, b"").is_err());
		assert!(output.is_empty());
	}
}
