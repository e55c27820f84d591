use crate::error::Result;
use crate::{CONTAINS_FIRST_PAGE_OF_BITSTREAM, CONTAINS_LAST_PAGE_OF_BITSTREAM, Page, paginate};

use std::io::Write;

/// Writes packets to a single logical bitstream
///
/// The muxer owns the page sequence of its stream. Every page it writes, whether it was
/// encoded from packets or passed through with [`Muxer::write_page`], gets the next sequence
/// number and a fresh checksum.
///
/// # Example
///
/// ```rust
/// use ogg_pager::{Muxer, Page};
///
/// # fn main() -> ogg_pager::Result<()> {
/// let mut stream = Vec::new();
///
/// let mut muxer = Muxer::new(1234, &mut stream);
/// muxer.encode_bos(0, [&b"first"[..]])?;
/// muxer.encode(0, [&b"second"[..], &b"third"[..]])?;
/// muxer.encode_eos(960, [&b"last"[..]])?;
/// assert_eq!(muxer.pages_written(), 3);
///
/// let reader = &mut &stream[..];
/// let first = Page::read(reader)?.unwrap();
/// assert!(first.header().is_first_page());
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Muxer<W> {
	writer: W,
	stream_serial: u32,
	sequence_number: u32,
	pages_written: usize,
}

impl<W> Muxer<W>
where
	W: Write,
{
	/// Create a new `Muxer` for the stream `stream_serial`, starting at sequence number 0
	pub fn new(stream_serial: u32, writer: W) -> Self {
		Self {
			writer,
			stream_serial,
			sequence_number: 0,
			pages_written: 0,
		}
	}

	/// Set the sequence number of the next page
	///
	/// This is needed when continuing an existing stream.
	pub fn with_sequence_number(mut self, sequence_number: u32) -> Self {
		self.sequence_number = sequence_number;
		self
	}

	/// Encode the first packets of the stream
	///
	/// The first page written will be marked with [`CONTAINS_FIRST_PAGE_OF_BITSTREAM`].
	///
	/// # Errors
	///
	/// See [`Muxer::encode`]
	pub fn encode_bos<'a, I>(&mut self, abgp: u64, packets: I) -> Result<usize>
	where
		I: IntoIterator<Item = &'a [u8]>,
	{
		self.encode_with_flags(abgp, packets, CONTAINS_FIRST_PAGE_OF_BITSTREAM)
	}

	/// Encode packets in the middle of the stream
	///
	/// The packets are split into as many pages as needed, see [`paginate`]. `abgp` is
	/// used for every page on which a packet finishes.
	///
	/// Returns the number of pages written.
	///
	/// # Errors
	///
	/// * [`std::io::Error`] while writing
	pub fn encode<'a, I>(&mut self, abgp: u64, packets: I) -> Result<usize>
	where
		I: IntoIterator<Item = &'a [u8]>,
	{
		self.encode_with_flags(abgp, packets, 0)
	}

	/// Encode the final packets of the stream
	///
	/// The last page written will be marked with [`CONTAINS_LAST_PAGE_OF_BITSTREAM`]. With no
	/// packets, this writes a single empty page.
	///
	/// # Errors
	///
	/// See [`Muxer::encode`]
	pub fn encode_eos<'a, I>(&mut self, abgp: u64, packets: I) -> Result<usize>
	where
		I: IntoIterator<Item = &'a [u8]>,
	{
		self.encode_with_flags(abgp, packets, CONTAINS_LAST_PAGE_OF_BITSTREAM)
	}

	fn encode_with_flags<'a, I>(&mut self, abgp: u64, packets: I, flags: u8) -> Result<usize>
	where
		I: IntoIterator<Item = &'a [u8]>,
	{
		let pages = paginate(packets, self.stream_serial, abgp, flags)?;

		let count = pages.len();
		for mut page in pages {
			page.header.sequence_number = self.next_sequence_number();
			page.gen_crc();

			self.writer.write_all(&page.as_bytes())?;
			self.pages_written += 1;
		}

		Ok(count)
	}

	/// Write an existing page
	///
	/// A page of this muxer's stream is renumbered to follow the pages already written. The
	/// page is written verbatim if its sequence number is already correct.
	///
	/// Pages of other streams are always written verbatim, and do not affect the sequence.
	///
	/// # Errors
	///
	/// * [`std::io::Error`] while writing
	pub fn write_page(&mut self, page: &Page) -> Result<()> {
		let header = page.header();
		if header.stream_serial != self.stream_serial {
			self.writer.write_all(&page.as_bytes())?;
			return Ok(());
		}

		let sequence_number = self.next_sequence_number();
		if header.sequence_number == sequence_number {
			self.writer.write_all(&page.as_bytes())?;
		} else {
			let mut page = page.clone();
			page.header.sequence_number = sequence_number;
			page.gen_crc();

			self.writer.write_all(&page.as_bytes())?;
		}

		self.pages_written += 1;
		Ok(())
	}

	fn next_sequence_number(&mut self) -> u32 {
		let sequence_number = self.sequence_number;
		self.sequence_number = self.sequence_number.wrapping_add(1);
		sequence_number
	}

	/// The sequence number the next page will be given
	pub fn sequence_number(&self) -> u32 {
		self.sequence_number
	}

	/// The total number of pages written to this stream
	pub fn pages_written(&self) -> usize {
		self.pages_written
	}

	/// Consume the muxer, returning the writer
	pub fn into_inner(self) -> W {
		self.writer
	}
}
