//! A simple OGG page reader and writer
//!
//! This crate deals with the physical framing of an OGG bitstream:
//!
//! * [`Page`] reads and writes single pages, verifying their checksums
//! * [`Demuxer`] reassembles packets that span multiple pages
//! * [`Muxer`] splits packets back into pages, keeping sequence numbers and checksums in order
//!
//! # Example
//!
//! ```rust
//! use ogg_pager::{Demuxer, Muxer};
//!
//! # fn main() -> ogg_pager::Result<()> {
//! let stream_serial_number = 1234;
//!
//! let mut stream = Vec::new();
//! let mut muxer = Muxer::new(stream_serial_number, &mut stream);
//! muxer.encode_bos(0, [&b"identification"[..]])?;
//! muxer.encode_eos(0, [&[1; 1000][..], &b"trailing"[..]])?;
//!
//! let mut demuxer = Demuxer::new();
//! let mut reader = &stream[..];
//!
//! let mut packets = Vec::new();
//! while let Some(page) = demuxer.read_page(&mut reader)? {
//! 	packets.extend(page.into_packets());
//! }
//!
//! assert_eq!(packets.len(), 3);
//! assert_eq!(packets[1].len(), 1000);
//! # Ok(()) }
//! ```

mod crc;
mod demux;
mod error;
mod header;
mod mux;
mod paginate;

use std::io::Read;

pub use crc::{crc32, crc32_update};
pub use demux::{DemuxedPage, Demuxer};
pub use error::{PageError, Result};
pub use header::PageHeader;
pub use mux::Muxer;
pub use paginate::paginate;

/// The first packet on the page continues a packet from the previous page
pub const CONTINUED_PACKET: u8 = 0x01;
/// The page is the first page of the logical bitstream
pub const CONTAINS_FIRST_PAGE_OF_BITSTREAM: u8 = 0x02;
/// The page is the last page of the logical bitstream
pub const CONTAINS_LAST_PAGE_OF_BITSTREAM: u8 = 0x04;

/// The size of a page header, excluding the segment table
pub const PAGE_HEADER_SIZE: usize = 27;
/// The maximum number of segments a single page can hold
pub const MAX_SEGMENT_COUNT: usize = 255;
/// The maximum page content size
pub const MAX_CONTENT_SIZE: usize = MAX_SEGMENT_COUNT * 255;

/// An OGG page
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Page {
	content: Vec<u8>,
	header: PageHeader,
}

impl Page {
	/// Create a new `Page` holding a single, complete packet
	///
	/// The checksum will be zeroed, see [`Page::gen_crc`].
	///
	/// # Errors
	///
	/// See [`segment_table`]
	///
	/// # Example
	///
	/// ```rust
	/// use ogg_pager::{CONTAINS_FIRST_PAGE_OF_BITSTREAM, Page};
	///
	/// # fn main() -> ogg_pager::Result<()> {
	/// // Creating the identification header
	/// let ident_header_packet = b"OpusHead".to_vec();
	/// let stream_serial_number = 2784419176;
	///
	/// let mut page = Page::new(
	/// 	CONTAINS_FIRST_PAGE_OF_BITSTREAM,
	/// 	0,
	/// 	stream_serial_number,
	/// 	0,
	/// 	ident_header_packet,
	/// )?;
	/// page.gen_crc();
	/// # Ok(()) }
	/// ```
	pub fn new(
		header_type_flag: u8,
		abgp: u64,
		stream_serial: u32,
		sequence_number: u32,
		content: Vec<u8>,
	) -> Result<Self> {
		let mut header = PageHeader::new(header_type_flag, abgp, stream_serial, sequence_number);
		header.segments = segment_table(content.len())?;

		Ok(Self { content, header })
	}

	pub(crate) fn from_parts(header: PageHeader, content: Vec<u8>) -> Self {
		debug_assert_eq!(header.content_size(), content.len());
		Self { content, header }
	}

	/// Convert the Page to Vec<u8> for writing
	///
	/// NOTE: This will write the checksum as is. It is likely [`Page::gen_crc`] will have
	/// to be used prior.
	pub fn as_bytes(&self) -> Vec<u8> {
		let mut bytes =
			Vec::with_capacity(PAGE_HEADER_SIZE + self.header.segments.len() + self.content.len());

		self.header.write_to(&mut bytes);
		bytes.extend(self.content.iter());

		bytes
	}

	/// Attempts to get a Page from a reader
	///
	/// This returns `None` if the reader is exhausted at a page boundary.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * [`PageError`], including [`PageError::ChecksumMismatch`] if the page content
	///   does not match its checksum
	pub fn read<R>(data: &mut R) -> Result<Option<Self>>
	where
		R: Read,
	{
		let Some(header) = PageHeader::read(data)? else {
			return Ok(None);
		};

		let mut content = vec![0; header.content_size()];
		data.read_exact(&mut content)?;

		let page = Page::from_parts(header, content);

		let calculated = page.calculate_crc();
		if calculated != page.header.checksum {
			return Err(PageError::ChecksumMismatch {
				expected: page.header.checksum,
				calculated,
			});
		}

		Ok(Some(page))
	}

	/// Generates the CRC checksum of the page
	pub fn gen_crc(&mut self) {
		self.header.checksum = self.calculate_crc();
	}

	// Checksum of the page with the checksum field zeroed
	fn calculate_crc(&self) -> u32 {
		let mut header = Vec::with_capacity(PAGE_HEADER_SIZE + self.header.segments.len());

		let mut zeroed = self.header.clone();
		zeroed.checksum = 0;
		zeroed.write_to(&mut header);

		crc32_update(crc32(&header), &self.content)
	}

	/// Returns the page's content
	pub fn content(&self) -> &[u8] {
		self.content.as_slice()
	}

	/// Consumes the page and returns its content
	pub fn take_content(self) -> Vec<u8> {
		self.content
	}

	/// Returns a reference to the page's header
	pub fn header(&self) -> &PageHeader {
		&self.header
	}

	/// Returns a mutable reference to the page's header
	///
	/// NOTE: Changing any header field invalidates the checksum, see [`Page::gen_crc`].
	pub fn header_mut(&mut self) -> &mut PageHeader {
		&mut self.header
	}

	/// Returns the page's segment table
	pub fn segment_table(&self) -> &[u8] {
		self.header.segments()
	}
}

/// Creates a segment table based on the length of a single packet
///
/// # Errors
///
/// The packet does not fit within a single page
pub fn segment_table(length: usize) -> Result<Vec<u8>> {
	let needed = length / 255 + 1;
	if needed > MAX_SEGMENT_COUNT {
		return Err(PageError::TooMuchData);
	}

	let mut segments = vec![255; needed - 1];
	segments.push((length % 255) as u8);

	Ok(segments)
}
