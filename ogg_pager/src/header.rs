use crate::error::{PageError, Result};
use crate::{
	CONTAINS_FIRST_PAGE_OF_BITSTREAM, CONTAINS_LAST_PAGE_OF_BITSTREAM, CONTINUED_PACKET,
	PAGE_HEADER_SIZE,
};

use std::io::{ErrorKind, Read};

use byteorder::{ByteOrder, LittleEndian};

/// An OGG page header
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PageHeader {
	pub(crate) header_type_flag: u8,
	/// The page's absolute granule position
	pub abgp: u64,
	/// The page's stream serial number
	pub stream_serial: u32,
	/// The page's sequence number
	pub sequence_number: u32,
	pub(crate) checksum: u32,
	pub(crate) segments: Vec<u8>,
}

impl PageHeader {
	/// Create a new `PageHeader` with an empty segment table
	///
	/// The checksum will be zeroed, see [`Page::gen_crc`](crate::Page::gen_crc).
	pub fn new(header_type_flag: u8, abgp: u64, stream_serial: u32, sequence_number: u32) -> Self {
		Self {
			header_type_flag,
			abgp,
			stream_serial,
			sequence_number,
			checksum: 0,
			segments: Vec::new(),
		}
	}

	/// Read a page header and its segment table
	///
	/// This returns `None` if the reader is exhausted *before* the first byte of the header.
	///
	/// # Errors
	///
	/// * [`PageError::MissingMagic`]
	/// * [`PageError::InvalidVersion`]
	/// * [`PageError::NotEnoughData`] if the header or segment table is truncated
	/// * [`std::io::Error`]
	pub fn read<R>(data: &mut R) -> Result<Option<Self>>
	where
		R: Read,
	{
		let mut raw = [0; PAGE_HEADER_SIZE];
		match read_available(data, &mut raw)? {
			0 => return Ok(None),
			PAGE_HEADER_SIZE => {},
			_ => return Err(PageError::NotEnoughData),
		}

		if &raw[..4] != b"OggS" {
			return Err(PageError::MissingMagic);
		}

		// Version, always 0
		if raw[4] != 0 {
			return Err(PageError::InvalidVersion);
		}

		let header_type_flag = raw[5];
		let abgp = LittleEndian::read_u64(&raw[6..14]);
		let stream_serial = LittleEndian::read_u32(&raw[14..18]);
		let sequence_number = LittleEndian::read_u32(&raw[18..22]);
		let checksum = LittleEndian::read_u32(&raw[22..26]);

		let mut segments = vec![0; usize::from(raw[26])];
		data.read_exact(&mut segments)?;

		Ok(Some(Self {
			header_type_flag,
			abgp,
			stream_serial,
			sequence_number,
			checksum,
			segments,
		}))
	}

	/// Append the serialized header (including the segment table) to `bytes`
	pub(crate) fn write_to(&self, bytes: &mut Vec<u8>) {
		bytes.extend(b"OggS");
		bytes.push(0);
		bytes.push(self.header_type_flag);
		bytes.extend(self.abgp.to_le_bytes());
		bytes.extend(self.stream_serial.to_le_bytes());
		bytes.extend(self.sequence_number.to_le_bytes());
		bytes.extend(self.checksum.to_le_bytes());
		bytes.push(self.segments.len() as u8);
		bytes.extend(self.segments.iter());
	}

	/// Returns the page's header type flag
	pub fn header_type_flag(&self) -> u8 {
		self.header_type_flag
	}

	/// Returns the page's checksum
	pub fn checksum(&self) -> u32 {
		self.checksum
	}

	/// Returns the page's segment table
	pub fn segments(&self) -> &[u8] {
		&self.segments
	}

	/// The total size of the page content, according to the segment table
	pub fn content_size(&self) -> usize {
		self.segments.iter().map(|&b| usize::from(b)).sum()
	}

	/// Whether the first packet on the page continues a packet from a previous page
	pub fn is_continuation(&self) -> bool {
		self.header_type_flag & CONTINUED_PACKET != 0
	}

	/// Whether the page is the first page of a logical bitstream
	pub fn is_first_page(&self) -> bool {
		self.header_type_flag & CONTAINS_FIRST_PAGE_OF_BITSTREAM != 0
	}

	/// Whether the page is the last page of a logical bitstream
	pub fn is_last_page(&self) -> bool {
		self.header_type_flag & CONTAINS_LAST_PAGE_OF_BITSTREAM != 0
	}

	/// Whether the final packet on the page is unfinished and continues on the next page
	pub fn ends_with_open_packet(&self) -> bool {
		self.segments.last() == Some(&255)
	}
}

// Like `read_exact`, but reports how much was read before the reader ran dry
fn read_available<R>(data: &mut R, buf: &mut [u8]) -> Result<usize>
where
	R: Read,
{
	let mut filled = 0;
	while filled < buf.len() {
		match data.read(&mut buf[filled..]) {
			Ok(0) => break,
			Ok(n) => filled += n,
			Err(e) if e.kind() == ErrorKind::Interrupted => {},
			Err(e) => return Err(e.into()),
		}
	}

	Ok(filled)
}
