use crate::Page;
use crate::error::{PageError, Result};

use std::collections::HashMap;
use std::io::Read;

/// A page read by a [`Demuxer`], along with the packets it completed
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DemuxedPage {
	page: Page,
	packets: Vec<Vec<u8>>,
}

impl DemuxedPage {
	/// The page as it was read
	pub fn page(&self) -> &Page {
		&self.page
	}

	/// The packets that finished on this page, in stream order
	///
	/// NOTE: This is empty if the page only continues a packet that is
	///       not yet complete. This is not an error, more pages are needed.
	pub fn packets(&self) -> &[Vec<u8>] {
		&self.packets
	}

	/// Consumes the page, returning the completed packets
	pub fn into_packets(self) -> Vec<Vec<u8>> {
		self.packets
	}

	/// Consumes the page, returning both parts
	pub fn into_parts(self) -> (Page, Vec<Vec<u8>>) {
		(self.page, self.packets)
	}
}

/// A packet reassembly session
///
/// Packets may span any number of pages. The demuxer keeps the partial content of every
/// unfinished packet, keyed by the stream serial number, until the page holding its final
/// segment is read.
///
/// A `Demuxer` is meant for a single pass over a single bitstream. Pages must be fed
/// in stream order.
#[derive(Default, Debug)]
pub struct Demuxer {
	open_packets: HashMap<u32, Vec<u8>>,
}

impl Demuxer {
	/// Create a new `Demuxer` with no packets in progress
	pub fn new() -> Self {
		Self::default()
	}

	/// Read the next page from `data`, returning it with every packet it completed
	///
	/// This returns `None` once the reader is exhausted at a page boundary.
	///
	/// # Errors
	///
	/// * See [`Page::read`]
	/// * See [`Demuxer::push_page`]
	///
	/// # Examples
	///
	/// ```rust
	/// use ogg_pager::{Demuxer, Muxer};
	///
	/// # fn main() -> ogg_pager::Result<()> {
	/// let mut stream = Vec::new();
	///
	/// // A single packet that is too large for one page
	/// let large_packet = vec![0; 100_000];
	/// Muxer::new(1234, &mut stream).encode(0, [&large_packet[..]])?;
	///
	/// let mut demuxer = Demuxer::new();
	/// let reader = &mut &stream[..];
	///
	/// // The first page only holds the beginning of the packet
	/// let first = demuxer.read_page(reader)?.unwrap();
	/// assert!(first.packets().is_empty());
	///
	/// // Now the packet is complete
	/// let second = demuxer.read_page(reader)?.unwrap();
	/// assert_eq!(second.packets(), &[large_packet]);
	///
	/// assert!(demuxer.read_page(reader)?.is_none());
	/// # Ok(()) }
	/// ```
	pub fn read_page<R>(&mut self, data: &mut R) -> Result<Option<DemuxedPage>>
	where
		R: Read,
	{
		let Some(page) = Page::read(data)? else {
			return Ok(None);
		};

		let packets = self.push_page(&page)?;
		Ok(Some(DemuxedPage { page, packets }))
	}

	/// Feed an already read page, returning the packets it completed
	///
	/// A page that does not continue a packet discards any unfinished packet of its stream.
	///
	/// # Errors
	///
	/// The page is marked as a continuation, but its stream has no packet in progress
	/// ([`PageError::MissingContinuation`])
	pub fn push_page(&mut self, page: &Page) -> Result<Vec<Vec<u8>>> {
		let header = page.header();
		let serial = header.stream_serial;

		let mut current = if header.is_continuation() {
			self.open_packets
				.remove(&serial)
				.ok_or(PageError::MissingContinuation(serial))?
		} else {
			// Whatever was left over can never be completed
			self.open_packets.remove(&serial);
			Vec::new()
		};

		let content = page.content();
		let mut packets = Vec::new();

		let mut pos = 0;
		for &lacing in header.segments() {
			let end = pos + usize::from(lacing);
			current.extend_from_slice(&content[pos..end]);
			pos = end;

			if lacing < 255 {
				packets.push(std::mem::take(&mut current));
			}
		}

		let packet_open = match header.segments().last() {
			Some(&lacing) => lacing == 255,
			// An empty page leaves the stream as it was
			None => header.is_continuation(),
		};

		if packet_open {
			self.open_packets.insert(serial, current);
		}

		Ok(packets)
	}

	/// Whether the stream `serial` currently has an unfinished packet
	pub fn has_open_packet(&self, serial: u32) -> bool {
		self.open_packets.contains_key(&serial)
	}

	/// Discard all unfinished packets
	pub fn reset(&mut self) {
		self.open_packets.clear();
	}
}
