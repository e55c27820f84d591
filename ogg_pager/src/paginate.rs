use crate::error::Result;
use crate::{
	CONTAINS_FIRST_PAGE_OF_BITSTREAM, CONTAINS_LAST_PAGE_OF_BITSTREAM, CONTINUED_PACKET,
	MAX_CONTENT_SIZE, MAX_SEGMENT_COUNT, Page, PageHeader,
};

struct PaginateContext {
	pages: Vec<Page>,
	abgp: u64,
	stream_serial: u32,
	header_flags: u8,
	flags: PaginateContextFlags,
	segments: Vec<u8>,
	content: Vec<u8>,
}

struct PaginateContextFlags {
	first_page: bool,
	continues_packet: bool,
	packet_finished_on_page: bool,
}

impl PaginateContext {
	fn new(abgp: u64, stream_serial: u32, header_flags: u8) -> Self {
		Self {
			pages: Vec::new(),
			abgp,
			stream_serial,
			header_flags,
			flags: PaginateContextFlags {
				first_page: true,
				continues_packet: false,
				packet_finished_on_page: false,
			},
			segments: Vec::with_capacity(MAX_SEGMENT_COUNT),
			content: Vec::new(),
		}
	}

	fn push_packet(&mut self, mut packet: &[u8]) {
		loop {
			let segment_len = packet.len().min(255);
			let (segment, remaining) = packet.split_at(segment_len);

			self.segments.push(segment_len as u8);
			self.content.extend_from_slice(segment);
			packet = remaining;

			// Anything less than a full segment terminates the packet, including
			// the zero-length segment following a packet that is a multiple of 255
			let finished = segment_len < 255;
			if finished {
				self.flags.packet_finished_on_page = true;
			}

			if self.segments.len() == MAX_SEGMENT_COUNT {
				self.flush_page(!finished);
			}

			if finished {
				break;
			}
		}
	}

	fn flush_page(&mut self, next_continues_packet: bool) {
		let mut header_type_flag = 0;
		if self.flags.first_page && self.header_flags & CONTAINS_FIRST_PAGE_OF_BITSTREAM != 0 {
			header_type_flag |= CONTAINS_FIRST_PAGE_OF_BITSTREAM;
		}

		// A packet from the previous page continues onto this page
		if self.flags.continues_packet {
			header_type_flag |= CONTINUED_PACKET;
		}

		let abgp = if self.flags.packet_finished_on_page {
			self.abgp
		} else {
			// A special value of '-1' (in two's complement) indicates that no packets
			// finish on this page.
			1_u64.wrapping_neg()
		};

		let mut header = PageHeader::new(
			header_type_flag,
			abgp,
			self.stream_serial,
			self.pages.len() as u32,
		);
		header.segments = std::mem::replace(&mut self.segments, Vec::with_capacity(MAX_SEGMENT_COUNT));

		let content = std::mem::take(&mut self.content);
		debug_assert!(content.len() <= MAX_CONTENT_SIZE);

		self.pages.push(Page::from_parts(header, content));

		self.flags.first_page = false;
		self.flags.continues_packet = next_continues_packet;
		self.flags.packet_finished_on_page = false;
	}

	fn finish(mut self) -> Vec<Page> {
		// Always produce at least one page, an empty one can still carry flags
		if !self.segments.is_empty() || self.pages.is_empty() {
			self.flush_page(false);
		}

		if self.header_flags & CONTAINS_LAST_PAGE_OF_BITSTREAM != 0 {
			if let Some(last) = self.pages.last_mut() {
				last.header.header_type_flag |= CONTAINS_LAST_PAGE_OF_BITSTREAM;
			}
		}

		self.pages
	}
}

/// Create pages from a list of packets
///
/// The packets are laced back to back, starting a new page whenever the segment table
/// is full (see [`MAX_SEGMENT_COUNT`]). A packet may therefore span multiple pages, in which
/// case every page it continues onto is marked with [`CONTINUED_PACKET`].
///
/// NOTES:
///
/// * [`CONTAINS_FIRST_PAGE_OF_BITSTREAM`] is only applied to the first page, and
///   [`CONTAINS_LAST_PAGE_OF_BITSTREAM`] only to the last.
/// * `abgp` is applied to every page on which a packet finishes. All other pages get `-1`.
/// * Sequence numbers start at 0, and checksums are zeroed. Both are expected to be fixed up
///   by the caller (see [`Muxer`](crate::Muxer), which does this automatically).
/// * An empty list of packets produces a single page with an empty segment table.
///
/// # Errors
///
/// This currently cannot fail, the [`Result`] is kept for API stability.
///
/// # Example
///
/// ```rust
/// use ogg_pager::paginate;
///
/// # fn main() -> ogg_pager::Result<()> {
/// // Creating the comment header
/// let comment_header_packet = vec![0; 70_000];
/// let stream_serial_number = 2784419176;
///
/// let pages = paginate([&comment_header_packet[..]], stream_serial_number, 0, 0)?;
/// assert_eq!(pages.len(), 2);
/// # Ok(()) }
/// ```
pub fn paginate<'a, I>(packets: I, stream_serial: u32, abgp: u64, flags: u8) -> Result<Vec<Page>>
where
	I: IntoIterator<Item = &'a [u8]>,
{
	let mut ctx = PaginateContext::new(abgp, stream_serial, flags);

	for packet in packets {
		ctx.push_packet(packet);
	}

	Ok(ctx.finish())
}
