use std::error::Error;
use std::fmt;

/// Alias for `Result<T, PageError>`
pub type Result<T> = std::result::Result<T, PageError>;

/// Errors that can occur while performing `Page` operations
#[derive(Debug)]
pub enum PageError {
	/// The reader contains a page with a nonzero version
	InvalidVersion,
	/// The reader contains a page without a magic signature (OggS)
	MissingMagic,
	/// The stored checksum of a page does not match its content
	ChecksumMismatch {
		/// The checksum stored in the page header
		expected: u32,
		/// The checksum calculated from the page
		calculated: u32,
	},
	/// A page claims to continue a packet, but no packet is open for its stream
	MissingContinuation(u32),
	/// The reader contains too much data for a single page
	TooMuchData,
	/// The reader contains too little data to extract the expected information
	NotEnoughData,
	/// Any std::io::Error
	Io(std::io::Error),
}

impl fmt::Display for PageError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PageError::InvalidVersion => {
				write!(f, "Invalid stream structure version (Should always be 0)")
			},
			PageError::MissingMagic => write!(f, "Page is missing a magic signature"),
			PageError::ChecksumMismatch {
				expected,
				calculated,
			} => write!(
				f,
				"Page checksum mismatch (expected {expected:#010x}, calculated {calculated:#010x})"
			),
			PageError::MissingContinuation(serial) => write!(
				f,
				"Page continues a packet, but stream {serial} has no packet in progress"
			),
			PageError::TooMuchData => write!(f, "Too much data was provided"),
			PageError::NotEnoughData => {
				write!(f, "Too little data is available for the expected read")
			},
			PageError::Io(err) => write!(f, "{err}"),
		}
	}
}

impl Error for PageError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match *self {
			PageError::Io(ref e) => Some(e),
			_ => None,
		}
	}
}

impl From<std::io::Error> for PageError {
	fn from(err: std::io::Error) -> PageError {
		// A truncated page is a framing problem, not an I/O one
		if err.kind() == std::io::ErrorKind::UnexpectedEof {
			return PageError::NotEnoughData;
		}

		PageError::Io(err)
	}
}
