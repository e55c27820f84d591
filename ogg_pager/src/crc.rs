// https://xiph.org/ogg/doc/framing.html
//
// The checksum is a direct (non-reflected) CRC32 with polynomial 0x04c11db7,
// an initial value of 0, and no final XOR.
const POLYNOMIAL: u32 = 0x04c1_1db7;

const fn table_entry(idx: u32) -> u32 {
	let mut r = idx << 24;

	let mut i = 0;
	while i < 8 {
		if r & 0x8000_0000 == 0 {
			r <<= 1;
		} else {
			r = (r << 1) ^ POLYNOMIAL;
		}

		i += 1;
	}

	r
}

const fn lookup_table() -> [u32; 256] {
	let mut table = [0; 256];

	let mut i = 0;
	while i < 256 {
		table[i] = table_entry(i as u32);
		i += 1;
	}

	table
}

static CRC_LOOKUP_TABLE: [u32; 256] = lookup_table();

/// Fold `data` into a running checksum
///
/// Starting from `0`, this is equivalent to [`crc32`]. Splitting the input
/// across multiple calls produces the same result as a single call over the
/// concatenated input.
pub fn crc32_update(mut crc: u32, data: &[u8]) -> u32 {
	for &byte in data {
		let idx = ((crc >> 24) as u8 ^ byte) as usize;
		crc = (crc << 8) ^ CRC_LOOKUP_TABLE[idx];
	}

	crc
}

/// Calculate the OGG checksum of `data`
///
/// NOTE: When checksumming a page, the checksum field of the header must be zeroed.
pub fn crc32(data: &[u8]) -> u32 {
	crc32_update(0, data)
}
