#![no_main]

use libfuzzer_sys::fuzz_target;
use oggtag::config::ParsingMode;

fuzz_target!(|data: &[u8]| {
	let _ = oggtag::picture::Picture::from_flac_bytes(data, true, ParsingMode::Relaxed);
	let _ = oggtag::picture::Picture::from_flac_bytes(data, false, ParsingMode::Strict);
});
