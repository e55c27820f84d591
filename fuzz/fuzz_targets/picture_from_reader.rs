#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	let _ = oggtag::picture::Picture::from_reader(&mut &data[..]);
});
