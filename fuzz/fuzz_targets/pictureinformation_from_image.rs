#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	let _ = oggtag::picture::PictureInformation::from_image(data);
});
