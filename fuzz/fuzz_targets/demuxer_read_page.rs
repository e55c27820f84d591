#![no_main]

use libfuzzer_sys::fuzz_target;
use ogg_pager::Demuxer;

fuzz_target!(|data: &[u8]| {
	let mut demuxer = Demuxer::new();
	let reader = &mut &data[..];
	while let Ok(Some(_)) = demuxer.read_page(reader) {}
});
