#![no_main]

use libfuzzer_sys::fuzz_target;
use oggtag::ogg::{OggFormat, VorbisComments, create_metadata_packet, rewrite};

fuzz_target!(|data: &[u8]| {
	for format in [OggFormat::Vorbis, OggFormat::Opus] {
		let Ok(packet) = create_metadata_packet(&VorbisComments::with_vendor("fuzz"), format) else {
			return;
		};

		let _ = rewrite(&mut &data[..], &mut std::io::sink(), format, &packet);
	}
});
