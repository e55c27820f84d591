use crate::util::{encoded_image, stream};
use oggtag::config::{ParseOptions, ParsingMode};
use oggtag::error::ErrorKind;
use oggtag::ogg::{OggFormat, VorbisComments, create_metadata_packet};
use oggtag::picture::{MimeType, Picture, PictureInformation, PictureType};

use image::ImageFormat;

fn stream_with_picture(picture_block: &[u8]) -> Vec<u8> {
	let mut comment = create_metadata_packet(&VorbisComments::with_vendor("vendor"), OggFormat::Opus)
		.unwrap();

	// Patch in a single raw field, bypassing any validation
	let mut field = b"METADATA_BLOCK_PICTURE=".to_vec();
	field.extend(data_encoding::BASE64.encode(picture_block).into_bytes());

	let count_pos = comment.len() - 4;
	comment[count_pos..].copy_from_slice(&1_u32.to_le_bytes());
	comment.extend((field.len() as u32).to_le_bytes());
	comment.extend(field);

	stream(OggFormat::Opus, &comment)
}

#[test_log::test]
fn unknown_picture_type_rejected() {
	let picture = Picture::unchecked(encoded_image(3, 2, ImageFormat::Jpeg))
		.mime_type(MimeType::Jpeg)
		.build();
	let mut block = picture.as_flac_bytes(PictureInformation::default(), false);
	block[..4].copy_from_slice(&255_u32.to_be_bytes());

	let content = stream_with_picture(&block);

	for mode in [ParsingMode::Strict, ParsingMode::BestAttempt, ParsingMode::Relaxed] {
		let err = oggtag::read_from(&mut &content[..], ParseOptions::new().parsing_mode(mode))
			.unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::InvalidPictureType(255)));
	}

	// Not looked at
	let tag = oggtag::read_from(
		&mut &content[..],
		ParseOptions::new().read_cover_art(false),
	)
	.unwrap();
	assert!(tag.picture().is_none());
}

#[test_log::test]
fn read_any_picture_type() {
	let picture = Picture::unchecked(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
		.pic_type(PictureType::Artist)
		.mime_type(MimeType::Png)
		.description("Artist photo")
		.build();
	let information = PictureInformation {
		width: 100,
		height: 200,
		color_depth: 32,
		num_colors: 0,
	};

	let content = stream_with_picture(&picture.as_flac_bytes(information, false));

	let tag = oggtag::read_from(&mut &content[..], ParseOptions::new()).unwrap();
	assert_eq!(tag.picture(), Some(&picture));
	assert_eq!(tag.picture().unwrap().mime_type().unwrap().ext(), Some("png"));
}

#[test_log::test]
fn unknown_mime_type() {
	let picture = Picture::unchecked(vec![1, 2, 3])
		.pic_type(PictureType::CoverFront)
		.mime_type(MimeType::from_str("image/webp"))
		.build();

	let content = stream_with_picture(&picture.as_flac_bytes(PictureInformation::default(), false));

	let tag = oggtag::read_from(&mut &content[..], ParseOptions::new()).unwrap();
	let mime_type = tag.picture().unwrap().mime_type().unwrap();
	assert_eq!(mime_type, &MimeType::Unknown(String::from("image/webp")));
	assert_eq!(mime_type.ext(), None);
}
