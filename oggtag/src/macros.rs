macro_rules! try_vec {
	($elem:expr; $size:expr) => {{ $crate::util::alloc::fallible_vec_from_element($elem, $size)? }};
}

// Shorthand for return Err(OggTagError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(OggTagError::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(OggTagError::new(ErrorKind::Variant(Message)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::OggTagError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:expr)) => {
		return Err(crate::error::OggTagError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// Shorthand for FileDecodingError::new(OggFormat::Foo, "Message")
//
// Usage:
//
// - decode_err!(Variant, Message)
// - decode_err!(Message)
//
// or bail:
//
// - decode_err!(@BAIL Variant, Message)
// - decode_err!(@BAIL Message)
macro_rules! decode_err {
	($format:ident, $reason:literal) => {
		Into::<crate::error::OggTagError>::into(crate::error::FileDecodingError::new(
			crate::ogg::OggFormat::$format,
			$reason,
		))
	};
	($reason:literal) => {
		Into::<crate::error::OggTagError>::into(crate::error::FileDecodingError::from_description(
			$reason,
		))
	};
	(@BAIL $($format:ident,)? $reason:literal) => {
		return Err(decode_err!($($format,)? $reason))
	};
}

// Shorthand for FileEncodingError::from_description("Message")
//
// Usage:
//
// - encode_err!(Message)
// - encode_err!(@BAIL Message)
macro_rules! encode_err {
	($reason:literal) => {
		Into::<crate::error::OggTagError>::into(crate::error::FileEncodingError::from_description(
			$reason,
		))
	};
	(@BAIL $reason:literal) => {
		return Err(encode_err!($reason))
	};
}

// A macro for handling the different `ParsingMode`s
//
// NOTE: All fields are optional, if `STRICT` or `RELAXED` are missing, it will
// 		 fall through to `DEFAULT`. If `DEFAULT` is missing, it will fall through
// 		 to an empty block.
//
// Usage:
//
// - parse_mode_choice!(
// 		ident_of_parsing_mode,
// 		STRICT: some_expr,
// 		RELAXED: some_expr,
// 		DEFAULT: some_expr,
// 	 )
macro_rules! parse_mode_choice {
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(BESTATTEMPT: $best_attempt_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr,)?
		DEFAULT: $default:expr
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => { $strict_handler },)?
			$(crate::config::ParsingMode::BestAttempt => { $best_attempt_handler },)?
			$(crate::config::ParsingMode::Relaxed => { $relaxed_handler },)?
			_ => { $default }
		}
	};
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(BESTATTEMPT: $best_attempt_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr $(,)?)?
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => { $strict_handler },)?
			$(crate::config::ParsingMode::BestAttempt => { $best_attempt_handler },)?
			$(crate::config::ParsingMode::Relaxed => { $relaxed_handler },)?
			#[allow(unreachable_patterns)]
			_ => {}
		}
	};
}

pub(crate) use {decode_err, encode_err, err, parse_mode_choice, try_vec};
