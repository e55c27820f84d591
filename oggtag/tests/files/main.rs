#![allow(missing_docs)]

mod ogg;
mod picture;
pub(crate) mod util;
