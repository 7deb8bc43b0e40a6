//! Photocard filename decoder.
//!
//! Turns names like `albums_new_dna_aladin_rakuten_g_ver_standard_hinata.png`
//! into a [`ParsedFilename`]. Pure and stateless: no I/O, dictionaries are
//! compile-time tables.

pub mod elements;
pub mod error;
pub mod keyword;
pub mod parser;
pub mod tokenizer;

pub use elements::{Category, Member, ParsedFilename, ReleaseStructure, ReleaseType, Version};
pub use error::{DecodeError, UnknownVariant};
pub use parser::{decode, decode_with, release::derive as derive_release};
