//! compression/mod.rs
//! In-memory zlib deflate/inflate over a growable output buffer.
//!
//! Notes:
//! - The engine (flate2) is an external collaborator; only the drive loop lives here.
//! - Output size is unknown up front; the buffer starts at 4 KiB and doubles.
//! - Every exit path drops the engine, releasing its stream state exactly once.

pub mod types;
pub mod engine;
pub mod stream;

pub use types::*;
pub use engine::{create_engine, ZlibDeflater, ZlibInflater};
pub use stream::{deflate_bytes, inflate_bytes, run_codec, CodecBuffer};
