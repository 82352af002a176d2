//! Static Huffman compression of byte streams.
//!
//! A container is the symbol count, the code tree and the packed codes, see
//! [`transcoder`] for the exact layout. The tree always spans the full byte
//! alphabet, so two runs over the same input produce identical containers.

pub mod bitstreams;
pub mod huffman;
pub mod transcoder;
pub mod command;
pub mod properties;
pub mod error;
pub mod utils;

pub use command::{run, run_files, Operation};
pub use error::{ExitCode, HuffError, Result};
pub use properties::Properties;
pub use transcoder::{compress, decompress, TranscodeStats, Transcoder};
