use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};

use serde::Serialize;

use crate::{
    error::{HuffError, Result},
    properties::Properties,
    transcoder::{TranscodeStats, Transcoder},
};

const COMPRESS_SELECTOR: u8 = b'c';
const DECOMPRESS_SELECTOR: u8 = b'd';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Compress,
    Decompress,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compress => write!(f, "compress"),
            Self::Decompress => write!(f, "decompress"),
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = HuffError;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            COMPRESS_SELECTOR => Ok(Self::Compress),
            DECOMPRESS_SELECTOR => Ok(Self::Decompress),
            _ => Err(HuffError::wrong_input(format!("invalid operation selector: {byte:#04x}"))),
        }
    }
}

/// Reads a whole stream, growing the buffer `chunk` bytes at a time.
fn read_all<R: Read>(mut reader: R, chunk: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    loop {
        let len = data.len();
        data.try_reserve(chunk).map_err(HuffError::out_of_memory(len + chunk))?;
        data.resize(len + chunk, 0);

        match reader.read(&mut data[len..]) {
            Ok(n) => {
                data.truncate(len + n);
                if n == 0 {
                    return Ok(data);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => data.truncate(len),
            Err(e) => return Err(e.into()),
        }
    }
}

/// Reads the leading selector byte and runs the operation it names over the
/// rest of `input`.
pub fn run<R: Read, W: Write>(mut input: R, output: W, props: &Properties) -> Result<TranscodeStats> {
    let mut selector = [0u8; 1];
    input.read_exact(&mut selector).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => HuffError::wrong_input("missing operation selector"),
        _ => e.into(),
    })?;
    let operation = Operation::try_from(selector[0])?;
    log::info!("{operation} {} -> {}", props.input.display(), props.output.display());

    let transcoder = Transcoder::with_buffer_size(props.buffer_size);

    match operation {
        Operation::Compress => {
            let mut data = read_all(input, props.buffer_size)?;
            if props.strip_trailing_newline && data.last() == Some(&b'\n') {
                data.pop();
            }
            transcoder.encode(&data, output)
        }
        Operation::Decompress => transcoder.decode(input, output),
    }
}

/// Runs over the files named by `props`. A failed run leaves no output file
/// behind, so a truncated or malformed container never yields partial data.
pub fn run_files(props: &Properties) -> Result<TranscodeStats> {
    let input = File::open(&props.input)?;
    let output = File::create(&props.output)?;

    let result = run(BufReader::new(input), BufWriter::new(output), props);
    if let Err(e) = &result {
        log::warn!("{e}, removing {}", props.output.display());
        if let Err(rm) = fs::remove_file(&props.output) {
            log::error!("could not remove {}: {rm}", props.output.display());
        }
    }

    result
}
