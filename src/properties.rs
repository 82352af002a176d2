use std::{collections::HashMap, fs::File, io::BufReader, path::{Path, PathBuf}, str::FromStr};

use crate::{bitstreams::DEFAULT_BUFFER_SIZE, error::{HuffError, Result}};

/// Settings of the command line tool, read from a `.properties` file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Properties {
    pub input: PathBuf,
    pub output: PathBuf,
    pub buffer_size: usize,
    /// Drop one `\n` terminating the input before compressing it
    pub strip_trailing_newline: bool,
    /// Write a JSON report next to the output
    pub stats: bool,
}

impl Default for Properties {
    fn default() -> Self {
        Self {
            input: PathBuf::from("in.txt"),
            output: PathBuf::from("out.txt"),
            buffer_size: DEFAULT_BUFFER_SIZE,
            strip_trailing_newline: false,
            stats: false,
        }
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| HuffError::config(format!("cannot parse {key}={value}")))
}

impl TryFrom<HashMap<String, String>> for Properties {
    type Error = HuffError;

    fn try_from(value: HashMap<String, String>) -> Result<Self> {
        let mut props = Properties::default();

        if let Some(input) = value.get("input") {
            props.input = PathBuf::from(input.trim());
        }
        if let Some(output) = value.get("output") {
            props.output = PathBuf::from(output.trim());
        }
        if let Some(buffer_size) = value.get("buffersize") {
            props.buffer_size = parse("buffersize", buffer_size)?;
            if props.buffer_size == 0 {
                return Err(HuffError::config("buffersize must be positive"));
            }
        }
        if let Some(strip) = value.get("striptrailingnewline") {
            props.strip_trailing_newline = parse("striptrailingnewline", strip)?;
        }
        if let Some(stats) = value.get("stats") {
            props.stats = parse("stats", stats)?;
        }

        Ok(props)
    }
}

impl Properties {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| HuffError::config(format!("could not open {}: {e}", path.display())))?;
        let map = java_properties::read(BufReader::new(file))
            .map_err(|e| HuffError::config(format!("failed parsing {}: {e}", path.display())))?;

        Self::try_from(map)
    }
}

impl From<&Properties> for String {
    fn from(val: &Properties) -> Self {
        let mut s = String::new();

        s.push_str("#Huffman compressor properties\n");
        s.push_str(&format!("input={}\n", val.input.display()));
        s.push_str(&format!("output={}\n", val.output.display()));
        s.push_str(&format!("buffersize={}\n", val.buffer_size));
        s.push_str(&format!("striptrailingnewline={}\n", val.strip_trailing_newline));
        s.push_str(&format!("stats={}\n", val.stats));

        s
    }
}
