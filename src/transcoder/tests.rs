use std::io::Cursor;

use crate::{command::Operation, error::HuffError, huffman::{MAX_NODES, NUM_SYMBOLS}};

use super::{compress, decompress, Transcoder, HEADER_BYTES};

const TREE_BYTES: usize = (MAX_NODES + 8 * NUM_SYMBOLS + 7) / 8;

#[test]
fn test_roundtrip_text() {
    let text = b"It was the best of times, it was the worst of times.\n";

    let container = compress(text).unwrap();

    assert!(container.len() > HEADER_BYTES + TREE_BYTES);
    assert_eq!(decompress(&container).unwrap(), text);
}

#[test]
fn test_header_holds_symbol_count() {
    let container = compress(b"hello").unwrap();

    assert_eq!(&container[..HEADER_BYTES], &5i32.to_le_bytes());
}

#[test]
fn test_empty_input() {
    let mut container = Vec::new();
    let stats = Transcoder::new().encode(&[], &mut container).unwrap();

    assert_eq!(container, vec![0, 0, 0, 0]);
    assert_eq!(stats.output_bytes, 4);
    assert_eq!(stats.tree_bits, 0);

    let mut out = Vec::new();
    let stats = Transcoder::new().decode(&container[..], &mut out).unwrap();

    assert!(out.is_empty());
    assert_eq!(stats.operation, Operation::Decompress);
    assert_eq!(stats.symbol_count, 0);
}

#[test]
fn test_single_symbol_input() {
    let data = vec![b'a'; 1000];

    let mut container = Vec::new();
    let stats = Transcoder::new().encode(&data, &mut container).unwrap();

    // one bit per symbol
    assert_eq!(stats.payload_bits, 1000);
    assert_eq!(stats.max_code_len, 1);
    assert_eq!(container.len(), HEADER_BYTES + TREE_BYTES + 125);
    assert_eq!(decompress(&container).unwrap(), data);
}

#[test]
fn test_full_alphabet_roundtrip() {
    let data: Vec<u8> = (0..=255u8).flat_map(|b| std::iter::repeat(b).take(b as usize % 17 + 1)).collect();

    let mut container = Vec::new();
    let stats = Transcoder::new().encode(&data, &mut container).unwrap();

    assert_eq!(stats.distinct_symbols, NUM_SYMBOLS);
    assert_eq!(stats.tree_bits as usize, MAX_NODES + 8 * NUM_SYMBOLS);
    assert_eq!(stats.output_bytes as usize, container.len());
    assert_eq!(decompress(&container).unwrap(), data);
}

#[test]
fn test_encoding_is_deterministic() {
    let data = b"abracadabra, abracadabra, abracadabra";

    assert_eq!(compress(data).unwrap(), compress(data).unwrap());
}

#[test]
fn test_seekable_matches_in_memory() {
    let data: Vec<u8> = (0..20_000u32).map(|i| ((i * 31 + i / 7) % 97) as u8).collect();

    let mut from_seekable = Vec::new();
    Transcoder::with_buffer_size(333).encode_seekable(Cursor::new(&data), &mut from_seekable).unwrap();

    assert_eq!(from_seekable, compress(&data).unwrap());
}

#[test]
fn test_seekable_starts_at_current_position() {
    let mut source = Cursor::new(b"cpayload".to_vec());
    source.set_position(1);

    let mut container = Vec::new();
    Transcoder::new().encode_seekable(&mut source, &mut container).unwrap();

    assert_eq!(decompress(&container).unwrap(), b"payload");
}

#[test]
fn test_small_buffers_roundtrip() {
    let data: Vec<u8> = (0..5000u32).map(|i| (i % 11) as u8 * 3).collect();
    let transcoder = Transcoder::with_buffer_size(7);

    let mut container = Vec::new();
    transcoder.encode(&data, &mut container).unwrap();
    let mut out = Vec::new();
    let stats = transcoder.decode(&container[..], &mut out).unwrap();

    assert_eq!(out, data);
    assert_eq!(stats.input_bytes as usize, container.len());
}

#[test]
fn test_missing_header() {
    assert!(matches!(decompress(&[]), Err(HuffError::WrongInput { .. })));
    assert!(matches!(decompress(&[1, 0]), Err(HuffError::WrongInput { .. })));
}

#[test]
fn test_negative_symbol_count() {
    let container = (-3i32).to_le_bytes();

    assert!(matches!(decompress(&container), Err(HuffError::WrongInput { .. })));
}

#[test]
fn test_truncated_payload() {
    let data = b"a payload that will not survive truncation".repeat(10);
    let mut container = compress(&data).unwrap();
    container.truncate(HEADER_BYTES + TREE_BYTES + 3);

    assert!(matches!(decompress(&container), Err(HuffError::WrongInput { .. })));
}

#[test]
fn test_truncated_tree() {
    let mut container = compress(b"short").unwrap();
    container.truncate(HEADER_BYTES + 10);

    assert!(matches!(decompress(&container), Err(HuffError::WrongInput { .. })));
}

#[test]
fn test_count_larger_than_payload() {
    let mut container = compress(b"xyzzy").unwrap();
    container[..HEADER_BYTES].copy_from_slice(&1_000_000i32.to_le_bytes());

    assert!(matches!(decompress(&container), Err(HuffError::WrongInput { .. })));
}

#[test]
fn test_stats() {
    let data = b"aaab";
    let mut container = Vec::new();
    let stats = Transcoder::new().encode(data, &mut container).unwrap();

    assert_eq!(stats.operation, Operation::Compress);
    assert_eq!(stats.symbol_count, 4);
    assert_eq!(stats.input_bytes, 4);
    assert_eq!(stats.payload_bits, 5);
    assert_eq!(stats.distinct_symbols, 2);
    assert_eq!(stats.output_bytes as usize, container.len());
    assert!(stats.ratio() > 1.0);
}
