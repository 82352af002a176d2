use std::io::Cursor;

use crate::{
    error::HuffError,
    huffman::{CodeTable, FrequencyTable, HuffmanTree},
};

use super::{BinaryWriter, BinaryReader};

fn written(build: impl FnOnce(&mut BinaryWriter<Vec<u8>>)) -> Vec<u8> {
    let mut writer = BinaryWriter::new(Vec::new()).unwrap();
    build(&mut writer);
    writer.finish().unwrap()
}

#[test]
fn test_simple_integer_writing() {
    let bytes = written(|w| {
        w.push_bits(5, 3).unwrap();
        w.push_bits(10, 4).unwrap();
        w.push_bits(5, 3).unwrap();
    });

    assert_eq!(bytes.len(), 2);

    let mut binary_reader = BinaryReader::new(Cursor::new(bytes)).unwrap();

    assert_eq!(binary_reader.read_int(3).unwrap(), 5);
    assert_eq!(binary_reader.read_int(4).unwrap(), 10);
    assert_eq!(binary_reader.read_int(3).unwrap(), 5);
}

#[test]
fn test_msb_first_layout() {
    let bytes = written(|w| {
        w.push_bit(true).unwrap();
        w.push_bits(0b0100_0001, 8).unwrap();
    });

    // 1 | 01000001 | 0000000 padding
    assert_eq!(bytes, vec![0b1010_0000, 0b1000_0000]);
}

#[test]
fn test_final_byte_zero_padded() {
    let bytes = written(|w| w.push_bits(0b111, 3).unwrap());

    assert_eq!(bytes, vec![0b1110_0000]);
}

#[test]
fn test_nothing_written_produces_no_bytes() {
    let bytes = written(|_| {});

    assert!(bytes.is_empty());
}

#[test]
fn test_align_between_regions() {
    let bytes = written(|w| {
        w.push_bits(0b11, 2).unwrap();
        w.align().unwrap();
        assert!(w.is_aligned());
        w.push_bits(0b1, 1).unwrap();
    });

    assert_eq!(bytes, vec![0b1100_0000, 0b1000_0000]);

    let mut binary_reader = BinaryReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(binary_reader.read_int(2).unwrap(), 0b11);
    binary_reader.align();
    assert!(binary_reader.read_bit().unwrap());
    assert_eq!(binary_reader.read_bits, 9);
}

#[test]
fn test_align_is_noop_on_boundary() {
    let bytes = written(|w| {
        w.push_bits(0xAB, 8).unwrap();
        w.align().unwrap();
        w.push_bits(0xCD, 8).unwrap();
    });

    assert_eq!(bytes, vec![0xAB, 0xCD]);
}

#[test]
fn test_written_bits_number_correctness() {
    let mut writer = BinaryWriter::new(Vec::new()).unwrap();

    writer.push_bits(0, 10).unwrap();
    writer.push_bits(1, 5).unwrap();
    writer.push_bit(false).unwrap();
    writer.push_bits(3, 7).unwrap();

    assert_eq!(writer.written_bits, 23);
}

#[test]
fn test_wide_integers() {
    let bytes = written(|w| {
        w.push_bits(1, 1).unwrap();
        w.push_bits(u64::MAX, 64).unwrap();
        w.push_bits(0x0123_4567_89AB_CDEF, 64).unwrap();
    });

    let mut binary_reader = BinaryReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(binary_reader.read_int(1).unwrap(), 1);
    assert_eq!(binary_reader.read_int(64).unwrap(), u64::MAX);
    assert_eq!(binary_reader.read_int(64).unwrap(), 0x0123_4567_89AB_CDEF);
}

#[test]
fn test_packed_codes() {
    let code = [0b1011_0011, 0b0110_0000];
    let bytes = written(|w| {
        w.push_packed(&code, 11).unwrap();
        w.push_packed(&code, 3).unwrap();
    });

    let mut binary_reader = BinaryReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(binary_reader.read_int(11).unwrap(), 0b1011_0011_011);
    assert_eq!(binary_reader.read_int(3).unwrap(), 0b101);
}

#[test]
fn test_small_buffers_flush_in_order() {
    let mut writer = BinaryWriter::with_buffer_size(Vec::new(), 1).unwrap();
    for b in 0..=255u64 {
        writer.push_bits(b, 8).unwrap();
    }
    let bytes = writer.finish().unwrap();

    assert_eq!(bytes, (0..=255u8).collect::<Vec<_>>());

    let mut binary_reader = BinaryReader::with_buffer_size(Cursor::new(bytes), 3).unwrap();
    for b in 0..=255u64 {
        assert_eq!(binary_reader.read_int(8).unwrap(), b);
    }
}

#[test]
fn test_reading_past_the_end() {
    let mut binary_reader = BinaryReader::new(Cursor::new(vec![0xFF])).unwrap();

    assert_eq!(binary_reader.read_int(8).unwrap(), 0xFF);
    assert!(matches!(binary_reader.read_bit(), Err(HuffError::WrongInput { .. })));
}

#[test]
fn test_reading_empty_source() {
    let mut binary_reader = BinaryReader::new(Cursor::new(Vec::new())).unwrap();

    assert!(matches!(binary_reader.read_int(3), Err(HuffError::WrongInput { .. })));
}

#[test]
fn test_push_code_writes_the_path_bits() {
    // "aaab" yields a = 1 and b = 01
    let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"aaab")).unwrap();
    let table = CodeTable::from_tree(&tree).unwrap();

    let mut writer = BinaryWriter::new(Vec::new()).unwrap();
    for &byte in b"baab" {
        writer.push_code(table.code(byte)).unwrap();
    }

    assert_eq!(writer.written_bits, 6);
    assert_eq!(writer.finish().unwrap(), vec![0b0111_0100]);
}
