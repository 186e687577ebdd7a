//! 9-bit LZW used for v8 toolbox icons.
//!
//! Codes are packed LSB first. Codes 0..=255 are literal bytes, 257 ends
//! the stream and new strings are numbered from 258 up to 511; once the
//! table is full no further strings are added.

use super::{Compressor, Decompressor};
use crate::error::{OcadError, Result};

const BITS: u32 = 9;
/// Prime, so a hash probe visits every slot before repeating.
const TABLE_SIZE: usize = 541;
const HASHING_SHIFT: u32 = BITS - 8;
const MAX_CODE: i32 = (1 << BITS) - 1;
const BIT_MASK: u64 = (1 << BITS) - 1;
const END_OF_STREAM: i32 = 257;
const FIRST_CODE: i32 = 258;
const DECODE_STACK_SIZE: usize = 4000;

/// The icon LZW codec. Stateless between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lzw;

impl Lzw {
    pub fn new() -> Self {
        Lzw
    }
}

struct BitSink<'a> {
    out: &'a mut [u8],
    index: usize,
    buffer: u64,
    count: u32,
}

impl<'a> BitSink<'a> {
    fn put(&mut self, code: i32) -> Result<()> {
        self.buffer |= (code as u64) << self.count;
        self.count += BITS;
        while self.count >= 8 {
            self.push((self.buffer & 0xFF) as u8)?;
            self.buffer >>= 8;
            self.count -= 8;
        }
        Ok(())
    }

    fn push(&mut self, byte: u8) -> Result<()> {
        let capacity = self.out.len();
        let slot = self.out.get_mut(self.index).ok_or(OcadError::BufferCapacityExceeded {
            needed: self.index + 1,
            capacity,
        })?;
        *slot = byte;
        self.index += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<usize> {
        if self.count > 0 {
            self.push((self.buffer & 0xFF) as u8)?;
        }
        Ok(self.index)
    }
}

struct BitSource<'a> {
    input: &'a [u8],
    index: usize,
    buffer: u64,
    count: u32,
}

impl<'a> BitSource<'a> {
    fn get(&mut self) -> Result<i32> {
        while self.count < BITS {
            let byte = *self.input.get(self.index).ok_or_else(|| {
                OcadError::MalformedStructure("LZW stream ends without end code".to_string())
            })?;
            self.index += 1;
            self.buffer |= (byte as u64) << self.count;
            self.count += 8;
        }
        let code = (self.buffer & BIT_MASK) as i32;
        self.buffer >>= BITS;
        self.count -= BITS;
        Ok(code)
    }
}

fn find_match(code_value: &[i32], prefix_code: &[i32], append: &[u8], prefix: i32, ch: u8) -> usize {
    let mut index = (((ch as i32) << HASHING_SHIFT) ^ prefix) as usize % TABLE_SIZE;
    let offset = if index == 0 { 1 } else { TABLE_SIZE - index };
    loop {
        if code_value[index] == -1 {
            return index;
        }
        if prefix_code[index] == prefix && append[index] == ch {
            return index;
        }
        index = (index + TABLE_SIZE - offset) % TABLE_SIZE;
    }
}

impl Compressor for Lzw {
    fn compress(&self, source: &[u8], destination: &mut [u8]) -> Result<usize> {
        let mut code_value = [-1i32; TABLE_SIZE];
        let mut prefix_code = [0i32; TABLE_SIZE];
        let mut append = [0u8; TABLE_SIZE];
        let mut next_code = FIRST_CODE;

        let mut sink = BitSink {
            out: destination,
            index: 0,
            buffer: 0,
            count: 0,
        };

        let (first, rest) = match source.split_first() {
            Some(split) => split,
            None => {
                sink.put(END_OF_STREAM)?;
                return sink.flush();
            }
        };

        let mut string_code = *first as i32;
        for &ch in rest {
            let index = find_match(&code_value, &prefix_code, &append, string_code, ch);
            if code_value[index] != -1 {
                string_code = code_value[index];
            } else {
                if next_code <= MAX_CODE {
                    code_value[index] = next_code;
                    prefix_code[index] = string_code;
                    append[index] = ch;
                    next_code += 1;
                }
                sink.put(string_code)?;
                string_code = ch as i32;
            }
        }

        sink.put(string_code)?;
        sink.put(END_OF_STREAM)?;
        sink.flush()
    }
}

impl Decompressor for Lzw {
    fn expand(&self, source: &[u8], destination: &mut [u8]) -> Result<usize> {
        let mut prefix_code = [0i32; TABLE_SIZE];
        let mut append = [0u8; TABLE_SIZE];
        let mut stack = vec![0u8; DECODE_STACK_SIZE];
        let mut next_code = FIRST_CODE;
        let capacity = destination.len();
        let mut out_index = 0usize;

        let mut input = BitSource {
            input: source,
            index: 0,
            buffer: 0,
            count: 0,
        };

        // Push the string of `code` onto the stack starting at `start`,
        // returning the index of its first byte.
        let decode_string = |stack: &mut [u8], prefix_code: &[i32], append: &[u8], start: usize, mut code: i32| -> Result<usize> {
            let mut sp = start;
            while code > 255 {
                if sp >= stack.len() - 1 {
                    return Err(OcadError::MalformedStructure(
                        "LZW code expansion too deep".to_string(),
                    ));
                }
                stack[sp] = append[code as usize];
                sp += 1;
                code = prefix_code[code as usize];
            }
            stack[sp] = code as u8;
            Ok(sp)
        };

        let mut old_code = input.get()?;
        if old_code == END_OF_STREAM {
            return Ok(0);
        }
        let mut character = old_code as u8;
        let first = destination.get_mut(0).ok_or(OcadError::BufferCapacityExceeded {
            needed: 1,
            capacity,
        })?;
        *first = character;
        out_index += 1;

        loop {
            let new_code = input.get()?;
            if new_code == END_OF_STREAM {
                break;
            }
            let top = if new_code >= next_code {
                stack[0] = character;
                decode_string(&mut stack, &prefix_code, &append, 1, old_code)?
            } else {
                decode_string(&mut stack, &prefix_code, &append, 0, new_code)?
            };

            character = stack[top];
            for i in (0..=top).rev() {
                let slot = destination.get_mut(out_index).ok_or(OcadError::BufferCapacityExceeded {
                    needed: out_index + 1,
                    capacity,
                })?;
                *slot = stack[i];
                out_index += 1;
            }

            if next_code <= MAX_CODE {
                prefix_code[next_code as usize] = old_code;
                append[next_code as usize] = character;
                next_code += 1;
            }
            old_code = new_code;
        }

        Ok(out_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(data: &[u8]) -> Vec<u8> {
        let lzw = Lzw::new();
        let mut packed = vec![0xFFu8; 248];
        let used = lzw.compress(data, &mut packed).unwrap();
        assert!(used <= 248);
        let mut out = vec![0u8; data.len()];
        let n = lzw.expand(&packed, &mut out).unwrap();
        assert_eq!(n, data.len());
        out
    }

    #[test]
    fn test_all_zero_icon() {
        let data = vec![0u8; 484];
        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn test_all_ff_icon() {
        let data = vec![0xFFu8; 484];
        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn test_repeating_pattern() {
        let data: Vec<u8> = (0..484).map(|i| (i % 7) as u8 * 25).collect();
        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn test_overflow_reports_capacity() {
        // A byte sequence without repeats needs one 9-bit code per byte.
        let data: Vec<u8> = (0..=255u8).chain(0..=255u8).take(484).collect();
        let mut packed = vec![0u8; 248];
        let err = Lzw::new().compress(&data, &mut packed).unwrap_err();
        assert!(matches!(err, OcadError::BufferCapacityExceeded { capacity: 248, .. }));
    }

    #[test]
    fn test_colliding_hash_chain_terminates() {
        let data = [
            106, 87, 34, 32, 85, 98, 83, 49, 121, 36, 106, 53, 96, 0, 49, 0, 0, 0, 81, 48, 67,
            57, 75, 61,
        ];
        let lzw = Lzw::new();
        let mut packed = [0u8; 1024];
        let used = lzw.compress(&data, &mut packed).unwrap();
        let mut out = [0u8; 24];
        let n = lzw.expand(&packed[..used], &mut out).unwrap();
        assert_eq!(n, data.len());
        assert_eq!(out, data);
    }

    #[test]
    fn test_full_code_table_round_trips() {
        // Enough distinct pairs to use every code up to 511.
        let data: Vec<u8> = (0..484u32).map(|i| ((i * 37 + i / 11) % 251) as u8).collect();
        let lzw = Lzw::new();
        let mut packed = vec![0u8; 2048];
        let used = lzw.compress(&data, &mut packed).unwrap();
        let mut out = vec![0u8; data.len()];
        assert_eq!(lzw.expand(&packed[..used], &mut out).unwrap(), data.len());
        assert_eq!(out, data);
    }

    #[test]
    fn test_truncated_stream_is_malformed() {
        let mut out = vec![0u8; 16];
        let err = Lzw::new().expand(&[0x41], &mut out).unwrap_err();
        assert!(matches!(err, OcadError::MalformedStructure(_)));
    }
}
