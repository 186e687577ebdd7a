//! Linked blocks of 256 fixed-size entries.
//!
//! Each block starts with the file offset of the next block (zero for the
//! last one) followed by [`BLOCK_ENTRIES`] entries. Symbol blocks hold
//! record offsets, object index blocks hold [`IndexEntry`] values and string
//! blocks hold [`StringIndexEntry`] values.
//!
//! [`IndexEntry`]: super::records::IndexEntry
//! [`StringIndexEntry`]: super::records::StringIndexEntry

use super::constants::BLOCK_ENTRIES;
use super::stream::{OcadStreamReader, OcadStreamWriter};
use crate::error::{OcadError, Result};
use ahash::AHashSet;

// ------------------------------------------------------------------
// Reading
// ------------------------------------------------------------------

/// Entries recovered from one chain.
#[derive(Debug)]
pub struct ChainRead<T> {
    /// Offsets of the blocks visited, in chain order.
    pub blocks: Vec<u64>,
    pub entries: Vec<T>,
    /// Why the walk stopped early, if it did.
    pub damage: Option<OcadError>,
}

impl<T> Default for ChainRead<T> {
    fn default() -> Self {
        ChainRead {
            blocks: Vec::new(),
            entries: Vec::new(),
            damage: None,
        }
    }
}

/// Walk the chain starting at `first`.
///
/// A block outside the file, a cycle or a damaged entry ends the walk; the
/// entries read so far are kept and the cause is returned in `damage`.
pub fn read_chain<T>(
    reader: &mut OcadStreamReader<'_>,
    first: i32,
    entry_size: usize,
    mut read_entry: impl FnMut(&mut OcadStreamReader<'_>) -> Result<T>,
) -> ChainRead<T> {
    let mut out = ChainRead::default();
    let block_size = (4 + BLOCK_ENTRIES * entry_size) as u64;
    let mut visited = AHashSet::new();
    let mut pos = first as i64;

    while pos != 0 {
        if !reader.contains(pos, block_size) {
            out.damage = Some(OcadError::MalformedStructure(format!(
                "block at {} lies outside the file",
                pos
            )));
            break;
        }
        if !visited.insert(pos) {
            out.damage = Some(OcadError::MalformedStructure(format!(
                "block chain loops back to {}",
                pos
            )));
            break;
        }
        log::debug!("reading block at {}", pos);
        out.blocks.push(pos as u64);

        let block = (|| -> Result<(i64, Vec<T>)> {
            reader.seek(pos as u64)?;
            let next = reader.read_i32()? as i64;
            let mut entries = Vec::with_capacity(BLOCK_ENTRIES);
            for _ in 0..BLOCK_ENTRIES {
                entries.push(read_entry(reader)?);
            }
            Ok((next, entries))
        })();

        match block {
            Ok((next, entries)) => {
                out.entries.extend(entries);
                pos = next;
            }
            Err(err) => {
                out.damage = Some(err);
                break;
            }
        }
    }
    out
}

// ------------------------------------------------------------------
// Writing
// ------------------------------------------------------------------

/// Appends blocks and links each one into the previous block.
#[derive(Debug, Default)]
pub struct BlockChainWriter {
    first: i32,
    previous: Option<u64>,
    count: usize,
}

impl BlockChainWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset of the first block, zero when none was written.
    pub fn first(&self) -> i32 {
        self.first
    }

    pub fn block_count(&self) -> usize {
        self.count
    }

    /// Write one block at the current position. Slots past `entries` are
    /// zero. Returns the block offset.
    pub fn write_block<T>(
        &mut self,
        writer: &mut OcadStreamWriter,
        entries: &[T],
        entry_size: usize,
        mut write_entry: impl FnMut(&T, &mut OcadStreamWriter) -> Result<()>,
    ) -> Result<u64> {
        if entries.len() > BLOCK_ENTRIES {
            return Err(OcadError::Custom(format!(
                "{} entries do not fit one block",
                entries.len()
            )));
        }
        let pos = writer.position();
        let offset = i32::try_from(pos)
            .map_err(|_| OcadError::NumericOverflow(format!("block offset {} exceeds 2 GiB", pos)))?;
        writer.write_i32(0)?;
        for entry in entries {
            write_entry(entry, writer)?;
        }
        writer.write_zeros((BLOCK_ENTRIES - entries.len()) * entry_size)?;

        match self.previous {
            Some(prev) => writer.patch_i32(prev, offset)?,
            None => self.first = offset,
        }
        self.previous = Some(pos);
        self.count += 1;
        log::debug!("wrote block {} at {}", self.count, pos);
        Ok(pos)
    }
}

/// Collects entries and writes a block whenever 256 are pending.
#[derive(Debug)]
pub struct BlockBuilder<T> {
    chain: BlockChainWriter,
    pending: Vec<T>,
    entry_size: usize,
}

impl<T> BlockBuilder<T> {
    pub fn new(entry_size: usize) -> Self {
        BlockBuilder {
            chain: BlockChainWriter::new(),
            pending: Vec::with_capacity(BLOCK_ENTRIES),
            entry_size,
        }
    }

    pub fn push(
        &mut self,
        writer: &mut OcadStreamWriter,
        entry: T,
        write_entry: impl FnMut(&T, &mut OcadStreamWriter) -> Result<()>,
    ) -> Result<()> {
        self.pending.push(entry);
        if self.pending.len() == BLOCK_ENTRIES {
            self.flush(writer, write_entry)?;
        }
        Ok(())
    }

    fn flush(
        &mut self,
        writer: &mut OcadStreamWriter,
        write_entry: impl FnMut(&T, &mut OcadStreamWriter) -> Result<()>,
    ) -> Result<()> {
        let pending = std::mem::take(&mut self.pending);
        self.chain.write_block(writer, &pending, self.entry_size, write_entry)?;
        Ok(())
    }

    /// Write the remaining entries. With `always` a block is written even
    /// when none are pending. Returns the chain writer for its first offset.
    pub fn finish(
        mut self,
        writer: &mut OcadStreamWriter,
        always: bool,
        write_entry: impl FnMut(&T, &mut OcadStreamWriter) -> Result<()>,
    ) -> Result<BlockChainWriter> {
        if always || !self.pending.is_empty() {
            self.flush(writer, write_entry)?;
        }
        Ok(self.chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_i32(v: &i32, w: &mut OcadStreamWriter) -> Result<()> {
        w.write_i32(*v)
    }

    fn chain_of(count: i32, always: bool) -> (Vec<u8>, BlockChainWriter) {
        let mut w = OcadStreamWriter::new();
        w.write_zeros(48).unwrap();
        let mut builder = BlockBuilder::new(4);
        for i in 1..=count {
            builder.push(&mut w, i, write_i32).unwrap();
        }
        let chain = builder.finish(&mut w, always, write_i32).unwrap();
        (w.into_inner(), chain)
    }

    #[test]
    fn test_six_hundred_entries_make_three_blocks() {
        let (bytes, chain) = chain_of(600, false);
        assert_eq!(chain.block_count(), 3);

        let mut r = OcadStreamReader::new(&bytes);
        let read = read_chain(&mut r, chain.first(), 4, |r| r.read_i32());
        assert!(read.damage.is_none());
        assert_eq!(read.blocks.len(), 3);
        assert_eq!(read.entries.len(), 3 * 256);
        assert_eq!(read.entries.iter().filter(|v| **v != 0).count(), 600);

        // Each next pointer is the following block's offset; the last is zero.
        let next_of = |pos: u64| {
            let p = pos as usize;
            i32::from_le_bytes([bytes[p], bytes[p + 1], bytes[p + 2], bytes[p + 3]])
        };
        assert_eq!(next_of(read.blocks[0]) as u64, read.blocks[1]);
        assert_eq!(next_of(read.blocks[1]) as u64, read.blocks[2]);
        assert_eq!(next_of(read.blocks[2]), 0);
    }

    #[test]
    fn test_empty_chain() {
        let (_, chain) = chain_of(0, false);
        assert_eq!(chain.first(), 0);
        let (_, chain) = chain_of(0, true);
        assert_eq!(chain.block_count(), 1);
        let (_, chain) = chain_of(256, false);
        assert_eq!(chain.block_count(), 1);
    }

    #[test]
    fn test_out_of_bounds_block_is_damage() {
        let bytes = vec![0u8; 64];
        let mut r = OcadStreamReader::new(&bytes);
        let read = read_chain(&mut r, 5000, 4, |r| r.read_i32());
        assert!(read.entries.is_empty());
        assert!(matches!(read.damage, Some(OcadError::MalformedStructure(_))));
    }

    #[test]
    fn test_cycle_is_detected() {
        let (mut bytes, chain) = chain_of(10, false);
        let first = chain.first() as usize;
        bytes[first..first + 4].copy_from_slice(&(chain.first()).to_le_bytes());
        let mut r = OcadStreamReader::new(&bytes);
        let read = read_chain(&mut r, chain.first(), 4, |r| r.read_i32());
        assert_eq!(read.blocks.len(), 1);
        assert!(read.damage.is_some());
    }
}
