//! Symbol id numbering.
//!
//! v6–v8 store `major * 10 + minor` in an `i16`; v9+ store
//! `major * 1000 + minor` in an `i32`.

use super::constants::{FIRST_SYNTHETIC_SYMBOL, FIRST_UNTRIED_SYMBOL};
use crate::error::{OcadError, Result};
use crate::types::{FormatVersion, SymbolId};
use ahash::{AHashMap, AHashSet};

/// Largest major part storable by v6–v8.
const LEGACY_MAX_MAJOR: u32 = 999;

fn max_minor(version: FormatVersion) -> u16 {
    (version.symbol_id_scale() - 1) as u16
}

fn max_major(version: FormatVersion) -> u32 {
    if version.is_legacy() {
        LEGACY_MAX_MAJOR
    } else {
        (i32::MAX / version.symbol_id_scale()) as u32 - 1
    }
}

/// Id of a stored symbol number. `None` for the reserved negative numbers.
pub fn symbol_id_from_number(number: i32, version: FormatVersion) -> Option<SymbolId> {
    if number < 0 {
        return None;
    }
    let scale = version.symbol_id_scale();
    Some(SymbolId::new((number / scale) as u32, (number % scale) as u16))
}

/// Stored number of an id. Parts the version cannot hold are clamped to
/// their maximum and the second value is `true`.
pub fn encode_symbol_id(id: SymbolId, version: FormatVersion) -> (i32, bool) {
    let major = id.major.min(max_major(version));
    let minor = id.minor.min(max_minor(version));
    let clamped = major != id.major || minor != id.minor;
    (major as i32 * version.symbol_id_scale() + minor as i32, clamped)
}

/// First number at or after 920.0 not in `used`.
pub fn find_unused(used: &AHashSet<i32>, version: FormatVersion) -> Result<i32> {
    let (start_major, start_minor) = FIRST_UNTRIED_SYMBOL;
    let limit = max_minor(version).min(9);
    let top = max_major(version);
    let candidates = (start_major..=top).chain(1..start_major);
    for major in candidates {
        let first_minor = if major == start_major { start_minor } else { 0 };
        for minor in first_minor..=limit {
            let (number, _) = encode_symbol_id(SymbolId::new(major, minor), version);
            if !used.contains(&number) {
                return Ok(number);
            }
        }
    }
    Err(OcadError::NumericOverflow("no unused symbol number left".to_string()))
}

/// Write-side assignment of stored numbers to symbol ids.
///
/// Every definition is assigned once up front so later references
/// (area borders, text center points, objects) resolve to the same number.
#[derive(Debug)]
pub struct SymbolNumbering {
    version: FormatVersion,
    numbers: AHashMap<SymbolId, i32>,
    used: AHashSet<i32>,
}

impl SymbolNumbering {
    pub fn new(version: FormatVersion) -> Self {
        SymbolNumbering {
            version,
            numbers: AHashMap::new(),
            used: AHashSet::new(),
        }
    }

    /// Assign a number to `id`. Clamping or a collision moves the id to an
    /// unused number; the returned error describes that data loss.
    pub fn assign(&mut self, id: SymbolId) -> Result<(i32, Option<OcadError>)> {
        if let Some(number) = self.numbers.get(&id) {
            return Ok((*number, None));
        }
        let (mut number, clamped) = encode_symbol_id(id, self.version);
        let mut loss = None;
        if clamped {
            loss = Some(OcadError::NumericOverflow(format!(
                "symbol id {} does not fit {}",
                id, self.version
            )));
        }
        if self.used.contains(&number) {
            number = find_unused(&self.used, self.version)?;
            if loss.is_none() {
                loss = Some(OcadError::NumericOverflow(format!(
                    "symbol id {} collides after conversion to {}",
                    id, self.version
                )));
            }
        }
        self.used.insert(number);
        self.numbers.insert(id, number);
        Ok((number, loss))
    }

    pub fn number_of(&self, id: SymbolId) -> Option<i32> {
        self.numbers.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Read-side source of ids for definitions synthesized while expanding
/// rectangle symbols. Owned by one read session.
#[derive(Debug)]
pub struct SyntheticIdAllocator {
    next: i32,
    version: FormatVersion,
}

impl SyntheticIdAllocator {
    pub fn new(version: FormatVersion) -> Self {
        let next = if version.is_legacy() {
            // 999950 in v9 numbering is 999.9 in legacy numbering.
            FIRST_SYNTHETIC_SYMBOL / 1000 * 10 + 9
        } else {
            FIRST_SYNTHETIC_SYMBOL
        };
        SyntheticIdAllocator { next, version }
    }

    /// Next id for which `taken` is false.
    pub fn allocate(&mut self, taken: impl Fn(SymbolId) -> bool) -> Result<SymbolId> {
        loop {
            let id = symbol_id_from_number(self.next, self.version).ok_or_else(|| {
                OcadError::NumericOverflow("synthetic symbol ids exhausted".to_string())
            })?;
            self.next -= 1;
            if !taken(id) {
                return Ok(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_conversion() {
        let v8 = FormatVersion::V8;
        assert_eq!(encode_symbol_id(SymbolId::new(101, 2), v8), (1012, false));
        assert_eq!(symbol_id_from_number(1012, v8), Some(SymbolId::new(101, 2)));
        assert_eq!(symbol_id_from_number(-2, v8), None);
    }

    #[test]
    fn test_modern_conversion() {
        let v9 = FormatVersion::V9;
        assert_eq!(encode_symbol_id(SymbolId::new(534, 2), v9), (534002, false));
        assert_eq!(symbol_id_from_number(534002, v9), Some(SymbolId::new(534, 2)));
    }

    #[test]
    fn test_clamping() {
        assert_eq!(encode_symbol_id(SymbolId::new(1200, 3), FormatVersion::V7), (9993, true));
        assert_eq!(encode_symbol_id(SymbolId::new(12, 15), FormatVersion::V7), (129, true));
        assert_eq!(encode_symbol_id(SymbolId::new(12, 1500), FormatVersion::V10), (12999, true));
    }

    #[test]
    fn test_find_unused_starts_at_920() {
        let mut used = AHashSet::new();
        assert_eq!(find_unused(&used, FormatVersion::V8).unwrap(), 9200);
        used.insert(9200);
        used.insert(9201);
        assert_eq!(find_unused(&used, FormatVersion::V8).unwrap(), 9202);
        for minor in 0..=9 {
            used.insert(9200 + minor);
        }
        assert_eq!(find_unused(&used, FormatVersion::V8).unwrap(), 9210);
        assert_eq!(find_unused(&AHashSet::new(), FormatVersion::V9).unwrap(), 920000);
    }

    #[test]
    fn test_numbering_moves_collisions() {
        let mut numbering = SymbolNumbering::new(FormatVersion::V8);
        let (a, loss) = numbering.assign(SymbolId::new(999, 0)).unwrap();
        assert_eq!(a, 9990);
        assert!(loss.is_none());
        let (b, loss) = numbering.assign(SymbolId::new(1500, 0)).unwrap();
        assert_eq!(b, 9200);
        assert!(matches!(loss, Some(OcadError::NumericOverflow(_))));
        assert_eq!(numbering.number_of(SymbolId::new(1500, 0)), Some(9200));
        assert_eq!(numbering.assign(SymbolId::new(999, 0)).unwrap().0, 9990);
    }

    #[test]
    fn test_synthetic_ids_skip_taken() {
        let mut alloc = SyntheticIdAllocator::new(FormatVersion::V9);
        let taken = SymbolId::new(999, 950);
        let id = alloc.allocate(|id| id == taken).unwrap();
        assert_eq!(id, SymbolId::new(999, 949));
        let id = alloc.allocate(|_| false).unwrap();
        assert_eq!(id, SymbolId::new(999, 948));

        let mut legacy = SyntheticIdAllocator::new(FormatVersion::V6);
        assert_eq!(legacy.allocate(|_| false).unwrap(), SymbolId::new(999, 9));
    }
}
