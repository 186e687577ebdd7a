//! Point symbol definition

use super::SymbolCommon;
use crate::glyph::Glyph;
use crate::types::SymbolId;

#[derive(Debug, Clone, PartialEq)]
pub struct PointSymDef {
    pub common: SymbolCommon,
    pub glyph: Glyph,
    /// Instances may be rotated.
    pub rotatable: bool,
}

impl PointSymDef {
    pub fn new(id: SymbolId, name: impl Into<String>) -> Self {
        PointSymDef {
            common: SymbolCommon::new(id, name),
            glyph: Glyph::new(),
            rotatable: false,
        }
    }
}
