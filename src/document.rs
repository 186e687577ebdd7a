//! Map document structure

use crate::instances::SymbolInstance;
use crate::notification::{NotificationCollection, ReadDiagnostics};
use crate::symbols::SymbolDefinition;
use crate::template::Template;
use crate::types::{BoundingBox2D, Color, ColorId, FormatVersion, SymbolId, Vector2};
use indexmap::IndexMap;

/// Symbol definitions keyed by identity, in file order.
pub type SymbolTable = IndexMap<SymbolId, SymbolDefinition, ahash::RandomState>;

/// Georeferencing of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RealWorldCoords {
    pub enabled: bool,
    /// Real-world position of the paper origin, in meters.
    pub offset: Vector2,
    /// Degrees.
    pub angle: f64,
    /// Real-world grid spacing in meters.
    pub grid_distance: f64,
    /// Paper grid spacing in mm.
    pub paper_grid_distance: f64,
    /// Local offset (v10+).
    pub local_offset: Vector2,
    /// Grid and zone code (`i` scale parameter, v9+).
    pub grid_and_zone: i32,
}

impl Default for RealWorldCoords {
    fn default() -> Self {
        RealWorldCoords {
            enabled: false,
            offset: Vector2::ZERO,
            angle: 0.0,
            grid_distance: 500.0,
            paper_grid_distance: 50.0,
            local_offset: Vector2::ZERO,
            grid_and_zone: 0,
        }
    }
}

/// Raw v6–v8 records kept to reproduce bytes the model does not expose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedStructures {
    /// Symbol header with its color table cleared.
    pub symbol_header: Option<Vec<u8>>,
    pub setup: Option<Vec<u8>>,
}

/// The root aggregate of a map.
#[derive(Debug, Clone)]
pub struct MapDocument {
    /// Version the document was read from, if any.
    pub version: Option<FormatVersion>,
    /// Palette in paint order.
    colors: Vec<Color>,
    symbols: SymbolTable,
    instances: Vec<SymbolInstance>,
    pub map_scale: f64,
    pub print_scale: f64,
    /// Zero-sized when no print area is set.
    pub print_area: BoundingBox2D,
    pub real_world: RealWorldCoords,
    pub templates: Vec<Template>,
    pub hide_templates: bool,
    pub hide_layout: bool,
    pub use_euclidean_distance: bool,
    /// Free-text notes, lines separated by CR-LF.
    pub file_info: String,
    pub saved: SavedStructures,
    /// Conditions tolerated while reading.
    pub notifications: NotificationCollection,
    pub diagnostics: ReadDiagnostics,
}

impl MapDocument {
    pub const DEFAULT_SCALE: f64 = 10000.0;

    pub fn new() -> Self {
        MapDocument {
            version: None,
            colors: Vec::new(),
            symbols: SymbolTable::default(),
            instances: Vec::new(),
            map_scale: Self::DEFAULT_SCALE,
            print_scale: Self::DEFAULT_SCALE,
            print_area: BoundingBox2D::default(),
            real_world: RealWorldCoords::default(),
            templates: Vec::new(),
            hide_templates: false,
            hide_layout: false,
            use_euclidean_distance: false,
            file_info: String::new(),
            saved: SavedStructures::default(),
            notifications: NotificationCollection::new(),
            diagnostics: ReadDiagnostics::default(),
        }
    }

    // ------------------------------------------------------------------
    // Colors
    // ------------------------------------------------------------------

    /// Append a color on top of the palette.
    pub fn add_color(&mut self, color: Color) {
        self.colors.push(color);
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn color(&self, id: ColorId) -> Option<&Color> {
        self.colors.iter().find(|c| c.id == id)
    }

    /// Resolve a stored color id. Unknown ids fall back to the topmost
    /// palette color; `None` only when the palette is empty.
    pub fn resolve_color(&self, id: ColorId) -> Option<ColorId> {
        if self.color(id).is_some() {
            Some(id)
        } else {
            self.colors.last().map(|c| c.id)
        }
    }

    // ------------------------------------------------------------------
    // Symbols
    // ------------------------------------------------------------------

    /// Insert a definition, replacing any with the same id.
    pub fn add_symbol(&mut self, def: impl Into<SymbolDefinition>) -> Option<SymbolDefinition> {
        let def = def.into();
        self.symbols.insert(def.id(), def)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&SymbolDefinition> {
        self.symbols.get(&id)
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut SymbolDefinition> {
        self.symbols.get_mut(&id)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &SymbolDefinition> {
        self.symbols.values()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    // ------------------------------------------------------------------
    // Instances
    // ------------------------------------------------------------------

    pub fn add_instance(&mut self, instance: SymbolInstance) {
        self.instances.push(instance);
    }

    pub fn instances(&self) -> &[SymbolInstance] {
        &self.instances
    }

    /// Instances placed with the given definition.
    pub fn instances_of(&self, id: SymbolId) -> impl Iterator<Item = &SymbolInstance> {
        self.instances.iter().filter(move |i| i.symbol() == Some(id))
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

impl Default for MapDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::PointSymDef;
    use crate::types::Cmyk;

    #[test]
    fn test_color_fallback_to_topmost() {
        let mut doc = MapDocument::new();
        assert_eq!(doc.resolve_color(ColorId(4)), None);
        doc.add_color(Color::new(ColorId(1), "Black", Cmyk::BLACK));
        doc.add_color(Color::new(ColorId(7), "Brown", Cmyk::new(0.0, 0.56, 1.0, 0.18)));
        assert_eq!(doc.resolve_color(ColorId(1)), Some(ColorId(1)));
        assert_eq!(doc.resolve_color(ColorId(99)), Some(ColorId(7)));
    }

    #[test]
    fn test_symbol_replaced_by_id() {
        let mut doc = MapDocument::new();
        let id = SymbolId::new(101, 0);
        assert!(doc.add_symbol(PointSymDef::new(id, "Hill")).is_none());
        assert!(doc.add_symbol(PointSymDef::new(id, "Knoll")).is_some());
        assert_eq!(doc.symbol_count(), 1);
        assert_eq!(doc.symbol(id).map(|s| s.name()), Some("Knoll"));
    }

    #[test]
    fn test_defaults() {
        let doc = MapDocument::default();
        assert_eq!(doc.map_scale, 10000.0);
        assert!(doc.print_area.is_zero());
        assert!(doc.colors().is_empty());
    }
}
