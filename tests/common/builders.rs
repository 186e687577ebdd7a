//! Test document builders.
//!
//! `create_sample_map()` produces a small orienteering map with one
//! definition of each kind and one instance of every instance variant.

#![allow(dead_code)]

use ocadrust::glyph::{Glyph, GlyphPart};
use ocadrust::instances::{
    AreaInstance, GraphicsArea, GraphicsLine, ImageArea, ImageLine, LineInstance,
    LineTextInstance, PointInstance, TextInstance,
};
use ocadrust::path::{PointKind, SymPath, SymPathWithHoles};
use ocadrust::symbols::{
    AreaSymDef, DashInfo, Hatch, LineStyle, LineSymDef, PointSymDef, TextKind, TextSymDef,
};
use ocadrust::template::Template;
use ocadrust::types::{BoundingBox2D, Cmyk, Color, ColorId, SymbolId, Vector2};
use ocadrust::{MapDocument, SymbolInstance};

pub const BLACK: ColorId = ColorId(0);
pub const BROWN: ColorId = ColorId(1);
pub const YELLOW: ColorId = ColorId(2);
pub const BLUE: ColorId = ColorId(3);

pub const KNOLL: SymbolId = SymbolId::new(101, 0);
pub const BOULDER: SymbolId = SymbolId::new(104, 0);
pub const CONTOUR: SymbolId = SymbolId::new(201, 0);
pub const PATH: SymbolId = SymbolId::new(202, 0);
pub const LAKE: SymbolId = SymbolId::new(301, 0);
pub const MARSH: SymbolId = SymbolId::new(302, 0);
pub const LABEL: SymbolId = SymbolId::new(401, 0);
pub const STREET: SymbolId = SymbolId::new(402, 0);

pub fn v(x: f64, y: f64) -> Vector2 {
    Vector2::new(x, y)
}

pub fn palette() -> Vec<Color> {
    vec![
        Color::new(BLACK, "Black", Cmyk::new(0.0, 0.0, 0.0, 1.0)),
        Color::new(BROWN, "Brown", Cmyk::new(0.0, 0.56, 1.0, 0.18)),
        Color::new(YELLOW, "Yellow", Cmyk::new(0.0, 0.27, 0.79, 0.0)),
        Color::new(BLUE, "Blue", Cmyk::new(1.0, 0.0, 0.0, 0.0)),
    ]
}

pub fn square(x: f64, y: f64, size: f64) -> SymPath {
    SymPath::closed(vec![v(x, y), v(x + size, y), v(x + size, y + size), v(x, y + size)])
}

/// A glyph made of one filled circle.
pub fn dot(color: ColorId, diameter: f64) -> Glyph {
    let mut glyph = Glyph::new();
    glyph.add_part(GlyphPart::FilledCircle {
        color,
        center: Vector2::ZERO,
        diameter,
    });
    glyph.finalize();
    glyph
}

/// Definitions of every kind, referring only to [`palette`] colors.
pub fn add_sample_symbols(doc: &mut MapDocument) {
    let mut knoll = PointSymDef::new(KNOLL, "Knoll");
    knoll.glyph = dot(BROWN, 0.9);
    doc.add_symbol(knoll);

    let mut boulder = PointSymDef::new(BOULDER, "Boulder");
    let mut glyph = Glyph::new();
    glyph.add_part(GlyphPart::Circle {
        color: BLACK,
        center: Vector2::ZERO,
        width: 0.12,
        diameter: 0.8,
    });
    glyph.finalize();
    boulder.glyph = glyph;
    boulder.rotatable = true;
    doc.add_symbol(boulder);

    doc.add_symbol(LineSymDef::solid(CONTOUR, "Contour", BROWN, 0.14, LineStyle::Beveled));

    let mut path = LineSymDef::solid(PATH, "Path", BLACK, 0.25, LineStyle::Rounded);
    path.dashes = Some(DashInfo {
        dash_length: 2.0,
        first_dash_length: 2.0,
        last_dash_length: 2.0,
        gap_length: 0.25,
        min_gaps: 1,
        ..DashInfo::default()
    });
    doc.add_symbol(path);

    doc.add_symbol(AreaSymDef::filled(LAKE, "Lake", BLUE));

    let mut marsh = AreaSymDef::new(MARSH, "Marsh");
    marsh.hatches.push(Hatch {
        color: BLUE,
        width: 0.1,
        spacing: 0.5,
        angle: 0.0,
    });
    marsh.rotatable = true;
    doc.add_symbol(marsh);

    let mut label = TextSymDef::new(LABEL, "Label");
    label.font_size = 4.0;
    label.line_spacing = 5.0;
    label.color = BLACK;
    doc.add_symbol(label);

    let mut street = TextSymDef::new(STREET, "Street name");
    street.kind = TextKind::LineText;
    street.color = BLACK;
    doc.add_symbol(street);
}

/// One instance per symbol-backed variant.
pub fn add_sample_objects(doc: &mut MapDocument) {
    doc.add_instance(SymbolInstance::Point(PointInstance {
        symbol: KNOLL,
        location: v(10.0, 10.0),
        rotation: 0.0,
        gaps: Vec::new(),
    }));
    doc.add_instance(SymbolInstance::Point(PointInstance {
        symbol: BOULDER,
        location: v(20.0, 10.0),
        rotation: 30.0,
        gaps: Vec::new(),
    }));
    doc.add_instance(SymbolInstance::Line(LineInstance {
        symbol: CONTOUR,
        path: SymPath::from_points(vec![v(0.0, 0.0), v(5.0, 1.0), v(10.0, 0.5), v(15.0, 2.0)]),
    }));
    doc.add_instance(SymbolInstance::Line(LineInstance {
        symbol: PATH,
        path: SymPath::new(
            vec![v(0.0, 20.0), v(2.0, 22.0), v(4.0, 22.0), v(6.0, 20.0), v(8.0, 24.0), v(12.0, 24.0)],
            vec![
                PointKind::Normal,
                PointKind::BezierControl,
                PointKind::BezierControl,
                PointKind::Normal,
                PointKind::Corner,
                PointKind::Normal,
            ],
        ),
    }));
    doc.add_instance(SymbolInstance::Area(AreaInstance {
        symbol: LAKE,
        path: SymPathWithHoles::new(square(50.0, 50.0, 20.0), vec![square(55.0, 55.0, 5.0)]),
        angle: 0.0,
    }));
    doc.add_instance(SymbolInstance::Area(AreaInstance {
        symbol: MARSH,
        path: SymPathWithHoles::new(
            SymPath::closed(vec![v(80.0, 0.0), v(90.0, 0.0), v(85.0, 8.0)]),
            Vec::new(),
        ),
        angle: 45.0,
    }));
    doc.add_instance(SymbolInstance::Text(TextInstance {
        symbol: LABEL,
        lines: vec!["Hill".to_string()],
        location: v(30.0, 30.0),
        rotation: 0.0,
        width: 0.0,
    }));
    doc.add_instance(SymbolInstance::Text(TextInstance {
        symbol: LABEL,
        lines: vec!["Two".to_string(), "lines".to_string()],
        location: v(40.0, 40.0),
        rotation: 0.0,
        width: 20.0,
    }));
    doc.add_instance(SymbolInstance::LineText(LineTextInstance {
        symbol: STREET,
        path: SymPath::from_points(vec![v(0.0, 60.0), v(30.0, 62.0)]),
        text: "Main Street".to_string(),
    }));
}

/// Graphics, image and layout objects (stored by v9+ only).
pub fn add_inline_objects(doc: &mut MapDocument) {
    doc.add_instance(SymbolInstance::GraphicsLine(GraphicsLine {
        color: BLACK,
        width: 0.3,
        style: LineStyle::Rounded,
        path: SymPath::from_points(vec![v(100.0, 0.0), v(110.0, 5.0)]),
    }));
    doc.add_instance(SymbolInstance::GraphicsArea(GraphicsArea {
        color: YELLOW,
        path: SymPathWithHoles::new(square(100.0, 20.0, 10.0), Vec::new()),
    }));
    doc.add_instance(SymbolInstance::ImageLine(ImageLine {
        cmyk: Cmyk::new(1.0, 0.0, 0.0, 0.0),
        width: 0.2,
        style: LineStyle::Beveled,
        path: SymPath::from_points(vec![v(120.0, 0.0), v(125.0, 5.0), v(130.0, 0.0)]),
        layout: false,
    }));
    doc.add_instance(SymbolInstance::ImageArea(ImageArea {
        cmyk: Cmyk::new(0.0, 0.0, 0.0, 1.0),
        path: SymPathWithHoles::new(square(120.0, 20.0, 4.0), Vec::new()),
        layout: true,
    }));
}

/// The sample map: palette, every definition kind, every instance variant
/// and non-default map settings.
pub fn create_sample_map() -> MapDocument {
    create_sample_map_with(true)
}

/// The sample map, with or without the graphics and image objects.
pub fn create_sample_map_with(inline_objects: bool) -> MapDocument {
    let mut doc = MapDocument::new();
    for color in palette() {
        doc.add_color(color);
    }
    add_sample_symbols(&mut doc);
    add_sample_objects(&mut doc);
    if inline_objects {
        add_inline_objects(&mut doc);
    }

    doc.map_scale = 15000.0;
    doc.print_scale = 15000.0;
    doc.print_area = BoundingBox2D::new(v(-10.0, -10.0), v(150.0, 100.0));
    doc.real_world.enabled = true;
    doc.real_world.offset = v(600000.0, 5000000.0);
    doc.real_world.angle = 1.5;
    doc.file_info = "Made for tests\r\n".to_string();
    doc.templates.push(Template::new("base.jpg", v(12.0, -8.0), 300.0));
    doc
}

/// A document with `count` solid line definitions and nothing else.
pub fn many_line_symbols(count: u32) -> MapDocument {
    let mut doc = MapDocument::new();
    doc.add_color(Color::new(BLACK, "Black", Cmyk::BLACK));
    for i in 0..count {
        let id = SymbolId::new(100 + i / 10, (i % 10) as u16);
        doc.add_symbol(LineSymDef::solid(id, format!("Line {}", i), BLACK, 0.1, LineStyle::Beveled));
    }
    doc
}
