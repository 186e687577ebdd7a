use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ocadrust::io::ocad::compression::{Compressor, Decompressor, Lzw};
use ocadrust::instances::{AreaInstance, LineInstance, PointInstance};
use ocadrust::{
    AreaSymDef, Cmyk, Color, ColorId, FormatVersion, Glyph, GlyphPart, LineStyle, LineSymDef,
    MapDocument, OcadReader, OcadWriter, PointSymDef, SymPath, SymPathWithHoles, SymbolId,
    SymbolInstance, Vector2,
};

/// A map with a few hundred symbols and a few thousand objects.
fn sample_map() -> MapDocument {
    let mut doc = MapDocument::new();
    doc.add_color(Color::new(ColorId(0), "Black", Cmyk::new(0.0, 0.0, 0.0, 1.0)));
    doc.add_color(Color::new(ColorId(1), "Green", Cmyk::new(0.76, 0.0, 0.91, 0.0)));

    for i in 0..200u32 {
        let line = SymbolId::new(500 + i, 0);
        doc.add_symbol(LineSymDef::solid(line, format!("Line {}", i), ColorId(0), 0.25, LineStyle::Beveled));

        let area = SymbolId::new(400 + i, 1);
        doc.add_symbol(AreaSymDef::filled(area, format!("Area {}", i), ColorId(1)));

        let point = SymbolId::new(100 + i, 2);
        let mut def = PointSymDef::new(point, format!("Point {}", i));
        let mut glyph = Glyph::new();
        glyph.add_part(GlyphPart::FilledCircle {
            color: ColorId(0),
            center: Vector2::ZERO,
            diameter: 0.5,
        });
        glyph.finalize();
        def.glyph = glyph;
        doc.add_symbol(def);
    }

    for i in 0..3000u32 {
        let x = (i % 100) as f64;
        let y = (i / 100) as f64;
        let major = i % 200;
        let points: Vec<Vector2> = (0..20)
            .map(|k| Vector2::new(x + k as f64 * 0.1, y + (k % 3) as f64 * 0.05))
            .collect();
        doc.add_instance(SymbolInstance::Line(LineInstance {
            symbol: SymbolId::new(500 + major, 0),
            path: SymPath::from_points(points),
        }));
        doc.add_instance(SymbolInstance::Area(AreaInstance {
            symbol: SymbolId::new(400 + major, 1),
            path: SymPathWithHoles::new(
                SymPath::closed(vec![
                    Vector2::new(x, y),
                    Vector2::new(x + 0.8, y),
                    Vector2::new(x + 0.8, y + 0.8),
                    Vector2::new(x, y + 0.8),
                ]),
                Vec::new(),
            ),
            angle: 0.0,
        }));
        doc.add_instance(SymbolInstance::Point(PointInstance {
            symbol: SymbolId::new(100 + major, 2),
            location: Vector2::new(x + 0.5, y + 0.5),
            rotation: 45.0,
            gaps: Vec::new(),
        }));
    }
    doc
}

fn bench_write(c: &mut Criterion) {
    let doc = sample_map();
    for version in [FormatVersion::V8, FormatVersion::V12] {
        c.bench_function(&format!("write_v{}", version.number()), |b| {
            b.iter(|| {
                let mut writer = OcadWriter::new(version);
                black_box(writer.write_to_vec(black_box(&doc)).unwrap())
            })
        });
    }
}

fn bench_read(c: &mut Criterion) {
    let doc = sample_map();
    for version in [FormatVersion::V8, FormatVersion::V12] {
        let bytes = OcadWriter::new(version).write_to_vec(&doc).unwrap();
        c.bench_function(&format!("read_v{}", version.number()), |b| {
            b.iter(|| black_box(OcadReader::from_bytes(black_box(bytes.clone())).read().unwrap()))
        });
    }
}

fn bench_lzw(c: &mut Criterion) {
    // One 22x22 icon with a few runs of color, as typical toolbox icons have.
    let icon: Vec<u8> = (0..484u32).map(|i| ((i / 11) % 6) as u8 * 20).collect();
    let mut packed = vec![0u8; 1024];
    let used = Lzw::new().compress(&icon, &mut packed).unwrap();

    c.bench_function("lzw_compress_icon", |b| {
        let mut out = vec![0u8; 1024];
        b.iter(|| black_box(Lzw::new().compress(black_box(&icon), &mut out).unwrap()))
    });
    c.bench_function("lzw_expand_icon", |b| {
        let mut out = vec![0u8; icon.len()];
        b.iter(|| black_box(Lzw::new().expand(black_box(&packed[..used]), &mut out).unwrap()))
    });
}

criterion_group!(benches, bench_write, bench_read, bench_lzw);
criterion_main!(benches);
