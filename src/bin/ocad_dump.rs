/// Print the structure and contents of an OCAD file, optionally re-encoding it.
///
/// Usage: ocad_dump <input.ocd> [<version> <output.ocd>]

use anyhow::{bail, Context, Result};
use ocadrust::io::ocad::block_chain::{read_chain, ChainRead};
use ocadrust::io::ocad::records::{FileHeader, IndexEntry, StringIndexEntry};
use ocadrust::io::ocad::stream::OcadStreamReader;
use ocadrust::{FormatVersion, MapDocument, OcadReader, OcadWriter, SymbolKind};
use std::collections::BTreeMap;
use std::env;

const USAGE: &str = "usage: ocad_dump <input.ocd> [<version> <output.ocd>]";

fn print_chain<T>(name: &str, chain: &ChainRead<T>, live: usize) {
    println!(
        "  {} chain: {} blocks {:?}, {} live entries",
        name,
        chain.blocks.len(),
        chain.blocks,
        live
    );
    if let Some(err) = &chain.damage {
        println!("    damaged: {}", err);
    }
}

/// Header fields and block chains, read without building a document.
fn dump_structure(bytes: &[u8]) -> Result<()> {
    let mut r = OcadStreamReader::new(bytes);
    let header = FileHeader::read(&mut r).context("reading file header")?;
    let version = header.format_version()?;

    println!("== structure ({} bytes)", bytes.len());
    println!(
        "  version {} subversion {} section mark {}",
        header.version, header.subversion, header.section_mark
    );
    println!(
        "  symbols @{}  index @{}  strings @{}",
        header.first_symbol_block, header.first_index_block, header.first_string_block
    );
    if version.is_legacy() {
        println!(
            "  setup @{} ({} bytes)  info @{} ({} bytes)",
            header.setup_pos, header.setup_size, header.info_pos, header.info_size
        );
    }

    if header.first_symbol_block != 0 {
        let chain = read_chain(&mut r, header.first_symbol_block, 4, |r| r.read_i32());
        let live = chain.entries.iter().filter(|pos| **pos > 0).count();
        print_chain("symbol", &chain, live);
    }

    if header.first_index_block != 0 {
        let chain = read_chain(&mut r, header.first_index_block, IndexEntry::size(version), |r| {
            IndexEntry::read(r, version)
        });
        let live = chain
            .entries
            .iter()
            .filter(|e| e.pos > 0 && e.is_live(version))
            .count();
        print_chain("object index", &chain, live);
    }

    if version.has_string_params() && header.first_string_block != 0 {
        let chain = read_chain(
            &mut r,
            header.first_string_block,
            StringIndexEntry::SIZE,
            StringIndexEntry::read,
        );
        let mut kinds: BTreeMap<i32, usize> = BTreeMap::new();
        for entry in chain.entries.iter().filter(|e| e.kind != 0) {
            *kinds.entry(entry.kind).or_insert(0) += 1;
        }
        print_chain("string", &chain, kinds.values().sum());
        for (kind, count) in &kinds {
            println!("    type {:>5}: {}", kind, count);
        }
    }
    Ok(())
}

fn dump_document(input: &str, doc: &MapDocument) {
    println!("== document");
    match doc.version {
        Some(v) => println!("  {}: OCAD {}", input, v),
        None => println!("  {}", input),
    }
    println!("  scale 1:{}", doc.map_scale);
    println!("  {} colors", doc.colors().len());
    for color in doc.colors() {
        println!("    {}", color);
    }

    let count = |kind| doc.symbols().filter(|s| s.kind() == kind).count();
    println!(
        "  {} symbols ({} point, {} line, {} area, {} text)",
        doc.symbol_count(),
        count(SymbolKind::Point),
        count(SymbolKind::Line),
        count(SymbolKind::Area),
        count(SymbolKind::Text),
    );
    for def in doc.symbols() {
        let hidden = if def.common().hidden { " (hidden)" } else { "" };
        println!("    {:>9} {:?} {}{}", def.id().to_string(), def.kind(), def.name(), hidden);
    }
    println!("  {} objects", doc.instance_count());
    println!("  {} templates", doc.templates.len());
    for t in &doc.templates {
        println!("    {}", t.path);
    }

    if !doc.notifications.is_empty() {
        println!("  read notifications:");
        for note in &doc.notifications {
            println!("    {}", note);
        }
    }
    for font in &doc.diagnostics.missing_fonts {
        println!("  missing font: {}", font);
    }
    for reason in &doc.diagnostics.non_renderable {
        println!("  not renderable: {}", reason);
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(input) = args.first() else {
        bail!(USAGE);
    };
    if args.len() != 1 && args.len() != 3 {
        bail!(USAGE);
    }

    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input))?;
    if let Err(err) = dump_structure(&bytes) {
        println!("  structure unreadable: {:#}", err);
    }

    let doc = OcadReader::from_bytes(bytes)
        .read()
        .with_context(|| format!("decoding {}", input))?;
    dump_document(input, &doc);

    if let [_, version, output] = args.as_slice() {
        let number: i16 = version
            .parse()
            .with_context(|| format!("invalid version '{}'", version))?;
        let version = FormatVersion::from_number(number)?;
        let mut writer = OcadWriter::new(version);
        writer
            .write_to_file(&doc, output)
            .with_context(|| format!("writing {}", output))?;
        println!("wrote {} as OCAD {}", output, version);
        for note in writer.notifications() {
            println!("  {}", note);
        }
    }
    Ok(())
}
