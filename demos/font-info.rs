fn main() {
    env_logger::init();

    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn process() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        println!("Usage:\n\tfont-info font.ttf");
        std::process::exit(0);
    }

    let font_path: std::path::PathBuf = args.free_from_str()?;
    let font_data = std::fs::read(&font_path)?;

    let now = std::time::Instant::now();

    let font = sfnt_decoder::Font::from_data(&font_data)?;

    println!("Flavor: {:?}", font.flavor());
    println!("Media type: {}", font.raw().0);
    println!("Checksum adjustment: {}", if font.verify_checksum_adjustment() { "valid" } else { "invalid" });
    println!("Family name: {:?}", font.family_name());
    println!("PostScript name: {:?}", font.post_script_name());
    println!("Units per EM: {:?}", font.units_per_em());
    println!("Ascender: {}", font.ascender());
    println!("Descender: {}", font.descender());
    println!("Line gap: {}", font.line_gap());
    println!("Global bbox: {:?}", font.global_bounding_box());
    println!("Number of glyphs: {}", font.number_of_glyphs());
    println!("Underline: {:?}", font.underline_metrics());
    println!("X height: {:?}", font.x_height());
    println!("Weight: {:?}", font.weight());
    println!("Width: {:?}", font.width());
    println!("Regular: {}", font.is_regular());
    println!("Italic: {}", font.is_italic());
    println!("Bold: {}", font.is_bold());
    println!("Oblique: {}", font.is_oblique());
    println!("Strikeout: {:?}", font.strikeout_metrics());
    println!("Monospaced: {}", font.is_monospaced());
    println!("Italic angle: {}", font.italic_angle());
    println!("Kerning subtables: {}", font.kern().map_or(0, |k| k.subtables().len()));

    println!("Tables:");
    for record in font.tables() {
        println!("  {} offset: {} length: {}", record.tag, record.offset, record.length);
    }

    println!("Encoding records:");
    for record in font.cmap().records() {
        let decoded = if record.subtable_index.is_some() { "" } else { " (skipped)" };
        println!(
            "  platform: {} encoding: {} format: {}{}",
            record.platform_id, record.encoding_id, record.format, decoded,
        );
    }

    println!("Names:");
    for name in font.name().names() {
        if let Some(value) = name.to_string() {
            println!("  {}: {}", name.name_id(), value);
        }
    }

    println!("Elapsed: {}us", now.elapsed().as_micros());

    Ok(())
}
