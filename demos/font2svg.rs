use std::fmt::Write;
use std::path::PathBuf;

const FONT_SIZE: f64 = 128.0;
const COLUMNS: u32 = 100;

const HELP: &str = "\
Usage:
    font2svg [OPTIONS] font.ttf out.svg

Options:
    -h, --help          Prints help
    --columns NUMBER    Sets the number of glyphs per row [default: 100]
";

struct Args {
    columns: u32,
    font_path: PathBuf,
    svg_path: PathBuf,
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            print!("{}", HELP);
            std::process::exit(1);
        }
    };

    if let Err(e) = process(args) {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let columns: u32 = args.opt_value_from_str("--columns")?.unwrap_or(COLUMNS);
    if columns == 0 {
        return Err("--columns must be positive".into());
    }

    Ok(Args {
        columns,
        font_path: args.free_from_str()?,
        svg_path: args.free_from_str()?,
    })
}

fn process(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let font_data = std::fs::read(&args.font_path)?;

    let now = std::time::Instant::now();

    let font = sfnt_decoder::Font::from_data(&font_data)?;
    let units_per_em = font.units_per_em();
    let scale = FONT_SIZE / units_per_em as f64;

    let cell_size = font.height() as f64 * FONT_SIZE / units_per_em as f64;
    let rows = (font.number_of_glyphs() as f64 / args.columns as f64).ceil() as u32;

    let mut svg = xmlwriter::XmlWriter::with_capacity(
        font.number_of_glyphs() as usize * 512,
        xmlwriter::Options::default(),
    );
    svg.start_element("svg");
    svg.write_attribute("xmlns", "http://www.w3.org/2000/svg");
    svg.write_attribute_fmt(
        "viewBox",
        format_args!("{} {} {} {}", 0, 0, cell_size * args.columns as f64, cell_size * rows as f64),
    );

    draw_grid(font.number_of_glyphs(), args.columns, cell_size, &mut svg);

    let mut row = 0;
    let mut column = 0;
    let mut failed = 0;
    for id in 0..font.number_of_glyphs() {
        let ok = glyph_to_path(
            column as f64 * cell_size,
            row as f64 * cell_size,
            &font,
            sfnt_decoder::GlyphId(id),
            cell_size,
            scale,
            &mut svg,
        );

        if !ok {
            failed += 1;
        }

        column += 1;
        if column == args.columns {
            column = 0;
            row += 1;
        }
    }

    println!("Elapsed: {}ms", now.elapsed().as_millis());
    if failed != 0 {
        println!("Failed to outline {} glyphs", failed);
    }

    std::fs::write(&args.svg_path, svg.end_document())?;

    Ok(())
}

fn draw_grid(
    n_glyphs: u16,
    columns: u32,
    cell_size: f64,
    svg: &mut xmlwriter::XmlWriter,
) {
    let rows = (n_glyphs as f64 / columns as f64).ceil() as u32;

    let width = columns as f64 * cell_size;
    let height = rows as f64 * cell_size;

    let mut path = String::new();

    let mut x = 0.0;
    for _ in 0..=columns {
        write!(&mut path, "M {} {} L {} {} ", x, 0.0, x, height).unwrap();
        x += cell_size;
    }

    let mut y = 0.0;
    for _ in 0..=rows {
        write!(&mut path, "M {} {} L {} {} ", 0.0, y, width, y).unwrap();
        y += cell_size;
    }

    path.pop();

    svg.start_element("path");
    svg.write_attribute("fill", "none");
    svg.write_attribute("stroke", "black");
    svg.write_attribute("stroke-width", "5");
    svg.write_attribute("d", &path);
    svg.end_element();
}

// Returns `false` when the glyph outline could not be resolved.
fn glyph_to_path(
    x: f64,
    y: f64,
    font: &sfnt_decoder::Font,
    glyph_id: sfnt_decoder::GlyphId,
    cell_size: f64,
    scale: f64,
    svg: &mut xmlwriter::XmlWriter,
) -> bool {
    let mut builder = Builder(String::new());
    let bbox = match font.outline_glyph(glyph_id, &mut builder) {
        Ok(Some(v)) => v,
        Ok(None) => return true,
        Err(e) => {
            eprintln!("Warning: glyph {}: {}.", glyph_id, e);
            return false;
        }
    };

    let mut path = builder.0;
    if path.is_empty() {
        return true;
    }

    path.pop(); // remove trailing space

    let bbox_w = (bbox.x_max as f64 - bbox.x_min as f64) * scale;
    let dx = (cell_size - bbox_w) / 2.0;
    let y = y + cell_size + font.descender() as f64 * scale;

    svg.start_element("path");
    svg.write_attribute("d", &path);
    svg.write_attribute_fmt(
        "transform",
        format_args!("matrix({} {} {} {} {} {})", scale, 0.0, 0.0, -scale, x + dx, y),
    );
    svg.end_element();

    true
}

struct Builder(String);

impl sfnt_decoder::OutlineBuilder for Builder {
    fn move_to(&mut self, x: f32, y: f32) {
        write!(&mut self.0, "M {} {} ", x, y).unwrap();
    }

    fn line_to(&mut self, x: f32, y: f32) {
        write!(&mut self.0, "L {} {} ", x, y).unwrap();
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        write!(&mut self.0, "Q {} {} {} {} ", x1, y1, x, y).unwrap();
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        write!(&mut self.0, "C {} {} {} {} {} {} ", x1, y1, x2, y2, x, y).unwrap();
    }

    fn close(&mut self) {
        write!(&mut self.0, "Z ").unwrap();
    }
}
