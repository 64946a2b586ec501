const CHARS: &[char] = &[
    '\u{0}',
    'A',
    'Ф',
    '0',
    '\u{D7FF}',
    '\u{FFFF}',
    '\u{10FFFF}',
];

fn main() {
    afl::fuzz!(|data: &[u8]| {
        if let Ok(font) = sfnt_decoder::Font::from_data(data) {
            for c in CHARS {
                let id = font.glyph_index(*c);
                let _ = font.glyph_name(id);
                let _ = font.glyph_advance(id);
                let _ = font.glyphs_kerning(id, id);
            }
        }
    });
}
