fn main() {
    afl::fuzz!(|data: &[u8]| {
        if let Ok(font) = sfnt_decoder::Font::from_data(data) {
            let _ = font.family_name();
            let _ = font.post_script_name();
            for name in font.name().names() {
                let _ = name.to_string();
            }
        }
    });
}
