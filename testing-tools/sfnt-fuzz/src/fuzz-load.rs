fn main() {
    afl::fuzz!(|data: &[u8]| {
        if let Ok(font) = sfnt_decoder::Font::from_data(data) {
            let _ = font.verify_checksum_adjustment();
            let _ = font.tables().count();
        }
    });
}
