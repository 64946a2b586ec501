mod font;
mod glyf;
mod hmtx;
mod kern;
mod metrics;

use sfnt_decoder::{Error, ErrorKind, Flavor, Font, GlyphId, MediaType, Tag};
use pretty_assertions::assert_eq;

#[test]
fn empty_font() {
    let err = Font::from_data(&[]).unwrap_err();
    assert_eq!(err, Error::MalformedDirectory("font data is too short"));
    assert_eq!(err.kind(), ErrorKind::MalformedContainer);
}

#[test]
fn unknown_magic() {
    let data = &[
        0x74, 0x74, 0x63, 0x66, // magic: ttcf
        0x00, 0x00, // numTables: 0
        0x00, 0x00, // searchRange: 0
        0x00, 0x00, // entrySelector: 0
        0x00, 0x00, // rangeShift: 0
    ];

    assert_eq!(Font::from_data(data).unwrap_err(), Error::UnknownMagic(0x74746366));
}

#[test]
fn zero_tables() {
    let data = &[
        0x00, 0x01, 0x00, 0x00, // magic
        0x00, 0x00, // numTables: 0
        0x00, 0x00, // searchRange: 0
        0x00, 0x00, // entrySelector: 0
        0x00, 0x00, // rangeShift: 0
    ];

    let err = Font::from_data(data).unwrap_err();
    assert_eq!(err, Error::MissingTable(Tag::CMAP));
    assert_eq!(err.kind(), ErrorKind::MissingRequiredTable);
}

#[test]
fn tables_count_overflow() {
    let data = &[
        0x00, 0x01, 0x00, 0x00, // magic
        0xFF, 0xFF, // numTables: u16::MAX
        0x00, 0x00, // searchRange: 0
        0x00, 0x00, // entrySelector: 0
        0x00, 0x00, // rangeShift: 0
    ];

    let err = Font::from_data(data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedContainer);
}

#[test]
fn valid_font() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();

    assert_eq!(font.flavor(), Flavor::TrueType);
    assert_eq!(font.raw(), (MediaType::TrueType, data.as_slice()));
    assert!(font.verify_checksum_adjustment());

    let tags: Vec<Tag> = font.tables().map(|r| r.tag).collect();
    assert_eq!(tags, vec![
        Tag::CMAP, Tag::GLYF, Tag::HEAD, Tag::HHEA, Tag::HMTX,
        Tag::LOCA, Tag::MAXP, Tag::NAME, Tag::OS_2, Tag::POST,
    ]);

    assert_eq!(font.table_data(Tag::HEAD).map(|d| d.len()), Some(54));
    assert_eq!(font.table_data(Tag::KERN), None);
}

#[test]
fn every_table_out_of_bounds() {
    let data = font::triangle_font().build();
    let num_tables = usize::from(u16::from_be_bytes([data[4], data[5]]));
    assert_eq!(num_tables, 10);

    for i in 0..num_tables {
        let record = 12 + 16 * i;
        let tag = Tag::new(&[data[record], data[record + 1], data[record + 2], data[record + 3]]);
        let offset = u32::from_be_bytes([
            data[record + 8], data[record + 9], data[record + 10], data[record + 11],
        ]);

        // One byte longer than the rest of the font.
        let length = data.len() as u32 - offset + 1;
        let mut data = data.clone();
        data[record + 12..record + 16].copy_from_slice(&length.to_be_bytes());

        let err = Font::from_data(&data).unwrap_err();
        assert_eq!(err, Error::TableOutOfBounds(tag));
        assert_eq!(err.kind(), ErrorKind::MalformedContainer);
        assert_eq!(err.table(), Some(tag));
    }
}

#[test]
fn corrupted_table() {
    let mut data = font::triangle_font().build();
    let glyf = Font::from_data(&data).unwrap()
        .tables()
        .find(|r| r.tag == Tag::GLYF)
        .unwrap();

    // The last y delta of the triangle.
    let pos = glyf.offset as usize + glyf.length as usize - 2;
    data[pos] ^= 0xFF;

    let err = Font::from_data(&data).unwrap_err();
    match err {
        Error::ChecksumMismatch { table, stored, computed } => {
            assert_eq!(table, Tag::GLYF);
            assert_eq!(stored, glyf.checksum);
            assert_ne!(stored, computed);
        }
        _ => panic!("unexpected error: {:?}", err),
    }

    assert_eq!(err.kind(), ErrorKind::MalformedContainer);
}

#[test]
fn checksum_adjustment_is_not_checked_on_load() {
    let mut data = font::triangle_font().build();
    let head = Font::from_data(&data).unwrap()
        .tables()
        .find(|r| r.tag == Tag::HEAD)
        .unwrap();

    let pos = head.offset as usize + 8;
    data[pos] ^= 0x01;

    let font = Font::from_data(&data).unwrap();
    assert!(!font.verify_checksum_adjustment());
}

#[test]
fn missing_required_table() {
    let data = font::triangle_font().without(Tag::POST).build();
    let err = Font::from_data(&data).unwrap_err();
    assert_eq!(err, Error::MissingTable(Tag::POST));
    assert_eq!(err.table(), Some(Tag::POST));
}

#[test]
fn missing_outline_table() {
    let data = font::triangle_font().without(Tag::LOCA).build();
    assert_eq!(Font::from_data(&data).unwrap_err(), Error::MissingTable(Tag::LOCA));
}

#[test]
fn cff_flavor() {
    let data = font::cff_font().build();
    let font = Font::from_data(&data).unwrap();
    assert_eq!(font.flavor(), Flavor::Cff);
    assert_eq!(font.raw().0, MediaType::OpenType);
    assert!(font.glyf().is_none());
    assert_eq!(font.glyph_index('A'), GlyphId(1));

    let err = font.glyph_outline(GlyphId(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedVariant);
    assert_eq!(err.table(), Some(Tag::CFF));
}

#[test]
fn cff_without_outlines() {
    let data = font::cff_font().without(Tag::CFF).build();
    assert_eq!(Font::from_data(&data).unwrap_err(), Error::MissingTable(Tag::CFF));
}

#[test]
fn cff_and_cff2() {
    let data = font::cff_font().table(Tag::CFF2, vec![2, 0, 5, 0]).build();
    let err = Font::from_data(&data).unwrap_err();
    assert_eq!(err, Error::ConflictingTables(Tag::CFF, Tag::CFF2));
    assert_eq!(err.kind(), ErrorKind::MissingRequiredTable);
}

#[test]
fn true_type_maxp_in_cff_font() {
    let data = font::cff_font().table(Tag::MAXP, font::maxp_true_type(2)).build();
    let err = Font::from_data(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTable);
    assert_eq!(err.table(), Some(Tag::MAXP));
}

#[test]
fn shared_between_threads() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4).map(|_| {
            s.spawn(|| {
                let id = font.glyph_index('A');
                let outline = font.glyph_outline(id).unwrap().unwrap();
                (id, outline.points.len(), font.glyph_advance(id))
            })
        }).collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), (GlyphId(1), 3, 600));
        }
    });
}
