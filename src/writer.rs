//! Test-only conversion of typed values into big-endian bytes.

#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
pub enum TtfType<'a> {
    Raw(&'a [u8]),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    F2Dot14(f32),
}

pub fn convert(values: &[TtfType]) -> Vec<u8> {
    let mut data = Vec::with_capacity(256);
    for v in values {
        convert_type(*v, &mut data);
    }

    data
}

fn convert_type(v: TtfType, data: &mut Vec<u8>) {
    match v {
        TtfType::Raw(bytes) => data.extend_from_slice(bytes),
        TtfType::Int8(n) => data.extend_from_slice(&n.to_be_bytes()),
        TtfType::UInt8(n) => data.push(n),
        TtfType::Int16(n) => data.extend_from_slice(&n.to_be_bytes()),
        TtfType::UInt16(n) => data.extend_from_slice(&n.to_be_bytes()),
        TtfType::UInt32(n) => data.extend_from_slice(&n.to_be_bytes()),
        TtfType::UInt64(n) => data.extend_from_slice(&n.to_be_bytes()),
        TtfType::F2Dot14(n) => {
            let raw = (n * 16384.0).round() as i16;
            data.extend_from_slice(&raw.to_be_bytes());
        }
    }
}
