//! Table decoders.
//!
//! Each table is parsed from its raw bytes plus the values it needs
//! from the tables decoded before it.

pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod kern;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod post;
