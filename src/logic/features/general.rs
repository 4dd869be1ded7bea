//! General File Info Group
//!
//! Ten shallow counters read straight off the parsed container.

use goblin::pe::PE;
use serde::{Deserialize, Serialize};

use super::pe;

/// Raw general-info record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGeneralInfo {
    pub size: u64,
    pub vsize: u64,
    pub has_debug: bool,
    pub exports: u64,
    pub imports: u64,
    pub has_relocations: bool,
    pub has_resources: bool,
    pub has_signature: bool,
    pub has_tls: bool,
    pub symbols: u64,
}

pub fn general_raw(parsed: &PE, data: &[u8]) -> RawGeneralInfo {
    let vsize = parsed
        .header
        .optional_header
        .as_ref()
        .map(|oh| oh.windows_fields.size_of_image as u64)
        .unwrap_or(0);

    RawGeneralInfo {
        size: data.len() as u64,
        vsize,
        has_debug: pe::has_directory(parsed, pe::DIR_DEBUG),
        exports: parsed.exports.len() as u64,
        imports: parsed.imports.len() as u64,
        has_relocations: pe::has_directory(parsed, pe::DIR_BASE_RELOCATION),
        has_resources: pe::has_directory(parsed, pe::DIR_RESOURCE),
        has_signature: pe::has_directory(parsed, pe::DIR_CERTIFICATE),
        has_tls: pe::has_directory(parsed, pe::DIR_TLS),
        symbols: parsed.header.coff_header.number_of_symbol_table as u64,
    }
}

/// Vectorize in schema order: 10 values
pub fn general_process(raw: &RawGeneralInfo, out: &mut Vec<f32>) {
    out.push(raw.size as f32);
    out.push(raw.vsize as f32);
    out.push(raw.has_debug as u8 as f32);
    out.push(raw.exports as f32);
    out.push(raw.imports as f32);
    out.push(raw.has_relocations as u8 as f32);
    out.push(raw.has_resources as u8 as f32);
    out.push(raw.has_signature as u8 as f32);
    out.push(raw.has_tls as u8 as f32);
    out.push(raw.symbols as f32);
}
