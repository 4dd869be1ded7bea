//! Header Info Group
//!
//! COFF and optional header fields: the timestamp, five 10-slot hashed token
//! sets (machine, COFF characteristics, subsystem, DLL characteristics,
//! magic) and nine numeric fields. 62 values total.

use goblin::pe::PE;
use serde::{Deserialize, Serialize};

use super::hashing::{extend_f32, FeatureHasher};
use super::pe;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCoffHeader {
    pub timestamp: u32,
    pub machine: String,
    pub characteristics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawOptionalHeader {
    pub subsystem: String,
    pub dll_characteristics: Vec<String>,
    pub magic: String,
    pub major_image_version: u32,
    pub minor_image_version: u32,
    pub major_linker_version: u32,
    pub minor_linker_version: u32,
    pub major_operating_system_version: u32,
    pub minor_operating_system_version: u32,
    pub major_subsystem_version: u32,
    pub minor_subsystem_version: u32,
    pub sizeof_code: u64,
    pub sizeof_headers: u64,
    pub sizeof_heap_commit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHeaderInfo {
    pub coff: RawCoffHeader,
    pub optional: RawOptionalHeader,
}

pub fn header_raw(parsed: &PE) -> RawHeaderInfo {
    let coff = &parsed.header.coff_header;

    let optional = match parsed.header.optional_header.as_ref() {
        Some(oh) => RawOptionalHeader {
            subsystem: pe::subsystem_token(oh.windows_fields.subsystem).to_string(),
            dll_characteristics: pe::dll_characteristic_tokens(oh.windows_fields.dll_characteristics),
            magic: pe::magic_token(oh.standard_fields.magic).to_string(),
            major_image_version: oh.windows_fields.major_image_version as u32,
            minor_image_version: oh.windows_fields.minor_image_version as u32,
            major_linker_version: oh.standard_fields.major_linker_version as u32,
            minor_linker_version: oh.standard_fields.minor_linker_version as u32,
            major_operating_system_version: oh.windows_fields.major_operating_system_version as u32,
            minor_operating_system_version: oh.windows_fields.minor_operating_system_version as u32,
            major_subsystem_version: oh.windows_fields.major_subsystem_version as u32,
            minor_subsystem_version: oh.windows_fields.minor_subsystem_version as u32,
            sizeof_code: oh.standard_fields.size_of_code,
            sizeof_headers: oh.windows_fields.size_of_headers as u64,
            sizeof_heap_commit: oh.windows_fields.size_of_heap_commit,
        },
        None => RawOptionalHeader {
            subsystem: String::new(),
            dll_characteristics: Vec::new(),
            magic: String::new(),
            major_image_version: 0,
            minor_image_version: 0,
            major_linker_version: 0,
            minor_linker_version: 0,
            major_operating_system_version: 0,
            minor_operating_system_version: 0,
            major_subsystem_version: 0,
            minor_subsystem_version: 0,
            sizeof_code: 0,
            sizeof_headers: 0,
            sizeof_heap_commit: 0,
        },
    };

    RawHeaderInfo {
        coff: RawCoffHeader {
            timestamp: coff.time_date_stamp,
            machine: pe::machine_token(coff.machine).to_string(),
            characteristics: pe::coff_characteristic_tokens(coff.characteristics),
        },
        optional,
    }
}

/// Vectorize in schema order: 1 + 5*10 + 11 = 62 values
pub fn header_process(raw: &RawHeaderInfo, out: &mut Vec<f32>) {
    let hasher = FeatureHasher::new(10);

    out.push(raw.coff.timestamp as f32);
    extend_f32(out, &hasher.hash_strings(&[raw.coff.machine.as_str()]));
    extend_f32(out, &hasher.hash_strings(&raw.coff.characteristics));
    extend_f32(out, &hasher.hash_strings(&[raw.optional.subsystem.as_str()]));
    extend_f32(out, &hasher.hash_strings(&raw.optional.dll_characteristics));
    extend_f32(out, &hasher.hash_strings(&[raw.optional.magic.as_str()]));
    out.push(raw.optional.major_image_version as f32);
    out.push(raw.optional.minor_image_version as f32);
    out.push(raw.optional.major_linker_version as f32);
    out.push(raw.optional.minor_linker_version as f32);
    out.push(raw.optional.major_operating_system_version as f32);
    out.push(raw.optional.minor_operating_system_version as f32);
    out.push(raw.optional.major_subsystem_version as f32);
    out.push(raw.optional.minor_subsystem_version as f32);
    out.push(raw.optional.sizeof_code as f32);
    out.push(raw.optional.sizeof_headers as f32);
    out.push(raw.optional.sizeof_heap_commit as f32);
}
