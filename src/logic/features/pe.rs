//! PE Container Introspection
//!
//! Thin helpers over the goblin parser plus the schema's token vocabulary.
//!
//! The string spellings below (machine names, characteristic flags, subsystem
//! and magic names) are part of the version-2 feature schema: hashed slots are
//! computed from these exact tokens, so the spellings must stay stable even
//! where other naming would be nicer.

use goblin::pe::data_directories::DataDirectory;
use goblin::pe::section_table::SectionTable;
use goblin::pe::PE;

/// Parse a PE container from raw bytes
pub fn parse(data: &[u8]) -> Result<PE<'_>, goblin::error::Error> {
    PE::parse(data)
}

// ============================================================================
// SECTIONS
// ============================================================================

/// Resolved section name (string-table name when present, else the inline one)
pub fn section_name(section: &SectionTable) -> String {
    if let Some(real) = &section.real_name {
        real.clone()
    } else {
        section.name().unwrap_or("").to_string()
    }
}

/// Raw on-disk content of a section, clamped to the file bounds
pub fn section_data<'a>(section: &SectionTable, data: &'a [u8]) -> &'a [u8] {
    let start = section.pointer_to_raw_data as usize;
    if start >= data.len() {
        return &[];
    }
    let end = start.saturating_add(section.size_of_raw_data as usize).min(data.len());
    &data[start..end]
}

/// Name of the section whose virtual range contains the entry point RVA
///
/// Empty string when the entry point lands outside every section.
pub fn entry_section_name(pe: &PE) -> String {
    let rva = match pe.header.optional_header.as_ref() {
        Some(oh) => oh.standard_fields.address_of_entry_point as u32,
        None => return String::new(),
    };
    for section in &pe.sections {
        let start = section.virtual_address;
        let span = section.virtual_size;
        if rva >= start && (rva - start) < span {
            return section_name(section);
        }
    }
    String::new()
}

// ============================================================================
// DATA DIRECTORIES
// ============================================================================

/// The 15 standard data directories, in table order
pub const DATA_DIRECTORY_NAMES: [&str; 15] = [
    "EXPORT_TABLE",
    "IMPORT_TABLE",
    "RESOURCE_TABLE",
    "EXCEPTION_TABLE",
    "CERTIFICATE_TABLE",
    "BASE_RELOCATION_TABLE",
    "DEBUG",
    "ARCHITECTURE",
    "GLOBAL_PTR",
    "TLS_TABLE",
    "LOAD_CONFIG_TABLE",
    "BOUND_IMPORT",
    "IAT",
    "DELAY_IMPORT_DESCRIPTOR",
    "CLR_RUNTIME_HEADER",
];

pub const DIR_RESOURCE: usize = 2;
pub const DIR_CERTIFICATE: usize = 4;
pub const DIR_BASE_RELOCATION: usize = 5;
pub const DIR_DEBUG: usize = 6;
pub const DIR_TLS: usize = 9;

/// Data directory by table index, if the header carries one
pub fn data_directory(pe: &PE, index: usize) -> Option<DataDirectory> {
    let dirs = &pe.header.optional_header.as_ref()?.data_directories;
    let dir = match index {
        0 => dirs.get_export_table(),
        1 => dirs.get_import_table(),
        2 => dirs.get_resource_table(),
        3 => dirs.get_exception_table(),
        4 => dirs.get_certificate_table(),
        5 => dirs.get_base_relocation_table(),
        6 => dirs.get_debug_table(),
        7 => dirs.get_architecture(),
        8 => dirs.get_global_ptr(),
        9 => dirs.get_tls_table(),
        10 => dirs.get_load_config_table(),
        11 => dirs.get_bound_import_table(),
        12 => dirs.get_import_address_table(),
        13 => dirs.get_delay_import_descriptor(),
        14 => dirs.get_clr_runtime_header(),
        _ => None,
    };
    dir.copied()
}

/// Whether a data directory is present with a non-zero size
pub fn has_directory(pe: &PE, index: usize) -> bool {
    data_directory(pe, index).map(|d| d.size > 0).unwrap_or(false)
}

// ============================================================================
// SCHEMA TOKEN VOCABULARY
// ============================================================================

/// Machine type token
pub fn machine_token(machine: u16) -> &'static str {
    match machine {
        0x0000 => "UNKNOWN",
        0x014c => "I386",
        0x0166 => "R4000",
        0x0169 => "WCEMIPSV2",
        0x01a2 => "SH3",
        0x01a3 => "SH3DSP",
        0x01a6 => "SH4",
        0x01a8 => "SH5",
        0x01c0 => "ARM",
        0x01c2 => "THUMB",
        0x01c4 => "ARMNT",
        0x01d3 => "AM33",
        0x01f0 => "POWERPC",
        0x01f1 => "POWERPCFP",
        0x0200 => "IA64",
        0x0266 => "MIPS16",
        0x0366 => "MIPSFPU",
        0x0466 => "MIPSFPU16",
        0x0ebc => "EBC",
        0x5032 => "RISCV32",
        0x5064 => "RISCV64",
        0x5128 => "RISCV128",
        0x8664 => "AMD64",
        0x9041 => "M32R",
        0xaa64 => "ARM64",
        _ => "INVALID",
    }
}

const COFF_CHARACTERISTICS: &[(u16, &str)] = &[
    (0x0001, "RELOCS_STRIPPED"),
    (0x0002, "EXECUTABLE_IMAGE"),
    (0x0004, "LINE_NUMS_STRIPPED"),
    (0x0008, "LOCAL_SYMS_STRIPPED"),
    (0x0010, "AGGRESSIVE_WS_TRIM"),
    (0x0020, "LARGE_ADDRESS_AWARE"),
    (0x0080, "BYTES_REVERSED_LO"),
    (0x0100, "NEED_32BIT_MACHINE"),
    (0x0200, "DEBUG_STRIPPED"),
    (0x0400, "REMOVABLE_RUN_FROM_SWAP"),
    (0x0800, "NET_RUN_FROM_SWAP"),
    (0x1000, "SYSTEM"),
    (0x2000, "DLL"),
    (0x4000, "UP_SYSTEM_ONLY"),
    (0x8000, "BYTES_REVERSED_HI"),
];

/// COFF header characteristic tokens, in flag order
pub fn coff_characteristic_tokens(characteristics: u16) -> Vec<String> {
    COFF_CHARACTERISTICS
        .iter()
        .filter(|(flag, _)| characteristics & flag != 0)
        .map(|(_, token)| token.to_string())
        .collect()
}

const DLL_CHARACTERISTICS: &[(u16, &str)] = &[
    (0x0020, "HIGH_ENTROPY_VA"),
    (0x0040, "DYNAMIC_BASE"),
    (0x0080, "FORCE_INTEGRITY"),
    (0x0100, "NX_COMPAT"),
    (0x0200, "NO_ISOLATION"),
    (0x0400, "NO_SEH"),
    (0x0800, "NO_BIND"),
    (0x1000, "APPCONTAINER"),
    (0x2000, "WDM_DRIVER"),
    (0x4000, "GUARD_CF"),
    (0x8000, "TERMINAL_SERVER_AWARE"),
];

/// Optional header DLL characteristic tokens, in flag order
pub fn dll_characteristic_tokens(characteristics: u16) -> Vec<String> {
    DLL_CHARACTERISTICS
        .iter()
        .filter(|(flag, _)| characteristics & flag != 0)
        .map(|(_, token)| token.to_string())
        .collect()
}

/// Subsystem token
pub fn subsystem_token(subsystem: u16) -> &'static str {
    match subsystem {
        1 => "NATIVE",
        2 => "WINDOWS_GUI",
        3 => "WINDOWS_CUI",
        5 => "OS2_CUI",
        7 => "POSIX_CUI",
        8 => "NATIVE_WINDOWS",
        9 => "WINDOWS_CE_GUI",
        10 => "EFI_APPLICATION",
        11 => "EFI_BOOT_SERVICE_DRIVER",
        12 => "EFI_RUNTIME_DRIVER",
        13 => "EFI_ROM",
        14 => "XBOX",
        16 => "WINDOWS_BOOT_APPLICATION",
        _ => "UNKNOWN",
    }
}

/// Optional header magic token
pub fn magic_token(magic: u16) -> &'static str {
    match magic {
        0x10b => "PE32",
        0x20b => "PE32_PLUS",
        _ => "UNKNOWN",
    }
}

const SECTION_CHARACTERISTICS: &[(u32, &str)] = &[
    (0x0000_0008, "TYPE_NO_PAD"),
    (0x0000_0020, "CNT_CODE"),
    (0x0000_0040, "CNT_INITIALIZED_DATA"),
    (0x0000_0080, "CNT_UNINITIALIZED_DATA"),
    (0x0000_0100, "LNK_OTHER"),
    (0x0000_0200, "LNK_INFO"),
    (0x0000_0800, "LNK_REMOVE"),
    (0x0000_1000, "LNK_COMDAT"),
    (0x0000_8000, "GPREL"),
    (0x0002_0000, "MEM_PURGEABLE"),
    (0x0004_0000, "MEM_LOCKED"),
    (0x0008_0000, "MEM_PRELOAD"),
    (0x0100_0000, "LNK_NRELOC_OVFL"),
    (0x0200_0000, "MEM_DISCARDABLE"),
    (0x0400_0000, "MEM_NOT_CACHED"),
    (0x0800_0000, "MEM_NOT_PAGED"),
    (0x1000_0000, "MEM_SHARED"),
    (0x2000_0000, "MEM_EXECUTE"),
    (0x4000_0000, "MEM_READ"),
    (0x8000_0000, "MEM_WRITE"),
];

/// Section characteristic tokens, including the decoded alignment field
pub fn section_characteristic_tokens(characteristics: u32) -> Vec<String> {
    let mut tokens: Vec<String> = SECTION_CHARACTERISTICS
        .iter()
        .filter(|(flag, _)| characteristics & flag != 0)
        .map(|(_, token)| token.to_string())
        .collect();

    // Alignment is a 4-bit field, not a flag set: value v means 2^(v-1) bytes
    let align = (characteristics >> 20) & 0xf;
    if (1..=14).contains(&align) {
        tokens.push(format!("ALIGN_{}BYTES", 1u32 << (align - 1)));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_tokens() {
        assert_eq!(machine_token(0x14c), "I386");
        assert_eq!(machine_token(0x8664), "AMD64");
        assert_eq!(machine_token(0xffff), "INVALID");
    }

    #[test]
    fn test_coff_characteristic_tokens() {
        let tokens = coff_characteristic_tokens(0x0102);
        assert_eq!(tokens, vec!["EXECUTABLE_IMAGE", "NEED_32BIT_MACHINE"]);
    }

    #[test]
    fn test_section_tokens_decode_alignment() {
        // CNT_CODE | MEM_EXECUTE | MEM_READ with ALIGN_16BYTES (value 5)
        let tokens = section_characteristic_tokens(0x6050_0020);
        assert!(tokens.contains(&"CNT_CODE".to_string()));
        assert!(tokens.contains(&"MEM_EXECUTE".to_string()));
        assert!(tokens.contains(&"MEM_READ".to_string()));
        assert!(tokens.contains(&"ALIGN_16BYTES".to_string()));
    }

    #[test]
    fn test_section_data_clamps_to_file() {
        let mut section = SectionTable::default();
        section.pointer_to_raw_data = 4;
        section.size_of_raw_data = 100;
        let data = [0u8; 10];
        assert_eq!(section_data(&section, &data).len(), 6);

        section.pointer_to_raw_data = 64;
        assert!(section_data(&section, &data).is_empty());
    }
}
