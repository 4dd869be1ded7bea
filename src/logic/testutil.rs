//! Test Utilities
//!
//! Builds a small but structurally valid PE32 image in memory so extraction
//! paths can be exercised without shipping binary fixtures.

/// Hand-assembled two-section PE32 executable
///
/// Layout: DOS stub, COFF header (I386, 2 sections), full optional header
/// (WINDOWS_CUI, 16 empty data directories), ".text" holding the entry point
/// plus a few printable strings, ".data" filler. 1536 bytes total.
pub fn minimal_pe() -> Vec<u8> {
    let mut image = vec![0u8; 0x600];

    let put_u16 = |image: &mut Vec<u8>, offset: usize, value: u16| {
        image[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    };
    let put_u32 = |image: &mut Vec<u8>, offset: usize, value: u32| {
        image[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    };
    let put_bytes = |image: &mut Vec<u8>, offset: usize, value: &[u8]| {
        image[offset..offset + value.len()].copy_from_slice(value);
    };

    // DOS header
    put_bytes(&mut image, 0x00, b"MZ");
    put_u32(&mut image, 0x3c, 0x80); // e_lfanew

    // PE signature
    put_bytes(&mut image, 0x80, b"PE\0\0");

    // COFF header
    put_u16(&mut image, 0x84, 0x014c); // machine: I386
    put_u16(&mut image, 0x86, 2); // number_of_sections
    put_u32(&mut image, 0x88, 1_600_000_000); // time_date_stamp
    put_u32(&mut image, 0x8c, 0); // pointer_to_symbol_table
    put_u32(&mut image, 0x90, 0); // number_of_symbols
    put_u16(&mut image, 0x94, 0xe0); // size_of_optional_header
    put_u16(&mut image, 0x96, 0x0102); // EXECUTABLE_IMAGE | NEED_32BIT_MACHINE

    // Optional header (PE32)
    put_u16(&mut image, 0x98, 0x010b); // magic
    image[0x9a] = 14; // major_linker_version
    image[0x9b] = 0; // minor_linker_version
    put_u32(&mut image, 0x9c, 0x200); // size_of_code
    put_u32(&mut image, 0xa0, 0x200); // size_of_initialized_data
    put_u32(&mut image, 0xa4, 0); // size_of_uninitialized_data
    put_u32(&mut image, 0xa8, 0x1000); // address_of_entry_point
    put_u32(&mut image, 0xac, 0x1000); // base_of_code
    put_u32(&mut image, 0xb0, 0x2000); // base_of_data
    put_u32(&mut image, 0xb4, 0x0040_0000); // image_base
    put_u32(&mut image, 0xb8, 0x1000); // section_alignment
    put_u32(&mut image, 0xbc, 0x200); // file_alignment
    put_u16(&mut image, 0xc0, 6); // major_operating_system_version
    put_u16(&mut image, 0xc2, 0); // minor_operating_system_version
    put_u16(&mut image, 0xc4, 1); // major_image_version
    put_u16(&mut image, 0xc6, 0); // minor_image_version
    put_u16(&mut image, 0xc8, 6); // major_subsystem_version
    put_u16(&mut image, 0xca, 0); // minor_subsystem_version
    put_u32(&mut image, 0xcc, 0); // win32_version_value
    put_u32(&mut image, 0xd0, 0x3000); // size_of_image
    put_u32(&mut image, 0xd4, 0x200); // size_of_headers
    put_u32(&mut image, 0xd8, 0); // checksum
    put_u16(&mut image, 0xdc, 3); // subsystem: WINDOWS_CUI
    put_u16(&mut image, 0xde, 0x8140); // DYNAMIC_BASE | NX_COMPAT | TERMINAL_SERVER_AWARE
    put_u32(&mut image, 0xe0, 0x0010_0000); // size_of_stack_reserve
    put_u32(&mut image, 0xe4, 0x1000); // size_of_stack_commit
    put_u32(&mut image, 0xe8, 0x0010_0000); // size_of_heap_reserve
    put_u32(&mut image, 0xec, 0x1000); // size_of_heap_commit
    put_u32(&mut image, 0xf0, 0); // loader_flags
    put_u32(&mut image, 0xf4, 16); // number_of_rva_and_sizes
    // 16 zeroed data directories occupy 0xf8..0x178

    // Section table
    put_bytes(&mut image, 0x178, b".text\0\0\0");
    put_u32(&mut image, 0x180, 0x100); // virtual_size
    put_u32(&mut image, 0x184, 0x1000); // virtual_address
    put_u32(&mut image, 0x188, 0x200); // size_of_raw_data
    put_u32(&mut image, 0x18c, 0x200); // pointer_to_raw_data
    put_u32(&mut image, 0x19c, 0x6000_0020); // CNT_CODE | MEM_EXECUTE | MEM_READ

    put_bytes(&mut image, 0x1a0, b".data\0\0\0");
    put_u32(&mut image, 0x1a8, 0x100); // virtual_size
    put_u32(&mut image, 0x1ac, 0x2000); // virtual_address
    put_u32(&mut image, 0x1b0, 0x200); // size_of_raw_data
    put_u32(&mut image, 0x1b4, 0x400); // pointer_to_raw_data
    put_u32(&mut image, 0x1c4, 0xc000_0040); // CNT_INITIALIZED_DATA | MEM_READ | MEM_WRITE

    // .text content: entry stub bytes plus printable strings
    for (i, byte) in image[0x200..0x300].iter_mut().enumerate() {
        *byte = (i % 251) as u8;
    }
    put_bytes(&mut image, 0x300, b"hello world this is a test string\0");
    put_bytes(&mut image, 0x330, b"https://example.com/payload\0");
    put_bytes(&mut image, 0x360, b"C:\\windows\\system32\\cmd.exe\0");
    put_bytes(&mut image, 0x390, b"HKEY_CURRENT_USER\\Software\\Run\0");

    // .data content
    for (i, byte) in image[0x400..0x600].iter_mut().enumerate() {
        *byte = ((i * 7) % 256) as u8;
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_pe_parses() {
        let data = minimal_pe();
        let parsed = goblin::pe::PE::parse(&data).expect("synthetic image must parse");
        assert_eq!(parsed.sections.len(), 2);
        assert_eq!(parsed.header.coff_header.machine, 0x014c);
        assert!(parsed.imports.is_empty());
        assert!(parsed.exports.is_empty());
    }
}
