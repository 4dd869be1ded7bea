//! Import, Export and Data Directory Groups
//!
//! Imports: a 256-slot projection of the lowercased library set plus a
//! 1024-slot projection of `library:function` tokens. Exports: a 128-slot
//! projection of export names. Data directories: (size, virtual address) of
//! the 15 standard directories. 1280 + 128 + 30 values.

use std::collections::{BTreeMap, BTreeSet};

use goblin::pe::PE;
use serde::{Deserialize, Serialize};

use super::hashing::{extend_f32, FeatureHasher};
use super::pe;

/// Function names longer than this are clipped before hashing
const MAX_NAME_LEN: usize = 10_000;

/// Imported function names grouped by library
pub type RawImports = BTreeMap<String, Vec<String>>;

fn clip(name: &str) -> String {
    if name.len() > MAX_NAME_LEN {
        name.chars().take(MAX_NAME_LEN).collect()
    } else {
        name.to_string()
    }
}

pub fn imports_raw(parsed: &PE) -> RawImports {
    let mut imports: RawImports = BTreeMap::new();

    // Libraries with an import directory entry but no resolved functions
    // still count towards the library set
    for dll in &parsed.libraries {
        imports.entry(dll.to_string()).or_default();
    }

    for import in &parsed.imports {
        // goblin synthesizes "ORDINAL n" names for by-ordinal imports; the
        // schema tokenizes those as "ordinalN"
        let name = if import.name.starts_with("ORDINAL ") {
            format!("ordinal{}", import.ordinal)
        } else {
            clip(&import.name)
        };
        imports.entry(import.dll.to_string()).or_default().push(name);
    }

    imports
}

/// Vectorize imports: 256 + 1024 = 1280 values
pub fn imports_process(raw: &RawImports, out: &mut Vec<f32>) {
    // Unique lowercased library names
    let libraries: Vec<String> = raw
        .keys()
        .map(|dll| dll.to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    extend_f32(out, &FeatureHasher::new(256).hash_strings(&libraries));

    let entries: Vec<String> = raw
        .iter()
        .flat_map(|(dll, functions)| {
            let dll = dll.to_lowercase();
            functions
                .iter()
                .map(move |f| format!("{}:{}", dll, f))
                .collect::<Vec<_>>()
        })
        .collect();
    extend_f32(out, &FeatureHasher::new(1024).hash_strings(&entries));
}

// ============================================================================
// EXPORTS
// ============================================================================

pub fn exports_raw(parsed: &PE) -> Vec<String> {
    parsed
        .exports
        .iter()
        .filter_map(|e| e.name)
        .map(clip)
        .collect()
}

/// Vectorize exports: 128 values
pub fn exports_process(raw: &[String], out: &mut Vec<f32>) {
    extend_f32(out, &FeatureHasher::new(128).hash_strings(raw));
}

// ============================================================================
// DATA DIRECTORIES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDataDirectory {
    pub name: String,
    pub size: u32,
    pub virtual_address: u32,
}

pub fn data_directories_raw(parsed: &PE) -> Vec<RawDataDirectory> {
    pe::DATA_DIRECTORY_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let dir = pe::data_directory(parsed, index);
            RawDataDirectory {
                name: name.to_string(),
                size: dir.map(|d| d.size).unwrap_or(0),
                virtual_address: dir.map(|d| d.virtual_address).unwrap_or(0),
            }
        })
        .collect()
}

/// Vectorize data directories: 2 values per directory, 30 total
pub fn data_directories_process(raw: &[RawDataDirectory], out: &mut Vec<f32>) {
    for dir in raw.iter().take(pe::DATA_DIRECTORY_NAMES.len()) {
        out.push(dir.size as f32);
        out.push(dir.virtual_address as f32);
    }
    // Short records pad with zeroed slots to keep the group width fixed
    for _ in raw.len()..pe::DATA_DIRECTORY_NAMES.len() {
        out.push(0.0);
        out.push(0.0);
    }
}
