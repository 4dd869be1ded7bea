//! Section Table Group
//!
//! Five summary counters plus five 50-slot hashed projections of the section
//! table: (name, size), (name, entropy), (name, vsize), the entry-section
//! token and the entry-section characteristics. 255 values total.

use goblin::pe::PE;
use serde::{Deserialize, Serialize};

use crate::logic::attributes::shannon_entropy;

use super::hashing::{extend_f32, FeatureHasher};
use super::pe;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSection {
    pub name: String,
    pub size: u64,
    pub entropy: f64,
    pub vsize: u64,
    pub props: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSectionInfo {
    /// Entry-section name, normalized to a token sequence for hashing
    pub entry: Vec<String>,
    pub sections: Vec<RawSection>,
}

pub fn sections_raw(parsed: &PE, data: &[u8]) -> RawSectionInfo {
    let sections = parsed
        .sections
        .iter()
        .map(|section| RawSection {
            name: pe::section_name(section),
            size: section.size_of_raw_data as u64,
            entropy: shannon_entropy(pe::section_data(section, data)),
            vsize: section.virtual_size as u64,
            props: pe::section_characteristic_tokens(section.characteristics),
        })
        .collect();

    // The parser yields the entry-section name as a scalar; the schema hashes
    // the entry slot from a token list, so it is wrapped before hashing.
    RawSectionInfo {
        entry: vec![pe::entry_section_name(parsed)],
        sections,
    }
}

/// Vectorize in schema order: 5 + 5*50 = 255 values
pub fn sections_process(raw: &RawSectionInfo, out: &mut Vec<f32>) {
    let sections = &raw.sections;

    out.push(sections.len() as f32);
    out.push(sections.iter().filter(|s| s.size == 0).count() as f32);
    out.push(sections.iter().filter(|s| s.name.is_empty()).count() as f32);
    out.push(
        sections
            .iter()
            .filter(|s| {
                s.props.iter().any(|p| p == "MEM_READ") && s.props.iter().any(|p| p == "MEM_EXECUTE")
            })
            .count() as f32,
    );
    out.push(
        sections
            .iter()
            .filter(|s| s.props.iter().any(|p| p == "MEM_WRITE"))
            .count() as f32,
    );

    let hasher = FeatureHasher::new(50);

    let sizes: Vec<(&str, f64)> = sections
        .iter()
        .map(|s| (s.name.as_str(), s.size as f64))
        .collect();
    extend_f32(out, &hasher.hash_pairs(&sizes));

    let entropies: Vec<(&str, f64)> = sections
        .iter()
        .map(|s| (s.name.as_str(), s.entropy))
        .collect();
    extend_f32(out, &hasher.hash_pairs(&entropies));

    let vsizes: Vec<(&str, f64)> = sections
        .iter()
        .map(|s| (s.name.as_str(), s.vsize as f64))
        .collect();
    extend_f32(out, &hasher.hash_pairs(&vsizes));

    extend_f32(out, &hasher.hash_strings(&raw.entry));

    // Section names are scalars and the normalized entry is a token sequence,
    // so no section compares equal to it; the entry-characteristics slot
    // therefore hashes an empty token set. The models were trained on vectors
    // with exactly this shape.
    let entry_characteristics: Vec<String> = Vec::new();
    extend_f32(out, &hasher.hash_strings(&entry_characteristics));
}
