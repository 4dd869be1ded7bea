//! Printable-String Feature Group
//!
//! Statistics over printable-ASCII runs of length >= 5: counts, average
//! length, character distribution, character entropy and a handful of
//! indicator substring counts (filesystem paths, URLs, registry keys,
//! embedded MZ headers).

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::{Deserialize, Serialize};

/// Printable-ASCII runs of at least five characters
static ALLSTRINGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x20-\x7f]{5,}").expect("static pattern"));

static PATHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)c:\\").expect("static pattern"));

static URLS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)https?://").expect("static pattern"));

static REGISTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"HKEY_").expect("static pattern"));

static MZ: Lazy<Regex> = Lazy::new(|| Regex::new(r"MZ").expect("static pattern"));

/// Width of the printable character distribution (0x20..=0x7f)
const PRINTABLE_BINS: usize = 96;

/// Raw string statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStringStats {
    pub numstrings: u64,
    pub avlength: f64,
    pub printabledist: Vec<u32>,
    pub printables: u64,
    pub entropy: f32,
    pub paths: u64,
    pub urls: u64,
    pub registry: u64,
    pub mz: u64,
}

/// Scan the byte stream for printable-string statistics
pub fn strings_raw(data: &[u8]) -> RawStringStats {
    let mut numstrings = 0u64;
    let mut total_len = 0u64;
    let mut printabledist = vec![0u32; PRINTABLE_BINS];

    for m in ALLSTRINGS.find_iter(data) {
        numstrings += 1;
        let s = m.as_bytes();
        total_len += s.len() as u64;
        for &b in s {
            printabledist[(b - 0x20) as usize] += 1;
        }
    }

    let avlength = if numstrings > 0 {
        total_len as f64 / numstrings as f64
    } else {
        0.0
    };

    let printables: u64 = printabledist.iter().map(|&c| c as u64).sum();

    let mut entropy: f32 = 0.0;
    if printables > 0 {
        for &c in &printabledist {
            if c > 0 {
                let p = c as f32 / printables as f32;
                entropy -= p * p.log2();
            }
        }
    }

    RawStringStats {
        numstrings,
        avlength,
        printabledist,
        printables,
        entropy,
        paths: PATHS.find_iter(data).count() as u64,
        urls: URLS.find_iter(data).count() as u64,
        registry: REGISTRY.find_iter(data).count() as u64,
        mz: MZ.find_iter(data).count() as u64,
    }
}

/// Vectorize the raw statistics: 1 + 1 + 96 + 1 + 1 + 4 = 104 values
pub fn strings_process(raw: &RawStringStats, out: &mut Vec<f32>) {
    out.push(raw.numstrings as f32);
    out.push(raw.avlength as f32);

    let divisor = if raw.printables > 0 {
        raw.printables as f32
    } else {
        1.0
    };
    out.extend(raw.printabledist.iter().map(|&c| c as f32 / divisor));

    out.push(raw.printables as f32);
    out.push(raw.entropy);
    out.push(raw.paths as f32);
    out.push(raw.urls as f32);
    out.push(raw.registry as f32);
    out.push(raw.mz as f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_runs_of_five_or_more() {
        let raw = strings_raw(b"\x00\x01hello world\x02hi\x03abcde\x04");
        assert_eq!(raw.numstrings, 2); // "hello world" and "abcde", not "hi"
        assert_eq!(raw.avlength, (11.0 + 5.0) / 2.0);
        assert_eq!(raw.printables, 16);
    }

    #[test]
    fn test_indicator_counts() {
        let raw = strings_raw(
            b"visit HTTPS://evil.example or http://x.example, drop to C:\\temp\\a.exe, \
              write HKEY_LOCAL_MACHINE\\Software, carry an MZ stub",
        );
        assert_eq!(raw.urls, 2);
        assert_eq!(raw.paths, 1);
        assert_eq!(raw.registry, 1);
        assert_eq!(raw.mz, 1);
    }

    #[test]
    fn test_empty_input_yields_zeroes() {
        let raw = strings_raw(b"");
        assert_eq!(raw.numstrings, 0);
        assert_eq!(raw.avlength, 0.0);
        assert_eq!(raw.printables, 0);
        assert_eq!(raw.entropy, 0.0);

        let mut out = Vec::new();
        strings_process(&raw, &mut out);
        assert_eq!(out.len(), 104);
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_single_character_distribution_has_zero_entropy() {
        let raw = strings_raw(b"aaaaaaaa");
        assert_eq!(raw.numstrings, 1);
        assert_eq!(raw.entropy, 0.0);
        // Bin for 'a' carries the full mass
        assert_eq!(raw.printabledist[(b'a' - 0x20) as usize], 8);
    }

    #[test]
    fn test_process_width() {
        let raw = strings_raw(b"some sample text with words");
        let mut out = Vec::new();
        strings_process(&raw, &mut out);
        assert_eq!(out.len(), 104);
    }
}
