//! Byte-Level Feature Groups
//!
//! Two 256-wide groups computed from the raw byte stream alone, before any
//! container parsing: the byte-value histogram and the windowed joint
//! (entropy bucket x high nibble) histogram.

/// Sliding window width for the byte-entropy histogram
pub const ENTROPY_WINDOW: usize = 2048;

/// Stride between windows
pub const ENTROPY_STEP: usize = 1024;

// ============================================================================
// BYTE HISTOGRAM
// ============================================================================

/// Count occurrences of each byte value
pub fn byte_histogram_raw(data: &[u8]) -> Vec<u32> {
    let mut counts = vec![0u32; 256];
    for &b in data {
        counts[b as usize] += 1;
    }
    counts
}

/// Normalize counts by the total byte count
pub fn byte_histogram_process(counts: &[u32], out: &mut Vec<f32>) {
    let sum: u64 = counts.iter().map(|&c| c as u64).sum();
    let sum = sum as f32;
    out.extend(counts.iter().map(|&c| c as f32 / sum));
}

// ============================================================================
// BYTE-ENTROPY HISTOGRAM
// ============================================================================

/// Entropy bucket and high-nibble counts for one window
///
/// The probability denominator is always the full window width, also for a
/// final short block; the reference vectorizer does the same, and the models
/// were trained on that convention.
fn entropy_bin_counts(block: &[u8]) -> (usize, [u32; 16]) {
    let mut c = [0u32; 16];
    for &b in block {
        c[(b >> 4) as usize] += 1;
    }

    let mut h: f32 = 0.0;
    for &count in &c {
        if count > 0 {
            let p = count as f32 / ENTROPY_WINDOW as f32;
            h -= p * p.log2();
        }
    }
    h *= 2.0;

    // 16 entropy buckets over [0, 8) bits, top value folded into the last
    let mut hbin = (h * 2.0) as usize;
    if hbin >= 16 {
        hbin = 15;
    }
    (hbin, c)
}

/// Accumulate the 16x16 joint histogram over all windows
pub fn byte_entropy_raw(data: &[u8]) -> Vec<u32> {
    let mut output = vec![0u32; 256];

    if data.len() < ENTROPY_WINDOW {
        let (hbin, c) = entropy_bin_counts(data);
        for (i, &count) in c.iter().enumerate() {
            output[hbin * 16 + i] += count;
        }
    } else {
        let mut start = 0;
        while start + ENTROPY_WINDOW <= data.len() {
            let (hbin, c) = entropy_bin_counts(&data[start..start + ENTROPY_WINDOW]);
            for (i, &count) in c.iter().enumerate() {
                output[hbin * 16 + i] += count;
            }
            start += ENTROPY_STEP;
        }
    }

    output
}

/// Normalize the joint histogram by its total mass
pub fn byte_entropy_process(counts: &[u32], out: &mut Vec<f32>) {
    let sum: u64 = counts.iter().map(|&c| c as u64).sum();
    let sum = sum as f32;
    out.extend(counts.iter().map(|&c| c as f32 / sum));
}
