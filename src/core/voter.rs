use crate::config::{BYTES_PER_PIXEL, CODE_MODULUS, CONFIDENCE_THRESHOLD, GRID_CELLS};
use crate::core::sampler::Grid;

/// One frame's agreed slot index and slot value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    pub position: u8,
    pub payload: u8,
}

/// Reduce a pixel to its 6-bit code: (R + G + B) mod 64.
pub fn pixel_code(px: [u8; 3]) -> u8 {
    let sum: u32 = px.iter().map(|&c| c as u32).sum();
    (sum % CODE_MODULUS) as u8
}

/// Sample both grids of a frame and return their consensus, or `None` if either sample is too noisy.
pub fn vote(frame: &[u8], grid: &Grid) -> Option<Vote> {
    if frame.len() < grid.required_len() {
        return None;
    }
    let mut positions = [0u8; GRID_CELLS];
    let mut payloads = [0u8; GRID_CELLS];

    for (i, cell) in grid.cells().iter().enumerate() {
        positions[i] = pixel_code(read_pixel(frame, cell.position)?);
        payloads[i] = pixel_code(read_pixel(frame, cell.payload)?);
    }

    Some(Vote {
        position: consensus(&positions)?,
        payload: consensus(&payloads)?,
    })
}

/// Mode of a sample, accepted only if its variance is below the confidence threshold.
pub fn consensus(sample: &[u8]) -> Option<u8> {
    if variance(sample)? < CONFIDENCE_THRESHOLD {
        mode(sample)
    } else {
        None
    }
}

/// Sample variance (n - 1 denominator). Needs at least two values.
pub fn variance(sample: &[u8]) -> Option<f64> {
    if sample.len() < 2 {
        return None;
    }
    let n = sample.len() as f64;
    let mean = sample.iter().map(|&v| v as f64).sum::<f64>() / n;
    let ss: f64 = sample.iter().map(|&v| (v as f64 - mean).powi(2)).sum();
    Some(ss / (n - 1.0))
}

/// Most frequent value; ties go to the smallest value.
pub fn mode(sample: &[u8]) -> Option<u8> {
    let mut counts = [0usize; CODE_MODULUS as usize];
    for &v in sample {
        counts[(v as usize) % counts.len()] += 1;
    }
    // max_by_key keeps the last maximum, so walk from the top down
    counts
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, &c)| c > 0)
        .max_by_key(|(_, &c)| c)
        .map(|(v, _)| v as u8)
}

fn read_pixel(frame: &[u8], offset: usize) -> Option<[u8; 3]> {
    let px = frame.get(offset..offset + BYTES_PER_PIXEL)?;
    Some([px[0], px[1], px[2]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sampler::compute_grid;
    use crate::decoder::frame_data::Resolution;

    #[test]
    fn test_pixel_code() {
        assert_eq!(pixel_code([0, 0, 0]), 0);
        assert_eq!(pixel_code([10, 20, 30]), 60);
        assert_eq!(pixel_code([255, 255, 255]), (765 % 64) as u8);
        assert_eq!(pixel_code([64, 0, 1]), 1);
    }

    #[test]
    fn test_pixel_code_channel_permutation() {
        let px = [200u8, 17, 99];
        let expected = pixel_code(px);
        for perm in [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
            assert_eq!(pixel_code([px[perm[0]], px[perm[1]], px[perm[2]]]), expected);
        }
        // different channels, same sum
        assert_eq!(pixel_code([100, 100, 100]), pixel_code([50, 150, 100]));
    }

    #[test]
    fn test_uniform_sample() {
        let sample = [42u8; 9];
        assert_eq!(variance(&sample), Some(0.0));
        assert_eq!(consensus(&sample), Some(42));
    }

    #[test]
    fn test_spread_sample_abstains() {
        let sample = [0u8, 8, 16, 24, 32, 40, 48, 56, 63];
        assert!(variance(&sample).unwrap() >= CONFIDENCE_THRESHOLD);
        assert_eq!(consensus(&sample), None);
    }

    #[test]
    fn test_small_noise_accepted() {
        let sample = [7u8, 7, 7, 7, 7, 7, 8, 6, 7];
        assert!(variance(&sample).unwrap() < CONFIDENCE_THRESHOLD);
        assert_eq!(consensus(&sample), Some(7));
    }

    #[test]
    fn test_threshold_is_strict() {
        // mean 2, squared deviations sum to 24, 24 / 8 == 3
        let sample = [0u8, 0, 0, 4, 4, 4, 2, 2, 2];
        assert_eq!(variance(&sample), Some(3.0));
        assert_eq!(consensus(&sample), None);
    }

    #[test]
    fn test_mode_tie_smallest_wins() {
        assert_eq!(mode(&[5, 5, 5, 4, 4, 4, 6, 6, 6]), Some(4));
        assert_eq!(mode(&[9, 9, 3, 3, 1]), Some(3));
        assert_eq!(mode(&[]), None);
    }

    #[test]
    fn test_vote_on_flat_frame() {
        let resolution = Resolution::new(6, 6).unwrap();
        let grid = compute_grid(resolution);
        let mut frame = vec![0u8; resolution.frame_len()];
        for cell in grid.cells() {
            frame[cell.position] = 3;
            frame[cell.payload..cell.payload + 3].copy_from_slice(&[10, 10, 1]);
        }
        assert_eq!(vote(&frame, &grid), Some(Vote { position: 3, payload: 21 }));
    }

    #[test]
    fn test_vote_noisy_payload_abstains() {
        let resolution = Resolution::new(6, 6).unwrap();
        let grid = compute_grid(resolution);
        let mut frame = vec![0u8; resolution.frame_len()];
        for (i, cell) in grid.cells().iter().enumerate() {
            frame[cell.payload] = (i as u8) * 7;
        }
        assert_eq!(vote(&frame, &grid), None);
    }

    #[test]
    fn test_vote_short_frame_abstains() {
        let grid = compute_grid(Resolution::new(6, 6).unwrap());
        assert_eq!(vote(&[0u8; 20], &grid), None);
    }
}
