//! Star placement for a layer.
//!
//! Positions are sampled from a seeded RNG so that the same paper list at the
//! same depth always produces the same stars.

use galaxy_types::Paper;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::layer::{Appearance, Rgb};

/// Position and visual radius of one star.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub radius: f32,
}

/// Layout parameters (from `navigation` config).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Disc radius of a layer in world units
    pub spread: f32,
    /// Total z jitter around the layer depth
    pub thickness: f32,
    pub min_star_radius: f32,
    pub max_star_radius: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            spread: 180.0,
            thickness: 40.0,
            min_star_radius: 1.5,
            max_star_radius: 7.0,
        }
    }
}

/// FNV-1a over the paper ids and the depth bits.
pub fn layout_seed(papers: &[Paper], depth: f32) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    let mut feed = |bytes: &[u8]| {
        for b in bytes {
            hash ^= u64::from(*b);
            hash = hash.wrapping_mul(PRIME);
        }
    };
    for paper in papers {
        feed(paper.id.as_bytes());
        feed(&[0xff]);
    }
    feed(&depth.to_bits().to_le_bytes());
    hash
}

/// Star radius from the server's size metric, or from citations when absent.
pub fn star_radius(paper: &Paper, params: &LayoutParams) -> f32 {
    let span = params.max_star_radius - params.min_star_radius;
    let weight = match paper.size {
        Some(size) if size.is_finite() => size.clamp(0.0, 1.0),
        _ => ((paper.citation_count as f32 + 1.0).log10() / 5.0).min(1.0),
    };
    params.min_star_radius + span * weight
}

/// Base appearance of a star: brighter glow for more-cited papers.
pub fn star_appearance(paper: &Paper) -> Appearance {
    let glow = ((paper.citation_count as f32 + 1.0).log10() / 5.0).min(1.0);
    Appearance {
        color: Rgb::STAR,
        emissive_color: Rgb::STAR,
        emissive_intensity: 0.4 + 0.8 * glow,
    }
}

/// Generate one position per paper, centred on `depth`.
pub fn generate_positions(papers: &[Paper], depth: f32, params: &LayoutParams) -> Vec<StarPosition> {
    let mut rng = StdRng::seed_from_u64(layout_seed(papers, depth));

    papers
        .iter()
        .map(|paper| {
            let r = params.spread * rng.gen::<f32>().sqrt();
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            let jitter = (rng.gen::<f32>() - 0.5) * params.thickness;
            StarPosition {
                x: r * angle.cos(),
                y: r * angle.sin() * 0.6,
                z: depth + jitter,
                radius: star_radius(paper, params),
            }
        })
        .collect()
}
