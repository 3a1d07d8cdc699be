//! Data model: magnets, base canvases, and placements
//!
//! Magnets and base canvases come from JSON files kept by the web app.
//! Placements and the [`Arrangement`] that orders them are the in-memory
//! working state of a composition.
//!
//! The share format addresses magnets by their position in the library,
//! so library order must stay stable for existing share links to resolve
//! to the same magnets.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::geometry::ScaleRange;
use crate::pixels::{decode, SparseCanvas, CANVAS_SIZE};

/// Error type for magnet library and canvas file operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibraryError {
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON (de)serialization error
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A magnet with this identifier already exists
    #[error("magnet '{0}' already exists")]
    DuplicateIdentifier(String),
    /// No magnet with this identifier
    #[error("magnet '{0}' not found")]
    NotFound(String),
    /// No `{label}-partN` records exist
    #[error("no parts found for token '{0}'")]
    PartsNotFound(String),
    /// Parts exist but the numbering has a gap
    #[error("token '{label}' is missing part {part}")]
    MissingPart { label: String, part: u32 },
    /// More than one record claims the same part number
    #[error("token '{label}' has more than one part {part}")]
    DuplicatePart { label: String, part: u32 },
}

/// A sprite record from the magnet library.
///
/// Fields other than the three the engine uses are carried through
/// untouched so rewriting the library does not lose data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Magnet {
    /// Opaque identifier (the transaction hash of the paint event)
    pub transaction_hash: String,
    /// Display label (token id)
    #[serde(default)]
    pub token_id: String,
    /// Pixel stream
    pub pixels: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Magnet {
    pub fn new(
        transaction_hash: impl Into<String>,
        token_id: impl Into<String>,
        pixels: impl Into<String>,
    ) -> Self {
        Self {
            transaction_hash: transaction_hash.into(),
            token_id: token_id.into(),
            pixels: pixels.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn decode(&self) -> SparseCanvas {
        decode(&self.pixels)
    }
}

/// A base canvas snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseCanvas {
    pub pixels: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BaseCanvas {
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn decode(&self) -> SparseCanvas {
        decode(&self.pixels)
    }
}

/// A magnet placed on the canvas.
///
/// `x` and `y` are the center of the placed magnet in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Position of the magnet in the library
    pub magnet_index: usize,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

/// Ordered placements; later entries paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrangement {
    placements: Vec<Placement>,
    scale_range: ScaleRange,
}

fn clamp_position(value: f64) -> f64 {
    value.max(0.0).min(CANVAS_SIZE as f64)
}

impl Arrangement {
    pub fn new(scale_range: ScaleRange) -> Self {
        Self { placements: Vec::new(), scale_range }
    }

    pub fn from_placements(placements: Vec<Placement>, scale_range: ScaleRange) -> Self {
        let mut arrangement = Self::new(scale_range);
        for p in placements {
            arrangement.add(p.magnet_index, p.x, p.y, p.scale);
        }
        arrangement
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Place a magnet on top of everything else. Returns its position.
    pub fn add(&mut self, magnet_index: usize, x: f64, y: f64, scale: f64) -> usize {
        self.placements.push(Placement {
            magnet_index,
            x: clamp_position(x),
            y: clamp_position(y),
            scale: self.scale_range.clamp(scale),
        });
        self.placements.len() - 1
    }

    /// Move a placement. Returns false if there is no placement at `position`.
    pub fn reposition(&mut self, position: usize, x: f64, y: f64) -> bool {
        match self.placements.get_mut(position) {
            Some(p) => {
                p.x = clamp_position(x);
                p.y = clamp_position(y);
                true
            }
            None => false,
        }
    }

    /// Change a placement's scale. Returns false if there is no placement at `position`.
    pub fn resize(&mut self, position: usize, scale: f64) -> bool {
        let range = self.scale_range;
        match self.placements.get_mut(position) {
            Some(p) => {
                p.scale = range.clamp(scale);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, position: usize) -> Option<Placement> {
        if position < self.placements.len() {
            Some(self.placements.remove(position))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.placements.clear();
    }
}

/// The ordered magnet list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MagnetLibrary {
    magnets: Vec<Magnet>,
}

impl MagnetLibrary {
    pub fn new(magnets: Vec<Magnet>) -> Self {
        Self { magnets }
    }

    /// Load a library from a JSON array file.
    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let contents = fs::read_to_string(path)?;
        let library = Self::from_json(&contents)?;
        log::debug!("loaded {} magnets from {}", library.len(), path.display());
        Ok(library)
    }

    pub fn from_json(json: &str) -> Result<Self, LibraryError> {
        Ok(Self { magnets: serde_json::from_str(json)? })
    }

    /// Write the library as a pretty-printed JSON array.
    pub fn save(&self, path: &Path) -> Result<(), LibraryError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, LibraryError> {
        Ok(serde_json::to_string_pretty(&self.magnets)?)
    }

    pub fn magnets(&self) -> &[Magnet] {
        &self.magnets
    }

    pub fn len(&self) -> usize {
        self.magnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Magnet> {
        self.magnets.get(index)
    }

    /// Find a magnet and its index by identifier.
    pub fn find(&self, identifier: &str) -> Option<(usize, &Magnet)> {
        self.magnets.iter().enumerate().find(|(_, m)| m.transaction_hash == identifier)
    }

    /// Append a magnet, rejecting a repeated identifier.
    pub fn add(&mut self, magnet: Magnet) -> Result<usize, LibraryError> {
        if self.find(&magnet.transaction_hash).is_some() {
            return Err(LibraryError::DuplicateIdentifier(magnet.transaction_hash));
        }
        self.magnets.push(magnet);
        Ok(self.magnets.len() - 1)
    }

    /// Replace the pixel stream of an existing magnet.
    pub fn update_pixels(
        &mut self,
        identifier: &str,
        pixels: impl Into<String>,
    ) -> Result<&Magnet, LibraryError> {
        let magnet = self
            .magnets
            .iter_mut()
            .find(|m| m.transaction_hash == identifier)
            .ok_or_else(|| LibraryError::NotFound(identifier.to_string()))?;
        magnet.pixels = pixels.into();
        Ok(magnet)
    }

    /// Drop records whose identifier already appeared earlier. Returns the number removed.
    ///
    /// Shifts the index of every later magnet, which invalidates share links
    /// made against the old order.
    pub fn dedupe(&mut self) -> usize {
        let before = self.magnets.len();
        let mut seen = std::collections::HashSet::new();
        self.magnets.retain(|m| seen.insert(m.transaction_hash.clone()));
        let removed = before - self.magnets.len();
        if removed > 0 {
            log::info!("removed {} duplicate magnets, {} remain", removed, self.magnets.len());
        }
        removed
    }

    /// Merge `{label}-part1`, `{label}-part2`, ... into a single magnet.
    ///
    /// Streams are concatenated in part order, the first part's other fields
    /// are kept, and `-part1` is removed from its identifier. The parts are
    /// removed and the merged magnet is appended at the end.
    pub fn reassemble(&mut self, label: &str) -> Result<&Magnet, LibraryError> {
        let prefix = format!("{}-part", label);
        let mut parts: Vec<(u32, usize)> = self
            .magnets
            .iter()
            .enumerate()
            .filter_map(|(i, m)| {
                m.token_id.strip_prefix(&prefix)?.parse::<u32>().ok().map(|n| (n, i))
            })
            .collect();

        if parts.is_empty() {
            return Err(LibraryError::PartsNotFound(label.to_string()));
        }
        parts.sort_unstable();
        if let Some(pair) = parts.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(LibraryError::DuplicatePart { label: label.to_string(), part: pair[0].0 });
        }
        for (expected, (part, _)) in (1u32..).zip(&parts) {
            if *part != expected {
                return Err(LibraryError::MissingPart { label: label.to_string(), part: expected });
            }
        }

        let mut merged = self.magnets[parts[0].1].clone();
        merged.pixels = parts.iter().map(|(_, i)| self.magnets[*i].pixels.as_str()).collect();
        merged.token_id = label.to_string();
        merged.transaction_hash = merged.transaction_hash.replacen("-part1", "", 1);

        let mut part_indices: Vec<usize> = parts.iter().map(|(_, i)| *i).collect();
        part_indices.sort_unstable_by(|a, b| b.cmp(a));
        for i in part_indices {
            self.magnets.remove(i);
        }

        log::info!("reassembled token {} from {} parts", label, parts.len());
        self.magnets.push(merged);
        Ok(&self.magnets[self.magnets.len() - 1])
    }
}
