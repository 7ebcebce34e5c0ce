//! Validity mask derived from the nodata sentinel.

/// Raw values paired with a per-pixel invalidity flag.
///
/// `values` is the raster unchanged, sentinel included; only `mask` marks
/// which cells hold no data (1) and which are valid (0).
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid {
    pub values: Vec<f64>,
    pub mask: Vec<u8>,
}

impl MaskedGrid {
    /// Summary of the mask and the range of valid values.
    pub fn stats(&self) -> MaskStats {
        let mut stats = MaskStats {
            total: self.values.len(),
            invalid: 0,
            valid_min: None,
            valid_max: None,
        };

        for (&value, &flag) in self.values.iter().zip(&self.mask) {
            if flag != 0 {
                stats.invalid += 1;
                continue;
            }
            stats.valid_min = Some(stats.valid_min.map_or(value, |m: f64| m.min(value)));
            stats.valid_max = Some(stats.valid_max.map_or(value, |m: f64| m.max(value)));
        }

        stats
    }
}

/// Counts and valid-value range of a [`MaskedGrid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskStats {
    pub total: usize,
    pub invalid: usize,
    /// `None` when every cell is nodata
    pub valid_min: Option<f64>,
    pub valid_max: Option<f64>,
}

impl MaskStats {
    pub fn valid(&self) -> usize {
        self.total - self.invalid
    }
}

/// Flag every cell equal to `nodata`.
///
/// Comparison is exact. A NaN sentinel therefore never matches, so NaN
/// cells count as valid.
pub fn build_mask(values: &[f64], nodata: f64) -> MaskedGrid {
    let mask = values.iter().map(|&v| u8::from(v == nodata)).collect();
    MaskedGrid {
        values: values.to_vec(),
        mask,
    }
}
