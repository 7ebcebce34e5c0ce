//! Headerless row-major binary grids.
//!
//! A grid file is nothing but its elements in the host's native byte order:
//! no header, no padding, no length prefix. Shape and dtype live in the
//! metadata sidecar.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use bytemuck::Pod;
use flood_common::{ConvertError, ConvertResult};

/// Element type of a binary grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    Float64,
    Uint8,
}

impl Dtype {
    /// numpy-style name, as recorded in the metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Float64 => "float64",
            Self::Uint8 => "uint8",
        }
    }

    /// Bytes per element.
    pub fn size(&self) -> usize {
        match self {
            Self::Float64 => 8,
            Self::Uint8 => 1,
        }
    }
}

impl std::fmt::Display for Dtype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rust element types that map onto a [`Dtype`].
pub trait GridElement: Pod {
    const DTYPE: Dtype;
}

impl GridElement for f64 {
    const DTYPE: Dtype = Dtype::Float64;
}

impl GridElement for u8 {
    const DTYPE: Dtype = Dtype::Uint8;
}

/// Write `data` to `path` as raw native-endian elements.
///
/// Returns the number of bytes written.
pub fn write_grid<T: GridElement>(path: &Path, data: &[T]) -> ConvertResult<u64> {
    let bytes: &[u8] = bytemuck::cast_slice(data);

    let file = File::create(path).map_err(|e| ConvertError::io_failure(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| ConvertError::io_failure(path, e))?;

    tracing::debug!(
        path = %path.display(),
        dtype = %T::DTYPE,
        elements = data.len(),
        "Wrote binary grid"
    );

    Ok(bytes.len() as u64)
}

/// Read a float64 grid written by [`write_grid`].
pub fn read_f64_grid(path: &Path) -> ConvertResult<Vec<f64>> {
    read_grid(path)
}

/// Read a uint8 grid written by [`write_grid`].
pub fn read_u8_grid(path: &Path) -> ConvertResult<Vec<u8>> {
    read_grid(path)
}

fn read_grid<T: GridElement>(path: &Path) -> ConvertResult<Vec<T>> {
    let bytes = std::fs::read(path).map_err(|e| ConvertError::io_failure(path, e))?;

    let size = T::DTYPE.size();
    if bytes.len() % size != 0 {
        return Err(ConvertError::io_failure(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "{} bytes is not a whole number of {} elements",
                    bytes.len(),
                    T::DTYPE
                ),
            ),
        ));
    }

    Ok(bytes
        .chunks_exact(size)
        .map(bytemuck::pod_read_unaligned)
        .collect())
}
