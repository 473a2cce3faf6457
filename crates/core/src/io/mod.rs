//! Reading and writing surfaces in the Irap classic formats
//!
//! Both formats share one header layout and one cell order (column index
//! fastest, then row). Undefined cells are written as [`UNDEF_VALUE`]; on
//! read, any value at or above it (or non-finite) becomes undefined.

mod atomic;
mod irap_ascii;
mod irap_binary;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::surface::RegularSurface;

pub use irap_ascii::{decode_irap_ascii, encode_irap_ascii};
pub use irap_binary::{decode_irap_binary, encode_irap_binary};

/// On-disk marker for an undefined cell
pub const UNDEF_VALUE: f64 = 9_999_900.0;

/// Header identifier shared by both Irap classic formats
pub(crate) const IRAP_MAGIC: i32 = -996;

/// Encoded values at or above this are undefined
pub(crate) fn is_undef(value: f64) -> bool {
    !value.is_finite() || value >= UNDEF_VALUE
}

/// Fail on the first defined value a reader would not get back as defined.
///
/// `stored` maps a value to what the format actually keeps on disk; values
/// that land on or above [`UNDEF_VALUE`] there, or overflow, are rejected.
pub(crate) fn check_encodable<F>(format: &'static str, surface: &RegularSurface, stored: F) -> Result<()>
where
    F: Fn(f64) -> f64,
{
    match surface
        .values()
        .iter_nodes()
        .find(|&(_, _, v)| v.is_some_and(|v| is_undef(stored(v))))
    {
        Some((i, j, Some(v))) => Err(Error::InvalidParameter {
            name: "value",
            value: v.to_string(),
            reason: format!("node ({i}, {j}) cannot be stored as a defined {format} value"),
        }),
        _ => Ok(()),
    }
}

/// Supported surface file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceFormat {
    /// Irap classic binary (big-endian, Fortran records)
    IrapBinary,
    /// Irap classic ASCII
    IrapAscii,
}

impl SurfaceFormat {
    /// Canonical name, as accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            SurfaceFormat::IrapBinary => "irap_binary",
            SurfaceFormat::IrapAscii => "irap_ascii",
        }
    }

    /// Guess the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "gri" | "irapbin" => Some(SurfaceFormat::IrapBinary),
            "fgr" | "irapasc" | "txt" => Some(SurfaceFormat::IrapAscii),
            _ => None,
        }
    }

    /// Guess the format from content: binary files open with a 32-byte record marker
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(&[0, 0, 0, 32]) {
            SurfaceFormat::IrapBinary
        } else {
            SurfaceFormat::IrapAscii
        }
    }

    pub fn encode(self, surface: &RegularSurface) -> Result<Vec<u8>> {
        match self {
            SurfaceFormat::IrapBinary => encode_irap_binary(surface),
            SurfaceFormat::IrapAscii => encode_irap_ascii(surface).map(String::into_bytes),
        }
    }

    pub fn decode(self, data: &[u8]) -> Result<RegularSurface> {
        match self {
            SurfaceFormat::IrapBinary => decode_irap_binary(data),
            SurfaceFormat::IrapAscii => decode_irap_ascii(data),
        }
    }
}

impl fmt::Display for SurfaceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurfaceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "irap_binary" | "irapbin" | "gri" => Ok(SurfaceFormat::IrapBinary),
            "irap_ascii" | "irapasc" | "fgr" => Ok(SurfaceFormat::IrapAscii),
            _ => Err(Error::InvalidParameter {
                name: "format",
                value: s.to_string(),
                reason: "expected irap_binary or irap_ascii".into(),
            }),
        }
    }
}

/// Read a surface file
///
/// The whole file is read and decoded before a surface is returned; a
/// corrupt file never yields a partially populated surface.
pub fn read_surface<P: AsRef<Path>>(path: P, format: Option<SurfaceFormat>) -> Result<RegularSurface> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| Error::file(path, e))?;
    let format = format
        .or_else(|| SurfaceFormat::from_path(path))
        .unwrap_or_else(|| SurfaceFormat::sniff(&data));

    debug!("reading {} as {} ({} bytes)", path.display(), format, data.len());
    let surface = format.decode(&data)?;
    debug!("loaded {} x {} surface", surface.ncol(), surface.nrow());
    Ok(surface)
}

/// Decode a surface from an in-memory buffer, sniffing the format when unset
pub fn read_surface_from_buffer(data: &[u8], format: Option<SurfaceFormat>) -> Result<RegularSurface> {
    format.unwrap_or_else(|| SurfaceFormat::sniff(data)).decode(data)
}

/// Write a surface file
///
/// The file is replaced atomically: content goes to a sibling temporary
/// file first and is renamed into place only once fully written.
pub fn write_surface<P: AsRef<Path>>(surface: &RegularSurface, path: P, format: SurfaceFormat) -> Result<()> {
    let path = path.as_ref();
    let data = format.encode(surface)?;
    debug!("writing {} as {} ({} bytes)", path.display(), format, data.len());
    atomic::atomic_write(path, &data).map_err(|e| Error::file(path, e))
}

/// Encode a surface into an in-memory buffer
pub fn write_surface_to_buffer(surface: &RegularSurface, format: SurfaceFormat) -> Result<Vec<u8>> {
    format.encode(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{SurfaceGeometry, YFlip};

    fn sample_surface() -> RegularSurface {
        let geometry = SurfaceGeometry::new(7, 4, 1000.0, 5000.0, 40.0, 20.0)
            .unwrap()
            .with_rotation(30.0)
            .unwrap();
        RegularSurface::from_fn(geometry, |i, j| {
            if i == 3 && j == 1 {
                None
            } else {
                Some(1500.0 + i as f64 * 0.25 - j as f64 * 0.5)
            }
        })
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SurfaceFormat::from_path("a/b/top.gri"), Some(SurfaceFormat::IrapBinary));
        assert_eq!(SurfaceFormat::from_path("top.FGR"), Some(SurfaceFormat::IrapAscii));
        assert_eq!(SurfaceFormat::from_path("top.dat"), None);
        assert_eq!(SurfaceFormat::from_path("top"), None);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("irap_binary".parse::<SurfaceFormat>().unwrap(), SurfaceFormat::IrapBinary);
        assert_eq!("irap_ascii".parse::<SurfaceFormat>().unwrap(), SurfaceFormat::IrapAscii);
        assert!("zmap".parse::<SurfaceFormat>().is_err());
        assert_eq!(SurfaceFormat::IrapAscii.to_string(), "irap_ascii");
    }

    #[test]
    fn test_sniff() {
        let s = sample_surface();
        let bin = s.to_bytes(SurfaceFormat::IrapBinary).unwrap();
        let asc = s.to_bytes(SurfaceFormat::IrapAscii).unwrap();
        assert_eq!(SurfaceFormat::sniff(&bin), SurfaceFormat::IrapBinary);
        assert_eq!(SurfaceFormat::sniff(&asc), SurfaceFormat::IrapAscii);
    }

    #[test]
    fn test_file_roundtrip_both_formats() {
        let s = sample_surface();
        let dir = tempfile::tempdir().unwrap();

        let bin_path = dir.path().join("surf.gri");
        let asc_path = dir.path().join("surf.fgr");
        s.to_file(&bin_path, SurfaceFormat::IrapBinary).unwrap();
        s.to_file(&asc_path, SurfaceFormat::IrapAscii).unwrap();

        let from_bin = RegularSurface::from_file(&bin_path, None).unwrap();
        let from_asc = RegularSurface::from_file(&asc_path, None).unwrap();
        assert_eq!(from_bin, s);
        assert_eq!(from_bin.geometry(), from_asc.geometry());
        for (a, b) in from_bin.flatten_values().iter().zip(from_asc.flatten_values()) {
            match (a, b) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-4),
                (None, None) => {}
                _ => panic!("defined/undefined mismatch between formats"),
            }
        }
    }

    #[test]
    fn test_unknown_extension_sniffs_content() {
        let s = sample_surface();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("surf.dat");
        s.to_file(&path, SurfaceFormat::IrapBinary).unwrap();
        assert_eq!(read_surface(&path, None).unwrap(), s);
    }

    #[test]
    fn test_corrupt_file_aborts_load() {
        let s = sample_surface();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.gri");
        let bytes = s.to_bytes(SurfaceFormat::IrapBinary).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 10]).unwrap();

        let err = RegularSurface::from_file(&path, None).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_surface("/nonexistent/dir/none.gri", None).unwrap_err();
        match err {
            Error::File { path, .. } => assert!(path.ends_with("none.gri")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_flipped_surface_roundtrip() {
        let mut s = sample_surface();
        s.set_yflip(YFlip::Flipped);
        for format in [SurfaceFormat::IrapBinary, SurfaceFormat::IrapAscii] {
            let back = read_surface_from_buffer(&write_surface_to_buffer(&s, format).unwrap(), None).unwrap();
            assert_eq!(back.yflip(), YFlip::Flipped);
            assert_eq!(back.geometry(), s.geometry());
        }
    }
}
