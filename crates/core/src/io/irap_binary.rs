//! Irap classic binary surface codec
//!
//! Big-endian Fortran sequential records, each framed by its byte length
//! as an `i32` before and after the payload:
//!
//! ```text
//! record 1 (32 bytes): i32 -996, i32 nrow, f32 xori, xmax, yori, ymax, xinc, yinc
//! record 2 (16 bytes): i32 ncol, f32 rotation, xori, yori
//! record 3 (28 bytes): i32 × 7, all zero
//! data records:        f32 values, one grid row (ncol values) per record
//! ```
//!
//! A flipped lattice is stored with a negative `yinc`. Readers accept data
//! records of any length that is a whole number of values.

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use tracing::{debug, warn};

use super::{check_encodable, is_undef, IRAP_MAGIC, UNDEF_VALUE};
use crate::error::{Error, Result};
use crate::surface::{RegularSurface, SurfaceGeometry, SurfaceValues, YFlip};

const FORMAT: &str = "Irap binary";

const HEADER1_LEN: usize = 32;
const HEADER2_LEN: usize = 16;
const HEADER3_LEN: usize = 28;

/// Encode a surface as Irap classic binary
///
/// Header reals and values are stored in single precision. Defined values
/// that round to [`UNDEF_VALUE`] or above in `f32`, or overflow it, are rejected with
/// `Error::InvalidParameter`, since they would read back as undefined.
pub fn encode_irap_binary(surface: &RegularSurface) -> Result<Vec<u8>> {
    check_encodable(FORMAT, surface, |v| v as f32 as f64)?;
    let g = surface.geometry();
    let (ncol, nrow) = (g.ncol(), g.nrow());
    let row_len = ncol * 4;

    let mut buf = Vec::with_capacity(100 + nrow * (row_len + 8));

    write_marker(&mut buf, HEADER1_LEN)?;
    buf.write_i32::<BigEndian>(IRAP_MAGIC)?;
    buf.write_i32::<BigEndian>(to_i32("nrow", nrow)?)?;
    buf.write_f32::<BigEndian>(g.xori() as f32)?;
    buf.write_f32::<BigEndian>(g.local_xmax() as f32)?;
    buf.write_f32::<BigEndian>(g.yori() as f32)?;
    buf.write_f32::<BigEndian>(g.local_ymax() as f32)?;
    buf.write_f32::<BigEndian>(g.xinc() as f32)?;
    buf.write_f32::<BigEndian>((g.yinc() * g.yflip().sign()) as f32)?;
    write_marker(&mut buf, HEADER1_LEN)?;

    write_marker(&mut buf, HEADER2_LEN)?;
    buf.write_i32::<BigEndian>(to_i32("ncol", ncol)?)?;
    buf.write_f32::<BigEndian>(g.rotation() as f32)?;
    buf.write_f32::<BigEndian>(g.xori() as f32)?;
    buf.write_f32::<BigEndian>(g.yori() as f32)?;
    write_marker(&mut buf, HEADER2_LEN)?;

    write_marker(&mut buf, HEADER3_LEN)?;
    for _ in 0..7 {
        buf.write_i32::<BigEndian>(0)?;
    }
    write_marker(&mut buf, HEADER3_LEN)?;

    for row in surface.values().view().rows() {
        write_marker(&mut buf, row_len)?;
        for cell in row.iter() {
            buf.write_f32::<BigEndian>(cell.unwrap_or(UNDEF_VALUE) as f32)?;
        }
        write_marker(&mut buf, row_len)?;
    }

    Ok(buf)
}

/// Decode an Irap classic binary surface
pub fn decode_irap_binary(data: &[u8]) -> Result<RegularSurface> {
    let mut reader = RecordReader { data, pos: 0 };

    let header1 = reader.expect_record(HEADER1_LEN, "header record 1")?;
    let magic = BigEndian::read_i32(&header1[0..4]);
    if magic != IRAP_MAGIC {
        return Err(Error::format(FORMAT, format!("bad identifier {magic}, expected {IRAP_MAGIC}")));
    }
    let nrow = BigEndian::read_i32(&header1[4..8]);
    let xori = BigEndian::read_f32(&header1[8..12]) as f64;
    let yori = BigEndian::read_f32(&header1[16..20]) as f64;
    let xinc = BigEndian::read_f32(&header1[24..28]) as f64;
    let yinc = BigEndian::read_f32(&header1[28..32]) as f64;

    let header2 = reader.expect_record(HEADER2_LEN, "header record 2")?;
    let ncol = BigEndian::read_i32(&header2[0..4]);
    let rotation = BigEndian::read_f32(&header2[4..8]) as f64;
    let rot_xori = BigEndian::read_f32(&header2[8..12]) as f64;
    let rot_yori = BigEndian::read_f32(&header2[12..16]) as f64;

    reader.expect_record(HEADER3_LEN, "header record 3")?;

    let (ncol, nrow) = dimensions(ncol, nrow)?;
    if rot_xori != xori || rot_yori != yori {
        warn!(
            "rotation origin ({rot_xori}, {rot_yori}) differs from origin ({xori}, {yori}); using the origin"
        );
    }

    let geometry = SurfaceGeometry::new(ncol, nrow, xori, yori, xinc, yinc.abs())
        .and_then(|g| g.with_rotation(rotation))
        .map_err(|e| Error::format(FORMAT, e.to_string()))?
        .with_yflip(YFlip::from_sign(yinc));

    let expected = cell_count(ncol, nrow)?;
    let available = (data.len() - reader.pos) / 4;
    if available < expected {
        return Err(Error::format(
            FORMAT,
            format!("{ncol} x {nrow} lattice declared, data holds at most {available} values"),
        ));
    }
    let mut cells = Vec::with_capacity(expected);
    while cells.len() < expected {
        if reader.at_end() {
            return Err(Error::format(
                FORMAT,
                format!("data ends after {} of {} values", cells.len(), expected),
            ));
        }
        let record = reader.next_record()?;
        if record.len() % 4 != 0 {
            return Err(Error::format(
                FORMAT,
                format!("data record of {} bytes is not a whole number of values", record.len()),
            ));
        }
        if cells.len() + record.len() / 4 > expected {
            return Err(Error::format(
                FORMAT,
                format!("more values than the {ncol} x {nrow} lattice declared in the header"),
            ));
        }
        cells.extend(record.chunks_exact(4).map(|chunk| {
            let v = BigEndian::read_f32(chunk) as f64;
            (!is_undef(v)).then_some(v)
        }));
    }
    if !reader.at_end() {
        return Err(Error::format(
            FORMAT,
            format!("{} trailing bytes after the value matrix", data.len() - reader.pos),
        ));
    }

    debug!("decoded Irap binary surface {ncol} x {nrow}, rotation {rotation}");
    let values = SurfaceValues::from_vec(cells, ncol, nrow)?;
    RegularSurface::new(geometry, values)
}

/// Cursor over Fortran sequential records
struct RecordReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn next_record(&mut self) -> Result<&'a [u8]> {
        let data = self.data;
        let len = self.marker()?;
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| Error::format(FORMAT, format!("truncated record of {len} bytes at offset {}", self.pos)))?;
        let body = &data[self.pos..end];
        self.pos = end;

        let trailer = self.marker()?;
        if trailer != len {
            return Err(Error::format(
                FORMAT,
                format!("record markers disagree ({len} vs {trailer})"),
            ));
        }
        Ok(body)
    }

    fn expect_record(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let body = self.next_record()?;
        if body.len() != len {
            return Err(Error::format(
                FORMAT,
                format!("{what} is {} bytes, expected {len}", body.len()),
            ));
        }
        Ok(body)
    }

    fn marker(&mut self) -> Result<usize> {
        let data = self.data;
        let bytes = data
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| Error::format(FORMAT, format!("truncated at offset {}", self.pos)))?;
        let len = BigEndian::read_i32(bytes);
        self.pos += 4;
        usize::try_from(len).map_err(|_| Error::format(FORMAT, format!("negative record length {len}")))
    }
}

fn write_marker(buf: &mut Vec<u8>, len: usize) -> Result<()> {
    buf.write_i32::<BigEndian>(to_i32("record length", len)?)?;
    Ok(())
}

fn to_i32(name: &'static str, value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::InvalidParameter {
        name,
        value: value.to_string(),
        reason: "too large for an Irap binary header".into(),
    })
}

fn cell_count(ncol: usize, nrow: usize) -> Result<usize> {
    ncol.checked_mul(nrow)
        .ok_or_else(|| Error::format(FORMAT, format!("{ncol} x {nrow} lattice is too large")))
}

fn dimensions(ncol: i32, nrow: i32) -> Result<(usize, usize)> {
    if ncol <= 0 || nrow <= 0 {
        return Err(Error::format(
            FORMAT,
            format!("non-positive dimensions {ncol} x {nrow}"),
        ));
    }
    Ok((ncol as usize, nrow as usize))
}
