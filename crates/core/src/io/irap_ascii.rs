//! Irap classic ASCII surface codec
//!
//! ```text
//! -996 nrow xinc yinc
//! xori xmax yori ymax
//! ncol rotation xori yori
//! 0 0 0 0 0 0 0
//! v v v v v v
//! ...
//! ```
//!
//! Header reals are written in shortest round-trip form, so geometry
//! survives a round-trip exactly. Values are written with a fixed four
//! decimals, six per line, in the shared cell order.

use std::fmt::Write;
use std::str::SplitWhitespace;

use tracing::{debug, warn};

use super::{check_encodable, is_undef, IRAP_MAGIC, UNDEF_VALUE};
use crate::error::{Error, Result};
use crate::surface::{RegularSurface, SurfaceGeometry, SurfaceValues, YFlip};

const FORMAT: &str = "Irap ASCII";

/// Values per text line
pub const VALUES_PER_LINE: usize = 6;

/// Decimal digits written per value
pub const VALUE_DECIMALS: usize = 4;

/// Encode a surface as Irap classic ASCII
///
/// Defined values that print as [`UNDEF_VALUE`] or above are rejected with
/// `Error::InvalidParameter`, since they would read back as undefined.
pub fn encode_irap_ascii(surface: &RegularSurface) -> Result<String> {
    check_encodable(FORMAT, surface, |v| {
        if v.abs() < UNDEF_VALUE {
            (v * 1.0e4).round() / 1.0e4
        } else {
            v
        }
    })?;
    let g = surface.geometry();
    let values = surface.values();
    let mut out = String::with_capacity(128 + values.len() * 14);

    // Writing into a String cannot fail
    let _ = writeln!(out, "{} {} {} {}", IRAP_MAGIC, g.nrow(), g.xinc(), g.yinc() * g.yflip().sign());
    let _ = writeln!(out, "{} {} {} {}", g.xori(), g.local_xmax(), g.yori(), g.local_ymax());
    let _ = writeln!(out, "{} {} {} {}", g.ncol(), g.rotation(), g.xori(), g.yori());
    out.push_str("0 0 0 0 0 0 0\n");

    for (n, cell) in values.view().iter().enumerate() {
        if n > 0 {
            out.push(if n % VALUES_PER_LINE == 0 { '\n' } else { ' ' });
        }
        let v = cell.unwrap_or(UNDEF_VALUE);
        let _ = write!(out, "{v:.prec$}", prec = VALUE_DECIMALS);
    }
    out.push('\n');
    Ok(out)
}

/// Decode an Irap classic ASCII surface
pub fn decode_irap_ascii(data: &[u8]) -> Result<RegularSurface> {
    let text = std::str::from_utf8(data)
        .map_err(|e| Error::format(FORMAT, format!("not valid text: {e}")))?;
    let mut tokens = Tokens {
        inner: text.split_whitespace(),
    };

    let magic = tokens.integer("identifier")?;
    if magic != IRAP_MAGIC as i64 {
        return Err(Error::format(FORMAT, format!("bad identifier {magic}, expected {IRAP_MAGIC}")));
    }
    let nrow = tokens.dimension("nrow")?;
    let xinc = tokens.real("xinc")?;
    let yinc = tokens.real("yinc")?;
    let xori = tokens.real("xori")?;
    tokens.real("xmax")?;
    let yori = tokens.real("yori")?;
    tokens.real("ymax")?;
    let ncol = tokens.dimension("ncol")?;
    let rotation = tokens.real("rotation")?;
    let rot_xori = tokens.real("rotation origin x")?;
    let rot_yori = tokens.real("rotation origin y")?;
    for _ in 0..7 {
        tokens.integer("reserved header field")?;
    }

    if rot_xori != xori || rot_yori != yori {
        warn!(
            "rotation origin ({rot_xori}, {rot_yori}) differs from origin ({xori}, {yori}); using the origin"
        );
    }

    let geometry = SurfaceGeometry::new(ncol, nrow, xori, yori, xinc, yinc.abs())
        .and_then(|g| g.with_rotation(rotation))
        .map_err(|e| Error::format(FORMAT, e.to_string()))?
        .with_yflip(YFlip::from_sign(yinc));

    let expected = ncol.checked_mul(nrow).ok_or_else(|| {
        Error::format(FORMAT, format!("{ncol} x {nrow} lattice is too large"))
    })?;
    // Every value takes at least one character and one separator
    let mut cells = Vec::with_capacity(expected.min(text.len() / 2));
    while cells.len() < expected {
        let v = tokens.real("value")?;
        cells.push((!is_undef(v)).then_some(v));
    }
    if tokens.inner.next().is_some() {
        return Err(Error::format(
            FORMAT,
            format!("more values than the {ncol} x {nrow} lattice declared in the header"),
        ));
    }

    debug!("decoded Irap ASCII surface {ncol} x {nrow}, rotation {rotation}");
    let values = SurfaceValues::from_vec(cells, ncol, nrow)?;
    RegularSurface::new(geometry, values)
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn next(&mut self, what: &str) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| Error::format(FORMAT, format!("unexpected end of data reading {what}")))
    }

    fn real(&mut self, what: &str) -> Result<f64> {
        let token = self.next(what)?;
        token
            .parse::<f64>()
            .map_err(|_| Error::format(FORMAT, format!("cannot parse {what} from {token:?}")))
    }

    fn integer(&mut self, what: &str) -> Result<i64> {
        let token = self.next(what)?;
        token
            .parse::<i64>()
            .map_err(|_| Error::format(FORMAT, format!("cannot parse {what} from {token:?}")))
    }

    fn dimension(&mut self, what: &str) -> Result<usize> {
        let n = self.integer(what)?;
        if n <= 0 {
            return Err(Error::format(FORMAT, format!("non-positive {what} {n}")));
        }
        usize::try_from(n).map_err(|_| Error::format(FORMAT, format!("{what} {n} too large")))
    }
}
