//! Main RegularSurface type

use std::path::Path;

use crate::error::{Error, Result};
use crate::io::{self, SurfaceFormat};
use crate::surface::{BoundingBox, SurfaceGeometry, SurfaceStatistics, SurfaceValues, YFlip};

/// A regularly gridded surface: a lattice placement plus one value per node.
///
/// Geometry and values always agree on `ncol × nrow`; every operation that
/// could break that is checked.
///
/// # Example
///
/// ```ignore
/// use regsurf_core::{RegularSurface, SurfaceFormat};
///
/// let mut surf = RegularSurface::from_file("topreek.gri", None)?;
/// surf.apply(|z| z + 300.0);
/// surf.to_file("topreek_plus_300.gri", SurfaceFormat::IrapBinary)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RegularSurface {
    geometry: SurfaceGeometry,
    values: SurfaceValues,
}

impl RegularSurface {
    /// Create a surface from a geometry and a matching value field
    pub fn new(geometry: SurfaceGeometry, values: SurfaceValues) -> Result<Self> {
        check_shape(&geometry, &values)?;
        Ok(Self { geometry, values })
    }

    /// Create a surface with every node set to `value`
    pub fn filled(geometry: SurfaceGeometry, value: f64) -> Self {
        let values = SurfaceValues::filled(geometry.ncol(), geometry.nrow(), value);
        Self { geometry, values }
    }

    /// Create a surface with every node undefined
    pub fn undefined(geometry: SurfaceGeometry) -> Self {
        let values = SurfaceValues::undefined(geometry.ncol(), geometry.nrow());
        Self { geometry, values }
    }

    /// Create a surface by evaluating `f(i, j)` at every node
    pub fn from_fn<F>(geometry: SurfaceGeometry, f: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<f64>,
    {
        let values = SurfaceValues::from_fn(geometry.ncol(), geometry.nrow(), f);
        Self { geometry, values }
    }

    // I/O

    /// Load a surface from file
    ///
    /// With `format` unset, the format is guessed from the file extension
    /// and then from the file content.
    pub fn from_file<P: AsRef<Path>>(path: P, format: Option<SurfaceFormat>) -> Result<Self> {
        io::read_surface(path, format)
    }

    /// Decode a surface from an in-memory buffer
    pub fn from_bytes(data: &[u8], format: SurfaceFormat) -> Result<Self> {
        format.decode(data)
    }

    /// Save the surface to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P, format: SurfaceFormat) -> Result<()> {
        io::write_surface(self, path, format)
    }

    /// Encode the surface into an in-memory buffer
    pub fn to_bytes(&self, format: SurfaceFormat) -> Result<Vec<u8>> {
        format.encode(self)
    }

    // Components

    pub fn geometry(&self) -> &SurfaceGeometry {
        &self.geometry
    }

    pub fn values(&self) -> &SurfaceValues {
        &self.values
    }

    /// Consume the surface and return its parts
    pub fn into_parts(self) -> (SurfaceGeometry, SurfaceValues) {
        (self.geometry, self.values)
    }

    // Dimensions and placement

    pub fn ncol(&self) -> usize {
        self.geometry.ncol()
    }

    pub fn nrow(&self) -> usize {
        self.geometry.nrow()
    }

    pub fn xori(&self) -> f64 {
        self.geometry.xori()
    }

    pub fn yori(&self) -> f64 {
        self.geometry.yori()
    }

    pub fn xinc(&self) -> f64 {
        self.geometry.xinc()
    }

    pub fn yinc(&self) -> f64 {
        self.geometry.yinc()
    }

    pub fn rotation(&self) -> f64 {
        self.geometry.rotation()
    }

    pub fn yflip(&self) -> YFlip {
        self.geometry.yflip()
    }

    pub fn set_origin(&mut self, xori: f64, yori: f64) -> Result<()> {
        self.geometry.set_origin(xori, yori)
    }

    pub fn set_increments(&mut self, xinc: f64, yinc: f64) -> Result<()> {
        self.geometry.set_increments(xinc, yinc)
    }

    pub fn set_rotation(&mut self, degrees: f64) -> Result<()> {
        self.geometry.set_rotation(degrees)
    }

    pub fn set_yflip(&mut self, yflip: YFlip) {
        self.geometry.set_yflip(yflip);
    }

    // Values

    /// Replace the whole value field; it must match `ncol × nrow`
    pub fn set_values(&mut self, values: SurfaceValues) -> Result<()> {
        check_shape(&self.geometry, &values)?;
        self.values = values;
        Ok(())
    }

    /// Value at node `(i, j)`; `Ok(None)` when undefined
    pub fn get_value(&self, i: usize, j: usize) -> Result<Option<f64>> {
        self.values.get(i, j)
    }

    pub fn set_value(&mut self, i: usize, j: usize, value: Option<f64>) -> Result<()> {
        self.values.set(i, j, value)
    }

    /// Transform every defined value, e.g. `surf.apply(|z| z + 300.0)`
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        self.values.apply(f);
    }

    /// Transform every defined value given its map position: `f(x, y, z)`
    pub fn apply_with_xy<F>(&mut self, mut f: F)
    where
        F: FnMut(f64, f64, f64) -> f64,
    {
        let geometry = self.geometry;
        self.values.apply_indexed(|i, j, z| {
            let (x, y) = geometry.node_xy(i, j);
            f(x, y, z)
        });
    }

    /// All cells in codec cell order (column index fastest)
    pub fn flatten_values(&self) -> Vec<Option<f64>> {
        self.values.flatten()
    }

    /// Defined values only, in codec cell order
    pub fn flatten_defined(&self) -> Vec<f64> {
        self.values.flatten_defined()
    }

    pub fn statistics(&self) -> SurfaceStatistics {
        self.values.statistics()
    }

    /// Map coordinates and values of every defined node, in codec cell order
    pub fn xy_value_lists(&self) -> (Vec<(f64, f64)>, Vec<f64>) {
        self.values
            .iter_nodes()
            .filter_map(|(i, j, v)| v.map(|v| (self.geometry.node_xy(i, j), v)))
            .unzip()
    }

    // Geometry

    pub fn bounds(&self) -> BoundingBox {
        self.geometry.bounds()
    }

    pub fn xmin(&self) -> f64 {
        self.bounds().xmin
    }

    pub fn xmax(&self) -> f64 {
        self.bounds().xmax
    }

    pub fn ymin(&self) -> f64 {
        self.bounds().ymin
    }

    pub fn ymax(&self) -> f64 {
        self.bounds().ymax
    }

    pub fn node_xy(&self, i: usize, j: usize) -> (f64, f64) {
        self.geometry.node_xy(i, j)
    }

    pub fn to_map(&self, i: f64, j: f64) -> (f64, f64) {
        self.geometry.to_map(i, j)
    }

    pub fn to_grid(&self, x: f64, y: f64) -> (f64, f64) {
        self.geometry.to_grid(x, y)
    }

    /// Whether both surfaces share dimensions and placement
    pub fn same_geometry(&self, other: &RegularSurface) -> bool {
        self.geometry.same_as(&other.geometry)
    }

    /// Fail unless both surfaces share dimensions and placement
    pub fn check_same_geometry(&self, other: &RegularSurface) -> Result<()> {
        if self.ncol() != other.ncol() || self.nrow() != other.nrow() {
            return Err(Error::ShapeMismatch {
                expected_ncol: self.ncol(),
                expected_nrow: self.nrow(),
                actual_ncol: other.ncol(),
                actual_nrow: other.nrow(),
            });
        }
        if !self.same_geometry(other) {
            return Err(Error::GeometryMismatch(format!(
                "{:?} vs {:?}",
                self.geometry, other.geometry
            )));
        }
        Ok(())
    }
}

impl Default for RegularSurface {
    /// A small 5 × 3 surface with 25 m spacing and one undefined node
    fn default() -> Self {
        Self::from_fn(SurfaceGeometry::default(), |i, j| {
            if (i, j) == (2, 2) {
                None
            } else {
                Some((i + 1 + 5 * j) as f64)
            }
        })
    }
}

fn check_shape(geometry: &SurfaceGeometry, values: &SurfaceValues) -> Result<()> {
    if geometry.ncol() != values.ncol() || geometry.nrow() != values.nrow() {
        return Err(Error::ShapeMismatch {
            expected_ncol: geometry.ncol(),
            expected_nrow: geometry.nrow(),
            actual_ncol: values.ncol(),
            actual_nrow: values.nrow(),
        });
    }
    Ok(())
}
