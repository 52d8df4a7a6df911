//! Parameter generators: the producer side of the store.
//!
//! A generator is a plain data holder whose `generate` writes a fixed
//! schema of `key + Field` variables into a [`VarStore`]. Top-level model
//! assembly calls a sequence of generators, one key prefix each, before any
//! geometry is constructed from the store. Generators only ever write;
//! reading parameters back is the consumer's job.
//!
//! The two generators here cover the recurring shapes of the pattern: a
//! straight dimension table ([`PipeGenerator`]) and a table with derived
//! values ([`CollimatorGenerator`], aperture widths from a length and an
//! opening angle).

use crate::error::VarResult;
use crate::store::VarStore;

/// A producer that writes its parameter schema under a key prefix.
pub trait Generator {
    /// Writes this generator's `key + Field` variables into `store`.
    ///
    /// # Errors
    ///
    /// Generators are pure producers; implementations only fail if they
    /// read supporting variables that are absent or mistyped.
    fn generate(&self, store: &mut VarStore, key: &str) -> VarResult<()>;
}

/// Parameters for a cylindrical vacuum pipe with end flanges.
///
/// # Examples
///
/// ```
/// use varbase::{Generator, PipeGenerator, VarStore};
///
/// let mut store = VarStore::new();
/// PipeGenerator::new()
///     .with_radius(8.0)
///     .with_length(120.0)
///     .generate(&mut store, "OpticsPipe")
///     .unwrap();
///
/// assert_eq!(store.eval::<f64>("OpticsPipeRadius").unwrap(), 8.0);
/// assert_eq!(store.eval::<String>("OpticsPipeMat").unwrap(), "Stainless304");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PipeGenerator {
    radius: f64,
    length: f64,
    wall_thick: f64,
    /// Negative values are an offset added to the pipe outer radius.
    flange_radius: f64,
    flange_length: f64,
    mat: String,
    flange_mat: String,
    void_mat: String,
}

impl Default for PipeGenerator {
    fn default() -> Self {
        Self {
            radius: 8.0,
            length: 114.0,
            wall_thick: 0.5,
            flange_radius: -1.0,
            flange_length: 1.0,
            mat: "Stainless304".to_string(),
            flange_mat: "Stainless304".to_string(),
            void_mat: "Void".to_string(),
        }
    }
}

impl PipeGenerator {
    /// Creates a generator with conventional beam-pipe defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inner radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Sets the full length.
    #[must_use]
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Sets the wall thickness.
    #[must_use]
    pub fn with_wall_thick(mut self, wall_thick: f64) -> Self {
        self.wall_thick = wall_thick;
        self
    }

    /// Sets the flange radius and length. A negative radius is interpreted
    /// at generate time as an offset beyond the pipe outer radius.
    #[must_use]
    pub fn with_flange(mut self, radius: f64, length: f64) -> Self {
        self.flange_radius = radius;
        self.flange_length = length;
        self
    }

    /// Sets the pipe material.
    #[must_use]
    pub fn with_mat(mut self, mat: impl Into<String>) -> Self {
        self.mat = mat.into();
        self
    }

    /// Sets the flange material.
    #[must_use]
    pub fn with_flange_mat(mut self, mat: impl Into<String>) -> Self {
        self.flange_mat = mat.into();
        self
    }

    /// Sets the interior (void) material.
    #[must_use]
    pub fn with_void_mat(mut self, mat: impl Into<String>) -> Self {
        self.void_mat = mat.into();
        self
    }
}

impl Generator for PipeGenerator {
    fn generate(&self, store: &mut VarStore, key: &str) -> VarResult<()> {
        let outer = self.radius + self.wall_thick;
        let flange_radius = if self.flange_radius < 0.0 {
            outer - self.flange_radius
        } else {
            self.flange_radius
        };

        store.add(format!("{key}Radius"), self.radius);
        store.add(format!("{key}Length"), self.length);
        store.add(format!("{key}WallThick"), self.wall_thick);
        store.add(format!("{key}FlangeRadius"), flange_radius);
        store.add(format!("{key}FlangeLength"), self.flange_length);
        store.add(format!("{key}Mat"), self.mat.as_str());
        store.add(format!("{key}FlangeMat"), self.flange_mat.as_str());
        store.add(format!("{key}VoidMat"), self.void_mat.as_str());
        Ok(())
    }
}

/// Parameters for a tapered collimator block.
///
/// The aperture is given at the collimator centre together with a full
/// opening angle; `generate` derives the front and back aperture sizes
/// from the half-length and the angle's tangent. A negative length is
/// interpreted as a fraction of the configured parent length.
#[derive(Debug, Clone, PartialEq)]
pub struct CollimatorGenerator {
    y_step: f64,
    length: f64,
    parent_length: f64,
    aperture_width: f64,
    aperture_height: f64,
    open_angle_deg: f64,
    mat: String,
    void_mat: String,
}

impl Default for CollimatorGenerator {
    fn default() -> Self {
        Self {
            y_step: 0.0,
            length: 30.0,
            parent_length: 0.0,
            aperture_width: 2.0,
            aperture_height: 2.0,
            open_angle_deg: 0.0,
            mat: "Tungsten".to_string(),
            void_mat: "Void".to_string(),
        }
    }
}

impl CollimatorGenerator {
    /// Creates a generator with conventional collimator defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the offset along the beam axis.
    #[must_use]
    pub fn with_y_step(mut self, y_step: f64) -> Self {
        self.y_step = y_step;
        self
    }

    /// Sets the full length. A negative value means a fraction of the
    /// parent length, resolved at generate time.
    #[must_use]
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// Sets the parent length that a negative [`Self::with_length`] value
    /// scales against.
    #[must_use]
    pub fn with_parent_length(mut self, parent_length: f64) -> Self {
        self.parent_length = parent_length;
        self
    }

    /// Sets the aperture width and height at the collimator centre.
    #[must_use]
    pub fn with_aperture(mut self, width: f64, height: f64) -> Self {
        self.aperture_width = width;
        self.aperture_height = height;
        self
    }

    /// Sets the full opening angle in degrees (0 for a straight channel).
    #[must_use]
    pub fn with_open_angle(mut self, degrees: f64) -> Self {
        self.open_angle_deg = degrees;
        self
    }

    /// Sets the body material.
    #[must_use]
    pub fn with_mat(mut self, mat: impl Into<String>) -> Self {
        self.mat = mat.into();
        self
    }

    /// Sets the channel (void) material.
    #[must_use]
    pub fn with_void_mat(mut self, mat: impl Into<String>) -> Self {
        self.void_mat = mat.into();
        self
    }
}

impl Generator for CollimatorGenerator {
    fn generate(&self, store: &mut VarStore, key: &str) -> VarResult<()> {
        let length = if self.length < 0.0 {
            -self.length * self.parent_length
        } else {
            self.length
        };
        let taper = (length / 2.0) * self.open_angle_deg.to_radians().tan();

        store.add(format!("{key}YStep"), self.y_step);
        store.add(format!("{key}Length"), length);
        store.add(format!("{key}FrontWidth"), self.aperture_width - taper);
        store.add(format!("{key}BackWidth"), self.aperture_width + taper);
        store.add(format!("{key}FrontHeight"), self.aperture_height - taper);
        store.add(format!("{key}BackHeight"), self.aperture_height + taper);
        store.add(format!("{key}Mat"), self.mat.as_str());
        store.add(format!("{key}VoidMat"), self.void_mat.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_generator_schema() {
        let mut store = VarStore::new();
        PipeGenerator::new()
            .with_radius(5.0)
            .with_length(80.0)
            .with_wall_thick(0.4)
            .with_flange(9.0, 1.2)
            .with_mat("Aluminium")
            .generate(&mut store, "TestPipe")
            .unwrap();

        assert_eq!(store.eval::<f64>("TestPipeRadius").unwrap(), 5.0);
        assert_eq!(store.eval::<f64>("TestPipeLength").unwrap(), 80.0);
        assert_eq!(store.eval::<f64>("TestPipeWallThick").unwrap(), 0.4);
        assert_eq!(store.eval::<f64>("TestPipeFlangeRadius").unwrap(), 9.0);
        assert_eq!(store.eval::<f64>("TestPipeFlangeLength").unwrap(), 1.2);
        assert_eq!(store.eval::<String>("TestPipeMat").unwrap(), "Aluminium");
        assert_eq!(store.eval::<String>("TestPipeVoidMat").unwrap(), "Void");
    }

    #[test]
    fn test_pipe_negative_flange_radius_is_offset() {
        let mut store = VarStore::new();
        PipeGenerator::new()
            .with_radius(5.0)
            .with_wall_thick(0.5)
            .with_flange(-1.5, 1.0)
            .generate(&mut store, "P")
            .unwrap();

        // outer radius 5.5 plus 1.5 offset
        assert_eq!(store.eval::<f64>("PFlangeRadius").unwrap(), 7.0);
    }

    #[test]
    fn test_collimator_taper_derivation() {
        let mut store = VarStore::new();
        CollimatorGenerator::new()
            .with_length(20.0)
            .with_aperture(3.0, 2.0)
            .with_open_angle(45.0)
            .generate(&mut store, "Coll")
            .unwrap();

        // taper = (20/2) * tan(45 deg) = 10
        let front = store.eval::<f64>("CollFrontWidth").unwrap();
        let back = store.eval::<f64>("CollBackWidth").unwrap();
        assert!((front - (3.0 - 10.0)).abs() < 1e-9);
        assert!((back - (3.0 + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn test_collimator_straight_channel() {
        let mut store = VarStore::new();
        CollimatorGenerator::new()
            .with_aperture(2.5, 2.5)
            .generate(&mut store, "C")
            .unwrap();
        assert_eq!(store.eval::<f64>("CFrontWidth").unwrap(), 2.5);
        assert_eq!(store.eval::<f64>("CBackWidth").unwrap(), 2.5);
    }

    #[test]
    fn test_collimator_fractional_length() {
        let mut store = VarStore::new();
        CollimatorGenerator::new()
            .with_length(-0.25)
            .with_parent_length(200.0)
            .generate(&mut store, "C")
            .unwrap();
        assert_eq!(store.eval::<f64>("CLength").unwrap(), 50.0);
    }

    #[test]
    fn test_generators_are_object_safe() {
        let generators: Vec<Box<dyn Generator>> = vec![
            Box::new(PipeGenerator::new()),
            Box::new(CollimatorGenerator::new()),
        ];
        let mut store = VarStore::new();
        for (i, g) in generators.iter().enumerate() {
            g.generate(&mut store, &format!("G{i}")).unwrap();
        }
        assert!(store.has("G0Radius"));
        assert!(store.has("G1Length"));
    }
}
