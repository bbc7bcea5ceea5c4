//! Classical Keplerian orbital elements.

use std::f64::consts::TAU;

use crate::error::ElementsError;

/// The six classical elements for one body, angles stored in degrees.
///
/// Fields are private so a value can only be built through
/// [`OrbitalElements::new`], which enforces a bound orbit. Nothing mutates the
/// value afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalElements {
    name: String,
    semi_major_axis: f64,
    eccentricity: f64,
    inclination: f64,
    ascending_longitude: f64,
    perihelion_longitude: f64,
    mean_longitude: f64,
}

impl OrbitalElements {
    pub fn new(
        name: impl Into<String>,
        semi_major_axis: f64,
        eccentricity: f64,
        inclination: f64,
        ascending_longitude: f64,
        perihelion_longitude: f64,
        mean_longitude: f64,
    ) -> Result<Self, ElementsError> {
        if !(semi_major_axis.is_finite() && semi_major_axis > 0.0) {
            return Err(ElementsError::SemiMajorAxis(semi_major_axis));
        }
        // Also rejects NaN.
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(ElementsError::Eccentricity(eccentricity));
        }
        for (field, value) in [
            ("inclination", inclination),
            ("ascending longitude", ascending_longitude),
            ("perihelion longitude", perihelion_longitude),
            ("mean longitude", mean_longitude),
        ] {
            if !value.is_finite() {
                return Err(ElementsError::NonFinite { field, value });
            }
        }

        Ok(Self {
            name: name.into(),
            semi_major_axis,
            eccentricity,
            inclination,
            ascending_longitude,
            perihelion_longitude,
            mean_longitude,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `a`
    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    /// `e`
    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    /// `i` in degrees.
    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    /// `Ω` in degrees.
    pub fn ascending_longitude(&self) -> f64 {
        self.ascending_longitude
    }

    /// `ϖ` in degrees.
    pub fn perihelion_longitude(&self) -> f64 {
        self.perihelion_longitude
    }

    /// `L` in degrees.
    pub fn mean_longitude(&self) -> f64 {
        self.mean_longitude
    }

    pub fn inclination_rad(&self) -> f64 {
        self.inclination.to_radians()
    }

    pub fn ascending_longitude_rad(&self) -> f64 {
        self.ascending_longitude.to_radians()
    }

    pub fn perihelion_longitude_rad(&self) -> f64 {
        self.perihelion_longitude.to_radians()
    }

    pub fn mean_longitude_rad(&self) -> f64 {
        self.mean_longitude.to_radians()
    }

    #[inline]
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    #[inline]
    pub fn perihelion_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    #[inline]
    pub fn aphelion_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// `M0 = L - ϖ`, in radians within `[0, 2π)`.
    pub fn mean_anomaly_at_epoch(&self) -> f64 {
        (self.mean_longitude_rad() - self.perihelion_longitude_rad()).rem_euclid(TAU)
    }

    /// Orbital period in years, reading `a` as astronomical units.
    #[inline]
    pub fn period_years(&self) -> f64 {
        self.semi_major_axis.powf(1.5)
    }

    /// Degrees of mean anomaly per year.
    #[inline]
    pub fn mean_motion_deg(&self) -> f64 {
        360.0 / self.period_years()
    }
}
