use std::collections::HashSet;

use ordered_float::OrderedFloat;

use crate::elements::OrbitalElements;

/// A finalized, read-only set of orbital elements.
///
/// Derived values are computed once here rather than per lookup.
#[derive(Clone, Debug, Default)]
pub struct OrbitCatalog {
    bodies: Vec<OrbitalElements>,
    max_semi_major_axis: f64,
}

impl OrbitCatalog {
    pub fn new(bodies: Vec<OrbitalElements>) -> Self {
        let max_semi_major_axis = bodies
            .iter()
            .map(|body| OrderedFloat(body.semi_major_axis()))
            .max()
            .map_or(0.0, |max| max.0);

        Self {
            bodies,
            max_semi_major_axis,
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrbitalElements> {
        self.bodies.iter()
    }

    pub fn as_slice(&self) -> &[OrbitalElements] {
        &self.bodies
    }

    /// First body with this exact name.
    pub fn get(&self, name: &str) -> Option<&OrbitalElements> {
        self.bodies.iter().find(|body| body.name() == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|body| body.name() == name)
    }

    /// Names that occur more than once, in first-seen order.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.bodies
            .iter()
            .map(OrbitalElements::name)
            .filter(|name| !seen.insert(*name) && reported.insert(*name))
            .collect()
    }

    /// Largest `a` in the set, 0 when empty.
    pub fn max_semi_major_axis(&self) -> f64 {
        self.max_semi_major_axis
    }
}

impl<'a> IntoIterator for &'a OrbitCatalog {
    type Item = &'a OrbitalElements;
    type IntoIter = std::slice::Iter<'a, OrbitalElements>;

    fn into_iter(self) -> Self::IntoIter {
        self.bodies.iter()
    }
}
