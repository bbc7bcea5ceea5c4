//! Per-body presentation data and its association with loaded orbits.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::catalog::OrbitCatalog;

#[derive(Clone, Debug, PartialEq)]
pub struct PlanetAppearance {
    pub name: String,
    /// Equatorial diameter in km.
    pub diameter: f64,
    pub texture_path: String,
}

/// Finalized appearance records. The size normalisation maximum is fixed when
/// the set is built.
#[derive(Clone, Debug, Default)]
pub struct AppearanceSet {
    appearances: Vec<PlanetAppearance>,
    max_diameter: f64,
}

impl AppearanceSet {
    pub fn new(appearances: Vec<PlanetAppearance>) -> Self {
        let max_diameter = appearances
            .iter()
            .map(|appearance| OrderedFloat(appearance.diameter))
            .max()
            .map_or(0.0, |max| max.0);

        Self {
            appearances,
            max_diameter,
        }
    }

    pub fn len(&self) -> usize {
        self.appearances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appearances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanetAppearance> {
        self.appearances.iter()
    }

    pub fn as_slice(&self) -> &[PlanetAppearance] {
        &self.appearances
    }

    pub fn get(&self, name: &str) -> Option<&PlanetAppearance> {
        self.appearances.iter().find(|appearance| appearance.name == name)
    }

    pub fn max_diameter(&self) -> f64 {
        self.max_diameter
    }

    /// Diameter as a fraction of the largest body in the set.
    pub fn relative_size(&self, name: &str) -> Option<f64> {
        let appearance = self.get(name)?;
        (self.max_diameter > 0.0).then(|| appearance.diameter / self.max_diameter)
    }
}

/// Outcome of pairing orbits with appearances by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchReport {
    /// `(catalog index, appearance index)`
    pub matched: Vec<(usize, usize)>,
    /// Orbit names with no appearance record.
    pub unmatched_bodies: Vec<String>,
    /// Appearance names with no orbit, or repeats of an already matched name.
    pub unmatched_appearances: Vec<String>,
}

impl MatchReport {
    pub fn appearance_for(&self, body_index: usize) -> Option<usize> {
        self.matched
            .iter()
            .find(|&&(body, _)| body == body_index)
            .map(|&(_, appearance)| appearance)
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched_bodies.len() + self.unmatched_appearances.len()
    }
}

/// Pairs each body with the first appearance of the same name.
///
/// Missing and duplicate names are skipped, never fatal; they are counted in
/// the report and logged.
pub fn match_appearances(catalog: &OrbitCatalog, appearances: &AppearanceSet) -> MatchReport {
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    let mut report = MatchReport::default();

    for (index, appearance) in appearances.iter().enumerate() {
        if by_name.contains_key(appearance.name.as_str()) {
            report.unmatched_appearances.push(appearance.name.clone());
        } else {
            by_name.insert(&appearance.name, index);
        }
    }

    let mut claimed = vec![false; appearances.len()];
    for (body_index, body) in catalog.iter().enumerate() {
        match by_name.get(body.name()) {
            Some(&appearance_index) if !claimed[appearance_index] => {
                claimed[appearance_index] = true;
                report.matched.push((body_index, appearance_index));
            }
            _ => report.unmatched_bodies.push(body.name().to_owned()),
        }
    }

    for (index, appearance) in appearances.iter().enumerate() {
        if !claimed[index] && by_name.get(appearance.name.as_str()) == Some(&index) {
            report.unmatched_appearances.push(appearance.name.clone());
        }
    }

    if report.unmatched_count() > 0 {
        log::warn!(
            "{} of {} bodies matched an appearance ({} bodies, {} appearance records unmatched)",
            report.matched.len(),
            catalog.len(),
            report.unmatched_bodies.len(),
            report.unmatched_appearances.len(),
        );
    }

    report
}
