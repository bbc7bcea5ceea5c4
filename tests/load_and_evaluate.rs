use std::io::Write;

use approx::assert_relative_eq;
use orrery::{
    load_appearances, load_elements, match_appearances, LoadError, LoaderOptions, OrbitConfig, Simulation,
    PATH_SAMPLES,
};

const ELEMENTS: &str = "\
name,a,e,i,long_node,long_peri,mean_long
Mercury,0.38709927,0.20563593,7.00497902,48.33076593,77.45779628,252.25032350
Venus,0.72333566,0.00677672,3.39467605,76.67984255,131.60246718,181.97909950
Earth,1.0,0.0167,0.0,0.0,0.0,0.0
Mars,1.52371034,0.09339410,1.84969142,49.55953891,-23.94362959,-4.55343205
";

fn write_temp(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn csv_to_positions() {
    let elements = write_temp(ELEMENTS);
    let config = OrbitConfig::default();

    let catalog = load_elements(elements.path(), &config.loader).unwrap();
    assert_eq!(catalog.len(), 4);
    assert_relative_eq!(catalog.max_semi_major_axis(), 1.52371034);

    let mut sim = Simulation::new(catalog, config.evaluator(), &config.simulation);

    let earth = sim.position_of("Earth").unwrap();
    assert_relative_eq!(earth.length(), 0.9833, epsilon = 1e-9);

    // Half a revolution at 50 degrees per unit.
    sim.set_elapsed(3.6);
    let earth = sim.position_of("Earth").unwrap();
    assert_relative_eq!(earth.length(), 1.0167, epsilon = 1e-9);

    for path in sim.paths() {
        assert_eq!(path.len(), PATH_SAMPLES);
    }
}

#[test]
fn short_row_fails_the_whole_data_set() {
    let broken = format!("{ELEMENTS}Ceres,2.77,0.0785,10.59,80.3\n");
    let elements = write_temp(&broken);

    let err = load_elements(elements.path(), &LoaderOptions::default()).unwrap_err();
    match err {
        LoadError::ColumnCount { expected, found, line, .. } => {
            assert_eq!((expected, found, line), (7, 5, 6));
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn appearances_pair_with_bodies() {
    let elements = write_temp(ELEMENTS);
    let appearances = write_temp("name,diameter,texture\nEarth,12742,earth.jpg\nMars,6779,mars.jpg\nPhobos,22.4,phobos.jpg\n");

    let catalog = load_elements(elements.path(), &LoaderOptions::default()).unwrap();
    let appearances = load_appearances(appearances.path(), &LoaderOptions::default()).unwrap();
    let report = match_appearances(&catalog, &appearances);

    assert_eq!(report.matched.len(), 2);
    assert_eq!(report.unmatched_bodies, vec!["Mercury", "Venus"]);
    assert_eq!(report.unmatched_appearances, vec!["Phobos"]);
    assert_eq!(appearances.relative_size("Earth"), Some(1.0));
}

#[test]
fn config_file_drives_the_scale() {
    let elements = write_temp(ELEMENTS);
    let config = write_temp("scale = 100.0\n[simulation]\nuse_epoch_phase = true\n");

    let config = OrbitConfig::load(config.path()).unwrap();
    let catalog = load_elements(elements.path(), &config.loader).unwrap();
    let sim = Simulation::new(catalog, config.evaluator(), &config.simulation);

    // L and ϖ are both zero for this Earth, so the epoch phase is perihelion.
    let earth = sim.position_of("Earth").unwrap();
    assert_relative_eq!(earth.length(), 98.33, epsilon = 1e-6);
}
