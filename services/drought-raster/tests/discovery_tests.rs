//! Tests for input discovery against a data directory on disk.

use std::fs;

use drought_common::DroughtError;
use drought_raster::discovery::list_shapefiles;
use drought_raster::{discover, RasterConfig};
use test_utils::{square_ring, DroughtDataDir, TestFeature};

fn config_for(dir: &DroughtDataDir, year: Option<i32>) -> RasterConfig {
    RasterConfig {
        data_dir: dir.data_dir(),
        img_dir: dir.img_dir(),
        year,
        ..RasterConfig::default()
    }
}

fn one_feature() -> Vec<TestFeature> {
    vec![TestFeature::new(1.0, square_ring(-100.0, 35.0, 2.0))]
}

#[test]
fn test_year_filter_selects_only_that_year() {
    let dir = DroughtDataDir::with_conus_topology();
    for name in [
        "USDM_20121225",
        "USDM_20130101",
        "usdm_20130108",
        "USDM_20120101_2013",
        "USDM_20140107",
    ] {
        dir.add_shapefile(name, &one_feature());
    }

    let inputs = discover(&config_for(&dir, Some(2013))).unwrap();
    let names: Vec<String> = inputs
        .shapefiles
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["USDM_20130101.shp", "usdm_20130108.shp"]);
}

#[test]
fn test_without_year_every_shapefile_is_listed_in_order() {
    let dir = DroughtDataDir::with_conus_topology();
    for name in ["USDM_20130108", "USDM_20121225", "USDM_20130101"] {
        dir.add_shapefile(name, &one_feature());
    }

    let inputs = discover(&config_for(&dir, None)).unwrap();

    assert_eq!(inputs.shapefiles.len(), 3);
    assert!(inputs.shapefiles.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(inputs.base.states.len(), 2);
}

#[test]
fn test_sidecar_files_and_subdirectories_are_ignored() {
    let dir = DroughtDataDir::new();
    dir.add_shapefile("USDM_20130101", &one_feature());
    fs::write(dir.shapefiles_dir().join("README.txt"), "notes").unwrap();
    fs::create_dir_all(dir.shapefiles_dir().join("archive.shp")).unwrap();
    fs::create_dir_all(dir.shapefiles_dir().join("nested")).unwrap();
    dir.add_shapefile("nested/USDM_20130108", &one_feature());

    let shapefiles = list_shapefiles(&dir.shapefiles_dir(), None).unwrap();
    assert_eq!(shapefiles, vec![dir.shapefiles_dir().join("USDM_20130101.shp")]);
}

#[test]
fn test_missing_topology_aborts_discovery() {
    let dir = DroughtDataDir::new();
    dir.add_shapefile("USDM_20130101", &one_feature());

    let err = discover(&config_for(&dir, None)).unwrap_err();
    assert!(matches!(err, DroughtError::TopologyRead { .. }));
    assert!(err.is_discovery());
}

#[test]
fn test_missing_shapefile_directory_aborts_discovery() {
    let dir = DroughtDataDir::with_conus_topology();
    fs::remove_dir_all(dir.shapefiles_dir()).unwrap();

    let err = discover(&config_for(&dir, None)).unwrap_err();
    assert!(matches!(err, DroughtError::ShapefileListing { .. }));
}

#[test]
fn test_empty_directory_is_not_an_error() {
    let dir = DroughtDataDir::with_conus_topology();
    let inputs = discover(&config_for(&dir, Some(2013))).unwrap();
    assert!(inputs.shapefiles.is_empty());
}
