//! Tests for the batch controller: many files, failure policies and the
//! weeks manifest.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use drought_common::DroughtError;
use drought_raster::weeks::write_weeks_js;
use drought_raster::{block_on_detached, discover, BatchRunner, FailurePolicy, RasterConfig};
use geodata::BaseMap;
use renderer::{MapRenderer, OutputFormat};
use test_utils::{
    canvas, files_with_extension, square_around, weekly_names, DroughtDataDir, TestFeature,
};

fn runner_for(dir: &DroughtDataDir) -> BatchRunner {
    let base = BaseMap::load(&dir.data_dir().join("us.json")).unwrap();
    let renderer = MapRenderer::new(canvas::WIDTH, canvas::HEIGHT, canvas::SCALE).unwrap();
    BatchRunner::new(Arc::new(base), Arc::new(renderer), dir.img_dir())
}

fn weekly_feature(week: usize) -> Vec<TestFeature> {
    let lon = -120.0 + (week % 10) as f64 * 4.0;
    vec![TestFeature::new((week % 5) as f64, square_around(lon, 40.0, 3.0))]
}

fn png_names(dir: &DroughtDataDir) -> HashSet<String> {
    files_with_extension(&dir.img_dir(), "png").into_iter().collect()
}

#[tokio::test]
async fn test_more_files_than_concurrency_all_render() {
    let dir = DroughtDataDir::with_conus_topology();
    let names = weekly_names(2013, 60);
    let sources: Vec<PathBuf> = names
        .iter()
        .enumerate()
        .map(|(week, name)| dir.add_shapefile(name, &weekly_feature(week)))
        .collect();

    let report = runner_for(&dir).run(sources).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.rendered.len(), 60);

    let expected: HashSet<String> = names.iter().map(|n| format!("{}.png", n)).collect();
    assert_eq!(png_names(&dir), expected);
}

#[tokio::test]
async fn test_keep_going_reports_failure_and_renders_siblings() {
    let dir = DroughtDataDir::with_conus_topology();
    let good: Vec<PathBuf> = weekly_names(2013, 3)
        .iter()
        .enumerate()
        .map(|(week, name)| dir.add_shapefile(name, &weekly_feature(week)))
        .collect();
    let bad = dir.add_corrupt_shapefile("USDM_20130122");

    let mut sources = good.clone();
    sources.insert(1, bad.clone());

    let report = runner_for(&dir)
        .with_policy(FailurePolicy::KeepGoing)
        .run(sources)
        .await
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.rendered.len(), 3);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].source, bad);
    assert!(matches!(report.failed[0].error, DroughtError::ShapefileRead { .. }));

    assert_eq!(png_names(&dir).len(), 3);
    assert!(!dir.img_dir().join("USDM_20130122.png").exists());
}

#[tokio::test]
async fn test_fail_fast_returns_first_failure() {
    let dir = DroughtDataDir::with_conus_topology();
    let bad = dir.add_corrupt_shapefile("USDM_20130101");
    let good = dir.add_shapefile("USDM_20130108", &weekly_feature(1));

    let failure = runner_for(&dir)
        .with_policy(FailurePolicy::FailFast)
        .with_concurrency(1)
        .run(vec![bad.clone(), good])
        .await
        .unwrap_err();

    assert_eq!(failure.source, bad);
    assert!(failure.to_string().contains("USDM_20130101.shp"));
}

#[test]
fn test_fail_fast_exit_does_not_wait_for_slow_sibling() {
    let dir = DroughtDataDir::with_conus_topology();
    let bad = dir.add_corrupt_shapefile("USDM_20130101");
    let mut sources = vec![bad.clone()];
    for (week, name) in weekly_names(2013, 4).iter().enumerate().skip(1) {
        sources.push(dir.add_shapefile(name, &weekly_feature(week)));
    }

    let runner = runner_for(&dir)
        .with_policy(FailurePolicy::FailFast)
        .with_concurrency(4);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    let started = Instant::now();
    let result = block_on_detached(runtime, async move {
        // A render still running on the blocking pool when the failure lands
        let _sibling = tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_secs(3)));
        runner.run(sources).await
    });
    let elapsed = started.elapsed();

    assert_eq!(result.unwrap_err().source, bad);
    assert!(elapsed < Duration::from_secs(2), "exit waited {:?}", elapsed);
}

#[tokio::test]
async fn test_skipped_features_are_totalled() {
    let dir = DroughtDataDir::with_conus_topology();
    let sources = vec![
        dir.add_shapefile(
            "USDM_20130101",
            &[
                TestFeature::new(5.0, square_around(-100.0, 40.0, 2.0)),
                TestFeature::new(1.0, square_around(-90.0, 40.0, 2.0)),
            ],
        ),
        dir.add_shapefile(
            "USDM_20130108",
            &[TestFeature::without_severity(square_around(-100.0, 40.0, 2.0))],
        ),
    ];

    let report = runner_for(&dir).run(sources).await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.features_skipped(), 2);
}

#[tokio::test]
async fn test_svg_batch() {
    let dir = DroughtDataDir::with_conus_topology();
    let source = dir.add_shapefile("USDM_20130101", &weekly_feature(0));

    let report = runner_for(&dir)
        .with_format(OutputFormat::Svg)
        .run(vec![source])
        .await
        .unwrap();

    assert_eq!(report.rendered[0].output, dir.img_dir().join("USDM_20130101.svg"));
    assert!(report.rendered[0].output.exists());
}

#[tokio::test]
async fn test_weeks_manifest_lists_rendered_weeks() {
    let dir = DroughtDataDir::with_conus_topology();
    // Written newest first to check the manifest sorts
    for (week, name) in weekly_names(2013, 3).iter().enumerate().rev() {
        dir.add_shapefile(name, &weekly_feature(week));
    }

    let config = RasterConfig {
        data_dir: dir.data_dir(),
        img_dir: dir.img_dir(),
        ..RasterConfig::default()
    };
    let inputs = discover(&config).unwrap();
    let report = runner_for(&dir).run(inputs.shapefiles).await.unwrap();
    assert!(report.is_success());

    let manifest = dir.root().join("static").join("js").join("weeks.js");
    let count = write_weeks_js(&dir.img_dir(), &manifest).unwrap();

    assert_eq!(count, 3);
    assert_eq!(
        fs::read_to_string(&manifest).unwrap(),
        "var WEEKS = [\n    \"USDM_20130101\",\n    \"USDM_20130108\",\n    \"USDM_20130115\"\n];"
    );
}
