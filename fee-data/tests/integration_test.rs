//! Integration tests for catalogue loading against the bundled CSV files.

use fee_core::{Catalogue, CatalogueError, PropertyType};
use fee_data::{CatalogueLoader, CatalogueLoaderError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const STANDARD_CSV: &str = include_str!("../test-data/standard_catalogue.csv");
const GOLD_COAST_CSV: &str = include_str!("../test-data/gold_coast_catalogue.csv");

#[test]
fn test_standard_csv_matches_built_in_schedule() {
    let catalogue = CatalogueLoader::load(STANDARD_CSV.as_bytes()).expect("Failed to load CSV");

    assert_eq!(catalogue, Catalogue::standard());
}

#[test]
fn test_standard_csv_record_count() {
    let records = CatalogueLoader::parse(STANDARD_CSV.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(records.len(), 17);
    assert_eq!(records[16].id, "council-zoning");
    assert_eq!(records[16].property_types, "");
}

#[test]
fn test_regional_catalogue_loads() {
    let catalogue = CatalogueLoader::load(GOLD_COAST_CSV.as_bytes()).expect("Failed to load CSV");

    assert_eq!(catalogue.len(), 4);

    let rates = catalogue.get("council-rates").expect("council-rates missing");
    assert_eq!(rates.unit_cost, dec!(1012.50));
    assert_eq!(rates.description, "Council Rates (Gold Coast)");

    let pool = catalogue.get("pool-register").expect("pool-register missing");
    assert!(pool.is_free());
    assert!(pool.gst_included);

    let land: Vec<_> = catalogue
        .for_property_type(PropertyType::Land)
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(land, vec!["professional-fees", "titles-search"]);
}

#[test]
fn test_export_to_file_and_reload() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("exported.csv");
    let original = CatalogueLoader::load(GOLD_COAST_CSV.as_bytes()).unwrap();

    let file = std::fs::File::create(&path).unwrap();
    let written = CatalogueLoader::write(&original, file).expect("Failed to export");
    let reloaded = CatalogueLoader::load_from_path(&path).expect("Failed to reload");

    assert_eq!(written, 4);
    assert_eq!(reloaded, original);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");

    let err = CatalogueLoader::load_from_path(&path).expect_err("Should fail for missing file");

    assert!(matches!(err, CatalogueLoaderError::Io { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn test_reserved_id_in_file_is_rejected() {
    let csv = "id,description,unit_cost,category,property_types,gst_included\n\
               custom-1,Sneaky,10.00,standard,land,true\n";

    let err = CatalogueLoader::load(csv.as_bytes()).expect_err("Should reject custom- ids");

    assert!(matches!(
        err,
        CatalogueLoaderError::Catalogue(CatalogueError::ReservedId(_))
    ));
}
