use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use fee_core::{Catalogue, CatalogueError, CatalogueItem, ItemCategory, PropertyType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between property types inside the `property_types` column.
const PROPERTY_TYPE_SEPARATOR: &str = "|";

/// Errors that can occur when loading or writing catalogue data.
///
/// Row numbers are 1-based and count data rows only (the header is row 0).
#[derive(Debug, Error)]
pub enum CatalogueLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read catalogue file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid unit cost '{value}' on row {row}")]
    InvalidUnitCost { value: String, row: usize },

    #[error("invalid category '{value}' on row {row} (expected standard or free)")]
    InvalidCategory { value: String, row: usize },

    #[error("invalid property type '{value}' on row {row} (expected land, house or unit)")]
    InvalidPropertyType { value: String, row: usize },

    #[error("invalid gst_included flag '{value}' on row {row}")]
    InvalidFlag { value: String, row: usize },

    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),
}

impl From<csv::Error> for CatalogueLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogueLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a catalogue CSV file.
///
/// Every column is kept as text so that conversion errors can name the row:
/// - `id`: stable item identifier
/// - `description`: display text
/// - `unit_cost`: price, `,` thousands separators allowed
/// - `category`: `standard` or `free`
/// - `property_types`: `|`-separated list of `land`, `house`, `unit`; empty
///   for items that are never auto-selected
/// - `gst_included`: `true`/`false` (also `yes`/`no`, `1`/`0`)
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CatalogueRecord {
    pub id: String,
    pub description: String,
    pub unit_cost: String,
    pub category: String,
    #[serde(default)]
    pub property_types: String,
    pub gst_included: String,
}

impl CatalogueRecord {
    fn from_item(item: &CatalogueItem) -> Self {
        let property_types = item
            .property_types
            .iter()
            .map(PropertyType::as_str)
            .collect::<Vec<_>>()
            .join(PROPERTY_TYPE_SEPARATOR);

        Self {
            id: item.id.clone(),
            description: item.description.clone(),
            unit_cost: item.unit_cost.to_string(),
            category: item.category.as_str().to_string(),
            property_types,
            gst_included: item.gst_included.to_string(),
        }
    }

    /// Converts the record into a catalogue item.
    ///
    /// `row` is 1-based and only used in error messages.
    fn to_item(
        &self,
        row: usize,
    ) -> Result<CatalogueItem, CatalogueLoaderError> {
        let unit_cost = Decimal::from_str(&self.unit_cost.trim().replace(',', "")).map_err(|_| {
            CatalogueLoaderError::InvalidUnitCost {
                value: self.unit_cost.clone(),
                row,
            }
        })?;

        let category =
            ItemCategory::parse(&self.category).ok_or_else(|| CatalogueLoaderError::InvalidCategory {
                value: self.category.clone(),
                row,
            })?;

        let property_types = self
            .property_types
            .split(PROPERTY_TYPE_SEPARATOR)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(|tag| {
                PropertyType::parse(tag).ok_or_else(|| CatalogueLoaderError::InvalidPropertyType {
                    value: tag.to_string(),
                    row,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let gst_included = parse_flag(&self.gst_included).ok_or_else(|| {
            CatalogueLoaderError::InvalidFlag {
                value: self.gst_included.clone(),
                row,
            }
        })?;

        Ok(CatalogueItem {
            id: self.id.trim().to_string(),
            description: self.description.trim().to_string(),
            unit_cost,
            category,
            property_types,
            gst_included,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

/// Loader for disbursement catalogues stored as CSV.
///
/// Headers are matched by name, so column order does not matter. Rows become
/// catalogue items in file order, and the finished list goes through
/// [`Catalogue::new`] so the usual id and cost checks apply.
pub struct CatalogueLoader;

impl CatalogueLoader {
    /// Parse catalogue records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<CatalogueRecord>, CatalogueLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: CatalogueRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Convert parsed records into a validated catalogue.
    pub fn build(records: &[CatalogueRecord]) -> Result<Catalogue, CatalogueLoaderError> {
        let items = records
            .iter()
            .enumerate()
            .map(|(idx, record)| record.to_item(idx + 1))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalogue::new(items)?)
    }

    /// Parse and build in one step.
    pub fn load<R: Read>(reader: R) -> Result<Catalogue, CatalogueLoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }

    /// Read a catalogue from a CSV file on disk.
    pub fn load_from_path(path: &Path) -> Result<Catalogue, CatalogueLoaderError> {
        let file = File::open(path).map_err(|source| CatalogueLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load(file)
    }

    /// Write a catalogue in the same CSV layout [`CatalogueLoader::parse`]
    /// reads. Returns the number of rows written.
    pub fn write<W: Write>(
        catalogue: &Catalogue,
        writer: W,
    ) -> Result<usize, CatalogueLoaderError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for item in catalogue {
            csv_writer.serialize(CatalogueRecord::from_item(item))?;
        }
        csv_writer
            .flush()
            .map_err(|e| CatalogueLoaderError::CsvParse(e.to_string()))?;

        Ok(catalogue.len())
    }
}
