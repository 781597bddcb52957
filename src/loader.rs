use crate::error::LoadError;
use crate::headers::canonical_field;
use crate::types::{RawRow, VehicleRecord};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub records: usize,
}

/// Outcome of the one-shot dataset load, as seen by the views.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded(Arc<[VehicleRecord]>),
    Failed(String),
}

impl LoadState {
    pub fn from_result(result: Result<Vec<VehicleRecord>, LoadError>) -> Self {
        match result {
            Ok(records) => LoadState::Loaded(records.into()),
            Err(e) => LoadState::Failed(e.to_string()),
        }
    }
}

/// Read CSV rows from any reader. The first row is the header; each header
/// passes through `transform` and becomes the row key. Empty lines are
/// skipped by the reader; a row of bare delimiters is kept as a row of empty
/// values. Any parse error aborts the whole read.
pub fn read_rows_from_reader<R, F>(
    reader: R,
    transform: F,
) -> Result<(Vec<RawRow>, LoadReport), LoadError>
where
    R: Read,
    F: Fn(&str) -> String,
{
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr.headers()?.iter().map(&transform).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::MissingHeader);
    }
    debug!(columns = headers.len(), "parsed header row");

    let mut report = LoadReport::default();
    let mut rows: Vec<RawRow> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        report.rows_read += 1;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        rows.push(row);
    }
    Ok((rows, report))
}

pub fn read_rows<P, F>(path: P, transform: F) -> Result<(Vec<RawRow>, LoadReport), LoadError>
where
    P: AsRef<Path>,
    F: Fn(&str) -> String,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_rows_from_reader(file, transform)
}

/// One record per row, values copied verbatim.
pub fn normalize(rows: &[RawRow]) -> Vec<VehicleRecord> {
    rows.iter().map(VehicleRecord::from_row).collect()
}

pub fn load_vehicles_from_reader<R: Read>(
    reader: R,
) -> Result<(Vec<VehicleRecord>, LoadReport), LoadError> {
    let (rows, mut report) = read_rows_from_reader(reader, canonical_field)?;
    let records = normalize(&rows);
    report.records = records.len();
    Ok((records, report))
}

pub fn load_vehicles<P: AsRef<Path>>(
    path: P,
) -> Result<(Vec<VehicleRecord>, LoadReport), LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading vehicle dataset");
    let (rows, mut report) = read_rows(path, canonical_field).map_err(|e| {
        warn!(path = %path.display(), error = %e, "dataset load failed");
        e
    })?;
    let records = normalize(&rows);
    report.records = records.len();
    info!(
        rows = report.rows_read,
        records = report.records,
        "dataset loaded"
    );
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
VIN (1-10),County,City,State,Postal Code,Model Year,Make,Model,Electric Vehicle Type,Clean Alternative Fuel Vehicle (CAFV) Eligibility,Electric Range,Base MSRP,Legislative District,DOL Vehicle ID,Vehicle Location,Electric Utility,2020 Census Tract
5YJ3E1EB4L,Yakima,Yakima,WA,98908,2020,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,322,0,14,127175366,POINT (-120.56916 46.58514),PACIFICORP,53077000904
5YJ3E1EA7K,San Diego,San Diego,CA,92101,2019,TESLA,MODEL 3,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,220,0,,266614659,POINT (-117.16171 32.71568),,06073005102

1N4AZ0CP0F,King,Seattle,WA,98125,2015,NISSAN,LEAF,Battery Electric Vehicle (BEV),Clean Alternative Fuel Vehicle Eligible,84,0,46,100491128,POINT (-122.30253 47.72656),CITY OF SEATTLE - (WA)|CITY OF TACOMA - (WA),53033000100
";

    #[test]
    fn reads_rows_with_canonical_headers() {
        let (rows, report) = read_rows_from_reader(SAMPLE.as_bytes(), canonical_field).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(report.rows_read, 3);
        assert_eq!(rows[0]["vin"], "5YJ3E1EB4L");
        assert_eq!(rows[0]["electricRange"], "322");
        assert_eq!(rows[1]["legislativeDistrict"], "");
    }

    #[test]
    fn normalizes_rows_into_records_verbatim() {
        let (records, report) = load_vehicles_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(report.records, 3);
        let leaf = &records[2];
        assert_eq!(leaf.make, "NISSAN");
        assert_eq!(leaf.model, "LEAF");
        assert_eq!(leaf.model_year, "2015");
        assert_eq!(leaf.city, "Seattle");
        assert_eq!(leaf.base_msrp, "0");
        assert_eq!(leaf.census_tract, "53033000100");
        assert_eq!(leaf.location, "POINT (-122.30253 47.72656)");
    }

    #[test]
    fn delimiter_only_rows_become_empty_records() {
        let csv = "Make,City,Electric Range\nTESLA,Seattle,300\n,,\nKIA,Tacoma,100\n\n";
        let (records, report) = load_vehicles_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(report.rows_read, 3);
        assert_eq!(records[1], VehicleRecord::default());

        let o = crate::aggregate::overview(&records);
        assert_eq!(o.total, 3);
        assert!((o.average_range - 400.0 / 3.0).abs() < 1e-9);
        let cities = crate::aggregate::top_cities(&records);
        assert!(cities
            .iter()
            .any(|p| p.category == crate::aggregate::UNKNOWN_CITY && p.count == 1));
        let makers = crate::aggregate::top_makers(&records);
        assert!(makers.iter().any(|p| p.category.is_empty() && p.count == 1));
    }

    #[test]
    fn missing_columns_become_empty_fields() {
        let csv = "Make,Mystery Column\nFORD,x\nKIA\n";
        let (rows, _) = read_rows_from_reader(csv.as_bytes(), canonical_field).unwrap();
        assert_eq!(rows[0]["mysterycolumn"], "x");
        assert!(!rows[1].contains_key("mysterycolumn"));

        let records = normalize(&rows);
        assert_eq!(records[1].make, "KIA");
        assert_eq!(records[1].electric_range, "");
    }

    #[test]
    fn header_only_file_is_an_empty_dataset() {
        let (records, _) = load_vehicles_from_reader("Make,Model\n".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn empty_input_fails() {
        let err = load_vehicles_from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader));
    }

    #[test]
    fn malformed_utf8_fails_without_partial_rows() {
        let mut bytes = b"Make,City\nTESLA,Seattle\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b',', b'x', b'\n']);
        let result = load_vehicles_from_reader(bytes.as_slice());
        assert!(matches!(result, Err(LoadError::Csv(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_vehicles("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
        assert!(matches!(
            LoadState::from_result(Err(err)),
            LoadState::Failed(_)
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{}", SAMPLE).unwrap();
        let (records, _) = load_vehicles(tmp.path()).unwrap();
        assert_eq!(records.len(), 3);
        match LoadState::from_result(Ok(records)) {
            LoadState::Loaded(data) => assert_eq!(data[0].make, "TESLA"),
            other => panic!("unexpected state: {:?}", other),
        }
    }
}
