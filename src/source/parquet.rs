//! File-based record source reading per-year DATASUS parquet extracts.
//!
//! Files follow the registry naming convention: `DO<region><year>.parquet`
//! for SIM-DO and `RD<region><year>.parquet` for SIH-RD, all under one
//! root directory. Columns are located by their registry names; an absent
//! column is reported through `ColumnPresence`, and a null or unparsable
//! value becomes `None` on the raw record (rejected downstream, never an
//! error here).

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{Result, StudyError};
use crate::models::raw::{ColumnPresence, MortalityRaw, MorbidityRaw, YearBatch};
use crate::source::RecordSource;

const COL_DEATH_DATE: &str = "DTOBITO";
const COL_ADMISSION_DATE: &str = "DT_INTER";
const COL_DISCHARGE_DATE: &str = "DT_SAIDA";
const COL_AGE: &str = "IDADE";
const COL_SEX: &str = "SEXO";
const COL_CAUSE: &str = "CAUSABAS";
const COL_DIAGNOSIS: &str = "DIAG_PRINC";
const COL_MUNICIPALITY: &str = "MUNRES";
const COL_STAY_DAYS: &str = "DIAS_PERM";
const COL_TOTAL_COST: &str = "VAL_TOT";

/// Record source reading local DATASUS parquet extracts
#[derive(Debug, Clone)]
pub struct ParquetSource {
    root: PathBuf,
}

impl ParquetSource {
    /// Create a source rooted at a directory of per-year extract files
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn year_file(&self, group: &str, region: &str, year: i32) -> PathBuf {
        self.root.join(format!("{group}{region}{year}.parquet"))
    }

    fn read_batches(&self, path: &Path) -> Result<Vec<RecordBatch>> {
        debug!("Reading parquet file {}", path.display());
        let file = File::open(path).map_err(|e| StudyError::io(path, e))?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| StudyError::parquet(path, e.to_string()))?;
        let reader = builder
            .build()
            .map_err(|e| StudyError::parquet(path, e.to_string()))?;

        reader
            .into_iter()
            .map(|batch| batch.map_err(|e| StudyError::parquet(path, e.to_string())))
            .collect()
    }
}

fn column_index(batch: &RecordBatch, name: &str) -> Option<usize> {
    batch.schema().index_of(name).ok()
}

fn string_at(batch: &RecordBatch, index: Option<usize>, row: usize) -> Option<String> {
    let column = batch.column(index?);
    if column.is_null(row) {
        return None;
    }

    let any = column.as_any();
    if let Some(array) = any.downcast_ref::<StringArray>() {
        Some(array.value(row).to_string())
    } else if let Some(array) = any.downcast_ref::<LargeStringArray>() {
        Some(array.value(row).to_string())
    } else if let Some(array) = any.downcast_ref::<Int64Array>() {
        Some(array.value(row).to_string())
    } else if let Some(array) = any.downcast_ref::<Int32Array>() {
        Some(array.value(row).to_string())
    } else {
        None
    }
}

fn i64_at(batch: &RecordBatch, index: Option<usize>, row: usize) -> Option<i64> {
    let column = batch.column(index?);
    if column.is_null(row) {
        return None;
    }

    let any = column.as_any();
    if let Some(array) = any.downcast_ref::<Int64Array>() {
        Some(array.value(row))
    } else if let Some(array) = any.downcast_ref::<Int32Array>() {
        Some(i64::from(array.value(row)))
    } else if let Some(array) = any.downcast_ref::<Float64Array>() {
        Some(array.value(row) as i64)
    } else if let Some(array) = any.downcast_ref::<StringArray>() {
        array.value(row).trim().parse().ok()
    } else if let Some(array) = any.downcast_ref::<LargeStringArray>() {
        array.value(row).trim().parse().ok()
    } else {
        None
    }
}

fn f64_at(batch: &RecordBatch, index: Option<usize>, row: usize) -> Option<f64> {
    let column = batch.column(index?);
    if column.is_null(row) {
        return None;
    }

    let any = column.as_any();
    if let Some(array) = any.downcast_ref::<Float64Array>() {
        Some(array.value(row))
    } else if let Some(array) = any.downcast_ref::<Float32Array>() {
        Some(f64::from(array.value(row)))
    } else if let Some(array) = any.downcast_ref::<Int64Array>() {
        Some(array.value(row) as f64)
    } else if let Some(array) = any.downcast_ref::<Int32Array>() {
        Some(f64::from(array.value(row)))
    } else if let Some(array) = any.downcast_ref::<StringArray>() {
        array.value(row).trim().parse().ok()
    } else if let Some(array) = any.downcast_ref::<LargeStringArray>() {
        array.value(row).trim().parse().ok()
    } else {
        None
    }
}

impl RecordSource for ParquetSource {
    fn name(&self) -> &'static str {
        "parquet"
    }

    fn mortality_year(&self, year: i32, region: &str) -> Result<YearBatch<MortalityRaw>> {
        let path = self.year_file("DO", region, year);
        let batches = self.read_batches(&path)?;

        let mut records = Vec::new();
        let mut columns = ColumnPresence::default();

        for batch in &batches {
            let date = column_index(batch, COL_DEATH_DATE);
            let age = column_index(batch, COL_AGE);
            let sex = column_index(batch, COL_SEX);
            let cause = column_index(batch, COL_CAUSE);
            let municipality = column_index(batch, COL_MUNICIPALITY);

            columns.age = age.is_some();
            columns.diagnosis = cause.is_some();
            columns.sex = sex.is_some();

            for row in 0..batch.num_rows() {
                records.push(MortalityRaw {
                    death_date: string_at(batch, date, row),
                    age_days: i64_at(batch, age, row),
                    sex_code: string_at(batch, sex, row),
                    cause_code: string_at(batch, cause, row),
                    municipality: string_at(batch, municipality, row),
                    year,
                });
            }
        }

        Ok(YearBatch {
            year,
            records,
            columns,
        })
    }

    fn morbidity_year(&self, year: i32, region: &str) -> Result<YearBatch<MorbidityRaw>> {
        let path = self.year_file("RD", region, year);
        let batches = self.read_batches(&path)?;

        let mut records = Vec::new();
        let mut columns = ColumnPresence::default();

        for batch in &batches {
            let admission = column_index(batch, COL_ADMISSION_DATE);
            let discharge = column_index(batch, COL_DISCHARGE_DATE);
            let age = column_index(batch, COL_AGE);
            let sex = column_index(batch, COL_SEX);
            let diagnosis = column_index(batch, COL_DIAGNOSIS);
            let municipality = column_index(batch, COL_MUNICIPALITY);
            let stay = column_index(batch, COL_STAY_DAYS);
            let cost = column_index(batch, COL_TOTAL_COST);

            columns.age = age.is_some();
            columns.diagnosis = diagnosis.is_some();
            columns.sex = sex.is_some();
            columns.length_of_stay = stay.is_some();
            columns.cost = cost.is_some();

            for row in 0..batch.num_rows() {
                records.push(MorbidityRaw {
                    admission_date: string_at(batch, admission, row),
                    discharge_date: string_at(batch, discharge, row),
                    age_years: i64_at(batch, age, row),
                    sex_code: string_at(batch, sex, row),
                    principal_diagnosis: string_at(batch, diagnosis, row),
                    municipality: string_at(batch, municipality, row),
                    stay_days: i64_at(batch, stay, row),
                    total_cost: f64_at(batch, cost, row),
                    year,
                });
            }
        }

        Ok(YearBatch {
            year,
            records,
            columns,
        })
    }
}
