use super::types::{OptionalColumn, RequiredColumn};
use crate::error::{DrawbiasError, Result};
use crate::types::UNIVERSE_SIZE;
use polars::prelude::*;
use std::collections::HashMap;

pub struct DrawValidator;

impl DrawValidator {
    /// Validate that the DataFrame has an id column and fifteen numeric ball columns
    pub fn validate_draw_columns(df: &DataFrame) -> Result<HashMap<RequiredColumn, String>> {
        let mut column_map = HashMap::new();

        for required in RequiredColumn::all() {
            match Self::find_column(df, &required.aliases()) {
                Some(col_name) => {
                    column_map.insert(required, col_name);
                }
                None => {
                    return Err(DrawbiasError::DataLoading(format!(
                        "Missing required column: {} (tried aliases: {:?})",
                        required.as_str(),
                        required.aliases()
                    )));
                }
            }
        }

        // Validate column types are numeric
        for (req_col, actual_name) in &column_map {
            let series = df.column(actual_name)?;
            if !series.dtype().is_integer() && !series.dtype().is_float() {
                return Err(DrawbiasError::DataLoading(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    actual_name,
                    req_col.as_str(),
                    series.dtype()
                )));
            }
        }

        Self::validate_ball_ranges(df, &column_map)?;

        Ok(column_map)
    }

    /// Optional columns present in the frame
    pub fn find_optional(df: &DataFrame, column: OptionalColumn) -> Option<String> {
        Self::find_column(df, &column.aliases())
    }

    fn find_column(df: &DataFrame, aliases: &[String]) -> Option<String> {
        let columns = df.get_column_names();
        aliases
            .iter()
            .find(|alias| columns.iter().any(|col| col.as_str() == alias.as_str()))
            .cloned()
    }

    /// Every ball must be present and within 1..=25
    fn validate_ball_ranges(df: &DataFrame, column_map: &HashMap<RequiredColumn, String>) -> Result<()> {
        for (required, name) in column_map {
            if !matches!(required, RequiredColumn::Ball(_)) {
                continue;
            }
            let balls = df.column(name)?.cast(&DataType::Int64)?;
            let balls = balls.i64()?;

            for i in 0..df.height() {
                match balls.get(i) {
                    Some(n) if (1..=i64::from(UNIVERSE_SIZE)).contains(&n) => {}
                    Some(n) => {
                        return Err(DrawbiasError::DataLoading(format!(
                            "Invalid data at row {}: {} = {} outside 1..={}",
                            i, name, n, UNIVERSE_SIZE
                        )));
                    }
                    None => {
                        return Err(DrawbiasError::DataLoading(format!(
                            "Invalid data at row {}: {} is empty",
                            i, name
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(DrawbiasError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Check for null values in any column
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}
