use super::{
    types::{DatasetMetadata, OptionalColumn, RequiredColumn},
    validator::DrawValidator,
};
use crate::engines::evaluation::payout::MIN_PRIZE_TIER;
use crate::error::{DrawbiasError, Result};
use crate::types::{Draw, History, PrizeTier, DRAW_SIZE};
use log::{info, warn};
use polars::prelude::*;
use std::path::Path;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| DrawbiasError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load, validate and convert every row into a `Draw`.
    pub fn load_draws<P: AsRef<Path>>(path: P) -> Result<Vec<Draw>> {
        let df = Self::load(&path)?;

        let null_report = DrawValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            warn!("Null values detected: {:?}", null_report);
        }

        let draws = Self::frame_to_draws(&df)?;
        info!("Loaded {} draws from {}", draws.len(), path.as_ref().display());
        Ok(draws)
    }

    /// Draws as a newest-first history
    pub fn load_history<P: AsRef<Path>>(path: P) -> Result<History> {
        Ok(History::from_draws(Self::load_draws(path)?))
    }

    pub fn frame_to_draws(df: &DataFrame) -> Result<Vec<Draw>> {
        let column_map = DrawValidator::validate_draw_columns(df)?;
        let column = |required: RequiredColumn| -> Result<Column> {
            let name = column_map.get(&required).ok_or_else(|| {
                DrawbiasError::DataLoading(format!("Missing required column: {}", required.as_str()))
            })?;
            Ok(df.column(name)?.cast(&DataType::Int64)?)
        };

        let ids = column(RequiredColumn::Id)?;
        let ids = ids.i64()?;
        let balls: Vec<Column> = (1..=DRAW_SIZE as u8)
            .map(|i| column(RequiredColumn::Ball(i)))
            .collect::<Result<_>>()?;
        let balls: Vec<&Int64Chunked> = balls.iter().map(|c| c.i64()).collect::<PolarsResult<_>>()?;

        let dates = match DrawValidator::find_optional(df, OptionalColumn::Date) {
            Some(name) => Some(df.column(&name)?.cast(&DataType::String)?),
            None => None,
        };
        let dates = dates.as_ref().map(|c| c.str()).transpose()?;

        let tiers = Self::tier_columns(df)?;

        let mut draws = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let id = ids
                .get(row)
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| DrawbiasError::DataLoading(format!("Invalid data at row {}: bad draw id", row)))?;

            let numbers: Vec<u8> = balls
                .iter()
                .filter_map(|b| b.get(row).and_then(|v| u8::try_from(v).ok()))
                .collect();

            let date = dates.and_then(|d| d.get(row)).unwrap_or_default().to_string();

            let prize_tiers = tiers
                .iter()
                .filter_map(|(tier, winners, prize)| {
                    let amount = prize.get(row)?;
                    let winners = winners.as_ref().and_then(|w| w.get(row)).unwrap_or(0);
                    Some(PrizeTier {
                        tier: *tier,
                        winners: u32::try_from(winners).unwrap_or(0),
                        amount,
                    })
                })
                .collect();

            draws.push(Draw::new(id, &numbers, date, prize_tiers).map_err(|e| {
                DrawbiasError::DataLoading(format!("Invalid data at row {}: {}", row, e))
            })?);
        }

        Ok(draws)
    }

    /// `(tier, winners, prize)` for each tier that has a prize column
    fn tier_columns(df: &DataFrame) -> Result<Vec<(u8, Option<Int64Chunked>, Float64Chunked)>> {
        let mut tiers = Vec::new();
        for tier in MIN_PRIZE_TIER..=DRAW_SIZE as u8 {
            let Some(prize_name) = DrawValidator::find_optional(df, OptionalColumn::Prize(tier)) else {
                continue;
            };
            let prize = df.column(&prize_name)?.cast(&DataType::Float64)?.f64()?.clone();
            let winners = match DrawValidator::find_optional(df, OptionalColumn::Winners(tier)) {
                Some(name) => Some(df.column(&name)?.cast(&DataType::Int64)?.i64()?.clone()),
                None => None,
            };
            tiers.push((tier, winners, prize));
        }
        Ok(tiers)
    }

    /// Summary of a loaded file
    pub fn create_metadata<P: AsRef<Path>>(path: P, df: &DataFrame, draws: &[Draw]) -> DatasetMetadata {
        let columns: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();

        let id_range = draws
            .iter()
            .map(|d| d.id())
            .min()
            .zip(draws.iter().map(|d| d.id()).max());
        let dates: Vec<_> = draws.iter().filter_map(|d| d.parsed_date()).collect();
        let date_range = dates.iter().min().copied().zip(dates.iter().max().copied());

        DatasetMetadata {
            file_path: path.as_ref().to_string_lossy().to_string(),
            num_rows: df.height(),
            num_columns: df.width(),
            columns,
            id_range,
            date_range,
            has_prize_tiers: draws.iter().any(|d| !d.prize_tiers().is_empty()),
        }
    }
}
