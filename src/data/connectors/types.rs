use crate::types::DRAW_SIZE;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Columns a draw file must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredColumn {
    Id,
    /// Drawn number by position, 1..=15
    Ball(u8),
}

impl RequiredColumn {
    pub fn as_str(&self) -> String {
        match self {
            Self::Id => "id".to_string(),
            Self::Ball(i) => format!("n{}", i),
        }
    }

    pub fn all() -> Vec<Self> {
        let mut columns = vec![Self::Id];
        columns.extend((1..=DRAW_SIZE as u8).map(Self::Ball));
        columns
    }

    /// Common alternative column names, including the official result sheet headers
    pub fn aliases(&self) -> Vec<String> {
        match self {
            Self::Id => ["id", "Id", "ID", "concurso", "Concurso", "CONCURSO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            Self::Ball(i) => vec![
                format!("n{}", i),
                format!("N{}", i),
                format!("bola{}", i),
                format!("Bola{}", i),
                format!("bola {}", i),
                format!("Bola {}", i),
            ],
        }
    }
}

/// Optional columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalColumn {
    Date,
    Winners(u8),
    Prize(u8),
}

impl OptionalColumn {
    pub fn aliases(&self) -> Vec<String> {
        match self {
            Self::Date => ["date", "Date", "data", "Data", "data sorteio", "Data Sorteio", "Data do Sorteio"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            Self::Winners(t) => vec![format!("winners_{}", t), format!("ganhadores_{}", t)],
            Self::Prize(t) => vec![format!("prize_{}", t), format!("rateio_{}", t)],
        }
    }
}

/// Metadata about a loaded draw file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub file_path: String,
    pub num_rows: usize,
    pub num_columns: usize,
    pub columns: Vec<String>,
    pub id_range: Option<(u32, u32)>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub has_prize_tiers: bool,
}
