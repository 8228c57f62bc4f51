use drawbias::data::{CsvConnector, HistoryProvider, InMemoryHistoryProvider};
use drawbias::types::DRAW_SIZE;
use std::fs;
use std::path::PathBuf;

/// Writes `contents` to a file unique to this test
fn write_csv(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("drawbias_{}_{}.csv", name, std::process::id()));
    fs::write(&path, contents).unwrap();
    path
}

fn header() -> String {
    let balls: Vec<String> = (1..=DRAW_SIZE).map(|i| format!("Bola{}", i)).collect();
    format!("Concurso,Data Sorteio,{},ganhadores_15,rateio_15,prize_11", balls.join(","))
}

const SAMPLE_ROWS: &str = "\
3,03/01/2024,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,2,1500000.5,7.0
1,01/01/2024,11,12,13,14,15,16,17,18,19,20,21,22,23,24,25,0,0.0,7.0
2,02/01/2024,1,3,5,7,9,11,13,15,17,19,21,23,25,2,4,1,1700000.0,7.0
";

#[test]
fn test_official_headers_are_recognised() {
    let path = write_csv("official", &format!("{}\n{}", header(), SAMPLE_ROWS));
    let history = CsvConnector::load_history(&path).unwrap();

    let ids: Vec<u32> = history.draws().iter().map(|d| d.id()).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    let latest = &history.draws()[0];
    assert_eq!(latest.numbers().to_vec(), (1..=15).collect::<Vec<u8>>());
    assert_eq!(latest.date(), "03/01/2024");
    assert_eq!(latest.prize_for_tier(15), Some(1_500_000.5));
    assert_eq!(latest.prize_for_tier(11), Some(7.0));
    assert_eq!(latest.prize_for_tier(13), None);

    let tier_15 = latest.prize_tiers().iter().find(|t| t.tier == 15).unwrap();
    assert_eq!(tier_15.winners, 2);

    fs::remove_file(path).ok();
}

#[test]
fn test_metadata_summarises_file() {
    let path = write_csv("metadata", &format!("{}\n{}", header(), SAMPLE_ROWS));
    let df = CsvConnector::load(&path).unwrap();
    let draws = CsvConnector::frame_to_draws(&df).unwrap();
    let metadata = CsvConnector::create_metadata(&path, &df, &draws);

    assert_eq!(metadata.num_rows, 3);
    assert_eq!(metadata.num_columns, 20);
    assert_eq!(metadata.id_range, Some((1, 3)));
    assert!(metadata.has_prize_tiers);
    let (first, last) = metadata.date_range.unwrap();
    assert_eq!(first.to_string(), "2024-01-01");
    assert_eq!(last.to_string(), "2024-01-03");

    fs::remove_file(path).ok();
}

#[test]
fn test_provider_searches_by_id() {
    let path = write_csv("provider", &format!("{}\n{}", header(), SAMPLE_ROWS));
    let provider = InMemoryHistoryProvider::from_csv(&path).unwrap();

    assert_eq!(provider.fetch(None).unwrap().map(|d| d.id()), Some(3));
    let second = provider.fetch(Some(2)).unwrap().unwrap();
    assert!(second.numbers().contains(25));
    assert!(provider.fetch(Some(9)).unwrap().is_none());
    assert_eq!(provider.fetch_history(5, Some(2)).unwrap().len(), 2);

    fs::remove_file(path).ok();
}

#[test]
fn test_out_of_range_ball_is_rejected() {
    let rows = "1,01/01/2024,1,2,3,4,5,6,7,8,9,10,11,12,13,14,26,0,0.0,7.0\n";
    let path = write_csv("out_of_range", &format!("{}\n{}", header(), rows));
    assert!(CsvConnector::load_draws(&path).is_err());
    fs::remove_file(path).ok();
}

#[test]
fn test_missing_ball_column_is_rejected() {
    let balls: Vec<String> = (1..DRAW_SIZE).map(|i| format!("n{}", i)).collect();
    let contents = format!("id,{}\n1,{}\n", balls.join(","), (1..DRAW_SIZE).map(|n| n.to_string()).collect::<Vec<_>>().join(","));
    let path = write_csv("missing_column", &contents);
    assert!(CsvConnector::load_draws(&path).is_err());
    fs::remove_file(path).ok();
}
