//! Reading and writing the bot's data file: one JSON object mapping a user id
//! to an array of 31 nullable hour values, in participation order.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::models::SleepRecord;

pub fn parse_bot_data(content: &str) -> Result<Vec<(String, SleepRecord)>> {
    let map: Map<String, Value> = serde_json::from_str(content).context("Parsing sleep data")?;
    map.into_iter()
        .map(|(user_id, nights)| -> Result<(String, SleepRecord)> {
            let nights: Vec<Option<f64>> = serde_json::from_value(nights)
                .with_context(|| format!("Reading nights of user {}", user_id))?;
            let record = SleepRecord::from_nights(&nights)
                .with_context(|| format!("Validating nights of user {}", user_id))?;
            Ok((user_id, record))
        })
        .collect()
}

pub fn render_bot_data(records: &[(String, SleepRecord)]) -> Result<String> {
    let mut map = Map::new();
    for (user_id, record) in records {
        map.insert(user_id.clone(), serde_json::to_value(record)?);
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    Value::Object(map)
        .serialize(&mut ser)
        .context("Serializing sleep data")?;
    String::from_utf8(buf).context("Sleep data is not UTF-8")
}

pub fn read_bot_data(path: &Path) -> Result<Vec<(String, SleepRecord)>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Reading {:?}", path))?;
    parse_bot_data(&content)
}

pub fn write_bot_data(path: &Path, records: &[(String, SleepRecord)]) -> Result<()> {
    let content = render_bot_data(records)?;
    std::fs::write(path, content).with_context(|| format!("Writing {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_user_order_from_file() {
        let data = r#"{ "30": [8.0, null], "10": [null, 6.5], "20": [] }"#;
        let records = parse_bot_data(data).unwrap();
        let ids: Vec<&str> = records.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["30", "10", "20"]);
        assert_eq!(records[0].1.nights()[0], Some(8.0));
        assert_eq!(records[1].1.nights()[1], Some(6.5));
        assert!(records[2].1.is_empty());
    }

    #[test]
    fn rejects_impossible_hours() {
        let data = r#"{ "1": [30.0] }"#;
        assert!(parse_bot_data(data).is_err());
    }

    #[test]
    fn written_file_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sleeptober-bot_data.json");

        let mut record = SleepRecord::new();
        record.set(3, 7.25).unwrap();
        let records = vec![("b".to_string(), record), ("a".to_string(), SleepRecord::new())];

        write_bot_data(&path, &records).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"b\": ["));

        let back = read_bot_data(&path).unwrap();
        assert_eq!(back, records);
    }
}
