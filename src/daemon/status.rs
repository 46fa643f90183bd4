//! Status table: one pipe-delimited, left-padded row per control iteration.

use std::time::Duration;

use crate::hardware::types::TemperatureReading;

const LEFT_PAD: usize = 2;
const NOT_AVAILABLE: &str = "na";

struct Column {
    heading: String,
    width: usize,
    value: String,
}

/// Everything printed for one iteration.
pub struct StatusRow<'a> {
    pub timestamp: String,
    pub temps: &'a TemperatureReading,
    pub fan_percent: Option<i32>,
    pub cpu_utilization: Option<i32>,
    pub runtime: Duration,
}

impl<'a> StatusRow<'a> {
    pub fn now(
        temps: &'a TemperatureReading,
        fan_percent: Option<i32>,
        cpu_utilization: Option<i32>,
        runtime: Duration,
    ) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            temps,
            fan_percent,
            cpu_utilization,
            runtime,
        }
    }

    fn columns(&self) -> Vec<Column> {
        let mut columns = vec![Column {
            heading: "Datetime".to_string(),
            width: 21,
            value: self.timestamp.clone(),
        }];

        columns.extend(self.temps.iter().map(|(name, degrees)| Column {
            heading: title_case(name),
            width: name.len() + 2,
            value: degrees.to_string(),
        }));

        let percent = |v: Option<i32>| match v {
            Some(v) => format!("{}%", v),
            None => format!("{}%", NOT_AVAILABLE),
        };
        columns.push(Column {
            heading: "Fan Speed".to_string(),
            width: 10,
            value: percent(self.fan_percent),
        });
        columns.push(Column {
            heading: "CPU Util".to_string(),
            width: 10,
            value: percent(self.cpu_utilization),
        });
        columns.push(Column {
            heading: "Loop Runtime".to_string(),
            width: 14,
            value: format!("{} ms", self.runtime.as_millis()),
        });
        columns
    }

    pub fn header(&self) -> String {
        self.columns()
            .iter()
            .map(|c| pad_cell(&c.heading, c.width))
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn separator(&self) -> String {
        self.columns()
            .iter()
            .map(|c| "-".repeat(c.width + LEFT_PAD))
            .collect::<Vec<_>>()
            .join("-")
    }

    pub fn row(&self) -> String {
        self.columns()
            .iter()
            .map(|c| pad_cell(&c.value, c.width))
            .collect::<Vec<_>>()
            .join("|")
    }
}

fn pad_cell(text: &str, width: usize) -> String {
    format!("{}{:<width$}", " ".repeat(LEFT_PAD), text, width = width)
}

/// "cpu1" -> "Cpu1", "inlet air" -> "Inlet Air"
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for ch in name.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(temps: &TemperatureReading) -> StatusRow<'_> {
        StatusRow {
            timestamp: "2026-10-16 12:00:00".to_string(),
            temps,
            fan_percent: Some(30),
            cpu_utilization: None,
            runtime: Duration::from_millis(412),
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("cpu1"), "Cpu1");
        assert_eq!(title_case("inlet"), "Inlet");
        assert_eq!(title_case("inlet air"), "Inlet Air");
    }

    #[test]
    fn test_row_layout() {
        let temps: TemperatureReading = [("inlet", 23), ("cpu1", 50)].into_iter().collect();
        let status = row(&temps);
        assert_eq!(
            status.row(),
            "  2026-10-16 12:00:00  |  23     |  50    |  30%       |  na%       |  412 ms        "
        );
    }

    #[test]
    fn test_header_matches_row_widths() {
        let temps: TemperatureReading = [("inlet", 23), ("cpu1", 50), ("cpu2", 55)].into_iter().collect();
        let status = row(&temps);
        let header = status.header();
        let data = status.row();

        assert!(header.starts_with("  Datetime"));
        assert!(header.contains("|  Cpu2  |"));
        assert_eq!(header.len(), data.len());
        assert_eq!(status.separator().len(), data.len());

        let header_cells: Vec<usize> = header.split('|').map(str::len).collect();
        let row_cells: Vec<usize> = data.split('|').map(str::len).collect();
        assert_eq!(header_cells, row_cells);
    }

    #[test]
    fn test_startup_row_without_fan_speed() {
        let temps = TemperatureReading::new();
        let status = StatusRow {
            fan_percent: None,
            ..row(&temps)
        };
        assert!(status.row().contains("|  na%       |  na%       |"));
    }
}
