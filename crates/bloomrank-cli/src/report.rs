//! Report rendering for sweep results.
//!
//! Records from every source are averaged per cell, then laid out as one
//! markdown table per rounds value: element counts as rows, term lengths as
//! columns.

use bloomrank_core::experiment::rounded_mean;
use bloomrank_core::{ExperimentConfig, ResultRecord};
use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::Table;
use std::fmt::Write as _;

/// Averaged distances for one rounds value.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundsSection {
    pub rounds: u8,
    pub term_lengths: Vec<usize>,
    /// `(element_count, averaged distance per term length)`.
    pub rows: Vec<(usize, Vec<u32>)>,
}

impl RoundsSection {
    /// Mean of every cell, missing cells counted as 0.
    pub fn overall_average(&self) -> f64 {
        let cells: Vec<u32> = self
            .rows
            .iter()
            .flat_map(|(_, values)| values.iter().copied())
            .collect();
        if cells.is_empty() {
            return 0.0;
        }
        f64::from(cells.iter().sum::<u32>()) / cells.len() as f64
    }
}

/// Aggregates records across sources, in config grid order.
///
/// A cell without any record reports 0.
pub fn summarize(records: &[ResultRecord], config: &ExperimentConfig) -> Vec<RoundsSection> {
    let sweep = &config.experiment;

    sweep
        .rounds
        .iter()
        .map(|&rounds| {
            let rows = sweep
                .element_counts
                .iter()
                .map(|&element_count| {
                    let values = sweep
                        .term_lengths
                        .iter()
                        .map(|&term_length| {
                            let per_source: Vec<u32> = records
                                .iter()
                                .filter(|r| {
                                    r.rounds == rounds
                                        && r.element_count == element_count
                                        && r.term_length == term_length
                                })
                                .map(|r| r.average_distance)
                                .collect();
                            rounded_mean(&per_source)
                        })
                        .collect();
                    (element_count, values)
                })
                .collect();

            RoundsSection {
                rounds,
                term_lengths: sweep.term_lengths.clone(),
                rows,
            }
        })
        .collect()
}

/// Renders sections as markdown.
pub fn render_markdown(sections: &[RoundsSection]) -> String {
    let mut out = String::new();

    for section in sections {
        let _ = writeln!(out, "## k = {}\n", section.rounds);

        let mut table = Table::new();
        table.load_preset(ASCII_MARKDOWN);

        let mut header = vec!["Num Elements".to_string()];
        header.extend(section.term_lengths.iter().map(ToString::to_string));
        table.set_header(header);

        for (element_count, values) in &section.rows {
            let mut row = vec![element_count.to_string()];
            row.extend(values.iter().map(ToString::to_string));
            table.add_row(row);
        }

        let _ = writeln!(out, "{table}\n");
        let _ = writeln!(
            out,
            "Average distance for k={}: {:.2}\n",
            section.rounds,
            section.overall_average()
        );
        out.push_str("---\n\n");
    }

    out
}

/// Renders raw records as pretty JSON.
pub fn render_json(records: &[ResultRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, rounds: u8, n: usize, len: usize, d: u32) -> ResultRecord {
        ResultRecord {
            source: source.to_string(),
            rounds,
            element_count: n,
            term_length: len,
            average_distance: d,
        }
    }

    fn config() -> ExperimentConfig {
        let mut config = ExperimentConfig::default();
        config.experiment.rounds = vec![1, 2];
        config.experiment.element_counts = vec![34, 120];
        config.experiment.term_lengths = vec![3, 8];
        config
    }

    #[test]
    fn test_summarize_averages_sources() {
        let records = vec![
            record("a.txt", 1, 34, 3, 100),
            record("b.txt", 1, 34, 3, 201),
            record("a.txt", 1, 120, 8, 40),
        ];

        let sections = summarize(&records, &config());

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].rounds, 1);
        // (100 + 201) / 2 = 150.5 -> 151
        assert_eq!(sections[0].rows[0], (34, vec![151, 0]));
        assert_eq!(sections[0].rows[1], (120, vec![0, 40]));
        // k=2 has no records at all
        assert!(sections[1].rows.iter().all(|(_, v)| v.iter().all(|&d| d == 0)));
    }

    #[test]
    fn test_overall_average_counts_missing_cells() {
        let section = RoundsSection {
            rounds: 1,
            term_lengths: vec![3, 8],
            rows: vec![(34, vec![100, 0]), (120, vec![50, 50])],
        };

        assert!((section.overall_average() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_render_markdown_layout() {
        let records = vec![record("a.txt", 1, 34, 3, 250)];
        let mut cfg = config();
        cfg.experiment.rounds = vec![1];

        let md = render_markdown(&summarize(&records, &cfg));

        assert!(md.starts_with("## k = 1\n"));
        assert!(md.contains("Num Elements"));
        assert!(md.contains("| 34"));
        assert!(md.contains("250"));
        assert!(md.contains("Average distance for k=1: 62.50"));
        assert!(md.trim_end().ends_with("---"));
    }

    #[test]
    fn test_render_json_is_flat_list() {
        let records = vec![record("a.txt", 3, 400, 16, 12)];

        let json = render_json(&records).expect("json");
        let parsed: serde_json::Value = serde_json::from_str(&json).expect("parse");

        assert_eq!(parsed[0]["element_count"], 400);
        assert_eq!(parsed[0]["rounds"], 3);
    }
}
