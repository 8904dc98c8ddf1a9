//! Prints explorations for humans, or as JSON.

use std::io::{self, Write};

use serde_derive::Serialize;

use crate::{builder::Comparison, sink::NodeData, strategy::Exploration};

/// Writes the header, the explored count and the elapsed time of `exploration`, followed by every
/// node if `verbose`.
pub fn write_exploration<W: Write>(
    out: &mut W,
    exploration: &Exploration,
    verbose: bool,
) -> io::Result<()> {
    writeln!(out, "--- {} ---", exploration.strategy)?;
    writeln!(out, "Explored {} nodes.", exploration.explored())?;

    if verbose {
        writeln!(out, "Nodes:")?;
        for node in &exploration.nodes {
            writeln!(out, "\t- {} at distance {}", node.name, node.dist)?;
        }
    }

    writeln!(
        out,
        "Finished successfully in {} us.",
        exploration.elapsed_micros(),
    )
}

pub fn write_comparison<W: Write>(
    out: &mut W,
    comparison: &Comparison,
    verbose: bool,
) -> io::Result<()> {
    write_exploration(out, &comparison.sequential, verbose)?;
    writeln!(out)?;
    write_exploration(out, &comparison.parallel, verbose)?;

    if !comparison.agree() {
        writeln!(out)?;
        writeln!(out, "The two searches produced different results!")?;
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct ExplorationReport<'a> {
    strategy: &'a str,
    explored: usize,
    elapsed_us: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    nodes: Option<&'a [NodeData]>,
}

impl<'a> ExplorationReport<'a> {
    fn new(exploration: &'a Exploration, verbose: bool) -> Self {
        Self {
            strategy: &exploration.strategy,
            explored: exploration.explored(),
            elapsed_us: u64::try_from(exploration.elapsed_micros()).unwrap_or(u64::MAX),
            nodes: verbose.then_some(exploration.nodes.as_slice()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ComparisonReport<'a> {
    sequential: ExplorationReport<'a>,
    parallel: ExplorationReport<'a>,
    n_workers: usize,
    agree: bool,
}

/// Writes both explorations as one JSON document.
pub fn write_comparison_json<W: Write>(
    out: &mut W,
    comparison: &Comparison,
    n_workers: usize,
    verbose: bool,
) -> io::Result<()> {
    let report = ComparisonReport {
        sequential: ExplorationReport::new(&comparison.sequential, verbose),
        parallel: ExplorationReport::new(&comparison.parallel, verbose),
        n_workers,
        agree: comparison.agree(),
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn exploration(strategy: &str, nodes: &[(&str, usize)]) -> Exploration {
        Exploration {
            strategy: strategy.to_owned(),
            nodes: nodes
                .iter()
                .map(|&(name, dist)| NodeData::new(name, dist))
                .collect(),
            elapsed: Duration::from_micros(42),
        }
    }

    #[test]
    fn verbose_listing() {
        let mut out = Vec::new();
        let e = exploration("Sequential", &[("a", 0), ("b", 1)]);
        write_exploration(&mut out, &e, true).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "--- Sequential ---\n\
             Explored 2 nodes.\n\
             Nodes:\n\
             \t- a at distance 0\n\
             \t- b at distance 1\n\
             Finished successfully in 42 us.\n"
        );
    }

    #[test]
    fn disagreement_is_reported() {
        let comparison = Comparison {
            sequential: exploration("Sequential", &[("a", 0), ("b", 1)]),
            parallel: exploration("Parallel", &[("a", 0), ("b", 2)]),
        };

        let mut out = Vec::new();
        write_comparison(&mut out, &comparison, false).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("--- Parallel ---"));
        assert!(text.ends_with("The two searches produced different results!\n"));
    }

    #[test]
    fn json_report() {
        let comparison = Comparison {
            sequential: exploration("Sequential", &[("a", 0)]),
            parallel: exploration("Parallel", &[("a", 0)]),
        };

        let mut out = Vec::new();
        write_comparison_json(&mut out, &comparison, 4, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["agree"], true);
        assert_eq!(value["n_workers"], 4);
        assert_eq!(value["parallel"]["explored"], 1);
        assert_eq!(value["parallel"]["elapsed_us"], 42);
        assert_eq!(value["sequential"]["nodes"][0]["name"], "a");
    }

    #[test]
    fn json_report_omits_nodes_unless_verbose() {
        let comparison = Comparison {
            sequential: exploration("Sequential", &[("a", 0)]),
            parallel: exploration("Parallel", &[("a", 0)]),
        };

        let mut out = Vec::new();
        write_comparison_json(&mut out, &comparison, 1, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert!(value["sequential"].get("nodes").is_none());
    }
}
