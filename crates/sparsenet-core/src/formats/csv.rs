//! CSV edge-list support.
//!
//! Headerless rows of `source,target` or `source,target,weight` with integer
//! node IDs. Lines starting with `#` are comments. Nodes are numbered in
//! order of first appearance.

use super::{LoadOptions, LoadTally, LoadedNetwork};
use crate::{Error, Network, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// CSV edge-list handler.
pub struct Csv;

impl Csv {
    /// Read a weighted edge list into a network.
    ///
    /// The vertex count is only known once every row is read, so edges are
    /// buffered before insertion.
    pub fn read<R: Read>(reader: R, options: LoadOptions) -> Result<LoadedNetwork> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut tally = LoadTally::default();
        let mut id_index: HashMap<i64, usize> = HashMap::new();
        let mut node_ids: Vec<i64> = Vec::new();
        let mut edges: Vec<(usize, usize, f64)> = Vec::new();

        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }
            if record.len() < 2 || record.len() > 3 {
                return Err(Error::parse(
                    line,
                    format!("expected 2 or 3 columns, found {}", record.len()),
                ));
            }

            let mut endpoint = |field: &str| -> Result<usize> {
                let id: i64 = field
                    .parse()
                    .map_err(|_| Error::parse(line, format!("invalid node id '{field}'")))?;
                if id < 0 {
                    return Err(Error::parse(
                        line,
                        format!("node numbers can not be negative, got {id}"),
                    ));
                }
                Ok(*id_index.entry(id).or_insert_with(|| {
                    node_ids.push(id);
                    tally.node(id);
                    node_ids.len() - 1
                }))
            };
            let u = endpoint(&record[0])?;
            let v = endpoint(&record[1])?;

            let weight: f64 = match record.get(2) {
                Some(raw) if !raw.is_empty() => raw
                    .parse()
                    .map_err(|_| Error::parse(line, format!("invalid weight '{raw}'")))?,
                _ => 1.0,
            };
            edges.push((u, v, weight));
        }

        let mut network = Network::new(node_ids.len(), options.config(None));
        for (u, v, weight) in edges {
            let inserted = network.insert_edge(u, v, weight)?;
            tally.edge(inserted);
        }

        Ok(tally.finish(network, node_ids))
    }

    /// Parse from string.
    pub fn from_str(s: &str, options: LoadOptions) -> Result<LoadedNetwork> {
        Self::read(s.as_bytes(), options)
    }

    /// Load from a CSV file.
    pub fn read_file(path: impl AsRef<Path>, options: LoadOptions) -> Result<LoadedNetwork> {
        Self::read(File::open(path)?, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::components::extract_components;

    #[test]
    fn test_read_edge_list() {
        let input = "# genotype pairs\n10,20,0.5\n20,30\n20,10,0.8\n40,50,1.5\n";
        let loaded = Csv::from_str(input, LoadOptions::default()).unwrap();

        assert_eq!(loaded.node_ids, vec![10, 20, 30, 40, 50]);
        assert_eq!(loaded.stats.distinct_edges, 3);
        assert_eq!(loaded.stats.duplicate_edges, 1);
        assert_eq!(loaded.stats.min_id, Some(10));
        assert_eq!(loaded.network.edge(0, 1).unwrap().weight, 0.8);

        let comps = extract_components(&loaded.network).unwrap();
        assert_eq!(comps.len(), 2);
    }

    #[test]
    fn test_directed_option() {
        let input = "1,2\n2,1\n";
        let loaded = Csv::from_str(
            input,
            LoadOptions {
                directed: Some(true),
            },
        )
        .unwrap();

        assert!(loaded.network.is_directed());
        assert_eq!(loaded.stats.distinct_edges, 2);
    }

    #[test]
    fn test_bad_rows() {
        assert!(matches!(
            Csv::from_str("1\n", LoadOptions::default()),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            Csv::from_str("1,x\n", LoadOptions::default()),
            Err(Error::Parse { .. })
        ));
        assert!(matches!(
            Csv::from_str("1,2,heavy\n", LoadOptions::default()),
            Err(Error::Parse { .. })
        ));
    }
}
