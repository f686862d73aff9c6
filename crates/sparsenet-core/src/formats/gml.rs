//! GML (graph markup) format.
//!
//! Reads the dialect the genotype-network tools emit:
//!
//! ```text
//! Graph with 3 nodes.
//! graph
//! [
//!     node [ id 1 ]
//!     node [ id 2 ]
//!     node [ id 3 ]
//!     edge [ source 1 target 2 weight 0.75 ]
//! ]
//! ```
//!
//! Anything before the `graph` keyword is ignored. Unknown keys are skipped,
//! including nested lists. Node declarations must precede the first edge so
//! edges can be inserted as they are read.

use super::{LoadOptions, LoadTally, LoadedNetwork};
use crate::algo::components::{Component, ComponentSink};
use crate::{Error, Network, Result};
use std::collections::{HashMap, VecDeque};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// GML format handler.
pub struct Gml;

impl Gml {
    /// Parse a GML graph from a reader into a network.
    pub fn read<R: Read>(reader: R, options: LoadOptions) -> Result<LoadedNetwork> {
        let parser = Parser {
            lexer: Lexer::new(BufReader::new(reader)),
            options,
            declared_directed: None,
            id_index: HashMap::new(),
            node_ids: Vec::new(),
            network: None,
            tally: LoadTally::default(),
        };
        parser.parse()
    }

    /// Parse from string.
    pub fn from_str(s: &str, options: LoadOptions) -> Result<LoadedNetwork> {
        Self::read(s.as_bytes(), options)
    }

    /// Load from a GML file.
    pub fn read_file(path: impl AsRef<Path>, options: LoadOptions) -> Result<LoadedNetwork> {
        Self::read(File::open(path)?, options)
    }

    /// Write one component as a standalone GML graph, using external IDs.
    pub fn write_component<W: Write>(
        network: &Network,
        component: &Component,
        node_ids: &[i64],
        mut writer: W,
    ) -> Result<()> {
        let external = |v: usize| node_ids.get(v).copied().unwrap_or(v as i64);

        writeln!(writer, "Graph with {} nodes.", component.len())?;
        writeln!(writer, "graph\n[")?;
        if network.is_directed() {
            writeln!(writer, "\tdirected 1")?;
        }
        for &v in &component.vertices {
            writeln!(writer, "\tnode\n\t[\n\tid {}\n\t]", external(v))?;
        }
        for edge in &component.edges {
            writeln!(
                writer,
                "\tedge\n\t[\n\tsource {}\n\ttarget {}\n\tweight {:.6}\n\t]",
                external(edge.source),
                external(edge.target),
                edge.weight
            )?;
        }
        writeln!(writer, "]")?;
        Ok(())
    }

    /// Render one component to a string.
    pub fn component_to_string(
        network: &Network,
        component: &Component,
        node_ids: &[i64],
    ) -> Result<String> {
        let mut buf = Vec::new();
        Self::write_component(network, component, node_ids, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).to_string())
    }
}

/// Writes each component to `compK.gml` in a directory.
#[derive(Debug)]
pub struct GmlComponentWriter {
    dir: PathBuf,
    node_ids: Vec<i64>,
    written: Vec<PathBuf>,
}

impl GmlComponentWriter {
    /// Prepare a writer for `dir`. The directory is created on the first
    /// write, so a writer that is never used leaves the filesystem untouched.
    ///
    /// Fails with [`Error::OutputExists`] if `comp1.gml` is already there, so
    /// a previous run's files are never mixed with new ones. Vertices are
    /// written by dense index until [`with_node_ids`](Self::with_node_ids)
    /// supplies external IDs.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let first = Self::component_path(&dir, 1);
        if first.exists() {
            return Err(Error::OutputExists(first));
        }

        Ok(Self {
            dir,
            node_ids: Vec::new(),
            written: Vec::new(),
        })
    }

    /// Translate dense indices to these external IDs on output.
    pub fn with_node_ids(mut self, node_ids: Vec<i64>) -> Self {
        self.node_ids = node_ids;
        self
    }

    /// Path of the file for component `id`.
    pub fn component_path(dir: &Path, id: usize) -> PathBuf {
        dir.join(format!("comp{id}.gml"))
    }

    /// Files written so far, in component order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ComponentSink for GmlComponentWriter {
    fn write_component(&mut self, network: &Network, component: &Component) -> Result<()> {
        if self.written.is_empty() {
            fs::create_dir_all(&self.dir)?;
        }
        let path = Self::component_path(&self.dir, component.id);
        let mut writer = BufWriter::new(File::create(&path)?);
        Gml::write_component(network, component, &self.node_ids, &mut writer)?;
        writer.flush()?;

        debug!(path = %path.display(), "wrote component");
        self.written.push(path);
        Ok(())
    }
}

/// Whitespace tokenizer that splits out brackets and keeps quoted strings whole.
struct Lexer<R> {
    reader: R,
    line: usize,
    pending: VecDeque<String>,
    /// Partial token, carried across lines while inside a quoted string.
    current: String,
    in_string: bool,
}

impl<R: BufRead> Lexer<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            pending: VecDeque::new(),
            current: String::new(),
            in_string: false,
        }
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut buf = String::new();
            if self.reader.read_line(&mut buf)? == 0 {
                // Unterminated string at EOF
                if self.current.is_empty() {
                    return Ok(None);
                }
                self.in_string = false;
                return Ok(Some(std::mem::take(&mut self.current)));
            }
            self.line += 1;
            self.split_line(&buf);
        }
        Ok(self.pending.pop_front())
    }

    fn split_line(&mut self, line: &str) {
        for c in line.chars() {
            if self.in_string {
                self.current.push(c);
                if c == '"' {
                    self.in_string = false;
                }
                continue;
            }
            match c {
                '"' => {
                    self.current.push(c);
                    self.in_string = true;
                }
                '[' | ']' => {
                    self.flush_token();
                    self.pending.push_back(c.to_string());
                }
                c if c.is_whitespace() => self.flush_token(),
                c => self.current.push(c),
            }
        }
        if !self.in_string {
            self.flush_token();
        }
    }

    fn flush_token(&mut self) {
        if !self.current.is_empty() {
            self.pending.push_back(std::mem::take(&mut self.current));
        }
    }
}

struct Parser<R> {
    lexer: Lexer<R>,
    options: LoadOptions,
    declared_directed: Option<bool>,
    id_index: HashMap<i64, usize>,
    node_ids: Vec<i64>,
    /// Created when the first edge (or the end of the graph) is reached.
    network: Option<Network>,
    tally: LoadTally,
}

impl<R: BufRead> Parser<R> {
    fn parse(mut self) -> Result<LoadedNetwork> {
        self.skip_to_graph()?;
        self.expect_open("graph")?;

        loop {
            let Some(token) = self.lexer.next_token()? else {
                warn!("graph list not closed before end of input");
                break;
            };
            match token.as_str() {
                "]" => break,
                "node" => self.parse_node()?,
                "edge" => self.parse_edge()?,
                "directed" => self.parse_directed()?,
                _ => self.skip_value()?,
            }
        }

        let network = match self.network.take() {
            Some(network) => network,
            None => self.build_network(),
        };
        Ok(self.tally.finish(network, self.node_ids))
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::parse(self.lexer.line, message)
    }

    fn skip_to_graph(&mut self) -> Result<()> {
        while let Some(token) = self.lexer.next_token()? {
            if token == "graph" {
                return Ok(());
            }
        }
        Err(self.err("no graph to read in input"))
    }

    fn expect_open(&mut self, after: &str) -> Result<()> {
        match self.lexer.next_token()? {
            Some(t) if t == "[" => Ok(()),
            _ => Err(self.err(format!("expected '[' after '{after}'"))),
        }
    }

    fn value(&mut self, key: &str) -> Result<String> {
        match self.lexer.next_token()? {
            Some(t) if t != "[" && t != "]" => Ok(t),
            _ => Err(self.err(format!("missing value for '{key}'"))),
        }
    }

    fn int_value(&mut self, key: &str) -> Result<i64> {
        let raw = self.value(key)?;
        raw.parse()
            .map_err(|_| self.err(format!("'{key}' expects an integer, got '{raw}'")))
    }

    /// Skip the value after an unrecognised key: a scalar or a nested list.
    fn skip_value(&mut self) -> Result<()> {
        match self.lexer.next_token()? {
            Some(t) if t == "[" => self.skip_list(),
            Some(t) if t == "]" => Err(self.err("key without a value")),
            Some(_) => Ok(()),
            None => Err(self.err("unexpected end of input")),
        }
    }

    /// Skip to the `]` matching an already consumed `[`.
    fn skip_list(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.lexer.next_token()?.as_deref() {
                Some("[") => depth += 1,
                Some("]") => depth -= 1,
                Some(_) => {}
                None => return Err(self.err("unterminated list")),
            }
        }
        Ok(())
    }

    fn parse_directed(&mut self) -> Result<()> {
        if self.network.is_some() {
            return Err(self.err("'directed' must come before the first edge"));
        }
        self.declared_directed = Some(self.int_value("directed")? != 0);
        Ok(())
    }

    fn parse_node(&mut self) -> Result<()> {
        self.expect_open("node")?;
        if self.network.is_some() {
            return Err(self.err("node declared after the first edge"));
        }

        let mut id = None;
        loop {
            let Some(token) = self.lexer.next_token()? else {
                return Err(self.err("unterminated node"));
            };
            match token.as_str() {
                "]" => break,
                "id" => id = Some(self.int_value("id")?),
                _ => self.skip_value()?,
            }
        }

        let id = id.ok_or_else(|| self.err("node without id"))?;
        if id < 0 {
            return Err(self.err(format!("node numbers can not be negative, got {id}")));
        }
        if self.id_index.insert(id, self.node_ids.len()).is_some() {
            return Err(Error::DuplicateNode(id));
        }
        self.node_ids.push(id);
        self.tally.node(id);
        Ok(())
    }

    fn parse_edge(&mut self) -> Result<()> {
        self.expect_open("edge")?;

        let (mut source, mut target, mut weight) = (None, None, 1.0);
        loop {
            let Some(token) = self.lexer.next_token()? else {
                return Err(self.err("unterminated edge"));
            };
            match token.as_str() {
                "]" => break,
                "source" => source = Some(self.int_value("source")?),
                "target" => target = Some(self.int_value("target")?),
                "weight" => {
                    let raw = self.value("weight")?;
                    weight = raw
                        .parse()
                        .map_err(|_| self.err(format!("invalid weight '{raw}'")))?;
                }
                _ => self.skip_value()?,
            }
        }

        let source = source.ok_or_else(|| self.err("edge without source"))?;
        let target = target.ok_or_else(|| self.err("edge without target"))?;
        let u = *self
            .id_index
            .get(&source)
            .ok_or(Error::UnknownNode(source))?;
        let v = *self
            .id_index
            .get(&target)
            .ok_or(Error::UnknownNode(target))?;

        if self.network.is_none() {
            self.network = Some(self.build_network());
        }
        if let Some(network) = self.network.as_mut() {
            let inserted = network.insert_edge(u, v, weight)?;
            self.tally.edge(inserted);
        }
        Ok(())
    }

    fn build_network(&self) -> Network {
        let config = self.options.config(self.declared_directed);
        debug!(
            nodes = self.node_ids.len(),
            directed = config.directed,
            "node declarations complete"
        );
        Network::new(self.node_ids.len(), config)
    }
}
