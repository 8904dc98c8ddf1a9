//! Parses graphs written in the Graphviz DOT language.
//!
//! Only the structure of the graph is kept: attributes and ports are parsed and ignored, and quoted
//! names are stored without their quotes.

mod lexer;

use std::path::{Path, PathBuf};

use itertools::Itertools;

use thiserror::Error;

use crate::{
    dot::lexer::{Lexer, Token, TokenKind},
    graph::{Graph, GraphBuilder, NodeId},
};

#[derive(Debug, Error)]
pub enum DotError {
    #[error("Failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("No graph found")]
    NoGraph,
}

/// Parses the first graph in `src`.
pub fn parse(src: &str) -> Result<Graph, DotError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).graph()
}

/// Reads and parses the file at `path`.
pub fn read_dot_file(path: &Path) -> Result<Graph, DotError> {
    let src = std::fs::read_to_string(path).map_err(|source| DotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("parsing {path:?}");
    let graph = parse(&src)?;
    tracing::debug!(
        "parsed {path:?}: {} nodes, {} edges",
        graph.num_nodes(),
        graph.num_edges(),
    );

    Ok(graph)
}

/// Writes `graph` back out as DOT. Every name is quoted.
#[must_use]
pub fn to_dot(graph: &Graph) -> String {
    fn quote(name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\\\""))
    }

    let (keyword, edge_op) = if graph.is_directed() {
        ("digraph", "->")
    } else {
        ("graph", "--")
    };

    let header = match graph.name() {
        Some(name) => format!("{keyword} {} {{", quote(name)),
        None => format!("{keyword} {{"),
    };

    let nodes = graph
        .nodes()
        .map(|node| format!("    {};", quote(graph.node_name(node))));
    let edges = graph.edges().map(|(from, to)| {
        format!(
            "    {} {edge_op} {};",
            quote(graph.node_name(from)),
            quote(graph.node_name(to)),
        )
    });

    let mut out = std::iter::once(header)
        .chain(nodes)
        .chain(edges)
        .chain(std::iter::once("}".to_owned()))
        .join("\n");
    out.push('\n');
    out
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    directed: bool,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            directed: false,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|token| &token.kind)
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|token| token.is_keyword(keyword))
    }

    fn next(&mut self, expected: &str) -> Result<Token, DotError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| DotError::UnexpectedEof {
                expected: expected.to_owned(),
            })?;
        self.pos += 1;
        Ok(token)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<(), DotError> {
        let token = self.next(expected)?;
        if &token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(&token, expected))
        }
    }

    fn id(&mut self, expected: &str) -> Result<String, DotError> {
        let token = self.next(expected)?;
        match &token.kind {
            TokenKind::Id { text, .. } => Ok(text.clone()),
            _ => Err(unexpected(&token, expected)),
        }
    }

    fn graph(mut self) -> Result<Graph, DotError> {
        if self.tokens.is_empty() {
            return Err(DotError::NoGraph);
        }

        if self.peek_keyword("strict") {
            self.pos += 1;
        }

        let header = self.next("'graph' or 'digraph'")?;
        self.directed = if header.is_keyword("digraph") {
            true
        } else if header.is_keyword("graph") {
            false
        } else {
            return Err(unexpected(&header, "'graph' or 'digraph'"));
        };

        let mut builder = GraphBuilder::new(self.directed);
        if matches!(self.peek_kind(), Some(TokenKind::Id { .. })) {
            let name = self.id("a graph name")?;
            builder.set_name(&name);
        }

        self.expect(&TokenKind::LBrace, "'{'")?;
        self.stmt_list(&mut builder)?;
        self.expect(&TokenKind::RBrace, "'}'")?;

        if let Some(token) = self.peek() {
            tracing::warn!(
                "ignoring input after the first graph, starting at line {}",
                token.line,
            );
        }

        Ok(builder.build())
    }

    /// Parses statements up to the closing brace. Returns every node the statements mention.
    fn stmt_list(&mut self, builder: &mut GraphBuilder) -> Result<Vec<NodeId>, DotError> {
        let mut nodes = Vec::new();

        loop {
            match self.peek_kind() {
                None => {
                    return Err(DotError::UnexpectedEof {
                        expected: "'}'".to_owned(),
                    })
                }
                Some(TokenKind::RBrace) => return Ok(nodes),
                Some(_) => {
                    self.stmt(builder, &mut nodes)?;
                    self.eat(&TokenKind::Semicolon);
                }
            }
        }
    }

    fn stmt(
        &mut self,
        builder: &mut GraphBuilder,
        nodes: &mut Vec<NodeId>,
    ) -> Result<(), DotError> {
        if ["graph", "node", "edge"].iter().any(|kw| self.peek_keyword(kw)) {
            self.pos += 1;
            if self.peek_kind() != Some(&TokenKind::LBracket) {
                let token = self.next("'['")?;
                return Err(unexpected(&token, "'['"));
            }
            return self.attr_list();
        }

        if matches!(self.peek_kind(), Some(TokenKind::Id { .. }))
            && !self.peek_keyword("subgraph")
            && self.peek_kind_at(1) == Some(&TokenKind::Equals)
        {
            self.id("an attribute name")?;
            self.pos += 1;
            self.id("an attribute value")?;
            return Ok(());
        }

        let mut left = self.operand(builder)?;
        nodes.extend(&left);

        while let Some(edge_token) = self.edge_op()? {
            let right = self.operand(builder).map_err(|err| match err {
                DotError::UnexpectedEof { .. } => err,
                _ => DotError::Syntax {
                    line: edge_token.line,
                    column: edge_token.column,
                    message: "expected a node or subgraph after the edge operator".to_owned(),
                },
            })?;
            nodes.extend(&right);

            for &from in &left {
                for &to in &right {
                    builder.add_edge(from, to);
                }
            }

            left = right;
        }

        self.attr_list()
    }

    /// A node ID or a subgraph, as the nodes it stands for.
    fn operand(&mut self, builder: &mut GraphBuilder) -> Result<Vec<NodeId>, DotError> {
        if self.peek_keyword("subgraph") || self.peek_kind() == Some(&TokenKind::LBrace) {
            return self.subgraph(builder);
        }

        Ok(vec![self.node_id(builder)?])
    }

    fn subgraph(&mut self, builder: &mut GraphBuilder) -> Result<Vec<NodeId>, DotError> {
        if self.peek_keyword("subgraph") {
            self.pos += 1;
            if matches!(self.peek_kind(), Some(TokenKind::Id { .. })) {
                self.id("a subgraph name")?;
            }
        }

        self.expect(&TokenKind::LBrace, "'{'")?;
        let nodes = self.stmt_list(builder)?;
        self.expect(&TokenKind::RBrace, "'}'")?;

        Ok(nodes)
    }

    fn node_id(&mut self, builder: &mut GraphBuilder) -> Result<NodeId, DotError> {
        let token = self.next("a node")?;
        let name = match token.kind {
            TokenKind::Id { ref text, quoted } => {
                if !quoted && is_reserved(text) {
                    return Err(unexpected(&token, "a node"));
                }
                text.clone()
            }
            _ => return Err(unexpected(&token, "a node")),
        };

        // Ports and compass points are ignored
        if self.eat(&TokenKind::Colon) {
            self.id("a port")?;
            if self.eat(&TokenKind::Colon) {
                self.id("a compass point")?;
            }
        }

        Ok(builder.add_node(&name))
    }

    /// Consumes an edge operator if there is one, checking it matches the kind of graph.
    fn edge_op(&mut self) -> Result<Option<Token>, DotError> {
        let directed = match self.peek_kind() {
            Some(TokenKind::DirectedEdge) => true,
            Some(TokenKind::UndirectedEdge) => false,
            _ => return Ok(None),
        };

        let token = self.next("an edge operator")?;
        if directed != self.directed {
            let message = if directed {
                "'->' used in an undirected graph"
            } else {
                "'--' used in a directed graph"
            };
            return Err(DotError::Syntax {
                line: token.line,
                column: token.column,
                message: message.to_owned(),
            });
        }

        Ok(Some(token))
    }

    /// Parses zero or more `[a=b, c=d; e]` lists and discards them.
    fn attr_list(&mut self) -> Result<(), DotError> {
        while self.eat(&TokenKind::LBracket) {
            loop {
                if self.eat(&TokenKind::RBracket) {
                    break;
                }

                self.id("an attribute name or ']'")?;
                if self.eat(&TokenKind::Equals) {
                    self.id("an attribute value")?;
                }

                if !self.eat(&TokenKind::Comma) {
                    self.eat(&TokenKind::Semicolon);
                }
            }
        }

        Ok(())
    }
}

fn is_reserved(text: &str) -> bool {
    ["node", "edge", "graph", "digraph", "subgraph", "strict"]
        .iter()
        .any(|kw| text.eq_ignore_ascii_case(kw))
}

fn unexpected(token: &Token, expected: &str) -> DotError {
    let found = match &token.kind {
        TokenKind::LBrace => "'{'".to_owned(),
        TokenKind::RBrace => "'}'".to_owned(),
        TokenKind::LBracket => "'['".to_owned(),
        TokenKind::RBracket => "']'".to_owned(),
        TokenKind::Equals => "'='".to_owned(),
        TokenKind::Semicolon => "';'".to_owned(),
        TokenKind::Comma => "','".to_owned(),
        TokenKind::Colon => "':'".to_owned(),
        TokenKind::DirectedEdge => "'->'".to_owned(),
        TokenKind::UndirectedEdge => "'--'".to_owned(),
        TokenKind::Id { text, .. } => format!("'{text}'"),
    };

    DotError::Syntax {
        line: token.line,
        column: token.column,
        message: format!("expected {expected}, found {found}"),
    }
}
