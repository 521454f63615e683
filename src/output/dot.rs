// DOT generation for drugcheck-arch
//
// Converts an ArchGraph into a dot-structures graph and prints it with the
// graphviz-rust printer. Attribute maps are ordered, clusters/nodes/edges keep
// declaration order, so output is stable.

use crate::diagram::{ArchGraph, Attrs, ClusterId, Node};
use dot_generator::id;
use dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph, GraphAttributes, Id, Node as DotNode, NodeId,
    Stmt, Subgraph, Vertex,
};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use sha2::{Digest, Sha256};

/// Writer producing Graphviz DOT from an architecture graph
pub struct DotWriter;

impl DotWriter {
    pub fn new() -> Self {
        Self
    }

    /// Build the dot-structures representation of `graph`
    pub fn to_graph(&self, graph: &ArchGraph) -> Graph {
        let mut stmts = Vec::new();

        for (k, v) in &graph.graph_attrs {
            stmts.push(Stmt::Attribute(attribute(k, v)));
        }
        if !graph.node_defaults.is_empty() {
            stmts.push(Stmt::GAttribute(GraphAttributes::Node(attributes(
                &graph.node_defaults,
            ))));
        }
        if !graph.edge_defaults.is_empty() {
            stmts.push(Stmt::GAttribute(GraphAttributes::Edge(attributes(
                &graph.edge_defaults,
            ))));
        }

        for cluster in graph.child_clusters(None) {
            if let Some(sub) = subgraph(graph, cluster) {
                stmts.push(Stmt::Subgraph(sub));
            }
        }

        for node in graph.nodes_in(None) {
            stmts.push(Stmt::Node(node_stmt(node)));
        }

        for edge in graph.edges() {
            stmts.push(Stmt::Edge(DotEdge {
                ty: EdgeTy::Pair(
                    Vertex::N(NodeId(dot_id(&edge.from), None)),
                    Vertex::N(NodeId(dot_id(&edge.to), None)),
                ),
                attributes: vec![attribute("xlabel", &edge.label)],
            }));
        }

        Graph::DiGraph {
            id: dot_id(&graph.name),
            strict: false,
            stmts,
        }
    }

    /// Serialize the whole graph, comment lines first
    pub fn write(&self, graph: &ArchGraph) -> String {
        let mut out = String::new();
        if let Some(comment) = &graph.comment {
            for line in comment.lines() {
                out.push_str("// ");
                out.push_str(line);
                out.push('\n');
            }
        }

        let mut ctx = PrinterContext::default();
        out.push_str(&self.to_graph(graph).print(&mut ctx));
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }
}

impl Default for DotWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 of a DOT description, lowercase hex
pub fn digest(dot: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(dot.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn subgraph(graph: &ArchGraph, id: ClusterId) -> Option<Subgraph> {
    let cluster = graph.get_cluster(id)?;

    let mut stmts = vec![Stmt::Attribute(attribute("label", &cluster.label))];
    for (k, v) in &cluster.attrs {
        stmts.push(Stmt::Attribute(attribute(k, v)));
    }
    for node in graph.nodes_in(Some(id)) {
        stmts.push(Stmt::Node(node_stmt(node)));
    }
    for child in graph.child_clusters(Some(id)) {
        if let Some(sub) = subgraph(graph, child) {
            stmts.push(Stmt::Subgraph(sub));
        }
    }

    Some(Subgraph {
        id: dot_id(&cluster.name),
        stmts,
    })
}

fn node_stmt(node: &Node) -> DotNode {
    let mut attrs = vec![attribute("label", &node.display_label())];
    if let Some(shape) = node.shape {
        attrs.push(attribute("shape", shape.as_str()));
    }
    DotNode {
        id: NodeId(dot_id(&node.id), None),
        attributes: attrs,
    }
}

fn attributes(attrs: &Attrs) -> Vec<Attribute> {
    attrs.iter().map(|(k, v)| attribute(k, v)).collect()
}

fn attribute(key: &str, value: &str) -> Attribute {
    Attribute(dot_id(key), dot_id(value))
}

/// DOT identifier for `s`: plain when it is a bare ID or numeral, escaped otherwise
pub fn dot_id(s: &str) -> Id {
    if is_plain_id(s) || is_numeral(s) {
        id!(s)
    } else {
        Id::Escaped(quote_id(s))
    }
}

/// Quote a DOT identifier unless it is a plain ID or numeral.
///
/// `\` and `"` are backslash-escaped and newlines become `\n`.
pub fn quote_id(s: &str) -> String {
    if is_plain_id(s) || is_numeral(s) {
        s.to_string()
    } else {
        format!("\"{}\"", escape(s))
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

fn is_plain_id(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(s))
}

fn is_numeral(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || digits == "." {
        return false;
    }
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    true
}
