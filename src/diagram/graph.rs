// Architecture graph model: clusters, nodes and labeled edges

use crate::diagram::style::{Attrs, Shape, Stereotype};
use crate::error::{Error, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Unique identifier for a cluster in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClusterId(pub usize);

/// A node in the architecture diagram
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    /// Identifier, unique across the whole graph
    pub id: String,
    /// Display text; may span several lines
    pub label: String,
    /// Role tag prefixed to the label
    pub stereotype: Option<Stereotype>,
    /// Explicit shape; `None` inherits the node default
    pub shape: Option<Shape>,
    /// Enclosing cluster, `None` for top-level nodes
    pub cluster: Option<ClusterId>,
}

impl Node {
    /// Create a node with a plain label
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            stereotype: None,
            shape: None,
            cluster: None,
        }
    }

    pub fn with_stereotype(mut self, stereotype: Stereotype) -> Self {
        self.stereotype = Some(stereotype);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// Label as rendered, stereotype tag on its own first line
    pub fn display_label(&self) -> String {
        match self.stereotype {
            Some(s) => format!("{}\n{}", s.tag(), self.label),
            None => self.label.clone(),
        }
    }

    /// Shape the engine will draw
    pub fn effective_shape(&self) -> Shape {
        self.shape.unwrap_or_default()
    }
}

/// A visually grouped set of nodes
#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    /// DOT subgraph name; carries the `cluster_` prefix
    pub name: String,
    pub label: String,
    pub parent: Option<ClusterId>,
    pub attrs: Attrs,
}

/// A directed, labeled edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Interaction verb, e.g. `«invokes»`
    pub label: String,
}

/// The architecture graph containing all clusters, nodes and edges
#[derive(Debug, Default, Serialize)]
pub struct ArchGraph {
    pub name: String,
    pub comment: Option<String>,
    pub engine: String,
    pub graph_attrs: Attrs,
    pub node_defaults: Attrs,
    pub edge_defaults: Attrs,
    clusters: Vec<Cluster>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    node_index: HashMap<String, usize>,
    #[serde(skip)]
    cluster_index: HashMap<String, ClusterId>,
}

impl ArchGraph {
    /// Create an empty graph laid out by `dot`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: "dot".to_string(),
            ..Self::default()
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn set_graph_attrs(&mut self, attrs: Attrs) {
        self.graph_attrs.extend(attrs);
    }

    pub fn set_node_defaults(&mut self, attrs: Attrs) {
        self.node_defaults.extend(attrs);
    }

    pub fn set_edge_defaults(&mut self, attrs: Attrs) {
        self.edge_defaults.extend(attrs);
    }

    /// Declare a cluster, optionally nested inside `parent`.
    ///
    /// The `cluster_` prefix is added when missing so the engine draws a box.
    pub fn add_cluster(
        &mut self,
        name: &str,
        label: &str,
        parent: Option<ClusterId>,
        attrs: Attrs,
    ) -> Result<ClusterId> {
        let name = if name.starts_with("cluster_") {
            name.to_string()
        } else {
            format!("cluster_{}", name)
        };

        if self.cluster_index.contains_key(&name) {
            return Err(Error::DuplicateCluster(name));
        }
        if let Some(p) = parent {
            self.cluster_checked(p)?;
        }

        let id = ClusterId(self.clusters.len());
        self.cluster_index.insert(name.clone(), id);
        self.clusters.push(Cluster {
            name,
            label: label.to_string(),
            parent,
            attrs,
        });
        Ok(id)
    }

    /// Declare a node inside `cluster` (or at top level)
    pub fn add_node(&mut self, mut node: Node, cluster: Option<ClusterId>) -> Result<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(Error::DuplicateNode(node.id));
        }
        if let Some(c) = cluster {
            self.cluster_checked(c)?;
        }

        node.cluster = cluster;
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Declare an edge; both endpoints must already exist
    pub fn add_edge(&mut self, from: &str, to: &str, label: &str) -> Result<()> {
        for end in [from, to] {
            if !self.node_index.contains_key(end) {
                return Err(Error::unknown_node(from, to, end));
            }
        }

        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
            label: label.to_string(),
        });
        Ok(())
    }

    fn cluster_checked(&self, id: ClusterId) -> Result<&Cluster> {
        self.clusters
            .get(id.0)
            .ok_or_else(|| Error::UnknownCluster(format!("#{}", id.0)))
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn get_cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0)
    }

    pub fn cluster_by_name(&self, name: &str) -> Option<ClusterId> {
        self.cluster_index.get(name).copied()
    }

    /// Nodes in declaration order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in declaration order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Iterate over all clusters with their IDs
    pub fn all_clusters(&self) -> impl Iterator<Item = (ClusterId, &Cluster)> {
        self.clusters
            .iter()
            .enumerate()
            .map(|(i, c)| (ClusterId(i), c))
    }

    /// Clusters directly nested in `parent` (`None` for top level)
    pub fn child_clusters(&self, parent: Option<ClusterId>) -> impl Iterator<Item = ClusterId> + '_ {
        self.all_clusters()
            .filter(move |(_, c)| c.parent == parent)
            .map(|(id, _)| id)
    }

    /// Nodes directly inside `cluster` (`None` for top level)
    pub fn nodes_in(&self, cluster: Option<ClusterId>) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.cluster == cluster)
    }

    /// Nodes inside `cluster` or any cluster nested in it
    pub fn nodes_within(&self, cluster: ClusterId) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.cluster.is_some_and(|c| self.is_within(c, cluster)))
            .collect()
    }

    fn is_within(&self, mut c: ClusterId, ancestor: ClusterId) -> bool {
        loop {
            if c == ancestor {
                return true;
            }
            match self.clusters.get(c.0).and_then(|cl| cl.parent) {
                Some(p) => c = p,
                None => return false,
            }
        }
    }

    /// Re-check every edge and cluster reference
    pub fn validate(&self) -> Result<()> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        if ids.len() != self.nodes.len() {
            let mut seen = HashSet::new();
            for n in &self.nodes {
                if !seen.insert(n.id.as_str()) {
                    return Err(Error::DuplicateNode(n.id.clone()));
                }
            }
        }

        for edge in &self.edges {
            for end in [&edge.from, &edge.to] {
                if !ids.contains(end.as_str()) {
                    return Err(Error::unknown_node(&edge.from, &edge.to, end));
                }
            }
        }

        for node in &self.nodes {
            if let Some(c) = node.cluster {
                self.cluster_checked(c)?;
            }
        }

        Ok(())
    }

    /// Petgraph view of the node/edge structure, for traversal queries
    pub fn dependency_graph(&self) -> (DiGraph<&str, &str>, HashMap<&str, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for node in &self.nodes {
            index.insert(node.id.as_str(), graph.add_node(node.id.as_str()));
        }
        for edge in &self.edges {
            if let (Some(&a), Some(&b)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) {
                graph.add_edge(a, b, edge.label.as_str());
            }
        }
        (graph, index)
    }

    /// Node ids not reachable from `root`, in declaration order
    pub fn unreachable_from(&self, root: &str) -> Vec<&str> {
        let (graph, index) = self.dependency_graph();
        let Some(&start) = index.get(root) else {
            return self.nodes.iter().map(|n| n.id.as_str()).collect();
        };

        let mut reached = HashSet::new();
        let mut bfs = Bfs::new(&graph, start);
        while let Some(nx) = bfs.next(&graph) {
            reached.insert(graph[nx]);
        }

        self.nodes
            .iter()
            .map(|n| n.id.as_str())
            .filter(|id| !reached.contains(id))
            .collect()
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            clusters: self.clusters.len(),
            edges: self.edges.len(),
            top_level_nodes: self.nodes_in(None).count(),
        }
    }
}

/// Statistics about the architecture graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub clusters: usize,
    pub edges: usize,
    pub top_level_nodes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::style::attrs;

    fn two_tier() -> ArchGraph {
        let mut g = ArchGraph::new("test");
        let outer = g.add_cluster("outer", "Outer", None, Attrs::new()).unwrap();
        let inner = g.add_cluster("inner", "Inner", Some(outer), Attrs::new()).unwrap();
        g.add_node(Node::new("a", "A"), Some(outer)).unwrap();
        g.add_node(Node::new("b", "B"), Some(inner)).unwrap();
        g.add_node(Node::new("c", "C"), None).unwrap();
        g
    }

    #[test]
    fn test_empty_graph() {
        let g = ArchGraph::new("empty");
        assert_eq!(g.engine, "dot");
        assert_eq!(g.stats().nodes, 0);
        assert_eq!(g.stats().edges, 0);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_cluster_prefix() {
        let mut g = ArchGraph::new("t");
        let id = g.add_cluster("data", "Data", None, Attrs::new()).unwrap();
        assert_eq!(g.get_cluster(id).unwrap().name, "cluster_data");
        assert_eq!(g.cluster_by_name("cluster_data"), Some(id));
    }

    #[test]
    fn test_duplicate_cluster() {
        let mut g = ArchGraph::new("t");
        g.add_cluster("x", "X", None, Attrs::new()).unwrap();
        let err = g.add_cluster("cluster_x", "X", None, Attrs::new()).unwrap_err();
        assert!(matches!(err, Error::DuplicateCluster(_)));
    }

    #[test]
    fn test_unknown_parent_cluster() {
        let mut g = ArchGraph::new("t");
        let err = g.add_cluster("x", "X", Some(ClusterId(7)), Attrs::new()).unwrap_err();
        assert!(matches!(err, Error::UnknownCluster(_)));
    }

    #[test]
    fn test_duplicate_node_across_clusters() {
        let mut g = two_tier();
        let outer = g.cluster_by_name("cluster_outer");
        let err = g.add_node(Node::new("b", "again"), outer).unwrap_err();
        assert!(matches!(err, Error::DuplicateNode(id) if id == "b"));
    }

    #[test]
    fn test_edge_to_undeclared_node() {
        let mut g = two_tier();
        let err = g.add_edge("a", "ghost", "«uses»").unwrap_err();
        match err {
            Error::UnknownNode { missing, .. } => assert_eq!(missing, "ghost"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(g.edges().is_empty());
    }

    #[test]
    fn test_nodes_within_nested() {
        let g = two_tier();
        let outer = g.cluster_by_name("cluster_outer").unwrap();
        let inner = g.cluster_by_name("cluster_inner").unwrap();

        let within: Vec<&str> = g.nodes_within(outer).iter().map(|n| n.id.as_str()).collect();
        assert_eq!(within, vec!["a", "b"]);
        assert_eq!(g.nodes_in(Some(outer)).count(), 1);
        assert_eq!(g.nodes_within(inner).len(), 1);
        assert_eq!(g.nodes_in(None).count(), 1);
    }

    #[test]
    fn test_child_clusters() {
        let g = two_tier();
        let outer = g.cluster_by_name("cluster_outer").unwrap();
        let top: Vec<ClusterId> = g.child_clusters(None).collect();
        assert_eq!(top, vec![outer]);
        assert_eq!(g.child_clusters(Some(outer)).count(), 1);
    }

    #[test]
    fn test_display_label_with_stereotype() {
        let n = Node::new("s", "Drug Service").with_stereotype(Stereotype::Service);
        assert_eq!(n.display_label(), "«service»\nDrug Service");
        assert_eq!(n.effective_shape(), Shape::Rectangle);

        let n = Node::new("db", "Cache").with_shape(Shape::Cylinder);
        assert_eq!(n.display_label(), "Cache");
        assert_eq!(n.effective_shape(), Shape::Cylinder);
    }

    #[test]
    fn test_unreachable_from() {
        let mut g = two_tier();
        g.add_edge("a", "b", "uses").unwrap();
        assert_eq!(g.unreachable_from("a"), vec!["c"]);
        assert_eq!(g.unreachable_from("missing").len(), 3);
    }

    #[test]
    fn test_dependency_graph_counts() {
        let mut g = two_tier();
        g.add_edge("a", "b", "uses").unwrap();
        g.add_edge("c", "a", "calls").unwrap();
        let (pg, index) = g.dependency_graph();
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 2);
        assert!(index.contains_key("c"));
    }

    #[test]
    fn test_defaults_extend() {
        let mut g = ArchGraph::new("t");
        g.set_graph_attrs(attrs([("rankdir", "TB")]));
        g.set_graph_attrs(attrs([("dpi", "300")]));
        assert_eq!(g.graph_attrs.len(), 2);
    }

    #[test]
    fn test_stats() {
        let mut g = two_tier();
        g.add_edge("a", "c", "uses").unwrap();
        let stats = g.stats();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.clusters, 2);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.top_level_nodes, 1);
    }
}
