//! The DrugCheck system architecture (IEEE 1471 style view).
//!
//! Everything here is fixed content: four tiers of clusters, fourteen nodes
//! and seventeen labeled edges.

use crate::diagram::graph::{ArchGraph, Node};
use crate::diagram::style::{self, attrs, guillemets, Shape, Stereotype};
use crate::error::Result;

pub const GRAPH_NAME: &str = "DrugCheck_Architecture";
pub const GRAPH_COMMENT: &str = "DrugCheck System Architecture Diagram (IEEE 1471)";

/// Top-level cluster names, in declaration order
pub const CONTEXT: &str = "cluster_context";
pub const PRESENTATION: &str = "cluster_presentation";
pub const BUSINESS: &str = "cluster_business";
pub const DATA: &str = "cluster_data";

/// The actor every interaction starts from
pub const ACTOR: &str = "User";

/// (from, to, verb) for every relationship in the diagram
const RELATIONSHIPS: [(&str, &str, &str); 17] = [
    // user interactions
    ("User", "WebUI", "uses"),
    ("WebUI", "HomeView", "forwards"),
    ("WebUI", "CheckerView", "forwards"),
    ("WebUI", "SearchView", "forwards"),
    ("WebUI", "ReportView", "forwards"),
    // views to services
    ("CheckerView", "DrugService", "invokes"),
    ("SearchView", "DrugService", "invokes"),
    ("ReportView", "ReportService", "invokes"),
    ("ReportView", "AnalysisService", "invokes"),
    // service dependencies
    ("DrugService", "ValidationService", "uses"),
    ("AnalysisService", "ValidationService", "uses"),
    ("DrugService", "RxNav", "calls"),
    ("AnalysisService", "MistralAI", "calls"),
    // data access
    ("DrugService", "CacheStore", "reads/writes"),
    ("DrugService", "StateStore", "manages"),
    ("AnalysisService", "StateStore", "manages"),
    ("ReportService", "StateStore", "manages"),
];

/// Build the DrugCheck architecture graph rendered at `dpi`
pub fn drugcheck_architecture(dpi: u32) -> Result<ArchGraph> {
    let mut g = ArchGraph::new(GRAPH_NAME).with_comment(GRAPH_COMMENT);

    g.set_graph_attrs(style::graph_defaults(dpi));
    g.set_node_defaults(style::node_defaults());
    g.set_edge_defaults(style::edge_defaults());

    // System context: the actor and the external APIs
    let context = g.add_cluster(
        CONTEXT,
        "System Context",
        None,
        attrs([
            ("style", "dashed,rounded"),
            ("color", "#666666"),
            ("fontname", style::FONT),
            ("fontsize", "14"),
        ]),
    )?;
    g.add_node(
        Node::new(ACTOR, "Healthcare\nProfessional")
            .with_stereotype(Stereotype::Actor)
            .with_shape(Shape::Ellipse),
        Some(context),
    )?;
    g.add_node(
        Node::new("RxNav", "RxNav API")
            .with_stereotype(Stereotype::ExternalSystem)
            .with_shape(Shape::Rectangle),
        Some(context),
    )?;
    g.add_node(
        Node::new("MistralAI", "Mistral AI API")
            .with_stereotype(Stereotype::ExternalSystem)
            .with_shape(Shape::Rectangle),
        Some(context),
    )?;

    let presentation = g.add_cluster(
        PRESENTATION,
        "Presentation Tier",
        None,
        tier_attrs("#f5f5f5"),
    )?;
    g.add_node(
        Node::new("WebUI", "Web Interface").with_stereotype(Stereotype::Boundary),
        Some(presentation),
    )?;
    let ui = g.add_cluster(
        "cluster_ui_components",
        "UI Components",
        Some(presentation),
        attrs([("style", "rounded")]),
    )?;
    for (id, label) in [
        ("HomeView", "Home View"),
        ("CheckerView", "Checker View"),
        ("SearchView", "Search View"),
        ("ReportView", "Report View"),
    ] {
        g.add_node(
            Node::new(id, label).with_stereotype(Stereotype::Component),
            Some(ui),
        )?;
    }

    let business = g.add_cluster(BUSINESS, "Business Logic Tier", None, tier_attrs("#f0f0f0"))?;
    let services = g.add_cluster(
        "cluster_services",
        "Core Services",
        Some(business),
        attrs([("style", "rounded")]),
    )?;
    for (id, label) in [
        ("DrugService", "Drug Service"),
        ("AnalysisService", "Analysis Service"),
        ("ReportService", "Report Service"),
        ("ValidationService", "Validation Service"),
    ] {
        g.add_node(
            Node::new(id, label).with_stereotype(Stereotype::Service),
            Some(services),
        )?;
    }

    let data = g.add_cluster(DATA, "Data Tier", None, tier_attrs("#e8e8e8"))?;
    for (id, label) in [("CacheStore", "Cache Store"), ("StateStore", "State Store")] {
        g.add_node(
            Node::new(id, label)
                .with_stereotype(Stereotype::Storage)
                .with_shape(Shape::Cylinder),
            Some(data),
        )?;
    }

    for (from, to, verb) in RELATIONSHIPS {
        g.add_edge(from, to, &guillemets(verb))?;
    }

    Ok(g)
}

fn tier_attrs(bgcolor: &str) -> style::Attrs {
    attrs([("style", "rounded"), ("color", "#333333"), ("bgcolor", bgcolor)])
}
