// Node shapes, stereotype tags and the default style sheet.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Ordered attribute map; ordering keeps the DOT description stable
pub type Attrs = BTreeMap<String, String>;

/// Build an attribute map from string pairs
pub fn attrs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Attrs {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Node outline understood by the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Rectangle,
    Ellipse,
    Cylinder,
}

impl Shape {
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Rectangle => "rectangle",
            Shape::Ellipse => "ellipse",
            Shape::Cylinder => "cylinder",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architectural role tag shown as the first label line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stereotype {
    Actor,
    ExternalSystem,
    Boundary,
    Component,
    Service,
    Storage,
}

impl Stereotype {
    /// Tag text without guillemets
    pub fn name(self) -> &'static str {
        match self {
            Stereotype::Actor => "actor",
            Stereotype::ExternalSystem => "external system",
            Stereotype::Boundary => "boundary",
            Stereotype::Component => "component",
            Stereotype::Service => "service",
            Stereotype::Storage => "storage",
        }
    }

    /// Tag as it appears in a label, e.g. `«service»`
    pub fn tag(self) -> String {
        guillemets(self.name())
    }
}

impl fmt::Display for Stereotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "«{}»", self.name())
    }
}

/// Wrap text in guillemets: `uses` -> `«uses»`
pub fn guillemets(text: &str) -> String {
    format!("«{}»", text)
}

pub const FONT: &str = "Times-Roman";

/// Global graph attributes for the IEEE-style document
pub fn graph_defaults(dpi: u32) -> Attrs {
    let mut a = attrs([
        ("rankdir", "TB"),
        ("compound", "true"),
        ("splines", "ortho"),
        ("concentrate", "true"),
        ("ranksep", "1.8"),
        ("nodesep", "1.2"),
        ("pad", "0.5"),
        ("fontname", FONT),
        ("fontsize", "14"),
        ("style", "rounded"),
        ("bgcolor", "white"),
    ]);
    a.insert("dpi".to_string(), dpi.to_string());
    a
}

/// Default node style: white-filled rectangles
pub fn node_defaults() -> Attrs {
    attrs([
        ("shape", Shape::Rectangle.as_str()),
        ("style", "filled"),
        ("fillcolor", "white"),
        ("color", "black"),
        ("fontname", FONT),
        ("fontsize", "12"),
        ("height", "0.6"),
        ("width", "1.6"),
        ("margin", "0.3,0.2"),
    ])
}

/// Default edge style: thin black lines, small arrowheads, labels above
pub fn edge_defaults() -> Attrs {
    attrs([
        ("fontname", FONT),
        ("fontsize", "10"),
        ("color", "#000000"),
        ("arrowsize", "0.8"),
        ("penwidth", "1.0"),
        ("xlabel_position", "above"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_names() {
        assert_eq!(Shape::Rectangle.as_str(), "rectangle");
        assert_eq!(Shape::Ellipse.to_string(), "ellipse");
        assert_eq!(Shape::Cylinder.as_str(), "cylinder");
        assert_eq!(Shape::default(), Shape::Rectangle);
    }

    #[test]
    fn test_stereotype_tag() {
        assert_eq!(Stereotype::Service.tag(), "«service»");
        assert_eq!(Stereotype::ExternalSystem.tag(), "«external system»");
        assert_eq!(Stereotype::Storage.to_string(), "«storage»");
    }

    #[test]
    fn test_graph_defaults_dpi() {
        let a = graph_defaults(300);
        assert_eq!(a.get("dpi").map(String::as_str), Some("300"));
        assert_eq!(a.get("rankdir").map(String::as_str), Some("TB"));
        assert_eq!(a.get("splines").map(String::as_str), Some("ortho"));
    }

    #[test]
    fn test_node_defaults() {
        let a = node_defaults();
        assert_eq!(a.get("shape").map(String::as_str), Some("rectangle"));
        assert_eq!(a.get("fillcolor").map(String::as_str), Some("white"));
    }

    #[test]
    fn test_attrs_are_sorted() {
        let a = attrs([("z", "1"), ("a", "2")]);
        let keys: Vec<&str> = a.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "z"]);
    }
}
