use serde::{Deserialize, Serialize};

/// A point in layout coordinates (Y grows upward).
///
/// Deserializes from either `{"x": .., "y": ..}` or `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PointRepr")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PointRepr {
    Pair([f64; 2]),
    Object { x: f64, y: f64 },
}

impl From<PointRepr> for Point {
    fn from(repr: PointRepr) -> Self {
        match repr {
            PointRepr::Pair([x, y]) => Self { x, y },
            PointRepr::Object { x, y } => Self { x, y },
        }
    }
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxF {
    pub ll: Point,
    pub ur: Point,
}

impl BoxF {
    pub const fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self {
            ll: Point::new(llx, lly),
            ur: Point::new(urx, ury),
        }
    }
}

/// A resolved color as handed over by the layout pipeline.
///
/// Only the two representations the SVG grammar can express exist here, so an
/// unsupported representation cannot reach the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    /// A symbolic color name, written verbatim.
    Named(String),
    /// Red, green, blue, alpha bytes.
    Rgba([u8; 4]),
}

impl Color {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgba([r, g, b, 255])
    }

    pub const fn transparent() -> Self {
        Self::Rgba([0, 0, 0, 0])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::named("black")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Fill/stroke attributes attached to a drawable object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintState {
    pub fill: Color,
    pub pen: Color,
    pub pen_width: f64,
    pub pen_style: PenStyle,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            fill: Color::named("lightgrey"),
            pen: Color::named("black"),
            pen_width: crate::style::PENWIDTH_NORMAL,
            pen_style: PenStyle::Solid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    Left,
    Right,
    #[default]
    Center,
}

impl Justify {
    pub fn text_anchor(self) -> &'static str {
        match self {
            Justify::Left => "start",
            Justify::Right => "end",
            Justify::Center => "middle",
        }
    }
}

/// Font naming scheme requested by the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontNames {
    /// PostScript font names.
    Ps,
    /// SVG generic family names.
    #[default]
    Svg,
    /// Platform font names.
    Native,
}

impl FontNames {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "ps" => Some(Self::Ps),
            "svg" => Some(Self::Svg),
            "native" => Some(Self::Native),
            _ => None,
        }
    }
}

/// Format-specific replacement names for a requested font.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostscriptAlias {
    /// PostScript name, e.g. `Times-Roman`.
    pub name: String,
    /// Generic family list, e.g. `Times,serif`.
    pub family: String,
    pub weight: Option<String>,
    pub stretch: Option<String>,
    pub style: Option<String>,
}

/// One label fragment to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPara {
    pub text: String,
    #[serde(default = "default_font_name")]
    pub font_name: String,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub just: Justify,
    #[serde(default)]
    pub postscript_alias: Option<PostscriptAlias>,
}

fn default_font_name() -> String {
    "Times-Roman".to_string()
}

fn default_font_size() -> f64 {
    14.0
}

impl TextPara {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_name: default_font_name(),
            font_size: default_font_size(),
            just: Justify::Center,
            postscript_alias: None,
        }
    }
}

/// Kind tag of a structural context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjKind {
    Document,
    Graph,
    Page,
    Layer,
    Cluster,
    Node,
    Edge,
    Anchor,
}

impl ObjKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjKind::Document => "document",
            ObjKind::Graph => "graph",
            ObjKind::Page => "page",
            ObjKind::Layer => "layer",
            ObjKind::Cluster => "cluster",
            ObjKind::Node => "node",
            ObjKind::Edge => "edge",
            ObjKind::Anchor => "anchor",
        }
    }
}

impl std::fmt::Display for ObjKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_directed")]
    pub directed: bool,
    /// Output width in points.
    pub width: u32,
    /// Output height in points.
    pub height: u32,
    /// Canvas bounding box, used verbatim as the viewBox.
    pub canvas: BoxF,
    /// Page array as (columns, rows).
    #[serde(default = "default_pages")]
    pub pages: (u32, u32),
    #[serde(default)]
    pub paint: Option<PaintState>,
}

fn default_directed() -> bool {
    true
}

fn default_pages() -> (u32, u32) {
    (1, 1)
}

impl GraphInfo {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            directed: true,
            width,
            height,
            canvas: BoxF::new(0.0, 0.0, width as f64, height as f64),
            pages: (1, 1),
            paint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    pub view_num: u32,
    pub scale: Point,
    /// Rotation in degrees, counter-clockwise in layout space.
    pub rotation: i32,
    pub translation: Point,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            view_num: 0,
            scale: Point::new(1.0, 1.0),
            rotation: 0,
            translation: Point::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerInfo {
    pub name: String,
    pub layer_num: u32,
    pub num_layers: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub paint: Option<PaintState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub paint: Option<PaintState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeInfo {
    pub id: i64,
    pub tail: String,
    pub head: String,
    #[serde(default)]
    pub paint: Option<PaintState>,
}

/// Hyperlink data; empty strings behave like absent values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorInfo {
    pub href: Option<String>,
    pub tooltip: Option<String>,
    pub target: Option<String>,
}
