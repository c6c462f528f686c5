use crate::error::{Error, Result};
use crate::features::OutputFormat;
use crate::ir::{BoxF, FontNames, ObjKind, PaintState, Point};
use crate::sink::OutputSink;
use std::io::Write;

/// Identity and paint of one open structural context.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjState {
    pub kind: ObjKind,
    /// Numeric id used in `id="<kind><id>"`.
    pub id: i64,
    pub name: String,
    /// Edge endpoints, tail then head.
    pub endpoints: Option<(String, String)>,
    pub paint: PaintState,
}

impl ObjState {
    pub fn new(kind: ObjKind, paint: PaintState) -> Self {
        Self {
            kind,
            id: 0,
            name: String::new(),
            endpoints: None,
            paint,
        }
    }
}

/// Product line written into the generator comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub name: String,
    pub version: String,
    pub build: String,
}

impl Default for ProductInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            build: "rust".to_string(),
        }
    }
}

/// Per-document settings supplied by the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOptions {
    pub format: OutputFormat,
    pub font_names: FontNames,
    pub stylesheet: Option<String>,
    pub product: ProductInfo,
    pub user: String,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Svg,
            font_names: FontNames::Svg,
            stylesheet: None,
            product: ProductInfo::default(),
            user: "unknown".to_string(),
        }
    }
}

/// The single active rendering task for one output stream.
#[derive(Debug)]
pub struct Job<W: Write> {
    pub options: JobOptions,
    pub sink: OutputSink<W>,
    /// Output size in points.
    pub width: u32,
    pub height: u32,
    pub canvas: BoxF,
    /// Page array as (columns, rows).
    pub pages: (u32, u32),
    pub directed: bool,
    pub view_num: u32,
    pub scale: Point,
    pub rotation: i32,
    pub translation: Point,
    stack: Vec<ObjState>,
}

impl<W: Write> Job<W> {
    pub fn new(writer: W, options: JobOptions) -> Self {
        Self {
            options,
            sink: OutputSink::new(writer),
            width: 0,
            height: 0,
            canvas: BoxF::default(),
            pages: (1, 1),
            directed: true,
            view_num: 0,
            scale: Point::new(1.0, 1.0),
            rotation: 0,
            translation: Point::default(),
            stack: Vec::new(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.options.format
    }

    /// Current (innermost) object.
    pub fn obj(&self) -> Option<&ObjState> {
        self.stack.last()
    }

    pub(crate) fn require_obj(&self, operation: &'static str) -> Result<&ObjState> {
        self.stack.last().ok_or(Error::NoActiveObject { operation })
    }

    /// Name of the nearest enclosing graph, or empty.
    pub fn graph_name(&self) -> &str {
        self.stack
            .iter()
            .rev()
            .find(|obj| obj.kind == ObjKind::Graph)
            .map(|obj| obj.name.as_str())
            .unwrap_or("")
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Paint a new child context starts from.
    pub fn inherited_paint(&self) -> PaintState {
        self.stack
            .last()
            .map(|obj| obj.paint.clone())
            .unwrap_or_default()
    }

    pub fn push_obj(&mut self, obj: ObjState) {
        self.stack.push(obj);
    }

    pub fn pop_obj(&mut self) -> Option<ObjState> {
        self.stack.pop()
    }

    pub fn fputs(&mut self, s: &str) -> Result<()> {
        self.sink.fputs(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Color;

    #[test]
    fn children_inherit_parent_paint() {
        let mut job = Job::new(Vec::new(), JobOptions::default());
        assert_eq!(job.inherited_paint(), PaintState::default());
        let paint = PaintState {
            pen: Color::named("red"),
            ..PaintState::default()
        };
        job.push_obj(ObjState::new(ObjKind::Graph, paint.clone()));
        assert_eq!(job.inherited_paint(), paint);
        assert_eq!(job.depth(), 1);
        assert_eq!(job.pop_obj().map(|obj| obj.kind), Some(ObjKind::Graph));
        assert!(job.obj().is_none());
    }

    #[test]
    fn graph_name_comes_from_enclosing_graph() {
        let mut job = Job::new(Vec::new(), JobOptions::default());
        let mut graph = ObjState::new(ObjKind::Graph, PaintState::default());
        graph.name = "G".to_string();
        job.push_obj(graph);
        job.push_obj(ObjState::new(ObjKind::Page, PaintState::default()));
        assert_eq!(job.graph_name(), "G");
        assert!(matches!(job.require_obj("test"), Ok(obj) if obj.kind == ObjKind::Page));
    }
}
