use crate::engine::{RenderEngine, SvgRenderEngine};
use crate::error::{Error, Result};
use crate::ir::{
    AnchorInfo, ClusterInfo, EdgeInfo, GraphInfo, LayerInfo, NodeInfo, ObjKind, PageInfo,
    PaintState, Point, TextPara,
};
use crate::job::{Job, JobOptions, ObjState};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// One drawing event from the layout pipeline, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    BeginJob,
    EndJob,
    BeginGraph(GraphInfo),
    EndGraph,
    BeginLayer(LayerInfo),
    EndLayer,
    BeginPage(PageInfo),
    EndPage,
    BeginCluster(ClusterInfo),
    EndCluster,
    BeginNode(NodeInfo),
    EndNode,
    BeginEdge(EdgeInfo),
    EndEdge,
    BeginAnchor(AnchorInfo),
    EndAnchor,
    Text {
        at: Point,
        para: TextPara,
    },
    Ellipse {
        points: Vec<Point>,
        #[serde(default)]
        filled: bool,
    },
    Polygon {
        points: Vec<Point>,
        #[serde(default)]
        filled: bool,
    },
    Bezier {
        points: Vec<Point>,
        #[serde(default)]
        filled: bool,
    },
    Polyline {
        points: Vec<Point>,
    },
    Comment {
        text: String,
    },
}

/// Drives a [`RenderEngine`] and keeps the structural context stack.
///
/// Nesting is the caller's contract: events are written as they arrive and a
/// mis-nested sequence produces mismatched tags rather than an error.
#[derive(Debug)]
pub struct Renderer<W: Write, E: RenderEngine = SvgRenderEngine> {
    job: Job<W>,
    engine: E,
}

impl<W: Write> Renderer<W, SvgRenderEngine> {
    pub fn new(writer: W, options: JobOptions) -> Self {
        Self::with_engine(writer, options, SvgRenderEngine)
    }
}

impl<W: Write, E: RenderEngine> Renderer<W, E> {
    pub fn with_engine(writer: W, options: JobOptions, engine: E) -> Self {
        Self {
            job: Job::new(writer, options),
            engine,
        }
    }

    pub fn job(&self) -> &Job<W> {
        &self.job
    }

    fn open(&mut self, obj: ObjState) {
        tracing::trace!(kind = %obj.kind, id = obj.id, depth = self.job.depth(), "open context");
        self.job.push_obj(obj);
    }

    fn close(&mut self, kind: ObjKind) -> Result<()> {
        match self.job.pop_obj() {
            None => Err(Error::EmptyStack { kind }),
            Some(obj) => {
                if obj.kind != kind {
                    tracing::warn!(expected = %kind, found = %obj.kind, "mis-nested end event");
                }
                Ok(())
            }
        }
    }

    fn ensure_open(&self, kind: ObjKind) -> Result<()> {
        if self.job.depth() == 0 {
            return Err(Error::EmptyStack { kind });
        }
        Ok(())
    }

    fn child(&self, kind: ObjKind, paint: Option<&PaintState>) -> ObjState {
        let paint = paint.cloned().unwrap_or_else(|| self.job.inherited_paint());
        ObjState::new(kind, paint)
    }

    pub fn begin_job(&mut self) -> Result<()> {
        tracing::debug!(format = ?self.job.format(), "begin job");
        let doc = ObjState::new(ObjKind::Document, PaintState::default());
        self.open(doc);
        self.engine.begin_job(&mut self.job)
    }

    /// Finalizes the output transport and returns the writer.
    pub fn end_job(&mut self) -> Result<W> {
        self.ensure_open(ObjKind::Document)?;
        let written = self.job.sink.bytes_written();
        let writer = self.engine.end_job(&mut self.job)?;
        let mut leftover = 0usize;
        while let Some(obj) = self.job.pop_obj() {
            if obj.kind == ObjKind::Document {
                break;
            }
            leftover += 1;
        }
        if leftover > 0 {
            tracing::warn!(open = leftover, "contexts still open at end of job");
        }
        tracing::debug!(bytes = written, "end job");
        Ok(writer)
    }

    pub fn begin_graph(&mut self, info: &GraphInfo) -> Result<()> {
        self.job.width = info.width;
        self.job.height = info.height;
        self.job.canvas = info.canvas;
        self.job.pages = info.pages;
        self.job.directed = info.directed;
        let mut obj = self.child(ObjKind::Graph, info.paint.as_ref());
        obj.name = info.name.clone();
        self.open(obj);
        self.engine.begin_graph(&mut self.job)
    }

    pub fn end_graph(&mut self) -> Result<()> {
        self.ensure_open(ObjKind::Graph)?;
        self.engine.end_graph(&mut self.job)?;
        self.close(ObjKind::Graph)
    }

    pub fn begin_layer(&mut self, info: &LayerInfo) -> Result<()> {
        let mut obj = self.child(ObjKind::Layer, None);
        obj.name = info.name.clone();
        self.open(obj);
        self.engine.begin_layer(&mut self.job, info)
    }

    pub fn end_layer(&mut self) -> Result<()> {
        self.ensure_open(ObjKind::Layer)?;
        self.engine.end_layer(&mut self.job)?;
        self.close(ObjKind::Layer)
    }

    pub fn begin_page(&mut self, info: &PageInfo) -> Result<()> {
        self.job.view_num = info.view_num;
        self.job.scale = info.scale;
        self.job.rotation = info.rotation;
        self.job.translation = info.translation;
        let obj = self.child(ObjKind::Page, None);
        self.open(obj);
        self.engine.begin_page(&mut self.job)
    }

    pub fn end_page(&mut self) -> Result<()> {
        self.ensure_open(ObjKind::Page)?;
        self.engine.end_page(&mut self.job)?;
        self.close(ObjKind::Page)
    }

    pub fn begin_cluster(&mut self, info: &ClusterInfo) -> Result<()> {
        let mut obj = self.child(ObjKind::Cluster, info.paint.as_ref());
        obj.id = info.id;
        obj.name = info.name.clone();
        self.open(obj);
        self.engine.begin_cluster(&mut self.job)
    }

    pub fn end_cluster(&mut self) -> Result<()> {
        self.ensure_open(ObjKind::Cluster)?;
        self.engine.end_cluster(&mut self.job)?;
        self.close(ObjKind::Cluster)
    }

    pub fn begin_node(&mut self, info: &NodeInfo) -> Result<()> {
        let mut obj = self.child(ObjKind::Node, info.paint.as_ref());
        obj.id = info.id;
        obj.name = info.name.clone();
        self.open(obj);
        self.engine.begin_node(&mut self.job)
    }

    pub fn end_node(&mut self) -> Result<()> {
        self.ensure_open(ObjKind::Node)?;
        self.engine.end_node(&mut self.job)?;
        self.close(ObjKind::Node)
    }

    pub fn begin_edge(&mut self, info: &EdgeInfo) -> Result<()> {
        let mut obj = self.child(ObjKind::Edge, info.paint.as_ref());
        obj.id = info.id;
        obj.endpoints = Some((info.tail.clone(), info.head.clone()));
        self.open(obj);
        self.engine.begin_edge(&mut self.job)
    }

    pub fn end_edge(&mut self) -> Result<()> {
        self.ensure_open(ObjKind::Edge)?;
        self.engine.end_edge(&mut self.job)?;
        self.close(ObjKind::Edge)
    }

    pub fn begin_anchor(&mut self, info: &AnchorInfo) -> Result<()> {
        let obj = self.child(ObjKind::Anchor, None);
        self.open(obj);
        self.engine.begin_anchor(&mut self.job, info)
    }

    pub fn end_anchor(&mut self) -> Result<()> {
        self.ensure_open(ObjKind::Anchor)?;
        self.engine.end_anchor(&mut self.job)?;
        self.close(ObjKind::Anchor)
    }

    pub fn text(&mut self, at: Point, para: &TextPara) -> Result<()> {
        self.engine.textpara(&mut self.job, at, para)
    }

    pub fn ellipse(&mut self, points: &[Point], filled: bool) -> Result<()> {
        self.engine.ellipse(&mut self.job, points, filled)
    }

    pub fn polygon(&mut self, points: &[Point], filled: bool) -> Result<()> {
        self.engine.polygon(&mut self.job, points, filled)
    }

    pub fn bezier(&mut self, points: &[Point], filled: bool) -> Result<()> {
        self.engine.bezier(&mut self.job, points, filled)
    }

    pub fn polyline(&mut self, points: &[Point]) -> Result<()> {
        self.engine.polyline(&mut self.job, points)
    }

    pub fn comment(&mut self, text: &str) -> Result<()> {
        self.engine.comment(&mut self.job, text)
    }

    /// Applies one event; returns the writer once the job ends.
    pub fn dispatch(&mut self, event: &Event) -> Result<Option<W>> {
        tracing::trace!(?event, "dispatch");
        match event {
            Event::BeginJob => self.begin_job()?,
            Event::EndJob => return self.end_job().map(Some),
            Event::BeginGraph(info) => self.begin_graph(info)?,
            Event::EndGraph => self.end_graph()?,
            Event::BeginLayer(info) => self.begin_layer(info)?,
            Event::EndLayer => self.end_layer()?,
            Event::BeginPage(info) => self.begin_page(info)?,
            Event::EndPage => self.end_page()?,
            Event::BeginCluster(info) => self.begin_cluster(info)?,
            Event::EndCluster => self.end_cluster()?,
            Event::BeginNode(info) => self.begin_node(info)?,
            Event::EndNode => self.end_node()?,
            Event::BeginEdge(info) => self.begin_edge(info)?,
            Event::EndEdge => self.end_edge()?,
            Event::BeginAnchor(info) => self.begin_anchor(info)?,
            Event::EndAnchor => self.end_anchor()?,
            Event::Text { at, para } => self.text(*at, para)?,
            Event::Ellipse { points, filled } => self.ellipse(points, *filled)?,
            Event::Polygon { points, filled } => self.polygon(points, *filled)?,
            Event::Bezier { points, filled } => self.bezier(points, *filled)?,
            Event::Polyline { points } => self.polyline(points)?,
            Event::Comment { text } => self.comment(text)?,
        }
        Ok(None)
    }
}

/// Renders a complete event sequence into bytes.
///
/// A sequence without `end_job` is finalized after its last event.
pub fn render_events(events: &[Event], options: JobOptions) -> Result<Vec<u8>> {
    let mut renderer = Renderer::new(Vec::new(), options);
    for event in events {
        if let Some(out) = renderer.dispatch(event)? {
            return Ok(out);
        }
    }
    renderer.end_job()
}

/// Renders uncompressed SVG text.
pub fn render_to_string(events: &[Event], mut options: JobOptions) -> Result<String> {
    options.format = crate::features::OutputFormat::Svg;
    let bytes = render_events(events, options)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_output(bytes: &[u8], output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, bytes)?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Color;

    fn options() -> JobOptions {
        let mut options = JobOptions::default();
        options.user = "tester".to_string();
        options
    }

    #[test]
    fn node_inherits_graph_paint_unless_overridden() {
        let mut renderer = Renderer::new(Vec::new(), options());
        renderer.begin_job().unwrap();
        let mut graph = GraphInfo::new("G", 10, 10);
        graph.paint = Some(PaintState {
            pen: Color::named("red"),
            ..PaintState::default()
        });
        renderer.begin_graph(&graph).unwrap();
        renderer
            .begin_node(&NodeInfo {
                id: 1,
                name: "a".to_string(),
                paint: None,
            })
            .unwrap();
        assert_eq!(renderer.job().obj().map(|o| o.paint.pen.clone()), Some(Color::named("red")));
        renderer.end_node().unwrap();
        renderer
            .begin_node(&NodeInfo {
                id: 2,
                name: "b".to_string(),
                paint: Some(PaintState::default()),
            })
            .unwrap();
        assert_eq!(renderer.job().obj().map(|o| o.paint.pen.clone()), Some(Color::named("black")));
    }

    #[test]
    fn end_job_discards_contexts_left_open() {
        let mut renderer = Renderer::new(Vec::new(), options());
        renderer.begin_job().unwrap();
        renderer.begin_graph(&GraphInfo::new("G", 10, 10)).unwrap();
        renderer.begin_page(&PageInfo::default()).unwrap();
        let svg = String::from_utf8(renderer.end_job().unwrap()).unwrap();
        assert_eq!(renderer.job().depth(), 0);
        assert!(svg.contains("<g id=\"graph0\" class=\"graph\""));
        assert!(matches!(
            renderer.end_job(),
            Err(Error::EmptyStack { kind: ObjKind::Document })
        ));
    }

    #[test]
    fn end_without_begin_is_an_error() {
        let mut renderer = Renderer::new(Vec::new(), options());
        assert!(matches!(renderer.end_node(), Err(Error::EmptyStack { kind: ObjKind::Node })));
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let events: Vec<Event> = serde_json::from_str(
            r#"[
                {"event": "begin_job"},
                {"event": "begin_node", "id": 3, "name": "n"},
                {"event": "ellipse", "points": [[0, 0], {"x": 1, "y": 2}], "filled": true},
                {"event": "end_node"}
            ]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[1], Event::BeginNode(info) if info.id == 3 && info.name == "n"));
        assert_eq!(
            events[2],
            Event::Ellipse {
                points: vec![Point::new(0.0, 0.0), Point::new(1.0, 2.0)],
                filled: true
            }
        );
    }

    #[test]
    fn unterminated_script_is_finalized() {
        let events = vec![Event::BeginJob, Event::Comment { text: "hi".to_string() }];
        let svg = render_to_string(&events, options()).unwrap();
        assert!(svg.ends_with("<!-- hi -->\n"));
    }
}
