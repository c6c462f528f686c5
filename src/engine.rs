use crate::error::{Error, Result};
use crate::escape::xml_string;
use crate::features::OutputFormat;
use crate::ir::{AnchorInfo, LayerInfo, Point, TextPara};
use crate::job::Job;
use crate::number::{fmt_2, fmt_g};
use crate::sink::Compression;
use crate::style::{encode_font, encode_paint};
use std::io::Write;

/// Operations a renderer implements for one output grammar.
///
/// The current object (identity and paint) is the top of the job's context
/// stack; the dispatcher pushes it before a `begin_*` call and pops it after
/// the matching `end_*`.
pub trait RenderEngine {
    fn begin_job<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn end_job<W: Write>(&self, job: &mut Job<W>) -> Result<W>;
    fn begin_graph<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn end_graph<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn begin_layer<W: Write>(&self, job: &mut Job<W>, layer: &LayerInfo) -> Result<()>;
    fn end_layer<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn begin_page<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn end_page<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn begin_cluster<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn end_cluster<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn begin_node<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn end_node<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn begin_edge<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn end_edge<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn begin_anchor<W: Write>(&self, job: &mut Job<W>, anchor: &AnchorInfo) -> Result<()>;
    fn end_anchor<W: Write>(&self, job: &mut Job<W>) -> Result<()>;
    fn textpara<W: Write>(&self, job: &mut Job<W>, p: Point, para: &TextPara) -> Result<()>;
    fn ellipse<W: Write>(&self, job: &mut Job<W>, a: &[Point], filled: bool) -> Result<()>;
    fn polygon<W: Write>(&self, job: &mut Job<W>, a: &[Point], filled: bool) -> Result<()>;
    fn bezier<W: Write>(&self, job: &mut Job<W>, a: &[Point], filled: bool) -> Result<()>;
    fn polyline<W: Write>(&self, job: &mut Job<W>, a: &[Point]) -> Result<()>;
    fn comment<W: Write>(&self, job: &mut Job<W>, text: &str) -> Result<()>;
}

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Writes SVG 1.0 markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderEngine;

impl SvgRenderEngine {
    fn grstyle<W: Write>(&self, job: &mut Job<W>, filled: bool, op: &'static str) -> Result<()> {
        let style = encode_paint(&job.require_obj(op)?.paint, filled);
        write!(job.sink, " style=\"{style}\"")?;
        Ok(())
    }

    fn group_title<W: Write>(&self, job: &mut Job<W>, prefix: &str, op: &'static str) -> Result<()> {
        let obj = job.require_obj(op)?;
        let (id, name) = (obj.id, obj.name.clone());
        write!(job.sink, "<g id=\"{prefix}{id}\" class=\"{prefix}\">")?;
        job.fputs("<title>")?;
        job.fputs(&xml_string(&name))?;
        job.fputs("</title>\n")
    }
}

fn check_points(primitive: &'static str, a: &[Point], ok: bool, expected: &'static str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::Geometry {
            primitive,
            expected,
            found: a.len(),
        })
    }
}

/// `x,y` with the Y axis flipped.
fn pt(p: Point) -> String {
    format!("{},{}", fmt_g(p.x), fmt_g(-p.y))
}

impl RenderEngine for SvgRenderEngine {
    fn begin_job<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        let compression = match job.format() {
            OutputFormat::Svgz => Compression::Zlib,
            OutputFormat::Svg => Compression::None,
        };
        job.sink.init_compression(compression)?;

        job.fputs("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n")?;
        if let Some(sheet) = job.options.stylesheet.clone().filter(|s| !s.is_empty()) {
            job.fputs("<?xml-stylesheet href=\"")?;
            job.fputs(&xml_string(&sheet))?;
            job.fputs("\" type=\"text/css\"?>\n")?;
        }
        job.fputs("<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.0//EN\"\n")?;
        job.fputs(" \"http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd\"")?;
        // SVG 1.0 DTD omits the xlink namespace attribute.
        write!(
            job.sink,
            " [\n <!ATTLIST svg xmlns:xlink CDATA #FIXED \"{XLINK_NS}\">\n]"
        )?;

        let product = job.options.product.clone();
        let user = job.options.user.clone();
        job.fputs(">\n<!-- Generated by ")?;
        job.fputs(&xml_string(&product.name))?;
        job.fputs(" version ")?;
        job.fputs(&xml_string(&product.version))?;
        job.fputs(" (")?;
        job.fputs(&xml_string(&product.build))?;
        job.fputs(")\n     For user: ")?;
        job.fputs(&xml_string(&user))?;
        job.fputs(" -->\n")
    }

    fn end_job<W: Write>(&self, job: &mut Job<W>) -> Result<W> {
        job.sink.fini_compression()
    }

    fn begin_graph<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        let name = job.require_obj("begin_graph")?.name.clone();
        job.fputs("<!--")?;
        if !name.is_empty() {
            job.fputs(" Title: ")?;
            job.fputs(&xml_string(&name))?;
        }
        let (cols, rows) = job.pages;
        writeln!(job.sink, " Pages: {} -->", u64::from(cols) * u64::from(rows))?;

        writeln!(job.sink, "<svg width=\"{}pt\" height=\"{}pt\"", job.width, job.height)?;
        let canvas = job.canvas;
        write!(
            job.sink,
            " viewBox=\"{} {} {} {}\"",
            fmt_2(canvas.ll.x),
            fmt_2(canvas.ll.y),
            fmt_2(canvas.ur.x),
            fmt_2(canvas.ur.y)
        )?;
        write!(job.sink, " xmlns=\"{SVG_NS}\"")?;
        write!(job.sink, " xmlns:xlink=\"{XLINK_NS}\"")?;
        job.fputs(">\n")
    }

    fn end_graph<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        job.fputs("</svg>\n")
    }

    fn begin_layer<W: Write>(&self, job: &mut Job<W>, layer: &LayerInfo) -> Result<()> {
        job.fputs("<g id=\"")?;
        job.fputs(&xml_string(&layer.name))?;
        job.fputs("\" class=\"layer\">\n")
    }

    fn end_layer<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        job.fputs("</g>\n")
    }

    fn begin_page<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        // A page of the graph is still rendered as the graph group.
        write!(job.sink, "<g id=\"graph{}\" class=\"graph\"", job.view_num)?;
        writeln!(
            job.sink,
            " transform=\"scale({} {}) rotate({}) translate({} {})\">",
            fmt_g(job.scale.x),
            fmt_g(job.scale.y),
            -i64::from(job.rotation),
            fmt_g(job.translation.x),
            fmt_g(-job.translation.y)
        )?;
        let name = job.graph_name().to_string();
        if !name.is_empty() {
            job.fputs("<title>")?;
            job.fputs(&xml_string(&name))?;
            job.fputs("</title>\n")?;
        }
        Ok(())
    }

    fn end_page<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        job.fputs("</g>\n")
    }

    fn begin_cluster<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        self.group_title(job, "cluster", "begin_cluster")
    }

    fn end_cluster<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        job.fputs("</g>\n")
    }

    fn begin_node<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        self.group_title(job, "node", "begin_node")
    }

    fn end_node<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        job.fputs("</g>\n")
    }

    fn begin_edge<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        let obj = job.require_obj("begin_edge")?;
        let id = obj.id;
        let (tail, head) = obj.endpoints.clone().unwrap_or_default();
        let edgeop = if job.directed {
            "&#45;&gt;"
        } else {
            "&#45;&#45;"
        };
        write!(job.sink, "<g id=\"edge{id}\" class=\"edge\">")?;
        job.fputs("<title>")?;
        // Tail and head are escaped separately; the edge operator is already markup.
        job.fputs(&xml_string(&tail))?;
        job.fputs(edgeop)?;
        job.fputs(&xml_string(&head))?;
        job.fputs("</title>\n")
    }

    fn end_edge<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        job.fputs("</g>\n")
    }

    fn begin_anchor<W: Write>(&self, job: &mut Job<W>, anchor: &AnchorInfo) -> Result<()> {
        job.fputs("<a")?;
        let attrs = [
            ("xlink:href", &anchor.href),
            ("xlink:title", &anchor.tooltip),
            ("target", &anchor.target),
        ];
        for (attr, value) in attrs {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                write!(job.sink, " {attr}=\"{}\"", xml_string(value))?;
            }
        }
        job.fputs(">\n")
    }

    fn end_anchor<W: Write>(&self, job: &mut Job<W>) -> Result<()> {
        job.fputs("</a>\n")
    }

    fn textpara<W: Write>(&self, job: &mut Job<W>, p: Point, para: &TextPara) -> Result<()> {
        let pen = job.require_obj("textpara")?.paint.pen.clone();
        let style = encode_font(para, job.options.font_names, &pen);
        write!(job.sink, "<text text-anchor=\"{}\"", para.just.text_anchor())?;
        write!(job.sink, " x=\"{}\" y=\"{}\"", fmt_g(p.x), fmt_g(-p.y))?;
        write!(job.sink, " style=\"{style}\">")?;
        job.fputs(&xml_string(&para.text))?;
        job.fputs("</text>\n")
    }

    fn ellipse<W: Write>(&self, job: &mut Job<W>, a: &[Point], filled: bool) -> Result<()> {
        check_points("ellipse", a, a.len() == 2, "exactly 2")?;
        let (center, corner) = (a[0], a[1]);
        job.fputs("<ellipse")?;
        self.grstyle(job, filled, "ellipse")?;
        write!(job.sink, " cx=\"{}\" cy=\"{}\"", fmt_g(center.x), fmt_g(-center.y))?;
        write!(
            job.sink,
            " rx=\"{}\" ry=\"{}\"",
            fmt_g((corner.x - center.x).abs()),
            fmt_g((corner.y - center.y).abs())
        )?;
        job.fputs("/>\n")
    }

    fn polygon<W: Write>(&self, job: &mut Job<W>, a: &[Point], filled: bool) -> Result<()> {
        check_points("polygon", a, !a.is_empty(), "at least 1")?;
        job.fputs("<polygon")?;
        self.grstyle(job, filled, "polygon")?;
        job.fputs(" points=\"")?;
        for p in a {
            write!(job.sink, "{} ", pt(*p))?;
        }
        // Repeat the first point; some viewers drop the implicit closing segment.
        job.fputs(&pt(a[0]))?;
        job.fputs("\"/>\n")
    }

    fn bezier<W: Write>(&self, job: &mut Job<W>, a: &[Point], filled: bool) -> Result<()> {
        check_points("bezier", a, !a.is_empty(), "at least 1")?;
        job.fputs("<path")?;
        self.grstyle(job, filled, "bezier")?;
        job.fputs(" d=\"")?;
        let mut cmd = 'M';
        for (i, p) in a.iter().enumerate() {
            write!(job.sink, "{cmd}{}", pt(*p))?;
            cmd = if i == 0 { 'C' } else { ' ' };
        }
        job.fputs("\"/>\n")
    }

    fn polyline<W: Write>(&self, job: &mut Job<W>, a: &[Point]) -> Result<()> {
        job.fputs("<polyline")?;
        self.grstyle(job, false, "polyline")?;
        job.fputs(" points=\"")?;
        for p in a {
            write!(job.sink, "{} ", pt(*p))?;
        }
        job.fputs("\"/>\n")
    }

    fn comment<W: Write>(&self, job: &mut Job<W>, text: &str) -> Result<()> {
        job.fputs("<!-- ")?;
        job.fputs(&xml_string(text))?;
        job.fputs(" -->\n")
    }
}
