use crate::color::{encode_color, hex_rgb};
use crate::ir::{Color, FontNames, PaintState, PenStyle, TextPara};
use crate::number::{fmt_2, fmt_g};
use std::fmt::Write as _;

/// Pen width that needs no explicit `stroke-width`.
pub const PENWIDTH_NORMAL: f64 = 1.0;
/// `stroke-dasharray` for dashed pens.
pub const DASH_ARRAY: &str = "5,2";
/// `stroke-dasharray` for dotted pens.
pub const DOT_ARRAY: &str = "1,5";
/// Text color SVG applies when no fill is given.
pub const DEFAULT_TEXT_COLOR: &str = "black";

pub fn dash_array(style: PenStyle) -> Option<&'static str> {
    match style {
        PenStyle::Solid => None,
        PenStyle::Dashed => Some(DASH_ARRAY),
        PenStyle::Dotted => Some(DOT_ARRAY),
    }
}

/// Builds the `style` attribute value for a shape.
pub fn encode_paint(paint: &PaintState, filled: bool) -> String {
    let mut out = String::from("fill:");
    if filled {
        out.push_str(&encode_color(&paint.fill));
    } else {
        out.push_str("none");
    }
    out.push_str(";stroke:");
    out.push_str(&encode_color(&paint.pen));
    if paint.pen_width != PENWIDTH_NORMAL {
        let _ = write!(out, ";stroke-width:{}", fmt_g(paint.pen_width));
    }
    if let Some(pattern) = dash_array(paint.pen_style) {
        let _ = write!(out, ";stroke-dasharray:{pattern}");
    }
    out.push(';');
    out
}

/// Which alias fields name the font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AliasNames {
    PostScript,
    Generic,
}

impl From<FontNames> for AliasNames {
    fn from(scheme: FontNames) -> Self {
        match scheme {
            FontNames::Ps => AliasNames::PostScript,
            FontNames::Svg | FontNames::Native => AliasNames::Generic,
        }
    }
}

/// Builds the `style` attribute value for a text run drawn with `pen`.
pub fn encode_font(para: &TextPara, scheme: FontNames, pen: &Color) -> String {
    let mut out = String::new();
    match &para.postscript_alias {
        Some(alias) => {
            let family = match AliasNames::from(scheme) {
                AliasNames::PostScript => alias.name.as_str(),
                AliasNames::Generic => alias.family.as_str(),
            };
            let _ = write!(out, "font-family:{family};");
            if let Some(weight) = &alias.weight {
                let _ = write!(out, "font-weight:{weight};");
            }
            if let Some(stretch) = &alias.stretch {
                let _ = write!(out, "font-stretch:{stretch};");
            }
            if let Some(style) = &alias.style {
                let _ = write!(out, "font-style:{style};");
            }
        }
        None => {
            let _ = write!(out, "font-family:{};", para.font_name);
        }
    }
    let _ = write!(out, "font-size:{};", fmt_2(para.font_size));
    if let Some(fill) = text_fill(pen) {
        let _ = write!(out, "fill:{fill};");
    }
    out
}

/// Fill token for text, or `None` when SVG's default already matches.
pub fn text_fill(pen: &Color) -> Option<String> {
    match pen {
        Color::Named(name) if name.eq_ignore_ascii_case(DEFAULT_TEXT_COLOR) => None,
        Color::Named(name) => Some(name.clone()),
        Color::Rgba([r, g, b, _]) => Some(hex_rgb(*r, *g, *b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::PostscriptAlias;

    fn paint(width: f64, style: PenStyle) -> PaintState {
        PaintState {
            fill: Color::named("red"),
            pen: Color::named("blue"),
            pen_width: width,
            pen_style: style,
        }
    }

    #[test]
    fn unfilled_shapes_use_none() {
        assert_eq!(encode_paint(&paint(1.0, PenStyle::Solid), false), "fill:none;stroke:blue;");
        assert_eq!(encode_paint(&paint(1.0, PenStyle::Solid), true), "fill:red;stroke:blue;");
    }

    #[test]
    fn stroke_width_only_when_not_normal() {
        assert!(!encode_paint(&paint(PENWIDTH_NORMAL, PenStyle::Solid), true).contains("stroke-width"));
        assert_eq!(
            encode_paint(&paint(2.5, PenStyle::Solid), true),
            "fill:red;stroke:blue;stroke-width:2.5;"
        );
        assert!(encode_paint(&paint(0.0, PenStyle::Solid), true).contains(";stroke-width:0;"));
    }

    #[test]
    fn dash_patterns() {
        assert_eq!(
            encode_paint(&paint(1.0, PenStyle::Dashed), false),
            "fill:none;stroke:blue;stroke-dasharray:5,2;"
        );
        assert_eq!(
            encode_paint(&paint(3.0, PenStyle::Dotted), false),
            "fill:none;stroke:blue;stroke-width:3;stroke-dasharray:1,5;"
        );
        assert_eq!(dash_array(PenStyle::Solid), None);
    }

    #[test]
    fn transparent_colors_encode_as_none() {
        let state = PaintState {
            fill: Color::Rgba([9, 9, 9, 0]),
            pen: Color::transparent(),
            ..PaintState::default()
        };
        assert_eq!(encode_paint(&state, true), "fill:none;stroke:none;");
    }

    fn aliased() -> TextPara {
        TextPara {
            postscript_alias: Some(PostscriptAlias {
                name: "Helvetica-BoldOblique".to_string(),
                family: "Helvetica,Arial,sans-Serif".to_string(),
                weight: Some("bold".to_string()),
                stretch: Some("condensed".to_string()),
                style: Some("oblique".to_string()),
            }),
            ..TextPara::new("x")
        }
    }

    #[test]
    fn postscript_scheme_uses_alias_name() {
        let style = encode_font(&aliased(), FontNames::Ps, &Color::named("black"));
        assert_eq!(
            style,
            "font-family:Helvetica-BoldOblique;font-weight:bold;font-stretch:condensed;\
             font-style:oblique;font-size:14.00;"
        );
    }

    #[test]
    fn svg_and_native_schemes_agree() {
        let svg = encode_font(&aliased(), FontNames::Svg, &Color::named("black"));
        let native = encode_font(&aliased(), FontNames::Native, &Color::named("black"));
        assert_eq!(svg, native);
        assert!(svg.starts_with("font-family:Helvetica,Arial,sans-Serif;font-weight:bold;"));
    }

    #[test]
    fn missing_alias_fields_are_skipped() {
        let mut para = aliased();
        if let Some(alias) = para.postscript_alias.as_mut() {
            alias.weight = None;
            alias.style = None;
        }
        let style = encode_font(&para, FontNames::Svg, &Color::named("black"));
        assert_eq!(
            style,
            "font-family:Helvetica,Arial,sans-Serif;font-stretch:condensed;font-size:14.00;"
        );
    }

    #[test]
    fn plain_font_name_without_alias() {
        let mut para = TextPara::new("x");
        para.font_size = 10.5;
        let style = encode_font(&para, FontNames::Ps, &Color::named("BLACK"));
        assert_eq!(style, "font-family:Times-Roman;font-size:10.50;");
    }

    #[test]
    fn transparent_pen_keeps_its_rgb_as_text_fill() {
        let pen = Color::Rgba([1, 2, 3, 0]);
        assert_eq!(text_fill(&pen).as_deref(), Some("#010203"));
        assert!(encode_font(&TextPara::new("x"), FontNames::Svg, &pen).ends_with("fill:#010203;"));
        let stroke = PaintState {
            pen,
            ..paint(1.0, PenStyle::Solid)
        };
        assert_eq!(encode_paint(&stroke, false), "fill:none;stroke:none;");
    }

    #[test]
    fn text_fill_for_non_default_colors() {
        let para = TextPara::new("x");
        assert!(encode_font(&para, FontNames::Svg, &Color::named("navy")).ends_with("fill:navy;"));
        assert!(
            encode_font(&para, FontNames::Svg, &Color::Rgba([16, 32, 48, 255]))
                .ends_with("fill:#102030;")
        );
    }
}
