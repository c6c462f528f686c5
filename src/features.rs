//! Capability descriptors surfaced to whatever selects this renderer.

use crate::color::KNOWN_COLORS;
use crate::ir::Point;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// What the renderer does natively.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        /// Output Y axis points down; the renderer flips layout coordinates.
        const Y_GOES_DOWN    = 1 << 0;
        /// Page scale/rotation/translation are emitted as a transform.
        const DOES_TRANSFORM = 1 << 1;
        /// Text labels are emitted as text elements.
        const DOES_LABELS    = 1 << 2;
        /// Clickable regions via anchors.
        const DOES_MAPS      = 1 << 3;
        /// Anchors accept a target frame.
        const DOES_TARGETS   = 1 << 4;
        const DOES_TOOLTIPS  = 1 << 5;
    }
}

bitflags::bitflags! {
    /// Properties of the produced byte stream.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct DeviceFlags: u32 {
        const BINARY_FORMAT     = 1 << 0;
        const COMPRESSED_FORMAT = 1 << 1;
        const DOES_TRUECOLOR    = 1 << 2;
    }
}

/// Color representation the renderer wants colors resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    RgbaByte,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderFeatures {
    pub flags: RenderFlags,
    /// Default padding around the drawing, in graph units.
    pub default_pad: f64,
    pub known_colors: &'static [&'static str],
    pub color_type: ColorType,
    /// Loader used for user-supplied shape images.
    pub image_loader: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct DeviceFeatures {
    pub flags: DeviceFlags,
    /// Default margin in points.
    pub default_margin: Point,
    /// Default page size in points; zero means unpaged.
    pub default_pagesize: Point,
    pub default_dpi: Point,
}

pub const RENDER_FEATURES: RenderFeatures = RenderFeatures {
    flags: RenderFlags::Y_GOES_DOWN
        .union(RenderFlags::DOES_TRANSFORM)
        .union(RenderFlags::DOES_LABELS)
        .union(RenderFlags::DOES_MAPS)
        .union(RenderFlags::DOES_TARGETS)
        .union(RenderFlags::DOES_TOOLTIPS),
    default_pad: 4.0,
    known_colors: KNOWN_COLORS,
    color_type: ColorType::RgbaByte,
    image_loader: "svg",
};

pub const SVG_DEVICE: DeviceFeatures = DeviceFeatures {
    flags: DeviceFlags::DOES_TRUECOLOR,
    default_margin: Point::new(0.0, 0.0),
    default_pagesize: Point::new(0.0, 0.0),
    default_dpi: Point::new(72.0, 72.0),
};

pub const SVGZ_DEVICE: DeviceFeatures = DeviceFeatures {
    flags: DeviceFlags::BINARY_FORMAT
        .union(DeviceFlags::COMPRESSED_FORMAT)
        .union(DeviceFlags::DOES_TRUECOLOR),
    default_margin: Point::new(0.0, 0.0),
    default_pagesize: Point::new(0.0, 0.0),
    default_dpi: Point::new(72.0, 72.0),
};

/// Output variant; chosen once when the document opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Svg,
    Svgz,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.split(':').next().unwrap_or(name);
        match name.trim().to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "svgz" => Some(Self::Svgz),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Svgz => "svgz",
        }
    }

    pub fn device(self) -> &'static DeviceFeatures {
        match self {
            OutputFormat::Svg => &SVG_DEVICE,
            OutputFormat::Svgz => &SVGZ_DEVICE,
        }
    }
}

/// One installable output type, named `<device>:<renderer>`.
#[derive(Debug, Clone, Copy)]
pub struct FormatDescriptor {
    pub format: OutputFormat,
    pub name: &'static str,
    pub quality: i32,
    pub device: &'static DeviceFeatures,
}

pub fn installed_formats() -> [FormatDescriptor; 2] {
    [
        FormatDescriptor {
            format: OutputFormat::Svg,
            name: "svg:svg",
            quality: 1,
            device: &SVG_DEVICE,
        },
        FormatDescriptor {
            format: OutputFormat::Svgz,
            name: "svgz:svg",
            quality: 1,
            device: &SVGZ_DEVICE,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_advertises_svg_capabilities() {
        let flags = RENDER_FEATURES.flags;
        assert!(flags.contains(RenderFlags::Y_GOES_DOWN | RenderFlags::DOES_TOOLTIPS));
        assert!(flags.contains(RenderFlags::DOES_MAPS | RenderFlags::DOES_TARGETS));
        assert_eq!(RENDER_FEATURES.default_pad, 4.0);
        assert_eq!(RENDER_FEATURES.known_colors.len(), KNOWN_COLORS.len());
    }

    #[test]
    fn only_compressed_variant_is_binary() {
        assert!(!SVG_DEVICE.flags.contains(DeviceFlags::BINARY_FORMAT));
        assert!(OutputFormat::Svgz.device().flags.contains(DeviceFlags::COMPRESSED_FORMAT));
        assert!(SVGZ_DEVICE.flags.contains(DeviceFlags::BINARY_FORMAT | DeviceFlags::COMPRESSED_FORMAT));
        for desc in installed_formats() {
            assert_eq!(desc.device.default_dpi, Point::new(72.0, 72.0));
            assert_eq!(OutputFormat::from_name(desc.name), Some(desc.format));
            assert_eq!(desc.format.device().flags, desc.device.flags);
        }
    }

    #[test]
    fn format_names() {
        assert_eq!(OutputFormat::from_name("SVGZ"), Some(OutputFormat::Svgz));
        assert_eq!(OutputFormat::from_name("png"), None);
        assert_eq!(OutputFormat::Svgz.extension(), "svgz");
    }
}
