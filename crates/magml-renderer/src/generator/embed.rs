//! Video, map and raw XHTML embeds.

use std::fmt::Write;

use super::Generator;
use super::args::{comma_arguments, skip_spaces, skip_word};
use crate::directive::BlockDirective;
use crate::escape::{escape_html, escape_script_string};
use crate::fragment::check_well_formed;
use crate::node::Node;
use crate::sink::OutputSink;

const VIDEO_EMBED_PREFIX: &str = "https://www.youtube.com/embed/";
const DEFAULT_VIDEO_WIDTH: u32 = 425;
const DEFAULT_VIDEO_HEIGHT: u32 = 350;

const DEFAULT_MAP_WIDTH: &str = "100%";
const DEFAULT_MAP_HEIGHT: &str = "20em";
const DEFAULT_MAP_ZOOM: &str = "13";
const DEFAULT_MAP_TYPE: &str = "r";

/// Arguments before the repeated marker groups.
const MAP_FIXED_ARGUMENTS: usize = 6;
/// Latitude, longitude, label, URL.
const MAP_MARKER_ARGUMENTS: usize = 4;

/// Why a video or map directive was rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(super) enum EmbedError {
    #[error("xyt markup content is not specified.")]
    MissingVideo,

    #[error("{0} cannot be interpreted as a width. Write it with ASCII digits.")]
    Width(String),

    #[error("{0} cannot be interpreted as a height. Write it with ASCII digits.")]
    Height(String),

    #[error("{0} cannot be interpreted as xyt markup content.")]
    TrailingVideoContent(String),

    #[error("gm/gmp/gml markup contains content that cannot be interpreted.")]
    MapContent,

    #[error("gmp markup requires exactly 6 arguments.")]
    PointArity,

    #[error("gm/gml markup requires at least 6 arguments.")]
    MapArity,

    #[error("gm/gml markup requires 6+4*n arguments.")]
    MarkerArity,

    #[error("{0} is not a recognized map type.")]
    MapType(String),

    #[error("{0} cannot be interpreted as a coordinate.")]
    Coordinate(String),

    #[error("{0} cannot be interpreted as a zoom level.")]
    Zoom(String),
}

#[derive(Debug, PartialEq, Eq)]
pub(super) struct Video<'a> {
    id: &'a str,
    width: u32,
    height: u32,
}

impl<'a> Video<'a> {
    /// Parse `ID [WIDTH [HEIGHT]]`.
    pub(super) fn parse(node: &'a Node) -> Result<Self, EmbedError> {
        let src = node
            .leading_text()
            .map(str::trim_end)
            .filter(|s| !s.is_empty())
            .ok_or(EmbedError::MissingVideo)?;
        if node.children.len() > 1 {
            return Err(EmbedError::TrailingVideoContent(node.inner_text()));
        }

        let id_end = skip_word(src, 0);
        let width_start = skip_spaces(src, id_end);
        let width_end = skip_word(src, width_start);
        let height_start = skip_spaces(src, width_end);
        let height_end = skip_word(src, height_start);

        let width = parse_size(&src[width_start..width_end], DEFAULT_VIDEO_WIDTH)
            .map_err(EmbedError::Width)?;
        let height = parse_size(&src[height_start..height_end], DEFAULT_VIDEO_HEIGHT)
            .map_err(EmbedError::Height)?;

        let rest = src[height_end..].trim_start();
        if !rest.is_empty() {
            return Err(EmbedError::TrailingVideoContent(rest.to_owned()));
        }

        Ok(Self {
            id: &src[..id_end],
            width,
            height,
        })
    }
}

/// Positive pixel size; empty means `default`. The error carries the token.
fn parse_size(token: &str, default: u32) -> Result<u32, String> {
    if token.is_empty() {
        return Ok(default);
    }
    match token.parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(token.to_owned()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum MapShape {
    /// `gm`: markers.
    Markers,
    /// `gmp`: a single point, no markers.
    Point,
    /// `gml`: markers joined by a line.
    Polyline,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) struct Marker<'a> {
    latitude: &'a str,
    longitude: &'a str,
    label: &'a str,
    url: &'a str,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) struct Map<'a> {
    shape: MapShape,
    width: &'a str,
    height: &'a str,
    latitude: &'a str,
    longitude: &'a str,
    zoom: &'a str,
    map_type: &'a str,
    markers: Vec<Marker<'a>>,
}

impl<'a> Map<'a> {
    /// Parse `width, height, lat, lon, zoom, type (, lat, lon, label, url)*`.
    pub(super) fn parse(shape: MapShape, args: &'a [String]) -> Result<Self, EmbedError> {
        if shape == MapShape::Point && args.len() != MAP_FIXED_ARGUMENTS {
            return Err(EmbedError::PointArity);
        }
        if args.len() < MAP_FIXED_ARGUMENTS {
            return Err(EmbedError::MapArity);
        }
        if (args.len() - MAP_FIXED_ARGUMENTS) % MAP_MARKER_ARGUMENTS != 0 {
            return Err(EmbedError::MarkerArity);
        }
        let (fixed, groups) = args.split_at(MAP_FIXED_ARGUMENTS);

        let map_type = match fixed[5].trim() {
            "" => DEFAULT_MAP_TYPE,
            t if t.chars().count() == 1 => t,
            _ => return Err(EmbedError::MapType(fixed[5].clone())),
        };
        let zoom = match fixed[4].trim() {
            "" => DEFAULT_MAP_ZOOM,
            z if z.parse::<u8>().is_ok() => z,
            _ => return Err(EmbedError::Zoom(fixed[4].clone())),
        };

        let markers = groups
            .chunks_exact(MAP_MARKER_ARGUMENTS)
            .map(|group| {
                Ok(Marker {
                    latitude: coordinate(&group[0])?,
                    longitude: coordinate(&group[1])?,
                    label: group[2].trim(),
                    url: group[3].trim(),
                })
            })
            .collect::<Result<Vec<_>, EmbedError>>()?;

        Ok(Self {
            shape,
            width: non_empty_or(&fixed[0], DEFAULT_MAP_WIDTH),
            height: non_empty_or(&fixed[1], DEFAULT_MAP_HEIGHT),
            latitude: coordinate(&fixed[2])?,
            longitude: coordinate(&fixed[3])?,
            zoom,
            map_type,
            markers,
        })
    }

    /// Script call that builds the map on page initialisation.
    fn script(&self, id: &str) -> String {
        let mut js = String::new();
        js.push_str("\nvar t = function (event) {\n");
        let _ = write!(
            js,
            "createGM('{id}','{}','{}','{}',{},{},{},[",
            escape_script_string(self.map_type),
            escape_script_string(self.width),
            escape_script_string(self.height),
            self.latitude,
            self.longitude,
            self.zoom,
        );
        for marker in &self.markers {
            let _ = write!(
                js,
                "{{ latitude:{},longitude:{},explanation:'{}',url:'{}'}},",
                marker.latitude,
                marker.longitude,
                escape_script_string(marker.label),
                escape_script_string(marker.url),
            );
        }
        let polyline = self.shape == MapShape::Polyline;
        let _ = write!(js, "],{polyline});}}\n");
        js.push_str("$(document).on('pageinit', t);\nallInitializers.push(t);\n");
        js
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    match value.trim() {
        "" => default,
        v => v,
    }
}

fn coordinate(value: &str) -> Result<&str, EmbedError> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(trimmed),
        _ => Err(EmbedError::Coordinate(value.to_owned())),
    }
}

/// List label for the marker at `index`: `A`, `B`, ... then numbers.
fn marker_label(index: usize) -> String {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or_else(|| (index + 1).to_string(), |i| char::from(b'A' + i).to_string())
}

impl<S: OutputSink> Generator<'_, S> {
    pub(super) fn video(&mut self, node: &Node) {
        let video = match Video::parse(node) {
            Ok(video) => video,
            Err(err) => {
                self.block_error(&err.to_string());
                return;
            }
        };
        let src = format!("{VIDEO_EMBED_PREFIX}{}", video.id);
        let width = video.width.to_string();
        let height = video.height.to_string();

        let opened = self.open_slot(false);
        self.sink.open_element("div", &[("class", "youtube")]);
        self.sink.open_element(
            "iframe",
            &[
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("src", src.as_str()),
                ("frameborder", "0"),
                ("allowfullscreen", "allowfullscreen"),
            ],
        );
        self.sink.close_element();
        self.sink.close_element();
        self.close_slot(opened);
    }

    pub(super) fn map(&mut self, directive: BlockDirective, node: &Node) {
        let shape = match directive {
            BlockDirective::MapPoint => MapShape::Point,
            BlockDirective::MapPolyline => MapShape::Polyline,
            _ => MapShape::Markers,
        };
        let Some(args) = comma_arguments(node) else {
            self.block_error(&EmbedError::MapContent.to_string());
            return;
        };
        let map = match Map::parse(shape, &args) {
            Ok(map) => map,
            Err(err) => {
                self.block_error(&err.to_string());
                return;
            }
        };
        let id = format!("gm{}", self.next_embed_id());
        tracing::trace!(id = %id, markers = map.markers.len(), "map embed");

        let opened = self.open_slot(false);
        if self.options.compatibility {
            self.sink.write_raw("<it:leafletRequied />");
        }
        self.sink.open_element("div", &[("class", "gmframe")]);
        self.sink.open_element("div", &[("id", id.as_str())]);
        self.sink.close_element();
        self.sink
            .open_element("script", &[("type", "text/javascript")]);
        self.sink.write_raw(&map.script(&id));
        self.sink.close_element();
        if !map.markers.is_empty() {
            self.sink.open_element("ul", &[("class", "gmlist")]);
            for (index, marker) in map.markers.iter().enumerate() {
                self.sink.open_element("li", &[]);
                self.sink.write_text(&format!("{}. ", marker_label(index)));
                if marker.url.is_empty() {
                    self.sink.write_text(marker.label);
                } else {
                    self.sink
                        .text_element("a", &[("href", marker.url)], marker.label);
                }
                self.sink.close_element();
            }
            self.sink.close_element();
        }
        self.sink.close_element();
        self.close_slot(opened);
    }

    pub(super) fn xhtml_fragment(&mut self, content: &str) {
        if let Err(err) = check_well_formed(content) {
            tracing::debug!(error = %err, "rejected xhtml fragment");
            self.block_error(&format!(
                "xhtml markup content cannot be interpreted as an XML document fragment. Details: {err}"
            ));
            return;
        }

        let opened = self.open_slot(false);
        if self.options.preview {
            self.sink.write_raw(content);
        } else if self.options.compatibility {
            self.sink.write_raw("<it:xhtml>");
            self.sink.write_raw(&escape_html(content));
            self.sink.write_raw("</it:xhtml>");
        } else {
            self.sink.open_element("div", &[("class", "xhtmlSource")]);
            self.sink.write_raw(&escape_html(content));
            self.sink.close_element();
        }
        self.close_slot(opened);
    }
}
