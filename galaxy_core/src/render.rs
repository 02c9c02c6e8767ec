//! Drawing primitives handed to whatever viewer hosts the catalog.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::GalaxyCatalog,
    color::Rgba,
    jumps::JumpEdge,
    selection::Selection,
    space::Position,
    stellar::StarId,
};

const BASE_THICKNESS: f32 = 0.00005;
const HIGHLIGHT_SCALE: f32 = 10.0;
const HIGHLIGHT_LIGHTEN: u8 = 48;

/// Line width for a jump band, keyed off the band colour's alpha.
pub fn edge_thickness(color: Rgba) -> f32 {
    match color.a {
        a if a < 200 => 0.00010,
        a if a < 208 => 0.00012,
        a if a < 216 => 0.00015,
        _ => BASE_THICKNESS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarPoint {
    pub star: StarId,
    pub position: Position,
    pub color: Rgba,
    pub pixels: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpLine {
    pub from: StarId,
    pub to: StarId,
    pub endpoints: [Position; 2],
    pub color: Rgba,
    pub thickness: f32,
    pub highlighted: bool,
}

impl JumpLine {
    fn new(edge: &JumpEdge, endpoints: [Position; 2]) -> Self {
        Self {
            from: edge.from,
            to: edge.to,
            endpoints,
            color: edge.color,
            thickness: edge_thickness(edge.color),
            highlighted: false,
        }
    }

    pub fn touches(&self, star: StarId) -> bool {
        self.from == star || self.to == star
    }

    /// Band colour, lightened while highlighted.
    pub fn display_color(&self) -> Rgba {
        if self.highlighted {
            self.color.lightened(HIGHLIGHT_LIGHTEN)
        } else {
            self.color
        }
    }
}

/// Receives primitives from a [`RenderScene`].
pub trait RenderSink {
    fn points(&mut self, points: &[StarPoint]);
    fn lines(&mut self, lines: &[JumpLine]);
    fn look_at(&mut self, target: Position);
}

/// Points for every star and lines for every jump edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderScene {
    pub points: Vec<StarPoint>,
    pub lines: Vec<JumpLine>,
    pub selected: Option<StarId>,
}

impl RenderScene {
    pub fn from_catalog(catalog: &GalaxyCatalog) -> Self {
        let points = catalog
            .stars()
            .iter()
            .map(|star| StarPoint {
                star: star.id,
                position: star.position,
                color: star.bright_color,
                pixels: star.pixels,
            })
            .collect();
        let lines = catalog
            .graph()
            .edges()
            .iter()
            .filter_map(|edge| {
                let from = catalog.star(edge.from)?.position;
                let to = catalog.star(edge.to)?.position;
                Some(JumpLine::new(edge, [from, to]))
            })
            .collect();
        Self {
            points,
            lines,
            selected: None,
        }
    }

    /// Marks and thickens the lines touching `star`; clears any previous highlight.
    pub fn highlight(&mut self, star: Option<StarId>) {
        for line in &mut self.lines {
            let touches = star.is_some_and(|id| line.touches(id));
            let base = edge_thickness(line.color);
            line.thickness = if touches {
                base * HIGHLIGHT_SCALE
            } else {
                base
            };
            line.highlighted = touches;
        }
        self.selected = star;
    }

    /// Sends the whole scene, then the camera target of `selection` if any.
    pub fn emit<S: RenderSink + ?Sized>(&self, sink: &mut S, selection: Option<&Selection>) {
        sink.points(&self.points);
        sink.lines(&self.lines);
        if let Some(selection) = selection {
            sink.look_at(selection.camera_target);
        }
    }

    pub fn highlighted_lines(&self) -> impl Iterator<Item = &JumpLine> + '_ {
        self.lines.iter().filter(|line| line.highlighted)
    }
}
