//! SVG rendering of a session: locations under walls, players on top.

use std::fmt::Write as _;

use lbrnt_core::{Dir, LocationCatalog, Player, Pos, Session};

pub const MARGIN_PX: i32 = 10;
pub const CELL_PX: i32 = 24;
pub const STROKE_PX: i32 = 2;

/// Pixel box of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct CellRect {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl CellRect {
    fn of(pos: Pos) -> Self {
        let x0 = MARGIN_PX + pos.x * CELL_PX;
        let y0 = MARGIN_PX + pos.y * CELL_PX;
        Self { x0, y0, x1: x0 + CELL_PX, y1: y0 + CELL_PX }
    }

    fn center(self) -> (i32, i32) {
        ((self.x0 + self.x1) / 2, (self.y0 + self.y1) / 2)
    }
}

pub fn render(session: &Session, catalog: &LocationCatalog) -> String {
    let maze = session.maze();
    let width = maze.width() as i32;
    let height = maze.height() as i32;
    let width_px = MARGIN_PX * 2 + width * CELL_PX;
    let height_px = MARGIN_PX * 2 + height * CELL_PX;

    let mut out = String::with_capacity((width_px * height_px) as usize / 4);
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width_px}" height="{height_px}" viewBox="0 0 {width_px} {height_px}">"#
    );
    let _ = writeln!(
        out,
        r#"<rect x="0" y="0" width="{width_px}" height="{height_px}" fill="white"/>"#
    );

    out.push_str("<g id=\"grid\" stroke=\"#dddddd\" stroke-width=\"1\" fill=\"none\">\n");
    for x in 0..=width {
        let gx = MARGIN_PX + x * CELL_PX;
        line(&mut out, gx, MARGIN_PX, gx, MARGIN_PX + height * CELL_PX);
    }
    for y in 0..=height {
        let gy = MARGIN_PX + y * CELL_PX;
        line(&mut out, MARGIN_PX, gy, MARGIN_PX + width * CELL_PX, gy);
    }
    out.push_str("</g>\n");

    if !session.locations().is_empty() {
        out.push_str("<g id=\"locations\">\n");
        for location in session.locations() {
            let (noun, fill) = catalog
                .profile(location.kind())
                .map_or(("location", "#888888"), |profile| (profile.noun, profile.fill_color));
            let _ = writeln!(
                out,
                r#"<g id="{noun}" fill="{fill}" fill-opacity="0.25" stroke="none">"#
            );
            for &cell in location.cells() {
                let rect = CellRect::of(cell);
                let _ = writeln!(
                    out,
                    r#"<rect x="{}" y="{}" width="{CELL_PX}" height="{CELL_PX}"/>"#,
                    rect.x0, rect.y0
                );
            }
            out.push_str("</g>\n");
        }
        out.push_str("</g>\n");
    }

    out.push_str("<g id=\"coords\" opacity=\"0.08\">\n");
    for pos in maze.positions() {
        let (cx, cy) = CellRect::of(pos).center();
        text(&mut out, cx, cy, &format!("{},{}", pos.x, pos.y), "#000000", 6.0, "");
    }
    out.push_str("</g>\n");

    let _ = writeln!(
        out,
        r#"<g id="walls" stroke="black" stroke-width="{STROKE_PX}" fill="none">"#
    );
    for pos in maze.positions() {
        let rect = CellRect::of(pos);
        if maze.has_wall(pos, Dir::Up) {
            line(&mut out, rect.x0, rect.y0, rect.x1, rect.y0);
        }
        if maze.has_wall(pos, Dir::Left) {
            line(&mut out, rect.x0, rect.y0, rect.x0, rect.y1);
        }
    }
    out.push_str("</g>\n");

    if !session.players().is_empty() {
        out.push_str("<g id=\"players\">\n");
        render_players(&mut out, session.players());
        out.push_str("</g>\n");
    }

    let _ = writeln!(
        out,
        r#"<rect x="{MARGIN_PX}" y="{MARGIN_PX}" width="{}" height="{}" fill="none" stroke="black" stroke-width="{STROKE_PX}"/>"#,
        width * CELL_PX,
        height * CELL_PX
    );
    out.push_str("</svg>\n");
    out
}

/// Players sharing a cell are spread left to right in name order.
fn render_players(out: &mut String, players: &[Player]) {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| a.pos.cmp(&b.pos).then_with(|| a.name.cmp(&b.name)));

    for group in sorted.chunk_by(|a, b| a.pos == b.pos) {
        let count = group.len() as i32;
        let rect = CellRect::of(group[0].pos);
        let (_, cy) = rect.center();
        let radius = (CELL_PX / 3 / count).max(2);
        for (slot, player) in group.iter().enumerate() {
            let cx = rect.x0 + CELL_PX * (slot as i32 + 1) / (count + 1);
            let _ = writeln!(
                out,
                r#"<circle cx="{cx}" cy="{cy}" r="{radius}" fill="{}" stroke="black"/>"#,
                escape(&player.color)
            );
            let initial = player.name.chars().next().map_or('?', |ch| ch.to_ascii_uppercase());
            let size = (radius * 3 / 2) as f32;
            text(out, cx, cy, &initial.to_string(), "white", size, r#" font-weight="bold""#);
        }
    }
}

fn line(out: &mut String, x0: i32, y0: i32, x1: i32, y1: i32) {
    let _ = writeln!(out, r#"<line x1="{x0}" y1="{y0}" x2="{x1}" y2="{y1}"/>"#);
}

fn text(out: &mut String, x: i32, y: i32, body: &str, fill: &str, size: f32, extra: &str) {
    let _ = writeln!(
        out,
        r#"<text x="{x}" y="{y}" fill="{fill}" font-size="{size}" text-anchor="middle" dominant-baseline="central"{extra}>{}</text>"#,
        escape(body)
    );
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
