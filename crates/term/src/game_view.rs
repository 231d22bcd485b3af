//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O). The same [`BoardLayout`] drives drawing and mouse
//! hit-testing, so a click always lands on the tile that was drawn there.

use crate::core::{GameSnapshot, TileSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Palette, Phase, TileId, BOARD_COLUMNS};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub enabled: bool,
    pub client_count: u16,
    pub controller_id: Option<usize>,
    pub streaming_count: u16,
    pub listen_port: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const FRAME_BG: Rgb = Rgb::new(24, 24, 32);
const TILE_BACK: Rgb = Rgb::new(55, 58, 75);
const TILE_INK: Rgb = Rgb::new(15, 15, 20);

/// Padding between the frame border and the tile grid.
const PAD: u16 = 1;

/// Where the board frame and its tiles sit on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub frame_x: u16,
    pub frame_y: u16,
    pub frame_w: u16,
    pub frame_h: u16,
    tile_w: u16,
    tile_h: u16,
    gap_x: u16,
    gap_y: u16,
    tile_count: u16,
}

impl BoardLayout {
    fn grid_origin(&self) -> (u16, u16) {
        (self.frame_x + 1 + PAD, self.frame_y + 1 + PAD)
    }

    /// Top-left corner of a tile, or `None` past the end of the board.
    pub fn tile_origin(&self, id: TileId) -> Option<(u16, u16)> {
        let id = id as u16;
        if id >= self.tile_count {
            return None;
        }
        let cols = BOARD_COLUMNS as u16;
        let (gx, gy) = self.grid_origin();
        Some((
            gx + (id % cols) * (self.tile_w + self.gap_x),
            gy + (id / cols) * (self.tile_h + self.gap_y),
        ))
    }

    pub fn tile_size(&self) -> (u16, u16) {
        (self.tile_w, self.tile_h)
    }

    /// Tile under a terminal cell. Gaps and the frame hit nothing.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<TileId> {
        let (gx, gy) = self.grid_origin();
        let dx = x.checked_sub(gx)?;
        let dy = y.checked_sub(gy)?;

        let pitch_x = self.tile_w + self.gap_x;
        let pitch_y = self.tile_h + self.gap_y;
        if dx % pitch_x >= self.tile_w || dy % pitch_y >= self.tile_h {
            return None;
        }

        let col = dx / pitch_x;
        let row = dy / pitch_y;
        if col >= BOARD_COLUMNS as u16 {
            return None;
        }
        let id = row * BOARD_COLUMNS as u16 + col;
        (id < self.tile_count).then_some(id as TileId)
    }
}

/// A lightweight terminal renderer for the pairs board.
pub struct GameView {
    /// Tile width in terminal columns.
    tile_w: u16,
    /// Tile height in terminal rows.
    tile_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 6x3 reads roughly square with typical terminal glyphs.
        Self {
            tile_w: 6,
            tile_h: 3,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(tile_w: u16, tile_h: u16) -> Self {
        Self {
            tile_w: tile_w.max(1),
            tile_h: tile_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Board placement for `tile_count` tiles in `viewport`.
    pub fn layout(&self, tile_count: usize, viewport: Viewport) -> BoardLayout {
        let cols = BOARD_COLUMNS as u16;
        let tile_count = tile_count as u16;
        let rows = tile_count.div_ceil(cols).max(1);
        let (gap_x, gap_y) = (1, 1);

        let frame_w = 2 + 2 * PAD + cols * self.tile_w + (cols - 1) * gap_x;
        let frame_h = 2 + 2 * PAD + rows * self.tile_h + (rows - 1) * gap_y;

        let frame_x = viewport.width.saturating_sub(frame_w) / 2;
        let frame_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        BoardLayout {
            frame_x,
            frame_y,
            frame_w,
            frame_h,
            tile_w: self.tile_w,
            tile_h: self.tile_h,
            gap_x,
            gap_y,
            tile_count,
        }
    }

    /// Render into an existing framebuffer.
    ///
    /// Allocation-free once the framebuffer has reached the viewport size.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        cursor: Option<TileId>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        self.render_into_with_adapter(snap, cursor, None, viewport, fb);
    }

    pub fn render_into_with_adapter(
        &self,
        snap: &GameSnapshot,
        cursor: Option<TileId>,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let layout = self.layout(snap.tiles.len(), viewport);
        let frame_bg = CellStyle::new(Rgb::new(80, 80, 90), FRAME_BG);
        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

        fb.fill_rect(
            layout.frame_x + 1,
            layout.frame_y + 1,
            layout.frame_w.saturating_sub(2),
            layout.frame_h.saturating_sub(2),
            ' ',
            frame_bg,
        );
        fb.draw_box(
            layout.frame_x,
            layout.frame_y,
            layout.frame_w,
            layout.frame_h,
            border,
        );

        for tile in &snap.tiles {
            self.draw_tile(fb, &layout, tile);
        }

        if let Some(id) = cursor {
            self.draw_cursor(fb, &layout, id);
        }

        self.draw_side_panel(fb, snap, adapter, viewport, &layout);

        if snap.won {
            self.draw_win_overlay(fb, snap, &layout);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        cursor: Option<TileId>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    pub fn render_with_adapter(
        &self,
        snap: &GameSnapshot,
        cursor: Option<TileId>,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with_adapter(snap, cursor, adapter, viewport, &mut fb);
        fb
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, layout: &BoardLayout, tile: &TileSnapshot) {
        let Some((x, y)) = layout.tile_origin(tile.id) else {
            return;
        };
        let color = palette_rgb(tile.symbol.color());
        let (mark_x, mark_y) = (x + (self.tile_w - 1) / 2, y + (self.tile_h - 1) / 2);

        if tile.matched {
            let style = CellStyle::new(color, color.darken()).dim();
            fb.fill_rect(x, y, self.tile_w, self.tile_h, ' ', style);
            fb.put_char(mark_x, mark_y, tile.symbol.letter(), style);
        } else if tile.face_up {
            let style = CellStyle::new(TILE_INK, color).bold();
            fb.fill_rect(x, y, self.tile_w, self.tile_h, ' ', style);
            fb.put_char(mark_x, mark_y, tile.symbol.letter(), style);
        } else {
            let style = CellStyle::new(Rgb::new(110, 115, 140), TILE_BACK);
            fb.fill_rect(x, y, self.tile_w, self.tile_h, ' ', style);
            fb.put_char(mark_x, mark_y, '·', style);
        }
    }

    fn draw_cursor(&self, fb: &mut FrameBuffer, layout: &BoardLayout, id: TileId) {
        let Some((x, y)) = layout.tile_origin(id) else {
            return;
        };
        let style = CellStyle::new(Rgb::new(255, 255, 255), FRAME_BG).bold();
        let mid = y + (self.tile_h - 1) / 2;
        fb.put_char(x - 1, mid, '▸', style);
        fb.put_char(x + self.tile_w, mid, '◂', style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        layout: &BoardLayout,
    ) {
        let panel_x = layout.frame_x.saturating_add(layout.frame_w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 14 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let dim = value.dim();

        let mut y = layout.frame_y;
        fb.put_str(panel_x, y, "MOVES", label);
        y += 1;
        fb.put_u32(panel_x, y, snap.move_count, value);
        y += 2;

        fb.put_str(panel_x, y, "PAIRS", label);
        y += 1;
        let x = fb.put_u32(panel_x, y, snap.pairs_found as u32, value);
        let x = fb.put_str(x, y, " / ", dim);
        fb.put_u32(x, y, snap.total_pairs as u32, value);
        y += 2;

        fb.put_str(panel_x, y, "STATUS", label);
        y += 1;
        fb.put_str(panel_x, y, phase_text(snap.phase), value);
        y += 2;

        fb.put_str(panel_x, y, "AI", label);
        y += 1;
        match adapter {
            Some(st) if st.enabled => {
                let x = fb.put_str(panel_x, y, "ON ", value);
                fb.put_u32(x, y, st.client_count as u32, dim);
                y += 1;
                fb.put_str(panel_x, y, "CTRL", value);
                match st.controller_id {
                    Some(id) => fb.put_u32(panel_x + 5, y, id as u32, value),
                    None => fb.put_str(panel_x + 5, y, "-", value),
                };
                y += 1;
                fb.put_str(panel_x, y, "OBS", value);
                fb.put_u32(panel_x + 5, y, st.streaming_count as u32, value);
                if let Some(port) = st.listen_port {
                    y += 1;
                    fb.put_str(panel_x, y, "PORT", dim);
                    fb.put_u32(panel_x + 5, y, port as u32, dim);
                }
            }
            _ => {
                fb.put_str(panel_x, y, "OFF", value);
            }
        }
        y += 2;

        if y + 3 < viewport.height {
            fb.put_str(panel_x, y, "ENTER flip", dim);
            fb.put_str(panel_x, y + 1, "N     new game", dim);
            fb.put_str(panel_x, y + 2, "Q     quit", dim);
        }
    }

    fn draw_win_overlay(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &BoardLayout) {
        let w = layout.frame_w.saturating_sub(4);
        let h = 5;
        let x = layout.frame_x + 2;
        let y = layout.frame_y + layout.frame_h.saturating_sub(h) / 2;

        let panel = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0));
        fb.fill_rect(x, y, w, h, ' ', panel);
        fb.draw_box(x, y, w, h, panel);
        fb.put_str_centered(x, w, y + 1, "ALL PAIRS FOUND", panel.bold());

        let moves_w = digit_count(snap.move_count) + " MOVES".len() as u16;
        let mx = x + w.saturating_sub(moves_w) / 2;
        let mx = fb.put_u32(mx, y + 2, snap.move_count, panel);
        fb.put_str(mx, y + 2, " MOVES", panel);

        fb.put_str_centered(x, w, y + 3, "PRESS N TO PLAY AGAIN", panel.dim());
    }
}

fn phase_text(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "PICK A TILE",
        Phase::AwaitingSecondPick => "PICK ANOTHER",
        Phase::Resolving => "CHECKING",
        Phase::Won => "SOLVED",
    }
}

fn digit_count(mut n: u32) -> u16 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

pub fn palette_rgb(color: Palette) -> Rgb {
    match color {
        Palette::Red => Rgb::new(239, 68, 68),
        Palette::Blue => Rgb::new(59, 130, 246),
        Palette::Green => Rgb::new(34, 197, 94),
        Palette::Yellow => Rgb::new(234, 179, 8),
        Palette::Purple => Rgb::new(168, 85, 247),
        Palette::Pink => Rgb::new(236, 72, 153),
        Palette::Indigo => Rgb::new(99, 102, 241),
        Palette::Orange => Rgb::new(249, 115, 22),
    }
}
