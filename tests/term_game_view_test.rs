use tui_pairs::core::GameState;
use tui_pairs::term::{palette_rgb, AdapterStatusView, AnchorY, FrameBuffer, GameView, Viewport};
use tui_pairs::types::{GameEvent, Symbol};

const A: Symbol = Symbol(0);
const B: Symbol = Symbol(1);

fn screen_text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            all.push(fb.get(x, y).unwrap().ch);
        }
        all.push('\n');
    }
    all
}

fn tile_center(view: &GameView, tiles: usize, vp: Viewport, id: u8) -> (u16, u16) {
    let layout = view.layout(tiles, vp);
    let (x, y) = layout.tile_origin(id).unwrap();
    let (w, h) = layout.tile_size();
    (x + (w - 1) / 2, y + (h - 1) / 2)
}

#[test]
fn term_view_renders_border_corners() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default();

    // 4 columns of 6-wide tiles, 1-cell gaps and padding, plus border => 31x19.
    let fb = view.render(&snap, None, Viewport::new(31, 19));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(30, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 18).unwrap().ch, '└');
    assert_eq!(fb.get(30, 18).unwrap().ch, '┘');
}

#[test]
fn term_view_centers_board_by_default_on_tall_viewports() {
    let snap = GameState::new(1).snapshot();
    let fb = GameView::default().render(&snap, None, Viewport::new(31, 29));
    // start_y = (29 - 19) / 2 = 5
    assert_eq!(fb.get(0, 5).unwrap().ch, '┌');
}

#[test]
fn term_view_can_anchor_board_to_top() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, None, Viewport::new(31, 29));
    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
}

#[test]
fn face_down_tiles_hide_their_symbol() {
    let snap = GameState::with_layout(&[A, B, A, B]).unwrap().snapshot();
    let view = GameView::default();
    let vp = Viewport::new(40, 20);
    let fb = view.render(&snap, None, vp);

    let (cx, cy) = tile_center(&view, 4, vp, 0);
    assert_eq!(fb.get(cx, cy).unwrap().ch, '·');
    assert!(!screen_text(&fb).contains('A'));
}

#[test]
fn face_up_tile_shows_letter_on_palette_color() {
    let mut gs = GameState::with_layout(&[A, B, A, B]).unwrap();
    gs.apply_mut(GameEvent::Select(1));
    let snap = gs.snapshot();

    let view = GameView::default();
    let vp = Viewport::new(40, 20);
    let fb = view.render(&snap, None, vp);

    let (cx, cy) = tile_center(&view, 4, vp, 1);
    let cell = fb.get(cx, cy).unwrap();
    assert_eq!(cell.ch, 'B');
    assert_eq!(cell.style.bg, palette_rgb(B.color()));
    assert!(cell.style.bold);
}

#[test]
fn matched_tiles_are_dimmed() {
    let mut gs = GameState::with_layout(&[A, B, A, B]).unwrap();
    gs.apply_mut(GameEvent::Select(0));
    gs.apply_mut(GameEvent::Select(2));
    gs.apply_mut(GameEvent::Resolve { generation: 0 });
    let snap = gs.snapshot();

    let view = GameView::default();
    let vp = Viewport::new(40, 20);
    let fb = view.render(&snap, None, vp);

    let (cx, cy) = tile_center(&view, 4, vp, 2);
    let cell = fb.get(cx, cy).unwrap();
    assert_eq!(cell.ch, 'A');
    assert!(cell.style.dim);
}

#[test]
fn cursor_brackets_the_selected_tile() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default();
    let vp = Viewport::new(31, 19);
    let fb = view.render(&snap, Some(5), vp);

    let layout = view.layout(16, vp);
    let (x, y) = layout.tile_origin(5).unwrap();
    assert_eq!(fb.get(x - 1, y + 1).unwrap().ch, '▸');
    assert_eq!(fb.get(x + 6, y + 1).unwrap().ch, '◂');
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut gs = GameState::with_layout(&[A, B, A, B]).unwrap();
    gs.apply_mut(GameEvent::Select(0));
    gs.apply_mut(GameEvent::Select(2));
    gs.apply_mut(GameEvent::Resolve { generation: 0 });

    let fb = GameView::default().render(&gs.snapshot(), None, Viewport::new(64, 20));
    let all = screen_text(&fb);
    assert!(all.contains("MOVES"));
    assert!(all.contains("PAIRS"));
    assert!(all.contains("1 / 2"));
    assert!(all.contains("PICK A TILE"));
    assert!(all.contains("OFF"));
}

#[test]
fn narrow_viewport_skips_side_panel() {
    let snap = GameState::new(1).snapshot();
    let fb = GameView::default().render(&snap, None, Viewport::new(31, 19));
    assert!(!screen_text(&fb).contains("MOVES"));
}

#[test]
fn win_overlay_reports_moves() {
    let mut gs = GameState::with_layout(&[A, B, B, A]).unwrap();
    for (first, second) in [(0, 1), (0, 3), (1, 2)] {
        gs.apply_mut(GameEvent::Select(first));
        gs.apply_mut(GameEvent::Select(second));
        gs.apply_mut(GameEvent::Resolve { generation: 0 });
    }
    assert!(gs.won());

    let fb = GameView::default().render(&gs.snapshot(), None, Viewport::new(40, 20));
    let all = screen_text(&fb);
    assert!(all.contains("ALL PAIRS FOUND"));
    assert!(all.contains("3 MOVES"));
    assert!(all.contains("PRESS N TO PLAY AGAIN"));
}

#[test]
fn term_view_renders_adapter_status_when_enabled() {
    let snap = GameState::new(1).snapshot();
    let adapter = AdapterStatusView {
        enabled: true,
        client_count: 2,
        controller_id: Some(1),
        streaming_count: 1,
        listen_port: Some(7788),
    };

    let fb = GameView::default().render_with_adapter(
        &snap,
        None,
        Some(&adapter),
        Viewport::new(70, 24),
    );
    let all = screen_text(&fb);
    assert!(all.contains("ON 2"));
    assert!(all.contains("CTRL 1"));
    assert!(all.contains("PORT 7788"));
}

#[test]
fn clicks_map_back_to_drawn_tiles() {
    let snap = GameState::new(1).snapshot();
    let view = GameView::default();
    let vp = Viewport::new(80, 24);
    let layout = view.layout(snap.tiles.len(), vp);

    for id in 0..16u8 {
        let (cx, cy) = tile_center(&view, 16, vp, id);
        assert_eq!(layout.hit_test(cx, cy), Some(id));
    }
    assert_eq!(layout.hit_test(layout.frame_x, layout.frame_y), None);
}
