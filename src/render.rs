//! Rendering: replays a [`Frame`] on a 2D canvas.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It receives a finished frame and the three page surfaces and produces
//! pixels. It holds no geometry and mutates no engine state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use wasm_bindgen::{Clamped, JsValue};
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement, ImageData};

use crate::book::Slot;
use crate::config::{CurlConfig, Rgba};
use crate::consts::SHADOW12_COLOR;
use crate::engine::Frame;
use crate::geom::Point;
use crate::mesh::{self, Mesh};
use crate::scene::{ClipOp, ClipTarget, Outline, Paint, PathEl, Scene, Shadow};
use crate::synth::{self, LowerPage};
use crate::viewport::Viewport;

/// Alpha of the 1 px outline drawn around the page back.
const OUTLINE_ALPHA: f64 = 0.25;

/// Half-extent of the rectangle used to invert a clip outline.
const CLIP_EXTENT: f64 = 1.0e5;

/// Draw the frame.
///
/// `slots` holds the host-rendered page surfaces, indexed by [`Slot::index`].
/// `lower` is a page held as RGB565 pixels; it is composed and drawn when it
/// sits in the slot under the curl.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    frame: &Frame,
    slots: &[Option<HtmlCanvasElement>; 3],
    lower: Option<&mut LowerPage>,
    viewport: &Viewport,
    config: &CurlConfig,
) -> Result<(), JsValue> {
    let (width, height) = viewport.surface_size();
    let origin = viewport.to_view(viewport.origin);

    ctx.set_transform(1.0, 0.0, 0.0, 1.0, origin.x, origin.y)?;
    ctx.clear_rect(0.0, 0.0, width, height);

    let Some(scene) = &frame.scene else {
        return draw_page(ctx, slots, Slot::Current, width, height, config.page_color);
    };

    // Layer 1: the page revealed under the curl, and the shadow it catches.
    match lower {
        Some(lower) if lower.slot() == frame.under_slot => draw_lower(ctx, lower, frame, origin)?,
        _ => draw_page(ctx, slots, frame.under_slot, width, height, config.page_color)?,
    }
    draw_shadow(ctx, &scene.shadow3, scene)?;

    // Everything else stays outside the revealed region.
    ctx.save();
    trace_inverted(ctx, &scene.next)?;
    ctx.clip_with_canvas_winding_rule(CanvasWindingRule::Evenodd);

    // Layer 2: the current page, texture bent by the mesh.
    fill(ctx, &scene.front, config.page_color)?;
    if let Some(texture) = &slots[frame.curl_slot.index()] {
        draw_mesh(ctx, &frame.mesh, texture)?;
    }

    // Layer 3: fold shadows, the page back and its lustre.
    draw_shadow(ctx, &scene.shadow1, scene)?;
    draw_shadow(ctx, &scene.shadow2, scene)?;
    draw_shadow(ctx, &scene.shadow4, scene)?;
    fill(ctx, &scene.back, config.page_color)?;
    draw_shadow(ctx, &scene.lustre_end, scene)?;
    draw_shadow(ctx, &scene.lustre_start, scene)?;
    ctx.restore();

    ctx.begin_path();
    trace(ctx, &scene.back)?;
    ctx.set_line_width(1.0);
    ctx.set_stroke_style_str(&Rgba { a: OUTLINE_ALPHA, ..SHADOW12_COLOR }.to_css());
    ctx.stroke();

    Ok(())
}

// =============================================================
// Pages
// =============================================================

fn draw_page(
    ctx: &CanvasRenderingContext2d,
    slots: &[Option<HtmlCanvasElement>; 3],
    slot: Slot,
    width: f64,
    height: f64,
    page_color: Rgba,
) -> Result<(), JsValue> {
    ctx.set_fill_style_str(&page_color.to_css());
    ctx.fill_rect(0.0, 0.0, width, height);
    if let Some(surface) = &slots[slot.index()] {
        ctx.draw_image_with_html_canvas_element(surface, 0.0, 0.0)?;
    }
    Ok(())
}

/// Expand the revealed part of an RGB565 page and blit it at the page
/// origin. `put_image_data` ignores the context transform.
fn draw_lower(ctx: &CanvasRenderingContext2d, lower: &mut LowerPage, frame: &Frame, origin: Point) -> Result<(), JsValue> {
    let (width, height) = lower.size();
    let too_large = |_: std::num::TryFromIntError| JsValue::from_str("lower page too large");
    let (width, height) = (u32::try_from(width).map_err(too_large)?, u32::try_from(height).map_err(too_large)?);

    let composed = lower.compose(&frame.points, frame.upside_down).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let bytes = synth::to_rgba_bytes(composed);
    let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&bytes), width, height)?;
    ctx.put_image_data(&image, origin.x, origin.y)
}

/// Draw `texture` warped by the mesh, one affine-mapped triangle at a time.
fn draw_mesh(ctx: &CanvasRenderingContext2d, mesh: &Mesh, texture: &HtmlCanvasElement) -> Result<(), JsValue> {
    for [i0, i1, i2] in mesh.triangles() {
        let src = [mesh.source[i0], mesh.source[i1], mesh.source[i2]];
        let dst = [mesh.vertices[i0], mesh.vertices[i1], mesh.vertices[i2]];
        let Some([a, b, c, d, e, f]) = mesh::affine(src, dst) else {
            continue;
        };

        ctx.save();
        ctx.begin_path();
        ctx.move_to(dst[0].x, dst[0].y);
        ctx.line_to(dst[1].x, dst[1].y);
        ctx.line_to(dst[2].x, dst[2].y);
        ctx.close_path();
        ctx.clip();
        ctx.transform(a, b, c, d, e, f)?;
        ctx.draw_image_with_html_canvas_element(texture, 0.0, 0.0)?;
        ctx.restore();
    }
    Ok(())
}

// =============================================================
// Paths
// =============================================================

fn trace(ctx: &CanvasRenderingContext2d, outline: &Outline) -> Result<(), JsValue> {
    for el in outline {
        match *el {
            PathEl::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathEl::LineTo(p) => ctx.line_to(p.x, p.y),
            PathEl::QuadTo(ctrl, end) => ctx.quadratic_curve_to(ctrl.x, ctrl.y, end.x, end.y),
            PathEl::Arc { center, radius, start_deg, sweep_deg } => {
                if radius > 0.0 {
                    ctx.arc_with_anticlockwise(
                        center.x,
                        center.y,
                        radius,
                        start_deg.to_radians(),
                        (start_deg + sweep_deg).to_radians(),
                        sweep_deg < 0.0,
                    )?;
                }
            }
            PathEl::Close => ctx.close_path(),
        }
    }
    Ok(())
}

/// Trace `outline` inside a large rectangle; an even-odd clip on the
/// result keeps everything outside the outline.
fn trace_inverted(ctx: &CanvasRenderingContext2d, outline: &Outline) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.rect(-CLIP_EXTENT, -CLIP_EXTENT, 2.0 * CLIP_EXTENT, 2.0 * CLIP_EXTENT);
    trace(ctx, outline)
}

fn fill(ctx: &CanvasRenderingContext2d, outline: &Outline, color: Rgba) -> Result<(), JsValue> {
    ctx.begin_path();
    trace(ctx, outline)?;
    ctx.set_fill_style_str(&color.to_css());
    ctx.fill();
    Ok(())
}

// =============================================================
// Shadows
// =============================================================

fn draw_shadow(ctx: &CanvasRenderingContext2d, shadow: &Shadow, scene: &Scene) -> Result<(), JsValue> {
    ctx.save();

    if let Some(clip) = shadow.clip {
        let against = match clip.against {
            ClipTarget::NextPage => &scene.next,
            ClipTarget::PageBack => &scene.back,
        };
        match clip.op {
            ClipOp::Intersect => {
                ctx.begin_path();
                trace(ctx, against)?;
                ctx.clip();
            }
            ClipOp::Difference => {
                trace_inverted(ctx, against)?;
                ctx.clip_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
            }
        }
    }

    let painted = set_paint(ctx, &shadow.paint)?;
    if painted {
        ctx.begin_path();
        trace(ctx, &shadow.outline)?;
        ctx.fill();
    }

    ctx.restore();
    Ok(())
}

/// Install the gradient as fill style. Returns false when there is nothing
/// to paint (a radial gradient of zero radius).
fn set_paint(ctx: &CanvasRenderingContext2d, paint: &Paint) -> Result<bool, JsValue> {
    let gradient = match *paint {
        Paint::Linear { start, end, from, to } => {
            let g = ctx.create_linear_gradient(start.x, start.y, end.x, end.y);
            g.add_color_stop(0.0, &from.to_css())?;
            g.add_color_stop(1.0, &to.to_css())?;
            g
        }
        Paint::Radial { center, radius, from, to } => {
            if !(radius > 0.0 && radius.is_finite()) {
                return Ok(false);
            }
            let g = ctx.create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)?;
            g.add_color_stop(0.0, &from.to_css())?;
            g.add_color_stop(1.0, &to.to_css())?;
            g
        }
    };
    ctx.set_fill_style_canvas_gradient(&gradient);
    Ok(true)
}
