use crate::foundation::{
    core::{Image, ImageView, Point},
    error::{DispError, DispResult},
};

/// Straight-alpha blend of one BGRA pixel onto one BGR pixel.
///
/// The result is truncated per channel. A zero alpha returns `bg` as-is.
#[inline]
pub fn blend_px(bg: [u8; 3], fg: [u8; 4]) -> [u8; 3] {
    let opacity = f64::from(fg[3]) / 255.0;
    if opacity <= 0.0 {
        return bg;
    }

    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = (f64::from(bg[c]) * (1.0 - opacity) + f64::from(fg[c]) * opacity) as u8;
    }
    out
}

/// Composite a BGRA `foreground` onto a BGR `background`, with the foreground's
/// origin placed at `location` in background coordinates.
///
/// The result has the background's size and is always BGR: the foreground's alpha
/// is consumed as blend weight and never written. Foreground parts falling outside
/// the background (including negative offsets) are ignored.
pub fn overlay(
    background: ImageView<'_>,
    foreground: ImageView<'_>,
    location: Point,
) -> DispResult<Image> {
    if background.format().has_alpha() {
        tracing::warn!(format = ?background.format(), "overlay: background must be BGR");
        return Err(DispError::format("overlay background must be opaque BGR"));
    }
    if !foreground.format().has_alpha() {
        tracing::warn!(format = ?foreground.format(), "overlay: foreground must be BGRA");
        return Err(DispError::format(
            "overlay foreground must carry an alpha channel (BGRA)",
        ));
    }

    let mut out = background.to_image();

    let (bw, bh) = (i64::from(background.width()), i64::from(background.height()));
    let (fw, fh) = (i64::from(foreground.width()), i64::from(foreground.height()));
    let (lx, ly) = (i64::from(location.x), i64::from(location.y));

    for y in ly.max(0)..bh {
        let fy = y - ly;
        if fy >= fh {
            break;
        }

        for x in lx.max(0)..bw {
            let fx = x - lx;
            if fx >= fw {
                break;
            }

            let f = foreground.pixel(fx as u32, fy as u32);
            if f[3] == 0 {
                continue;
            }

            let dst = out.pixel_mut(x as u32, y as u32);
            let blended = blend_px([dst[0], dst[1], dst[2]], [f[0], f[1], f[2], f[3]]);
            dst.copy_from_slice(&blended);
        }
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
