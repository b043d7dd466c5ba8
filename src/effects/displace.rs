use crate::{
    effects::channel::Channel,
    foundation::{
        core::{Image, ImageView, PixelFormat},
        error::{DispError, DispResult},
    },
};

/// Channel selection and strength for [`displace`].
///
/// Each axis offset is `((component - 128) * scale) / 256` pixels, so a map value of
/// 128 means "no displacement" and a negative scale inverts the direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DisplaceParams {
    pub component_x: Channel,
    pub component_y: Channel,
    pub scale_x: i32,
    pub scale_y: i32,
}

impl Default for DisplaceParams {
    fn default() -> Self {
        Self {
            component_x: Channel::Red,
            component_y: Channel::Red,
            scale_x: 20,
            scale_y: 20,
        }
    }
}

impl DisplaceParams {
    /// Parameters that leave the target unchanged.
    pub fn identity() -> Self {
        Self {
            scale_x: 0,
            scale_y: 0,
            ..Self::default()
        }
    }
}

/// Resample `target` through the offsets encoded in `map`.
///
/// `map` must be BGR, `target` BGRA, and both must share width and height. Every
/// output pixel pulls one source pixel (all four channels) from the target, with the
/// source coordinate clamped to the last valid row and column.
///
/// `x` is the column index and `y` the row index: `component_x`/`scale_x` shift the
/// horizontal source coordinate, `component_y`/`scale_y` the vertical one.
pub fn displace(
    map: ImageView<'_>,
    target: ImageView<'_>,
    params: DisplaceParams,
) -> DispResult<Image> {
    check_inputs(&map, &target)?;

    let (w, h) = target.dimensions();
    let mut out = Image::new(w, h, PixelFormat::Bgra8)?;
    if w == 0 || h == 0 {
        return Ok(out);
    }

    let max_x = i64::from(w) - 1;
    let max_y = i64::from(h) - 1;

    for y in 0..h {
        for x in 0..w {
            let m = map.pixel(x, y);
            let px = [m[0], m[1], m[2]];

            let sx = displaced(x, params.component_x.component(px), params.scale_x);
            let sy = displaced(y, params.component_y.component(px), params.scale_y);
            let src = target.pixel(sx.clamp(0, max_x) as u32, sy.clamp(0, max_y) as u32);

            out.pixel_mut(x, y).copy_from_slice(src);
        }
    }

    Ok(out)
}

/// Like [`displace`], but stores the result in `out` only on success.
///
/// A rejected call leaves whatever `out` held before untouched.
pub fn displace_into(
    map: ImageView<'_>,
    target: ImageView<'_>,
    params: DisplaceParams,
    out: &mut Option<Image>,
) -> DispResult<()> {
    let image = displace(map, target, params)?;
    *out = Some(image);
    Ok(())
}

/// Numeric-selector entry point: components are 0 (blue), 1 (green) or 2 (red).
pub fn displace_indexed(
    map: ImageView<'_>,
    target: ImageView<'_>,
    component_x: i32,
    component_y: i32,
    scale_x: i32,
    scale_y: i32,
) -> DispResult<Image> {
    let (component_x, component_y) =
        match (Channel::try_from(component_x), Channel::try_from(component_y)) {
            (Ok(cx), Ok(cy)) => (cx, cy),
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(
                    component_x,
                    component_y,
                    "displace: component selectors must be in [0, 2]"
                );
                return Err(err);
            }
        };

    displace(
        map,
        target,
        DisplaceParams {
            component_x,
            component_y,
            scale_x,
            scale_y,
        },
    )
}

// Truncating division: the fractional part moves toward zero.
#[inline]
fn displaced(pos: u32, component: u8, scale: i32) -> i64 {
    i64::from(pos) + (i64::from(component) - 128) * i64::from(scale) / 256
}

fn check_inputs(map: &ImageView<'_>, target: &ImageView<'_>) -> DispResult<()> {
    if map.dimensions() != target.dimensions() {
        let (mw, mh) = map.dimensions();
        let (tw, th) = target.dimensions();
        tracing::warn!(mw, mh, tw, th, "displace: map and target sizes differ");
        return Err(DispError::format(format!(
            "map is {mw}x{mh} but target is {tw}x{th}; they must match"
        )));
    }
    if !target.format().has_alpha() {
        tracing::warn!(format = ?target.format(), "displace: target must be BGRA");
        return Err(DispError::format(
            "displacement target must be in the transparent BGRA format",
        ));
    }
    if map.format().has_alpha() {
        tracing::warn!(format = ?map.format(), "displace: map must be BGR");
        return Err(DispError::format(
            "displacement map must be in the opaque BGR format",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/displace.rs"]
mod tests;
