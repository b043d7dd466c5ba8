use super::*;
use crate::foundation::core::Rect;

fn distinct_target(w: u32, h: u32) -> Image {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[x as u8, y as u8, (x * 16 + y) as u8, 200]);
        }
    }
    Image::from_raw(w, h, PixelFormat::Bgra8, data).unwrap()
}

fn uniform_map(w: u32, h: u32, bgr: [u8; 3]) -> Image {
    Image::filled(w, h, PixelFormat::Bgr8, &bgr).unwrap()
}

fn noisy_map(w: u32, h: u32) -> Image {
    let mut state = 0x2545_F491_u32;
    let data = (0..w * h * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    Image::from_raw(w, h, PixelFormat::Bgr8, data).unwrap()
}

fn params(cx: Channel, cy: Channel, sx: i32, sy: i32) -> DisplaceParams {
    DisplaceParams {
        component_x: cx,
        component_y: cy,
        scale_x: sx,
        scale_y: sy,
    }
}

#[test]
fn zero_scale_is_identity_for_any_map_and_channels() {
    let map = noisy_map(7, 5);
    let target = distinct_target(7, 5);
    for cx in Channel::ALL {
        for cy in Channel::ALL {
            let out = displace(map.view(), target.view(), params(cx, cy, 0, 0)).unwrap();
            assert_eq!(out, target);
        }
    }
    let out = displace(map.view(), target.view(), DisplaceParams::identity()).unwrap();
    assert_eq!(out, target);
}

#[test]
fn neutral_red_map_leaves_target_unchanged() {
    let map = uniform_map(4, 4, [0, 0, 128]);
    let target = distinct_target(4, 4);
    let out = displace_indexed(map.view(), target.view(), 2, 2, 20, 20).unwrap();
    assert_eq!(out, target);
}

#[test]
fn positive_deviation_pulls_from_the_right() {
    // (192 - 128) * 8 / 256 = 2
    let map = uniform_map(6, 3, [128, 128, 192]);
    let target = distinct_target(6, 3);
    let out = displace(
        map.view(),
        target.view(),
        params(Channel::Red, Channel::Blue, 8, 8),
    )
    .unwrap();
    for y in 0..3 {
        for x in 0..6 {
            assert_eq!(out.pixel(x, y), target.pixel((x + 2).min(5), y));
        }
    }
}

#[test]
fn negative_scale_inverts_direction() {
    let map = uniform_map(3, 6, [192, 128, 128]);
    let target = distinct_target(3, 6);
    let out = displace(
        map.view(),
        target.view(),
        params(Channel::Green, Channel::Blue, 8, -8),
    )
    .unwrap();
    for y in 0..6 {
        for x in 0..3 {
            assert_eq!(out.pixel(x, y), target.pixel(x, y.saturating_sub(2)));
        }
    }
}

#[test]
fn division_truncates_toward_zero() {
    // (116 - 128) * 20 / 256 = -0.9375 -> 0, (140 - 128) * 20 / 256 = 0.9375 -> 0
    let target = distinct_target(4, 4);
    for value in [116u8, 140u8] {
        let map = uniform_map(4, 4, [value, value, value]);
        let out = displace(
            map.view(),
            target.view(),
            params(Channel::Red, Channel::Green, 20, 20),
        )
        .unwrap();
        assert_eq!(out, target);
    }
}

#[test]
fn extreme_offsets_clamp_to_last_row_and_column() {
    let target = distinct_target(4, 3);

    let far = uniform_map(4, 3, [255, 255, 255]);
    let out = displace(
        far.view(),
        target.view(),
        params(Channel::Red, Channel::Red, 2000, 2000),
    )
    .unwrap();
    for y in 0..3 {
        for x in 0..4 {
            assert_eq!(out.pixel(x, y), target.pixel(3, 2));
        }
    }

    let near = uniform_map(4, 3, [0, 0, 0]);
    let out = displace(
        near.view(),
        target.view(),
        params(Channel::Red, Channel::Red, i32::MAX, i32::MAX),
    )
    .unwrap();
    for y in 0..3 {
        for x in 0..4 {
            assert_eq!(out.pixel(x, y), target.pixel(0, 0));
        }
    }
}

#[test]
fn alpha_is_copied_with_color() {
    let mut target = distinct_target(2, 1);
    target.pixel_mut(1, 0)[3] = 7;
    let map = uniform_map(2, 1, [0, 0, 255]);
    let out = displace(
        map.view(),
        target.view(),
        params(Channel::Red, Channel::Blue, 256, 0),
    )
    .unwrap();
    assert_eq!(out.pixel(0, 0), target.pixel(1, 0));
    assert_eq!(out.pixel(0, 0)[3], 7);
}

#[test]
fn per_pixel_map_values_drive_independent_offsets() {
    let target = distinct_target(3, 1);
    // column 0 pulls +1 (value 160 * 8), column 1 neutral, column 2 pulls -2 (value 64 * 8)
    let map = Image::from_raw(
        3,
        1,
        PixelFormat::Bgr8,
        vec![0, 160, 0, 0, 128, 0, 0, 64, 0],
    )
    .unwrap();
    let out = displace(
        map.view(),
        target.view(),
        params(Channel::Green, Channel::Red, 8, 0),
    )
    .unwrap();
    assert_eq!(out.pixel(0, 0), target.pixel(1, 0));
    assert_eq!(out.pixel(1, 0), target.pixel(1, 0));
    assert_eq!(out.pixel(2, 0), target.pixel(0, 0));
}

#[test]
fn cropped_map_view_is_accepted() {
    let big = uniform_map(10, 4, [0, 0, 128]);
    let map = big.view().crop(Rect::new(3, 0, 4, 4)).unwrap();
    let target = distinct_target(4, 4);
    let out = displace(map, target.view(), DisplaceParams::default()).unwrap();
    assert_eq!(out, target);
}

#[test]
fn invalid_component_is_parameter_error() {
    let map = uniform_map(2, 2, [0, 0, 0]);
    let target = distinct_target(2, 2);
    assert!(matches!(
        displace_indexed(map.view(), target.view(), 3, 0, 1, 1),
        Err(DispError::Parameter(_))
    ));
    assert!(matches!(
        displace_indexed(map.view(), target.view(), 0, -1, 1, 1),
        Err(DispError::Parameter(_))
    ));
}

#[test]
fn mismatched_sizes_are_format_error() {
    let map = uniform_map(3, 2, [0, 0, 0]);
    let target = distinct_target(2, 2);
    assert!(matches!(
        displace(map.view(), target.view(), DisplaceParams::default()),
        Err(DispError::Format(_))
    ));
}

#[test]
fn opaque_target_is_format_error() {
    let map = uniform_map(2, 2, [0, 0, 0]);
    let target = uniform_map(2, 2, [1, 2, 3]);
    assert!(matches!(
        displace(map.view(), target.view(), DisplaceParams::default()),
        Err(DispError::Format(_))
    ));

    let transparent_map = distinct_target(2, 2);
    assert!(matches!(
        displace(
            transparent_map.view(),
            distinct_target(2, 2).view(),
            DisplaceParams::default()
        ),
        Err(DispError::Format(_))
    ));
}

#[test]
fn displace_into_keeps_previous_output_on_error() {
    let map = uniform_map(2, 2, [0, 0, 128]);
    let target = distinct_target(2, 2);
    let previous = distinct_target(5, 5);
    let mut out = Some(previous.clone());

    let wrong = distinct_target(3, 3);
    assert!(displace_into(map.view(), wrong.view(), DisplaceParams::default(), &mut out).is_err());
    assert_eq!(out.as_ref(), Some(&previous));

    let mut empty = None;
    let res = displace_into(map.view(), wrong.view(), DisplaceParams::default(), &mut empty);
    assert!(res.is_err());
    assert!(empty.is_none());

    displace_into(map.view(), target.view(), DisplaceParams::default(), &mut out).unwrap();
    assert_eq!(out, Some(target));
}

#[test]
fn empty_images_produce_empty_output() {
    let map = Image::new(0, 0, PixelFormat::Bgr8).unwrap();
    let target = Image::new(0, 0, PixelFormat::Bgra8).unwrap();
    let out = displace(map.view(), target.view(), DisplaceParams::default()).unwrap();
    assert_eq!(out.dimensions(), (0, 0));
}

#[test]
fn params_deserialize_with_defaults() {
    let p: DisplaceParams = serde_json::from_str(r#"{ "scale_x": -4 }"#).unwrap();
    assert_eq!(p.scale_x, -4);
    assert_eq!(p.scale_y, 20);
    assert_eq!(p.component_x, Channel::Red);
}
