use snaptext_types::Theme;

const SIZE: i32 = 32;

/// Procedurally drawn tray icon: a rounded plate with a centered "T" glyph,
/// colored for the requested variant. ARGB, as ksni expects.
pub fn tray_icon(variant: Theme) -> ksni::Icon {
    let (plate, glyph) = match variant {
        Theme::Dark => ([0xFF, 0x20, 0x20, 0x24], [0xFF, 0xF0, 0xF0, 0xF0]),
        Theme::Light => ([0xFF, 0xEC, 0xEC, 0xEC], [0xFF, 0x1A, 0x1A, 0x1E]),
    };

    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let pixel = if !on_plate(x, y) {
                [0u8; 4]
            } else if on_glyph(x, y) {
                glyph
            } else {
                plate
            };
            data.extend_from_slice(&pixel);
        }
    }

    ksni::Icon {
        width: SIZE,
        height: SIZE,
        data,
    }
}

fn on_plate(x: i32, y: i32) -> bool {
    let margin = 2;
    let corner = 5;
    if x < margin || y < margin || x >= SIZE - margin || y >= SIZE - margin {
        return false;
    }
    let dx = (x - margin).min(SIZE - 1 - margin - x);
    let dy = (y - margin).min(SIZE - 1 - margin - y);
    dx + dy >= corner || dx * dx + dy * dy >= corner * corner
}

fn on_glyph(x: i32, y: i32) -> bool {
    let bar = (8..=24).contains(&x) && (8..=11).contains(&y);
    let stem = (14..=17).contains(&x) && (8..=24).contains(&y);
    bar || stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_has_expected_geometry() {
        for variant in [Theme::Dark, Theme::Light] {
            let icon = tray_icon(variant);
            assert_eq!(icon.width, 32);
            assert_eq!(icon.height, 32);
            assert_eq!(icon.data.len(), 32 * 32 * 4);
        }
    }

    #[test]
    fn corners_are_transparent_and_center_is_not() {
        let icon = tray_icon(Theme::Dark);
        assert_eq!(&icon.data[..4], &[0, 0, 0, 0]);
        let center = ((16 * 32 + 16) * 4) as usize;
        assert_eq!(icon.data[center], 0xFF);
    }
}
