use crate::ui::Rect;

/// Center a rect of `width x height` within `area`, leaving a one-cell margin.
pub fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2));
    let h = height.min(area.height.saturating_sub(2));

    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Split off the bottom `height` rows of `area`; returns (rest, bottom).
pub fn split_bottom(area: Rect, height: u16) -> (Rect, Rect) {
    let h = height.min(area.height);
    let rest = Rect::new(area.x, area.y, area.width, area.height - h);
    let bottom = Rect::new(area.x, area.y + area.height - h, area.width, h);
    (rest, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_rect_clamps_to_area() {
        let r = center_rect(Rect::new(0, 0, 20, 10), 100, 100);
        assert_eq!(r, Rect::new(1, 1, 18, 8));
    }

    #[test]
    fn split_bottom_partitions() {
        let (rest, bottom) = split_bottom(Rect::new(0, 0, 80, 24), 1);
        assert_eq!(rest, Rect::new(0, 0, 80, 23));
        assert_eq!(bottom, Rect::new(0, 23, 80, 1));
    }
}
