use awareness_common::{CellCategory, CellSnapshot, IterationRecord, Transmission, Vec2};
use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use palette::named;
use palette::Srgb;
use std::collections::HashSet;

/// Pixel geometry shared by every frame of one report.
#[derive(Debug, Clone, Copy)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    /// Blank border around the drawing, in pixels.
    pub margin: u32,
    pub node_radius: i32,
}

impl FrameGeometry {
    /// Maps a unit-square layout position to pixel coordinates. Y grows downwards.
    pub fn to_pixel(&self, position: Vec2) -> (f32, f32) {
        let usable_w = self.width.saturating_sub(2 * self.margin) as f32;
        let usable_h = self.height.saturating_sub(2 * self.margin) as f32;
        (
            self.margin as f32 + position.x * usable_w,
            self.margin as f32 + position.y * usable_h,
        )
    }
}

fn rgba(color: Srgb<u8>) -> Rgba<u8> {
    Rgba([color.red, color.green, color.blue, 255])
}

/// Colour of a cell category: red for spread, purple for aware but not spread, blue for unaware.
pub fn category_color(category: CellCategory) -> Rgba<u8> {
    match category {
        CellCategory::SpreadAware => rgba(named::RED),
        CellCategory::UnspreadAware => rgba(named::PURPLE),
        CellCategory::Unaware => rgba(named::BLUE),
    }
}

/// Edges that carried the information at least once, normalized to `(low, high)`.
pub fn transmission_edges<'a, I>(transmissions: I) -> HashSet<(u32, u32)>
where
    I: IntoIterator<Item = &'a Transmission>,
{
    transmissions
        .into_iter()
        .map(|t| (t.from.min(t.to), t.from.max(t.to)))
        .collect()
}

/// Draws one network frame: edges first, then the cells coloured by category.
pub fn draw_network_frame(
    states: &[CellSnapshot],
    edges: &[(u32, u32)],
    highlighted: &HashSet<(u32, u32)>,
    positions: &[Vec2],
    geometry: FrameGeometry,
) -> RgbaImage {
    let mut image = ImageBuffer::from_pixel(geometry.width, geometry.height, rgba(named::WHITE));

    let plain_edge = rgba(named::LIGHTGRAY);
    let spread_edge = rgba(named::RED);
    for &(a, b) in edges {
        let (Some(&pa), Some(&pb)) = (positions.get(a as usize), positions.get(b as usize)) else {
            continue;
        };
        let color = if highlighted.contains(&(a.min(b), a.max(b))) {
            spread_edge
        } else {
            plain_edge
        };
        draw_line_segment_mut(&mut image, geometry.to_pixel(pa), geometry.to_pixel(pb), color);
    }

    let outline = rgba(named::BLACK);
    for cell in states {
        let Some(&position) = positions.get(cell.index as usize) else {
            continue;
        };
        let (x, y) = geometry.to_pixel(position);
        let center = (x.round() as i32, y.round() as i32);
        let fill = category_color(cell.category());
        draw_filled_circle_mut(&mut image, center, geometry.node_radius, fill);
        draw_hollow_circle_mut(&mut image, center, geometry.node_radius, outline);
    }

    image
}

/// Line chart of the three per-iteration counts, one polyline per series.
///
/// Aware in red, aware-not-spread in purple, unaware in blue. X is the iteration number,
/// Y runs from 0 to the population size.
pub fn draw_counts_chart(
    records: &[IterationRecord],
    num_cells: usize,
    width: u32,
    height: u32,
) -> RgbaImage {
    let mut image = ImageBuffer::from_pixel(width, height, rgba(named::WHITE));
    let margin = 20.0f32;
    let plot_w = (width as f32 - 2.0 * margin).max(1.0);
    let plot_h = (height as f32 - 2.0 * margin).max(1.0);

    let axis = rgba(named::BLACK);
    draw_line_segment_mut(&mut image, (margin, margin), (margin, margin + plot_h), axis);
    let baseline = margin + plot_h;
    draw_line_segment_mut(&mut image, (margin, baseline), (margin + plot_w, baseline), axis);

    if records.len() < 2 || num_cells == 0 {
        return image;
    }

    let x_step = plot_w / (records.len() - 1) as f32;
    let to_y = |value: u32| margin + plot_h - plot_h * value as f32 / num_cells as f32;

    let series: [(fn(&IterationRecord) -> u32, CellCategory); 3] = [
        (|r: &IterationRecord| r.counts.num_aware, CellCategory::SpreadAware),
        (|r: &IterationRecord| r.counts.num_unaware_aware, CellCategory::UnspreadAware),
        (|r: &IterationRecord| r.counts.num_unaware, CellCategory::Unaware),
    ];
    for (value_of, category) in series {
        let color = category_color(category);
        for (i, pair) in records.windows(2).enumerate() {
            let start = (margin + i as f32 * x_step, to_y(value_of(&pair[0])));
            let end = (margin + (i + 1) as f32 * x_step, to_y(value_of(&pair[1])));
            draw_line_segment_mut(&mut image, start, end, color);
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use awareness_common::{Awareness, IterationCounts};

    fn geometry() -> FrameGeometry {
        FrameGeometry { width: 100, height: 100, margin: 10, node_radius: 4 }
    }

    fn cell(index: u32, awareness: Awareness, has_spread: bool) -> CellSnapshot {
        CellSnapshot { index, awareness, has_spread }
    }

    #[test]
    fn categories_map_to_report_colours() {
        assert_eq!(category_color(CellCategory::SpreadAware), Rgba([255, 0, 0, 255]));
        assert_eq!(category_color(CellCategory::UnspreadAware), Rgba([128, 0, 128, 255]));
        assert_eq!(category_color(CellCategory::Unaware), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn transmission_edges_ignore_direction() {
        let ts = [
            Transmission { from: 3, to: 1 },
            Transmission { from: 1, to: 3 },
            Transmission { from: 0, to: 2 },
        ];
        let set = transmission_edges(ts.iter());
        assert_eq!(set.len(), 2);
        assert!(set.contains(&(1, 3)) && set.contains(&(0, 2)));
    }

    #[test]
    fn cells_are_filled_with_their_category_colour() {
        let states = vec![cell(0, Awareness::Aware, true), cell(1, Awareness::Unaware, false)];
        let positions = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)];
        let image = draw_network_frame(&states, &[], &HashSet::new(), &positions, geometry());

        assert_eq!(image.dimensions(), (100, 100));
        assert_eq!(*image.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(90, 90), Rgba([0, 0, 255, 255]));
        assert_eq!(*image.get_pixel(50, 5), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn highlighted_edges_are_red() {
        let states: Vec<CellSnapshot> = Vec::new();
        let positions = vec![Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.5)];
        let highlighted: HashSet<(u32, u32)> = [(0, 1)].into_iter().collect();
        let image = draw_network_frame(&states, &[(0, 1)], &highlighted, &positions, geometry());
        assert_eq!(*image.get_pixel(50, 50), Rgba([255, 0, 0, 255]));

        let plain = draw_network_frame(&states, &[(0, 1)], &HashSet::new(), &positions, geometry());
        assert_eq!(*plain.get_pixel(50, 50), Rgba([211, 211, 211, 255]));
    }

    #[test]
    fn chart_has_requested_size() {
        let records: Vec<IterationRecord> = (1..=3)
            .map(|n| IterationRecord {
                iteration_number: n,
                before_states: Vec::new(),
                attempted_sources: Vec::new(),
                transmissions: Vec::new(),
                after_states: Vec::new(),
                counts: IterationCounts { num_aware: n, num_unaware_aware: 1, num_unaware: 4 - n },
            })
            .collect();
        let chart = draw_counts_chart(&records, 4, 200, 120);
        assert_eq!(chart.dimensions(), (200, 120));
    }
}
