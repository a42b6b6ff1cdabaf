#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        core::{
            ImageSize,
            OcrResult,
            PopulatedCell,
            Rectangle,
            TextFragment,
            Vertex,
        },
        grid::{
            assigner::assign,
            CalendarGridMapper,
            GeometryError,
            GridDefinition,
            UniformGrid,
        },
    };

    // Powers of two keep pixel <-> normalized conversions exact.
    const IMAGE: ImageSize = ImageSize { width: 1024, height: 1024 };

    fn calendar_grid() -> Arc<GridDefinition> {
        let params = UniformGrid {
            rows: 6,
            cols: 7,
            x_start: 0.02,
            x_end: 0.98,
            y_start: 0.16,
            y_end: 0.98,
            header: Some(Rectangle::new(0.02, 0.01, 0.5, 0.14).unwrap()),
        };
        Arc::new(GridDefinition::uniform(&params).unwrap())
    }

    fn at_point(text: &str, x: f64, y: f64) -> TextFragment {
        TextFragment::new(text, vec![Vertex::new(x * IMAGE.width as f64, y * IMAGE.height as f64)])
    }

    fn in_cell(grid: &GridDefinition, index: usize, text: &str) -> TextFragment {
        let b = grid.cells()[index].bounds;
        let (x0, x1) = (b.x_min * 1024.0, b.x_max * 1024.0);
        let (y0, y1) = (b.y_min * 1024.0, b.y_max * 1024.0);
        let inset = 4.0;
        TextFragment::new(
            text,
            vec![
                Vertex::new(x0 + inset, y0 + inset),
                Vertex::new(x1 - inset, y0 + inset),
                Vertex::new(x1 - inset, y1 - inset),
                Vertex::new(x0 + inset, y1 - inset),
            ],
        )
    }

    fn cell<'a>(cells: &'a [PopulatedCell], index: usize) -> &'a PopulatedCell {
        &cells[index]
    }

    #[test]
    fn header_month_applies_to_every_cell() {
        let grid = calendar_grid();
        let mapper = CalendarGridMapper::new(grid.clone());
        let fragments = vec![
            in_cell(&grid, 0, "MON"),
            in_cell(&grid, 0, "3月"),
            in_cell(&grid, 5, "歯医者"),
        ];

        let cells = mapper.map(&fragments, IMAGE).unwrap();
        assert_eq!(cells.len(), 43);
        assert!(cells.iter().all(|c| c.month == Some(3)));
        assert_eq!(cell(&cells, 5).schedule, "歯医者");
    }

    #[test]
    fn missing_month_leaves_every_cell_undetermined() {
        let grid = calendar_grid();
        let mapper = CalendarGridMapper::new(grid.clone());
        let fragments = vec![in_cell(&grid, 0, "MON"), in_cell(&grid, 2, "会議")];

        let cells = mapper.map(&fragments, IMAGE).unwrap();
        assert!(cells.iter().all(|c| c.month.is_none()));
        assert_eq!(cell(&cells, 2).schedule, "会議");
    }

    #[test]
    fn first_day_token_wins_and_later_ones_are_discarded() {
        let grid = calendar_grid();
        let mapper = CalendarGridMapper::new(grid.clone());
        let fragments = vec![
            in_cell(&grid, 8, "歯医者"),
            in_cell(&grid, 8, "07日"),
            in_cell(&grid, 8, "10時"),
            in_cell(&grid, 8, "8"),
        ];

        let cells = mapper.map(&fragments, IMAGE).unwrap();
        assert_eq!(cell(&cells, 8).day, "7");
        assert_eq!(cell(&cells, 8).schedule, "歯医者 10時");
    }

    #[test]
    fn default_label_survives_without_day_token_and_zero_stays_zero() {
        let grid = calendar_grid();
        let mapper = CalendarGridMapper::new(grid.clone());
        let fragments = vec![in_cell(&grid, 3, "買い物"), in_cell(&grid, 4, "0")];

        let cells = mapper.map(&fragments, IMAGE).unwrap();
        assert_eq!(cell(&cells, 3).day, grid.cells()[3].default_day);
        assert_eq!(cell(&cells, 3).schedule, "買い物");
        assert_eq!(cell(&cells, 4).day, "0");
        assert_eq!(cell(&cells, 4).schedule, "");
    }

    #[test]
    fn header_cell_never_takes_day_or_schedule() {
        let grid = calendar_grid();
        let mapper = CalendarGridMapper::new(grid.clone());
        let fragments = vec![
            in_cell(&grid, 0, "12"),
            in_cell(&grid, 0, "カレンダー"),
            in_cell(&grid, 0, "5日"),
        ];

        let cells = mapper.map(&fragments, IMAGE).unwrap();
        let header = cell(&cells, 0);
        assert_eq!(header.day, "MON");
        assert_eq!(header.schedule, "");
        assert_eq!(header.month, Some(12));
    }

    #[test]
    fn mapping_is_idempotent() {
        let grid = calendar_grid();
        let mapper = CalendarGridMapper::new(grid.clone());
        let fragments = vec![
            in_cell(&grid, 0, "4月"),
            in_cell(&grid, 10, "１５日"),
            in_cell(&grid, 10, "飲み会"),
            in_cell(&grid, 22, "出張"),
        ];

        let first = mapper.map(&fragments, IMAGE).unwrap();
        let second = mapper.map(&fragments, IMAGE).unwrap();
        assert_eq!(first, second);
        assert_eq!(cell(&first, 10).day, "15");
    }

    #[test]
    fn map_response_skips_full_text_block() {
        let grid = calendar_grid();
        let mapper = CalendarGridMapper::new(grid.clone());
        // The full-text block sits inside cell 1 but must not be assigned.
        let result = OcrResult {
            image_size: IMAGE,
            fragments: vec![in_cell(&grid, 1, "全文"), in_cell(&grid, 1, "旅行")],
        };

        let cells = mapper.map_response(&result).unwrap();
        assert_eq!(cell(&cells, 1).schedule, "旅行");
    }

    #[test]
    fn zero_sized_image_fails_the_request() {
        let mapper = CalendarGridMapper::new(calendar_grid());
        let err = mapper.map(&[], ImageSize::new(0, 480)).unwrap_err();
        assert_eq!(err, GeometryError::DegenerateImage { width: 0, height: 480 });
    }

    #[test]
    fn scattered_fragments_with_a_shared_corner() {
        let grid = calendar_grid();
        assert_eq!(grid.len(), 43);
        let mapper = CalendarGridMapper::new(grid.clone());

        // Bottom-right corner of cell 9 is shared with cells 10, 16 and 17.
        let corner = grid.cells()[9].bounds;
        let (cx, cy) = (corner.x_max, corner.y_max);
        for index in [9, 10, 16, 17] {
            assert!(grid.cells()[index].bounds.contains(cx, cy), "cell {index} misses the corner");
        }

        let mut fragments = vec![in_cell(&grid, 0, "MON"), in_cell(&grid, 0, "3月")];
        for index in 1..grid.len() {
            fragments.push(in_cell(&grid, index, &format!("予定{index}")));
        }
        fragments.push(at_point("角", cx, cy));
        fragments.push(at_point("outside", 1020.0 / 1024.0, 1020.0 / 1024.0));
        fragments.push(at_point("margin", 4.0 / 1024.0, 4.0 / 1024.0));
        fragments.push(at_point("   ", 0.5, 0.5));
        fragments.push(TextFragment::new("unresolvable", vec![Vertex { x: Some(100.0), y: None }]));
        assert_eq!(fragments.len(), 49);

        let cells = mapper.map(&fragments, IMAGE).unwrap();
        assert_eq!(cell(&cells, 9).schedule, "予定9 角");
        for index in [10, 16, 17] {
            assert_eq!(cell(&cells, index).schedule, format!("予定{index}"));
        }
        assert_eq!(cells.iter().filter(|c| !c.schedule.is_empty()).count(), 42);
        assert!(cells.iter().all(|c| c.month == Some(3)));

        // Input order never changes which cell wins.
        let mut reversed = fragments.clone();
        reversed.reverse();
        let buckets = assign(&reversed, IMAGE, &grid);
        assert_eq!(buckets.get(9), &["角".to_string(), "予定9".to_string()]);
        assert_eq!(mapper.map(&fragments, IMAGE).unwrap(), cells);
    }
}
