use dataset_to_yolo::{BboxLabel, PolygonLabel};
use proptest::prelude::*;

fn bbox_inside_image() -> impl Strategy<Value = ([f64; 4], u32, u32)> {
    (1u32..4000, 1u32..4000).prop_flat_map(|(w, h)| {
        (0.0..=f64::from(w), 0.0..=f64::from(h)).prop_flat_map(move |(x, y)| {
            (0.0..=f64::from(w) - x, 0.0..=f64::from(h) - y)
                .prop_map(move |(bw, bh)| ([x, y, bw, bh], w, h))
        })
    })
}

proptest! {
    #[test]
    fn bbox_inside_image_normalizes_to_unit_range((bbox, w, h) in bbox_inside_image(), category in 1i64..100) {
        let label = BboxLabel::from_coco(category, bbox, w, h);
        prop_assert_eq!(label.class_id, category - 1);
        for value in [label.x_center, label.y_center, label.width, label.height] {
            prop_assert!((0.0..=1.0 + 1e-12).contains(&value), "{} out of range", value);
        }

        let line = label.to_string();
        let tokens: Vec<&str> = line.split(' ').collect();
        prop_assert_eq!(tokens.len(), 5);
        for token in &tokens[1..] {
            let decimals = token.split('.').nth(1).map(str::len);
            prop_assert_eq!(decimals, Some(6));
        }
    }

    #[test]
    fn polygon_line_has_one_plus_two_n_tokens(
        points in prop::collection::vec((0.0f64..1000.0, 0.0f64..1000.0), 1..50),
        w in 1u32..2000,
        h in 1u32..2000,
    ) {
        let line = PolygonLabel::from_pixels(&points, w, h).to_string();
        let tokens: Vec<&str> = line.split_whitespace().collect();
        prop_assert_eq!(tokens.len(), 1 + 2 * points.len());
        prop_assert_eq!(tokens[0], "0");
        let first_x: f64 = tokens[1].parse().unwrap();
        prop_assert!((first_x - points[0].0 / f64::from(w)).abs() < 1e-6);
    }
}
