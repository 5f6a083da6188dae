use std::collections::HashMap;

use violin_swarm::error::Error;
use violin_swarm::{ObservationFrame, Series, DEGENERATE_NORMALIZED_VALUE};

#[test]
fn test_each_series_spans_unit_interval() {
    let series: Vec<Series> = (0..4)
        .map(|s| {
            (0..25).fold(Series::new(format!("S{}", s)), |acc, i| {
                acc.with_score(format!("id{:02}", i), ((i * 37 + s * 11) % 23) as f64 * (s + 1) as f64)
            })
        })
        .collect();
    let frame = ObservationFrame::from_series(&series).unwrap();

    for s in 0..4 {
        let values: Vec<f64> = frame.series_rows(s).iter().map(|o| o.normalized_value).collect();
        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
    }
}

#[test]
fn test_rejects_malformed_input() {
    let cases: Vec<Vec<Series>> = vec![
        vec![],
        vec![Series::new("Empty")],
        vec![Series::new("").with_score("a", 1.0)],
        vec![
            Series::new("Dup").with_score("a", 1.0),
            Series::new("Dup").with_score("b", 1.0),
        ],
        vec![Series::new("Ids").with_score("a", 1.0).with_score("a", 2.0)],
        vec![Series::new("Nan").with_score("a", f64::NAN)],
    ];

    for series in cases {
        assert!(
            matches!(ObservationFrame::from_series(&series), Err(Error::MalformedInput(_))),
            "accepted {:?}",
            series
        );
    }
}

#[test]
fn test_map_ingestion_is_deterministic() {
    let mut scores = HashMap::new();
    for (id, value) in [("s3", 7u8), ("s1", 7), ("s2", 9)] {
        scores.insert(id.to_string(), value);
    }
    let series = Series::from_map("Quiz", &scores).unwrap();
    let frame = ObservationFrame::from_series(&[series]).unwrap();

    let ranked: Vec<_> = frame
        .ranked_by_value(0)
        .iter()
        .map(|o| (o.id.as_str(), o.normalized_value))
        .collect();
    assert_eq!(ranked, vec![("s2", 1.0), ("s1", 0.0), ("s3", 0.0)]);
}

#[test]
fn test_integer_constant_series_is_degenerate() {
    let series = Series::from_scores("Att", vec![("a", 3i64), ("b", 3)]).unwrap();
    let frame = ObservationFrame::from_series(&[series]).unwrap();
    assert!(frame
        .rows()
        .iter()
        .all(|o| o.normalized_value == DEGENERATE_NORMALIZED_VALUE && o.raw_value == 3.0));
}
