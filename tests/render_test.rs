use violin_swarm::error::Error;
use violin_swarm::svg::{Document, XML_DECLARATION};
use violin_swarm::vis::{Color, GlyphPolicy, PlotSettings};
use violin_swarm::{render, render_chart, RenderRequest, Series, DEGENERATE_NORMALIZED_VALUE};

fn two_series() -> Vec<Series> {
    vec![
        Series::new("A").with_score("a1", 0.2).with_score("a2", 0.8),
        Series::new("B")
            .with_score("b1", 5.0)
            .with_score("b2", 10.0)
            .with_score("b3", 15.0),
    ]
}

fn count_elements(svg: &str, name: &str) -> usize {
    let doc = Document::parse(svg).unwrap();
    doc.descendants(doc.root())
        .into_iter()
        .filter(|&id| doc.element(id).map(|e| e.local_name() == name).unwrap_or(false))
        .count()
}

#[test]
fn test_two_series_render() {
    let output = render(&RenderRequest::new(two_series())).unwrap();

    assert_eq!(output.points.len(), 5);
    let ids: Vec<_> = output.points.iter().map(|p| p.id.as_str()).collect();
    // Per series, top to bottom
    assert_eq!(ids, vec!["a2", "a1", "b3", "b2", "b1"]);

    let a_color = &output.points[0].color;
    let b_color = &output.points[2].color;
    assert_ne!(a_color, b_color);
    assert!(output.points[..2].iter().all(|p| &p.color == a_color));
    assert!(output.points[2..].iter().all(|p| &p.color == b_color));

    // Raw values come back, not normalized ones
    let b: Vec<_> = output.points[2..].iter().map(|p| p.value).collect();
    assert_eq!(b, vec![15.0, 10.0, 5.0]);

    // Higher value, smaller y
    assert!(output.points[0].y < output.points[1].y);
    assert!(output.points[2].y < output.points[3].y);
    assert!(output.points[3].y < output.points[4].y);
}

#[test]
fn test_static_image_has_no_glyphs() {
    let output = render(&RenderRequest::new(two_series())).unwrap();

    assert!(output.svg.starts_with(XML_DECLARATION));
    assert_eq!(count_elements(&output.svg, "use"), 0);
    assert!(output.svg.contains(r#"id="PolyCollection_1""#));
    assert!(output.svg.contains(r#"id="PolyCollection_2""#));
}

#[test]
fn test_single_observation() {
    let output = render(&RenderRequest::new(vec![Series::new("Solo").with_score("x1", 42.0)])).unwrap();

    assert_eq!(output.points.len(), 1);
    let point = &output.points[0];
    assert_eq!(point.id, "x1");
    assert_eq!(point.series, "Solo");
    assert_eq!(point.value, 42.0);
    assert_eq!(DEGENERATE_NORMALIZED_VALUE, 0.5);
}

#[test]
fn test_constant_series_with_ties() {
    let series = vec![
        Series::new("Flat")
            .with_score("f1", 3.0)
            .with_score("f2", 3.0)
            .with_score("f3", 3.0),
        Series::new("Tied")
            .with_score("t1", 1.0)
            .with_score("t2", 2.0)
            .with_score("t3", 2.0),
    ];
    let output = render(&RenderRequest::new(series)).unwrap();

    assert_eq!(output.points.len(), 6);
    let flat: Vec<_> = output.points[..3].iter().map(|p| p.id.as_str()).collect();
    assert_eq!(flat, vec!["f1", "f2", "f3"]);
    let tied: Vec<_> = output.points[3..].iter().map(|p| (p.id.as_str(), p.value)).collect();
    assert_eq!(tied, vec![("t2", 2.0), ("t3", 2.0), ("t1", 1.0)]);
}

#[test]
fn test_render_is_deterministic() {
    let request = RenderRequest::new(two_series());
    let first = render(&request).unwrap();
    let second = render(&request).unwrap();

    assert_eq!(first.points, second.points);
    assert_eq!(first.svg, second.svg);

    let keys = |o: &violin_swarm::RenderOutput| -> Vec<&'static str> {
        o.timings.entries().into_iter().map(|(k, _)| k).collect()
    };
    assert_eq!(keys(&first), keys(&second));
}

#[test]
fn test_seed_changes_jitter_only() {
    let request = RenderRequest::new(two_series());
    let mut reseeded = request.clone();
    reseeded.settings.seed = 7;

    let a = render(&request).unwrap();
    let b = render(&reseeded).unwrap();
    let ys = |o: &violin_swarm::RenderOutput| o.points.iter().map(|p| p.y).collect::<Vec<_>>();
    let xs = |o: &violin_swarm::RenderOutput| o.points.iter().map(|p| p.x).collect::<Vec<_>>();
    assert_eq!(ys(&a), ys(&b));
    assert_ne!(xs(&a), xs(&b));
}

#[test]
fn test_custom_colors() {
    let request = RenderRequest::new(two_series()).with_colors(vec![Color::rgb(1.0, 0.0, 0.0)]);
    let output = render(&request).unwrap();

    assert_eq!(output.points[0].color, "#ff0000");
    // Missing entries fall back to grey
    assert_eq!(output.points[2].color, "#7f7f7f");
}

#[test]
fn test_invalid_color_aborts() {
    let request = RenderRequest::new(two_series()).with_colors(vec![Color::hex("red")]);
    assert!(matches!(render(&request), Err(Error::InvalidColor(_))));
}

#[test]
fn test_malformed_input() {
    assert!(matches!(
        render(&RenderRequest::new(vec![])),
        Err(Error::MalformedInput(_))
    ));
    assert!(matches!(
        render(&RenderRequest::new(vec![Series::new("Empty")])),
        Err(Error::MalformedInput(_))
    ));
}

#[test]
fn test_annotate_policy_keeps_tagged_glyphs() {
    let settings = PlotSettings {
        glyphs: GlyphPolicy::Annotate,
        ..PlotSettings::default()
    };
    let output = render(&RenderRequest::new(two_series()).with_settings(settings)).unwrap();

    assert_eq!(count_elements(&output.svg, "use"), 5);
    assert!(output.svg.contains(r#"data-id="b3" data-series="B""#));
    assert!(output.svg.contains(r#"data-id="a1" data-series="A""#));
}

#[test]
fn test_timings_serialize_in_phase_order() {
    let output = render(&RenderRequest::new(two_series())).unwrap();
    let json = serde_json::to_string(&output.timings).unwrap();

    let positions: Vec<usize> = [
        "\"Data Preparation\"",
        "\"Rendering\"",
        "\"SVG Conversion\"",
        "\"Adding Annotations\"",
        "\"TOTAL\"",
    ]
    .iter()
    .map(|key| json.find(key).unwrap())
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_output_json_shape() {
    let output = render(&RenderRequest::new(two_series())).unwrap();
    let value = serde_json::to_value(&output).unwrap();

    let point = &value["points"][0];
    for key in ["x", "y", "id", "series", "color", "value"] {
        assert!(point.get(key).is_some(), "missing {}", key);
    }
    assert!(value["svg"].as_str().unwrap().contains("<svg"));
    assert!(value["timings"]["TOTAL"].is_u64());
}

#[test]
fn test_points_scale_with_view_box() {
    let output = render(&RenderRequest::new(two_series())).unwrap();
    let doc = Document::parse(&output.svg).unwrap();
    let view_box = doc.view_box().unwrap();
    assert_eq!((view_box.width, view_box.height), (576.0, 432.0));

    for point in &output.points {
        assert!(point.x > 0.0 && point.x < view_box.width);
        assert!(point.y > 0.0 && point.y < view_box.height);
    }
}

#[test]
fn test_render_chart_positional_form() {
    let output = render_chart(
        (6.0, 4.0),
        &two_series(),
        None,
        "Scores",
        "",
        "Normalized",
        8.0,
    )
    .unwrap();

    assert_eq!(output.points.len(), 5);
    assert!(output.svg.contains(">Scores</text>"));
    assert!(output.svg.contains(r#"width="432pt""#));
}

#[test]
fn test_extreme_scores_render_finite_points() {
    let series = vec![Series::new("Wide")
        .with_score("lo", -1e308)
        .with_score("mid", 0.0)
        .with_score("hi", 1e308)];
    let output = render(&RenderRequest::new(series)).unwrap();

    assert_eq!(output.points.len(), 3);
    assert!(output.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    assert!(!output.svg.contains("NaN"));
    let ids: Vec<_> = output.points.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["hi", "mid", "lo"]);
}
