use std::fs;

use tempfile::TempDir;
use violin_swarm::error::Error;
use violin_swarm::vis::{Color, GlyphPolicy, PlotSettings};
use violin_swarm::{render, RenderRequest};

#[test]
fn test_request_from_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("request.json");
    fs::write(
        &path,
        r##"{
            "series": [
                {"name": "Quiz", "scores": {"s2": 7, "s1": 3}},
                {"name": "Final", "scores": {"s1": 80.5, "s2": 91}}
            ],
            "colors": ["#F00", [0.0, 0.0, 1.0]],
            "settings": {"seed": 9, "title": "Midterm"}
        }"##,
    )
    .unwrap();

    let request = RenderRequest::from_path(&path).unwrap();
    assert_eq!(request.series.len(), 2);
    assert_eq!(request.series[0].name(), "Quiz");
    let ids: Vec<_> = request.series[0].scores().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["s2", "s1"]);
    assert_eq!(
        request.colors,
        Some(vec![Color::hex("#F00"), Color::rgb(0.0, 0.0, 1.0)])
    );
    assert_eq!(request.settings.seed, 9);
    assert_eq!(request.settings.x_label, "Series");

    let output = render(&request).unwrap();
    assert_eq!(output.points.len(), 4);
    assert_eq!(output.points[0].color, "#ff0000");
    assert_eq!(output.points[2].color, "#0000ff");
    assert!(output.svg.contains(">Midterm</text>"));
}

#[test]
fn test_request_from_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("request.yml");
    fs::write(
        &path,
        r#"
series:
  - name: Participation
    scores:
      s1: 10
      s2: 12
      s3: 20
settings:
  glyphs: annotate
"#,
    )
    .unwrap();

    let request = RenderRequest::from_path(&path).unwrap();
    assert_eq!(request.colors, None);
    assert_eq!(request.settings.glyphs, GlyphPolicy::Annotate);

    let output = render(&request).unwrap();
    assert_eq!(output.points.len(), 3);
    assert_eq!(output.svg.matches("data-series=\"Participation\"").count(), 3);
}

#[test]
fn test_settings_from_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plot.toml");
    fs::write(
        &path,
        r#"
figure_size = [10.0, 5.0]
y_label = "Score"
jitter = 0.2
"#,
    )
    .unwrap();

    let settings = PlotSettings::from_path(&path).unwrap();
    assert_eq!(settings.figure_size, (10.0, 5.0));
    assert_eq!(settings.size_in_points(), (720.0, 360.0));
    assert_eq!(settings.y_label, "Score");
    assert_eq!(settings.jitter, 0.2);
    assert_eq!(settings.dot_size, 5.0);
}

#[test]
fn test_invalid_settings_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plot.toml");
    fs::write(&path, "dot_size = -1.0\n").unwrap();

    assert!(matches!(PlotSettings::from_path(&path), Err(Error::Config(_))));
}

#[test]
fn test_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plot.ini");
    fs::write(&path, "seed = 1\n").unwrap();

    assert!(matches!(PlotSettings::from_path(&path), Err(Error::Config(_))));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    assert!(matches!(RenderRequest::from_path(&path), Err(Error::Io(_))));
}
