use salary_dashboard::charts::{build_dashboard, dashboard_specs, FigureData, Panel};
use salary_dashboard::config::DashboardConfig;
use salary_dashboard::data::{DataLoader, ProcessorError};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/jobs_de.csv")
}

/// Load a CSV and build the default dashboard over it.
fn dashboard_for(path: &Path) -> Vec<Panel> {
    let mut loader = DataLoader::new();
    let df = loader.load_csv(path).expect("Failed to load CSV");
    build_dashboard(df, &dashboard_specs(&DashboardConfig::default()))
}

fn bars(panel: &Panel) -> (&[String], &[f64]) {
    match &panel.figure {
        Ok(figure) => match &figure.data {
            FigureData::Bars { labels, values, .. } => (labels, values),
            other => panic!("{} is not a bar chart: {other:?}", panel.spec.title),
        },
        Err(e) => panic!("{} was skipped: {e}", panel.spec.title),
    }
}

fn panel<'a>(panels: &'a [Panel], title: &str) -> &'a Panel {
    panels
        .iter()
        .find(|p| p.spec.title == title)
        .unwrap_or_else(|| panic!("no panel titled {title}"))
}

#[test]
fn test_full_dataset_renders_every_chart_in_order() {
    let panels = dashboard_for(&fixture_path());

    assert_eq!(panels.len(), 13);
    for p in &panels {
        assert!(p.is_rendered(), "{} skipped: {:?}", p.spec.title, p.figure);
    }

    let titles: Vec<&str> = panels.iter().map(|p| p.spec.title.as_str()).collect();
    assert_eq!(titles[0], "Top 10 Industries by Average Salary");
    assert_eq!(titles[9], "Skill Demand (% of jobs requiring skill)");
    assert_eq!(titles[12], "Company Rating vs Average Salary");
}

#[test]
fn test_top_industries_ranking() {
    let panels = dashboard_for(&fixture_path());
    let (labels, values) = bars(&panels[0]);

    assert_eq!(labels.len(), 10);
    assert_eq!(
        &labels[..5],
        &["Banking", "Pharma", "Software", "Energy", "Automotive"]
    );
    assert_eq!(values[0], 81000.0);
    assert_eq!(values[2], 72500.0);
    assert!(!labels.contains(&"Retail".to_string()));
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_employer_provided_is_ordered_by_key() {
    let panels = dashboard_for(&fixture_path());
    let (labels, values) = bars(panel(&panels, "Employer-provided vs Estimated Salaries"));

    assert_eq!(labels, &["0", "1"]);
    assert!((values[0] - 761000.0 / 12.0).abs() < 1e-6);
    assert_eq!(values[1], 78500.0);
}

#[test]
fn test_skill_charts() {
    let panels = dashboard_for(&fixture_path());

    let (labels, values) = bars(panel(&panels, "Skill Demand (% of jobs requiring skill)"));
    assert_eq!(labels, &["python_yn", "R_yn", "spark", "aws", "excel"]);
    assert!((values[0] - 10.0 / 14.0 * 100.0).abs() < 1e-9);
    assert_eq!(values[1], 0.0);

    // R is never required, so it has no salary bar at all
    let (labels, values) = bars(panel(&panels, "Average Salary for Jobs Requiring Each Skill"));
    assert_eq!(labels.len(), 4);
    assert!(!labels.contains(&"R_yn".to_string()));
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_box_plot_groups() {
    let panels = dashboard_for(&fixture_path());
    let figure = panel(&panels, "Salary Distribution by Job Role")
        .figure
        .as_ref()
        .unwrap();

    let FigureData::Boxes { groups } = &figure.data else {
        panic!("expected box plot");
    };
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["data scientist", "data engineer", "analyst", "mle"]);
    assert_eq!(groups[3].summary.count, 1);
}

#[test]
fn test_rating_scatter_has_fit() {
    let panels = dashboard_for(&fixture_path());
    let figure = panels[12].figure.as_ref().unwrap();

    let FigureData::Scatter { points, fit } = &figure.data else {
        panic!("expected scatter plot");
    };
    assert_eq!(points.len(), 14);
    assert!(fit.as_ref().unwrap().slope > 0.0);
}

#[test]
fn test_missing_column_skips_only_that_chart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_rating.csv");

    // Drop the trailing Rating column from every line.
    let content: String = fs::read_to_string(fixture_path())
        .unwrap()
        .lines()
        .map(|line| format!("{}\n", line.rsplit_once(',').unwrap().0))
        .collect();
    fs::write(&path, content).unwrap();

    let panels = dashboard_for(&path);
    let skipped: Vec<&Panel> = panels.iter().filter(|p| !p.is_rendered()).collect();

    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].spec.title, "Company Rating vs Average Salary");
    assert!(matches!(
        skipped[0].figure,
        Err(ProcessorError::MissingColumn(ref c)) if c == "Rating"
    ));
}

#[test]
fn test_header_only_file_skips_every_chart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    let header = fs::read_to_string(fixture_path())
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    fs::write(&path, format!("{header}\n")).unwrap();

    let panels = dashboard_for(&path);
    assert_eq!(panels.len(), 13);
    for p in &panels {
        assert!(
            matches!(p.figure, Err(ProcessorError::EmptyDataset)),
            "{}: {:?}",
            p.spec.title,
            p.figure
        );
    }
}
