//! Synthetic chart and point-cloud data handed to the rendering layers.

use rand::Rng;
use serde::Deserialize;

pub const KNOWN_SPECIES_POINTS: usize = 200;
pub const NOVEL_CLUSTERS: usize = 47;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualizationKind {
    FileProcessing,
    QualityMetrics,
    ReadMerging,
    AsvProcessing,
    BlastResults,
    EmbeddingSpace,
    DiversityMetrics,
    Line,
    Scatter,
    Bar,
    Area,
    #[default]
    Terminal,
}

impl VisualizationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualizationKind::FileProcessing => "file-processing",
            VisualizationKind::QualityMetrics => "quality-metrics",
            VisualizationKind::ReadMerging => "read-merging",
            VisualizationKind::AsvProcessing => "asv-processing",
            VisualizationKind::BlastResults => "blast-results",
            VisualizationKind::EmbeddingSpace => "embedding-space",
            VisualizationKind::DiversityMetrics => "diversity-metrics",
            VisualizationKind::Line => "line",
            VisualizationKind::Scatter => "scatter",
            VisualizationKind::Bar => "bar",
            VisualizationKind::Area => "area",
            VisualizationKind::Terminal => "terminal",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub x: usize,
    pub value: f64,
    pub quality: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarPoint {
    pub name: String,
    pub before: f64,
    pub after: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaPoint {
    pub position: usize,
    pub reads: f64,
    pub quality: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Line(Vec<LinePoint>),
    Bar(Vec<BarPoint>),
    Scatter(Vec<Point3>),
    Area(Vec<AreaPoint>),
    Empty,
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            ChartData::Line(points) => points.len(),
            ChartData::Bar(points) => points.len(),
            ChartData::Scatter(points) => points.len(),
            ChartData::Area(points) => points.len(),
            ChartData::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartData::Line(_) => "line",
            ChartData::Bar(_) => "bar",
            ChartData::Scatter(_) => "scatter",
            ChartData::Area(_) => "area",
            ChartData::Empty => "none",
        }
    }

    /// Largest plotted value: line value, bar count before merging, scatter
    /// height or area read count.
    pub fn peak(&self) -> Option<f64> {
        let values: Vec<f64> = match self {
            ChartData::Line(points) => points.iter().map(|p| p.value).collect(),
            ChartData::Bar(points) => points.iter().map(|p| p.before).collect(),
            ChartData::Scatter(points) => points.iter().map(|p| p.z).collect(),
            ChartData::Area(points) => points.iter().map(|p| p.reads).collect(),
            ChartData::Empty => Vec::new(),
        };
        values.into_iter().reduce(f64::max)
    }

    /// One-line description, `None` for kinds without a chart.
    pub fn summary(&self) -> Option<String> {
        let peak = self.peak()?;
        Some(format!(
            "{} chart, {} points, peak {:.1}",
            self.label(),
            self.len(),
            peak
        ))
    }
}

pub fn chart_data(kind: VisualizationKind, rng: &mut impl Rng) -> ChartData {
    use VisualizationKind::*;

    match kind {
        Line | QualityMetrics => ChartData::Line(
            (0..20)
                .map(|i| LinePoint {
                    x: i,
                    value: rng.random::<f64>() * 100.0 + 20.0 + (i as f64 * 0.5).sin() * 30.0,
                    quality: rng.random::<f64>() * 40.0 + 10.0,
                })
                .collect(),
        ),
        Bar | ReadMerging => ChartData::Bar(
            (0..8)
                .map(|i| BarPoint {
                    name: format!("Sample {}", i + 1),
                    before: rng.random::<f64>() * 1000.0 + 500.0,
                    after: rng.random::<f64>() * 800.0 + 200.0,
                })
                .collect(),
        ),
        Scatter | EmbeddingSpace => ChartData::Scatter(
            (0..50)
                .map(|_| Point3 {
                    x: rng.random::<f64>() * 100.0,
                    y: rng.random::<f64>() * 100.0,
                    z: rng.random::<f64>() * 100.0,
                })
                .collect(),
        ),
        Area | AsvProcessing => ChartData::Area(
            (0..15)
                .map(|i| AreaPoint {
                    position: i * 10,
                    reads: rng.random::<f64>() * 1000.0 + 100.0,
                    quality: rng.random::<f64>() * 40.0 + 10.0,
                })
                .collect(),
        ),
        FileProcessing | BlastResults | DiversityMetrics | Terminal => ChartData::Empty,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cluster {
    Known,
    Novel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingPoint {
    pub position: Point3,
    pub cluster: Cluster,
    pub similarity: f64,
    pub species: String,
}

/// Point cloud for the 3D embedding view: known species spread evenly,
/// novel clusters scattered around their own centres.
pub fn embedding_space(rng: &mut impl Rng) -> Vec<EmbeddingPoint> {
    let mut points = Vec::with_capacity(KNOWN_SPECIES_POINTS + NOVEL_CLUSTERS);

    for i in 0..KNOWN_SPECIES_POINTS {
        points.push(EmbeddingPoint {
            position: Point3 {
                x: centered(rng, 8.0),
                y: centered(rng, 8.0),
                z: centered(rng, 8.0),
            },
            cluster: Cluster::Known,
            similarity: rng.random::<f64>() * 0.3 + 0.7,
            species: format!("Known_Species_{i}"),
        });
    }

    for i in 0..NOVEL_CLUSTERS {
        let center = Point3 {
            x: centered(rng, 6.0),
            y: centered(rng, 6.0),
            z: centered(rng, 6.0),
        };

        points.push(EmbeddingPoint {
            position: Point3 {
                x: center.x + centered(rng, 2.0),
                y: center.y + centered(rng, 2.0),
                z: center.z + centered(rng, 2.0),
            },
            cluster: Cluster::Novel,
            similarity: rng.random::<f64>() * 0.4 + 0.3,
            species: format!("Novel_Cluster_{}", i + 1),
        });
    }

    points
}

fn centered(rng: &mut impl Rng, span: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * span
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn chart_sizes_follow_kind() {
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(chart_data(VisualizationKind::QualityMetrics, &mut rng).len(), 20);
        assert_eq!(chart_data(VisualizationKind::Bar, &mut rng).len(), 8);
        assert_eq!(chart_data(VisualizationKind::EmbeddingSpace, &mut rng).len(), 50);
        assert_eq!(chart_data(VisualizationKind::AsvProcessing, &mut rng).len(), 15);
        assert!(chart_data(VisualizationKind::Terminal, &mut rng).is_empty());
    }

    #[test]
    fn summary_describes_the_chart() {
        let mut rng = StdRng::seed_from_u64(4);

        let area = chart_data(VisualizationKind::AsvProcessing, &mut rng);
        let summary = area.summary().unwrap();
        assert!(summary.starts_with("area chart, 15 points, peak "));
        assert!((100.0..1100.0).contains(&area.peak().unwrap()));

        assert!(ChartData::Empty.summary().is_none());
        assert_eq!(VisualizationKind::BlastResults.as_str(), "blast-results");
    }

    #[test]
    fn bar_samples_are_named_and_bounded() {
        let mut rng = StdRng::seed_from_u64(2);
        let ChartData::Bar(bars) = chart_data(VisualizationKind::ReadMerging, &mut rng) else {
            panic!("expected bar data");
        };

        assert_eq!(bars[0].name, "Sample 1");
        assert_eq!(bars[7].name, "Sample 8");
        for bar in bars {
            assert!((500.0..1500.0).contains(&bar.before));
            assert!((200.0..1000.0).contains(&bar.after));
        }
    }

    #[test]
    fn embedding_space_has_known_and_novel_points() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = embedding_space(&mut rng);

        let novel: Vec<_> = points.iter().filter(|p| p.cluster == Cluster::Novel).collect();
        assert_eq!(points.len(), KNOWN_SPECIES_POINTS + NOVEL_CLUSTERS);
        assert_eq!(novel.len(), NOVEL_CLUSTERS);
        assert_eq!(novel[0].species, "Novel_Cluster_1");

        for point in &points {
            assert!(point.position.x.abs() <= 4.0);
            assert!(point.position.z.abs() <= 4.0);
            match point.cluster {
                Cluster::Known => assert!((0.7..1.0).contains(&point.similarity)),
                Cluster::Novel => assert!((0.3..0.7).contains(&point.similarity)),
            }
        }
    }
}
