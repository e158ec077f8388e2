//! End-to-end library pipeline: JSON document → cleaned collection →
//! relations → graphs → metrics and report files.

use tempfile::TempDir;

use thesisnet_core::clean::Cleaner;
use thesisnet_core::extract_relations;
use thesisnet_core::store::from_json_str;
use thesisnet_graph::export::{ReportPlan, write_report};
use thesisnet_graph::graph::{GraphStats, build_directed, build_undirected};
use thesisnet_graph::metrics::{MetricKind, centrality, communities};

const SINGLE: &str = r#"{"2023": {"2023-1": {"title": "T", "author": "Smith, John", "directors": ["Jane Doe"]}}}"#;

const PORTAL: &str = r#"{
    "2021": {
        "2021-1": {"title": "Grafos", "author": "Pérez, José", "directors": ["Ana Ruiz"]},
        "2021-2": {"title": "Redes", "author": "Luis Gil", "directors": ["Ana Ruiz", "Jose Perez"]}
    },
    "2022": {
        "2022-1": {"title": "Flujos", "author": "Marta Sanz", "directors": ["Luis Gil"]},
        "2022-2": {"title": "Cortes", "author": "Ruiz, Ana", "directors": ["Carmen Vidal"]}
    }
}"#;

#[test]
fn single_thesis_yields_one_edge() {
    let cleaned = Cleaner::default().clean(from_json_str(SINGLE).unwrap()).unwrap();
    let relations = extract_relations(&cleaned);
    assert!(relations.contains("John Smith", "Jane Doe"));

    let g = build_undirected(&relations);
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 1);

    let ranked = centrality(&g, MetricKind::Degree).unwrap();
    assert!(ranked.iter().all(|r| (r.score - 1.0).abs() < 1e-12));
}

#[test]
fn authors_who_later_supervise_share_a_node() {
    let cleaned = Cleaner::default().clean(from_json_str(PORTAL).unwrap()).unwrap();
    let relations = extract_relations(&cleaned);

    // "Pérez, José" becomes the supervisor spelling "Jose Perez".
    assert!(relations.contains("Jose Perez", "Ana Ruiz"));
    assert!(relations.contains("Ana Ruiz", "Carmen Vidal"));
    assert_eq!(relations.len(), 5);

    let g = build_undirected(&relations);
    let stats = GraphStats::from_graph(&g);
    assert_eq!(stats.node_count, 5);
    assert_eq!(stats.component_count, 1);

    let dg = build_directed(&relations);
    let in_degree = centrality(&dg, MetricKind::InDegree).unwrap();
    assert_eq!(in_degree[0].name, "Ana Ruiz");

    let p = communities(&g);
    assert_eq!(p.len(), 5);
}

#[test]
fn report_round_trip_on_disk() {
    let dir = TempDir::new().unwrap();
    let cleaned = Cleaner::default().clean(from_json_str(PORTAL).unwrap()).unwrap();
    let relations = extract_relations(&cleaned);
    let ug = build_undirected(&relations);
    let dg = build_directed(&relations);

    let manifest = write_report(dir.path(), &ug, &dg, &ReportPlan::default()).unwrap();
    assert_eq!(manifest.undirected.content_hash, ug.content_hash);

    let in_degree =
        std::fs::read_to_string(dir.path().join("interactive/metrics/in_degree_centrality.txt"))
            .unwrap();
    assert!(in_degree.starts_with("Ana Ruiz: 0.5\n"), "{in_degree}");
    assert_eq!(in_degree.lines().count(), 5);

    let graph_json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("interactive/graph.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(graph_json["directed"], serde_json::Value::Bool(true));
    assert_eq!(graph_json["links"].as_array().map(Vec::len), Some(5));
}
