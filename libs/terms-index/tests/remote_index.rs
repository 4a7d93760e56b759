//! Remote repository index: reindexing, rollback and atomic publication.

use lexis_index::{
    Error, Outcome, RemoteIndexConfig, RemoteRepositoryIndex, TermsResolver,
    DEFAULT_ASSET_TYPE_TAG,
};
use lexis_model::{name_uuid, SchemeKey, SchemePointer};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

mod test_support;
use test_support::*;

const COLOR: &str = "https://example.org/taxonomy/Color";
const SHAPE: &str = "https://example.org/taxonomy/Shape";

fn color_asset(version: &str) -> FakeAsset {
    FakeAsset::single(
        COLOR,
        version,
        "Color",
        document(
            COLOR,
            version,
            json!([
                {"code": "Color", "display": "Color", "concept": [
                    {"code": "Red", "display": "Red"},
                    {"code": "Blue", "display": "Blue"}
                ]}
            ]),
        ),
    )
}

fn shape_asset(version: &str) -> FakeAsset {
    FakeAsset::single(
        SHAPE,
        version,
        "Shape",
        document(SHAPE, version, json!([{"code": "Circle"}, {"code": "Square"}])),
    )
}

fn color_key(version: &str) -> SchemeKey {
    SchemeKey::new(name_uuid(COLOR), version)
}

fn remote(catalog: &Arc<ScriptedCatalog>) -> RemoteRepositoryIndex {
    RemoteRepositoryIndex::new(catalog.clone())
}

fn observed(index: &RemoteRepositoryIndex) -> (Outcome<Vec<SchemePointer>>, Vec<String>) {
    let concepts = match index.list_schemes() {
        Outcome::Found(pointers) => pointers
            .iter()
            .flat_map(|p| match index.list_concepts(&p.key()) {
                Outcome::Found(concepts) => concepts
                    .iter()
                    .map(|c| format!("{}|{}|{}", p.key(), c.uuid, c.name))
                    .collect::<Vec<_>>(),
                _ => Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    };
    (index.list_schemes(), concepts)
}

#[tokio::test]
async fn test_unsupported_before_first_reindex() {
    let catalog = Arc::new(ScriptedCatalog::new(vec![color_asset("20210401")]));
    let index = remote(&catalog);

    assert!(!index.is_online());
    assert_eq!(index.list_schemes(), Outcome::Unsupported);
    assert_eq!(index.get_scheme(&color_key("20210401")), Outcome::Unsupported);
    assert_eq!(index.get_concept(&color_key("20210401"), "Red"), Outcome::Unsupported);
    assert_eq!(index.list_ancestors(&color_key("20210401"), "Red"), Outcome::Unsupported);
    assert_eq!(
        index.is_ancestor(&color_key("20210401"), "Red", "Color"),
        Outcome::Unsupported
    );
    assert!(index.lookup_across_versions("Red").unwrap().is_unsupported());
    assert_eq!(index.config().asset_type_tag, DEFAULT_ASSET_TYPE_TAG);
}

#[tokio::test]
async fn test_reindex_publishes_schemes() {
    let catalog = Arc::new(ScriptedCatalog::new(vec![
        color_asset("20210401"),
        shape_asset("20200101"),
    ]));
    let index = remote(&catalog);

    let report = index.reindex().await.unwrap();
    assert_eq!(report.assets, 2);
    assert_eq!(report.schemes, 2);
    assert_eq!(report.concepts, 5);
    assert!(report.online);
    assert!(index.is_online());

    let pointers = index.list_schemes().found().unwrap();
    let tags: Vec<&str> = pointers.iter().map(|p| p.tag.as_str()).collect();
    assert_eq!(tags, vec!["Color", "Shape"]);
    assert_eq!(pointers[0].series_uri, COLOR);

    let red = index.get_concept(&color_key("20210401"), "Red").found().unwrap();
    assert_eq!(red.uuid, name_uuid("Red"));
    assert_eq!(red.ancestors[0].tag, "Color");
    assert_eq!(
        index.is_ancestor(&color_key("20210401"), "Red", "Color"),
        Outcome::Found(true)
    );
    assert_eq!(index.get_concept(&color_key("20210401"), "Green"), Outcome::NotFound);
}

#[tokio::test]
async fn test_failed_reindex_keeps_previous_snapshot() {
    let catalog = Arc::new(ScriptedCatalog::new(vec![color_asset("20210401")]));
    let index = remote(&catalog);
    index.reindex().await.unwrap();
    let before = observed(&index);
    let snapshot_before = index.snapshot();

    let broken = shape_asset("20220101");
    catalog.set_assets(vec![color_asset("20220101"), broken.clone()]);
    catalog.break_asset(&broken);

    let err = index.reindex().await.unwrap_err();
    assert!(matches!(err, Error::AssetIndexing { .. }));

    assert_eq!(observed(&index), before);
    assert!(Arc::ptr_eq(&snapshot_before, &index.snapshot()));
    assert!(index.is_online());
    assert!(index
        .get_concept(&color_key("20220101"), "Red")
        .is_not_found());
}

#[tokio::test]
async fn test_unreachable_catalog_takes_index_offline() {
    let catalog = Arc::new(ScriptedCatalog::new(vec![color_asset("20210401")]));
    let index = remote(&catalog);
    index.reindex().await.unwrap();
    let snapshot_before = index.snapshot();

    catalog.set_unreachable(true);
    let err = index.reindex().await.unwrap_err();
    assert!(matches!(err, Error::CatalogUnavailable(_)));
    assert!(!index.is_online());
    assert_eq!(index.list_schemes(), Outcome::Unsupported);
    assert!(Arc::ptr_eq(&snapshot_before, &index.snapshot()));

    catalog.set_unreachable(false);
    index.reindex().await.unwrap();
    assert!(index.is_online());
    assert!(index.get_concept(&color_key("20210401"), "Red").is_found());
}

#[tokio::test]
async fn test_unreachable_catalog_can_keep_serving() {
    let catalog = Arc::new(ScriptedCatalog::new(vec![color_asset("20210401")]));
    let index = RemoteRepositoryIndex::with_config(
        catalog.clone(),
        RemoteIndexConfig {
            offline_when_unreachable: false,
            ..RemoteIndexConfig::default()
        },
    );
    index.reindex().await.unwrap();
    let before = observed(&index);

    catalog.set_unreachable(true);
    assert!(index.reindex().await.is_err());
    assert!(index.is_online());
    assert_eq!(observed(&index), before);
}

#[tokio::test]
async fn test_empty_catalog_stays_offline() {
    let catalog = Arc::new(ScriptedCatalog::new(Vec::new()));
    let index = remote(&catalog);

    let report = index.reindex().await.unwrap();
    assert_eq!(report.schemes, 0);
    assert!(!report.online);
    assert_eq!(index.list_schemes(), Outcome::Unsupported);
}

#[tokio::test]
async fn test_multiple_carriers_are_merged() {
    let asset = FakeAsset::multi(
        COLOR,
        "20210401",
        "Color",
        vec![
            document(COLOR, "20210401", json!([{"code": "Red"}, {"code": "Blue"}])),
            document(
                COLOR,
                "20210401",
                json!([{"code": "Crimson", "property": [{"code": "parent", "valueCode": "Red"}]}]),
            ),
        ],
    );
    let catalog = Arc::new(ScriptedCatalog::new(vec![asset]));
    let index = remote(&catalog);

    let report = index.reindex().await.unwrap();
    assert_eq!(report.concepts, 3);
    assert_eq!(catalog.fetch_count(), 2);

    let crimson = index
        .get_concept(&color_key("20210401"), "Crimson")
        .found()
        .unwrap();
    assert_eq!(crimson.ancestors.len(), 1);
    assert_eq!(crimson.ancestors[0].uuid, name_uuid("Red"));
}

#[tokio::test]
async fn test_asset_without_carriers_is_skipped() {
    let catalog = Arc::new(ScriptedCatalog::new(vec![
        FakeAsset::bare(SHAPE, "20200101", "Shape"),
        color_asset("20210401"),
    ]));
    let index = remote(&catalog);

    let report = index.reindex().await.unwrap();
    assert_eq!(report.assets, 2);
    assert_eq!(report.skipped_assets, 1);
    assert_eq!(index.list_schemes().found().unwrap().len(), 1);
}

#[tokio::test]
async fn test_asset_without_secondary_id_uses_asset_id() {
    let asset = color_asset("20210401").without_secondary_id();
    let asset_key = asset.surrogate.asset_id.key();
    let catalog = Arc::new(ScriptedCatalog::new(vec![asset]));
    let index = remote(&catalog);

    index.reindex().await.unwrap();
    let pointers = index.list_schemes().found().unwrap();
    assert_eq!(pointers[0].key(), asset_key);
    assert_eq!(pointers[0].tag, "Color");
}

#[tokio::test]
async fn test_lookup_across_versions_prefers_latest_asset() {
    let catalog = Arc::new(ScriptedCatalog::new(vec![
        color_asset("20210401"),
        FakeAsset::single(
            &format!("{}-legacy", COLOR),
            "20190801",
            "Color",
            document(COLOR, "20190801", json!([{"code": "Red"}])),
        ),
    ]));
    let index = remote(&catalog);
    index.reindex().await.unwrap();

    let red = index.lookup_across_versions("Red").unwrap().found().unwrap();
    assert_eq!(red.version_tag, "20210401");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_observe_partial_snapshots() {
    let catalog = Arc::new(
        ScriptedCatalog::new(vec![color_asset("20210401"), shape_asset("20210401")])
            .with_fetch_delay(Duration::from_millis(2)),
    );
    let index = Arc::new(remote(&catalog));
    index.reindex().await.unwrap();

    catalog.set_assets(vec![color_asset("20220101"), shape_asset("20220101")]);

    let reader = {
        let index = index.clone();
        tokio::spawn(async move {
            for _ in 0..200 {
                let pointers = index.list_schemes().found().unwrap();
                let versions: Vec<&str> =
                    pointers.iter().map(|p| p.version_tag.as_str()).collect();
                assert_eq!(versions.len(), 2);
                assert_eq!(versions[0], versions[1], "mixed snapshot observed");
                tokio::task::yield_now().await;
            }
        })
    };

    let writer = {
        let index = index.clone();
        tokio::spawn(async move {
            for _ in 0..3 {
                index.reindex().await.unwrap();
            }
        })
    };

    reader.await.unwrap();
    writer.await.unwrap();
    assert!(index.get_concept(&color_key("20220101"), "Red").is_found());
}

#[tokio::test]
async fn test_concurrent_reindex_calls_are_serialized() {
    let catalog = Arc::new(
        ScriptedCatalog::new(vec![color_asset("20210401")])
            .with_fetch_delay(Duration::from_millis(5)),
    );
    let index = Arc::new(remote(&catalog));

    let (a, b) = tokio::join!(index.reindex(), index.reindex());
    assert!(a.unwrap().online);
    assert!(b.unwrap().online);
    assert_eq!(catalog.fetch_count(), 2);
    assert_eq!(index.list_schemes().found().unwrap().len(), 1);
}
