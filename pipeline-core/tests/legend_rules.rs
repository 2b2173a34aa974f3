use pipeline_core::{
    color_for, derive_legend, CategoryColor, PipelineRecord, PipelineSettings, PipelineSnapshot,
    CATEGORY_PALETTE, FALLBACK_COLOR, MAX_RENDERED_RECORDS,
};

fn record(title: &str, phase: &str, category: &str) -> PipelineRecord {
    PipelineRecord {
        title: Some(title.to_string()),
        phase: Some(phase.to_string()),
        category: Some(category.to_string()),
        name: None,
    }
}

#[test]
fn configured_categories_keep_their_order() {
    let legend = derive_legend(
        &["Fintech".to_string(), "Agritech".to_string()],
        &[record("Alpha", "Seed", "Agritech")],
    );

    assert_eq!(legend.len(), 2);
    assert_eq!(legend[0].category, "Fintech");
    assert_eq!(legend[0].color, CATEGORY_PALETTE[0]);
    assert_eq!(legend[1].category, "Agritech");
    assert_eq!(legend[1].color, CATEGORY_PALETTE[1]);
}

#[test]
fn derived_categories_are_sorted_and_distinct() {
    let records = vec![
        record("Alpha", "Seed", "Fintech"),
        record("Beta", "Seed", "Agritech"),
        record("Gamma", "Seed", "Fintech"),
    ];

    let legend = derive_legend(&[], &records);

    assert_eq!(legend.len(), 2);
    assert_eq!(legend[0].category, "Agritech");
    assert_eq!(legend[1].category, "Fintech");
}

#[test]
fn palette_wraps_after_fifteen_categories() {
    let configured: Vec<String> = (0..17).map(|i| format!("Category {i:02}")).collect();

    let legend = derive_legend(&configured, &[]);

    assert_eq!(legend[14].color, CATEGORY_PALETTE[14]);
    assert_eq!(legend[15].color, CATEGORY_PALETTE[0]);
    assert_eq!(legend[16].color, CATEGORY_PALETTE[1]);
}

#[test]
fn color_lookup_matches_first_entry_then_falls_back() {
    let legend = vec![
        CategoryColor {
            category: "Fintech".to_string(),
            color: "#111111".to_string(),
        },
        CategoryColor {
            category: "Fintech".to_string(),
            color: "#222222".to_string(),
        },
    ];

    assert_eq!(color_for(&legend, Some("Fintech")), "#111111");
    assert_eq!(color_for(&legend, Some("Unknown")), FALLBACK_COLOR);
    assert_eq!(color_for(&legend, None), FALLBACK_COLOR);
}

#[test]
fn snapshot_groups_records_by_exact_phase_label() {
    let settings = PipelineSettings {
        phases: "Seed, Series A".to_string(),
        ..PipelineSettings::default()
    };

    let records = vec![
        record("Alpha", "Seed", "Fintech"),
        record("Beta", "Series A", "Agritech"),
        record("Gamma", "Seed", "Fintech"),
        record("Delta", "series a", "Fintech"),
    ];

    let snapshot = PipelineSnapshot::build(&settings, records);

    assert_eq!(snapshot.phases.len(), 2);
    assert_eq!(snapshot.phases[0].records.len(), 2);
    assert_eq!(
        snapshot.phases[0].records[1].title.as_deref(),
        Some("Gamma")
    );
    assert_eq!(snapshot.phases[1].records.len(), 1);
    assert_eq!(snapshot.placed_records(), 3);
}

#[test]
fn snapshot_caps_rendered_records() {
    let settings = PipelineSettings {
        phases: "Seed".to_string(),
        ..PipelineSettings::default()
    };

    let records: Vec<PipelineRecord> = (0..300)
        .map(|i| record(&format!("Company {i:03}"), "Seed", "Fintech"))
        .collect();

    let snapshot = PipelineSnapshot::build(&settings, records);

    assert_eq!(snapshot.total_records, 300);
    assert!(snapshot.truncated);
    assert_eq!(snapshot.placed_records(), MAX_RENDERED_RECORDS);
    let last = snapshot.phases[0].records.last().expect("Cột Seed trống");
    assert_eq!(last.title.as_deref(), Some("Company 249"));
}

#[test]
fn legend_ignores_records_beyond_the_cap() {
    let settings = PipelineSettings {
        phases: "Seed".to_string(),
        ..PipelineSettings::default()
    };

    let mut records: Vec<PipelineRecord> = (0..MAX_RENDERED_RECORDS)
        .map(|i| record(&format!("Company {i:03}"), "Seed", "Fintech"))
        .collect();
    records.push(record("Overflow", "Seed", "Spacetech"));

    let snapshot = PipelineSnapshot::build(&settings, records);

    assert_eq!(snapshot.legend.len(), 1);
    assert_eq!(snapshot.legend[0].category, "Fintech");
    assert!(snapshot.truncated);
}

#[test]
fn identical_inputs_build_identical_snapshots() {
    let settings = PipelineSettings {
        phases: "Seed, Series A".to_string(),
        ..PipelineSettings::default()
    };
    let records = vec![
        record("Alpha", "Seed", "Fintech"),
        record("Beta", "Series A", "Agritech"),
    ];

    let first = PipelineSnapshot::build(&settings, records.clone());
    let mut second = PipelineSnapshot::build(&settings, records);

    second.generated_at = first.generated_at;
    assert_eq!(first, second);
}

#[test]
fn snapshot_without_records_keeps_every_phase_column() {
    let settings = PipelineSettings {
        title: "Quỹ đầu tư".to_string(),
        phases: "Seed, Series A, Series B".to_string(),
        ..PipelineSettings::default()
    };

    let snapshot = PipelineSnapshot::build(&settings, Vec::new());

    assert_eq!(snapshot.title, "Quỹ đầu tư");
    assert_eq!(snapshot.phases.len(), 3);
    assert!(snapshot
        .phases
        .iter()
        .all(|column| column.records.is_empty()));
    assert!(snapshot.legend.is_empty());
    assert_eq!(snapshot.total_records, 0);
    assert!(!snapshot.truncated);
}
