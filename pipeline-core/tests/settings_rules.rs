use pipeline_core::{
    companies_height_css, content_height_css, content_width_css, LayoutBand, PipelineSettings,
    Viewport,
};

#[test]
fn defaults_cover_every_property() {
    let settings = PipelineSettings::default();

    assert_eq!(settings.title, "Pipeline");
    assert!(settings.phases.is_empty());
    assert!(settings.categories.is_empty());
    assert!(settings.image_url.is_empty());
    assert_eq!(settings.layout, LayoutBand::None);
}

#[test]
fn enumeration_lists_current_values_in_pane_order() {
    let settings = PipelineSettings {
        title: "Funnel".to_string(),
        phases: "Seed,Growth".to_string(),
        categories: "Fintech".to_string(),
        image_url: "https://example.com/logo.png".to_string(),
        layout: LayoutBand::Footer,
    };

    let properties = settings.enumerate_properties(PipelineSettings::OBJECT_NAME);

    let pairs: Vec<(&str, &str)> = properties
        .iter()
        .map(|entry| (entry.property.as_str(), entry.value.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("title", "Funnel"),
            ("phases", "Seed,Growth"),
            ("categories", "Fintech"),
            ("imageUrl", "https://example.com/logo.png"),
            ("layout", "footer"),
        ]
    );
    assert!(properties
        .iter()
        .all(|entry| entry.object == PipelineSettings::OBJECT_NAME));
}

#[test]
fn enumeration_of_unknown_object_is_empty() {
    let settings = PipelineSettings::default();

    assert!(settings.enumerate_properties("legend").is_empty());
}

#[test]
fn labels_are_trimmed_and_empties_dropped() {
    let settings = PipelineSettings {
        phases: " Seed , ,Series A,".to_string(),
        categories: ",,".to_string(),
        ..PipelineSettings::default()
    };

    assert_eq!(settings.phase_labels(), vec!["Seed", "Series A"]);
    assert!(settings.category_labels().is_empty());
}

#[test]
fn layout_parse_tolerates_host_strings() {
    assert_eq!(LayoutBand::parse("header"), LayoutBand::Header);
    assert_eq!(LayoutBand::parse(" FOOTER "), LayoutBand::Footer);
    assert_eq!(LayoutBand::parse("none"), LayoutBand::None);
    assert_eq!(LayoutBand::parse("diagonal"), LayoutBand::None);
    assert_eq!(LayoutBand::parse(""), LayoutBand::None);
}

#[test]
fn content_width_follows_viewport() {
    let viewport = Viewport {
        width: 743.25,
        height: 0.0,
    };

    assert_eq!(content_width_css(viewport), "743.25px");
    assert_eq!(content_width_css(Viewport::default()), "100%");
}

#[test]
fn content_height_reserves_band_space() {
    let viewport = Viewport {
        width: 800.0,
        height: 660.0,
    };
    let short = Viewport {
        width: 800.0,
        height: 40.0,
    };

    assert_eq!(content_height_css(viewport, LayoutBand::None), "660px");
    assert_eq!(content_height_css(viewport, LayoutBand::Header), "564px");
    assert_eq!(content_height_css(short, LayoutBand::Footer), "0px");
    assert_eq!(
        content_height_css(Viewport::default(), LayoutBand::Header),
        "calc(100% - 96px)"
    );
    assert_eq!(content_height_css(Viewport::default(), LayoutBand::None), "100%");
}

#[test]
fn companies_height_subtracts_legend_and_bar() {
    assert_eq!(companies_height_css(48.0), "calc(100% - 120px)");
    assert_eq!(companies_height_css(0.0), "calc(100% - 72px)");
}
