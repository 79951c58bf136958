use accessly::features::{self, FeatureValue};
use accessly::page::Heading;
use accessly::{ConsentDecision, HostPage, MemoryPage, Surface, Widget, WidgetConfig};
use std::time::{Duration, Instant};

fn widget_on(page: MemoryPage) -> Widget {
    let config = WidgetConfig {
        site_id: Some("acme-prod-01".into()),
        ..WidgetConfig::default()
    };
    let mut w = accessly::init(config, Box::new(page));
    w.set_consent(ConsentDecision::Accepted);
    w
}

fn widget() -> Widget {
    widget_on(MemoryPage::new())
}

#[test]
fn rerender_of_same_state_is_byte_identical() {
    let mut w = widget();
    w.set_feature(features::BRIGHTNESS, FeatureValue::Percent(150));
    w.set_feature(features::GRAYSCALE, FeatureValue::Bool(true));
    let first = w.page().unwrap().page_filter().to_string();
    let first_css = w.effect_css();

    // Re-applying the identical values must not accumulate stale terms.
    w.set_feature(features::BRIGHTNESS, FeatureValue::Percent(150));
    w.set_feature(features::GRAYSCALE, FeatureValue::Bool(true));
    assert_eq!(w.page().unwrap().page_filter(), first);
    assert_eq!(w.effect_css(), first_css);
    assert_eq!(first, first_css);
}

#[test]
fn set_then_reset_leaves_no_residue() {
    let mut w = widget();
    w.set_feature(features::BRIGHTNESS, FeatureValue::Percent(150));
    assert_eq!(w.page().unwrap().page_filter(), "brightness(1.5)");

    w.set_feature(features::BRIGHTNESS, FeatureValue::Percent(100));
    assert_eq!(w.page().unwrap().page_filter(), "");
    assert_eq!(w.effect_css(), "");
}

#[test]
fn attribute_channel_features_render_as_root_attributes() {
    let mut w = widget();
    w.set_feature(features::FONT_SCALE, FeatureValue::Percent(150));
    w.set_feature(features::REDUCE_MOTION, FeatureValue::Bool(true));
    w.set_feature(features::CURSOR, FeatureValue::Mode("large".into()));

    let page = w.page().unwrap();
    assert_eq!(
        page.root_attribute("data-accessly-font-scale").as_deref(),
        Some("150")
    );
    assert_eq!(
        page.root_attribute("data-accessly-reduce-motion").as_deref(),
        Some("true")
    );
    assert_eq!(page.root_attribute("data-accessly-cursor").as_deref(), Some("large"));
    // Attribute features never leak into the filter expression.
    assert_eq!(page.page_filter(), "");
}

#[test]
fn default_valued_attributes_are_removed_not_written() {
    let mut w = widget();
    w.set_feature(features::FONT_SCALE, FeatureValue::Percent(150));
    w.set_feature(features::FONT_SCALE, FeatureValue::Percent(100));
    assert_eq!(w.page().unwrap().root_attribute("data-accessly-font-scale"), None);
}

#[test]
fn clamped_set_renders_the_clamped_value() {
    let mut w = widget();
    w.set_feature(features::BRIGHTNESS, FeatureValue::Percent(999));
    assert_eq!(w.get(features::BRIGHTNESS), Some(FeatureValue::Percent(200)));
    assert_eq!(w.page().unwrap().page_filter(), "brightness(2)");
}

#[test]
fn reset_all_clears_filter_and_attributes() {
    let mut w = widget();
    w.set_feature(features::BRIGHTNESS, FeatureValue::Percent(150));
    w.set_feature(features::FONT_SCALE, FeatureValue::Percent(125));
    w.reset_all();

    let page = w.page().unwrap();
    assert_eq!(page.page_filter(), "");
    assert_eq!(page.root_attribute("data-accessly-font-scale"), None);
}

#[test]
fn surface_visibility_renders_through_a_single_signal() {
    let mut w = widget();
    w.toggle(Surface::Panel);
    assert!(w.page().unwrap().surface_visible(Surface::Panel));
    w.toggle(Surface::Panel);
    assert!(!w.page().unwrap().surface_visible(Surface::Panel));
}

#[test]
fn guide_auto_dismiss_is_rendered_on_tick() {
    let mut w = widget();
    w.toggle(Surface::ShortcutGuide);
    assert!(w.page().unwrap().surface_visible(Surface::ShortcutGuide));

    w.tick(Instant::now() + Duration::from_secs(60));
    assert!(!w.is_open(Surface::ShortcutGuide));
    assert!(!w.page().unwrap().surface_visible(Surface::ShortcutGuide));
}

#[test]
fn reading_guide_follows_pointer_only_while_open() {
    let mut page = MemoryPage::new();
    page.move_reading_guide(0.0);
    let mut w = widget_on(page);

    w.pointer_moved(240.0);
    assert_eq!(w.page().unwrap().reading_guide_y(), 0.0);

    w.toggle(Surface::ReadingGuide);
    w.pointer_moved(240.0);
    assert_eq!(w.page().unwrap().reading_guide_y(), 240.0);
}

#[test]
fn structure_map_reads_the_host_outline() {
    let page = MemoryPage::with_headings(vec![
        Heading { level: 1, text: "Pricing".into() },
        Heading { level: 2, text: "Plans".into() },
    ]);
    let mut w = widget_on(page);
    w.toggle(Surface::StructureMap);

    let outline = w.structure_outline();
    assert_eq!(outline.len(), 2);
    assert_eq!(outline[0].text, "Pricing");
}
