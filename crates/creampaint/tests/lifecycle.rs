//! End-to-end sessions over in-memory pages.

use std::time::Duration;

use creampaint::memory::{MemoryDocument, PageSnapshot};
use creampaint::{
    ColorMode, Document, MutationRecord, NodeId, Rect, RepaintConfig, Repainter, RescanDecision,
    RescanPolicy, Visit, CREAM, SOFT_BLACK,
};

const PAGE: &str = r#"
tag: html
style:
  background-color: rgb(250, 250, 250)
children:
  - tag: head
    children:
      - tag: style
        style:
          color: rgb(0, 0, 0)
  - tag: body
    width: 1280
    height: 3000
    style:
      background-color: rgb(10, 10, 10)
      color: rgb(220, 220, 220)
    children:
      - tag: h1
        width: 600
        height: 40
        style:
          color: rgb(255, 255, 255)
          text-shadow: 1px 1px 2px rgba(0, 0, 0, 0.5)
      - tag: span
        width: 6
        height: 6
        style:
          background-color: rgb(255, 0, 0)
          border-top-color: rgb(255, 0, 0)
      - tag: svg
        width: 16
        height: 16
        children:
          - tag: path
            width: 2
            height: 2
            style:
              fill: rgb(240, 240, 240)
              stroke: rgba(0, 0, 0, 0.05)
      - text: "plain text"
"#;

fn load_page() -> MemoryDocument {
    let snapshot = PageSnapshot::from_yaml(PAGE).unwrap();
    MemoryDocument::from_snapshot(&snapshot).unwrap()
}

fn find(doc: &MemoryDocument, tag: &str) -> NodeId {
    let root = doc.document_element().unwrap();
    doc.descendants(root)
        .into_iter()
        .find(|n| doc.tag_name(*n) == Some(tag))
        .unwrap()
}

#[test]
fn test_snapshot_session_end_to_end() {
    let mut doc = load_page();
    let mut repainter = Repainter::default();

    // Body background is authoritative over the light root background.
    assert_eq!(repainter.start(&mut doc, Duration::ZERO), ColorMode::Dark);
    repainter.run_until_idle(&mut doc);

    let html = doc.document_element().unwrap();
    let body = doc.body().unwrap();
    let h1 = find(&doc, "h1");
    let span = find(&doc, "span");
    let path = find(&doc, "path");
    let style = find(&doc, "style");

    let cream = CREAM.to_string();
    let black = SOFT_BLACK.to_string();

    assert_eq!(doc.computed_value(html, "background-color"), cream);
    assert_eq!(doc.computed_value(body, "background-color"), cream);
    assert_eq!(doc.computed_value(body, "color"), cream);
    assert_eq!(doc.computed_value(h1, "color"), cream);
    assert_eq!(
        doc.computed_value(h1, "text-shadow"),
        format!("1px 1px 2px {}", black)
    );

    // Tiny boxes keep their background but still get border colors.
    assert_eq!(doc.inline_value(span, "background-color"), None);
    assert_eq!(doc.computed_value(span, "border-top-color"), black);

    // SVG paint has no size guard; faint stroke stays.
    assert_eq!(doc.computed_value(path, "fill"), cream);
    assert_eq!(doc.inline_value(path, "stroke"), None);

    // Non-visual tags are never touched.
    assert_eq!(doc.inline_value(style, "color"), None);

    // Every written plain value is one of the two targets.
    for write in doc.writes() {
        if write.property.ends_with("shadow") {
            continue;
        }
        assert!(write.value == cream || write.value == black, "{:?}", write);
    }
}

#[test]
fn test_large_page_needs_several_frames() {
    let mut doc = MemoryDocument::new();
    let html = doc.create_element("html");
    let body = doc.create_element("body");
    doc.set_document_element(html);
    doc.append_child(html, body);
    for _ in 0..1199 {
        let div = doc.create_element("div");
        doc.append_child(body, div);
    }

    let mut repainter = Repainter::default();
    repainter.start(&mut doc, Duration::ZERO);
    assert!(repainter.wants_frame());
    assert_eq!(repainter.processor().processed().len(), 500);

    assert_eq!(repainter.run_until_idle(&mut doc), 2);
    assert_eq!(repainter.processor().processed().len(), 1200);
    assert_eq!(repainter.stats().frames, 2);
}

#[test]
fn test_mutation_of_thousand_descendants_is_capped() {
    let mut doc = load_page();
    let mut repainter = Repainter::default();
    repainter.start(&mut doc, Duration::ZERO);
    repainter.run_until_idle(&mut doc);
    let before = repainter.processor().processed().len();

    let body = doc.body().unwrap();
    let feed = doc.create_element("ul");
    for _ in 0..1000 {
        let li = doc.create_element("li");
        doc.set_rect(li, Rect::new(300.0, 20.0));
        doc.set_computed(li, "color", "rgb(0, 0, 0)");
        doc.append_child(feed, li);
    }
    doc.append_child(body, feed);

    let visited = repainter.on_mutations(&mut doc, &[MutationRecord::added(body, vec![feed])]);
    assert_eq!(visited, 401);
    assert_eq!(repainter.processor().processed().len(), before + 401);

    // The next periodic scan picks up the rest.
    let decision = repainter.on_interval(&mut doc, Duration::from_secs(3));
    assert_eq!(decision, RescanDecision::Rescan(Visit::Normal));
    repainter.run_until_idle(&mut doc);
    assert_eq!(repainter.processor().processed().len(), before + 1001);
}

#[test]
fn test_removed_elements_leave_processed_set() {
    let mut doc = MemoryDocument::new();
    let html = doc.create_element("html");
    let body = doc.create_element("body");
    doc.set_document_element(html);
    doc.append_child(html, body);

    let mut repainter = Repainter::default();
    repainter.start(&mut doc, Duration::ZERO);
    repainter.run_until_idle(&mut doc);
    assert_eq!(repainter.processor().processed().len(), 1);

    for _ in 0..100 {
        let card = doc.create_element("div");
        let label = doc.create_element("span");
        doc.append_child(card, label);
        doc.append_child(body, card);
        repainter.on_mutations(&mut doc, &[MutationRecord::added(body, vec![card])]);
        assert_eq!(repainter.processor().processed().len(), 3);

        doc.detach(card);
        repainter.on_mutations(&mut doc, &[MutationRecord::removed(body, vec![card])]);
    }

    assert_eq!(repainter.processor().processed().len(), 1);
    assert!(repainter.processor().processed().contains(body));
}

#[test]
fn test_periodic_rescan_window() {
    let mut doc = load_page();
    let mut repainter = Repainter::default();
    repainter.start(&mut doc, Duration::from_secs(100));

    let mut rescans = 0;
    let mut now = Duration::from_secs(100);
    loop {
        now += Duration::from_secs(3);
        match repainter.on_interval(&mut doc, now) {
            RescanDecision::Rescan(_) => rescans += 1,
            RescanDecision::Expired => break,
            other => panic!("unexpected {:?}", other),
        }
        repainter.run_until_idle(&mut doc);
    }
    // Ticks at 3s..297s scan; the tick at 300s expires.
    assert_eq!(rescans, 99);
    assert_eq!(now, Duration::from_secs(400));
    assert_eq!(repainter.next_interval_due(), None);
    assert_eq!(
        repainter.on_interval(&mut doc, now + Duration::from_secs(3)),
        RescanDecision::Cancelled
    );
}

#[test]
fn test_respect_mark_ignores_later_color_changes() {
    let mut doc = load_page();
    let mut repainter = Repainter::default();
    repainter.start(&mut doc, Duration::ZERO);
    let h1 = find(&doc, "h1");
    let writes = doc.writes().len();

    doc.set_computed(h1, "outline-color", "rgb(0, 0, 0)");
    repainter.on_interval(&mut doc, Duration::from_secs(3));
    repainter.run_until_idle(&mut doc);
    assert_eq!(doc.writes().len(), writes);
    assert_eq!(doc.inline_value(h1, "outline-color"), None);
}

#[test]
fn test_bypass_mark_repaints_later_color_changes() {
    let mut doc = load_page();
    let config = RepaintConfig {
        rescan_policy: RescanPolicy::BypassMark,
        ..RepaintConfig::default()
    };
    let mut repainter = Repainter::new(config);
    repainter.start(&mut doc, Duration::ZERO);
    let h1 = find(&doc, "h1");

    doc.set_computed(h1, "outline-color", "rgb(0, 0, 0)");
    assert_eq!(
        repainter.on_interval(&mut doc, Duration::from_secs(3)),
        RescanDecision::Rescan(Visit::Forced)
    );
    repainter.run_until_idle(&mut doc);
    assert_eq!(
        doc.inline_value(h1, "outline-color"),
        Some(SOFT_BLACK.to_string().as_str())
    );
}

#[test]
fn test_mutation_path_off() {
    let mut doc = load_page();
    let config = RepaintConfig {
        observe_mutations: false,
        ..RepaintConfig::default()
    };
    let mut repainter = Repainter::new(config);
    repainter.start(&mut doc, Duration::ZERO);

    let body = doc.body().unwrap();
    let late = doc.create_element("div");
    doc.set_computed(late, "color", "rgb(0, 0, 0)");
    doc.append_child(body, late);
    assert_eq!(
        repainter.on_mutations(&mut doc, &[MutationRecord::added(body, vec![late])]),
        0
    );
    assert_eq!(doc.inline_value(late, "color"), None);
}
