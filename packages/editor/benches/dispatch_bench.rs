use criterion::{black_box, criterion_group, criterion_main, Criterion};
use liveedit_editor::{
    resolve_target, EditController, EditorConfig, NodeId, RenderTree, Trigger, TriggerGesture,
    VDocument, VNode,
};

/// Annotated section with `depth` levels of inline markup below it
fn deep_page(depth: usize) -> (VDocument, NodeId) {
    let mut leaf = VNode::text("deep");
    for _ in 0..depth {
        leaf = VNode::element("span").with_child(leaf);
    }

    let mut doc = VDocument::new();
    let root = doc.mount(
        VNode::element("section")
            .with_attr("data-edit-key", "body_copy")
            .with_attr("data-page-key", "bench")
            .with_child(leaf),
    );

    let mut target = root;
    while let Some(&child) = doc.children(target).first() {
        target = child;
    }
    (doc, target)
}

fn resolve_nested_target(c: &mut Criterion) {
    let config = EditorConfig::default();
    let (doc, target) = deep_page(64);

    c.bench_function("resolve_target_depth_64", |b| {
        b.iter(|| resolve_target(black_box(&doc), black_box(target), &config))
    });
}

fn open_preview_cancel(c: &mut Criterion) {
    let (mut doc, target) = deep_page(8);
    let mut controller = EditController::new(EditorConfig::default());

    c.bench_function("open_preview_cancel", |b| {
        b.iter(|| {
            controller.handle_trigger(&mut doc, Trigger::new(target, TriggerGesture::DoubleClick));
            let _ = controller.apply_candidate(&mut doc, black_box("candidate"));
            let _ = controller.cancel(&mut doc);
        })
    });
}

criterion_group!(benches, resolve_nested_target, open_preview_cancel);
criterion_main!(benches);
