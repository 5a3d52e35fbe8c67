//! Counter Example - batched renders and intercepted clicks
//!
//! This example demonstrates:
//! - Attaching a render function that reads a signal
//! - Clicking a rendered button several times within one frame
//! - One coalesced render pass patching the DOM
//! - Stopping and resuming the projector
//!
//! Run with: cargo run --example counter

use std::rc::Rc;

use spark_projector::{
    h, DomNode, Event, FrameQueue, HeadlessDom, Projector, ProjectorOptions, RenderFunction,
};
use spark_signals::signal;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    println!("=== spark-projector Counter Example ===\n");

    let frames = Rc::new(FrameQueue::new());
    let projector = Projector::new(ProjectorOptions::new(), Rc::new(HeadlessDom), frames.clone());

    let count = signal(0u32);
    let body = DomNode::element("body");
    let clicks = count.clone();
    projector.append(
        &body,
        RenderFunction::new(move || {
            let bump = clicks.clone();
            h("div.counter")
                .child(h("span").text_child(&format!("Clicks: {}", clicks.get())))
                .child(h("button#inc").on("click", move |_: &Event| bump.set(bump.get() + 1)))
        }),
    )?;

    let root = body.first_child().ok_or("nothing rendered")?;
    let button = root.children().get(1).cloned().ok_or("button missing")?;
    let label = || {
        root.first_child()
            .and_then(|span| span.first_child())
            .and_then(|text| text.text_content())
    };

    println!("Before clicks: {:?}", label());
    for _ in 0..3 {
        button.dispatch(&Event::new("click"));
    }
    println!("Frames requested after 3 clicks: {}", frames.requested());

    frames.tick()?;
    println!("After one frame: {:?}", label());

    projector.stop();
    button.dispatch(&Event::new("click"));
    println!("Stopped, pending frames: {}", frames.pending());

    projector.resume();
    frames.tick()?;
    println!("Resumed: {:?} ({:?})", label(), projector.status());

    Ok(())
}
