//! Projector behavior driven end to end.
//!
//! Every test wires a `Projector` to the headless DOM and a manually ticked
//! `FrameQueue`, so frame requests, cancellations and render passes are all
//! observable.
//!
//! Run with: cargo test --test projector

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_projector::{
    h, handler, DoRender, DomNode, Event, EventHandler, FrameQueue, FrameScheduler, HeadlessDom,
    PerformanceEvent, ProjectionOptions, Projector, ProjectorError, ProjectorOptions,
    ProjectorStatus, Registrations, RenderError, RenderFunction, VNode,
};

// =============================================================================
// HELPERS
// =============================================================================

fn setup(options: ProjectorOptions) -> (Projector, Rc<FrameQueue>) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
    let frames = Rc::new(FrameQueue::new());
    let projector = Projector::new(options, Rc::new(HeadlessDom), frames.clone());
    (projector, frames)
}

/// Render function that counts its invocations.
fn counted(calls: &Rc<Cell<usize>>, render: impl Fn() -> VNode + 'static) -> RenderFunction {
    let calls = calls.clone();
    RenderFunction::new(move || {
        calls.set(calls.get() + 1);
        render()
    })
}

fn counter() -> (Rc<Cell<usize>>, EventHandler) {
    let hits = Rc::new(Cell::new(0));
    let count = hits.clone();
    (hits, handler(move |_: &Event| count.set(count.get() + 1)))
}

fn click(node: &DomNode) -> Option<bool> {
    node.invoke_listener(&Event::with_current_target("click", node))
}

// =============================================================================
// ATTACH
// =============================================================================

#[test]
fn renders_immediately_when_attaching() {
    let (projector, frames) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let calls = Rc::new(Cell::new(0));
    let render = counted(&calls, || h("div").child(h("span")));

    // Append
    projector.append(&body, render.clone()).unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(body.children()[0].tag().as_deref(), Some("div"));

    // InsertBefore
    let sibling = DomNode::element("p");
    body.append_child(&sibling).unwrap();
    projector.insert_before(&sibling, render.clone()).unwrap();
    assert_eq!(calls.get(), 2);
    assert_eq!(body.children()[1].tag().as_deref(), Some("div"));
    assert_eq!(body.children()[2], sibling);

    // Merge
    let clean_calls = Rc::new(Cell::new(0));
    let existing = DomNode::element("div");
    projector
        .merge(&existing, counted(&clean_calls, || h("div").child(h("span"))))
        .unwrap();
    assert_eq!(clean_calls.get(), 1);
    assert_eq!(existing.child_count(), 1);
    assert_eq!(existing.children()[0].tag().as_deref(), Some("span"));

    // Replace
    let old = DomNode::element("em");
    body.append_child(&old).unwrap();
    projector.replace(&old, render.clone()).unwrap();
    assert_eq!(calls.get(), 3);
    assert_eq!(old.parent(), None);
    assert_eq!(body.children()[3].tag().as_deref(), Some("div"));

    // ScheduleRender
    projector.schedule_render();
    assert_eq!(calls.get(), 3);
    assert_eq!(frames.requested(), 1);
    frames.tick().unwrap();
    assert_eq!(calls.get(), 6);
    assert_eq!(clean_calls.get(), 2);
    assert_eq!(projector.len(), 4);
}

#[test]
fn failed_attach_leaves_no_interceptor_behind() {
    let (projector, _) = setup(ProjectorOptions::new());
    let orphan = DomNode::element("div");

    let err = projector.replace(&orphan, RenderFunction::new(|| h("span"))).err();
    assert!(matches!(err, Some(ProjectorError::Dom(_))));
    assert!(projector.is_empty());
    assert!(projector.projection_options().event_handler_interceptor.is_none());
}

#[test]
fn after_first_vnode_rendered_sees_first_render() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let (projector, _) = setup(ProjectorOptions::new().with_after_first_vnode_rendered(
        move |projection, vnode| {
            assert_eq!(vnode.dom_node(), Some(&projection.dom_node()));
            sink.borrow_mut().push(vnode.selector().to_string());
        },
    ));
    let body = DomNode::element("body");

    projector.append(&body, RenderFunction::new(|| h("div#a"))).unwrap();
    projector.append(&body, RenderFunction::new(|| h("div#b"))).unwrap();
    assert_eq!(*seen.borrow(), vec!["div#a", "div#b"]);
}

// =============================================================================
// SCHEDULING
// =============================================================================

#[test]
fn can_stop_and_resume() {
    let (projector, frames) = setup(ProjectorOptions::new());
    projector.schedule_render();
    assert_eq!(frames.requested(), 1);
    frames.tick().unwrap();

    // Stop
    projector.stop();
    projector.schedule_render();
    assert_eq!(frames.requested(), 1);
    assert_eq!(projector.status(), ProjectorStatus::Stopped);

    // Resume
    projector.resume();
    assert_eq!(frames.requested(), 2);
    frames.tick().unwrap();

    // Stopping before rendering
    projector.schedule_render();
    assert_eq!(frames.requested(), 3);
    projector.stop();
    assert_eq!(frames.cancelled(), 1);
    assert_eq!(frames.pending(), 0);
}

#[test]
fn stop_from_an_earlier_frame_callback_cancels_the_render() {
    let (projector, frames) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let calls = Rc::new(Cell::new(0));
    projector.append(&body, counted(&calls, || h("div"))).unwrap();
    calls.set(0);

    let stopper = projector.clone();
    frames.request_frame(Box::new(move || {
        stopper.stop();
        Ok(())
    }));
    projector.schedule_render();

    assert_eq!(frames.tick(), Ok(1));
    assert_eq!(calls.get(), 0);
    assert!(projector.is_stopped());
    assert!(!projector.is_scheduled());
    assert_eq!(frames.cancelled(), 1);

    projector.resume();
    frames.tick().unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn render_requests_during_a_pass_are_deferred() {
    let (projector, frames) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let calls = Rc::new(Cell::new(0));
    let reenter = Rc::new(Cell::new(false));
    let nested = Rc::new(RefCell::new(None));

    let (count, again, outcome, handle) =
        (calls.clone(), reenter.clone(), nested.clone(), projector.clone());
    projector
        .append(
            &body,
            RenderFunction::new(move || {
                count.set(count.get() + 1);
                if again.get() {
                    *outcome.borrow_mut() = Some(handle.render_now());
                    handle.schedule_render();
                    handle.schedule_render();
                }
                h("div")
            }),
        )
        .unwrap();
    assert_eq!(calls.get(), 1);

    reenter.set(true);
    projector.schedule_render();
    assert_eq!(frames.tick(), Ok(1));

    // The nested render_now ran nothing, the nested schedules coalesced
    assert_eq!(calls.get(), 2);
    assert_eq!(*nested.borrow(), Some(Ok(())));
    assert_eq!(frames.pending(), 1);
    assert!(projector.is_scheduled());

    reenter.set(false);
    frames.tick().unwrap();
    assert_eq!(calls.get(), 3);
    assert_eq!(frames.pending(), 0);
}

#[test]
fn render_passes_follow_insertion_order() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let (projector, frames) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    for name in ["first", "second", "third"] {
        let order = order.clone();
        projector
            .append(
                &body,
                RenderFunction::new(move || {
                    order.borrow_mut().push(name);
                    h("div")
                }),
            )
            .unwrap();
    }
    order.borrow_mut().clear();

    projector.schedule_render();
    frames.tick().unwrap();
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn performance_logger_sees_lifecycle_sequence() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let (projector, frames) = setup(ProjectorOptions::new().with_performance_logger(
        move |event: PerformanceEvent, _: Option<&Event>| sink.borrow_mut().push(event.as_str()),
    ));
    let body = DomNode::element("body");
    let (_, on_click) = counter();
    projector
        .append(
            &body,
            RenderFunction::new(move || h("button").on_handler("click", on_click.clone())),
        )
        .unwrap();
    projector.append(&body, RenderFunction::new(|| h("p"))).unwrap();

    click(&body.children()[0]);
    frames.tick().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "domEvent",
            "domEventProcessed",
            "renderStart",
            "rendered",
            "patched",
            "rendered",
            "patched",
            "renderDone",
        ]
    );
}

// =============================================================================
// FAULTS
// =============================================================================

#[test]
fn stops_when_an_error_during_rendering_is_encountered() {
    let (projector, frames) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let fail = Rc::new(Cell::new(false));
    let calls = Rc::new(Cell::new(0));
    let (flag, count) = (fail.clone(), calls.clone());
    projector
        .append(
            &body,
            RenderFunction::new(move || {
                count.set(count.get() + 1);
                if flag.get() {
                    Err(RenderError::from("Rendering error"))
                } else {
                    Ok(h("div"))
                }
            }),
        )
        .unwrap();

    fail.set(true);
    projector.schedule_render();
    let err = frames.tick().unwrap_err();
    assert_eq!(err, ProjectorError::Render(RenderError::Failed("Rendering error".into())));
    assert_eq!(projector.status(), ProjectorStatus::Faulted);

    // Later frames skip the pass entirely
    calls.set(0);
    projector.schedule_render();
    assert_eq!(frames.requested(), 2);
    assert_eq!(frames.tick(), Ok(1));
    assert_eq!(calls.get(), 0);
    assert_eq!(projector.render_now(), Ok(()));
    assert_eq!(calls.get(), 0);

    // Resume clears the fault and renders again
    fail.set(false);
    projector.resume();
    assert_eq!(frames.requested(), 3);
    frames.tick().unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(projector.status(), ProjectorStatus::Idle);
}

#[test]
fn root_selector_change_faults_the_pass() {
    let (projector, _) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let tag = Rc::new(Cell::new("div"));
    let current = tag.clone();
    projector
        .append(&body, RenderFunction::new(move || h(current.get())))
        .unwrap();

    tag.set("section");
    assert_eq!(
        projector.render_now(),
        Err(ProjectorError::Render(RenderError::RootSelectorChanged {
            from: "div".into(),
            to: "section".into(),
        }))
    );
    assert_eq!(projector.status(), ProjectorStatus::Faulted);
}

// =============================================================================
// EVENT HANDLERS
// =============================================================================

#[test]
fn schedules_a_render_when_event_handlers_are_called() {
    let (projector, frames) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let (clicks, on_click) = counter();
    projector
        .append(
            &body,
            RenderFunction::new(move || h("button").on_handler("click", on_click.clone())),
        )
        .unwrap();

    let button = body.first_child().unwrap();
    assert_eq!(frames.requested(), 0);

    click(&button);
    assert_eq!(frames.requested(), 1);
    assert_eq!(clicks.get(), 1);
}

#[test]
fn can_choose_not_to_schedule_render_from_an_event_handler() {
    let (projector, frames) = setup(ProjectorOptions::new().with_handle_intercepted_event(
        |_projector, vnode, _node, event| {
            vnode
                .properties()
                .handler_for(event.event_type())
                .and_then(|handler| handler(event))
        },
    ));
    let body = DomNode::element("body");
    let (clicks, on_click) = counter();
    projector
        .append(
            &body,
            RenderFunction::new(move || h("button").on_handler("click", on_click.clone())),
        )
        .unwrap();

    click(&body.first_child().unwrap());
    assert_eq!(clicks.get(), 1);
    assert_eq!(frames.requested(), 0);
}

#[test]
fn handler_returning_false_prevents_default() {
    let (projector, _) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    projector
        .append(&body, RenderFunction::new(|| h("a").on("click", |_| false)))
        .unwrap();

    let event = Event::new("click");
    let link = body.first_child().unwrap();
    assert!(!link.dispatch(&event));
    assert!(event.default_prevented());
}

#[test]
fn bubbled_events_resolve_each_listener_node() {
    let (projector, _) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let (outer_hits, outer) = counter();
    let (inner_hits, inner) = counter();
    projector
        .append(
            &body,
            RenderFunction::new(move || {
                h("div")
                    .on_handler("click", outer.clone())
                    .child(h("button").on_handler("click", inner.clone()))
            }),
        )
        .unwrap();

    let button = body.first_child().unwrap().first_child().unwrap();
    button.dispatch(&Event::new("click"));
    assert_eq!(inner_hits.get(), 1);
    assert_eq!(outer_hits.get(), 1);
}

#[test]
fn resolves_nested_handler_by_path() {
    let resolved = Rc::new(RefCell::new(None));
    let sink = resolved.clone();
    let (projector, _) = setup(ProjectorOptions::new().with_handle_intercepted_event(
        move |_projector, vnode, _node, _event| {
            *sink.borrow_mut() = Some(vnode.selector().to_string());
            None
        },
    ));
    let body = DomNode::element("body");
    let (_, on_click) = counter();
    let projection = projector
        .append(
            &body,
            RenderFunction::new(move || {
                let button = h("button.h1").on_handler("click", on_click.clone());
                h("div").child(h("span").child(button))
            }),
        )
        .unwrap();

    let button = projection.dom_node().first_child().unwrap().first_child().unwrap();
    click(&button);
    assert_eq!(resolved.borrow().as_deref(), Some("button.h1"));
}

#[test]
fn allows_for_event_handlers_to_be_changed() {
    let (projector, _) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let (first_hits, first) = counter();
    let current: Rc<RefCell<EventHandler>> = Rc::new(RefCell::new(first));
    let source = current.clone();
    let projection = projector
        .append(
            &body,
            RenderFunction::new(move || {
                let button = h("button").on_handler("click", source.borrow().clone());
                h("div").child(h("span").child(button))
            }),
        )
        .unwrap();

    let button = projection.dom_node().first_child().unwrap().first_child().unwrap();
    click(&button);
    assert_eq!(first_hits.get(), 1);

    // Simulate changing the event handler
    let (second_hits, second) = counter();
    *current.borrow_mut() = second;
    projector.render_now().unwrap();

    click(&button);
    assert_eq!(second_hits.get(), 1);
    assert_eq!(first_hits.get(), 1);
}

#[test]
fn will_not_call_handlers_on_nodes_no_longer_rendered() {
    let (projector, _) = setup(ProjectorOptions::new());
    let section = DomNode::element("section");
    let visible = Rc::new(Cell::new(true));
    let (blurs, on_blur) = counter();
    let state = visible.clone();
    let projection = projector
        .append(
            &section,
            RenderFunction::new(move || {
                let hide = state.clone();
                let buttons = state.get().then(|| {
                    h("button")
                        .on_handler("blur", on_blur.clone())
                        .on("click", move |_| hide.set(false))
                });
                h("div").children_from(buttons)
            }),
        )
        .unwrap();

    let div = projection.dom_node();
    let button = div.first_child().unwrap();
    click(&button);
    assert!(!visible.get());
    projector.render_now().unwrap();
    assert_eq!(div.child_count(), 0);

    // A blur fires right before the button loses its parent
    div.append_child(&button).unwrap();
    assert!(button.has_listener("blur"));
    button.invoke_listener(&Event::with_current_target("blur", &button));
    assert_eq!(blurs.get(), 0);

    // Fully detached nodes do not resolve either
    button.detach();
    button.invoke_listener(&Event::with_current_target("blur", &button));
    assert_eq!(blurs.get(), 0);
}

#[test]
fn nodes_added_after_first_render_are_intercepted() {
    let resolved = Rc::new(Cell::new(0));
    let hits = resolved.clone();
    let (projector, _) = setup(ProjectorOptions::new().with_handle_intercepted_event(
        move |_projector, vnode, _node, event| {
            hits.set(hits.get() + 1);
            vnode.properties().handler_for(event.event_type()).and_then(|h| h(event))
        },
    ));
    let body = DomNode::element("body");
    let show = Rc::new(Cell::new(false));
    let flag = show.clone();
    let (clicks, on_click) = counter();
    let projection = projector
        .append(
            &body,
            RenderFunction::new(move || {
                let button = flag.get().then(|| h("button").on_handler("click", on_click.clone()));
                h("div").children_from(button)
            }),
        )
        .unwrap();

    show.set(true);
    projector.render_now().unwrap();
    click(&projection.dom_node().first_child().unwrap());
    assert_eq!(resolved.get(), 1);
    assert_eq!(clicks.get(), 1);
}

// =============================================================================
// DETACH
// =============================================================================

#[test]
fn can_detach_a_projection() {
    let (projector, _) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let first = RenderFunction::new(|| h("textarea#t1"));
    let second = RenderFunction::new(|| h("textarea#t2"));
    projector.append(&body, first.clone()).unwrap();
    projector.append(&body, second.clone()).unwrap();

    let projection = projector.detach(&first).unwrap();
    assert_eq!(projection.dom_node().id().as_deref(), Some("t1"));
    assert_eq!(projector.len(), 1);

    assert_eq!(
        projector.detach(&first).err(),
        Some(ProjectorError::RenderFunctionNotFound)
    );
}

#[test]
fn detached_projection_is_not_rendered() {
    let (projector, frames) = setup(ProjectorOptions::new());
    let body = DomNode::element("body");
    let calls = Rc::new(Cell::new(0));
    let render = counted(&calls, || h("div"));
    projector.append(&body, render.clone()).unwrap();
    projector.detach(&render).unwrap();

    projector.schedule_render();
    frames.tick().unwrap();
    assert_eq!(calls.get(), 1);
}

// =============================================================================
// HOOKS
// =============================================================================

#[test]
fn can_replace_the_internal_render_function() {
    let after_first = Rc::new(Cell::new(0));
    let spy = Rc::new(Cell::new(0));
    let shared: Rc<RefCell<Option<Registrations>>> = Rc::new(RefCell::new(None));
    let (after, calls, seen) = (after_first.clone(), spy.clone(), shared.clone());
    let (projector, frames) = setup(
        ProjectorOptions::new()
            .with_after_first_vnode_rendered(move |_, _| after.set(after.get() + 1))
            .with_modify_do_render_implementation(move |do_render: DoRender, registrations| {
                *seen.borrow_mut() = Some(registrations);
                let calls = calls.clone();
                Rc::new(move || {
                    calls.set(calls.get() + 1);
                    do_render()
                }) as DoRender
            }),
    );
    let body = DomNode::element("body");
    projector.append(&body, RenderFunction::new(|| h("div"))).unwrap();
    assert_eq!(after_first.get(), 1);

    projector.schedule_render();
    assert_eq!(spy.get(), 0);
    frames.tick().unwrap();
    assert_eq!(spy.get(), 1);

    projector.render_now().unwrap();
    assert_eq!(spy.get(), 2);

    // The hook received the live registrations
    assert_eq!(shared.borrow().as_ref().map(Registrations::len), Some(1));
}

#[test]
fn can_post_process_projection_options() {
    let calls = Rc::new(Cell::new(0));
    let count = calls.clone();
    let (projector, _) = setup(ProjectorOptions::new().with_post_process_projection_options(
        move |options: &mut ProjectionOptions| {
            count.set(count.get() + 1);
            assert!(options.event_handler_interceptor.is_some());
            options.namespace = Some("http://www.w3.org/2000/svg".into());
        },
    ));
    let body = DomNode::element("body");
    let projection = projector.append(&body, RenderFunction::new(|| h("svg"))).unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(
        projection.dom_node().namespace().as_deref(),
        Some("http://www.w3.org/2000/svg")
    );
}

#[test]
fn post_process_hook_can_read_projector_options() {
    let slot: Rc<RefCell<Option<Projector>>> = Rc::new(RefCell::new(None));
    let seen = Rc::new(Cell::new(0));
    let (owner, reads) = (slot.clone(), seen.clone());
    let (projector, _) = setup(ProjectorOptions::new().with_post_process_projection_options(
        move |options: &mut ProjectionOptions| {
            if let Some(projector) = owner.borrow().as_ref() {
                let current = projector.projection_options();
                assert!(current.event_handler_interceptor.is_none());
                reads.set(reads.get() + 1);
            }
            options.namespace = Some("http://www.w3.org/2000/svg".into());
        },
    ));
    *slot.borrow_mut() = Some(projector.clone());

    let body = DomNode::element("body");
    projector.append(&body, RenderFunction::new(|| h("svg"))).unwrap();

    assert_eq!(seen.get(), 1);
    let options = projector.projection_options();
    assert_eq!(options.namespace.as_deref(), Some("http://www.w3.org/2000/svg"));
    assert!(options.event_handler_interceptor.is_none());
    slot.borrow_mut().take();
}

#[test]
fn style_applyer_is_used_for_styles() {
    let applied = Rc::new(RefCell::new(Vec::new()));
    let sink = applied.clone();
    let (projector, _) = setup(ProjectorOptions::new().with_style_applyer(
        move |_node: &DomNode, property: &str, value: &str| {
            sink.borrow_mut().push(format!("{property}={value}"));
        },
    ));
    let body = DomNode::element("body");
    projector
        .append(&body, RenderFunction::new(|| h("div").style("color", "red")))
        .unwrap();
    assert_eq!(*applied.borrow(), vec!["color=red"]);
}
