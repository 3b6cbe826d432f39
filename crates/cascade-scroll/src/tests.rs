#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use cascade_core::{
        EdgeEffect, FlowConfig, ItemArena, LayoutContext, RestoreState, Size, TracksTemplate,
    };

    use crate::controller::{FlowScrollController, LAST_ITEM, RelayoutFlags, ScrollPhase, ScrollSource};
    use crate::physics::overscroll_friction;

    const DT: f32 = 1.0 / 60.0;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn controller_with(
        config: FlowConfig,
        extents: &[f32],
        viewport: Size,
    ) -> (FlowScrollController, ItemArena, LayoutContext) {
        let ctx = LayoutContext::new(1.0, viewport);
        let mut items = ItemArena::from_extents(extents);
        let mut controller = FlowScrollController::new(config);
        controller.run_layout_pass(&mut items, &ctx);
        (controller, items, ctx)
    }

    fn settle(controller: &mut FlowScrollController) {
        for _ in 0..10_000 {
            if !controller.step(DT) {
                return;
            }
        }
        panic!("animation did not settle");
    }

    #[test]
    fn boundary_rejection_without_spring() {
        let (mut c, _, _) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 10],
            Size::new(300.0, 300.0),
        );
        assert!(c.info().item_start);
        assert!(!c.apply_scroll_delta(50.0, ScrollSource::Drag));
        assert_eq!(c.info().current_offset, 0.0);
    }

    #[test]
    fn accepted_delta_updates_prev_offset() {
        let (mut c, _, _) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 10],
            Size::new(300.0, 300.0),
        );
        assert!(c.apply_scroll_delta(-200.0, ScrollSource::Drag));
        assert_eq!(c.info().current_offset, -200.0);
        assert_eq!(c.info().prev_offset, 0.0);
        assert!(c.take_dirty().contains(RelayoutFlags::LAYOUT));
    }

    #[test]
    fn end_boundary_rejects_forward_deltas() {
        let (mut c, mut items, ctx) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 10],
            Size::new(300.0, 300.0),
        );
        c.drag_by(-700.0);
        c.run_layout_pass(&mut items, &ctx);
        assert!(c.info().offset_end);
        assert!(!c.apply_scroll_delta(-10.0, ScrollSource::Drag));
        assert!(c.apply_scroll_delta(10.0, ScrollSource::Drag));
    }

    #[test]
    fn reversed_axis_inverts_deltas_except_spring() {
        let config = FlowConfig {
            reverse: true,
            ..FlowConfig::default()
        };
        let (mut c, _, _) = controller_with(config, &vec![100.0; 10], Size::new(300.0, 300.0));
        // -50 inverts to +50, which pushes past the reached start.
        assert!(!c.apply_scroll_delta(-50.0, ScrollSource::Drag));
        // Spring continuations are not inverted.
        assert!(c.apply_scroll_delta(-50.0, ScrollSource::Spring));
        assert_eq!(c.info().current_offset, -50.0);
    }

    #[test]
    fn drag_friction_damps_with_growing_overscroll() {
        let config = FlowConfig {
            edge_effect: EdgeEffect::Spring,
            ..FlowConfig::default()
        };
        let (mut c, _, _) = controller_with(config, &vec![100.0; 10], Size::new(300.0, 300.0));

        assert!(c.drag_by(100.0));
        let first = c.info().current_offset;
        assert!(first > 0.0 && first < 100.0);

        assert!(c.drag_by(100.0));
        let second = c.info().current_offset - first;
        assert!(second < first);

        // The friction curve itself is strictly decreasing.
        assert!(overscroll_friction(0.4) < overscroll_friction(0.2));
        assert!(overscroll_friction(0.0) == 1.0);
    }

    #[test]
    fn fling_deltas_are_not_damped() {
        let config = FlowConfig {
            edge_effect: EdgeEffect::Spring,
            ..FlowConfig::default()
        };
        let (mut c, _, _) = controller_with(config, &vec![100.0; 10], Size::new(300.0, 300.0));
        c.drag_by(60.0);
        let before = c.info().current_offset;
        assert!(c.apply_scroll_delta(10.0, ScrollSource::Fling));
        assert_eq!(c.info().current_offset, before + 10.0);
    }

    #[test]
    fn fitting_content_is_not_scrollable_unless_bouncy() {
        let (c, _, _) = controller_with(
            FlowConfig::default(),
            &[100.0],
            Size::new(300.0, 300.0),
        );
        assert!(!c.is_scrollable());

        let bouncy = FlowConfig {
            always_bounce: true,
            ..FlowConfig::default()
        };
        let (c, _, _) = controller_with(bouncy, &[100.0], Size::new(300.0, 300.0));
        assert!(c.is_scrollable());
    }

    #[test]
    fn overscroll_offset_splits_at_bounds() {
        let (mut c, mut items, ctx) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 6],
            Size::new(300.0, 300.0),
        );
        // At the start with the whole dataset placed.
        c.drag_by(-300.0);
        c.run_layout_pass(&mut items, &ctx);
        assert!(c.info().item_end);
        assert!(c.info().start_index > 0);

        // Sitting exactly at the end: 50 more px would all be end overscroll.
        let over = c.overscroll_offset(-50.0);
        assert_eq!(over.start, 0.0);
        assert_eq!(over.end, -50.0);
        // Scrolling back in consumes nothing as overscroll.
        let over = c.overscroll_offset(50.0);
        assert_eq!(over, Default::default());

        c.request_jump_to(0);
        c.run_layout_pass(&mut items, &ctx);
        let over = c.overscroll_offset(40.0);
        assert_eq!(over.start, 40.0);
        assert_eq!(over.end, 0.0);
    }

    #[test]
    fn layout_diff_fires_events_in_order() {
        init_logs();
        let (mut c, mut items, ctx) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 10],
            Size::new(300.0, 300.0),
        );

        let fired: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let deltas: Rc<RefCell<Vec<f32>>> = Rc::new(RefCell::new(Vec::new()));
        let ranges: Rc<RefCell<Vec<(usize, usize)>>> = Rc::new(RefCell::new(Vec::new()));
        {
            let f = fired.clone();
            let d = deltas.clone();
            c.events().on_scroll(move |delta| {
                f.borrow_mut().push("scroll");
                d.borrow_mut().push(delta);
            });
            let f = fired.clone();
            let r = ranges.clone();
            c.events().on_index_changed(move |s, e| {
                f.borrow_mut().push("index");
                r.borrow_mut().push((s, e));
            });
            let f = fired.clone();
            c.events().on_reach_start(move || f.borrow_mut().push("start"));
            let f = fired.clone();
            c.events().on_reach_end(move || f.borrow_mut().push("end"));
            let f = fired.clone();
            c.events().on_scroll_stop(move || f.borrow_mut().push("stop"));
        }

        c.drag_by(-150.0);
        c.run_layout_pass(&mut items, &ctx);
        assert_eq!(*fired.borrow(), vec!["scroll", "index"]);
        assert_eq!(*deltas.borrow(), vec![150.0]);
        assert_eq!(*ranges.borrow(), vec![(1, 4)]);

        fired.borrow_mut().clear();
        c.drag_by(150.0);
        c.end_drag(0.0);
        c.run_layout_pass(&mut items, &ctx);
        assert_eq!(*fired.borrow(), vec!["scroll", "index", "start", "stop"]);
    }

    #[test]
    fn unsubscribed_handlers_stay_silent() {
        let (mut c, mut items, ctx) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 10],
            Size::new(300.0, 300.0),
        );
        let count = Rc::new(RefCell::new(0));
        let id = {
            let count = count.clone();
            c.events().on_scroll(move |_| *count.borrow_mut() += 1)
        };
        assert!(c.events().unsubscribe(id));
        assert!(!c.events().unsubscribe(id));

        c.drag_by(-50.0);
        c.run_layout_pass(&mut items, &ctx);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn unsubscribe_targets_only_its_own_channel() {
        let (mut c, mut items, ctx) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 10],
            Size::new(300.0, 300.0),
        );
        let scrolls = Rc::new(RefCell::new(0));
        let reaches = Rc::new(RefCell::new(0));
        {
            let scrolls = scrolls.clone();
            c.events().on_scroll(move |_| *scrolls.borrow_mut() += 1);
        }
        let reach_id = {
            let reaches = reaches.clone();
            c.events().on_reach_start(move || *reaches.borrow_mut() += 1)
        };
        assert!(c.events().unsubscribe(reach_id));

        c.drag_by(-150.0);
        c.run_layout_pass(&mut items, &ctx);
        c.drag_by(150.0);
        c.run_layout_pass(&mut items, &ctx);
        // The scroll handler survives; the removed reach handler is gone
        // even though reaching the start would have fired it.
        assert_eq!(*scrolls.borrow(), 2);
        assert_eq!(*reaches.borrow(), 0);
    }

    #[test]
    fn jump_sentinel_resolves_to_last_item() {
        let (mut c, mut items, ctx) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 50],
            Size::new(300.0, 300.0),
        );
        c.request_jump_to(LAST_ITEM);
        assert_eq!(c.info().jump_index, Some(49));
        assert!(c.take_dirty().contains(RelayoutFlags::JUMP));

        c.run_layout_pass(&mut items, &ctx);
        assert_eq!(c.info().jump_index, None);
        assert_eq!(c.info().end_index, 49);
        // Anchoring the last item is clamped so the final page stays full.
        assert_eq!(c.info().current_offset, -4700.0);
        assert!(c.info().offset_end);
    }

    #[test]
    fn jump_from_any_state_forces_idle() {
        let (mut c, _, _) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 50],
            Size::new(300.0, 300.0),
        );
        c.begin_drag();
        c.drag_by(-50.0);
        c.end_drag(-900.0);
        assert_eq!(c.phase(), ScrollPhase::Flinging);

        c.request_jump_to(10);
        assert_eq!(c.phase(), ScrollPhase::Idle);
        assert!(!c.step(DT));
    }

    #[test]
    fn restore_round_trip() {
        let (mut c, mut items, _) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 20],
            Size::new(300.0, 300.0),
        );
        let ctx = LayoutContext::new(3.0, Size::new(300.0, 300.0));
        c.drag_by(-240.0);
        c.run_layout_pass(&mut items, &ctx);

        let state = c.serialize_restore_state(&ctx);
        assert_eq!(state.begin_index, 2);
        assert!((state.offset - (-80.0)).abs() < 1e-4);

        let mut restored = FlowScrollController::new(FlowConfig::default());
        restored.restore_from_json(&c.restore_state_json(&ctx), &ctx);
        assert_eq!(restored.info().jump_index, Some(2));
        assert_eq!(restored.info().restore_offset, Some(-240.0));

        restored.run_layout_pass(&mut items, &ctx);
        assert_eq!(restored.info().current_offset, -240.0);
        let again = restored.serialize_restore_state(&ctx);
        assert_eq!(again.begin_index, state.begin_index);
        assert!((again.offset - state.offset).abs() < 1e-4);
    }

    #[test]
    fn restore_converts_vp_to_px() {
        let ctx = LayoutContext::new(3.0, Size::new(300.0, 300.0));
        let mut c = FlowScrollController::new(FlowConfig::default());
        c.restore(RestoreState::new(5, 80.0), &ctx);
        assert_eq!(c.info().jump_index, Some(5));
        assert_eq!(c.info().restore_offset, Some(240.0));
    }

    #[test]
    fn malformed_restore_json_falls_back_to_defaults() {
        let ctx = LayoutContext::default();
        let mut c = FlowScrollController::new(FlowConfig::default());
        c.restore_from_json("{broken", &ctx);
        assert_eq!(c.info().jump_index, Some(0));
        assert_eq!(c.info().restore_offset, Some(0.0));
    }

    #[test]
    fn drag_fling_settles_to_idle() {
        init_logs();
        let (mut c, mut items, ctx) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 100],
            Size::new(300.0, 300.0),
        );
        c.begin_drag();
        assert_eq!(c.phase(), ScrollPhase::Dragging);
        c.drag_by(-50.0);
        c.end_drag(-800.0);
        assert_eq!(c.phase(), ScrollPhase::Flinging);

        settle(&mut c);
        assert_eq!(c.phase(), ScrollPhase::Idle);
        assert!(c.info().current_offset < -50.0);

        let stopped = Rc::new(RefCell::new(false));
        {
            let stopped = stopped.clone();
            c.events().on_scroll_stop(move || *stopped.borrow_mut() = true);
        }
        c.run_layout_pass(&mut items, &ctx);
        assert!(*stopped.borrow());
    }

    #[test]
    fn fling_into_hard_edge_stops() {
        let (mut c, _, _) = controller_with(
            FlowConfig::default(),
            &vec![100.0; 10],
            Size::new(300.0, 300.0),
        );
        c.begin_drag();
        c.end_drag(600.0); // toward the already-reached start
        assert_eq!(c.phase(), ScrollPhase::Flinging);
        assert!(!c.step(DT));
        assert_eq!(c.phase(), ScrollPhase::Idle);
        assert_eq!(c.info().current_offset, 0.0);
    }

    #[test]
    fn released_overscroll_springs_back_to_bound() {
        let config = FlowConfig {
            edge_effect: EdgeEffect::Spring,
            ..FlowConfig::default()
        };
        let (mut c, _, _) = controller_with(config, &vec![100.0; 10], Size::new(300.0, 300.0));
        c.begin_drag();
        c.drag_by(80.0);
        c.drag_by(80.0);
        assert!(c.info().current_offset > 0.0);

        c.end_drag(0.0);
        assert_eq!(c.phase(), ScrollPhase::Bouncing);
        settle(&mut c);
        assert_eq!(c.phase(), ScrollPhase::Idle);
        assert_eq!(c.info().current_offset, 0.0);
    }

    #[test]
    fn fling_past_bound_transitions_to_bouncing() {
        let config = FlowConfig {
            edge_effect: EdgeEffect::Spring,
            ..FlowConfig::default()
        };
        let (mut c, _, _) = controller_with(config, &vec![100.0; 10], Size::new(300.0, 300.0));
        c.begin_drag();
        c.end_drag(400.0);
        assert_eq!(c.phase(), ScrollPhase::Flinging);
        assert!(c.step(DT));
        assert_eq!(c.phase(), ScrollPhase::Bouncing);

        settle(&mut c);
        assert_eq!(c.phase(), ScrollPhase::Idle);
        assert_eq!(c.info().current_offset, 0.0);
    }

    #[test]
    fn item_rect_projects_window_and_blanks_the_rest() {
        let config = FlowConfig {
            tracks: TracksTemplate::Count(2),
            ..FlowConfig::default()
        };
        let (c, _, _) = controller_with(config, &vec![100.0; 20], Size::new(400.0, 300.0));

        let first = c.item_rect(0);
        assert_eq!((first.x, first.y, first.w, first.h), (0.0, 0.0, 200.0, 100.0));
        let second = c.item_rect(1);
        assert_eq!((second.x, second.y), (200.0, 0.0));

        assert_eq!(c.item_rect(15), cascade_core::Rect::EMPTY);
        assert_eq!(c.item_rect(usize::MAX - 1), cascade_core::Rect::EMPTY);
    }

    #[test]
    fn reversed_layout_flips_main_axis_rects() {
        let config = FlowConfig {
            reverse: true,
            ..FlowConfig::default()
        };
        let (c, _, _) = controller_with(config, &vec![100.0; 10], Size::new(300.0, 300.0));
        let first = c.item_rect(0);
        // Item 0 hugs the viewport end when the axis is reversed.
        assert_eq!(first.y, 200.0);
        assert_eq!(first.h, 100.0);
    }
}
