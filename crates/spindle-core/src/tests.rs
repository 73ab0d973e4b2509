#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    use crate::animation::*;
    use crate::effects::Dispose;
    use crate::error::MotionError;
    use crate::frame::*;
    use crate::geometry::*;
    use crate::signal::*;
    use crate::style::*;
    use crate::Color;

    fn rotation(tick: Tick) -> f64 {
        match tick {
            Tick::Continue(r) | Tick::Finish(r) => r,
            Tick::Idle => panic!("expected a rendered frame"),
        }
    }

    #[test]
    fn test_linear_interpolation_within_cycle() {
        let mut run = RotationRun::new(AnimationSpec::rotate(180.0));
        run.start(0.0);

        let mut last = -1.0;
        for t in [0.0, 100.0, 250.0, 500.0, 750.0, 999.0] {
            let r = rotation(run.tick(t));
            assert!((r - 180.0 * t / 1000.0).abs() < 1e-9);
            assert!(r > last);
            last = r;
        }
        assert_eq!(run.phase(), Phase::Running);
    }

    #[test]
    fn test_completion_boundary_renders_target() {
        let mut run = RotationRun::new(AnimationSpec::rotate(180.0));
        run.start(0.0);
        assert_eq!(run.tick(1000.0), Tick::Finish(180.0));
        assert_eq!(run.phase(), Phase::Stopped);
        assert_eq!(run.iterations_completed(), 1);
        assert_eq!(run.tick(2000.0), Tick::Idle);
    }

    #[test]
    fn test_single_cycle_never_enters_delay() {
        let mut run = RotationRun::new(AnimationSpec::rotate(90.0));
        run.start(0.0);
        let mut saw_delay = false;
        let mut t = 0.0;
        while run.phase() != Phase::Stopped {
            t += 16.0;
            run.tick(t);
            saw_delay |= run.phase() == Phase::InDelay;
        }
        assert!(!saw_delay);
        assert_eq!(run.iterations_completed(), 1);
    }

    #[test]
    fn test_repeat_with_delay_holds_zero() {
        let spec = AnimationSpec::rotate(100.0)
            .with_repeat(Repeat::Count(2))
            .with_repeat_delay(Duration::from_millis(500));
        let mut run = RotationRun::new(spec);
        run.start(0.0);

        assert_eq!(run.tick(1000.0), Tick::Continue(0.0));
        assert_eq!(run.phase(), Phase::InDelay);
        assert_eq!(run.delay_start(), Some(1000.0));
        assert_eq!(run.cycle_start(), None);

        assert_eq!(run.tick(1200.0), Tick::Continue(0.0));
        assert_eq!(run.tick(1499.0), Tick::Continue(0.0));
        assert_eq!(run.phase(), Phase::InDelay);

        // Delay over: second cycle starts at this frame.
        assert_eq!(run.tick(1500.0), Tick::Continue(0.0));
        assert_eq!(run.phase(), Phase::Running);
        assert_eq!(run.cycle_start(), Some(1500.0));
        assert_eq!(run.delay_start(), None);

        assert_eq!(run.tick(2000.0), Tick::Continue(50.0));
        assert_eq!(run.tick(2500.0), Tick::Finish(100.0));
        assert_eq!(run.iterations_completed(), 2);
    }

    #[test]
    fn test_infinite_never_stops() {
        let spec = AnimationSpec::spin(Duration::from_millis(100));
        let mut run = RotationRun::new(spec);
        run.start(0.0);
        for i in 1..=2000 {
            let tick = run.tick(f64::from(i) * 16.0);
            assert!(matches!(tick, Tick::Continue(_)));
        }
        assert_ne!(run.phase(), Phase::Stopped);
        assert!(run.iterations_completed() > 100);
    }

    #[test]
    fn test_clocks_are_exclusive() {
        let spec = AnimationSpec::rotate(45.0)
            .with_repeat(Repeat::Count(3))
            .with_repeat_delay(Duration::from_millis(40));
        let mut run = RotationRun::new(spec);
        run.start(0.0);
        let mut t = 0.0;
        while run.phase() != Phase::Stopped {
            t += 7.0;
            run.tick(t);
            assert!(!(run.cycle_start().is_some() && run.delay_start().is_some()));
            assert!(run.iterations_completed() <= 3);
        }
    }

    #[test]
    fn test_frame_before_start_clamps_to_zero() {
        let mut run = RotationRun::new(AnimationSpec::rotate(-90.0));
        run.start(100.0);
        let r = rotation(run.tick(95.0));
        assert_eq!(r, 0.0);
        assert_eq!(css_number(r), "0");
    }

    #[test]
    fn test_validation() {
        assert_eq!(AnimationSpec::rotate(10.0).validate(), Ok(()));
        assert_eq!(
            AnimationSpec::rotate(10.0)
                .with_duration(Duration::ZERO)
                .validate(),
            Err(MotionError::NonPositiveDuration)
        );
        assert_eq!(
            AnimationSpec::rotate(10.0)
                .with_repeat(Repeat::Count(0))
                .validate(),
            Err(MotionError::ZeroRepeatCount)
        );
        assert!(matches!(
            AnimationSpec::rotate(f64::NAN).validate(),
            Err(MotionError::NonFiniteRotation(_))
        ));
    }

    #[test]
    fn test_easing_css_names() {
        assert_eq!(Easing::default().css_name(), "linear");
        assert_eq!(Easing::EaseInOut.css_name(), "ease-in-out");
        assert_eq!(Easing::EaseOut.css_name(), "ease-out");
    }

    #[test]
    fn test_manual_scheduler_defers_nested_requests() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let s = scheduler.clone();
        let l = log.clone();
        scheduler.request_frame(Box::new(move |t| {
            l.borrow_mut().push(("outer", t));
            let l2 = l.clone();
            s.request_frame(Box::new(move |t| l2.borrow_mut().push(("inner", t))));
        }));

        assert_eq!(scheduler.run_frame(16.0), 1);
        assert_eq!(*log.borrow(), vec![("outer", 16.0)]);
        assert_eq!(scheduler.pending_count(), 1);

        assert_eq!(scheduler.run_frame(32.0), 1);
        assert_eq!(log.borrow().last(), Some(&("inner", 32.0)));
    }

    #[test]
    fn test_manual_scheduler_cancel_and_refuse() {
        let scheduler = ManualFrameScheduler::new();
        let hits = Rc::new(Cell::new(0));

        let h = hits.clone();
        let handle = scheduler
            .request_frame(Box::new(move |_| h.set(h.get() + 1)))
            .expect("frame scheduled");
        assert!(scheduler.is_pending(handle));
        scheduler.cancel_frame(handle);
        scheduler.cancel_frame(handle);
        assert_eq!(scheduler.run_frame(16.0), 0);
        assert_eq!(hits.get(), 0);

        scheduler.set_refusing(true);
        let h = hits.clone();
        assert!(
            scheduler
                .request_frame(Box::new(move |_| h.set(1)))
                .is_none()
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_run_until_steps_clock() {
        let scheduler = ManualFrameScheduler::new();
        scheduler.run_until(160.0, 16.0);
        assert_eq!(scheduler.now(), 160.0);
        assert_eq!(scheduler.frames_run(), 10);
    }

    #[test]
    fn test_run_until_ignores_non_positive_step() {
        let scheduler = ManualFrameScheduler::new();
        assert_eq!(scheduler.run_until(100.0, 0.0), 0);
        assert_eq!(scheduler.run_until(100.0, -16.0), 0);
        assert_eq!(scheduler.run_until(100.0, f64::NAN), 0);
        assert_eq!(scheduler.frames_run(), 0);
        assert_eq!(scheduler.now(), 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_animation_spec_serde_round_trip() {
        let spec = AnimationSpec::rotate(-45.0)
            .with_duration(Duration::from_millis(750))
            .with_repeat(Repeat::Count(3))
            .with_easing(Easing::EaseInOut)
            .with_repeat_delay(Duration::from_millis(200));
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"ease-in-out\""));
        assert!(json.contains("\"count\":3"));
        let back: AnimationSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);

        let spin: AnimationSpec =
            serde_json::from_str(r#"{"target_rotation_degrees":360.0,"repeat":"infinite"}"#)
                .unwrap();
        assert_eq!(spin.repeat, Repeat::Infinite);
        assert_eq!(spin.duration, AnimationSpec::default().duration);
        assert_eq!(spin.easing, Easing::Linear);
    }

    #[test]
    fn test_signal_subscribe_and_dispose() {
        let sig = signal(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let sub = sig.subscribe(move |v| s.borrow_mut().push(*v));

        sig.set(2);
        sig.update(|v| *v += 1);
        assert_eq!(*seen.borrow(), vec![2, 3]);
        assert_eq!(sig.subscriber_count(), 1);

        sub.run();
        sub.run();
        assert!(sub.is_disposed());
        sig.set(10);
        assert_eq!(*seen.borrow(), vec![2, 3]);
        assert_eq!(sig.subscriber_count(), 0);
    }

    #[test]
    fn test_signal_subscriber_can_read_back() {
        let sig = signal(0);
        let reader = sig.clone();
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        let _sub = sig.subscribe(move |_| s.set(reader.get()));
        sig.set(7);
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn test_dispose_runs_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let d = Dispose::new(move || c.set(c.get() + 1));
        let d2 = d.clone();
        d.run();
        d2.run();
        assert_eq!(count.get(), 1);
        assert!(Dispose::noop().is_disposed());
    }

    #[test]
    fn test_style_map_records_writes() {
        let map = StyleMap::new();
        assert!(map.is_empty());
        map.set_style_property("transform", "rotate(0deg)");
        map.set_style_property("transform", "rotate(0deg)");
        assert_eq!(map.get("transform").as_deref(), Some("rotate(0deg)"));
        assert_eq!(map.write_count(), 2);
    }

    #[test]
    fn test_css_number() {
        assert_eq!(css_number(90.0), "90");
        assert_eq!(css_number(22.5), "22.5");
        assert_eq!(css_number(-0.0), "0");
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#FF5733"), Color(255, 87, 51, 255));
        assert_eq!(Color::from_hex("#FF5733AA"), Color(255, 87, 51, 170));
        assert_eq!(Color::from_hex("#999"), Color(153, 153, 153, 255));
        assert_eq!(Color::from_hex("nope"), Color::BLACK);
        assert_eq!(Color::from_hex("#999").to_css(), "#999999");
        assert_eq!(Color::BLACK.with_alpha(0).to_css(), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(110.0, 60.0)));
        assert!(!rect.contains(Vec2::new(5.0, 30.0)));
        assert!(!rect.contains(Vec2::new(50.0, 60.5)));

        let cell = Cell::new(rect);
        cell.set(Rect { x: 0.0, ..rect });
        assert_eq!(cell.bounding_rect().left(), 0.0);
    }
}
