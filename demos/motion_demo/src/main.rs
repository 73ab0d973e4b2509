use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use spindle_core::*;
use spindle_ui::*;

/// Logs every style write under the element's name.
struct LogSurface {
    name: &'static str,
    map: StyleMap,
}

impl LogSurface {
    fn new(name: &'static str) -> Rc<Self> {
        Rc::new(Self {
            name,
            map: StyleMap::new(),
        })
    }
}

impl StyleSurface for LogSurface {
    fn set_style_property(&self, name: &str, value: &str) {
        log::debug!("{}: {name}: {value}", self.name);
        self.map.set_style_property(name, value);
    }
}

const FRAME: Duration = Duration::from_millis(16);
const RUN_FOR: f64 = 3000.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting Motion Demo");

    let clock = SystemClock::new();
    let scheduler = Rc::new(ManualFrameScheduler::new());

    let spinner = LogSurface::new("spinner");
    let mut motion = Motion::div(scheduler.clone(), spinner.clone());
    motion.bind(
        AnimationSpec::spin(Duration::from_millis(800))
            .with_easing(Easing::EaseInOut)
            .with_repeat_delay(Duration::from_millis(200)),
    )?;

    let badge = LogSurface::new("badge");
    let mut wobble = Motion::span(scheduler.clone(), badge.clone());
    wobble.bind(AnimationSpec::rotate(-15.0).with_repeat(Repeat::Count(3)))?;

    let progress = Progress::start(ProgressConfig::default(), scheduler.clone())?;
    let bar = ProgressBar::default();
    let track = LogSurface::new("progress-track");
    let fill = LogSurface::new("progress-fill");
    let _render = {
        let (track, fill) = (track.clone(), fill.clone());
        progress.subscribe(move |p| bar.render(&*track, &*fill, p))
    };

    let registry = Rc::new(CursorZoneRegistry::new());
    let pointer = MouseFollower::new(
        LogSurface::new("cursor"),
        registry.clone(),
        FollowerOptions::default(),
    );
    let card = Rc::new(Cell::new(Rect {
        x: 200.0,
        y: 100.0,
        w: 160.0,
        h: 90.0,
    }));
    let card_cursor = MouseFollower::new(
        LogSurface::new("card-cursor"),
        registry.clone(),
        FollowerOptions {
            zone: Some(card.clone() as Rc<dyn BoundingRect>),
            offset: Vec2::new(8.0, 8.0),
        },
    );

    let mut completed = false;
    loop {
        std::thread::sleep(FRAME);
        let now = clock.now();
        if now >= RUN_FOR {
            break;
        }

        // Sweep the pointer across the card and back.
        let x = (now / RUN_FOR) * 500.0;
        let y = 140.0;
        pointer.pointer_moved(x, y);
        card_cursor.pointer_moved(x, y);

        if !completed && now >= 1500.0 {
            log::info!("progress at {:.1}%, completing", progress.value());
            progress.complete();
            completed = true;
        }

        scheduler.run_frame(now);
    }

    log::info!(
        "spinner: {} full turns, transform {:?}",
        motion.iterations_completed(),
        spinner.map.get("transform")
    );
    log::info!(
        "badge: {:?} after {} cycles",
        wobble.phase(),
        wobble.iterations_completed()
    );
    log::info!(
        "progress: {} (bar width {:?})",
        progress.value(),
        fill.map.get("width")
    );
    log::info!("zones active at exit: {}", registry.active_zones());

    motion.unbind();
    log::info!("pending frames after unbind: {}", scheduler.pending_count());

    let document = Rc::new(MemoryDocument::new("Spindle", Some("/favicon.ico")));
    let history = Rc::new(MemoryHistory::new());
    let tab = DocumentTab::new(
        vec![
            DocumentMeta::new("/signup/:step").title("Sign up"),
            DocumentMeta::new("/done")
                .title("Welcome!")
                .favicon("/party.png"),
        ],
        document.clone(),
    );
    let signup = Funnel::with_history(
        ["intro", "form", "confirm"].map(String::from),
        history.clone(),
    )?;
    let _route = {
        let tab = Rc::new(tab);
        signup.subscribe(move |step| tab.route_changed(&format!("/signup/{step}")))
    };
    signup.next();
    signup.next();
    history.back();
    log::info!(
        "funnel at {:?} ({:?}), tab title {:?}",
        signup.step(),
        signup.meta(),
        document.title()
    );
    Ok(())
}
