//! Arcade Panel demo
//!
//! Mounts one game headless and plays it with a scripted player, logging
//! snapshots as they arrive. Usage: `arcade-panel [game] [config.json]`.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::collections::HashMap;

    use arcade_panel::runtime::Bounds;
    use arcade_panel::sim::Cell;
    use arcade_panel::{
        Container, Direction, GameKind, RawEvent, RuntimeConfig, SessionHandle, View, mount_game,
    };

    /// Ticks after which a game without an end state is stopped
    const DEMO_TICKS: u32 = 2_000;
    const STEP_MS: u64 = 16;

    pub fn run(kind: GameKind, config: &RuntimeConfig) {
        let container = Container::new(Bounds::new(
            0.0,
            0.0,
            config.duel.field_width,
            config.duel.field_height,
        ));
        let mut handle = mount_game(kind, container, config);
        handle.on_snapshot(|s| {
            if s.terminal || !s.running {
                log::info!("[{} #{}] {}", s.kind, s.seq, s.status);
            } else {
                log::trace!("[{} #{}] {}", s.kind, s.seq, s.status);
            }
        });

        if let Err(e) = handle.start() {
            log::error!("Could not start {kind}: {e}");
            return;
        }

        match kind {
            GameKind::Chase => play_chase(&mut handle),
            GameKind::Duel => play_duel(&mut handle),
            GameKind::Matching => play_matching(&mut handle, config.matching.mismatch_delay_ms),
            GameKind::Timing => play_timing(&mut handle),
            GameKind::Typing => play_typing(&mut handle),
            GameKind::Hacker => play_hacker(&mut handle),
        }

        handle.stop();
        if let Some(last) = handle.latest() {
            match last.to_json() {
                Ok(json) => log::debug!("Final snapshot: {json}"),
                Err(e) => log::warn!("Could not serialize snapshot: {e}"),
            }
        }
        log::info!(
            "{kind} finished, best {:?}, lifecycle {:?}",
            handle.best(),
            handle.lifecycle()
        );
        handle.dispose();
    }

    fn key(dir: Direction) -> RawEvent {
        let name = match dir {
            Direction::Up => "ArrowUp",
            Direction::Down => "ArrowDown",
            Direction::Left => "ArrowLeft",
            Direction::Right => "ArrowRight",
        };
        RawEvent::KeyDown(name.to_string())
    }

    /// Greedy: the safe step closest to the food
    fn chase_step(view: &View) -> Option<Direction> {
        let View::Chase {
            width,
            height,
            body,
            heading,
            food,
            ..
        } = view
        else {
            return None;
        };
        let head = *body.first()?;
        let target = food.unwrap_or(head);
        let safe = |c: Cell| c.x >= 0 && c.y >= 0 && c.x < *width && c.y < *height && !body.contains(&c);
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .filter(|d| !d.is_opposite(*heading))
            .filter(|d| safe(head.step(*d)))
            .min_by_key(|d| {
                let next = head.step(*d);
                (next.x - target.x).abs() + (next.y - target.y).abs()
            })
    }

    fn play_chase(handle: &mut SessionHandle) {
        for _ in 0..DEMO_TICKS {
            let Some(interval) = handle.tick_interval() else {
                break;
            };
            if let Some(dir) = handle.latest().and_then(|s| chase_step(&s.view)) {
                handle.dispatch(key(dir));
            }
            handle.advance(interval);
        }
    }

    fn play_duel(handle: &mut SessionHandle) {
        for _ in 0..DEMO_TICKS {
            if let Some(View::Duel { ball, .. }) = handle.latest().map(|s| s.view.clone()) {
                handle.dispatch(RawEvent::PointerMove { x: 0.0, y: ball.y });
            }
            handle.advance(STEP_MS);
        }
    }

    fn play_matching(handle: &mut SessionHandle, mismatch_delay_ms: u64) {
        let mut seen: HashMap<usize, String> = HashMap::new();
        let total = match handle.latest().map(|s| &s.view) {
            Some(View::Matching { cards, .. }) => cards.len(),
            _ => return,
        };

        let reveal = |handle: &mut SessionHandle, id: usize, seen: &mut HashMap<usize, String>| {
            handle.dispatch(RawEvent::CardClick(id));
            if let Some(View::Matching { cards, .. }) = handle.latest().map(|s| &s.view) {
                if let Some(symbol) = cards.get(id).and_then(|c| c.symbol.clone()) {
                    seen.insert(id, symbol);
                }
            }
        };

        for id in 0..total {
            if !handle.is_running() {
                break;
            }
            if is_matched(handle, id) {
                continue;
            }
            reveal(handle, id, &mut seen);
            let partner = seen
                .iter()
                .find(|(other, symbol)| **other != id && Some(*symbol) == seen.get(&id))
                .map(|(other, _)| *other);
            match partner {
                Some(other) if !is_matched(handle, other) => reveal(handle, other, &mut seen),
                _ if id + 1 < total => reveal(handle, id + 1, &mut seen),
                _ => {}
            }
            // Let a mismatched pair flip back
            handle.advance(mismatch_delay_ms);
        }
    }

    fn is_matched(handle: &SessionHandle, id: usize) -> bool {
        match handle.latest().map(|s| &s.view) {
            Some(View::Matching { cards, .. }) => cards.get(id).is_some_and(|c| c.matched),
            _ => false,
        }
    }

    fn play_timing(handle: &mut SessionHandle) {
        for round in 0..3u64 {
            if round > 0 {
                // Click in the result phase arms the next round
                handle.dispatch(RawEvent::Click);
            }
            for _ in 0..DEMO_TICKS {
                handle.advance(STEP_MS);
                if handle.latest().is_some_and(|s| s.status == "CLICK!") {
                    break;
                }
            }
            handle.advance(180 + round * 20);
            handle.dispatch(RawEvent::Click);
        }
    }

    fn play_hacker(handle: &mut SessionHandle) {
        for run in 0..2 {
            if run > 0 {
                handle.dispatch(RawEvent::Click);
            }
            for _ in 0..DEMO_TICKS {
                handle.advance(STEP_MS);
                if let Some(View::Hacker { hacking: false, .. }) = handle.latest().map(|s| &s.view) {
                    break;
                }
            }
        }
    }

    fn play_typing(handle: &mut SessionHandle) {
        for _ in 0..10 {
            let Some(View::Typing { word, .. }) = handle.latest().map(|s| s.view.clone()) else {
                return;
            };
            let mut typed = String::new();
            for ch in word.chars() {
                typed.push(ch);
                handle.advance(120);
                handle.dispatch(RawEvent::TextInput(typed.clone()));
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arcade Panel (native demo) starting...");

    let mut args = std::env::args().skip(1);
    let kind = match args.next() {
        Some(name) => match arcade_panel::GameKind::from_name(&name) {
            Some(kind) => kind,
            None => {
                log::error!("Unknown game '{name}'");
                std::process::exit(2);
            }
        },
        None => arcade_panel::GameKind::Chase,
    };

    let json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read {path}: {e}");
            None
        }
    });
    let config = arcade_panel::RuntimeConfig::load_or_default(json.as_deref());

    demo::run(kind, &config);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly
}
