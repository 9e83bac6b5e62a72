use keyfall::{
    FrameInput, Mapper, Marker, Note, PlayerState, Render, Settings, Song, TrackId,
    color::Rgba,
    engine::Engine,
    lifecycle::{self, RenderInfo},
    log::{Log, log},
    playback::Playback,
    progress,
    smooth::TimedSmooth,
    strerr::Strerr,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use sdl2::{event::Event, keyboard::Keycode, mouse::MouseButton};
use std::time::{Duration, Instant};

fn main() {
    if let Err(e) = practically_main() {
        log(Log::Error, e);
    }
}

const BEAT_MS: f64 = 500.0;
const MEASURE_MS: f64 = BEAT_MS * 4.0;

fn demo_song(seed: u64) -> Result<Song, String> {
    const MEASURES: u32 = 48;
    const PROGRESSION: [[u8; 3]; 4] = [[48, 52, 55], [45, 48, 52], [41, 45, 48], [43, 47, 50]];
    const SCALE: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

    let mut rng = StdRng::seed_from_u64(seed);
    let pad = TrackId::new(0)?;
    let lead = TrackId::new(1)?;
    let mut notes = Vec::new();
    let mut id = 0;
    let mut next_id = || {
        id += 1;
        id
    };

    for measure in 0..MEASURES {
        let start = (measure + 1) as f64 * MEASURE_MS;
        let chord = PROGRESSION[measure as usize % PROGRESSION.len()];

        for number in chord {
            let velocity = rng.random_range(60..90);
            notes.push(
                Note::new(next_id(), number, velocity, start, start + MEASURE_MS * 0.9, pad)
                    .with_sustain(start + MEASURE_MS),
            );
        }

        let root = chord[0] + 12;
        let mut t = start;
        while t < start + MEASURE_MS {
            let step = if rng.random::<f32>() < 0.3 { BEAT_MS / 2.0 } else { BEAT_MS / 4.0 };
            if rng.random::<f32>() < 0.8 {
                let octave = rng.random_range(0..3u8) * 12;
                let degree = SCALE[rng.random_range(0..SCALE.len())];
                let velocity = rng.random_range(70..127);
                notes.push(Note::new(
                    next_id(),
                    root + octave + degree,
                    velocity,
                    t,
                    t + step * 0.85,
                    lead,
                ));
            }
            t += step;
        }
    }

    let lines = (0..=MEASURES + 1).map(|m| m as f64 * MEASURE_MS);
    let markers = [(0, "Intro"), (8, "Verse"), (24, "Chorus"), (40, "Outro")]
        .into_iter()
        .map(|(m, text)| Marker::new((m + 1) as f64 * MEASURE_MS, text))
        .collect();

    Ok(Song::new(notes, lines).with_markers(markers))
}

/// Home row plays C4 to C5.
fn keycode_note(keycode: Keycode) -> Option<u8> {
    let number = match keycode {
        Keycode::A => 60,
        Keycode::S => 62,
        Keycode::D => 64,
        Keycode::F => 65,
        Keycode::G => 67,
        Keycode::H => 69,
        Keycode::J => 71,
        Keycode::K => 72,
        _ => return None,
    };
    Some(number)
}

struct Held {
    number: u8,
    start_ms: f64,
}

fn practically_main() -> Result<(), String> {
    const TITLE: &str = "Keyfall";
    const SIZE: (u32, u32) = (1280, 720);
    const FONT: &str = "CascadiaMono.ttf";
    const FONT_SIZE: u16 = 14;
    const ZOOM_DURATION: Duration = Duration::from_millis(250);
    const ZOOM_STEP: f32 = 1.25;
    const SPEED_STEP: f32 = 0.25;
    const INPUT_TRACK: u16 = TrackId::MAX_TRACKS - 1;

    let mut settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let song = demo_song(rand::rng().random())?;
    log(
        Log::Info,
        format!(
            "demo song: {} notes, {}",
            song.tracks().map(|(_, notes)| notes.len()).sum::<usize>(),
            progress::format_time(song.end_ms() / 1000.0, false)
        ),
    );

    let mut engine = Engine::new(TITLE, SIZE)?;

    let ttf_context = sdl2::ttf::init().strerr()?;
    let font = ttf_context.load_font(FONT, FONT_SIZE)?;

    let mut event_pump = engine.event_pump()?;
    let mut render = Render::new();
    let mut playback = Playback::new(song.end_ms());
    let mut zoom = TimedSmooth::new(settings.look_ahead_ms, ZOOM_DURATION);
    let mut held: Vec<(u32, Held)> = Vec::new();
    let mut released: Vec<Note> = Vec::new();
    let mut input_id = u32::MAX;
    let input_track = TrackId::new(INPUT_TRACK)?;
    let mut last = Instant::now();

    'main_loop: loop {
        zoom.update();
        let (width, _) = engine.size();
        let (mouse_x, mouse_y) = {
            let mouse = sdl2::mouse::MouseState::new(&event_pump);
            (mouse.x() as f32, mouse.y() as f32)
        };

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                } => break 'main_loop,
                Event::KeyDown {
                    keycode: Some(Keycode::SPACE),
                    ..
                } => playback.toggle_pause(),
                Event::KeyDown {
                    keycode: Some(Keycode::R),
                    ..
                } => settings.reverse_direction = !settings.reverse_direction,
                Event::KeyDown {
                    keycode: Some(Keycode::UP),
                    ..
                } => zoom.shift_set((zoom.target() / ZOOM_STEP).max(500.0)),
                Event::KeyDown {
                    keycode: Some(Keycode::DOWN),
                    ..
                } => zoom.shift_set((zoom.target() * ZOOM_STEP).min(20_000.0)),
                Event::KeyDown {
                    keycode: Some(Keycode::LEFT),
                    ..
                } => playback.set_speed(playback.speed() - SPEED_STEP),
                Event::KeyDown {
                    keycode: Some(Keycode::RIGHT),
                    ..
                } => playback.set_speed(playback.speed() + SPEED_STEP),
                Event::KeyDown {
                    keycode: Some(keycode),
                    repeat: false,
                    ..
                } => {
                    if let Some(number) = keycode_note(keycode) {
                        input_id = input_id.wrapping_sub(1);
                        let start_ms = playback.position() * 1000.0;
                        held.push((input_id, Held { number, start_ms }));
                    }
                }
                Event::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    if let Some(number) = keycode_note(keycode) {
                        let now_ms = playback.position() * 1000.0;
                        held.retain(|(id, h)| {
                            if h.number != number {
                                return true;
                            }
                            released.push(Note::new(
                                *id,
                                number,
                                100,
                                h.start_ms,
                                now_ms.max(h.start_ms),
                                input_track,
                            ));
                            false
                        });
                    }
                }
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } if progress::bar_contains(y as f32) => {
                    playback.seek(progress::seek_target_s(x as f32, width as f32, song.end_ms()));
                }
                Event::MouseWheel { y, .. } => playback.skip(-y),
                _ => (),
            }
        }

        settings.look_ahead_ms = zoom.interpolate();

        let elapsed = last.elapsed();
        last = Instant::now();
        let time = playback.tick(elapsed);
        if playback.end {
            log(Log::Info, "looping back to the start");
            playback.restart();
            held.clear();
            released.clear();
        }

        let now_ms = time * 1000.0;
        let (w, h) = engine.size();
        let mapper = Mapper::new(w as f32, h as f32, &settings);
        let (back_ms, _) = mapper.visible_window_ms();
        released.retain(|note| note.end_ms >= now_ms - back_ms && note.start_ms <= now_ms);

        let info = |note: &Note| -> Option<RenderInfo> {
            lifecycle::render_info(note, now_ms, &mapper, &settings, Rgba::WHITE)
        };
        let active_input: Vec<RenderInfo> = held
            .iter()
            .map(|(id, h)| Note::new(*id, h.number, 100, h.start_ms, now_ms, input_track))
            .filter_map(|note| info(&note))
            .collect();
        let played_input: Vec<RenderInfo> = released.iter().filter_map(info).collect();

        let input = FrameInput {
            active_input: &active_input,
            played_input: &played_input,
            markers: song.markers(),
            pointer_x: progress::bar_contains(mouse_y).then_some(mouse_x),
        };

        let mut frame = engine.frame(&font);
        let state = PlayerState::new(time, Some(&song));
        let report = render.render(&mut frame, &state, &settings, &input)?;
        frame.present()?;

        engine.set_status(format!(
            "{} ({:.0}%) | {:.2}x | {} notes | {} particles | look-ahead {:.0} ms{}",
            progress::format_time(time, settings.show_milliseconds),
            playback.progress() * 100.0,
            playback.speed(),
            report.notes,
            report.particles,
            settings.look_ahead_ms,
            if playback.is_paused() { " | paused" } else { "" }
        ))?;
    }

    Ok(())
}
