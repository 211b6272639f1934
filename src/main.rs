// src/main.rs
use nannou::prelude::*;

use typoscape::{
    config::Config,
    controllers::{MidiController, MidiEvent, SideEffects, StageController},
    models::{SceneMode, Show},
    render::{FontLibrary, TextFrame, TextRenderer},
    services::{AudioInput, AudioService},
    views::{BackgroundManager, Hud},
};

struct Model {
    // Core components:
    stage: StageController,
    frame: TextFrame,

    // Inputs:
    midi: MidiController,
    audio: AudioService,

    // Views:
    background: BackgroundManager,
    text_renderer: TextRenderer,
    hud: Hud,

    // Redraw work collected from events since the last update
    pending: SideEffects,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    nannou::app(model).update(update).exit(exit).run();
}

fn model(app: &App) -> Model {
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("Using default config: {}", e);
        Config::default()
    });
    let assets_dir = config.resolve_assets_dir();

    app.new_window()
        .title(&config.window.title)
        .size(config.window.width, config.window.height)
        .view(view)
        .key_pressed(key_pressed)
        .resized(resized)
        .build()
        .expect("Failed to create window");

    let show = Show::builtin();
    let background = BackgroundManager::load(app, &show, &assets_dir);
    let text_renderer = TextRenderer::new(
        FontLibrary::load(&show, &assets_dir),
        config.timing.text_fade_seconds,
    );

    let mut stage = StageController::new(show, &config, &background).unwrap_or_else(|e| {
        log::error!("{}", e);
        std::process::exit(1);
    });
    if config.auto_transition.enabled {
        stage.auto_transition.start(app.time);
    }

    let midi = MidiController::new(&config.midi);
    let audio = AudioService::new(&config.audio);
    log::info!("{}", audio.status_text());

    Model {
        stage,
        frame: TextFrame::default(),
        midi,
        audio,
        background,
        text_renderer,
        hud: Hud::new(),
        pending: SideEffects {
            relayout_text: true,
            swap_background: true,
            refresh_hud: true,
        },
    }
}

/// Rehearsal keys: the same notes the controller pads send.
fn rehearsal_note(key: Key) -> Option<u8> {
    let note = match key {
        // text sets
        Key::Key1 => 56,
        Key::Key2 => 57,
        Key::Key3 => 58,
        Key::Key4 => 59,
        Key::Key5 => 60,
        Key::Key6 => 61,
        Key::Key7 => 62,
        Key::Key8 => 63,
        Key::Key9 => 64,
        // fonts
        Key::F1 => 16,
        Key::F2 => 17,
        Key::F3 => 18,
        Key::F4 => 19,
        Key::F5 => 20,
        Key::F6 => 21,
        // palettes
        Key::Q => 36,
        Key::W => 37,
        Key::E => 38,
        Key::R => 39,
        Key::T => 40,
        Key::Y => 41,
        Key::U => 42,
        // image scenes
        Key::Z => 44,
        Key::X => 45,
        Key::C => 46,
        Key::V => 47,
        Key::B => 48,
        Key::N => 49,
        Key::M => 50,
        Key::Comma => 51,
        // modes
        Key::S => 77,
        Key::D => 76,
        Key::A => 78,
        Key::H => 43,
        _ => return None,
    };
    Some(note)
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    if key == Key::Space {
        model.stage.auto_transition.toggle(app.time);
        return;
    }
    if let Some(note) = rehearsal_note(key) {
        let effects = model.stage.handle_midi(
            &MidiEvent::note_on(note, 127),
            app.time,
            model.audio.is_ready(),
        );
        model.pending.merge(effects);
    }
}

fn resized(_app: &App, model: &mut Model, _size: Vec2) {
    model.stage.window_resized();
}

fn update(app: &App, model: &mut Model, update: Update) {
    let now = app.time;
    let dt = update.since_last.as_secs_f32();
    let audio_ready = model.audio.is_ready();

    // MIDI
    model.midi.process_messages();
    if let Some(status) = model.midi.poll_ports(now) {
        log::info!("{}", status);
        model.pending.refresh_hud = true;
    }
    for event in model.midi.take_events() {
        let effects = model.stage.handle_midi(&event, now, audio_ready);
        model.pending.merge(effects);
    }

    // Scheduled transitions and the auto-transition timer
    let effects = model.stage.tick(now, audio_ready);
    model.pending.merge(effects);

    // Render step
    let rect = app.window_rect();
    let bins = if model.stage.scene.mode == SceneMode::TextAudioReactive {
        model.audio.frequency_bins()
    } else {
        None
    };
    model.frame = model.stage.frame(bins, (rect.w(), rect.h()));

    let pending = std::mem::take(&mut model.pending);
    if pending.swap_background {
        model.background.sync(&model.stage.scene);
    }
    if pending.relayout_text {
        model.text_renderer.relayout(&model.frame);
    }
    if pending.refresh_hud {
        model.hud.refresh(
            &model.stage.scene,
            &model.stage.show,
            model.midi.status_text(),
            model.midi.is_connected(),
        );
    }

    model.background.update(dt, &model.stage.scene);
    model.text_renderer.update(&model.frame, dt);
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let rect = app.window_rect();

    model.background.draw(&draw, &model.stage.scene, rect);
    model
        .text_renderer
        .draw(&draw, &model.frame, &model.stage.show);
    model.hud.draw(&draw, &model.stage.scene, rect);

    if let Err(e) = draw.to_frame(app, &frame) {
        log::error!("Failed to render frame: {:?}", e);
    }
}

fn exit(_app: &App, mut model: Model) {
    model.stage.shutdown();
    log::info!("Shutting down");
}
