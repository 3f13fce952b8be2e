//! Dongle display simulator for desktop.
//!
//! Renders two 128x64 panels stacked in one window, each holding a full set
//! of status widgets. Both panels are instances registered with the same
//! engine, so every event updates them in lockstep. Keyboard input drives a
//! simulated keyboard (see `SimDevice::on_key`); engine logs go to stdout.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

mod state;
mod timing;

use std::thread;
use std::time::Instant;

use dongle_common::colors::BLACK;
use dongle_common::config::{MAX_DRAWABLES, SCREEN_HEIGHT, SCREEN_WIDTH};
use dongle_common::log_buffer;
use dongle_common::{Display, DrawableId, DrawableKind, Error, Scene, Surface};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

use crate::state::SimDevice;
use crate::timing::{DISCHARGE_INTERVAL, FRAME_TIME};

/// Number of stacked panels (physical displays) in the window.
const PANELS: u32 = 2;

type Engine = Display<Scene<MAX_DRAWABLES>>;

/// Move `id` to (`x`, `y`) inside its parent.
fn place(
    engine: &mut Engine,
    id: Option<DrawableId>,
    x: i32,
    y: i32,
) {
    if let Some(id) = id {
        engine.surface_mut().set_x(id, x);
        engine.surface_mut().set_y(id, y);
    }
}

/// Build one panel's widgets under a container at `top`.
fn build_panel(
    engine: &mut Engine,
    top: i32,
) -> Result<(), Error> {
    let root = engine.surface_mut().create(None, DrawableKind::Container)?;
    engine.surface_mut().set_y(root, top);

    let output = engine.init_output(Some(root))?;
    let output = engine.output_root(output);
    place(engine, output, 0, 0);

    let indicators = engine.init_hid_indicators(Some(root))?;
    let indicators = engine.hid_indicators_root(indicators);
    place(engine, indicators, SCREEN_WIDTH as i32 - 1, 2);

    let layer = engine.init_layer(Some(root))?;
    let layer = engine.layer_root(layer);
    place(engine, layer, 2, 22);

    let battery = engine.init_battery(Some(root))?;
    let battery = engine.battery_root(battery);
    place(engine, battery, 66, 24);

    let modifiers = engine.init_modifiers(Some(root))?;
    let modifiers = engine.modifiers_root(modifiers);
    place(engine, modifiers, 0, 44);

    Ok(())
}

fn build_engine(device: &SimDevice) -> Result<Engine, Error> {
    let mut engine = Display::new(Scene::new())?;
    for panel in 0..PANELS {
        build_panel(&mut engine, (SCREEN_HEIGHT * panel) as i32)?;
    }
    engine.sync(device);
    for event in device.battery_events() {
        engine.handle(&event, device);
    }
    Ok(engine)
}

fn print_logs() {
    log_buffer::drain(|entry| {
        println!("[{:>8}] {} {}", entry.timestamp_ms, entry.level.prefix(), entry.message);
    });
}

fn main() {
    let mut display: SimulatorDisplay<BinaryColor> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT * PANELS));
    let output_settings = OutputSettingsBuilder::new().scale(3).theme(BinaryColorTheme::OledWhite).build();
    let mut window = Window::new("Dongle Display Sim", &output_settings);

    let mut device = SimDevice::new();
    let mut engine = match build_engine(&device) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("display setup failed: {err}");
            return;
        }
    };
    print_logs();

    // Initial draw creates the window
    engine.surface_mut().take_dirty();
    engine.surface().draw(&mut display).ok();
    window.update(&display);

    let mut last_discharge = Instant::now();
    let mut discharge_slot = 0;

    loop {
        let frame_start = Instant::now();

        // Handle events
        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return,
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    if let Some(event) = device.on_key(keycode) {
                        engine.handle(&event, &device);
                    }
                }
                _ => {}
            }
        }

        // Slow background discharge, alternating peripherals
        if last_discharge.elapsed() >= DISCHARGE_INTERVAL {
            last_discharge = Instant::now();
            if let Some(event) = device.discharge(discharge_slot) {
                engine.handle(&event, &device);
            }
            discharge_slot = (discharge_slot + 1) % dongle_common::config::PERIPHERAL_COUNT;
        }

        engine.tick(embassy_time::Instant::now());

        if engine.surface_mut().take_dirty() {
            display.clear(BLACK).ok();
            engine.surface().draw(&mut display).ok();
        }
        print_logs();

        window.update(&display);

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}
