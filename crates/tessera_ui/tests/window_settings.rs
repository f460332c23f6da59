//! Window layout persistence through the settings file.

use std::path::PathBuf;

use tessera_core::Vec2;
use tessera_ui::{Context, IoConfig, SettingsStore, Style, WindowFlags};

fn settings_file(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tessera_{tag}_{}.toml", std::process::id()))
}

fn context_with(path: &PathBuf) -> Context {
    let io = IoConfig {
        settings_path: Some(path.clone()),
        ..IoConfig::default()
    };
    let mut ctx = Context::new(io, Style::default()).unwrap();
    ctx.input_mut().display_size = Vec2::new(1024.0, 768.0);
    ctx.input_mut().delta_time = 1.0 / 60.0;
    ctx
}

fn submit(ctx: &mut Context, name: &str, flags: WindowFlags) {
    ctx.new_frame();
    ctx.begin(name, flags);
    ctx.text_unformatted("body");
    ctx.end();
    let _ = ctx.render();
}

#[test]
fn test_saved_layout_is_restored() {
    let path = settings_file("restore");
    std::fs::write(
        &path,
        r#"
        [[window]]
        name = "Inspector"
        pos = { x = 40.0, y = 30.0 }
        size = { x = 300.0, y = 200.0 }
        "#,
    )
    .unwrap();

    let mut ctx = context_with(&path);
    submit(&mut ctx, "Inspector", WindowFlags::empty());

    let window = ctx.window("Inspector").unwrap();
    assert_eq!(window.pos(), Vec2::new(40.0, 30.0));
    assert_eq!(window.size(), Vec2::new(300.0, 200.0));
    assert!(!window.is_hidden(), "a window with a saved size is not measured first");

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_shutdown_writes_every_window() {
    let path = settings_file("shutdown");
    std::fs::remove_file(&path).ok();

    let mut ctx = context_with(&path);
    for _ in 0..3 {
        ctx.new_frame();
        ctx.set_next_window_pos(Vec2::new(100.0, 50.0), tessera_ui::Cond::FIRST_USE_EVER, Vec2::ZERO);
        ctx.set_next_window_size(Vec2::new(220.0, 120.0), tessera_ui::Cond::FIRST_USE_EVER);
        ctx.begin("Saved", WindowFlags::empty());
        ctx.end();
        ctx.begin("Transient", WindowFlags::NO_SAVED_SETTINGS);
        ctx.end();
        let _ = ctx.render();
    }
    ctx.shutdown().unwrap();

    let store = SettingsStore::load(&path).unwrap();
    let saved = store.iter().find(|s| s.name == "Saved").unwrap();
    assert_eq!(saved.pos, Vec2::new(100.0, 50.0));
    assert_eq!(saved.size, Vec2::new(220.0, 120.0));
    assert!(store.iter().all(|s| s.name != "Transient"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_unreadable_settings_are_ignored() {
    let path = settings_file("garbage");
    std::fs::write(&path, "[[window]]\nname = 12").unwrap();

    let ctx = context_with(&path);
    assert!(ctx.settings().is_empty());

    std::fs::remove_file(&path).ok();
}
