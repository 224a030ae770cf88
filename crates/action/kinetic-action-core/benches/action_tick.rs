use std::hint::black_box;
use std::rc::Rc;

use criterion::{criterion_group, criterion_main, Criterion};
use kinetic_action_core::{Action, Config, FrameScheduler, PresetLibrary, Props, SharedAction};
use serde_json::json;

fn looping_preset(values: usize) -> Props {
    let entries: serde_json::Map<String, serde_json::Value> = (0..values)
        .map(|i| (format!("v{i}"), json!({ "from": 0, "to": i })))
        .collect();
    let serde_json::Value::Object(props) = json!({
        "duration": 500,
        "loop": true,
        "values": entries,
    }) else {
        unreachable!()
    };
    props
}

fn setup(actions: usize, values: usize) -> (FrameScheduler, Vec<SharedAction>) {
    let scheduler = FrameScheduler::manual(Config::default());
    let library = Rc::new(PresetLibrary::new().with("loop", looping_preset(values)));
    let actions = (0..actions)
        .map(|_| {
            let action = Action::new(&scheduler, library.clone());
            action
                .borrow_mut()
                .play("loop", None)
                .expect("play looping preset");
            action
        })
        .collect();
    (scheduler, actions)
}

fn bench_tick(c: &mut Criterion) {
    let (scheduler, _actions) = setup(64, 8);
    c.bench_function("tick_64_actions_8_values", |b| {
        b.iter(|| black_box(scheduler.tick(black_box(16.0))))
    });

    let (scheduler, _actions) = setup(1, 128);
    c.bench_function("tick_1_action_128_values", |b| {
        b.iter(|| black_box(scheduler.tick(black_box(16.0))))
    });
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
