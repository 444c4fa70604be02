#![allow(unused)]
#![deny(non_snake_case)]

mod action;
mod clock;
mod graphics;
mod pool;
mod scene;

use clap::{App, Arg};
use log::{debug, info};
use measure_time::debug_time;
use rand::Rng;
use std::rc::Rc;
use std::time::Duration;

use crate::action::{ActionManager, Call, Delay, FrameAnim, Repeat, Sequence, Spawn, Then, Tween, Update};
use crate::clock::Clock;
use crate::graphics::Point;
use crate::scene::{FrameSet, Node, Scene};

fn main() {
    env_logger::init();

    let args = App::new("stagehand")
        .about("Action/tween core demo: runs a headless scene for a while")
        .arg(Arg::with_name("fps")
            .long("fps")
            .takes_value(true)
            .help("Frames per second (default 30)"))
        .arg(Arg::with_name("seconds")
            .long("seconds")
            .takes_value(true)
            .help("How long to run (default 3)"))
        .get_matches();
    let fps: u32 = args.value_of("fps").and_then(|s| s.parse().ok()).unwrap_or(30);
    let seconds: f32 = args.value_of("seconds").and_then(|s| s.parse().ok()).unwrap_or(3.0);
    let frame_len = Duration::from_secs(1) / fps.max(1);

    let mut scene = Scene::new();
    let mut mgr = ActionManager::new();
    let mut rng = rand::thread_rng();

    let walk_frames = scene.insert_frame_set(FrameSet::new((0..8).collect(), 10));

    // A sprite that walks in a square forever, animating its frames.
    let walker = scene.insert_node(Node::at((rng.gen_range(0.0..100.0), 0.0)));
    mgr.start(walker, Repeat::forever(Sequence::new(vec![
        Tween::move_by(0.5, (40.0, 0.0)).into(),
        Tween::move_by(0.5, (0.0, 40.0)).into(),
        Tween::move_by(0.5, (-40.0, 0.0)).into(),
        Tween::move_by(0.5, (0.0, -40.0)).into(),
    ])));
    mgr.start(walker, Repeat::forever(FrameAnim::new(walk_frames, 0.1)));

    // A sprite that drifts while fading, then announces itself.
    let drifter = scene.insert_node(Node::at((rng.gen_range(0.0..100.0), 60.0)));
    mgr.start(drifter, Then::new(
        Spawn::new(
            Tween::move_to(1.5, (0.0, 0.0)),
            Tween::fade_to(1.5, 0.25),
        ),
        Call::new(|| info!("drifter arrived")),
    ));

    // A sprite on a timer that removes itself from the scene.
    let ghost = scene.insert_node(Node::at((50.0, 50.0)));
    mgr.start(ghost, Then::new(Delay::new(1.0), Tween::fade_to(0.5, 0.0)));

    let clock = Clock::new();
    let frames = (seconds.max(0.0) * fps as f32) as u32;
    for frame in 0..frames {
        debug_time!("frame {}", frame);
        let now = clock.now();
        // Host frame order: input would be polled here, then actions,
        // then rendering, then the end-of-frame sweep.
        mgr.update(&mut Update { time: now, scene: &mut scene });
        render(&scene, &[walker, drifter, ghost]);
        if frame == frames / 2 {
            // Halfway through, the ghost node goes away; its remaining
            // actions self-stop on the next tick.
            scene.release_node(ghost);
        }
        scene.end_frame();
        std::thread::sleep(frame_len);
    }

    info!("done: {} actions still running, {} nodes alive", mgr.len(), scene.node_count());
}

/// Stand-in for the real renderer: logs what it would draw.
fn render(scene: &Scene, nodes: &[scene::Handle]) {
    for &h in nodes {
        if let Some(node) = scene.node(h) {
            if !node.is_visible() {
                continue;
            }
            debug!("draw {:?} at {:?} rot {} scale {:?} opacity {} frame {}",
                h, node.pos.tuple(), node.rotation, node.scale.tuple(),
                node.opacity(), node.frame_idx);
        }
    }
}
