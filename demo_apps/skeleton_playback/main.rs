//! Headless skeletal playback.
//!
//! Builds a small biped, plays a looping walk cycle on two instances of it
//! and logs bone world positions every few frames.
//!
//! ```text
//! RUST_LOG=info cargo run -p skeleton_playback -- [settings.json]
//! ```

use std::f32::consts::FRAC_PI_4;

use anyhow::Context;
use ember::prelude::*;

const FRAME_MILLIS: f32 = 1000.0 / 60.0;
const FRAMES: usize = 120;

fn load_settings() -> anyhow::Result<AnimationSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            let settings = AnimationSettings::from_json_str(&json)?;
            settings.validate()?;
            log::info!("Loaded animation settings from {path}");
            Ok(settings)
        }
        None => Ok(AnimationSettings::default()),
    }
}

fn swing_channel(axis_offset: f32) -> anyhow::Result<AnimationChannel> {
    let mut channel = AnimationChannel::new();
    channel.set_num_frames(0, 0, 3)?;
    channel.rotation_frames.set_frame(0, 0.0, Quat::from_rotation_x(FRAC_PI_4 * axis_offset));
    channel.rotation_frames.set_frame(1, 0.5, Quat::from_rotation_x(-FRAC_PI_4 * axis_offset));
    channel.rotation_frames.set_frame(2, 1.0, Quat::from_rotation_x(FRAC_PI_4 * axis_offset));
    Ok(channel)
}

fn bob_channel() -> anyhow::Result<AnimationChannel> {
    let mut channel = AnimationChannel::new();
    channel.position_frames = KeyframeTrack::from_keyframes(
        vec![0.0, 0.25, 0.5, 0.75, 1.0],
        vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.05, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.05, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
    )?;
    Ok(channel)
}

/// hips
/// ├── spine ── head
/// ├── leg_l
/// └── leg_r
fn build_biped(settings: &AnimationSettings) -> anyhow::Result<SceneGraph> {
    let mut graph = SceneGraph::new();
    let hips = graph.add_node(None, NodeType::Bone, "hips", Transform::new())?;
    let spine = graph.add_node(
        Some(hips),
        NodeType::Bone,
        "spine",
        Transform::from_trs(Vec3::new(0.0, 0.5, 0.0), Quat::IDENTITY, Vec3::ONE),
    )?;
    graph.add_node(
        Some(spine),
        NodeType::Bone,
        "head",
        Transform::from_trs(Vec3::new(0.0, 0.4, 0.0), Quat::IDENTITY, Vec3::ONE),
    )?;
    let leg_l = graph.add_node(
        Some(hips),
        NodeType::Bone,
        "leg_l",
        Transform::from_trs(Vec3::new(-0.2, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE),
    )?;
    let leg_r = graph.add_node(
        Some(hips),
        NodeType::Bone,
        "leg_r",
        Transform::from_trs(Vec3::new(0.2, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE),
    )?;

    // No authored rate: falls back to the configured one.
    let mut walk = AnimationBuilder::new("walk")
        .duration(24.0)
        .play_mode(PlayMode::Repeat)
        .with_capacity(3)
        .build_with(settings);

    let track = graph.add_channel(hips, bob_channel()?)?;
    walk.add_channel(graph.node(hips).context("hips missing")?, track)?;
    for (leg, phase) in [(leg_l, 1.0), (leg_r, -1.0)] {
        let track = graph.add_channel(leg, swing_channel(phase)?)?;
        walk.add_channel(graph.node(leg).context("leg missing")?, track)?;
    }

    graph.add_animation(walk);
    Ok(graph)
}

fn log_pose(graph: &SceneGraph, frame: usize, root: usize) {
    let Some(leg) = graph.children(root).into_iter().find(|&child| graph.name(child) == Some("leg_l")) else {
        return;
    };
    let (Some(hips), Some(leg)) = (graph.transform(root), graph.transform(leg)) else {
        return;
    };
    log::info!(
        "frame {frame:3} | instance @{root}: hips y = {:.3}, leg_l pitch = {:+.3} rad",
        hips.world_matrix().translation.y,
        leg.rotation.to_euler(glam::EulerRot::XYZ).0,
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let biped = build_biped(&settings)?;

    // Second instance shares the first one's channels through offset replay.
    let mut scene = SceneGraph::new();
    let first = scene.import(biped.clone(), None)?;
    let mut instance = biped;
    instance.remove_animation(0);
    let second = scene.import(instance, None)?;
    scene.transform_mut(second).context("instance root missing")?.position.x = 2.0;

    let walk = scene.find_animation("walk").context("walk animation missing")?;
    let animation = scene.animation(walk).context("walk animation missing")?;
    anyhow::ensure!(
        animation.have_monotonic_transforms(),
        "walk bindings are not contiguous; offset replay unavailable"
    );
    log::info!(
        "Playing '{}' ({:.2}s at {} ticks/s) on {} nodes",
        animation.name(),
        animation.duration_seconds(),
        animation.ticks_per_second(),
        scene.node_count()
    );

    scene.init_animation(walk, true);

    let mut lead = AnimationPlayer::with_settings(&settings);
    let mut follower = AnimationPlayer::with_settings(&settings);
    follower.set_time_dilation(settings.default_time_dilation * 0.5);
    lead.play();
    follower.play();

    for frame in 0..FRAMES {
        if frame == FRAMES / 2 {
            follower.pause();
            log::info!("Follower paused at {:.3}", follower.current_percent());
        }

        lead.tick(&mut scene, walk, FRAME_MILLIS, 0);
        follower.tick(&mut scene, walk, FRAME_MILLIS, second - first);
        scene.update();

        if frame % 20 == 0 {
            log_pose(&scene, frame, first);
            log_pose(&scene, frame, second);
        }
    }

    lead.stop_anim();
    log::info!("Done: lead {:?}, follower {:?}", lead.play_state(), follower.play_state());
    Ok(())
}
