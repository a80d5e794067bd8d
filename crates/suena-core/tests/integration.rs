//! End-to-end tests of the node façades against a rendering context.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use suena_core::{AudioBuffer, AudioContext, AudioNode, Error, Noise, SoundFile, TapSink};

const SR: f32 = 48000.0;

fn ramp_file(ctx: &AudioContext, frames: usize) -> SoundFile {
    let samples: Vec<f32> = (0..frames).map(|i| i as f32 / frames as f32).collect();
    SoundFile::from_buffer(ctx, AudioBuffer::new(samples, 1, SR as u32))
}

#[test]
fn playing_file_reaches_the_destination() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 1024);
    file.play().unwrap();

    let mut block = [0.0f32; 256];
    ctx.render(&mut block);
    for (i, &s) in block.iter().enumerate() {
        let expected = i as f32 / 1024.0;
        assert!((s - expected).abs() < 1e-4, "frame {i}: {s} vs {expected}");
    }
}

#[test]
fn two_sources_sum_at_the_destination() {
    let ctx = AudioContext::new(SR);
    let a = SoundFile::from_buffer(&ctx, AudioBuffer::new(vec![0.25; 512], 1, SR as u32));
    let b = SoundFile::from_buffer(&ctx, AudioBuffer::new(vec![0.5; 512], 1, SR as u32));
    a.play().unwrap();
    b.play().unwrap();

    let mut block = [0.0f32; 128];
    ctx.render(&mut block);
    for &s in &block {
        assert!((s - 0.75).abs() < 1e-4);
    }
}

#[test]
fn fresh_node_has_one_edge_and_disconnect_drops_it() {
    let ctx = AudioContext::new(SR);
    let noise = Noise::new(&ctx);
    assert_eq!(ctx.outgoing_edges(noise.handle()), 1);

    noise.disconnect();
    assert_eq!(ctx.outgoing_edges(noise.handle()), 0);
    noise.disconnect();
    assert_eq!(ctx.outgoing_edges(noise.handle()), 0);
}

#[test]
fn disconnected_source_is_inaudible() {
    let ctx = AudioContext::new(SR);
    let noise = Noise::new(&ctx);
    noise.start();
    noise.disconnect();

    let mut block = [1.0f32; 128];
    ctx.render(&mut block);
    assert_eq!(block, [0.0; 128]);
}

#[test]
fn duplicate_connect_is_rejected() {
    let ctx = AudioContext::new(SR);
    let noise = Noise::new(&ctx);
    // The auto-wired edge to the destination already exists.
    assert!(matches!(
        ctx.connect(noise.handle(), ctx.destination()),
        Err(Error::DuplicateEdge(_, _))
    ));
    assert_eq!(ctx.outgoing_edges(noise.handle()), 1);
}

#[test]
fn connect_to_released_node_fails() {
    let ctx = AudioContext::new(SR);
    let noise = Noise::new(&ctx);
    let file = ramp_file(&ctx, 16);
    let gone = file.handle();
    file.release();
    assert!(!ctx.has_node(gone));

    assert!(matches!(
        ctx.connect(noise.handle(), gone),
        Err(Error::InvalidConnection(_))
    ));
    // The existing edge survived the failed call.
    assert_eq!(ctx.outgoing_edges(noise.handle()), 1);
}

#[test]
fn pause_freezes_position_and_play_resumes() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 4096);
    file.play().unwrap();

    let mut block = [0.0f32; 256];
    ctx.render(&mut block);
    file.pause();
    let frozen = file.current_time();
    assert!(frozen > 0.0);
    assert!(!file.is_playing());

    ctx.render(&mut block);
    ctx.render(&mut block);
    assert_eq!(file.current_time(), frozen);

    file.play().unwrap();
    ctx.render(&mut block);
    assert!(file.current_time() > frozen);
}

#[test]
fn jump_while_paused_moves_the_frozen_position() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 4096);
    file.play().unwrap();
    file.pause();

    file.jump(0.05).unwrap();
    assert!((file.current_time() - 0.05).abs() < 1e-6);
    assert!(!file.is_playing());
}

#[test]
fn jump_clamps_to_the_buffer() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 480);
    file.jump(1000.0).unwrap();
    let duration = file.duration().unwrap();
    assert!((file.current_time() - duration).abs() < 1e-9);
}

#[test]
fn stop_resets_position() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 4096);
    file.play().unwrap();
    let mut block = [0.0f32; 256];
    ctx.render(&mut block);

    file.stop();
    assert_eq!(file.current_time(), 0.0);
    assert!(!file.is_playing());
    file.stop();
    assert_eq!(file.current_time(), 0.0);
}

#[test]
fn unloaded_file_reports_not_ready_until_installed() {
    let ctx = AudioContext::new(SR);
    let file = SoundFile::unloaded(&ctx);
    assert!(!file.is_loaded());
    assert!(matches!(file.play(), Err(Error::NotReady)));
    assert!(matches!(file.duration(), Err(Error::NotReady)));
    assert!(matches!(file.sample_rate(), Err(Error::NotReady)));
    assert!(matches!(file.channels(), Err(Error::NotReady)));
    assert!(matches!(file.frames(), Err(Error::NotReady)));

    let slot = file.slot();
    slot.install(AudioBuffer::new(vec![0.0; 960], 2, 48000))
        .unwrap();

    assert!(file.is_loaded());
    assert_eq!(file.frames().unwrap(), 480);
    assert_eq!(file.channels().unwrap(), 2);
    assert_eq!(file.sample_rate().unwrap(), 48000);
    assert!((file.duration().unwrap() - 0.01).abs() < 1e-9);
    file.play().unwrap();
}

#[test]
fn double_install_fails() {
    let ctx = AudioContext::new(SR);
    let file = SoundFile::unloaded(&ctx);
    let slot = file.slot();
    slot.install(AudioBuffer::new(vec![0.0; 16], 1, 48000))
        .unwrap();
    assert!(matches!(
        slot.install(AudioBuffer::new(vec![0.0; 16], 1, 48000)),
        Err(Error::AlreadyLoaded)
    ));
}

#[test]
fn ended_callback_fires_once_per_natural_end() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 100);
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    file.on_ended(move || {
        seen.fetch_add(1, Ordering::Relaxed);
    });

    file.play().unwrap();
    let mut block = [0.0f32; 256];
    ctx.render(&mut block);
    ctx.render(&mut block);
    assert_eq!(count.load(Ordering::Relaxed), 1);
    assert!(!file.is_playing());

    // Replaying produces a second natural end and a second dispatch.
    file.play().unwrap();
    ctx.render(&mut block);
    ctx.render(&mut block);
    assert_eq!(count.load(Ordering::Relaxed), 2);
}

#[test]
fn ended_callback_can_rearm_its_own_node() {
    let ctx = AudioContext::new(SR);
    let file = Arc::new(ramp_file(&ctx, 100));
    let count = Arc::new(AtomicUsize::new(0));

    let seen = Arc::clone(&count);
    let rearm = Arc::clone(&file);
    file.on_ended(move || {
        seen.fetch_add(1, Ordering::Relaxed);
        // Replacing the callback from inside itself must not deadlock.
        rearm.on_ended(|| {});
    });

    file.play().unwrap();
    let mut block = [0.0f32; 256];
    ctx.render(&mut block);
    ctx.render(&mut block);
    assert_eq!(count.load(Ordering::Relaxed), 1);

    // The replacement registered inside the callback wins: the next natural
    // end runs the new (empty) callback, not the original.
    file.play().unwrap();
    ctx.render(&mut block);
    ctx.render(&mut block);
    assert_eq!(count.load(Ordering::Relaxed), 1);
}

#[test]
fn looping_file_never_ends() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 100);
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    file.on_ended(move || {
        seen.fetch_add(1, Ordering::Relaxed);
    });

    file.set_loop(true);
    assert!(file.is_looping());
    file.play().unwrap();
    let mut block = [0.0f32; 256];
    for _ in 0..8 {
        ctx.render(&mut block);
    }
    assert!(file.is_playing());
    assert_eq!(count.load(Ordering::Relaxed), 0);
}

#[test]
fn loop_points_validation() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 1024);
    file.loop_points(0.001, 0.005).unwrap();
    assert!(matches!(
        file.loop_points(-0.1, 1.0),
        Err(Error::UnsupportedParameter(_))
    ));
    assert!(matches!(
        file.loop_points(0.0, 0.0),
        Err(Error::UnsupportedParameter(_))
    ));
    assert!(matches!(
        file.loop_points(f64::NAN, 1.0),
        Err(Error::UnsupportedParameter(_))
    ));
}

#[test]
fn degenerate_loop_span_does_not_stall_rendering() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 64);
    // Positive but far below one frame; the voice must treat it as
    // degenerate rather than wrap over it.
    file.loop_points(0.0, 1e-300).unwrap();
    file.set_loop(true);
    file.play().unwrap();

    let mut block = [0.0f32; 256];
    ctx.render(&mut block);
    ctx.render(&mut block);
    assert!(file.is_playing());
    for &s in &block {
        assert!(s.is_finite());
    }
}

#[test]
fn amp_scales_the_mix() {
    let ctx = AudioContext::new(SR);
    let file = SoundFile::from_buffer(&ctx, AudioBuffer::new(vec![1.0; 48000], 1, 48000));
    file.amp(0.5);
    file.play().unwrap();

    let mut block = [0.0f32; 512];
    ctx.render(&mut block);
    // Past the smoothing window the level sits at the target.
    let tail = block[block.len() - 1];
    assert!((tail - 0.5).abs() < 1e-3, "got {tail}");
}

#[test]
fn zero_amp_is_silence() {
    let ctx = AudioContext::new(SR);
    let file = SoundFile::from_buffer(&ctx, AudioBuffer::new(vec![1.0; 48000], 1, 48000));
    file.amp(0.0);
    file.play().unwrap();

    let mut block = [0.0f32; 512];
    ctx.render(&mut block);
    let tail = block[block.len() - 1];
    assert!(tail.abs() < 1e-3, "got {tail}");
}

#[test]
fn reverse_playback_reads_backwards() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 4096);
    file.rate(-1.0);
    file.jump(2048.0 / f64::from(SR)).unwrap();
    file.play().unwrap();

    let mut block = [0.0f32; 64];
    ctx.render(&mut block);
    assert!(
        block[0] > block[63],
        "expected descending ramp: {} vs {}",
        block[0],
        block[63]
    );
}

#[test]
fn sources_feed_taps_and_destination_together() {
    let ctx = AudioContext::new(SR);
    let noise = Noise::new(&ctx);
    noise.start();

    let sink = Arc::new(TapSink::new(128));
    let tap = ctx.add_tap(Arc::clone(&sink));
    ctx.connect(noise.handle(), tap).unwrap();
    assert_eq!(ctx.outgoing_edges(noise.handle()), 2);

    let mut block = [0.0f32; 128];
    ctx.render(&mut block);

    let mut captured = [0.0f32; 128];
    sink.latest(&mut captured);
    assert_eq!(&captured[..], &block[..], "tap sees the same signal");
}

#[test]
fn nodes_do_not_share_transport_state() {
    let ctx = AudioContext::new(SR);
    let a = ramp_file(&ctx, 1024);
    let b = ramp_file(&ctx, 1024);

    a.play().unwrap();
    assert!(a.is_playing());
    assert!(!b.is_playing());

    a.stop();
    assert!(!a.is_playing());
    b.play().unwrap();
    assert!(b.is_playing());
    assert!(!a.is_playing());
}

#[test]
fn loop_flag_is_idempotent() {
    let ctx = AudioContext::new(SR);
    let file = ramp_file(&ctx, 64);
    file.set_loop(true);
    file.set_loop(true);
    assert!(file.is_looping());
    file.set_loop(false);
    file.set_loop(false);
    assert!(!file.is_looping());
}

#[test]
fn dropping_a_node_removes_it_from_the_graph() {
    let ctx = AudioContext::new(SR);
    let handle = {
        let noise = Noise::new(&ctx);
        noise.handle()
    };
    assert!(!ctx.has_node(handle));
}
