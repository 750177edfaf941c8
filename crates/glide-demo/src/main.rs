use std::rc::Rc;

use anyhow::{Result, bail};
use glide_config::GlideConfig;
use glide_core::{
    Animator, Edge, HeadlessHost, LifecycleEvent, NodeId, Rect, Size, VirtualScheduler,
};

const SCENES: [&str; 3] = ["chain", "contain", "bounce"];

struct Stage {
    host: Rc<HeadlessHost>,
    scheduler: Rc<VirtualScheduler>,
    animator: Animator<HeadlessHost>,
    ball: NodeId,
}

impl Stage {
    fn new(config: &GlideConfig) -> Self {
        let host = Rc::new(HeadlessHost::with_document(Size::new(1280.0, 720.0)));
        let ball = host.add_element("ball");
        host.add_selector(ball, ".sprite");
        host.set_size(ball, Size::new(64.0, 64.0));
        host.set_computed(ball, "left", "0px");
        host.set_computed(ball, "top", "0px");

        let arena = host.add_element("arena");
        host.set_bounds(arena, Rect::new(40.0, 40.0, 840.0, 560.0));

        let scheduler = Rc::new(VirtualScheduler::new());
        let animator = Animator::from_config(host.clone(), scheduler.clone(), config);
        Self {
            host,
            scheduler,
            animator,
            ball,
        }
    }

    /// Run the clock until every transition has ended and dump the writes.
    fn finish(&self) -> Result<()> {
        let ran = self.scheduler.run_until_idle();
        log::info!("{ran} transition(s) ended at t={}ms", self.scheduler.now_ms());
        for write in self.host.applied() {
            if write.name.starts_with('-') {
                continue;
            }
            println!("{}", serde_json::to_string(&write)?);
        }
        println!(
            "final: left={} top={}",
            self.host.style_of(self.ball, "left").unwrap_or_default(),
            self.host.style_of(self.ball, "top").unwrap_or_default()
        );
        Ok(())
    }
}

fn chain(stage: &Stage) -> Result<()> {
    let first = stage.animator.animate(".sprite");
    first
        .set("left", 300)
        .rotate(90.0)
        .ease("out")
        .on(LifecycleEvent::Start, |_| log::info!("first step started"));

    let second = first.then();
    second.set("top", 200).scale(2.0, None).duration("0.25");
    second
        .then()
        .add("left", 100.0)
        .on(LifecycleEvent::End, |_| log::info!("last step ended"));

    let done = second.finished();
    first.end();
    stage.finish()?;
    pollster::block_on(done)?;
    Ok(())
}

fn contain(stage: &Stage) -> Result<()> {
    stage
        .animator
        .animate("#ball")
        .contain("#arena")
        .set("left", 2000)
        .set("top", 10)
        .end();
    stage.finish()
}

fn bounce(stage: &Stage) -> Result<()> {
    let fall = stage.animator.animate("#ball");
    fall.contain_edges(&[(Edge::Top, "+0"), (Edge::Bottom, "+0")])?
        .set("top", 900)
        .ease("snap")
        .duration(300);
    fall.then()
        .sub("top", 200.0)
        .on(LifecycleEvent::Start, |_| log::info!("landed, bouncing back"));
    fall.end();
    stage.finish()
}

fn main() -> Result<()> {
    env_logger::init();

    let config = GlideConfig::load();
    log::info!(
        "defaults: duration={}ms easing={:?}",
        config.timing.duration_ms,
        config.timing.easing
    );

    let scene = std::env::args().nth(1).unwrap_or_else(|| "chain".to_string());
    let stage = Stage::new(&config);
    match scene.as_str() {
        "chain" => chain(&stage),
        "contain" => contain(&stage),
        "bounce" => bounce(&stage),
        other => bail!("unknown scene `{other}`; expected one of {:?}", SCENES),
    }
}
