use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context as _;
use clap::Parser;
use framepace::{
    BlendType, FrameOp, FramepaceResult, Graphics, HeadlessWindow, LogicFlow, ManualClock,
    Pipeline, Quad, Rect, RenderParams, RenderPhase, Resolution, ScreenConfig,
};

#[derive(Parser, Debug)]
#[command(name = "framepace", version)]
/// Run a headless screen session and write the last presented frame as a PNG.
struct Cli {
    /// Screen config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the logical width.
    #[arg(long)]
    width: Option<u32>,

    /// Override the logical height.
    #[arg(long)]
    height: Option<u32>,

    /// Window width.
    #[arg(long, default_value_t = 960)]
    window_width: u32,

    /// Window height.
    #[arg(long, default_value_t = 540)]
    window_height: u32,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 144)]
    refresh_hz: u32,

    /// Maximum number of present cycles.
    #[arg(long, default_value_t = 600)]
    cycles: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

/// A square sliding across a solid background.
struct DemoScene {
    background: Rc<Cell<[f32; 4]>>,
    x: f64,
}

impl framepace::DrawableProducer for DemoScene {
    fn notify(&mut self, phase: RenderPhase, params: &RenderParams<'_>) -> FramepaceResult<()> {
        if phase != RenderPhase::OnRendering {
            return Ok(());
        }
        let size = params.screen_size.to_rect();
        let side = size.height() / 4.0;
        self.x = (self.x + 3.0) % (size.width() - side).max(1.0);
        let y = (size.height() - side) / 2.0;
        params.submit(
            Pipeline::Color {
                blend: BlendType::Normal,
            },
            vec![
                Quad::solid(size, self.background.get()),
                Quad::solid(
                    Rect::new(self.x, y, self.x + side, y + side),
                    [1.0, 0.85, 0.2, 1.0],
                ),
            ],
        )
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ScreenConfig::from_path(path)?,
        None => ScreenConfig::default(),
    };
    if let Some(w) = cli.width {
        config.resolution.width = w;
    }
    if let Some(h) = cli.height {
        config.resolution.height = h;
    }

    let clock = ManualClock::new(1_000_000_000);
    let window = HeadlessWindow::new(Resolution::new(cli.window_width, cli.window_height));
    let mut gfx = Graphics::headless(&config, Box::new(clock.clone()), window)
        .context("create headless screen")?;
    eprintln!(
        "renderer: {} ({})",
        gfx.renderer_info().device,
        gfx.renderer_info().description
    );

    let background = Rc::new(Cell::new([0.1, 0.2, 0.5, 1.0]));
    gfx.add_drawable(Box::new(DemoScene {
        background: background.clone(),
        x: 0.0,
    }));

    let mut step = 0u32;
    let logic = move |gfx: &mut Graphics| -> FramepaceResult<LogicFlow> {
        step += 1;
        Ok(match step {
            1 => LogicFlow::Yield(FrameOp::Wait(40)),
            2 => {
                gfx.freeze()?;
                background.set([0.5, 0.1, 0.2, 1.0]);
                LogicFlow::Yield(FrameOp::transition_for(30))
            }
            3 => LogicFlow::Yield(FrameOp::Wait(20)),
            4 => LogicFlow::Yield(FrameOp::FadeOut(15)),
            5 => LogicFlow::Yield(FrameOp::FadeIn(15)),
            6 => LogicFlow::Yield(FrameOp::Wait(10)),
            _ => LogicFlow::Exit(0),
        })
    };
    let mut driver = framepace::CoroutineDriver::new(logic);

    let mut logical_frames = 0u64;
    for _ in 0..cli.cycles {
        clock.advance_refresh(cli.refresh_hz);
        let report = driver.present_cycle(&mut gfx)?;
        logical_frames += u64::from(report.frames);
        if report.finished {
            break;
        }
    }

    let frame = gfx.read_backbuffer()?;
    let img = frame
        .to_image()
        .context("backbuffer readback has an unexpected size")?;

    if let Some(parent) = cli.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(&cli.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", cli.out.display()))?;

    eprintln!(
        "wrote {} after {logical_frames} logical frames (frame_count={}, exit={:?})",
        cli.out.display(),
        gfx.frame_count(),
        driver.exit_code()
    );
    Ok(())
}
