use clap::Parser;
use colored::*;

use pinchpad::args::Args;
use pinchpad::camera::CameraSource;
use pinchpad::canvas::Canvas;
use pinchpad::config::AppConfig;
use pinchpad::detector::{HandDetector, OnnxHandDetector, SimulatedHandDetector};
use pinchpad::output::WindowOutput;
use pinchpad::overlay::OverlayRenderer;
use pinchpad::scheduler::FrameScheduler;
use pinchpad::trail::TrailSmoother;
use pinchpad::types::SessionStatus;

fn create_detector(args: &Args, config: &AppConfig) -> anyhow::Result<Box<dyn HandDetector>> {
    if args.simulate {
        return Ok(Box::new(SimulatedHandDetector::new()));
    }
    let model_path = args
        .model
        .clone()
        .unwrap_or_else(|| config.camera.model_path.clone());
    if OnnxHandDetector::model_exists(&model_path) {
        Ok(Box::new(OnnxHandDetector::new(&model_path)?))
    } else {
        println!(
            "Model not found at {}. Using simulated detector.",
            model_path
        );
        Ok(Box::new(SimulatedHandDetector::new()))
    }
}

fn main() {
    let args = Args::parse();

    if args.list {
        match nokhwa::query(nokhwa::utils::ApiBackend::Auto) {
            Ok(cameras) => {
                println!("Available Cameras:");
                println!("{:<5} | {:<30} | {:<10}", "Index", "Name", "Misc");
                println!("{}", "-".repeat(60));
                for cam in cameras {
                    println!("{:<5} | {:<30} | {:?}", cam.index(), cam.human_name(), cam.misc());
                }
            }
            Err(e) => eprintln!("{}", format!("Camera query failed: {}", e).red()),
        }
        return;
    }

    // Initialization failures surface once, with the underlying text,
    // and the session stays failed. No retry.
    if let Err(e) = run(&args) {
        let status = SessionStatus::Failed(format!("{:#}", e));
        eprintln!("{}", describe(&status).red());
        std::process::exit(1);
    }
}

fn describe(status: &SessionStatus) -> String {
    match status {
        SessionStatus::Loading => "Loading hand tracking...".to_string(),
        SessionStatus::Running => "Hand tracking running.".to_string(),
        SessionStatus::Failed(msg) => format!("Failed to initialize hand tracking: {}", msg),
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut status = SessionStatus::Loading;
    println!("{}", describe(&status));

    let config = AppConfig::load()?;

    let mut camera = CameraSource::new(args.cam_index.unwrap_or(config.camera.index))?;
    let width = camera.width() as usize;
    let height = camera.height() as usize;

    let detector = create_detector(args, &config)?;
    println!("Active Detector: {}", detector.name());

    let mut window = WindowOutput::new("Pinchpad", width, height)?;

    // Two surfaces, addressed separately, layered in the window.
    let mut base = Canvas::new(width, height);
    let mut overlay = Canvas::new(width, height);

    let renderer = OverlayRenderer::from_config(&config.ui);
    let mut trail = TrailSmoother::new();
    let mut scheduler = FrameScheduler::spawn(detector);

    status = SessionStatus::Running;
    println!("{}", describe(&status).green());
    println!("Pinch to draw. [Esc] quits.");

    let mut is_pinching = false;

    while window.is_open() && !window.is_key_down(minifb::Key::Escape) {
        let frame = match camera.capture() {
            Ok(f) => f,
            Err(_) => continue,
        };

        // Passthrough cadence: every tick.
        scheduler.tick_passthrough(&frame, &mut base);

        // Detection cadence: throttled; hands arrive when a cycle finishes.
        if let Some(hands) = scheduler.tick_detection(&frame) {
            if let Some(state) = renderer.render(&hands, &mut trail, &mut overlay) {
                if state.pinching != is_pinching {
                    is_pinching = state.pinching;
                    println!("Pinch: {}", if is_pinching { "ON".yellow() } else { "OFF".normal() });
                }
            }
        }

        window.present(&base, &overlay)?;
    }

    // Teardown: stop both cadences before releasing the capture stream.
    scheduler.shutdown();
    camera.stop();

    println!("Session ended. {} trail points captured.", trail.len());
    Ok(())
}
