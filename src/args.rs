use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Camera Index (default 0)
    #[arg(short, long)]
    pub cam_index: Option<u32>,

    /// Path to the hand landmarker ONNX model
    #[arg(long)]
    pub model: Option<String>,

    /// Use the simulated detector instead of a model
    #[arg(long, default_value_t = false)]
    pub simulate: bool,

    /// List available cameras
    #[arg(long)]
    pub list: bool,
}
