//! CLI argument parsing with clap.

use clap::Parser;

/// Text-to-image CLI - one interface for Hugging Face, `OpenAI` and Stability AI.
#[derive(Parser, Debug)]
#[command(name = "imagegen", version, about)]
pub struct Cli {
    /// Text prompt describing the desired image.
    #[arg(conflicts_with = "prompt_file")]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(short = 'p', long, conflicts_with = "prompt")]
    pub prompt_file: Option<String>,

    /// Provider: openai, huggingface, stability, placeholder, demo.
    #[arg(short = 'P', long)]
    pub provider: Option<String>,

    /// Image width in pixels (64-2048).
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Image height in pixels (64-2048).
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Size preset: square, portrait, landscape, wide.
    #[arg(long)]
    pub preset: Option<String>,

    /// Art style: photorealistic, digital-art, oil-painting, watercolor, sketch, anime.
    #[arg(short, long)]
    pub style: Option<String>,

    /// API key for the selected provider (overrides env and config).
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Output file path (defaults to `ai_generated_{width}x{height}.png`).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the prompt from either the positional argument or the file flag.
    ///
    /// # Errors
    ///
    /// Returns an error if neither prompt nor prompt-file is provided,
    /// or if the file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            std::fs::read_to_string(path)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide a prompt string or use -p/--prompt-file",
            ))
        }
    }
}
